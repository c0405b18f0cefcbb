//! Хост: единственная записываемая копия игры.
//!
//! `HostCore` — синхронная логика (приём кандидатов, рассылка лога,
//! учёт живости), время передаётся снаружи. `spawn_host` оборачивает
//! её в однопоточный цикл: события транспорта, команды локального UI
//! и таймер проверки обрабатываются строго по одному.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::{decode, ControlMessage, WireMessage};
use crate::domain::{EventId, Game};
use crate::engine::{build_deck, Applied, EventKind, GameError, RandomSource, Replica, DEFAULT_PLAYER_COUNT};
use crate::time_ctrl::{HeartbeatTable, LivenessRules};

use super::errors::SessionError;
use super::hooks::{run_effects, UiHooks};
use super::transport::{Link, PeerId, TransportEvent};

/// Настройки хоста.
#[derive(Clone, Debug)]
pub struct HostConfig {
    /// Код комнаты, он же id игры.
    pub room: String,
    pub max_players: usize,
    pub rules: LivenessRules,
}

impl HostConfig {
    pub fn new(room: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            max_players: DEFAULT_PLAYER_COUNT,
            rules: LivenessRules::standard(),
        }
    }

    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    pub fn with_rules(mut self, rules: LivenessRules) -> Self {
        self.rules = rules;
        self
    }
}

/// Запись о подключённом пире.
struct PeerEntry {
    link: Link,
    /// Последнее событие лога, которое ему отправлено.
    last_ack: Option<EventId>,
    /// Имя из первого `join` этого соединения.
    requested: Option<String>,
    /// Под каким именем он сидит за столом.
    player: Option<String>,
}

pub struct HostCore<R: RandomSource> {
    config: HostConfig,
    replica: Replica,
    peers: BTreeMap<PeerId, PeerEntry>,
    heartbeats: HeartbeatTable,
    rng: R,
    hooks: Arc<dyn UiHooks>,
}

impl<R: RandomSource> HostCore<R> {
    /// Создать хост и сразу завести игру (`create`).
    pub fn new(config: HostConfig, rng: R, hooks: Arc<dyn UiHooks>) -> Result<Self, GameError> {
        let mut replica = Replica::new();
        replica.submit(EventKind::Create {
            game_id: config.room.clone(),
            player_count: config.max_players,
        })?;
        info!(room = %config.room, max_players = config.max_players, "[HOST] game created");

        Ok(Self {
            heartbeats: HeartbeatTable::new(config.rules.heartbeat_timeout),
            config,
            replica,
            peers: BTreeMap::new(),
            rng,
            hooks,
        })
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn game(&self) -> Option<&Game> {
        self.replica.game()
    }

    pub fn replica(&self) -> &Replica {
        &self.replica
    }

    pub fn peer_ids(&self) -> Vec<PeerId> {
        self.peers.keys().cloned().collect()
    }

    pub fn peer_player(&self, peer: &str) -> Option<&str> {
        self.peers.get(peer).and_then(|p| p.player.as_deref())
    }

    pub fn last_ack(&self, peer: &str) -> Option<EventId> {
        self.peers.get(peer).and_then(|p| p.last_ack)
    }

    /// Разобрать событие транспорта.
    pub fn on_transport(&mut self, event: TransportEvent, now: Instant) {
        match event {
            TransportEvent::Opened { peer, link } => self.on_open(peer, link, now),
            TransportEvent::Frame { peer, frame } => match decode(&frame) {
                Ok(msg) => self.on_message(&peer, msg, now),
                Err(err) => warn!(peer = %peer, error = %err, "[HOST] undecodable frame dropped"),
            },
            TransportEvent::Closed { peer } => {
                if self.peers.contains_key(&peer) {
                    info!(peer = %peer, "[HOST] connection closed");
                    self.depart(&peer);
                    self.after_change();
                }
            }
        }
    }

    /// Новое соединение: сразу догоняет весь лог.
    pub fn on_open(&mut self, peer: PeerId, link: Link, now: Instant) {
        info!(peer = %peer, "[HOST] new connection");
        self.heartbeats.register(&peer, now);
        self.peers.insert(
            peer,
            PeerEntry {
                link,
                last_ack: None,
                requested: None,
                player: None,
            },
        );
        self.flush();
    }

    pub fn on_message(&mut self, peer: &str, msg: WireMessage, now: Instant) {
        if !self.peers.contains_key(peer) {
            debug!(peer, "[HOST] message from unknown peer ignored");
            return;
        }

        match msg {
            WireMessage::Control(ControlMessage::Heartbeat) => {
                self.heartbeats.beat(peer, now);
            }
            WireMessage::Candidate(kind) => self.on_candidate(peer, kind),
            WireMessage::Event(event) => {
                // Клиент прислал событие с номером: принимаем, только если
                // номер ровно следующий.
                let expected = self.replica.next_event_id();
                if event.id != expected {
                    warn!(peer, expected, received = event.id, "[HOST] out-of-order event rejected");
                    self.reply(
                        peer,
                        GameError::OutOfOrder {
                            expected,
                            received: event.id,
                        }
                        .into(),
                    );
                    return;
                }
                self.on_candidate(peer, event.kind);
            }
            other => {
                debug!(peer, kind = other.label(), "[HOST] unexpected message ignored");
            }
        }
    }

    fn on_candidate(&mut self, peer: &str, kind: EventKind) {
        if !kind.is_peer_submittable() {
            warn!(peer, kind = kind.name(), "[HOST] host-only candidate from peer");
            let err = GameError::HostOnly {
                kind: kind.name().to_string(),
            };
            self.reply(peer, err.into());
            return;
        }

        if let EventKind::Join { player } = &kind {
            if !self.admit_join(peer, player) {
                return;
            }
        }

        let requested = match &kind {
            EventKind::Join { player } => Some(player.clone()),
            _ => None,
        };

        match self.replica.submit(kind) {
            Ok(applied) => {
                if let Some(requested) = requested {
                    self.assign_name(peer, requested);
                }
                self.after_accept(&applied);
            }
            Err(err) => {
                warn!(peer, error = %err, "[HOST] candidate rejected");
                self.reply(peer, err.clone().into());
                if self.replica.is_halted() {
                    self.hooks.show_error(&err);
                    self.after_change();
                }
            }
        }
    }

    /// Проверки `join` до редьюсера. При `false` дальше не идём.
    fn admit_join(&self, peer: &str, requested: &str) -> bool {
        let Some(entry) = self.peers.get(peer) else {
            return false;
        };

        if let Some(bound) = entry.player.clone() {
            let known = entry.requested.as_deref() == Some(requested) || bound == requested;
            if !known {
                warn!(peer, bound = %bound, requested, "[HOST] impersonation attempt, closing");
                entry.link.close();
                return false;
            }
            if self.game().is_some_and(|g| g.player(&bound).is_some()) {
                // Повторный join того же соединения: просто напомнить имя.
                self.reply(peer, WireMessage::name_assigned(requested, bound));
                return false;
            }
        }

        if self.game().is_some_and(Game::is_started) {
            info!(peer, requested, "[HOST] late joiner redirected to spectators");
            self.reply(peer, WireMessage::already_started());
            return false;
        }

        true
    }

    fn assign_name(&mut self, peer: &str, requested: String) {
        let Some(assigned) = self
            .game()
            .and_then(|g| g.players.last())
            .map(|p| p.name.clone())
        else {
            return;
        };
        info!(peer, requested = %requested, assigned = %assigned, "[HOST] player joined");
        if let Some(entry) = self.peers.get_mut(peer) {
            entry.requested = Some(requested.clone());
            entry.player = Some(assigned.clone());
        }
        self.reply(peer, WireMessage::name_assigned(requested, assigned));
    }

    /// Ввод самого хоста (хост тоже может быть игроком).
    pub fn submit_local(&mut self, kind: EventKind) -> Result<Applied, GameError> {
        match self.replica.submit(kind) {
            Ok(applied) => {
                self.after_accept(&applied);
                Ok(applied)
            }
            Err(err) => {
                warn!(error = %err, "[HOST] local input rejected");
                self.hooks.show_error(&err);
                if self.replica.is_halted() {
                    self.after_change();
                }
                Err(err)
            }
        }
    }

    /// Посадить игрока хоста. Возвращает имя, под которым он сел.
    pub fn join_local(&mut self, name: &str) -> Result<String, GameError> {
        self.submit_local(EventKind::Join {
            player: name.to_string(),
        })?;
        self.game()
            .and_then(|g| g.players.last())
            .map(|p| p.name.clone())
            .ok_or_else(|| GameError::Unknown {
                message: "join accepted but no player seated".to_string(),
            })
    }

    /// Начать игру: свежая колода на всех и случайный первый игрок.
    pub fn start_game(&mut self) -> Result<Applied, GameError> {
        let game = self.game().ok_or(GameError::NotCreated)?;
        let names: Vec<String> = game.players.iter().map(|p| p.name.clone()).collect();

        let seed = self.rng.next_seed();
        let deck = build_deck(names.len(), seed);
        let start_player = self
            .rng
            .pick_index(names.len())
            .and_then(|idx| names.get(idx).cloned())
            .unwrap_or_default();

        info!(players = names.len(), start_player = %start_player, "[HOST] starting game");
        self.submit_local(EventKind::Start { deck, start_player })
    }

    /// Проверка живости. Молчащие и закрытые соединения уходят,
    /// их игроки покидают игру обычным событием `leave`.
    pub fn sweep(&mut self, now: Instant) -> Vec<PeerId> {
        let expired = self.heartbeats.expired(now);
        let departed: Vec<PeerId> = self
            .peers
            .iter()
            .filter(|(peer, entry)| !entry.link.is_open() || expired.contains(*peer))
            .map(|(peer, _)| peer.clone())
            .collect();

        for peer in &departed {
            info!(peer = %peer, "[HOST] peer timed out or disconnected");
            self.depart(peer);
        }
        if !departed.is_empty() {
            self.after_change();
        }
        departed
    }

    fn depart(&mut self, peer: &str) {
        self.heartbeats.remove(peer);
        let Some(entry) = self.peers.remove(peer) else {
            return;
        };
        entry.link.close();

        let Some(player) = entry.player else {
            return;
        };
        let seated = self.game().is_some_and(|g| g.player(&player).is_some() && !g.is_over());
        if !seated {
            return;
        }

        let seed = self.rng.next_seed();
        match self.replica.submit(EventKind::Leave {
            player: player.clone(),
            seed,
        }) {
            Ok(applied) => {
                info!(player = %player, "[HOST] player left");
                run_effects(self.hooks.as_ref(), &applied.effects);
            }
            Err(err) => warn!(player = %player, error = %err, "[HOST] leave rejected"),
        }
    }

    /// Догнать каждого пира: все события после его подтверждённого,
    /// по возрастанию id.
    pub fn flush(&mut self) {
        let events = self.replica.events();
        for (peer, entry) in self.peers.iter_mut() {
            let start = entry
                .last_ack
                .map_or(0, |ack| events.partition_point(|e| e.id <= ack));
            for event in &events[start..] {
                if let Err(err) = entry.link.send(&WireMessage::Event(event.clone())) {
                    warn!(peer = %peer, event_id = event.id, error = %err, "[HOST] send failed");
                    entry.link.close();
                    break;
                }
                entry.last_ack = Some(event.id);
            }
        }
    }

    /// Закрыть все соединения (остановка хоста).
    pub fn close_all(&mut self) {
        for (_, entry) in std::mem::take(&mut self.peers) {
            entry.link.close();
        }
    }

    fn after_accept(&mut self, applied: &Applied) {
        for event in &applied.events {
            debug!(event_id = event.id, kind = event.kind.name(), "[HOST] accepted");
        }
        run_effects(self.hooks.as_ref(), &applied.effects);
        self.after_change();
    }

    fn after_change(&mut self) {
        self.flush();
        if let Some(game) = self.replica.game() {
            self.hooks.render(game);
        }
    }

    /// Ответ только отправителю.
    fn reply(&self, peer: &str, msg: WireMessage) {
        if let Some(entry) = self.peers.get(peer) {
            if let Err(err) = entry.link.send(&msg) {
                debug!(peer, error = %err, "[HOST] reply not delivered");
            }
        }
    }
}

/// Команды локального UI хосту.
pub enum HostCommand {
    Submit {
        kind: EventKind,
        reply: oneshot::Sender<Result<Applied, GameError>>,
    },
    Join {
        name: String,
        reply: oneshot::Sender<Result<String, GameError>>,
    },
    Start {
        reply: oneshot::Sender<Result<Applied, GameError>>,
    },
    Shutdown,
}

/// Handle запущенного хоста.
#[derive(Clone)]
pub struct HostHandle {
    room: String,
    commands: mpsc::Sender<HostCommand>,
    snapshot: watch::Receiver<Option<Game>>,
}

impl HostHandle {
    pub fn room(&self) -> &str {
        &self.room
    }

    pub async fn submit(&self, kind: EventKind) -> Result<Applied, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.request(HostCommand::Submit { kind, reply }, rx).await
    }

    pub async fn join(&self, name: &str) -> Result<String, SessionError> {
        let (reply, rx) = oneshot::channel();
        let name = name.to_string();
        self.request(HostCommand::Join { name, reply }, rx).await
    }

    pub async fn start_game(&self) -> Result<Applied, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.request(HostCommand::Start { reply }, rx).await
    }

    pub async fn shutdown(&self) {
        let _ = self.commands.send(HostCommand::Shutdown).await;
    }

    /// Текущий снимок игры.
    pub fn snapshot(&self) -> Option<Game> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Game>> {
        self.snapshot.clone()
    }

    async fn request<T>(
        &self,
        cmd: HostCommand,
        rx: oneshot::Receiver<Result<T, GameError>>,
    ) -> Result<T, SessionError> {
        self.commands
            .send(cmd)
            .await
            .map_err(|_| SessionError::Stopped)?;
        let result = rx.await.map_err(|_| SessionError::Stopped)?;
        Ok(result?)
    }
}

/// Запустить хост поверх потока событий транспорта.
pub fn spawn_host<R>(
    config: HostConfig,
    transport: mpsc::UnboundedReceiver<TransportEvent>,
    rng: R,
    hooks: Arc<dyn UiHooks>,
) -> Result<(HostHandle, JoinHandle<()>), GameError>
where
    R: RandomSource + Send + 'static,
{
    let core = HostCore::new(config, rng, hooks)?;
    let room = core.config().room.clone();
    let (commands_tx, commands_rx) = mpsc::channel(64);
    let (snapshot_tx, snapshot_rx) = watch::channel(core.game().cloned());

    let task = tokio::spawn(run_host(core, transport, commands_rx, snapshot_tx));
    let handle = HostHandle {
        room,
        commands: commands_tx,
        snapshot: snapshot_rx,
    };
    Ok((handle, task))
}

async fn run_host<R: RandomSource>(
    mut core: HostCore<R>,
    mut transport: mpsc::UnboundedReceiver<TransportEvent>,
    mut commands: mpsc::Receiver<HostCommand>,
    snapshot: watch::Sender<Option<Game>>,
) {
    let mut sweep = interval(core.config().rules.sweep_interval);
    sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(room = %core.config().room, "[HOST] session started");

    loop {
        tokio::select! {
            cmd = commands.recv() => match cmd {
                None | Some(HostCommand::Shutdown) => break,
                Some(HostCommand::Submit { kind, reply }) => {
                    let _ = reply.send(core.submit_local(kind));
                }
                Some(HostCommand::Join { name, reply }) => {
                    let _ = reply.send(core.join_local(&name));
                }
                Some(HostCommand::Start { reply }) => {
                    let _ = reply.send(core.start_game());
                }
            },
            event = transport.recv() => match event {
                Some(event) => core.on_transport(event, Instant::now()),
                None => {
                    info!("[HOST] transport closed");
                    break;
                }
            },
            _ = sweep.tick() => {
                core.sweep(Instant::now());
            }
        }

        publish(&snapshot, core.game());
    }

    core.close_all();
    info!(room = %core.config().room, "[HOST] session stopped");
}

/// Обновить снимок, только если лог продвинулся или реплика остановилась.
fn publish(snapshot: &watch::Sender<Option<Game>>, game: Option<&Game>) {
    snapshot.send_if_modified(|current| {
        let stamp = |g: &Game| (g.last_event_id, g.error.is_some());
        if current.as_ref().map(stamp) == game.map(stamp) {
            return false;
        }
        *current = game.cloned();
        true
    });
}
