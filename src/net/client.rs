//! Клиент: отправляет кандидатов хосту и реплеит всё, что хост принял.
//!
//! Собственные кандидаты локально не применяются: состояние меняется
//! только событиями от хоста, в порядке их номеров.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::api::{decode, ControlMessage, WireMessage};
use crate::domain::Game;
use crate::engine::{EventKind, Replica};
use crate::time_ctrl::{LivenessRules, ReconnectBackoff, RetryStep};

use super::errors::SessionError;
use super::hooks::{run_effects, UiHooks};
use super::transport::{Connection, Connector};

/// Настройки клиента.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub rules: LivenessRules,
}

impl ClientConfig {
    pub fn new(rules: LivenessRules) -> Self {
        Self { rules }
    }
}

/// Роль клиента в игре.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClientMode {
    /// Может присоединиться и играть.
    #[default]
    Player,
    /// Игра началась без него: только смотрит.
    Spectator,
}

/// Синхронная часть клиента: реплика, роль, имя.
pub struct ClientCore {
    replica: Replica,
    mode: ClientMode,
    identity: Option<String>,
    hooks: Arc<dyn UiHooks>,
}

impl ClientCore {
    pub fn new(hooks: Arc<dyn UiHooks>) -> Self {
        Self {
            replica: Replica::new(),
            mode: ClientMode::Player,
            identity: None,
            hooks,
        }
    }

    pub fn game(&self) -> Option<&Game> {
        self.replica.game()
    }

    pub fn replica(&self) -> &Replica {
        &self.replica
    }

    /// Имя, под которым хост посадил этого клиента.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn mode(&self) -> ClientMode {
        self.mode
    }

    /// Новое соединение: хост пришлёт лог с начала. Остановленная
    /// реплика пересобирается с нуля, целая просто пропустит повторы.
    pub fn on_connected(&mut self) {
        if self.replica.is_halted() {
            info!("[CLNT] replica halted, full resync");
            self.replica.reset();
        }
    }

    pub fn on_frame(&mut self, frame: &str) {
        match decode(frame) {
            Ok(msg) => self.on_message(msg),
            Err(err) => warn!(error = %err, "[CLNT] undecodable frame dropped"),
        }
    }

    pub fn on_message(&mut self, msg: WireMessage) {
        match msg {
            WireMessage::Event(event) => {
                let leaver = match &event.kind {
                    EventKind::Leave { player, .. } => Some(player.clone()),
                    _ => None,
                };
                match self.replica.replay(&event) {
                    Ok(effects) => {
                        debug!(event_id = event.id, kind = event.kind.name(), "[CLNT] replayed");
                        if leaver.is_some() && leaver.as_deref() == self.identity.as_deref() {
                            info!("[CLNT] our player left the game");
                            self.identity = None;
                        }
                        run_effects(self.hooks.as_ref(), &effects);
                        if let Some(game) = self.replica.game() {
                            self.hooks.render(game);
                        }
                    }
                    Err(err) => {
                        error!(event_id = event.id, error = %err, "[CLNT] replica diverged");
                        self.hooks.show_error(&err);
                    }
                }
            }
            WireMessage::Error(msg) => {
                warn!(error = %msg.error, "[CLNT] host rejected our input");
                self.hooks.show_error(&msg.error);
            }
            WireMessage::Control(ControlMessage::AlreadyStarted) => {
                if self.identity.is_none() {
                    info!("[CLNT] game already started, spectating");
                    self.mode = ClientMode::Spectator;
                    self.hooks.spectate();
                }
            }
            WireMessage::Control(ControlMessage::NameAssigned {
                requested,
                assigned,
            }) => {
                if requested != assigned {
                    info!(requested = %requested, assigned = %assigned, "[CLNT] name taken, renamed");
                }
                self.identity = Some(assigned);
                self.mode = ClientMode::Player;
            }
            other => debug!(kind = other.label(), "[CLNT] unexpected message ignored"),
        }
    }

    pub fn view(&self, connected: bool) -> ClientView {
        ClientView {
            game: self.replica.game().cloned(),
            identity: self.identity.clone(),
            mode: self.mode,
            connected,
        }
    }
}

/// Снимок клиента для UI.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientView {
    pub game: Option<Game>,
    pub identity: Option<String>,
    pub mode: ClientMode,
    pub connected: bool,
}

enum ClientCommand {
    Submit(EventKind),
    Shutdown,
}

/// Handle запущенного клиента.
#[derive(Clone)]
pub struct ClientHandle {
    commands: mpsc::UnboundedSender<ClientCommand>,
    view: watch::Receiver<ClientView>,
}

impl ClientHandle {
    /// Отправить кандидата. Ответ придёт событием или ошибкой от хоста.
    pub fn submit(&self, kind: EventKind) -> Result<(), SessionError> {
        self.commands
            .send(ClientCommand::Submit(kind))
            .map_err(|_| SessionError::Stopped)
    }

    pub fn join(&self, name: &str) -> Result<(), SessionError> {
        self.submit(EventKind::Join {
            player: name.to_string(),
        })
    }

    pub fn shutdown(&self) {
        let _ = self.commands.send(ClientCommand::Shutdown);
    }

    pub fn view(&self) -> ClientView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ClientView> {
        self.view.clone()
    }
}

/// Запустить клиента: подключение, heartbeat, переподключение.
pub fn spawn_client(
    config: ClientConfig,
    connector: Arc<dyn Connector>,
    hooks: Arc<dyn UiHooks>,
) -> (ClientHandle, JoinHandle<()>) {
    let core = ClientCore::new(hooks);
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (view_tx, view_rx) = watch::channel(core.view(false));

    let task = tokio::spawn(run_client(core, connector, config, commands_rx, view_tx));
    let handle = ClientHandle {
        commands: commands_tx,
        view: view_rx,
    };
    (handle, task)
}

enum PumpExit {
    Shutdown,
    Disconnected,
}

struct ClientSession {
    core: ClientCore,
    commands: mpsc::UnboundedReceiver<ClientCommand>,
    /// Кандидаты, поданные без соединения.
    outbox: VecDeque<EventKind>,
    view: watch::Sender<ClientView>,
    rules: LivenessRules,
}

async fn run_client(
    core: ClientCore,
    connector: Arc<dyn Connector>,
    config: ClientConfig,
    commands: mpsc::UnboundedReceiver<ClientCommand>,
    view: watch::Sender<ClientView>,
) {
    let mut session = ClientSession {
        core,
        commands,
        outbox: VecDeque::new(),
        view,
        rules: config.rules,
    };
    let mut backoff = ReconnectBackoff::new(&config.rules);

    loop {
        match connector.connect().await {
            Ok(conn) => {
                backoff.on_success();
                info!("[CLNT] connected");
                session.core.on_connected();
                session.publish(true);
                match session.pump(conn).await {
                    PumpExit::Shutdown => break,
                    PumpExit::Disconnected => {
                        warn!("[CLNT] connection lost");
                        session.publish(false);
                    }
                }
            }
            Err(err) => match backoff.on_failure() {
                RetryStep::Retry { attempt } => {
                    warn!(attempt, error = %err, "[CLNT] connect failed");
                }
                RetryStep::ResetConnector => {
                    warn!(error = %err, "[CLNT] connect keeps failing, resetting connector");
                    connector.reset();
                }
            },
        }

        if !session.wait(backoff.interval()).await {
            break;
        }
    }

    info!("[CLNT] session stopped");
}

impl ClientSession {
    /// Пауза перед следующей попыткой. `false`, если пришла команда остановки.
    async fn wait(&mut self, delay: std::time::Duration) -> bool {
        let pause = sleep(delay);
        tokio::pin!(pause);
        loop {
            tokio::select! {
                _ = &mut pause => return true,
                cmd = self.commands.recv() => match cmd {
                    None | Some(ClientCommand::Shutdown) => return false,
                    Some(ClientCommand::Submit(kind)) => self.outbox.push_back(kind),
                },
            }
        }
    }

    async fn pump(&mut self, conn: Connection) -> PumpExit {
        let Connection { link, mut inbound } = conn;

        while let Some(kind) = self.outbox.pop_front() {
            if let Err(err) = link.send(&WireMessage::Candidate(kind.clone())) {
                warn!(error = %err, "[CLNT] send failed");
                self.outbox.push_front(kind);
                return PumpExit::Disconnected;
            }
        }

        let mut heartbeat = interval(self.rules.heartbeat_interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    None | Some(ClientCommand::Shutdown) => {
                        link.close();
                        return PumpExit::Shutdown;
                    }
                    Some(ClientCommand::Submit(kind)) => {
                        debug!(kind = kind.name(), "[CLNT] submitting");
                        if let Err(err) = link.send(&WireMessage::Candidate(kind.clone())) {
                            warn!(error = %err, "[CLNT] send failed");
                            self.outbox.push_back(kind);
                            return PumpExit::Disconnected;
                        }
                    }
                },
                _ = heartbeat.tick() => {
                    if let Err(err) = link.send(&WireMessage::heartbeat()) {
                        warn!(error = %err, "[CLNT] heartbeat send failed");
                        return PumpExit::Disconnected;
                    }
                }
                frame = inbound.recv() => match frame {
                    Some(frame) => {
                        self.core.on_frame(&frame);
                        if self.core.replica().is_halted() {
                            warn!("[CLNT] replica diverged, reconnecting for full resync");
                            link.close();
                            return PumpExit::Disconnected;
                        }
                        self.publish(true);
                    }
                    None => return PumpExit::Disconnected,
                },
            }
        }
    }

    fn publish(&self, connected: bool) {
        let next = self.core.view(connected);
        self.view.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}
