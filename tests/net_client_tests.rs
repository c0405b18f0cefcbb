//! Client core tests for uno-engine
//!
//! `ClientCore` без сети: кадры подаются напрямую.

use std::sync::Arc;

use parking_lot::Mutex;

use uno_engine::api::{encode, WireMessage};
use uno_engine::domain::Game;
use uno_engine::engine::{build_deck, EventKind, GameError, GameEvent, Replica, Sound};
use uno_engine::net::{ClientCore, ClientMode, UiHooks};

#[derive(Default)]
struct Recorder {
    renders: Mutex<Vec<u64>>,
    sounds: Mutex<Vec<Sound>>,
    errors: Mutex<Vec<GameError>>,
    spectating: Mutex<bool>,
}

impl UiHooks for Recorder {
    fn render(&self, game: &Game) {
        self.renders.lock().push(game.last_event_id);
    }

    fn play_sound(&self, sound: Sound) {
        self.sounds.lock().push(sound);
    }

    fn show_error(&self, error: &GameError) {
        self.errors.lock().push(error.clone());
    }

    fn spectate(&self) {
        *self.spectating.lock() = true;
    }
}

fn core() -> (ClientCore, Arc<Recorder>) {
    let hooks = Arc::new(Recorder::default());
    (ClientCore::new(hooks.clone()), hooks)
}

/// Лог хоста: create, два join, start с раздачей.
fn host_log() -> Vec<GameEvent> {
    let mut host = Replica::new();
    host.submit(EventKind::Create {
        game_id: "ROOM".to_string(),
        player_count: 4,
    })
    .unwrap();
    for name in ["Ann", "Bo"] {
        host.submit(EventKind::Join {
            player: name.to_string(),
        })
        .unwrap();
    }
    host.submit(EventKind::Start {
        deck: build_deck(2, 8),
        start_player: "Ann".to_string(),
    })
    .unwrap();
    host.events().to_vec()
}

// TEST 1 — события реплеятся, UI получает звуки и перерисовку
#[test]
fn events_are_replayed_with_effects() {
    let (mut client, hooks) = core();
    for event in host_log() {
        client.on_frame(&encode(&WireMessage::Event(event)).unwrap());
    }

    let game = client.game().unwrap();
    assert!(game.is_started());
    assert_eq!(game.last_event_id, 5);
    assert_eq!(*hooks.renders.lock(), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(
        *hooks.sounds.lock(),
        vec![Sound::Shuffle, Sound::Draw, Sound::Draw]
    );
    assert!(hooks.errors.lock().is_empty());
}

// TEST 2 — дыра в номерах останавливает реплику, on_connected её сбрасывает
#[test]
fn gap_halts_replica_until_reconnect() {
    let (mut client, hooks) = core();
    let log = host_log();

    client.on_message(WireMessage::Event(log[0].clone()));
    client.on_message(WireMessage::Event(log[3].clone()));

    assert!(client.replica().is_halted());
    assert_eq!(
        *hooks.errors.lock(),
        vec![GameError::OutOfOrder {
            expected: 1,
            received: 3
        }]
    );

    client.on_connected();
    assert!(client.game().is_none());
    for event in &log {
        client.on_message(WireMessage::Event(event.clone()));
    }
    assert!(!client.replica().is_halted());
    assert_eq!(client.game().unwrap().last_event_id, 5);
}

// TEST 3 — целая реплика при переподключении не сбрасывается
#[test]
fn healthy_replica_survives_reconnect() {
    let (mut client, _) = core();
    for event in host_log() {
        client.on_message(WireMessage::Event(event));
    }
    let before = client.game().cloned();

    client.on_connected();
    for event in host_log() {
        client.on_message(WireMessage::Event(event));
    }
    assert_eq!(client.game().cloned(), before);
}

// TEST 4 — имя от хоста
#[test]
fn name_assigned_sets_identity() {
    let (mut client, _) = core();
    assert_eq!(client.identity(), None);

    client.on_message(WireMessage::name_assigned("Ann", "Ann II"));
    assert_eq!(client.identity(), Some("Ann II"));
    assert_eq!(client.mode(), ClientMode::Player);

    let view = client.view(true);
    assert_eq!(view.identity.as_deref(), Some("Ann II"));
    assert!(view.connected);
}

// TEST 5 — игра уже идёт: режим зрителя
#[test]
fn already_started_switches_to_spectator() {
    let (mut client, hooks) = core();
    client.on_message(WireMessage::already_started());

    assert_eq!(client.mode(), ClientMode::Spectator);
    assert!(*hooks.spectating.lock());
}

#[test]
fn already_started_is_ignored_for_seated_player() {
    let (mut client, hooks) = core();
    client.on_message(WireMessage::name_assigned("Ann", "Ann"));
    client.on_message(WireMessage::already_started());

    assert_eq!(client.mode(), ClientMode::Player);
    assert!(!*hooks.spectating.lock());
}

// TEST 6 — свой leave стирает имя
#[test]
fn own_leave_clears_identity() {
    let (mut client, _) = core();
    let log = host_log();
    for event in &log {
        client.on_message(WireMessage::Event(event.clone()));
    }
    client.on_message(WireMessage::name_assigned("Bo", "Bo"));

    let leave = GameEvent::new(
        6,
        EventKind::Leave {
            player: "Bo".to_string(),
            seed: 3,
        },
    );
    client.on_message(WireMessage::Event(leave));

    assert_eq!(client.identity(), None);
    assert!(client.game().unwrap().player("Bo").is_none());
}

// TEST 7 — отказ хоста только показывается
#[test]
fn host_error_is_shown_without_touching_state() {
    let (mut client, hooks) = core();
    for event in host_log() {
        client.on_message(WireMessage::Event(event));
    }
    let before = client.game().cloned();

    client.on_message(GameError::NotStarted.into());
    client.on_frame("garbage");

    assert_eq!(*hooks.errors.lock(), vec![GameError::NotStarted]);
    assert_eq!(client.game().cloned(), before);
    assert!(!client.replica().is_halted());
}
