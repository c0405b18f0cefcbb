//! API-layer tests for uno-engine
//!
//! Проверяем:
//! - форму сообщений по проводу и порядок распознавания;
//! - форму ошибок для клиента;
//! - DTO игры (чужие руки скрыты);
//! - `can_play`.

use serde_json::json;

use uno_engine::api::{
    build_game_view, can_play, decode, encode, ControlMessage, ErrorMessage, WireMessage,
};
use uno_engine::domain::{Card, Color, Deck, Direction, Game, Player};
use uno_engine::engine::{EventKind, GameError, GameEvent};

fn card(id: u32, s: &str) -> Card {
    Card::new(id, s.parse().expect("valid card"))
}

/// Утилита: начатая игра на двоих, ход у Ann.
fn table() -> Game {
    let mut game = Game::new("ROOM".to_string(), 4);
    game.players = vec![Player::new("Ann"), Player::new("Bo")];
    game.players[0].hand = vec![card(1, "R1"), card(2, "G5")];
    game.players[1].hand = vec![card(3, "B2")];
    game.players[1].uno = true;
    game.deck = Deck::new(vec![card(4, "Y9"), card(5, "W")]);
    game.pile = vec![card(6, "R3")];
    game.current_player = Some("Ann".to_string());
    game.last_event_id = 17;
    game
}

// ============ WIRE ============

#[test]
fn numbered_event_encodes_flat_with_id() {
    let event = GameEvent::new(
        3,
        EventKind::Join {
            player: "Ann".to_string(),
        },
    );
    let frame = encode(&WireMessage::Event(event.clone())).unwrap();
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(value, json!({"id": 3, "type": "join", "player": "Ann"}));

    assert_eq!(decode(&frame).unwrap(), WireMessage::Event(event));
}

#[test]
fn candidate_has_no_id() {
    let kind = EventKind::Draw {
        player: "Bo".to_string(),
        count: 1,
    };
    let frame = encode(&kind.clone().into()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(value, json!({"type": "draw", "player": "Bo", "count": 1}));

    assert_eq!(decode(&frame).unwrap(), WireMessage::Candidate(kind));
}

#[test]
fn play_candidate_carries_card_and_chosen_color() {
    let frame = json!({
        "type": "play",
        "player": "Ann",
        "card": {"id": 7, "type": "wild", "color": "wild"},
        "chosenColor": "blue"
    })
    .to_string();

    match decode(&frame).unwrap() {
        WireMessage::Candidate(EventKind::Play {
            player,
            card,
            chosen_color,
        }) => {
            assert_eq!(player, "Ann");
            assert_eq!(card.id, 7);
            assert_eq!(card.color(), Color::Wild);
            assert_eq!(chosen_color, Some(Color::Blue));
        }
        other => panic!("unexpected message {other:?}"),
    }
}

#[test]
fn create_without_player_count_uses_default() {
    let msg = decode(r#"{"id":0,"type":"create","gameId":"ABC"}"#).unwrap();
    assert_eq!(
        msg,
        WireMessage::Event(GameEvent::new(
            0,
            EventKind::Create {
                game_id: "ABC".to_string(),
                player_count: 10,
            }
        ))
    );
}

#[test]
fn error_message_is_flat_with_err_flag() {
    let err = GameError::OutOfTurn {
        player: "Bo".to_string(),
        current_player: "Ann".to_string(),
    };
    let frame = encode(&err.clone().into()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(
        value,
        json!({"err": true, "type": "out-of-turn", "player": "Bo", "currentPlayer": "Ann"})
    );

    assert_eq!(
        decode(&frame).unwrap(),
        WireMessage::Error(ErrorMessage::from(err))
    );
}

#[test]
fn host_only_error_names_the_rejected_kind() {
    let err = GameError::HostOnly {
        kind: "shuffle".to_string(),
    };
    let frame = encode(&err.clone().into()).unwrap();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&frame).unwrap(),
        json!({"err": true, "type": "host-only", "kind": "shuffle"})
    );
    assert_eq!(decode(&frame).unwrap(), WireMessage::Error(ErrorMessage::from(err)));
}

#[test]
fn unit_errors_and_control_messages_do_not_collide() {
    // одинаковый type, различает только флаг err
    let as_error = encode(&GameError::AlreadyStarted.into()).unwrap();
    let as_control = encode(&WireMessage::already_started()).unwrap();

    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&as_control).unwrap(),
        json!({"type": "already-started"})
    );
    assert!(matches!(decode(&as_error).unwrap(), WireMessage::Error(_)));
    assert_eq!(
        decode(&as_control).unwrap(),
        WireMessage::Control(ControlMessage::AlreadyStarted)
    );
}

#[test]
fn control_messages_shapes() {
    assert_eq!(
        encode(&WireMessage::heartbeat()).unwrap(),
        r#"{"type":"heartbeat"}"#
    );

    let frame = encode(&WireMessage::name_assigned("Ann", "Ann II")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(
        value,
        json!({"type": "name-assigned", "requested": "Ann", "assigned": "Ann II"})
    );
    assert_eq!(decode(&frame).unwrap().label(), "name-assigned");
}

#[test]
fn garbage_frames_fail_to_decode() {
    assert!(decode("not json").is_err());
    assert!(decode(r#"{"type":"teleport"}"#).is_err());
    assert!(decode(r#"{"id":1}"#).is_err());
}

// ============ VIEW ============

#[test]
fn view_shows_only_viewers_hand() {
    let game = table();
    let view = build_game_view(&game, Some("Ann"));

    assert_eq!(view.game_id, "ROOM");
    assert_eq!(view.viewer.as_deref(), Some("Ann"));
    assert_eq!(view.players.len(), 2);

    let ann = &view.players[0];
    assert_eq!(ann.hand_size, 2);
    assert!(ann.is_current);
    assert_eq!(ann.hand.as_ref().map(Vec::len), Some(2));

    let bo = &view.players[1];
    assert_eq!(bo.hand_size, 1);
    assert!(bo.uno);
    assert!(!bo.is_current);
    assert!(bo.hand.is_none());

    assert_eq!(view.top_card, Some(card(6, "R3")));
    assert_eq!(view.deck_size, 2);
    assert_eq!(view.pile_size, 1);
    assert_eq!(view.direction, Direction::Forward);
    assert_eq!(view.last_event_id, 17);
    assert!(view.error.is_none());
}

#[test]
fn spectator_view_hides_all_hands() {
    let view = build_game_view(&table(), None);
    assert!(view.players.iter().all(|p| p.hand.is_none()));
}

#[test]
fn view_serializes_camel_case_and_reports_error() {
    let mut game = table();
    game.error = Some(GameError::InfiniteDraw);
    let view = build_game_view(&game, Some("Bo"));
    assert!(view.error.is_some());

    let value = serde_json::to_value(&view).unwrap();
    assert!(value.get("deckSize").is_some());
    assert!(value.get("currentPlayer").is_some());
    assert!(value["players"][1].get("handSize").is_some());
}

// ============ CAN PLAY ============

#[test]
fn can_play_only_own_card_on_own_turn() {
    let game = table();
    assert!(can_play(&game, "Ann", "Ann", &card(1, "R1")));
    // чужая рука
    assert!(!can_play(&game, "Bo", "Ann", &card(1, "R1")));
    // не его ход
    assert!(!can_play(&game, "Bo", "Bo", &card(3, "B2")));
    // такой карты в руке нет
    assert!(!can_play(&game, "Ann", "Ann", &card(3, "B2")));
}

#[test]
fn can_play_is_off_when_game_over_or_halted() {
    let mut over = table();
    over.winner = Some("Bo".to_string());
    assert!(!can_play(&over, "Ann", "Ann", &card(1, "R1")));

    let mut halted = table();
    halted.error = Some(GameError::InfiniteDraw);
    assert!(!can_play(&halted, "Ann", "Ann", &card(1, "R1")));
}
