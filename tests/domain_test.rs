//! Domain tests for uno-engine
//!
//! Проверяем:
//! - парсинг и отображение карт
//! - формат карт в JSON
//! - состав пула колоды
//! - нормализацию диких карт
//! - направление хода и флаг уно

use uno_engine::domain::{Card, CardFace, CardKind, Color, Deck, Direction, Game, Player};

fn card(id: u32, s: &str) -> Card {
    Card::new(id, s.parse().expect("valid card"))
}

//
// TEST 1 — парсинг лица карты
//
#[test]
fn card_face_parses_all_shapes() {
    assert_eq!("R7".parse::<CardFace>(), Ok(CardFace::Normal { color: Color::Red, value: 7 }));
    assert_eq!("GS".parse::<CardFace>(), Ok(CardFace::Skip { color: Color::Green }));
    assert_eq!("BR".parse::<CardFace>(), Ok(CardFace::Reverse { color: Color::Blue }));
    assert_eq!("Y+2".parse::<CardFace>(), Ok(CardFace::Draw { color: Color::Yellow, amount: 2 }));
    assert_eq!("W".parse::<CardFace>(), Ok(CardFace::Wild { color: Color::Wild }));
    assert_eq!("W+4".parse::<CardFace>(), Ok(CardFace::Draw { color: Color::Wild, amount: 4 }));

    assert!("".parse::<CardFace>().is_err());
    assert!("X1".parse::<CardFace>().is_err());
    assert!("R10".parse::<CardFace>().is_err());
    assert!("W+2".parse::<CardFace>().is_err());
}

#[test]
fn card_display_includes_id() {
    assert_eq!(card(3, "R7").to_string(), "R7#3");
    assert_eq!(card(9, "W+4").to_string(), "W+4#9");
    assert_eq!(card(1, "GS").to_string(), "GS#1");
}

//
// TEST 2 — формат JSON: плоский объект с полем type
//
#[test]
fn card_serializes_flat_with_type_tag() {
    let json = serde_json::to_value(card(3, "R7")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "id": 3, "type": "normal", "color": "red", "value": 7 })
    );

    let json = serde_json::to_value(card(5, "W+4")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "id": 5, "type": "draw", "color": "wild", "amount": 4 })
    );

    let back: Card = serde_json::from_value(json).unwrap();
    assert_eq!(back, card(5, "W+4"));
}

#[test]
fn cards_with_same_face_but_different_id_are_distinct() {
    assert_ne!(card(1, "R7"), card(2, "R7"));
    assert_eq!(card(1, "R7").kind(), CardKind::Normal);
}

//
// TEST 3 — состав пула
//
#[test]
fn single_deck_pool_has_108_cards() {
    let pool = Deck::uno_pool(2);
    assert_eq!(Deck::decks_for(2), 1);
    assert_eq!(pool.len(), 108);

    let zeros = pool
        .cards
        .iter()
        .filter(|c| matches!(c.face, CardFace::Normal { value: 0, .. }))
        .count();
    let wilds = pool.cards.iter().filter(|c| c.kind() == CardKind::Wild).count();
    let wild_draws = pool
        .cards
        .iter()
        .filter(|c| matches!(c.face, CardFace::Draw { amount: 4, .. }))
        .count();
    let draw_twos = pool
        .cards
        .iter()
        .filter(|c| matches!(c.face, CardFace::Draw { amount: 2, .. }))
        .count();

    assert_eq!(zeros, 4);
    assert_eq!(wilds, 4);
    assert_eq!(wild_draws, 4);
    assert_eq!(draw_twos, 8);
}

#[test]
fn pool_grows_with_player_count_and_ids_stay_unique() {
    assert_eq!(Deck::decks_for(3), 1);
    assert_eq!(Deck::decks_for(4), 2);
    assert_eq!(Deck::decks_for(10), 3);

    let pool = Deck::uno_pool(10);
    assert_eq!(pool.len(), 3 * 100 + 8);

    let mut ids: Vec<u32> = pool.cards.iter().map(|c| c.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), pool.len());
}

#[test]
fn pool_order_starts_with_red_numbers() {
    let pool = Deck::uno_pool(2);
    assert_eq!(pool.cards[0], card(0, "R0"));
    assert_eq!(pool.cards[1], card(1, "R1"));
    assert_eq!(pool.cards[2], card(2, "R1"));
}

//
// TEST 4 — колода: взятие с начала
//
#[test]
fn draw_takes_from_front_and_stops_when_empty() {
    let mut deck = Deck::new(vec![card(1, "R1"), card(2, "R2"), card(3, "R3")]);

    assert_eq!(deck.draw_n(1), vec![card(1, "R1")]);
    assert_eq!(deck.draw_n(5), vec![card(2, "R2"), card(3, "R3")]);
    assert!(deck.is_empty());
    assert!(deck.draw_n(1).is_empty());
}

#[test]
fn normalize_wilds_resets_chosen_colors_only() {
    let mut deck = Deck::new(vec![
        card(1, "W").with_color(Color::Red),
        card(2, "W+4").with_color(Color::Blue),
        card(3, "G+2"),
    ]);
    deck.normalize_wilds();

    assert_eq!(deck.cards[0].color(), Color::Wild);
    assert_eq!(deck.cards[1].color(), Color::Wild);
    assert_eq!(deck.cards[2].color(), Color::Green);
}

//
// TEST 5 — направление и игрок
//
#[test]
fn direction_serializes_as_signed_step() {
    assert_eq!(serde_json::to_string(&Direction::Forward).unwrap(), "1");
    assert_eq!(serde_json::to_string(&Direction::Backward).unwrap(), "-1");
    assert_eq!(serde_json::from_str::<Direction>("-1").unwrap(), Direction::Backward);
    assert!(serde_json::from_str::<Direction>("2").is_err());
    assert_eq!(Direction::Forward.flipped(), Direction::Backward);
}

#[test]
fn uno_flag_tracks_single_card() {
    let mut p = Player::new("Ann");
    p.hand.push(card(1, "R1"));
    p.refresh_uno();
    assert!(p.uno);

    p.hand.push(card(2, "R2"));
    p.refresh_uno();
    assert!(!p.uno);
}

#[test]
fn new_game_is_empty_and_not_started() {
    let game = Game::new("G1".to_string(), 4);
    assert!(!game.is_started());
    assert!(!game.is_over());
    assert_eq!(game.total_cards(), 0);
    assert_eq!(game.direction, Direction::Forward);
    assert!(game.top_card().is_none());
}

#[test]
fn game_serializes_in_camel_case() {
    let game = Game::new("G1".to_string(), 4);
    let json = serde_json::to_value(&game).unwrap();
    assert_eq!(json["lastEventId"], 0);
    assert_eq!(json["playerCount"], 4);
    assert_eq!(json["direction"], 1);
    assert!(json["currentPlayer"].is_null());
}
