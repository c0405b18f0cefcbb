use crate::domain::card::{Card, CardFace, CardKind, Color};
use crate::domain::Game;
use crate::engine::errors::GameError;

/// Можно ли положить `new_card` на `top`.
///
/// Первый ход (сброс пуст): можно всё. Дальше: дикая карта, совпадение
/// цвета, совпадение значения у обычных, совпадение "+N" у draw,
/// совпадение типа у skip/reverse/wild.
pub fn is_legal_move(top: Option<&Card>, new_card: &Card) -> bool {
    let Some(top) = top else {
        return true;
    };

    if new_card.color() == Color::Wild || new_card.color() == top.color() {
        return true;
    }

    match (top.face, new_card.face) {
        (CardFace::Normal { value: a, .. }, CardFace::Normal { value: b, .. }) => a == b,
        (CardFace::Draw { amount: a, .. }, CardFace::Draw { amount: b, .. }) => a == b,
        _ => {
            top.kind() == new_card.kind()
                && matches!(top.kind(), CardKind::Skip | CardKind::Reverse | CardKind::Wild)
        }
    }
}

/// Проверка хода целиком: очередь, карта в руке, легальность, выбор цвета.
pub fn validate_play(
    game: &Game,
    player: &str,
    card: &Card,
    chosen_color: Option<Color>,
) -> Result<(), GameError> {
    let current = game.current_player.as_deref().ok_or(GameError::NotStarted)?;
    if current != player {
        return Err(GameError::OutOfTurn {
            player: player.to_string(),
            current_player: current.to_string(),
        });
    }

    let invalid = || GameError::InvalidCard {
        hand: game.player(player).map(|p| p.hand.clone()).unwrap_or_default(),
        card: *card,
        pile: game.pile.clone(),
    };

    let holder = game.player(player).ok_or_else(invalid)?;
    if !holder.holds(card) {
        return Err(invalid());
    }

    if !is_legal_move(game.top_card(), card) {
        return Err(invalid());
    }

    // Дикой карте нужен выбранный (не wild) цвет.
    if card.color() == Color::Wild && !matches!(chosen_color, Some(c) if c != Color::Wild) {
        return Err(invalid());
    }

    Ok(())
}
