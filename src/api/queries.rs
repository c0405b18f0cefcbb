use crate::domain::card::Card;
use crate::domain::Game;

use super::dto::{GameViewDto, PlayerViewDto};

/// Сформировать DTO игры для `viewer`.
/// Свою руку зритель видит целиком, чужие только размером.
pub fn build_game_view(game: &Game, viewer: Option<&str>) -> GameViewDto {
    let players = game
        .players
        .iter()
        .map(|p| PlayerViewDto {
            name: p.name.clone(),
            hand_size: p.hand.len(),
            uno: p.uno,
            is_current: game.current_player.as_deref() == Some(p.name.as_str()),
            hand: (viewer == Some(p.name.as_str())).then(|| p.hand.clone()),
        })
        .collect();

    GameViewDto {
        game_id: game.id.clone(),
        viewer: viewer.map(str::to_string),
        players,
        top_card: game.top_card().copied(),
        deck_size: game.deck.len(),
        pile_size: game.pile.len(),
        direction: game.direction,
        current_player: game.current_player.clone(),
        last_player: game.last_player.clone(),
        winner: game.winner.clone(),
        last_event_id: game.last_event_id,
        error: game.error.as_ref().map(|e| e.to_string()),
    }
}

/// Можно ли `viewer` кликнуть карту `card` из руки `owner`.
///
/// Только своя рука, только в свой ход, только пока игра идёт.
/// Легальность хода проверяет хост.
pub fn can_play(game: &Game, viewer: &str, owner: &str, card: &Card) -> bool {
    if game.is_over() || game.error.is_some() || viewer != owner {
        return false;
    }
    if game.current_player.as_deref() != Some(owner) {
        return false;
    }
    game.player(owner).is_some_and(|p| p.holds(card))
}
