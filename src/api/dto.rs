use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::{Direction, EventId, GameId};

/// DTO игрока за столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerViewDto {
    pub name: String,
    pub hand_size: usize,
    pub uno: bool,
    pub is_current: bool,
    /// Карты руки – только для самого зрителя.
    pub hand: Option<Vec<Card>>,
}

/// DTO игры с точки зрения одного зрителя.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameViewDto {
    pub game_id: GameId,
    pub viewer: Option<String>,
    pub players: Vec<PlayerViewDto>,
    pub top_card: Option<Card>,
    pub deck_size: usize,
    pub pile_size: usize,
    pub direction: Direction,
    pub current_player: Option<String>,
    pub last_player: Option<String>,
    pub winner: Option<String>,
    pub last_event_id: EventId,
    /// Текст липкой ошибки, если реплика остановлена.
    pub error: Option<String>,
}
