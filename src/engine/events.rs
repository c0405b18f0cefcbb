use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Color};
use crate::domain::deck::Deck;
use crate::domain::{EventId, GameId, Seed};

/// Вместимость лобби, если `create` её не указал.
pub const DEFAULT_PLAYER_COUNT: usize = 10;

fn default_player_count() -> usize {
    DEFAULT_PLAYER_COUNT
}

/// Тип события игры (без номера). Именно это клиент отправляет хосту
/// как кандидата, а редьюсер возвращает как каскад.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum EventKind {
    Create {
        game_id: GameId,
        #[serde(default = "default_player_count")]
        player_count: usize,
    },
    Join {
        player: String,
    },
    Leave {
        player: String,
        seed: Seed,
    },
    Start {
        deck: Deck,
        start_player: String,
    },
    Draw {
        player: String,
        count: usize,
    },
    Play {
        player: String,
        card: Card,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chosen_color: Option<Color>,
    },
    Uno {
        caller: String,
        target: String,
    },
    Shuffle {
        seed: Seed,
    },
    End {
        winner: String,
        reason: String,
    },
}

impl EventKind {
    /// Короткое имя для логов.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Create { .. } => "create",
            EventKind::Join { .. } => "join",
            EventKind::Leave { .. } => "leave",
            EventKind::Start { .. } => "start",
            EventKind::Draw { .. } => "draw",
            EventKind::Play { .. } => "play",
            EventKind::Uno { .. } => "uno",
            EventKind::Shuffle { .. } => "shuffle",
            EventKind::End { .. } => "end",
        }
    }

    /// `create`, `start`, `shuffle` и `end` порождает только хост:
    /// от пиров они не принимаются.
    pub fn is_peer_submittable(&self) -> bool {
        !matches!(
            self,
            EventKind::Create { .. }
                | EventKind::Start { .. }
                | EventKind::Shuffle { .. }
                | EventKind::End { .. }
        )
    }

    pub fn with_id(self, id: EventId) -> GameEvent {
        GameEvent { id, kind: self }
    }
}

/// Событие в логе с порядковым номером, назначенным хостом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEvent {
    pub id: EventId,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl GameEvent {
    pub fn new(id: EventId, kind: EventKind) -> Self {
        Self { id, kind }
    }
}
