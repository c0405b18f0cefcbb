use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::card::Card;
use crate::domain::EventId;

/// Ошибки движка уно. Это значения, а не паники: редьюсер их возвращает,
/// хост пересылает отправителю.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum GameError {
    #[error("Событие вне очереди: ожидался id={expected}, пришёл id={received}")]
    OutOfOrder { expected: EventId, received: EventId },

    #[error("Игра уже создана")]
    AlreadyCreated,

    #[error("Игра ещё не создана")]
    NotCreated,

    #[error("Игра уже началась")]
    AlreadyStarted,

    #[error("Игра ещё не началась")]
    NotStarted,

    #[error("Все {capacity} мест заняты")]
    GameFull { capacity: usize },

    #[error("Игра окончена")]
    GameOver,

    #[error("Карту {card} нельзя сыграть")]
    InvalidCard {
        hand: Vec<Card>,
        card: Card,
        pile: Vec<Card>,
    },

    #[error("Игрок {player} не может тянуть карты")]
    InvalidDraw { player: String },

    #[error("Игрок {player} не сидит за столом")]
    UnknownPlayer { player: String },

    #[error("Сейчас ход игрока {current_player}, а не {player}")]
    OutOfTurn {
        player: String,
        current_player: String,
    },

    #[error("Событие {kind} порождает только хост")]
    HostOnly { kind: String },

    #[error("Колода и сброс пусты, раунд не может продолжаться")]
    InfiniteDraw,

    #[error("Внутренняя ошибка: {message}")]
    Unknown { message: String },
}

impl GameError {
    /// Рассинхрон: реплика после такой ошибки останавливается, даже если
    /// её вызвало исходное событие.
    ///
    /// Остальные ошибки исходного события (нелегальный ход, не тот ход,
    /// лобби заполнено, нечего перемешивать) возвращаются только
    /// отправителю. Тупик `infinite-draw` останавливает реплику, только
    /// если случился в каскаде.
    pub fn halts_replica(&self) -> bool {
        matches!(self, GameError::OutOfOrder { .. } | GameError::Unknown { .. })
    }
}
