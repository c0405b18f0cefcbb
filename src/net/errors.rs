use thiserror::Error;

use crate::engine::GameError;

/// Ошибки транспорта.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Соединение закрыто")]
    Closed,

    #[error("Комната {0} недоступна")]
    Unreachable(String),

    #[error("Комната {0} уже занята")]
    AddressInUse(String),

    #[error("Не удалось разобрать сообщение: {0}")]
    Codec(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Codec(err.to_string())
    }
}

/// Ошибки уровня сессии (хоста или клиента).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Цикл сессии уже завершился (handle пережил сессию).
    #[error("Сессия остановлена")]
    Stopped,
}
