use serde::{Deserialize, Serialize};

use crate::engine::GameError;

/// Ошибка, как её видит клиент: `{"err": true, "type": ..., ...поля}`.
///
/// Только для обратной связи в UI, к состоянию не применяется.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorMessage {
    pub err: bool,
    #[serde(flatten)]
    pub error: GameError,
}

impl From<GameError> for ErrorMessage {
    fn from(error: GameError) -> Self {
        Self { err: true, error }
    }
}
