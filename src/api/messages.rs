//! Сообщения по проводу между хостом и клиентами.
//!
//! Все сообщения — JSON-объекты с полем `type`. Различаем их по форме:
//! у принятого события есть `id`, у кандидата его нет, у ошибки есть
//! флаг `err`, служебные сообщения имеют свои типы.

use serde::{Deserialize, Serialize};

use crate::engine::{EventKind, GameError, GameEvent};

use super::errors::ErrorMessage;

/// Служебные сообщения, не попадающие в лог.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ControlMessage {
    /// Клиент → хост: "я жив".
    Heartbeat,
    /// Хост → клиент: игра уже идёт, присоединиться можно только зрителем.
    AlreadyStarted,
    /// Хост → клиент: под каким именем принят `join`.
    NameAssigned { requested: String, assigned: String },
}

/// Любое сообщение по проводу.
///
/// Порядок вариантов важен: serde пробует их сверху вниз.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum WireMessage {
    /// Хост → клиент: событие из лога, с номером.
    Event(GameEvent),
    /// Клиент → хост: кандидат без номера.
    Candidate(EventKind),
    /// Хост → клиент: отказ по кандидату этого клиента.
    Error(ErrorMessage),
    Control(ControlMessage),
}

impl WireMessage {
    pub fn heartbeat() -> Self {
        WireMessage::Control(ControlMessage::Heartbeat)
    }

    pub fn already_started() -> Self {
        WireMessage::Control(ControlMessage::AlreadyStarted)
    }

    pub fn name_assigned(requested: impl Into<String>, assigned: impl Into<String>) -> Self {
        WireMessage::Control(ControlMessage::NameAssigned {
            requested: requested.into(),
            assigned: assigned.into(),
        })
    }

    /// Короткое имя для логов.
    pub fn label(&self) -> &'static str {
        match self {
            WireMessage::Event(event) => event.kind.name(),
            WireMessage::Candidate(kind) => kind.name(),
            WireMessage::Error(_) => "error",
            WireMessage::Control(ControlMessage::Heartbeat) => "heartbeat",
            WireMessage::Control(ControlMessage::AlreadyStarted) => "already-started",
            WireMessage::Control(ControlMessage::NameAssigned { .. }) => "name-assigned",
        }
    }
}

impl From<GameEvent> for WireMessage {
    fn from(event: GameEvent) -> Self {
        WireMessage::Event(event)
    }
}

impl From<EventKind> for WireMessage {
    fn from(kind: EventKind) -> Self {
        WireMessage::Candidate(kind)
    }
}

impl From<GameError> for WireMessage {
    fn from(err: GameError) -> Self {
        WireMessage::Error(err.into())
    }
}

/// Сообщение → JSON-кадр.
pub fn encode(msg: &WireMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}

/// JSON-кадр → сообщение.
pub fn decode(frame: &str) -> Result<WireMessage, serde_json::Error> {
    serde_json::from_str(frame)
}
