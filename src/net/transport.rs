//! Узкий интерфейс транспорта: отправить, получить, узнать о закрытии.
//!
//! Хост и клиент зависят только от этих типов, а не от конкретной сети.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::api::WireMessage;

use super::errors::TransportError;

/// Идентификатор соединения (выдаёт транспорт).
pub type PeerId = String;

/// Один конец соединения.
pub trait PeerLink: Send + Sync + fmt::Debug {
    /// Кто на другом конце.
    fn peer_id(&self) -> &str;

    /// Закодировать и отправить сообщение. Не блокирует.
    fn send(&self, msg: &WireMessage) -> Result<(), TransportError>;

    fn is_open(&self) -> bool;

    /// Закрыть соединение. Повторный вызов ничего не делает.
    fn close(&self);
}

pub type Link = Arc<dyn PeerLink>;

/// Клиентская сторона открытого соединения.
pub struct Connection {
    pub link: Link,
    /// Входящие JSON-кадры от хоста. `None`: соединение потеряно.
    pub inbound: mpsc::UnboundedReceiver<String>,
}

/// Что транспорт сообщает хосту.
#[derive(Debug)]
pub enum TransportEvent {
    Opened { peer: PeerId, link: Link },
    Frame { peer: PeerId, frame: String },
    Closed { peer: PeerId },
}

/// Как клиент открывает соединение с хостом.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Connection, TransportError>;

    /// Выбросить внутренний handle и начать с чистого.
    fn reset(&self) {}
}
