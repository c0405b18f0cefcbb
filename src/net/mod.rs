//! Протокол репликации поверх узкого транспортного шва.
//!
//! - `transport` — `PeerLink`, `Connection`, `Connector`, события транспорта;
//! - `memory` — транспорт в памяти процесса;
//! - `host` — авторитетная сессия: приём кандидатов, рассылка лога, живость;
//! - `client` — реплика клиента, heartbeat, переподключение, режим зрителя;
//! - `hooks` — что сессии отдают UI.

pub mod client;
pub mod errors;
pub mod hooks;
pub mod host;
pub mod memory;
pub mod transport;

pub use client::{spawn_client, ClientConfig, ClientCore, ClientHandle, ClientMode, ClientView};
pub use errors::{SessionError, TransportError};
pub use hooks::{run_effects, NoopHooks, UiHooks};
pub use host::{spawn_host, HostCommand, HostConfig, HostCore, HostHandle};
pub use memory::{MemoryConnector, MemoryLink, MemoryNetwork};
pub use transport::{Connection, Connector, Link, PeerId, PeerLink, TransportEvent};
