// src/time_ctrl/mod.rs
//! Контроль живости соединений.
//!
//! Здесь собираем:
//! - правила (`LivenessRules`);
//! - таблицу heartbeat'ов на хосте (`HeartbeatTable`);
//! - политику переподключения клиента (`ReconnectBackoff`).
//!
//! Время нигде не попадает в агрегат игры: уход по таймауту превращается
//! в обычное событие `leave`.

pub mod heartbeat;
pub mod liveness_rules;
pub mod reconnect;

pub use heartbeat::{HeartbeatTable, PeerHealth};
pub use liveness_rules::{LivenessProfile, LivenessRules};
pub use reconnect::{ReconnectBackoff, RetryStep};
