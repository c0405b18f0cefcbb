//! Внешний API уно-движка.
//!
//! Здесь описываются:
//! - сообщения по проводу (messages.rs) — события, кандидаты, служебные сигналы;
//! - ошибки (errors.rs) — то, что видит клиент;
//! - DTO (dto.rs) — удобные структуры для UI;
//! - запросы (queries.rs) — только чтение.

pub mod dto;
pub mod errors;
pub mod messages;
pub mod queries;

pub use dto::*;
pub use errors::*;
pub use messages::*;
pub use queries::*;
