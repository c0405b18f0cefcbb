//! Доменная модель уно: карты, колода, игроки, агрегат игры.

pub mod card;
pub mod deck;
pub mod game;
pub mod player;

/// Идентификатор карты, уникален в пределах общего пула.
pub type CardId = u32;
/// Порядковый номер события в логе (назначает хост).
pub type EventId = u64;
/// Идентификатор игры (он же код комнаты).
pub type GameId = String;
/// Seed детерминированного перемешивания.
pub type Seed = u64;

pub use card::*;
pub use deck::*;
pub use game::*;
pub use player::*;
