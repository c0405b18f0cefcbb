//! Движок уно: события, редьюсер, каскады, реплика.
//!
//! Высокоуровневый объект: `Replica`
//! Основные операции:
//!   - `reducer::apply` – чистый переход `(state, event) -> state`
//!   - `Replica::submit` – авторитетное применение кандидата с каскадами
//!   - `Replica::replay` – применение события, пришедшего от хоста

pub mod dealing;
pub mod effects;
pub mod errors;
pub mod events;
pub mod positions;
pub mod reducer;
pub mod replica;
pub mod validation;

pub use dealing::{build_deck, shuffle_deck, STARTING_HAND};
pub use effects::{Effect, Sound};
pub use errors::GameError;
pub use events::{EventKind, GameEvent, DEFAULT_PLAYER_COUNT};
pub use reducer::{apply, Transition, EMPTY_HAND_REASON};
pub use replica::{Applied, Replica};

use crate::domain::Seed;

/// RNG интерфейс для engine.
/// Реализации в infra: детерминированная (реплей) и системная (хост).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);

    /// Свежий seed для событий, которые порождает хост.
    fn next_seed(&mut self) -> Seed;

    /// Случайный индекс в `[0, len)`; `None` для пустого диапазона.
    fn pick_index(&mut self, len: usize) -> Option<usize>;
}
