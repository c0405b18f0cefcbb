use crate::domain::Game;
use crate::engine::{Effect, GameError, Sound};

/// Куда сессии отдают то, что должен показать UI.
///
/// Все методы необязательны; вызываются из цикла сессии, поэтому
/// реализация не должна блокировать.
pub trait UiHooks: Send + Sync {
    fn render(&self, _game: &Game) {}

    fn play_sound(&self, _sound: Sound) {}

    fn show_error(&self, _error: &GameError) {}

    /// Игра уже идёт: показать режим зрителя.
    fn spectate(&self) {}
}

/// UI отсутствует.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHooks;

impl UiHooks for NoopHooks {}

/// Выполнить эффекты успешного перехода.
pub fn run_effects(hooks: &dyn UiHooks, effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::PlaySound(sound) => hooks.play_sound(*sound),
        }
    }
}
