// src/engine/replica.rs

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::domain::{EventId, Game};
use crate::engine::effects::Effect;
use crate::engine::errors::GameError;
use crate::engine::events::{EventKind, GameEvent};
use crate::engine::reducer;

/// Что реплика приняла за один вызов `submit`: исходное событие и все
/// его каскады, уже с номерами, в порядке применения.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Applied {
    pub events: Vec<GameEvent>,
    pub effects: Vec<Effect>,
}

/// Реплика игры: текущее состояние (или его отсутствие до `create`)
/// поверх редьюсера.
///
/// - `submit` — авторитетный путь (хост): номер назначает реплика,
///   каскады применяются сразу, в глубину, до следующего внешнего события;
/// - `replay` — путь клиента: события приходят уже с номерами от хоста.
#[derive(Clone, Debug, Default)]
pub struct Replica {
    game: Option<Game>,
}

impl Replica {
    /// Пустая реплика (игры ещё нет).
    pub fn new() -> Self {
        Self { game: None }
    }

    pub fn from_game(game: Game) -> Self {
        Self { game: Some(game) }
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// Полный лог применённых событий.
    pub fn events(&self) -> &[GameEvent] {
        self.game.as_ref().map(|g| g.events.as_slice()).unwrap_or(&[])
    }

    pub fn last_event_id(&self) -> Option<EventId> {
        self.game.as_ref().map(|g| g.last_event_id)
    }

    /// Номер, который получит следующее событие.
    pub fn next_event_id(&self) -> EventId {
        self.last_event_id().map_or(0, |id| id + 1)
    }

    /// Реплика остановлена липкой ошибкой.
    pub fn is_halted(&self) -> bool {
        self.game.as_ref().is_some_and(|g| g.error.is_some())
    }

    /// Сбросить состояние перед полной ресинхронизацией.
    pub fn reset(&mut self) {
        self.game = None;
    }

    /// Авторитетное применение кандидата вместе со всеми каскадами.
    ///
    /// Ошибка исходного события ничего не меняет, кроме рассинхрона
    /// (`halts_replica`). Ошибка каскада всегда останавливает реплику:
    /// часть цепочки уже в логе, продолжать нельзя.
    pub fn submit(&mut self, kind: EventKind) -> Result<Applied, GameError> {
        let mut queue = VecDeque::from([kind]);
        let mut applied = Applied::default();

        while let Some(kind) = queue.pop_front() {
            let event = kind.with_id(self.next_event_id());
            let is_cascade = !applied.events.is_empty();

            match reducer::apply(self.game.as_ref(), &event) {
                Ok(transition) => {
                    debug!(
                        "[GAME] applied #{} {} (+{} cascade)",
                        event.id,
                        event.kind.name(),
                        transition.cascade.len()
                    );
                    for cascade in transition.cascade.into_iter().rev() {
                        queue.push_front(cascade);
                    }
                    self.game = Some(transition.game);
                    applied.effects.extend(transition.effects);
                    applied.events.push(event);
                }
                Err(err) => {
                    if is_cascade || err.halts_replica() {
                        self.halt(&err);
                    }
                    return Err(err);
                }
            }
        }

        Ok(applied)
    }

    /// Применить событие, пришедшее от хоста.
    ///
    /// Повторы (id не больше последнего) молча игнорируются. Любая ошибка
    /// на клиенте липкая: дальнейшие события бессмысленны до ресинхронизации.
    pub fn replay(&mut self, event: &GameEvent) -> Result<Vec<Effect>, GameError> {
        if let Some(last) = self.last_event_id() {
            if event.id <= last {
                return Ok(Vec::new());
            }
        }

        match reducer::apply(self.game.as_ref(), event) {
            Ok(transition) => {
                self.game = Some(transition.game);
                Ok(transition.effects)
            }
            Err(err) => {
                self.halt(&err);
                Err(err)
            }
        }
    }

    fn halt(&mut self, err: &GameError) {
        if let Some(game) = self.game.as_mut() {
            if game.error.is_none() {
                warn!("[GAME] replica halted: {err}");
                game.error = Some(err.clone());
            }
        }
    }
}
