use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::deck::Hand;

/// Игрок в конкретной игре.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    /// Отображаемое имя, уникально в пределах игры.
    pub name: String,
    pub hand: Hand,
    /// Флаг "уно": у игрока ровно одна карта и штраф за него ещё не разыгран.
    pub uno: bool,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hand: Vec::new(),
            uno: false,
        }
    }

    pub fn holds(&self, card: &Card) -> bool {
        self.hand.iter().any(|c| c == card)
    }

    /// Пересчитать флаг уно после изменения руки.
    pub fn refresh_uno(&mut self) {
        self.uno = self.hand.len() == 1;
    }
}
