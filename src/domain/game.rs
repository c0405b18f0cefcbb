use serde::{Deserialize, Serialize};

use crate::domain::deck::{Deck, Pile};
use crate::domain::player::Player;
use crate::domain::{EventId, GameId};
use crate::engine::errors::GameError;
use crate::engine::events::GameEvent;

/// Направление хода: по часовой (+1) или против (-1).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(into = "i8", try_from = "i8")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl From<Direction> for i8 {
    fn from(d: Direction) -> Self {
        d.step() as i8
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Direction::Forward),
            -1 => Ok(Direction::Backward),
            other => Err(format!("Invalid direction: {other}")),
        }
    }
}

/// Агрегат игры — единственный согласованный снимок, полученный реплеем лога.
///
/// Инварианты:
/// - `last_event_id` растёт ровно на 1 за каждое принятое событие;
/// - суммарное число карт в deck + pile + руках постоянно после `start`;
/// - `current_player`, если задан, всегда есть в `players`;
/// - после `winner` состояние больше не меняется;
/// - после `error` реплика больше не применяет события.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,
    pub error: Option<GameError>,
    pub last_event_id: EventId,
    pub last_player: Option<String>,
    pub winner: Option<String>,
    /// Максимум мест в лобби.
    pub player_count: usize,
    pub players: Vec<Player>,
    pub current_player: Option<String>,
    pub deck: Deck,
    pub pile: Pile,
    pub direction: Direction,
    /// Полный упорядоченный лог применённых событий.
    pub events: Vec<GameEvent>,
}

impl Game {
    pub fn new(id: GameId, player_count: usize) -> Self {
        Self {
            id,
            error: None,
            last_event_id: 0,
            last_player: None,
            winner: None,
            player_count,
            players: Vec::new(),
            current_player: None,
            deck: Deck::default(),
            pile: Vec::new(),
            direction: Direction::Forward,
            events: Vec::new(),
        }
    }

    /// Игра началась, когда назначен текущий игрок.
    pub fn is_started(&self) -> bool {
        self.current_player.is_some()
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    pub fn seat_of(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == name)
    }

    pub fn top_card(&self) -> Option<&crate::domain::card::Card> {
        self.pile.last()
    }

    /// Всего карт в игре: колода + сброс + все руки.
    pub fn total_cards(&self) -> usize {
        self.deck.len() + self.pile.len() + self.players.iter().map(|p| p.hand.len()).sum::<usize>()
    }
}
