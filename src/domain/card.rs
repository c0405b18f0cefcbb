use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::CardId;

/// Цвет карты. `Wild` — у диких карт, пока игрок не выбрал цвет.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Wild,
}

impl Color {
    /// Четыре "настоящих" цвета в порядке построения колоды.
    pub const PLAYABLE: [Color; 4] = [Color::Red, Color::Yellow, Color::Blue, Color::Green];
}

/// Лицевая сторона карты (тип + параметры).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CardFace {
    Normal { color: Color, value: u8 },
    Wild { color: Color },
    Reverse { color: Color },
    Skip { color: Color },
    Draw { color: Color, amount: u8 },
}

/// Тип карты без параметров, удобно для сравнения "тот же тип".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardKind {
    Normal,
    Wild,
    Reverse,
    Skip,
    Draw,
}

/// Физическая карта из общего пула.
///
/// Равенство по id и по лицу целиком: две одинаковые на вид карты
/// с разными id не равны.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub id: CardId,
    #[serde(flatten)]
    pub face: CardFace,
}

impl Card {
    pub const fn new(id: CardId, face: CardFace) -> Self {
        Self { id, face }
    }

    pub fn color(&self) -> Color {
        match self.face {
            CardFace::Normal { color, .. }
            | CardFace::Wild { color }
            | CardFace::Reverse { color }
            | CardFace::Skip { color }
            | CardFace::Draw { color, .. } => color,
        }
    }

    pub fn kind(&self) -> CardKind {
        match self.face {
            CardFace::Normal { .. } => CardKind::Normal,
            CardFace::Wild { .. } => CardKind::Wild,
            CardFace::Reverse { .. } => CardKind::Reverse,
            CardFace::Skip { .. } => CardKind::Skip,
            CardFace::Draw { .. } => CardKind::Draw,
        }
    }

    /// Копия карты с другим цветом (для выбранного цвета дикой карты на сбросе).
    pub fn with_color(&self, color: Color) -> Self {
        let face = match self.face {
            CardFace::Normal { value, .. } => CardFace::Normal { color, value },
            CardFace::Wild { .. } => CardFace::Wild { color },
            CardFace::Reverse { .. } => CardFace::Reverse { color },
            CardFace::Skip { .. } => CardFace::Skip { color },
            CardFace::Draw { amount, .. } => CardFace::Draw { color, amount },
        };
        Self { id: self.id, face }
    }

    /// Дикое семейство: wild и wild +4.
    pub fn is_wild_family(&self) -> bool {
        match self.face {
            CardFace::Wild { .. } => true,
            CardFace::Draw { amount, .. } => amount == 4,
            _ => false,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = match self {
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Blue => 'B',
            Color::Yellow => 'Y',
            Color::Wild => 'W',
        };
        write!(f, "{ch}")
    }
}

impl fmt::Display for CardFace {
    /// Формат вида `R7`, `GS`, `BR`, `Y+2`, `W`, `W+4`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardFace::Normal { color, value } => write!(f, "{color}{value}"),
            CardFace::Wild { color: Color::Wild } => write!(f, "W"),
            CardFace::Wild { color } => write!(f, "W/{color}"),
            CardFace::Reverse { color } => write!(f, "{color}R"),
            CardFace::Skip { color } => write!(f, "{color}S"),
            CardFace::Draw { color, amount } => write!(f, "{color}+{amount}"),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.face, self.id)
    }
}

/// Парсинг лица карты из строки вида "R7", "GS", "BR", "Y+2", "W", "W+4".
impl FromStr for CardFace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let c_ch = chars.next().ok_or_else(|| "Card string must not be empty".to_string())?;
        let rest: String = chars.collect();

        let color = match c_ch {
            'R' | 'r' => Color::Red,
            'G' | 'g' => Color::Green,
            'B' | 'b' => Color::Blue,
            'Y' | 'y' => Color::Yellow,
            'W' | 'w' => Color::Wild,
            _ => return Err(format!("Invalid color: {c_ch}")),
        };

        if color == Color::Wild {
            return match rest.as_str() {
                "" => Ok(CardFace::Wild { color }),
                "+4" => Ok(CardFace::Draw { color, amount: 4 }),
                _ => Err(format!("Invalid wild card: {s}")),
            };
        }

        match rest.as_str() {
            "S" | "s" => Ok(CardFace::Skip { color }),
            "R" | "r" => Ok(CardFace::Reverse { color }),
            "+2" => Ok(CardFace::Draw { color, amount: 2 }),
            digits => {
                let value: u8 = digits
                    .parse()
                    .map_err(|_| format!("Invalid value: {digits}"))?;
                if value > 9 {
                    return Err(format!("Invalid value: {value}"));
                }
                Ok(CardFace::Normal { color, value })
            }
        }
    }
}
