use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, CardFace, Color};
use crate::domain::CardId;

/// Сброс: последний элемент — активная верхняя карта.
pub type Pile = Vec<Card>;

/// Рука игрока. Порядок для игры не важен, но хранится как последовательность.
pub type Hand = Vec<Card>;

/// Сколько копий каждого действия/цифры 1–9 на цвет в одной колоде.
const COPIES_PER_COLOR: usize = 2;

/// Сколько wild и сколько wild +4 в пуле.
const WILDS_IN_POOL: usize = 4;

/// Колода карт. Берём всегда с начала.
/// Перемешивание делает engine (через RNG из infra), НЕ здесь.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Сколько физических колод нужно на `player_count` игроков:
    /// одна на каждые начатые 4 места.
    pub fn decks_for(player_count: usize) -> usize {
        player_count / 4 + 1
    }

    /// Упорядоченный (неперемешанный) пул карт для `player_count` игроков.
    ///
    /// Каждая подколода: на каждый цвет один 0, по две 1–9, по два skip,
    /// reverse и +2. Дикие карты (4 wild и 4 wild +4) добавляются один раз
    /// на весь пул. id выдаются подряд, так что уникальны во всём пуле.
    pub fn uno_pool(player_count: usize) -> Self {
        let decks = Self::decks_for(player_count);
        let mut cards = Vec::with_capacity(decks * 100 + WILDS_IN_POOL * 2);
        let mut id: CardId = 0;
        let mut push = |cards: &mut Vec<Card>, face: CardFace| {
            cards.push(Card::new(id, face));
            id += 1;
        };

        for _ in 0..decks {
            for color in Color::PLAYABLE {
                for value in 0..10u8 {
                    push(&mut cards, CardFace::Normal { color, value });
                    if value != 0 {
                        push(&mut cards, CardFace::Normal { color, value });
                    }
                }
                for _ in 0..COPIES_PER_COLOR {
                    push(&mut cards, CardFace::Skip { color });
                    push(&mut cards, CardFace::Reverse { color });
                    push(&mut cards, CardFace::Draw { color, amount: 2 });
                }
            }
        }

        for _ in 0..WILDS_IN_POOL {
            push(&mut cards, CardFace::Wild { color: Color::Wild });
            push(&mut cards, CardFace::Draw { color: Color::Wild, amount: 4 });
        }

        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Взять до n карт с начала. Если карт меньше, отдаём сколько есть.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        let take = n.min(self.cards.len());
        self.cards.drain(..take).collect()
    }

    /// Вернуть карты в колоду (в конец).
    pub fn extend<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        self.cards.extend(cards);
    }

    /// Сбросить выбранный цвет у диких карт обратно в `wild`.
    pub fn normalize_wilds(&mut self) {
        for card in self.cards.iter_mut() {
            if card.is_wild_family() {
                *card = card.with_color(Color::Wild);
            }
        }
    }
}
