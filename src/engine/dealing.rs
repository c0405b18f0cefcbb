use crate::domain::deck::Deck;
use crate::domain::Seed;
use crate::engine::RandomSource;
use crate::infra::rng::DeterministicRng;

/// Сколько карт раздаётся каждому игроку при старте.
pub const STARTING_HAND: usize = 7;

/// Перемешать колоду детерминированно: одинаковый seed на любой реплике
/// даёт побайтово одинаковый порядок. По сети ходит seed, а не результат.
pub fn shuffle_deck(deck: &Deck, seed: Seed) -> Deck {
    let mut cards = deck.cards.clone();
    DeterministicRng::from_seed(seed).shuffle(&mut cards);
    Deck::new(cards)
}

/// Полный пул на `player_count` игроков, перемешанный по `seed`.
pub fn build_deck(player_count: usize, seed: Seed) -> Deck {
    shuffle_deck(&Deck::uno_pool(player_count), seed)
}
