use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::domain::Seed;
use crate::engine::RandomSource;

/// Недетерминированный источник: свежие seed'ы для `leave`/`start`,
/// выбор первого игрока на хосте.
#[derive(Clone, Debug, Default)]
pub struct SystemRng;

impl RandomSource for SystemRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        fisher_yates(&mut rand::thread_rng(), slice);
    }

    fn next_seed(&mut self) -> Seed {
        rand::thread_rng().next_u64()
    }

    fn pick_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| rand::thread_rng().gen_range(0..len))
    }
}

/// Детерминированный RNG для реплея.
///
/// ChaCha8 с фиксированным алгоритмом: одинаковый seed даёт одинаковую
/// последовательность на всех платформах и версиях, в отличие от `StdRng`.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    inner: ChaCha8Rng,
}

impl DeterministicRng {
    pub fn from_seed(seed: Seed) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for DeterministicRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        fisher_yates(&mut self.inner, slice);
    }

    fn next_seed(&mut self) -> Seed {
        self.inner.next_u64()
    }

    fn pick_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.inner.gen_range(0..len))
    }
}

/// Классический Fisher–Yates: на шаге i меняем с позицией из [i, len).
fn fisher_yates<R: Rng, T>(rng: &mut R, slice: &mut [T]) {
    let len = slice.len();
    if len < 2 {
        return;
    }
    for idx in 0..len - 1 {
        let swap_with = rng.gen_range(idx..len);
        slice.swap(idx, swap_with);
    }
}
