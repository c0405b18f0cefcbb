//! RngSeed — доменный seed для каскадных перемешиваний.
//!
//! Редьюсер сам порождает `shuffle`, когда колода кончилась, и seed для
//! него должен получиться одинаковым на любой реплике. Поэтому seed
//! выводится хэшем из контекста:
//!         seed = H(domain || game_id || event_id)[..8]

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{EventId, Seed};
use crate::infra::rng::DeterministicRng;

/// Доменный префикс хэша.
const DOMAIN: &[u8] = b"UNO_ENGINE_SHUFFLE_V1";

/// 32-байтовый seed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RngSeed {
    pub bytes: [u8; 32],
}

impl RngSeed {
    /// Seed каскадного перемешивания для игры `game_id`,
    /// вызванного событием `event_id`.
    pub fn derive(game_id: &str, event_id: EventId) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(DOMAIN);
        hasher.update((game_id.len() as u64).to_le_bytes());
        hasher.update(game_id.as_bytes());
        hasher.update(event_id.to_le_bytes());

        let hash = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&hash[..32]);
        Self { bytes: out }
    }

    /// Первые 8 байт как u64: то, что уходит в событие `shuffle`.
    pub fn as_seed(&self) -> Seed {
        let mut b = [0u8; 8];
        b.copy_from_slice(&self.bytes[..8]);
        u64::from_le_bytes(b)
    }

    pub fn to_rng(&self) -> DeterministicRng {
        DeterministicRng::from_seed(self.as_seed())
    }
}
