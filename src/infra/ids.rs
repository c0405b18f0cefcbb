use rand::Rng;
use serde::{Deserialize, Serialize};

/// Алфавит кодов комнат.
const ROOM_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ+=";

/// Длина кода комнаты.
pub const ROOM_CODE_LEN: usize = 9;

/// Код комнаты: короткий случайный идентификатор, он же адрес хоста.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RoomCode(pub String);

impl RoomCode {
    pub fn generate() -> Self {
        Self(room_code())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Новый случайный код комнаты.
pub fn room_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ROOM_CODE_LEN)
        .map(|_| ROOM_ALPHABET[rng.gen_range(0..ROOM_ALPHABET.len())] as char)
        .collect()
}
