use serde::{Deserialize, Serialize};

/// Звук, который UI проигрывает после успешного перехода.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sound {
    Shuffle,
    Draw,
    Play,
}

impl Sound {
    /// Путь к ассету, как его ожидает UI.
    pub fn asset_path(self) -> &'static str {
        match self {
            Sound::Shuffle => "/sounds/shuffle.wav",
            Sound::Draw => "/sounds/draw.wav",
            Sound::Play => "/sounds/play.wav",
        }
    }
}

/// Описание побочного эффекта. Редьюсер только возвращает их,
/// выполняет UI-слой.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Effect {
    PlaySound(Sound),
}
