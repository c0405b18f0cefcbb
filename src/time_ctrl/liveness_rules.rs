// src/time_ctrl/liveness_rules.rs
//! Конфигурация живости соединений: heartbeat, таймауты, переподключение.
//!
//! Здесь описываем только "правила", без состояния и без привязки к сессии.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Профиль тайминга.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LivenessProfile {
    /// Интернет: heartbeat раз в 5 сек, тишина 30 сек = ушёл.
    Standard,
    /// Локальная сеть / тесты: всё в десятки раз быстрее.
    Lan,
}

/// Правила живости для хоста и клиентов одной комнаты.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LivenessRules {
    /// Как часто клиент шлёт heartbeat.
    pub heartbeat_interval: Duration,
    /// Сколько тишины хост терпит, прежде чем считать пира ушедшим.
    pub heartbeat_timeout: Duration,
    /// Как часто хост проверяет таблицу соединений.
    pub sweep_interval: Duration,
    /// Пауза между попытками переподключения.
    pub reconnect_interval: Duration,
    /// После стольких неудач подряд клиент выбрасывает старый коннектор.
    pub reconnect_attempts_before_reset: u32,
}

impl LivenessRules {
    /// Строгий конструктор.
    pub const fn new(
        heartbeat_interval: Duration,
        heartbeat_timeout: Duration,
        sweep_interval: Duration,
        reconnect_interval: Duration,
        reconnect_attempts_before_reset: u32,
    ) -> Self {
        Self {
            heartbeat_interval,
            heartbeat_timeout,
            sweep_interval,
            reconnect_interval,
            reconnect_attempts_before_reset,
        }
    }

    /// Стандартный профиль: 5 сек heartbeat, 30 сек таймаут, проверка раз в 5 сек,
    /// переподключение каждые 3 сек, сброс после 5 неудач.
    pub const fn standard() -> Self {
        Self::new(
            Duration::from_secs(5),
            Duration::from_secs(30),
            Duration::from_secs(5),
            Duration::from_secs(3),
            5,
        )
    }

    pub const fn lan() -> Self {
        Self::new(
            Duration::from_millis(100),
            Duration::from_millis(600),
            Duration::from_millis(100),
            Duration::from_millis(50),
            3,
        )
    }

    /// Получить правила по профилю.
    pub const fn from_profile(profile: LivenessProfile) -> Self {
        match profile {
            LivenessProfile::Standard => Self::standard(),
            LivenessProfile::Lan => Self::lan(),
        }
    }
}

impl Default for LivenessRules {
    fn default() -> Self {
        Self::standard()
    }
}
