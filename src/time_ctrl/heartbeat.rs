// src/time_ctrl/heartbeat.rs
//! Учёт heartbeat'ов на хосте: когда каждый пир последний раз подавал признаки жизни.
//!
//! Время передаётся снаружи (`now`), так что таблица детерминирована
//! и тестируется без реальных часов.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

/// Состояние пира на момент проверки.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerHealth {
    /// Heartbeat свежий.
    Alive,
    /// Пир молчит дольше таймаута.
    TimedOut { silent_for: Duration },
}

/// Таблица последних heartbeat'ов по пирам.
#[derive(Clone, Debug)]
pub struct HeartbeatTable {
    timeout: Duration,
    last_seen: HashMap<String, Instant>,
}

impl HeartbeatTable {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            last_seen: HashMap::new(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Новое соединение считается живым с момента открытия.
    pub fn register(&mut self, peer: &str, now: Instant) {
        self.last_seen.insert(peer.to_string(), now);
    }

    /// Отметить heartbeat. `false`, если пир неизвестен.
    pub fn beat(&mut self, peer: &str, now: Instant) -> bool {
        match self.last_seen.get_mut(peer) {
            Some(seen) => {
                *seen = now;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, peer: &str) {
        self.last_seen.remove(peer);
    }

    /// Сколько пир молчит.
    pub fn age(&self, peer: &str, now: Instant) -> Option<Duration> {
        self.last_seen
            .get(peer)
            .map(|seen| now.saturating_duration_since(*seen))
    }

    pub fn health(&self, peer: &str, now: Instant) -> Option<PeerHealth> {
        let silent_for = self.age(peer, now)?;
        if silent_for > self.timeout {
            Some(PeerHealth::TimedOut { silent_for })
        } else {
            Some(PeerHealth::Alive)
        }
    }

    /// Все пиры, превысившие таймаут, в стабильном порядке.
    pub fn expired(&self, now: Instant) -> Vec<String> {
        let mut out: Vec<String> = self
            .last_seen
            .keys()
            .filter(|peer| matches!(self.health(peer, now), Some(PeerHealth::TimedOut { .. })))
            .cloned()
            .collect();
        out.sort();
        out
    }
}
