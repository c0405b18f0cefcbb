// src/time_ctrl/reconnect.rs
//! Политика переподключения клиента: фиксированный интервал, бесконечные
//! попытки, сброс коннектора после серии неудач.

use std::time::Duration;

use super::LivenessRules;

/// Что делать после очередной неудачной попытки.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryStep {
    /// Подождать `interval` и попробовать тем же коннектором.
    Retry { attempt: u32 },
    /// Выбросить старый handle и начать с чистого.
    ResetConnector,
}

#[derive(Clone, Debug)]
pub struct ReconnectBackoff {
    interval: Duration,
    reset_after: u32,
    failures: u32,
}

impl ReconnectBackoff {
    pub fn new(rules: &LivenessRules) -> Self {
        Self {
            interval: rules.reconnect_interval,
            reset_after: rules.reconnect_attempts_before_reset.max(1),
            failures: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Неудач подряд с последнего сброса.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn on_failure(&mut self) -> RetryStep {
        self.failures += 1;
        if self.failures >= self.reset_after {
            self.failures = 0;
            RetryStep::ResetConnector
        } else {
            RetryStep::Retry {
                attempt: self.failures,
            }
        }
    }

    pub fn on_success(&mut self) {
        self.failures = 0;
    }
}
