//! Reconnect delay schedule

use std::time::Duration;
use rand::Rng;
use crate::config::ReconnectConfig;

/// Exponential backoff with symmetric jitter and a retry ceiling
#[derive(Debug, Clone)]
pub struct Backoff {
    config: ReconnectConfig,
    attempt: u32,
}

impl Backoff {
    pub fn new(config: ReconnectConfig) -> Self {
        Self { config, attempt: 0 }
    }

    /// Attempts handed out since the last reset
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Delay before the next attempt, `None` once `max_retries` is spent
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= self.config.max_retries {
            return None;
        }

        let base = self.base_delay_ms(self.attempt);
        self.attempt += 1;

        let jitter = self.config.jitter.clamp(0.0, 1.0);
        let factor = if jitter > 0.0 {
            1.0 + rand::thread_rng().gen_range(-jitter..=jitter)
        } else {
            1.0
        };

        Some(Duration::from_millis((base * factor).round().max(0.0) as u64))
    }

    fn base_delay_ms(&self, attempt: u32) -> f64 {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay = self.config.initial_delay_ms as f64 * self.config.multiplier.powi(exponent);
        delay.min(self.config.max_delay_ms as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(jitter: f64, max_retries: u32) -> ReconnectConfig {
        ReconnectConfig {
            initial_delay_ms: 500,
            max_delay_ms: 4000,
            multiplier: 2.0,
            jitter,
            max_retries,
        }
    }

    #[test]
    fn test_exponential_schedule_without_jitter() {
        let mut backoff = Backoff::new(config(0.0, 6));
        let delays: Vec<u64> = std::iter::from_fn(|| backoff.next_delay())
            .map(|d| d.as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![500, 1000, 2000, 4000, 4000, 4000]);
    }

    #[test]
    fn test_ceiling_and_reset() {
        let mut backoff = Backoff::new(config(0.0, 2));
        assert!(backoff.next_delay().is_some());
        assert!(backoff.next_delay().is_some());
        assert!(backoff.next_delay().is_none());
        assert_eq!(backoff.attempt(), 2);

        backoff.reset();
        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_jitter_stays_in_bounds() {
        let mut backoff = Backoff::new(config(0.2, 1000));
        for _ in 0..200 {
            let attempt = backoff.attempt();
            let base = backoff.base_delay_ms(attempt);
            let delay = backoff.next_delay().unwrap().as_millis() as f64;
            assert!(delay >= (base * 0.8).floor() && delay <= (base * 1.2).ceil());
        }
    }
}
