//! Day bucketing derived from the chain head.
//!
//! A day is `latest_epoch / epochs_per_day` where
//! `epochs_per_day = 86400 / seconds_per_slot / slots_per_epoch`. Only days
//! strictly before the current one are complete and safe to compute.

use crate::config::ChainConfig;
use crate::constants::chain::SECONDS_PER_DAY;
use crate::errors::ConfigError;

/// Outcome of reading the clock against the latest indexed epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayReading {
    /// The chain is younger than one full day; skip day-indexed work.
    NotReady { latest_epoch: u64, epochs_per_day: u64 },
    /// `previous_day` is the last fully complete day.
    Ready {
        latest_epoch: u64,
        current_day: u64,
        previous_day: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayClock {
    seconds_per_slot: u64,
    slots_per_epoch: u64,
    epochs_per_day: u64,
}

impl DayClock {
    pub fn new(seconds_per_slot: u64, slots_per_epoch: u64) -> Result<Self, ConfigError> {
        if seconds_per_slot == 0 || slots_per_epoch == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chain".to_string(),
                reason: "seconds_per_slot and slots_per_epoch must be positive".to_string(),
            });
        }

        let epochs_per_day = SECONDS_PER_DAY / seconds_per_slot / slots_per_epoch;
        if epochs_per_day == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chain".to_string(),
                reason: "chain constants leave less than one epoch per day".to_string(),
            });
        }

        Ok(Self {
            seconds_per_slot,
            slots_per_epoch,
            epochs_per_day,
        })
    }

    pub fn from_config(chain: &ChainConfig) -> Result<Self, ConfigError> {
        Self::new(chain.seconds_per_slot, chain.slots_per_epoch)
    }

    #[inline]
    pub fn epochs_per_day(&self) -> u64 {
        self.epochs_per_day
    }

    pub fn seconds_per_slot(&self) -> u64 {
        self.seconds_per_slot
    }

    pub fn slots_per_epoch(&self) -> u64 {
        self.slots_per_epoch
    }

    pub fn read(&self, latest_epoch: u64) -> DayReading {
        if latest_epoch < self.epochs_per_day {
            return DayReading::NotReady {
                latest_epoch,
                epochs_per_day: self.epochs_per_day,
            };
        }

        let current_day = latest_epoch / self.epochs_per_day;
        DayReading::Ready {
            latest_epoch,
            current_day,
            previous_day: current_day.saturating_sub(1),
        }
    }

    /// Half-open epoch range `[first, end)` covered by `day`.
    pub fn epoch_range(&self, day: u64) -> (u64, u64) {
        let first = day.saturating_mul(self.epochs_per_day);
        (first, first.saturating_add(self.epochs_per_day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mainnet() -> DayClock {
        DayClock::new(12, 32).unwrap()
    }

    #[test]
    fn test_mainnet_epochs_per_day() {
        assert_eq!(mainnet().epochs_per_day(), 225);
    }

    #[test]
    fn test_not_ready_before_first_full_day() {
        let clock = mainnet();
        for epoch in [0, 1, 224] {
            assert_eq!(
                clock.read(epoch),
                DayReading::NotReady {
                    latest_epoch: epoch,
                    epochs_per_day: 225
                }
            );
        }
    }

    #[test]
    fn test_ready_at_day_boundary() {
        assert_eq!(
            mainnet().read(225),
            DayReading::Ready {
                latest_epoch: 225,
                current_day: 1,
                previous_day: 0
            }
        );
    }

    #[test]
    fn test_current_day_uses_integer_division() {
        match mainnet().read(225 * 4 + 100) {
            DayReading::Ready {
                current_day,
                previous_day,
                ..
            } => {
                assert_eq!(current_day, 4);
                assert_eq!(previous_day, 3);
            }
            other => panic!("expected ready reading, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_zero_constants() {
        assert!(DayClock::new(0, 32).is_err());
        assert!(DayClock::new(12, 0).is_err());
    }

    #[test]
    fn test_rejects_less_than_one_epoch_per_day() {
        assert!(DayClock::new(86_400, 2).is_err());
    }

    #[test]
    fn test_epoch_range_for_day() {
        assert_eq!(mainnet().epoch_range(0), (0, 225));
        assert_eq!(mainnet().epoch_range(3), (675, 900));
    }
}
