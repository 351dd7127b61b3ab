//! Common test data and constants

use statistics::database::EpochRecord;
use statistics::DayClock;

/// Mainnet timing: 12s slots, 32 slots per epoch
pub mod chain {
    pub const SECONDS_PER_SLOT: u64 = 12;
    pub const SLOTS_PER_EPOCH: u64 = 32;
    pub const EPOCHS_PER_DAY: u64 = 225;
}

pub fn mainnet_clock() -> DayClock {
    DayClock::new(chain::SECONDS_PER_SLOT, chain::SLOTS_PER_EPOCH).expect("mainnet constants are valid")
}

/// Latest epoch at which `day` is the current (still incomplete) day.
pub fn head_of_day(day: u64) -> u64 {
    day * chain::EPOCHS_PER_DAY
}

pub fn epoch_record(epoch: u64, validators_count: i64) -> EpochRecord {
    EpochRecord {
        epoch,
        validators_count,
        eligible_ether: validators_count * 32,
        voted_ether: validators_count * 30,
        finalized: epoch % 2 == 0,
    }
}

/// Common pool names
pub mod pools {
    pub const LIDO: &str = "Lido";
    pub const ROCKET_POOL: &str = "Rocket Pool";
    pub const COINBASE: &str = "Coinbase";
}
