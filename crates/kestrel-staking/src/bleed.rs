//! Stake decay applied while a key sits in jail.
//!
//! The hook runs on every unJail. With the default all-zero bleed config
//! it returns zero, so unJail leaves the stake untouched.

use num_bigint::BigUint;

use crate::config::StakingConfig;

/// Basis-point denominator for the bleed percentages.
pub const BPS_100_PERCENT: u64 = 10_000;

/// Amount to subtract from `stake` when a key jailed at `jailed_round`
/// is released at `current_round`.
///
/// Rounds up to `num_rounds_without_bleed` are a grace period; each
/// round beyond it bleeds `bleed_bps_per_round` basis points, capped at
/// `max_bleed_bps` and never more than the whole stake.
pub fn jail_bleed_amount(
    config: &StakingConfig,
    jailed_round: u64,
    current_round: u64,
    stake: &BigUint,
) -> BigUint {
    let rounds_in_jail = current_round.saturating_sub(jailed_round);
    let rounds_bleeding = rounds_in_jail.saturating_sub(config.num_rounds_without_bleed);

    let bps = rounds_bleeding
        .saturating_mul(config.bleed_bps_per_round as u64)
        .min(config.max_bleed_bps as u64)
        .min(BPS_100_PERCENT);

    stake * bps / BPS_100_PERCENT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bleed_config(grace: u64, per_round: u32, max: u32) -> StakingConfig {
        StakingConfig {
            num_rounds_without_bleed: grace,
            bleed_bps_per_round: per_round,
            max_bleed_bps: max,
            ..StakingConfig::default()
        }
    }

    #[test]
    fn default_config_never_bleeds() {
        let config = StakingConfig::default();
        let stake = BigUint::from(1_000_000u64);
        assert_eq!(
            jail_bleed_amount(&config, 10, 10_000, &stake),
            BigUint::default()
        );
    }

    #[test]
    fn grace_period_is_free() {
        let config = bleed_config(100, 10, 5_000);
        let stake = BigUint::from(10_000u64);
        assert_eq!(
            jail_bleed_amount(&config, 1000, 1100, &stake),
            BigUint::default()
        );
    }

    #[test]
    fn bleed_accumulates_per_round_and_caps() {
        let config = bleed_config(100, 10, 5_000);
        let stake = BigUint::from(10_000u64);

        // 150 rounds jailed: 50 bleeding rounds at 10 bps = 500 bps = 5%.
        assert_eq!(
            jail_bleed_amount(&config, 1000, 1150, &stake),
            BigUint::from(500u64)
        );

        // Far past the cap: 5_000 bps = 50%.
        assert_eq!(
            jail_bleed_amount(&config, 1000, 100_000, &stake),
            BigUint::from(5_000u64)
        );
    }

    #[test]
    fn bleed_never_exceeds_the_stake() {
        let config = bleed_config(0, 10_000, u32::MAX);
        let stake = BigUint::from(777u64);
        assert_eq!(jail_bleed_amount(&config, 0, u64::MAX, &stake), stake);
    }
}
