//! Synthetic subscription data: one independent daily series per segment.
//!
//! Each day depends on the previous day's active stock, so a segment is
//! generated strictly in date order from its own RNG stream.
//! Nothing here is cached; see `cache::DatasetCache` for memoization.

use crate::{
    calendar::SimWindow,
    config::GeneratorConfig,
    rng::{SegmentRng, SegmentSlot},
    types::{Plan, Platform},
};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// One synthetic observation for a single (platform, plan) segment on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date:              NaiveDate,
    pub platform:          Platform,
    pub plan:              Plan,
    /// Running stock at the end of the day.
    pub active_subs:       u64,
    pub new_subs:          u64,
    pub cancellations:     u64,
    pub mrr:               u64,
    pub trial_starts:      u64,
    pub trial_conversions: u64,
}

/// Day-0 stock of a segment before any activity.
pub fn baseline_active_subs(config: &GeneratorConfig, platform: Platform, plan: Plan) -> u64 {
    round_half_up(config.plan(plan).base_active * config.platform(platform).multiplier)
}

/// Generate one segment's series: one record per day starting at `window.start`.
pub fn generate_segment(
    config:   &GeneratorConfig,
    platform: Platform,
    plan:     Plan,
    window:   SimWindow,
    seed:     u32,
) -> Vec<DailyRecord> {
    let mut rng = SegmentRng::new(seed);
    generate_with_rng(config, platform, plan, window, &mut rng)
}

/// All four segments concatenated in slot order.
pub fn generate_all_data(config: &GeneratorConfig, window: SimWindow) -> Vec<DailyRecord> {
    let mut records = Vec::with_capacity(window.days as usize * SegmentSlot::ALL.len());
    for slot in SegmentSlot::ALL {
        let mut rng = slot.rng();
        records.extend(generate_with_rng(
            config,
            slot.platform(),
            slot.plan(),
            window,
            &mut rng,
        ));
    }
    records
}

fn generate_with_rng(
    config:   &GeneratorConfig,
    platform: Platform,
    plan:     Plan,
    window:   SimWindow,
    rng:      &mut SegmentRng,
) -> Vec<DailyRecord> {
    let plan_params = config.plan(plan);
    let platform_multiplier = config.platform(platform).multiplier;
    let jitter = &config.jitter;

    let mut active_subs = baseline_active_subs(config, platform, plan);
    let mut records = Vec::with_capacity(window.days as usize);

    for (i, date) in (0..window.days).zip(window.dates()) {

        let seasonal_factor = config.seasonal_factor(date.month());
        let weekend_boost = if is_weekend(date) { config.weekend_boost } else { 1.0 };
        let growth_trend =
            1.0 + (f64::from(i) / f64::from(window.days)) * config.growth_over_window;

        // Draw order is fixed: spike roll, [spike size], dip roll, then
        // one jitter per derived quantity.
        let spike_factor = spike_factor(config, rng);
        let dip_factor = dip_factor(config, rng);

        let new_subs = round_half_up(
            plan_params.base_new_subs
                * platform_multiplier
                * seasonal_factor
                * weekend_boost
                * growth_trend
                * spike_factor
                * rng.jitter(jitter.new_subs.low, jitter.new_subs.span),
        );

        let raw_cancellations = round_half_up(
            active_subs as f64
                * plan_params.churn_rate
                * dip_factor
                * rng.jitter(jitter.cancellations.low, jitter.cancellations.span),
        );
        // Never cancel more than the day's available stock.
        let available = active_subs.saturating_add(new_subs);
        let cancellations = raw_cancellations.min(available);

        let trial_starts = round_half_up(
            new_subs as f64
                * config.trial_start_ratio
                * rng.jitter(jitter.trial_starts.low, jitter.trial_starts.span),
        );
        let trial_conversions = round_half_up(
            trial_starts as f64
                * plan_params.trial_conversion_rate
                * rng.jitter(jitter.trial_conversions.low, jitter.trial_conversions.span),
        );

        active_subs = available - cancellations;

        records.push(DailyRecord {
            date,
            platform,
            plan,
            active_subs,
            new_subs,
            cancellations,
            mrr: active_subs.saturating_mul(plan_params.monthly_price),
            trial_starts,
            trial_conversions,
        });
    }

    log::debug!(
        "segment {platform}/{plan} ({}): {} days from {}, final active={active_subs}",
        rng.name,
        window.days,
        window.start,
    );

    records
}

fn spike_factor(config: &GeneratorConfig, rng: &mut SegmentRng) -> f64 {
    let roll = rng.next_f64();
    match config.spike_tiers.iter().find(|t| roll > t.threshold) {
        Some(tier) => rng.jitter(tier.base, tier.span),
        None => 1.0,
    }
}

fn dip_factor(config: &GeneratorConfig, rng: &mut SegmentRng) -> f64 {
    let roll = rng.next_f64();
    config
        .dip_tiers
        .iter()
        .find(|t| roll > t.threshold)
        .map(|t| t.factor)
        .unwrap_or(1.0)
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Nearest integer, halves rounding up. Negative inputs clamp to zero.
pub(crate) fn round_half_up(x: f64) -> u64 {
    let floor = x.floor();
    let rounded = if x - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded.max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_halves_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.4999), 2);
        assert_eq!(round_half_up(0.49999999999999994), 0);
        assert_eq!(round_half_up(-3.0), 0);
    }

    #[test]
    fn weekend_detection() {
        // 2025-01-04 is a Saturday.
        let sat = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
        assert!(is_weekend(sat));
        assert!(is_weekend(sat.succ_opt().unwrap()));
        assert!(!is_weekend(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()));
    }

    #[test]
    fn baseline_applies_platform_multiplier() {
        let config = GeneratorConfig::default();
        assert_eq!(baseline_active_subs(&config, Platform::Ios, Plan::Monthly), 11_200);
        assert_eq!(baseline_active_subs(&config, Platform::Ios, Plan::Annual), 4_480);
        assert_eq!(baseline_active_subs(&config, Platform::Android, Plan::Monthly), 8_000);
        assert_eq!(baseline_active_subs(&config, Platform::Android, Plan::Annual), 3_200);
    }
}
