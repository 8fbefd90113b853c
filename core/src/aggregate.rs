//! Filter + aggregate: daily totals across the selected segments and a
//! KPI summary comparing the period against the one before it.
//!
//! Pure and stateless. Empty selections yield empty series and zero KPIs,
//! never errors.

use crate::{
    calendar::DateRange,
    filter::Filters,
    generator::{round_half_up, DailyRecord},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One calendar day summed across every matching segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedDaily {
    pub date:              NaiveDate,
    pub active_subs:       u64,
    pub new_subs:          u64,
    pub cancellations:     u64,
    pub mrr:               u64,
    pub trial_starts:      u64,
    pub trial_conversions: u64,
}

impl AggregatedDaily {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            active_subs: 0,
            new_subs: 0,
            cancellations: 0,
            mrr: 0,
            trial_starts: 0,
            trial_conversions: 0,
        }
    }

    /// Stocks of concurrent segments add up to the total stock for the day.
    fn add(&mut self, record: &DailyRecord) {
        self.active_subs = self.active_subs.saturating_add(record.active_subs);
        self.new_subs = self.new_subs.saturating_add(record.new_subs);
        self.cancellations = self.cancellations.saturating_add(record.cancellations);
        self.mrr = self.mrr.saturating_add(record.mrr);
        self.trial_starts = self.trial_starts.saturating_add(record.trial_starts);
        self.trial_conversions = self.trial_conversions.saturating_add(record.trial_conversions);
    }

    /// The day's trial conversion rate in percent, to one decimal place.
    pub fn trial_conversion_rate(&self) -> f64 {
        if self.trial_starts == 0 {
            return 0.0;
        }
        let ratio = self.trial_conversions as f64 / self.trial_starts as f64;
        round_half_up(ratio * 1000.0) as f64 / 10.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    /// Active stock on the last day of the period.
    pub total_active_subs:          u64,
    pub active_subs_change:         f64,
    pub total_new_subs:             u64,
    pub new_subs_change:            f64,
    pub total_cancellations:        u64,
    pub cancellations_change:       f64,
    /// MRR on the last day of the period.
    pub current_mrr:                u64,
    pub mrr_change:                 f64,
    pub total_trial_starts:         u64,
    pub trial_starts_change:        f64,
    pub total_trial_conversions:    u64,
    pub trial_conversions_change:   f64,
    /// Percent.
    pub trial_conversion_rate:      f64,
    /// Percentage points, not a relative change.
    pub trial_conversion_rate_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub daily: Vec<AggregatedDaily>,
    pub kpi:   KpiSummary,
}

/// Snapshot and volume totals of one aggregated series.
#[derive(Debug, Clone, Copy, Default)]
struct PeriodTotals {
    active_subs:       u64,
    mrr:               u64,
    new_subs:          u64,
    cancellations:     u64,
    trial_starts:      u64,
    trial_conversions: u64,
}

impl PeriodTotals {
    fn of(daily: &[AggregatedDaily]) -> Self {
        let mut totals = Self::default();
        if let Some(last) = daily.last() {
            totals.active_subs = last.active_subs;
            totals.mrr = last.mrr;
        }
        for day in daily {
            totals.new_subs = totals.new_subs.saturating_add(day.new_subs);
            totals.cancellations = totals.cancellations.saturating_add(day.cancellations);
            totals.trial_starts = totals.trial_starts.saturating_add(day.trial_starts);
            totals.trial_conversions = totals.trial_conversions.saturating_add(day.trial_conversions);
        }
        totals
    }

    fn conversion_rate(&self) -> f64 {
        conversion_rate(self.trial_conversions, self.trial_starts)
    }
}

/// Select, group by date, and summarize the filtered period against the
/// immediately preceding period of equal length.
pub fn filter_and_aggregate(records: &[DailyRecord], filters: &Filters) -> Aggregation {
    let period = filters.period();
    let daily = aggregate_period(records, filters, &period);
    let previous = aggregate_period(records, filters, &period.preceding());

    let kpi = summarize(&PeriodTotals::of(&daily), &PeriodTotals::of(&previous));
    Aggregation { daily, kpi }
}

/// Daily totals of the records `filters` selects within `range`, ascending by date.
pub fn aggregate_period(
    records: &[DailyRecord],
    filters: &Filters,
    range:   &DateRange,
) -> Vec<AggregatedDaily> {
    let mut by_date: BTreeMap<NaiveDate, AggregatedDaily> = BTreeMap::new();
    for record in records.iter().filter(|r| filters.selects(r, range)) {
        by_date
            .entry(record.date)
            .or_insert_with(|| AggregatedDaily::empty(record.date))
            .add(record);
    }
    by_date.into_values().collect()
}

fn summarize(current: &PeriodTotals, previous: &PeriodTotals) -> KpiSummary {
    let rate = current.conversion_rate();
    KpiSummary {
        total_active_subs: current.active_subs,
        active_subs_change: pct_change(current.active_subs as f64, previous.active_subs as f64),
        total_new_subs: current.new_subs,
        new_subs_change: pct_change(current.new_subs as f64, previous.new_subs as f64),
        total_cancellations: current.cancellations,
        cancellations_change: pct_change(
            current.cancellations as f64,
            previous.cancellations as f64,
        ),
        current_mrr: current.mrr,
        mrr_change: pct_change(current.mrr as f64, previous.mrr as f64),
        total_trial_starts: current.trial_starts,
        trial_starts_change: pct_change(
            current.trial_starts as f64,
            previous.trial_starts as f64,
        ),
        total_trial_conversions: current.trial_conversions,
        trial_conversions_change: pct_change(
            current.trial_conversions as f64,
            previous.trial_conversions as f64,
        ),
        trial_conversion_rate: rate,
        trial_conversion_rate_change: rate - previous.conversion_rate(),
    }
}

/// Relative change in percent. Zero when `previous` is zero, which also
/// reports a 0 -> N increase as no change.
pub fn pct_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

/// `100 * conversions / starts`, or zero without any starts.
pub fn conversion_rate(conversions: u64, starts: u64) -> f64 {
    if starts == 0 {
        0.0
    } else {
        conversions as f64 / starts as f64 * 100.0
    }
}
