//! KPI cards: the summary reshaped into one entry per headline metric,
//! each with a trend verdict for its change.

use crate::aggregate::KpiSummary;
use serde::{Deserialize, Serialize};

/// Changes smaller than this (in either unit) read as flat.
pub const FLAT_CHANGE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiMetric {
    ActiveSubs,
    NewSubs,
    Cancellations,
    Mrr,
    TrialConversionRate,
}

impl KpiMetric {
    pub const ALL: [KpiMetric; 5] = [
        KpiMetric::ActiveSubs,
        KpiMetric::NewSubs,
        KpiMetric::Cancellations,
        KpiMetric::Mrr,
        KpiMetric::TrialConversionRate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::ActiveSubs          => "active subscriptions",
            Self::NewSubs             => "new subscriptions (period)",
            Self::Cancellations       => "cancellations (period)",
            Self::Mrr                 => "MRR",
            Self::TrialConversionRate => "trial conversion rate",
        }
    }

    /// A decrease is the good direction.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, Self::Cancellations)
    }

    pub fn change_unit(&self) -> ChangeUnit {
        match self {
            Self::TrialConversionRate => ChangeUnit::Points,
            _ => ChangeUnit::Percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeUnit {
    Percent,
    Points,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Flat,
    Favorable,
    Unfavorable,
}

impl Trend {
    pub fn classify(change: f64, lower_is_better: bool) -> Self {
        if change.abs() < FLAT_CHANGE_THRESHOLD {
            return Trend::Flat;
        }
        let improved = if lower_is_better { change < 0.0 } else { change > 0.0 };
        if improved { Trend::Favorable } else { Trend::Unfavorable }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiCard {
    pub metric: KpiMetric,
    pub value:  f64,
    pub change: f64,
    pub unit:   ChangeUnit,
    pub trend:  Trend,
}

impl KpiSummary {
    pub fn value_and_change(&self, metric: KpiMetric) -> (f64, f64) {
        match metric {
            KpiMetric::ActiveSubs => (self.total_active_subs as f64, self.active_subs_change),
            KpiMetric::NewSubs => (self.total_new_subs as f64, self.new_subs_change),
            KpiMetric::Cancellations => {
                (self.total_cancellations as f64, self.cancellations_change)
            }
            KpiMetric::Mrr => (self.current_mrr as f64, self.mrr_change),
            KpiMetric::TrialConversionRate => {
                (self.trial_conversion_rate, self.trial_conversion_rate_change)
            }
        }
    }

    pub fn cards(&self) -> Vec<KpiCard> {
        KpiMetric::ALL
            .iter()
            .map(|&metric| {
                let (value, change) = self.value_and_change(metric);
                KpiCard {
                    metric,
                    value,
                    change,
                    unit: metric.change_unit(),
                    trend: Trend::classify(change, metric.lower_is_better()),
                }
            })
            .collect()
    }
}
