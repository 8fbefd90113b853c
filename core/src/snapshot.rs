//! Dashboard snapshot: the complete computed view for one filter
//! selection, serializable to JSON for presentation consumers.

use crate::{
    aggregate::{AggregatedDaily, KpiSummary},
    calendar::SimWindow,
    error::DashResult,
    filter::Filters,
    kpi::KpiCard,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub window:  SimWindow,
    pub filters: Filters,
    pub daily:   Vec<AggregatedDaily>,
    pub kpi:     KpiSummary,
    pub cards:   Vec<KpiCard>,
}

impl DashboardSnapshot {
    pub fn to_json(&self) -> DashResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> DashResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
