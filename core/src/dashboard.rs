//! The dashboard: owner of the dataset's lifetime and the current view.
//!
//! RULES:
//!   - The dataset is generated through the single-slot cache only.
//!   - The view is recomputed only when its inputs (filters, dataset)
//!     differ from those of the last computed view.
//!   - Changing the generator config drops the cached dataset.

use crate::{
    aggregate::filter_and_aggregate,
    cache::DatasetCache,
    calendar::SimWindow,
    config::GeneratorConfig,
    filter::Filters,
    generator::DailyRecord,
    snapshot::DashboardSnapshot,
    types::{DayCount, Plan, Platform},
};
use chrono::NaiveDate;
use std::sync::Arc;

pub const DEMO_DATA_DAYS: DayCount = 420; // ~14 months
pub const DEMO_VIEW_DAYS: u32 = 31;

pub fn demo_data_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default()
}

pub fn demo_view_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 16).unwrap_or_default()
}

pub struct Dashboard {
    config:  GeneratorConfig,
    window:  SimWindow,
    cache:   DatasetCache,
    filters: Filters,
    view:    Option<Arc<DashboardSnapshot>>,
    recomputations: u64,
}

impl Dashboard {
    pub fn new(config: GeneratorConfig, window: SimWindow, filters: Filters) -> Self {
        Self {
            config,
            window,
            cache: DatasetCache::new(),
            filters,
            view: None,
            recomputations: 0,
        }
    }

    /// Demo data from 2025-01-01, viewing the 31 days up to 2026-02-16.
    pub fn demo() -> Self {
        Self::new(
            GeneratorConfig::default(),
            SimWindow::new(demo_data_start(), DEMO_DATA_DAYS),
            Filters::trailing(demo_view_end(), DEMO_VIEW_DAYS),
        )
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn window(&self) -> SimWindow {
        self.window
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// How many times the view has been recomputed.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// How many times the dataset has been generated.
    pub fn generations(&self) -> u64 {
        self.cache.generations()
    }

    pub fn records(&mut self) -> Arc<[DailyRecord]> {
        self.cache.get_or_generate(&self.config, self.window)
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.filters.start_date = start;
        self.filters.end_date = end;
    }

    pub fn toggle_platform(&mut self, platform: Platform) -> bool {
        self.filters.toggle_platform(platform)
    }

    pub fn toggle_plan(&mut self, plan: Plan) -> bool {
        self.filters.toggle_plan(plan)
    }

    pub fn set_window(&mut self, window: SimWindow) {
        if window != self.window {
            self.window = window;
            self.view = None;
        }
    }

    pub fn set_config(&mut self, config: GeneratorConfig) {
        if config != self.config {
            self.config = config;
            self.cache.invalidate();
            self.view = None;
        }
    }

    /// The current view, reused while the filters are unchanged.
    pub fn view(&mut self) -> Arc<DashboardSnapshot> {
        if let Some(view) = &self.view {
            if view.filters == self.filters && view.window == self.window {
                return Arc::clone(view);
            }
        }

        let records = self.records();
        let aggregation = filter_and_aggregate(&records, &self.filters);
        let cards = aggregation.kpi.cards();
        self.recomputations += 1;
        log::debug!(
            "view #{}: {} .. {}, {} days aggregated",
            self.recomputations,
            self.filters.start_date,
            self.filters.end_date,
            aggregation.daily.len(),
        );

        let view = Arc::new(DashboardSnapshot {
            window: self.window,
            filters: self.filters.clone(),
            daily: aggregation.daily,
            kpi: aggregation.kpi,
            cards,
        });
        self.view = Some(Arc::clone(&view));
        view
    }
}
