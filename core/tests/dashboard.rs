//! Dashboard ownership of the dataset and memoized views.

use chrono::NaiveDate;
use std::sync::Arc;
use subdash_core::{
    calendar::SimWindow,
    config::GeneratorConfig,
    dashboard::Dashboard,
    kpi::{ChangeUnit, KpiMetric, Trend},
    types::{Plan, Platform},
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn demo_view_matches_the_default_dashboard() {
    let mut dash = Dashboard::demo();
    let view = dash.view();

    assert_eq!(view.window, SimWindow::new(d(2025, 1, 1), 420));
    assert_eq!(view.filters.start_date, d(2026, 1, 17));
    assert_eq!(view.filters.end_date, d(2026, 2, 16));
    assert_eq!(view.daily.len(), 31);
    assert_eq!(view.kpi.total_active_subs, 60_626);
    assert_eq!(view.cards.len(), 5);
}

#[test]
fn unchanged_filters_reuse_the_view() {
    let mut dash = Dashboard::demo();
    let first = dash.view();
    let second = dash.view();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(dash.recomputations(), 1);

    // Setting equal filters is not a change.
    let same = dash.filters().clone();
    dash.set_filters(same);
    let third = dash.view();
    assert!(Arc::ptr_eq(&first, &third));
    assert_eq!(dash.recomputations(), 1);
}

#[test]
fn filter_change_recomputes_without_regenerating() {
    let mut dash = Dashboard::demo();
    let all = dash.view();

    assert!(dash.toggle_platform(Platform::Android));
    let ios_only = dash.view();

    assert!(!Arc::ptr_eq(&all, &ios_only));
    assert_eq!(ios_only.kpi.total_active_subs, 35_563);
    assert_eq!(dash.recomputations(), 2);
    assert_eq!(dash.generations(), 1, "filters must not trigger regeneration");
}

#[test]
fn last_selection_survives_toggling() {
    let mut dash = Dashboard::demo();
    assert!(dash.toggle_plan(Plan::Annual));
    assert!(!dash.toggle_plan(Plan::Monthly));
    assert_eq!(dash.filters().plans().len(), 1);
    assert!(dash.filters().plans().contains(&Plan::Monthly));
}

#[test]
fn date_range_change_shifts_the_period() {
    let mut dash = Dashboard::demo();
    dash.set_date_range(d(2025, 12, 1), d(2025, 12, 7));

    let view = dash.view();
    assert_eq!(view.daily.len(), 7);
    assert_eq!(view.daily[0].date, d(2025, 12, 1));
}

#[test]
fn config_change_regenerates_dataset() {
    let mut dash = Dashboard::demo();
    let before = dash.view();

    let mut config = GeneratorConfig::default();
    config.plans.monthly.monthly_price = 1_200;
    dash.set_config(config);
    let after = dash.view();

    assert_eq!(dash.generations(), 2);
    assert!(after.kpi.current_mrr > before.kpi.current_mrr);
    assert_eq!(after.kpi.total_active_subs, before.kpi.total_active_subs);
}

#[test]
fn window_change_regenerates_dataset() {
    let mut dash = Dashboard::demo();
    dash.view();

    dash.set_window(SimWindow::new(d(2025, 1, 1), 30));
    let view = dash.view();

    assert_eq!(dash.generations(), 2);
    assert!(view.daily.is_empty(), "the default period lies outside a 30-day window");
}

#[test]
fn cards_carry_units_and_inverted_cancellations() {
    let mut dash = Dashboard::demo();
    let view = dash.view();

    let rate = view.cards.iter().find(|c| c.metric == KpiMetric::TrialConversionRate).unwrap();
    assert_eq!(rate.unit, ChangeUnit::Points);
    assert_eq!(rate.value, view.kpi.trial_conversion_rate);

    let cancels = view.cards.iter().find(|c| c.metric == KpiMetric::Cancellations).unwrap();
    assert_eq!(cancels.unit, ChangeUnit::Percent);
    // Cancellations rose versus the previous period, which reads as bad news.
    assert!(view.kpi.cancellations_change > 0.5);
    assert_eq!(cancels.trend, Trend::Unfavorable);
}

#[test]
fn snapshot_serializes_iso_dates() {
    let mut dash = Dashboard::demo();
    let json = dash.view().to_json().unwrap();

    assert!(json.contains("\"start_date\":\"2026-01-17\""), "{json}");
    assert!(json.contains("\"platforms\":[\"ios\",\"android\"]"));
    assert!(json.contains("\"trend\":"));
}
