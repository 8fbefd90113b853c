//! The user-selected view: an inclusive date range plus platform and plan
//! subsets. Both subsets are non-empty by construction.

use crate::{
    calendar::DateRange,
    error::{DashError, DashResult},
    generator::DailyRecord,
    types::{Plan, Platform},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFilters")]
pub struct Filters {
    pub start_date: NaiveDate,
    pub end_date:   NaiveDate,
    platforms:      BTreeSet<Platform>,
    plans:          BTreeSet<Plan>,
}

/// Wire shape of `Filters`, checked before it becomes one.
#[derive(Deserialize)]
struct RawFilters {
    start_date: NaiveDate,
    end_date:   NaiveDate,
    platforms:  BTreeSet<Platform>,
    plans:      BTreeSet<Plan>,
}

impl TryFrom<RawFilters> for Filters {
    type Error = DashError;

    fn try_from(raw: RawFilters) -> DashResult<Self> {
        Filters::new(raw.start_date, raw.end_date)
            .with_platforms(raw.platforms)?
            .with_plans(raw.plans)
    }
}

impl Filters {
    /// Every platform and plan over `[start, end]`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            platforms: Platform::ALL.into_iter().collect(),
            plans: Plan::ALL.into_iter().collect(),
        }
    }

    /// The `days`-day window ending on `end_date`, inclusive.
    pub fn trailing(end_date: NaiveDate, days: u32) -> Self {
        let back = i64::from(days.max(1)) - 1;
        let start_date = end_date
            .checked_sub_signed(Duration::days(back))
            .unwrap_or(NaiveDate::MIN);
        Self::new(start_date, end_date)
    }

    pub fn with_platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> DashResult<Self> {
        let platforms: BTreeSet<_> = platforms.into_iter().collect();
        if platforms.is_empty() {
            return Err(DashError::EmptySelection("platform"));
        }
        self.platforms = platforms;
        Ok(self)
    }

    pub fn with_plans(mut self, plans: impl IntoIterator<Item = Plan>) -> DashResult<Self> {
        let plans: BTreeSet<_> = plans.into_iter().collect();
        if plans.is_empty() {
            return Err(DashError::EmptySelection("plan"));
        }
        self.plans = plans;
        Ok(self)
    }

    pub fn with_date_range(mut self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    pub fn platforms(&self) -> &BTreeSet<Platform> {
        &self.platforms
    }

    pub fn plans(&self) -> &BTreeSet<Plan> {
        &self.plans
    }

    /// Add `platform`, or remove it unless it is the only one left.
    /// Returns whether the selection changed.
    pub fn toggle_platform(&mut self, platform: Platform) -> bool {
        toggle(&mut self.platforms, platform)
    }

    /// Add `plan`, or remove it unless it is the only one left.
    /// Returns whether the selection changed.
    pub fn toggle_plan(&mut self, plan: Plan) -> bool {
        toggle(&mut self.plans, plan)
    }

    pub fn period(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    /// Segment part of the selection predicate.
    pub fn matches(&self, record: &DailyRecord) -> bool {
        self.platforms.contains(&record.platform) && self.plans.contains(&record.plan)
    }

    /// Full selection predicate against an arbitrary period.
    pub fn selects(&self, record: &DailyRecord, range: &DateRange) -> bool {
        range.contains(record.date) && self.matches(record)
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, item: T) -> bool {
    if set.contains(&item) {
        if set.len() == 1 {
            return false;
        }
        set.remove(&item)
    } else {
        set.insert(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn trailing_window_is_inclusive() {
        let f = Filters::trailing(d(2026, 2, 16), 31);
        assert_eq!(f.start_date, d(2026, 1, 17));
        assert_eq!(f.period().len_days(), 31);
    }

    #[test]
    fn last_member_cannot_be_toggled_off() {
        let mut f = Filters::new(d(2026, 1, 1), d(2026, 1, 31));
        assert!(f.toggle_platform(Platform::Android));
        assert!(!f.toggle_platform(Platform::Ios), "removing the last platform must be refused");
        assert_eq!(f.platforms().len(), 1);
        assert!(f.toggle_platform(Platform::Android));
        assert_eq!(f.platforms().len(), 2);

        assert!(f.toggle_plan(Plan::Monthly));
        assert!(!f.toggle_plan(Plan::Annual));
        assert_eq!(f.plans().iter().copied().collect::<Vec<_>>(), vec![Plan::Annual]);
    }

    #[test]
    fn empty_selections_are_rejected() {
        let f = Filters::new(d(2026, 1, 1), d(2026, 1, 31));
        assert!(matches!(
            f.clone().with_platforms(Vec::new()),
            Err(DashError::EmptySelection("platform"))
        ));
        assert!(matches!(f.with_plans(Vec::new()), Err(DashError::EmptySelection("plan"))));
    }

    #[test]
    fn deserializing_empty_selections_fails() {
        let no_platforms = r#"{"start_date":"2026-01-17","end_date":"2026-02-16","platforms":[],"plans":["monthly"]}"#;
        let err = serde_json::from_str::<Filters>(no_platforms).unwrap_err();
        assert!(err.to_string().contains("platform"), "{err}");

        let no_plans = r#"{"start_date":"2026-01-17","end_date":"2026-02-16","platforms":["ios"],"plans":[]}"#;
        assert!(serde_json::from_str::<Filters>(no_plans).is_err());
    }

    #[test]
    fn serialized_filters_read_back_unchanged() {
        let f = Filters::new(d(2026, 1, 17), d(2026, 2, 16))
            .with_plans([Plan::Annual])
            .unwrap();
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(serde_json::from_str::<Filters>(&json).unwrap(), f);
    }

    #[test]
    fn trailing_window_clamps_at_the_start_of_the_calendar() {
        let f = Filters::trailing(NaiveDate::MIN, 31);
        assert_eq!(f.start_date, NaiveDate::MIN);
        assert_eq!(f.end_date, NaiveDate::MIN);
    }
}
