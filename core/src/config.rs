use crate::{
    error::{DashError, DashResult},
    types::{Plan, Platform},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanParams {
    /// Active stock on day 0, before the platform multiplier.
    pub base_active: f64,
    /// Daily new subscribers before any scaling.
    pub base_new_subs: f64,
    /// Fraction of the active stock cancelling per day.
    pub churn_rate: f64,
    /// Monthly-equivalent price. Annual plans store the amortized figure.
    pub monthly_price: u64,
    pub trial_conversion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformParams {
    pub multiplier: f64,
}

/// Applies to every month up to and including `last_month` (1-based),
/// after the previous band ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalBand {
    pub last_month: u32,
    pub factor: f64,
}

/// Multiplier drawn when `roll > threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeTier {
    pub threshold: f64,
    pub base: f64,
    pub span: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DipTier {
    pub threshold: f64,
    pub factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jitter {
    pub low: f64,
    pub span: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JitterConfig {
    pub new_subs: Jitter,
    pub cancellations: Jitter,
    pub trial_starts: Jitter,
    pub trial_conversions: Jitter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTable {
    pub monthly: PlanParams,
    pub annual: PlanParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformTable {
    pub ios: PlatformParams,
    pub android: PlatformParams,
}

/// Every constant of the synthetic subscription model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub plans: PlanTable,
    pub platforms: PlatformTable,
    pub seasonal_bands: Vec<SeasonalBand>,
    pub weekend_boost: f64,
    /// Relative lift of new-subscriber volume across the whole window.
    pub growth_over_window: f64,
    /// Checked in order; the first tier whose threshold is exceeded wins.
    pub spike_tiers: Vec<SpikeTier>,
    pub dip_tiers: Vec<DipTier>,
    pub trial_start_ratio: f64,
    pub jitter: JitterConfig,
}

impl GeneratorConfig {
    /// Load from a JSON file, e.g. `data/segments/segment_params.json`.
    pub fn load(path: &str) -> DashResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> DashResult<Self> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn plan(&self, plan: Plan) -> &PlanParams {
        match plan {
            Plan::Monthly => &self.plans.monthly,
            Plan::Annual  => &self.plans.annual,
        }
    }

    pub fn platform(&self, platform: Platform) -> &PlatformParams {
        match platform {
            Platform::Ios     => &self.platforms.ios,
            Platform::Android => &self.platforms.android,
        }
    }

    /// Seasonal factor for a 1-based calendar month.
    pub fn seasonal_factor(&self, month: u32) -> f64 {
        self.seasonal_bands
            .iter()
            .find(|b| month <= b.last_month)
            .map(|b| b.factor)
            .unwrap_or(1.0)
    }

    pub fn validate(&self) -> DashResult<()> {
        for plan in Plan::ALL {
            let p = self.plan(plan);
            non_negative(&format!("plans.{plan}.base_active"), p.base_active)?;
            non_negative(&format!("plans.{plan}.base_new_subs"), p.base_new_subs)?;
            unit_interval(&format!("plans.{plan}.churn_rate"), p.churn_rate)?;
            unit_interval(
                &format!("plans.{plan}.trial_conversion_rate"),
                p.trial_conversion_rate,
            )?;
        }
        for platform in Platform::ALL {
            non_negative(
                &format!("platforms.{platform}.multiplier"),
                self.platform(platform).multiplier,
            )?;
        }

        let mut prev_month = 0;
        for band in &self.seasonal_bands {
            if band.last_month <= prev_month || band.last_month > 12 {
                return Err(invalid(
                    "seasonal_bands",
                    format!("last_month {} must ascend within 1..=12", band.last_month),
                ));
            }
            non_negative("seasonal_bands.factor", band.factor)?;
            prev_month = band.last_month;
        }
        if prev_month != 12 {
            return Err(invalid("seasonal_bands", "must end at month 12".into()));
        }

        non_negative("weekend_boost", self.weekend_boost)?;
        non_negative("growth_over_window", self.growth_over_window)?;
        non_negative("trial_start_ratio", self.trial_start_ratio)?;
        for tier in &self.spike_tiers {
            unit_interval("spike_tiers.threshold", tier.threshold)?;
            non_negative("spike_tiers.base", tier.base)?;
            non_negative("spike_tiers.span", tier.span)?;
        }
        for tier in &self.dip_tiers {
            unit_interval("dip_tiers.threshold", tier.threshold)?;
            non_negative("dip_tiers.factor", tier.factor)?;
        }
        let j = &self.jitter;
        for (name, jitter) in [
            ("jitter.new_subs", &j.new_subs),
            ("jitter.cancellations", &j.cancellations),
            ("jitter.trial_starts", &j.trial_starts),
            ("jitter.trial_conversions", &j.trial_conversions),
        ] {
            non_negative(name, jitter.low)?;
            non_negative(name, jitter.span)?;
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    /// The dashboard's demo parameters.
    fn default() -> Self {
        Self {
            plans: PlanTable {
                monthly: PlanParams {
                    base_active: 8000.0,
                    base_new_subs: 45.0,
                    churn_rate: 0.0035,
                    monthly_price: 980,
                    trial_conversion_rate: 0.42,
                },
                annual: PlanParams {
                    base_active: 3200.0,
                    base_new_subs: 18.0,
                    churn_rate: 0.0012,
                    monthly_price: 650,
                    trial_conversion_rate: 0.35,
                },
            },
            platforms: PlatformTable {
                ios:     PlatformParams { multiplier: 1.4 },
                android: PlatformParams { multiplier: 1.0 },
            },
            seasonal_bands: vec![
                SeasonalBand { last_month: 3,  factor: 1.15 },
                SeasonalBand { last_month: 6,  factor: 0.95 },
                SeasonalBand { last_month: 9,  factor: 0.90 },
                SeasonalBand { last_month: 12, factor: 1.10 },
            ],
            weekend_boost: 1.2,
            growth_over_window: 0.15,
            spike_tiers: vec![
                SpikeTier { threshold: 0.97, base: 2.5, span: 1.5 },
                SpikeTier { threshold: 0.93, base: 1.6, span: 0.6 },
            ],
            dip_tiers: vec![
                DipTier { threshold: 0.98, factor: 0.4 },
                DipTier { threshold: 0.95, factor: 0.7 },
            ],
            trial_start_ratio: 0.6,
            jitter: JitterConfig {
                new_subs:          Jitter { low: 0.85, span: 0.3 },
                cancellations:     Jitter { low: 0.7,  span: 0.6 },
                trial_starts:      Jitter { low: 0.8,  span: 0.4 },
                trial_conversions: Jitter { low: 0.75, span: 0.5 },
            },
        }
    }
}

fn invalid(field: &str, reason: String) -> DashError {
    DashError::InvalidConfig {
        field: field.to_string(),
        reason,
    }
}

fn non_negative(field: &str, value: f64) -> DashResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be a finite value >= 0, got {value}")))
    }
}

fn unit_interval(field: &str, value: f64) -> DashResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be within [0, 1], got {value}")))
    }
}
