//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through SegmentRng instances, one per
//! segment, each seeded from that segment's fixed slot seed.
//!
//! The stream is a 32-bit linear congruential generator so the
//! synthetic data matches the dashboard's demo figures exactly.

use crate::types::{Plan, Platform};
use rand::{RngCore, SeedableRng};

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT:  u32 = 1_013_904_223;

/// `s <- s * 1664525 + 1013904223 (mod 2^32)`.
#[derive(Debug, Clone)]
pub struct Lcg32 {
    state: u32,
}

impl Lcg32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }
}

impl RngCore for Lcg32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.next_u32());
        let hi = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Lcg32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// A named, deterministic RNG for a single segment.
pub struct SegmentRng {
    pub name: &'static str,
    inner: Lcg32,
}

impl SegmentRng {
    pub fn new(seed: u32) -> Self {
        Self {
            name: "unnamed",
            inner: Lcg32::from_seed(seed.to_le_bytes()),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0]. The upper bound is reachable.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.inner.next_u32()) / f64::from(u32::MAX)
    }

    /// `low + roll * span`, a multiplicative noise factor.
    pub fn jitter(&mut self, low: f64, span: f64) -> f64 {
        low + self.next_f64() * span
    }
}

/// Stable segment slot assignments, in generation order.
/// NEVER reorder or remove entries; only append.
/// Each slot's seed is part of the demo data's identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentSlot {
    IosMonthly,
    IosAnnual,
    AndroidMonthly,
    AndroidAnnual,
}

impl SegmentSlot {
    pub const ALL: [SegmentSlot; 4] = [
        SegmentSlot::IosMonthly,
        SegmentSlot::IosAnnual,
        SegmentSlot::AndroidMonthly,
        SegmentSlot::AndroidAnnual,
    ];

    pub fn seed(&self) -> u32 {
        match self {
            Self::IosMonthly     => 42,
            Self::IosAnnual      => 137,
            Self::AndroidMonthly => 256,
            Self::AndroidAnnual  => 389,
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            Self::IosMonthly | Self::IosAnnual         => Platform::Ios,
            Self::AndroidMonthly | Self::AndroidAnnual => Platform::Android,
        }
    }

    pub fn plan(&self) -> Plan {
        match self {
            Self::IosMonthly | Self::AndroidMonthly => Plan::Monthly,
            Self::IosAnnual | Self::AndroidAnnual   => Plan::Annual,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::IosMonthly     => "ios_monthly",
            Self::IosAnnual      => "ios_annual",
            Self::AndroidMonthly => "android_monthly",
            Self::AndroidAnnual  => "android_annual",
        }
    }

    pub fn rng(&self) -> SegmentRng {
        SegmentRng::new(self.seed()).with_name(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lcg_matches_reference_recurrence() {
        let mut lcg = Lcg32::new(42);
        // 42 * 1664525 + 1013904223 = 1083814273
        assert_eq!(lcg.next_u32(), 1_083_814_273);
        // 1083814273 * 1664525 + 1013904223 mod 2^32
        assert_eq!(lcg.next_u32(), 378_494_188);
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = SegmentSlot::AndroidAnnual.rng();
        let mut b = SegmentRng::new(389);
        for _ in 0..1_000 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn rolls_stay_in_unit_interval() {
        let mut rng = SegmentRng::new(7);
        for _ in 0..10_000 {
            let x = rng.next_f64();
            assert!((0.0..=1.0).contains(&x), "roll {x} out of range");
        }
    }

    #[test]
    fn slots_cover_every_segment_once() {
        let mut pairs: Vec<_> = SegmentSlot::ALL
            .iter()
            .map(|s| (s.platform(), s.plan()))
            .collect();
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), 4);
    }
}
