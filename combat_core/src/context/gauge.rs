//! Action gauge - speed-driven turn order
//!
//! Each tick every living combatant gains `floor(speed * multiplier)` gauge
//! and the round marker gains a fixed amount. A combatant at or above the
//! gauge max may act; the fullest one goes first, ties broken at random.

use crate::config::GaugeConstants;
use crate::types::EntityHandle;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Gauge values for one encounter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionGauge {
    gauges: BTreeMap<EntityHandle, u32>,
    round_marker: u32,
    round: u32,
}

impl ActionGauge {
    /// Every combatant starts empty; the encounter starts in round 1
    pub fn new(handles: impl IntoIterator<Item = EntityHandle>) -> Self {
        ActionGauge {
            gauges: handles.into_iter().map(|h| (h, 0)).collect(),
            round_marker: 0,
            round: 1,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn gauge(&self, handle: EntityHandle) -> u32 {
        self.gauges.get(&handle).copied().unwrap_or(0)
    }

    pub fn round_marker(&self) -> u32 {
        self.round_marker
    }

    /// The next combatant to act among `living`, if any is ready
    pub fn next_ready<R: Rng + ?Sized>(
        &self,
        living: &[EntityHandle],
        constants: &GaugeConstants,
        rng: &mut R,
    ) -> Option<EntityHandle> {
        let ready: Vec<(EntityHandle, u32)> = living
            .iter()
            .map(|&h| (h, self.gauge(h)))
            .filter(|&(_, g)| g >= constants.max)
            .collect();
        let highest = ready.iter().map(|&(_, g)| g).max()?;
        let tied: Vec<EntityHandle> = ready
            .iter()
            .filter(|&&(_, g)| g == highest)
            .map(|&(h, _)| h)
            .collect();
        tied.choose(rng).copied()
    }

    /// Spend one action's worth of gauge, floored at 0
    pub fn consume(&mut self, handle: EntityHandle, constants: &GaugeConstants) {
        let gauge = self.gauges.entry(handle).or_insert(0);
        *gauge = gauge.saturating_sub(constants.action_cost);
    }

    pub fn round_due(&self, constants: &GaugeConstants) -> bool {
        self.round_marker >= constants.max
    }

    /// Move to the next round, keeping any marker overflow
    pub fn advance_round(&mut self, constants: &GaugeConstants) -> u32 {
        self.round_marker = self.round_marker.saturating_sub(constants.action_cost);
        self.round += 1;
        self.round
    }

    /// One scheduling tick with precomputed per-combatant fill amounts
    pub fn fill(&mut self, amounts: &[(EntityHandle, u32)], constants: &GaugeConstants) {
        for &(handle, amount) in amounts {
            let gauge = self.gauges.entry(handle).or_insert(0);
            *gauge = gauge.saturating_add(amount);
        }
        self.round_marker = self.round_marker.saturating_add(constants.round_marker_fill);
    }

    /// Gauge gained per tick for a given effective speed
    pub fn fill_amount(speed: f64, speed_bonus: f64, constants: &GaugeConstants) -> u32 {
        (speed * constants.fill_multiplier * speed_bonus).floor().max(0.0) as u32
    }

    /// Drop a defeated combatant's gauge
    pub fn remove(&mut self, handle: EntityHandle) {
        self.gauges.remove(&handle);
    }
}
