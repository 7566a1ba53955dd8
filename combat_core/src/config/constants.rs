//! Combat balance constants

use serde::{Deserialize, Serialize};

/// Tunable combat constants
///
/// `Default` matches the balance values every definition file is authored
/// against; changing them breaks compatibility with existing data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default)]
    pub damage: DamageConstants,
    #[serde(default)]
    pub crit: CritConstants,
    #[serde(default)]
    pub hit: HitConstants,
    #[serde(default)]
    pub resistance: ResistanceConstants,
    #[serde(default)]
    pub gauge: GaugeConstants,
    #[serde(default)]
    pub encounter: EncounterConstants,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageConstants {
    /// Upper bound on armour penetration plus defense ignore
    #[serde(default = "default_armor_pen_cap")]
    pub armor_pen_cap: f64,
    /// Share of defense subtracted from physical hits
    #[serde(default = "default_physical_defense_ratio")]
    pub physical_defense_ratio: f64,
    /// Share of magic defense subtracted from magical hits
    #[serde(default = "default_magical_defense_ratio")]
    pub magical_defense_ratio: f64,
    /// Final damage is scaled by a uniform factor in [1 - variance, 1 + variance]
    #[serde(default = "default_variance")]
    pub variance: f64,
    /// Lower bound on any hit that connects
    #[serde(default = "default_min_damage")]
    pub min_damage: i64,
    /// Damage multiplier when the attacker's element is strong against the target
    #[serde(default = "default_element_advantage")]
    pub element_advantage: f64,
    /// Damage multiplier when the target's element is strong against the attacker
    #[serde(default = "default_element_disadvantage")]
    pub element_disadvantage: f64,
}

impl Default for DamageConstants {
    fn default() -> Self {
        DamageConstants {
            armor_pen_cap: default_armor_pen_cap(),
            physical_defense_ratio: default_physical_defense_ratio(),
            magical_defense_ratio: default_magical_defense_ratio(),
            variance: default_variance(),
            min_damage: default_min_damage(),
            element_advantage: default_element_advantage(),
            element_disadvantage: default_element_disadvantage(),
        }
    }
}

fn default_armor_pen_cap() -> f64 {
    0.70
}
fn default_physical_defense_ratio() -> f64 {
    0.5
}
fn default_magical_defense_ratio() -> f64 {
    0.4
}
fn default_variance() -> f64 {
    0.20
}
fn default_min_damage() -> i64 {
    1
}
fn default_element_advantage() -> f64 {
    1.25
}
fn default_element_disadvantage() -> f64 {
    0.8
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritConstants {
    /// Critical strike multiplier when no skill overrides it
    #[serde(default = "default_crit_multiplier")]
    pub base_multiplier: f64,
    /// Crit rates above this are treated as this
    #[serde(default = "default_crit_rate_cap")]
    pub rate_cap: f64,
}

impl Default for CritConstants {
    fn default() -> Self {
        CritConstants {
            base_multiplier: default_crit_multiplier(),
            rate_cap: default_crit_rate_cap(),
        }
    }
}

fn default_crit_multiplier() -> f64 {
    1.5
}
fn default_crit_rate_cap() -> f64 {
    0.80
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitConstants {
    #[serde(default = "default_min_hit_rate")]
    pub min_rate: f64,
    #[serde(default = "default_max_hit_rate")]
    pub max_rate: f64,
}

impl Default for HitConstants {
    fn default() -> Self {
        HitConstants {
            min_rate: default_min_hit_rate(),
            max_rate: default_max_hit_rate(),
        }
    }
}

fn default_min_hit_rate() -> f64 {
    5.0
}
fn default_max_hit_rate() -> f64 {
    100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistanceConstants {
    /// Maximum total elemental resistance
    #[serde(default = "default_resist_cap")]
    pub cap: f64,
}

impl Default for ResistanceConstants {
    fn default() -> Self {
        ResistanceConstants {
            cap: default_resist_cap(),
        }
    }
}

fn default_resist_cap() -> f64 {
    0.75
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeConstants {
    /// Gauge value at which a combatant may act
    #[serde(default = "default_gauge_max")]
    pub max: u32,
    /// Gauge gained per tick is `floor(speed * fill_multiplier)`
    #[serde(default = "default_fill_multiplier")]
    pub fill_multiplier: f64,
    /// Gauge spent per action
    #[serde(default = "default_action_cost")]
    pub action_cost: u32,
    /// Round-marker gauge gained per tick
    #[serde(default = "default_round_marker_fill")]
    pub round_marker_fill: u32,
}

impl Default for GaugeConstants {
    fn default() -> Self {
        GaugeConstants {
            max: default_gauge_max(),
            fill_multiplier: default_fill_multiplier(),
            action_cost: default_action_cost(),
            round_marker_fill: default_round_marker_fill(),
        }
    }
}

fn default_gauge_max() -> u32 {
    10
}
fn default_fill_multiplier() -> f64 {
    1.0
}
fn default_action_cost() -> u32 {
    10
}
fn default_round_marker_fill() -> u32 {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterConstants {
    /// Actions after which an encounter is forcibly ended
    #[serde(default = "default_max_actions")]
    pub max_actions: u32,
    #[serde(default = "default_max_monsters")]
    pub max_monsters: usize,
    /// Skill slots in a player's deck
    #[serde(default = "default_deck_size")]
    pub deck_size: usize,
    /// Hp ratio below which "low hp" conditions hold
    #[serde(default = "default_low_hp_threshold")]
    pub low_hp_threshold: f64,
}

impl Default for EncounterConstants {
    fn default() -> Self {
        EncounterConstants {
            max_actions: default_max_actions(),
            max_monsters: default_max_monsters(),
            deck_size: default_deck_size(),
            low_hp_threshold: default_low_hp_threshold(),
        }
    }
}

fn default_max_actions() -> u32 {
    100
}
fn default_max_monsters() -> usize {
    3
}
fn default_deck_size() -> usize {
    10
}
fn default_low_hp_threshold() -> f64 {
    0.3
}
