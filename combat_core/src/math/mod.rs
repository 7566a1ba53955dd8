//! Numeric combat math - pure damage, crit and hit formulas
//!
//! Nothing in here holds state. Every random roll takes the RNG as an
//! argument so a seeded generator replays a fight exactly.

mod crit;
mod damage;
mod hit;

pub use crit::{crit_multiplier, effective_crit_rate, roll_crit};
pub use damage::{
    apply_variance, attribute_multiplier, effective_penetration, magical_damage,
    mitigated_damage, physical_damage,
};
pub use hit::{hit_rate, roll_hit};
