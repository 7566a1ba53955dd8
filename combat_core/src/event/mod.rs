//! Combat events - mutable accumulators passed through component hooks
//!
//! One event is created per resolution step and handed to every component
//! in priority order. Mutating the event is the only way components
//! influence each other.

mod damage;
mod hit;

pub use damage::{DamageCalculationEvent, DamageDealtEvent, TakeDamageEvent};
pub use hit::HitCalculationEvent;
