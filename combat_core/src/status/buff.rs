//! Buff - timed stat bonuses, shields and invulnerability

use crate::stats::{StatAccumulator, StatKind, StatSource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffKind {
    Attack,
    Defense,
    Speed,
    ApAttack,
    ApDefense,
    CritRate,
    Evasion,
    /// `amount` is the remaining absorb pool
    Shield,
    Invulnerable,
}

impl BuffKind {
    /// The stat a buff of this kind modifies, if any
    pub fn stat(&self) -> Option<StatKind> {
        match self {
            BuffKind::Attack => Some(StatKind::Attack),
            BuffKind::Defense => Some(StatKind::Defense),
            BuffKind::Speed => Some(StatKind::Speed),
            BuffKind::ApAttack => Some(StatKind::ApAttack),
            BuffKind::ApDefense => Some(StatKind::ApDefense),
            BuffKind::CritRate => Some(StatKind::CritRate),
            BuffKind::Evasion => Some(StatKind::Evasion),
            BuffKind::Shield | BuffKind::Invulnerable => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuffKind::Attack => "attack",
            BuffKind::Defense => "defense",
            BuffKind::Speed => "speed",
            BuffKind::ApAttack => "magic attack",
            BuffKind::ApDefense => "magic defense",
            BuffKind::CritRate => "crit rate",
            BuffKind::Evasion => "evasion",
            BuffKind::Shield => "shield",
            BuffKind::Invulnerable => "invulnerability",
        }
    }
}

/// A timed modifier on one combatant
#[derive(Debug, Clone, PartialEq)]
pub struct Buff {
    pub kind: BuffKind,
    /// Flat, signed amount (negative for most debuffs)
    pub amount: f64,
    /// Rounds remaining
    pub duration: u32,
    pub is_debuff: bool,
    /// Name of the skill that granted it; re-casting refreshes instead of stacking
    pub source: String,
}

impl Buff {
    pub fn new(kind: BuffKind, amount: f64, duration: u32, source: impl Into<String>) -> Self {
        Buff {
            kind,
            amount,
            duration,
            is_debuff: false,
            source: source.into(),
        }
    }

    pub fn debuff(kind: BuffKind, amount: f64, duration: u32, source: impl Into<String>) -> Self {
        Buff {
            is_debuff: true,
            ..Buff::new(kind, amount, duration, source)
        }
    }

    pub fn shield(amount: f64, duration: u32, source: impl Into<String>) -> Self {
        Buff::new(BuffKind::Shield, amount.max(0.0), duration, source)
    }

    /// Decrement the duration by one round
    /// Returns true if the buff is still active
    pub fn decay(&mut self) -> bool {
        self.duration = self.duration.saturating_sub(1);
        self.is_active()
    }

    pub fn is_active(&self) -> bool {
        if self.kind == BuffKind::Shield && self.amount <= 0.0 {
            return false;
        }
        self.duration > 0
    }

    pub fn describe(&self) -> String {
        match self.kind {
            BuffKind::Shield => format!("shield ({:.0})", self.amount),
            BuffKind::Invulnerable => "invulnerability".to_string(),
            kind => format!("{} {:+.0}", kind.name(), self.amount),
        }
    }
}

impl StatSource for Buff {
    fn apply(&self, stats: &mut StatAccumulator) {
        if let Some(stat) = self.kind.stat() {
            stats.add_flat(stat, self.amount);
        } else if self.kind == BuffKind::Invulnerable {
            stats.invulnerable = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatBlock;

    #[test]
    fn test_buff_applies_flat() {
        let buff = Buff::new(BuffKind::Attack, 15.0, 2, "War Cry");
        let mut acc = StatAccumulator::from_block(&StatBlock::default());
        buff.apply(&mut acc);
        assert!((acc.finish().attack() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_debuff() {
        let debuff = Buff::debuff(BuffKind::Defense, -30.0, 2, "Sunder");
        let mut acc = StatAccumulator::from_block(&StatBlock::default());
        debuff.apply(&mut acc);
        // clamps instead of going negative
        assert_eq!(acc.finish().defense(), 0.0);
    }

    #[test]
    fn test_depleted_shield_inactive() {
        let mut shield = Buff::shield(20.0, 3, "Barrier");
        assert!(shield.is_active());
        shield.amount = 0.0;
        assert!(!shield.is_active());
    }

    #[test]
    fn test_invulnerable_sets_flag() {
        let buff = Buff::new(BuffKind::Invulnerable, 0.0, 1, "Divine Shield");
        let mut acc = StatAccumulator::from_block(&StatBlock::default());
        buff.apply(&mut acc);
        assert!(acc.finish().invulnerable);
    }
}
