//! Damage pipeline - fixed-order mitigation for any incoming damage
//!
//! Order:
//! 1. Invulnerability short-circuit
//! 2. Elemental immunity short-circuit
//! 3. Elemental resistance (capped at 75%, at least 1 damage remains)
//! 4. Shield absorption (overflow passes through)
//! 5. HP loss (floored at 0)
//! 6. Reflection back at the attacker, skipped for reflected damage

use crate::combatant::Roster;
use crate::config::CombatConstants;
use crate::error::StateError;
use crate::types::{Element, EntityHandle};
use tracing::debug;

/// One instance of incoming damage
#[derive(Debug, Clone, PartialEq)]
pub struct DamageRequest {
    pub target: EntityHandle,
    pub raw: i64,
    pub attacker: Option<EntityHandle>,
    pub attribute: Element,
    /// Reflected damage never reflects again
    pub is_reflected: bool,
}

impl DamageRequest {
    pub fn new(target: EntityHandle, raw: i64, attribute: Element) -> Self {
        DamageRequest {
            target,
            raw,
            attacker: None,
            attribute,
            is_reflected: false,
        }
    }

    pub fn from_attacker(mut self, attacker: EntityHandle) -> Self {
        self.attacker = Some(attacker);
        self
    }

    pub fn reflected(mut self) -> Self {
        self.is_reflected = true;
        self
    }
}

/// Result of running the pipeline once
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageResult {
    pub raw: i64,
    /// Damage left after resistance
    pub after_resistance: i64,
    pub absorbed: i64,
    /// HP actually lost
    pub actual: i64,
    /// HP the attacker lost to reflection
    pub reflected: i64,
    pub was_immune: bool,
    pub was_invulnerable: bool,
    pub target_died: bool,
    pub logs: Vec<String>,
    /// The nested, non-reflecting call against the attacker
    pub reflected_result: Option<Box<DamageResult>>,
}

impl DamageResult {
    /// Damage that reached the target, shields included
    pub fn landed(&self) -> i64 {
        self.actual + self.absorbed
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        if self.was_invulnerable {
            return "Invulnerable".to_string();
        }
        if self.was_immune {
            return "Immune".to_string();
        }

        let mut parts = vec![format!("{} damage taken", self.actual)];
        if self.raw > self.after_resistance {
            parts.push(format!("{} resisted", self.raw - self.after_resistance));
        }
        if self.absorbed > 0 {
            parts.push(format!("{} absorbed", self.absorbed));
        }
        if self.reflected > 0 {
            parts.push(format!("{} reflected", self.reflected));
        }
        if self.target_died {
            parts.push("FATAL".to_string());
        }
        parts.join(", ")
    }
}

/// Run incoming damage through every mitigation step
///
/// Fails only when the target is absent or already dead.
pub fn process_incoming_damage(
    roster: &mut Roster,
    request: &DamageRequest,
    constants: &CombatConstants,
) -> Result<DamageResult, StateError> {
    let target_name = roster.require_living(request.target)?.name.clone();
    let snapshot = roster
        .snapshot(request.target)
        .ok_or(StateError::UnknownHandle(request.target))?;

    let raw = request.raw.max(0);
    let mut result = DamageResult {
        raw,
        ..DamageResult::default()
    };

    // Step 1: invulnerability
    if snapshot.invulnerable {
        result.was_invulnerable = true;
        result
            .logs
            .push(format!("{} is invulnerable and takes no damage!", target_name));
        return Ok(result);
    }

    // Step 2: immunity
    if snapshot.is_immune(request.attribute) {
        result.was_immune = true;
        result.logs.push(format!(
            "{} is immune to {} damage!",
            target_name, request.attribute
        ));
        return Ok(result);
    }

    // Step 3: resistance
    let resist = snapshot
        .resist
        .get(request.attribute)
        .clamp(0.0, constants.resistance.cap);
    let mut damage = raw;
    if resist > 0.0 && raw > 0 {
        let reduced = (raw as f64 * resist).floor() as i64;
        damage = (raw - reduced).max(1);
        result.logs.push(format!(
            "{} resists {} {} damage.",
            target_name,
            raw - damage,
            request.attribute
        ));
    }
    result.after_resistance = damage;

    // Step 4: shields
    let target = roster.require_mut(request.target)?;
    let absorbed = target.effects.absorb(damage);
    if absorbed > 0 {
        result
            .logs
            .push(format!("{}'s shield absorbs {} damage.", target_name, absorbed));
    }
    result.absorbed = absorbed;

    // Step 5: HP
    let remaining = damage - absorbed;
    target.stats.hp = (target.stats.hp - remaining).max(0);
    result.actual = remaining;
    result.target_died = target.stats.hp == 0;
    if remaining > 0 || absorbed == 0 {
        result.logs.push(format!(
            "{} takes {} damage. (HP {}/{})",
            target_name,
            remaining,
            target.stats.hp,
            snapshot.max_hp()
        ));
    }

    debug!(
        target = %request.target,
        raw,
        after_resistance = damage,
        absorbed,
        actual = remaining,
        reflected = request.is_reflected,
        "damage resolved"
    );

    // Step 6: reflection, off everything that landed including shield hits
    let landed = result.actual + result.absorbed;
    if !request.is_reflected && landed > 0 && snapshot.reflect() > 0.0 {
        if let Some(attacker) = request.attacker.filter(|a| *a != request.target) {
            if let Ok(source) = roster.require_living(attacker) {
                let amount = ((landed as f64 * snapshot.reflect()).floor() as i64).max(1);
                result.logs.push(format!(
                    "{} reflects {} damage back at {}!",
                    target_name, amount, source.name
                ));
                let reflected = process_incoming_damage(
                    roster,
                    &DamageRequest::new(attacker, amount, request.attribute)
                        .from_attacker(request.target)
                        .reflected(),
                    constants,
                )?;
                result.reflected = reflected.actual;
                result.logs.extend(reflected.logs.iter().cloned());
                result.reflected_result = Some(Box::new(reflected));
            }
        }
    }

    Ok(result)
}

/// Apply every damage-over-time tick on one combatant
///
/// Ticks have no attacker, so they are never reflected. Stops early if the
/// combatant dies. Returns the log lines.
pub fn tick_damage_over_time(
    roster: &mut Roster,
    handle: EntityHandle,
    constants: &CombatConstants,
) -> Result<Vec<String>, StateError> {
    let combatant = roster.require_living(handle)?;
    let name = combatant.name.clone();
    let max_hp = roster
        .snapshot(handle)
        .map(|s| s.max_hp())
        .unwrap_or(combatant.stats.max_hp);
    let ticks = roster.require(handle)?.effects.dot_ticks(max_hp);

    let mut logs = Vec::new();
    for tick in ticks {
        logs.push(format!("{} suffers from {}.", name, tick.name));
        let result = process_incoming_damage(
            roster,
            &DamageRequest::new(handle, tick.damage, tick.element),
            constants,
        )?;
        logs.extend(result.logs);
        if result.target_died {
            break;
        }
    }
    Ok(logs)
}
