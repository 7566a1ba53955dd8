//! Combat log and end-of-encounter report

use crate::types::{EntityHandle, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered, human-readable lines produced by an encounter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatLog {
    lines: Vec<String>,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, lines: I) {
        self.lines.extend(lines);
    }

    pub fn round_header(&mut self, round: u32) {
        self.lines.push(format!("=== Round {} ===", round));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Take every line written so far, leaving the log empty
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl fmt::Display for CombatLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// How an encounter ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterOutcome {
    Victory,
    Defeat,
    Fled,
    /// The action budget ran out
    Stalled,
}

impl fmt::Display for EncounterOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncounterOutcome::Victory => "Victory",
            EncounterOutcome::Defeat => "Defeat",
            EncounterOutcome::Fled => "Fled",
            EncounterOutcome::Stalled => "Stalled",
        };
        f.write_str(name)
    }
}

/// Final HP and status of one combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantReport {
    pub handle: EntityHandle,
    pub name: String,
    pub side: Side,
    pub starting_hp: i64,
    pub hp: i64,
    pub max_hp: i64,
    /// Status effects still active, as "Name xStacks (Nr)"
    pub statuses: Vec<String>,
}

impl CombatantReport {
    pub fn hp_delta(&self) -> i64 {
        self.hp - self.starting_hp
    }
}

/// Everything the presentation layer needs after an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterReport {
    pub outcome: EncounterOutcome,
    pub rounds: u32,
    pub actions: u32,
    pub combatants: Vec<CombatantReport>,
    pub log: Vec<String>,
}

impl EncounterReport {
    pub fn combatant(&self, handle: EntityHandle) -> Option<&CombatantReport> {
        self.combatants.iter().find(|c| c.handle == handle)
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "{} after {} rounds ({} actions)",
            self.outcome, self.rounds, self.actions
        )];
        for combatant in &self.combatants {
            let mut part = format!(
                "{} {}/{} HP ({:+})",
                combatant.name,
                combatant.hp,
                combatant.max_hp,
                combatant.hp_delta()
            );
            if !combatant.statuses.is_empty() {
                part.push_str(&format!(" [{}]", combatant.statuses.join(", ")));
            }
            parts.push(part);
        }
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_drain() {
        let mut log = CombatLog::new();
        log.round_header(1);
        log.push("Hero attacks.");
        assert_eq!(log.len(), 2);
        assert!(log.contains("Round 1"));
        let lines = log.drain();
        assert_eq!(lines.len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_report_summary() {
        let report = EncounterReport {
            outcome: EncounterOutcome::Victory,
            rounds: 3,
            actions: 7,
            combatants: vec![CombatantReport {
                handle: EntityHandle(0),
                name: "Hero".to_string(),
                side: Side::Player,
                starting_hp: 100,
                hp: 80,
                max_hp: 100,
                statuses: vec!["Burn x2 (1r)".to_string()],
            }],
            log: Vec::new(),
        };
        let summary = report.summary();
        assert!(summary.starts_with("Victory after 3 rounds"));
        assert!(summary.contains("Hero 80/100 HP (-20)"));
        assert!(summary.contains("Burn x2"));
    }
}
