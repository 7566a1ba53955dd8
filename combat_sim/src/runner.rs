//! Running scenarios with replayable seeds

use crate::scenario::Scenario;
use combat_core::config::{ConfigError, MonsterDefinition};
use combat_core::{CombatRules, EncounterOutcome, EncounterReport, SkillBook};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Outcome counts across a batch of runs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    pub victories: u32,
    pub defeats: u32,
    pub fled: u32,
    pub stalled: u32,
    pub rounds: u64,
    pub actions: u64,
}

impl Tally {
    pub fn record(&mut self, report: &EncounterReport) {
        match report.outcome {
            EncounterOutcome::Victory => self.victories += 1,
            EncounterOutcome::Defeat => self.defeats += 1,
            EncounterOutcome::Fled => self.fled += 1,
            EncounterOutcome::Stalled => self.stalled += 1,
        }
        self.rounds += u64::from(report.rounds);
        self.actions += u64::from(report.actions);
    }

    pub fn runs(&self) -> u32 {
        self.victories + self.defeats + self.fled + self.stalled
    }

    pub fn win_rate(&self) -> f64 {
        match self.runs() {
            0 => 0.0,
            runs => f64::from(self.victories) / f64::from(runs),
        }
    }

    pub fn average_rounds(&self) -> f64 {
        match self.runs() {
            0 => 0.0,
            runs => self.rounds as f64 / f64::from(runs),
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} runs: {} won, {} lost, {} fled, {} stalled ({:.1}% win rate, {:.1} rounds on average)",
            self.runs(),
            self.victories,
            self.defeats,
            self.fled,
            self.stalled,
            self.win_rate() * 100.0,
            self.average_rounds()
        )
    }
}

/// Play one encounter to the end with a fixed seed
pub fn run_once(
    scenario: &Scenario,
    book: &SkillBook,
    bestiary: &[MonsterDefinition],
    rules: Arc<CombatRules>,
    seed: u64,
) -> Result<EncounterReport, ConfigError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut context = scenario.build(book, bestiary, rules)?;
    let outcome = context.run(&mut rng);
    debug!(seed, %outcome, "run finished");
    Ok(context.finish(&mut rng))
}

/// Play `scenario.runs` encounters on consecutive seeds
///
/// Returns the first run's report and the tally over all runs.
pub fn run_batch(
    scenario: &Scenario,
    book: &SkillBook,
    bestiary: &[MonsterDefinition],
    rules: Arc<CombatRules>,
) -> Result<(EncounterReport, Tally), ConfigError> {
    let mut tally = Tally::default();
    let first = run_once(scenario, book, bestiary, Arc::clone(&rules), scenario.seed)?;
    tally.record(&first);

    for run in 1..scenario.runs.max(1) {
        let seed = scenario.seed.wrapping_add(u64::from(run));
        let report = run_once(scenario, book, bestiary, Arc::clone(&rules), seed)?;
        tally.record(&report);
    }

    Ok((first, tally))
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::config::{default_monsters, default_skill_book};

    #[test]
    fn test_same_seed_replays() {
        let scenario = Scenario::demo().unwrap();
        let book = default_skill_book().unwrap();
        let bestiary = default_monsters().unwrap();
        let rules = Arc::new(CombatRules::with_defaults().unwrap());

        let a = run_once(&scenario, &book, &bestiary, Arc::clone(&rules), 11).unwrap();
        let b = run_once(&scenario, &book, &bestiary, rules, 11).unwrap();
        assert_eq!(a.log, b.log);
        assert_eq!(a.outcome, b.outcome);
    }

    #[test]
    fn test_batch_counts_every_run() {
        let mut scenario = Scenario::demo().unwrap();
        scenario.runs = 5;
        let book = default_skill_book().unwrap();
        let bestiary = default_monsters().unwrap();
        let rules = Arc::new(CombatRules::with_defaults().unwrap());

        let (_, tally) = run_batch(&scenario, &book, &bestiary, rules).unwrap();
        assert_eq!(tally.runs(), 5);
        assert!(tally.win_rate() >= 0.0 && tally.win_rate() <= 1.0);
    }

    #[test]
    fn test_empty_tally() {
        let tally = Tally::default();
        assert_eq!(tally.win_rate(), 0.0);
        assert!(tally.to_string().starts_with("0 runs"));
    }
}
