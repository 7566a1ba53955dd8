//! CombatContext - the encounter state machine
//!
//! One `step` is one scheduling decision: gauges fill until someone is ready
//! (advancing rounds as the marker fills), then that combatant takes a turn:
//! CC check, turn-start hooks, draw, skill resolution, turn-end hooks.

use super::gauge::ActionGauge;
use super::scope::ActionScope;
use super::state::ComponentStateStore;
use super::CombatRules;
use crate::combatant::{Combatant, Roster};
use crate::config::ConfigError;
use crate::error::{CombatError, StateError};
use crate::log::{CombatLog, CombatantReport, EncounterOutcome, EncounterReport};
use crate::pipeline;
use crate::skill::Skill;
use crate::types::{EntityHandle, Side, TargetingMode};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Pick a target among living candidates
pub fn select_target<R: Rng + ?Sized>(
    roster: &Roster,
    candidates: &[EntityHandle],
    mode: TargetingMode,
    rng: &mut R,
) -> Option<EntityHandle> {
    let hp = |h: &EntityHandle| roster.get(*h).map(|c| c.hp()).unwrap_or(0);
    match mode {
        TargetingMode::LowestHp => candidates.iter().copied().min_by_key(|h| hp(h)),
        TargetingMode::HighestHp => candidates.iter().copied().max_by_key(|h| hp(h)),
        TargetingMode::Random => candidates.choose(rng).copied(),
        TargetingMode::First => candidates.first().copied(),
    }
}

/// A single encounter between the player and 1-3 monsters
#[derive(Debug)]
pub struct CombatContext {
    roster: Roster,
    rules: Arc<CombatRules>,
    targeting: TargetingMode,
    player: EntityHandle,
    gauge: ActionGauge,
    states: ComponentStateStore,
    log: CombatLog,
    starting_hp: Vec<i64>,
    actions: u32,
    started: bool,
    flee_requested: bool,
    outcome: Option<EncounterOutcome>,
}

impl CombatContext {
    /// Assign handles and prepare the gauges
    ///
    /// A combatant that enters at full HP is topped up to its effective max
    /// HP, passives included.
    pub fn new(
        player: Combatant,
        monsters: Vec<Combatant>,
        targeting: TargetingMode,
        rules: Arc<CombatRules>,
    ) -> Result<Self, ConfigError> {
        let max_monsters = rules.constants.encounter.max_monsters;
        if monsters.is_empty() || monsters.len() > max_monsters {
            return Err(ConfigError::ValidationError(format!(
                "an encounter needs 1 to {} monsters, got {}",
                max_monsters,
                monsters.len()
            )));
        }

        let mut roster = Roster::new();
        let player = roster.add(Combatant {
            side: Side::Player,
            ..player
        });
        for monster in monsters {
            roster.add(Combatant {
                side: Side::Monster,
                ..monster
            });
        }

        for handle in roster.handles() {
            let max_hp = match roster.snapshot(handle) {
                Some(snapshot) => snapshot.max_hp(),
                None => continue,
            };
            if let Some(combatant) = roster.get_mut(handle) {
                if combatant.stats.hp >= combatant.stats.max_hp {
                    combatant.stats.hp = max_hp;
                } else {
                    combatant.stats.hp = combatant.stats.hp.min(max_hp);
                }
            }
        }

        let starting_hp = roster.iter().map(|c| c.hp()).collect();
        let gauge = ActionGauge::new(roster.handles());
        info!(combatants = roster.len(), "encounter created");

        Ok(CombatContext {
            roster,
            rules,
            targeting,
            player,
            gauge,
            states: ComponentStateStore::new(),
            log: CombatLog::new(),
            starting_hp,
            actions: 0,
            started: false,
            flee_requested: false,
            outcome: None,
        })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn rules(&self) -> &CombatRules {
        &self.rules
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn player(&self) -> EntityHandle {
        self.player
    }

    pub fn round(&self) -> u32 {
        self.gauge.round()
    }

    pub fn actions(&self) -> u32 {
        self.actions
    }

    pub fn gauge(&self) -> &ActionGauge {
        &self.gauge
    }

    pub fn outcome(&self) -> Option<EncounterOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    fn scope<'s>(&'s mut self, rng: &'s mut dyn RngCore, owner: EntityHandle) -> ActionScope<'s> {
        ActionScope::new(
            &mut self.roster,
            &self.rules,
            &mut self.states,
            &mut self.log,
            rng,
            owner,
        )
    }

    fn living(&self) -> Vec<EntityHandle> {
        self.roster.living().map(|c| c.handle).collect()
    }

    /// Fire combat-start hooks; `step` calls this on first use
    pub fn start(&mut self, rng: &mut dyn RngCore) {
        if self.started {
            return;
        }
        self.started = true;

        let monsters: Vec<String> = self
            .roster
            .iter()
            .filter(|c| c.side == Side::Monster)
            .map(|c| c.name.clone())
            .collect();
        let player_name = self
            .roster
            .get(self.player)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        self.log
            .push(format!("{} encounters {}!", player_name, monsters.join(", ")));
        self.log.round_header(self.gauge.round());

        for handle in self.roster.handles() {
            let mut scope = self.scope(&mut *rng, handle);
            scope.dispatch_passives(handle, |c, s| c.on_combat_start(s));
        }
        self.process_deaths(rng);
    }

    /// Request a flee; takes effect before the next action
    pub fn abort(&mut self) {
        self.flee_requested = true;
    }

    /// Run one scheduling decision and at most one action
    ///
    /// Returns the outcome once the encounter reaches a terminal state.
    pub fn step(&mut self, rng: &mut dyn RngCore) -> Result<Option<EncounterOutcome>, StateError> {
        if self.outcome.is_some() {
            return Err(StateError::EncounterFinished);
        }
        if !self.started {
            self.start(&mut *rng);
            if let Some(outcome) = self.check_outcome() {
                return Ok(Some(outcome));
            }
        }
        if self.flee_requested {
            self.log.push("You fled from battle.");
            return Ok(Some(self.conclude(EncounterOutcome::Fled)));
        }

        let limit = self.rules.constants.encounter.max_actions;
        if self.actions >= limit {
            let err = CombatError::BudgetExceeded { limit };
            warn!(%err, "ending encounter");
            self.log.push(format!(
                "The battle drags on too long and ends after {} actions.",
                limit
            ));
            return Ok(Some(self.conclude(EncounterOutcome::Stalled)));
        }

        let gauge_constants = self.rules.constants.gauge.clone();
        loop {
            let living = self.living();
            if let Some(actor) = self.gauge.next_ready(&living, &gauge_constants, &mut *rng) {
                self.take_turn(actor, &mut *rng);
                self.gauge.consume(actor, &gauge_constants);
                self.actions += 1;
                self.process_deaths(&mut *rng);
                return Ok(self.check_outcome());
            }

            if self.gauge.round_due(&gauge_constants) {
                self.advance_round(&mut *rng);
                if let Some(outcome) = self.check_outcome() {
                    return Ok(Some(outcome));
                }
                continue;
            }

            let amounts = self.fill_amounts();
            if amounts.iter().all(|&(_, amount)| amount == 0) {
                warn!("no combatant can fill its gauge, ending encounter");
                self.log.push("Nobody is able to move. The battle stalls.");
                return Ok(Some(self.conclude(EncounterOutcome::Stalled)));
            }
            self.gauge.fill(&amounts, &gauge_constants);
        }
    }

    /// Step until a terminal outcome
    pub fn run(&mut self, rng: &mut dyn RngCore) -> EncounterOutcome {
        loop {
            match self.step(&mut *rng) {
                Ok(Some(outcome)) => return outcome,
                Ok(None) => {}
                Err(_) => return self.outcome.unwrap_or(EncounterOutcome::Fled),
            }
        }
    }

    /// Fire combat-end hooks and build the report
    ///
    /// An encounter that never reached a terminal state is recorded as fled.
    pub fn finish(mut self, rng: &mut dyn RngCore) -> EncounterReport {
        let outcome = match self.outcome {
            Some(outcome) => outcome,
            None => {
                self.log.push("The battle ends without a victor.");
                self.conclude(EncounterOutcome::Fled)
            }
        };

        for handle in self.living() {
            let mut scope = self.scope(&mut *rng, handle);
            scope.dispatch_passives(handle, |c, s| c.on_combat_end(s));
        }
        info!(%outcome, rounds = self.gauge.round(), actions = self.actions, "encounter finished");

        let combatants = self
            .roster
            .iter()
            .map(|c| CombatantReport {
                handle: c.handle,
                name: c.name.clone(),
                side: c.side,
                starting_hp: self.starting_hp.get(c.handle.index()).copied().unwrap_or(0),
                hp: c.hp(),
                max_hp: self
                    .roster
                    .snapshot(c.handle)
                    .map(|s| s.max_hp())
                    .unwrap_or(c.stats.max_hp),
                statuses: c.status_summary(),
            })
            .collect();

        EncounterReport {
            outcome,
            rounds: self.gauge.round(),
            actions: self.actions,
            combatants,
            log: self.log.drain(),
        }
    }

    fn take_turn(&mut self, actor: EntityHandle, rng: &mut dyn RngCore) {
        let (name, side, attribute, cc) = match self.roster.get(actor) {
            Some(c) => (
                c.name.clone(),
                c.side,
                c.attribute,
                c.effects.cc_effect_name().map(str::to_string),
            ),
            None => return,
        };
        debug!(%actor, %name, "turn");

        if let Some(effect) = cc {
            self.log
                .push(format!("{} is affected by {} and cannot act!", name, effect));
            return;
        }

        let targeting = if side == Side::Player {
            self.targeting
        } else {
            TargetingMode::First
        };

        let mut scope = self.scope(rng, actor);
        scope.dispatch_passives(actor, |c, s| c.on_turn_start(s));
        if !scope.is_alive(actor) {
            return;
        }

        let skill = match side {
            Side::Player => {
                let drawn = scope.roster.get_mut(actor).and_then(|c| c.draw_next());
                match drawn {
                    Some(skill) => {
                        scope.dispatch_passives(actor, |c, s| c.on_draw_skill(&skill, s));
                        skill
                    }
                    None => Arc::new(Skill::basic_attack(attribute)),
                }
            }
            Side::Monster => {
                let skills = scope
                    .roster
                    .get(actor)
                    .map(|c| c.active_skills())
                    .unwrap_or_default();
                match skills.choose(&mut *scope.rng) {
                    Some(skill) => Arc::clone(skill),
                    None => Arc::new(Skill::basic_attack(attribute)),
                }
            }
        };

        let enemies = scope.enemies();
        let target = select_target(&*scope.roster, &enemies, targeting, &mut *scope.rng);
        let Some(target) = target else {
            return;
        };

        scope.target = Some(target);
        scope.action = Some((actor, Arc::clone(&skill)));
        scope.log.push(format!("{} uses {}!", name, skill.name));
        scope.dispatch_passives(actor, |c, s| c.on_skill_used(s));
        scope.dispatch_skill(actor, &skill, |c, s| c.on_turn(s));
        scope.action = None;

        if scope.is_alive(actor) {
            scope.dispatch_passives(actor, |c, s| c.on_turn_end(s));
        }
    }

    /// Run death hooks for anyone at 0 HP; those not revived are defeated
    fn process_deaths(&mut self, rng: &mut dyn RngCore) {
        for handle in self.roster.handles() {
            let pending = self
                .roster
                .get(handle)
                .map(|c| !c.defeated && !c.is_alive())
                .unwrap_or(false);
            if !pending {
                continue;
            }

            let mut scope = self.scope(&mut *rng, handle);
            scope.dispatch_passives(handle, |c, s| c.on_death(s));
            if scope.is_alive(handle) {
                continue;
            }

            if let Some(combatant) = self.roster.get_mut(handle) {
                combatant.defeated = true;
                combatant.effects.clear();
                let line = format!("{} was defeated.", combatant.name);
                info!(%handle, name = %combatant.name, "combatant defeated");
                self.log.push(line);
            }
            self.gauge.remove(handle);
        }
    }

    /// DoT ticks, then duration decay, for every living combatant
    fn advance_round(&mut self, rng: &mut dyn RngCore) {
        let round = self.gauge.advance_round(&self.rules.constants.gauge);
        self.log.round_header(round);
        debug!(round, "round advance");

        for handle in self.living() {
            match pipeline::tick_damage_over_time(&mut self.roster, handle, &self.rules.constants) {
                Ok(lines) => self.log.extend(lines),
                Err(err) => warn!(%handle, error = %err, "damage over time skipped"),
            }
        }
        for handle in self.living() {
            if let Some(combatant) = self.roster.get_mut(handle) {
                let name = combatant.name.clone();
                let lines = combatant.effects.decay_all_durations(&name);
                self.log.extend(lines);
            }
        }
        self.process_deaths(rng);
    }

    fn fill_amounts(&self) -> Vec<(EntityHandle, u32)> {
        let constants = &self.rules.constants.gauge;
        self.roster
            .living()
            .filter_map(|c| {
                let snapshot = self.roster.snapshot(c.handle)?;
                let bonus = self.rules.synergies.bonus(&c.deck);
                Some((
                    c.handle,
                    ActionGauge::fill_amount(snapshot.speed(), bonus.speed, constants),
                ))
            })
            .collect()
    }

    fn check_outcome(&mut self) -> Option<EncounterOutcome> {
        if let Some(outcome) = self.outcome {
            return Some(outcome);
        }
        if self.roster.side_defeated(Side::Player) {
            self.log.push("You have been defeated...");
            return Some(self.conclude(EncounterOutcome::Defeat));
        }
        if self.roster.side_defeated(Side::Monster) {
            self.log.push("Victory!");
            return Some(self.conclude(EncounterOutcome::Victory));
        }
        None
    }

    fn conclude(&mut self, outcome: EncounterOutcome) -> EncounterOutcome {
        self.outcome = Some(outcome);
        info!(%outcome, actions = self.actions, "encounter concluded");
        outcome
    }
}
