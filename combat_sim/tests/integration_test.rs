//! Full encounters played from the bundled definitions

use combat_core::config::{default_monsters, default_skill_book, parse_skill_book_json, MonsterDefinition};
use combat_core::pipeline::{process_incoming_damage, DamageRequest};
use combat_core::status::Buff;
use combat_core::{
    CombatConstants, CombatContext, CombatRules, Combatant, Element, EncounterOutcome, EntityHandle,
    Roster, Side, SkillBook, StatBlock, TargetingMode,
};
use combat_sim::{run_once, Scenario};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn rules() -> Arc<CombatRules> {
    Arc::new(CombatRules::with_defaults().unwrap())
}

fn fighter(hp: i64, attack: f64, defense: f64, speed: f64) -> StatBlock {
    StatBlock {
        hp,
        max_hp: hp,
        attack,
        defense,
        speed,
        crit_rate: 0.0,
        evasion: 0.0,
        accuracy: 100.0,
        ..StatBlock::default()
    }
}

fn dummy(id: &str, stats: StatBlock) -> MonsterDefinition {
    MonsterDefinition {
        id: id.to_string(),
        name: "Dummy".to_string(),
        attribute: Element::Neutral,
        stats,
        skills: Vec::new(),
    }
}

fn basic_duel(player: StatBlock, monster: StatBlock) -> CombatContext {
    let book = default_skill_book().unwrap();
    let hero = Combatant::player("Hero", player)
        .with_deck(book.deck(&["basic_attack".to_string()]).unwrap());
    let foe = Combatant::monster(&dummy("dummy", monster), &book).unwrap();
    CombatContext::new(hero, vec![foe], TargetingMode::First, Arc::new(CombatRules::default()))
        .unwrap()
}

#[test]
fn test_every_bundled_monster_fight_terminates() {
    let book = default_skill_book().unwrap();
    let bestiary = default_monsters().unwrap();
    let limit = CombatConstants::default().encounter.max_actions;

    for monster in &bestiary {
        let mut scenario = Scenario::demo().unwrap();
        scenario.monsters = vec![monster.id.clone()];
        for seed in 0..10 {
            let report = run_once(&scenario, &book, &bestiary, rules(), seed).unwrap();
            assert!(report.actions <= limit, "{} seed {}", monster.id, seed);
            assert!(!report.log.is_empty());
            for combatant in &report.combatants {
                assert!(combatant.hp >= 0, "negative HP for {}", combatant.name);
                assert!(combatant.hp <= combatant.max_hp);
            }
        }
    }
}

#[test]
fn test_three_monster_pack() {
    let book = default_skill_book().unwrap();
    let bestiary = default_monsters().unwrap();
    let mut scenario = Scenario::demo().unwrap();
    scenario.monsters = vec!["orc_brute".into(), "lich".into(), "frost_wolf".into()];
    scenario.targeting = TargetingMode::Random;

    for seed in 0..5 {
        let report = run_once(&scenario, &book, &bestiary, rules(), seed).unwrap();
        assert_eq!(report.combatants.len(), 4);
        let terminal = match report.outcome {
            EncounterOutcome::Victory => "Victory!",
            EncounterOutcome::Defeat => "You have been defeated...",
            EncounterOutcome::Stalled => "The battle",
            EncounterOutcome::Fled => "You fled",
        };
        assert!(report.log.iter().any(|l| l.contains(terminal)));
    }
}

#[test]
fn test_faster_combatant_acts_first() {
    let mut context = basic_duel(
        fighter(500, 10.0, 0.0, 20.0),
        fighter(500, 10.0, 0.0, 7.0),
    );
    let mut rng = StdRng::seed_from_u64(3);
    context.step(&mut rng).unwrap();

    let lines = context.log().lines();
    let hero = lines.iter().position(|l| l.contains("Hero uses"));
    let foe = lines.iter().position(|l| l.contains("Dummy uses"));
    assert!(hero.is_some());
    assert!(foe.is_none());
}

#[test]
fn test_physical_damage_band() {
    // 100 attack against 50 defense: 100 - 25 = 75, then +/-20% variance
    for seed in 0..40 {
        let mut context = basic_duel(
            fighter(500, 100.0, 0.0, 50.0),
            fighter(10_000, 1.0, 50.0, 1.0),
        );
        let mut rng = StdRng::seed_from_u64(seed);
        context.step(&mut rng).unwrap();
        let foe = context.roster().get(EntityHandle(1)).unwrap();
        let damage = 10_000 - foe.hp();
        assert!((60..=90).contains(&damage), "seed {} dealt {}", seed, damage);
    }
}

#[test]
fn test_resistance_then_shield() {
    let mut roster = Roster::new();
    let mut stats = fighter(200, 10.0, 0.0, 10.0);
    stats.resist.fire = 0.5;
    let target = roster.add(Combatant::new("Golem", Side::Monster, stats));
    roster
        .get_mut(target)
        .unwrap()
        .effects
        .apply_buff(Buff::shield(20.0, 2, "Barrier"));

    let request = DamageRequest::new(target, 100, Element::Fire);
    let result = process_incoming_damage(&mut roster, &request, &CombatConstants::default()).unwrap();
    assert_eq!(result.after_resistance, 50);
    assert_eq!(result.absorbed, 20);
    assert_eq!(result.actual, 30);
    assert_eq!(roster.get(target).unwrap().hp(), 170);
}

#[test]
fn test_reflect_happens_once() {
    let book: SkillBook = parse_skill_book_json(
        r#"{"skills": [
            {"id": "mirror", "components": [{"tag": "reflect", "percent": 0.5}]}
        ]}"#,
    )
    .unwrap();
    let mirror = book.require("mirror").unwrap();

    let mut roster = Roster::new();
    let a = roster.add(
        Combatant::player("Knight", fighter(500, 10.0, 0.0, 10.0))
            .with_equipment(vec![Arc::clone(&mirror)]),
    );
    let b = roster.add(
        Combatant::new("Mirror Golem", Side::Monster, fighter(500, 10.0, 0.0, 10.0))
            .with_equipment(vec![mirror]),
    );

    let request = DamageRequest::new(b, 100, Element::Neutral).from_attacker(a);
    let result = process_incoming_damage(&mut roster, &request, &CombatConstants::default()).unwrap();
    assert_eq!(result.actual, 100);
    assert_eq!(result.reflected, 50);
    let bounced = result.reflected_result.as_ref().unwrap();
    assert!(bounced.reflected_result.is_none());
    assert_eq!(result.logs.iter().filter(|l| l.contains("reflects")).count(), 1);
    assert_eq!(roster.get(a).unwrap().hp(), 450);
    assert_eq!(roster.get(b).unwrap().hp(), 400);
}

#[test]
fn test_flee_between_actions() {
    let mut context = basic_duel(
        fighter(500, 10.0, 0.0, 10.0),
        fighter(500, 10.0, 0.0, 10.0),
    );
    let mut rng = StdRng::seed_from_u64(9);
    context.step(&mut rng).unwrap();
    context.abort();
    assert_eq!(context.step(&mut rng).unwrap(), Some(EncounterOutcome::Fled));

    let report = context.finish(&mut rng);
    assert_eq!(report.outcome, EncounterOutcome::Fled);
    assert!(report.log.iter().any(|l| l == "You fled from battle."));
}

#[test]
fn test_report_tracks_hp_delta() {
    let mut context = basic_duel(
        fighter(300, 40.0, 0.0, 30.0),
        fighter(60, 5.0, 0.0, 5.0),
    );
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(context.run(&mut rng), EncounterOutcome::Victory);

    let report = context.finish(&mut rng);
    let foe = report.combatant(EntityHandle(1)).unwrap();
    assert_eq!(foe.hp, 0);
    assert_eq!(foe.hp_delta(), -60);
    assert!(report.summary().starts_with("Victory"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_any_seed_reaches_an_outcome(seed in any::<u64>()) {
        let book = default_skill_book().unwrap();
        let bestiary = default_monsters().unwrap();
        let mut scenario = Scenario::demo().unwrap();
        scenario.monsters = vec!["goblin".into(), "slime".into(), "fire_imp".into()];

        let report = run_once(&scenario, &book, &bestiary, rules(), seed).unwrap();
        prop_assert!(report.actions <= CombatConstants::default().encounter.max_actions);
        for combatant in &report.combatants {
            prop_assert!(combatant.hp >= 0 && combatant.hp <= combatant.max_hp);
        }
    }
}
