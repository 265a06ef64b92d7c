use std::sync::atomic::{AtomicUsize, Ordering};

use crafting_core::{
    CraftEnv, CraftError, CraftingConfig, Draw, ErrorSeverity, ExecutablePlan, Formula,
    FormulaSequence, OutcomeTier, Plan, Proficiency, RngOracle, SlotState, StateViolation,
};

/// Replays a fixed list of draws, cycling when exhausted.
struct ScriptedRng {
    draws: Vec<u8>,
    cursor: AtomicUsize,
}

impl ScriptedRng {
    fn new(draws: &[u8]) -> Self {
        Self {
            draws: draws.to_vec(),
            cursor: AtomicUsize::new(0),
        }
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        0
    }

    fn roll_draw(&self, _seed: u64) -> Draw {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        Draw::from_hundredths(self.draws[index % self.draws.len()])
    }
}

fn iron(quantity: u32) -> Formula {
    Formula::from_parallel(&["Ore"], &[2], &["Iron"], &[quantity], 0).unwrap()
}

#[test]
fn scripted_draws_drive_each_step() {
    let rng = ScriptedRng::new(&[95, 10, 30]);
    let config = CraftingConfig::default();
    let env = CraftEnv::new(&rng, &config, 0);

    let mut plan = ExecutablePlan::new(vec![iron(10), iron(10), iron(10)], 0).unwrap();
    let tiers: Vec<_> = (0..3)
        .map(|_| plan.apply_next(&env).unwrap().tier)
        .collect();

    assert_eq!(
        tiers,
        vec![
            Some(OutcomeTier::Normal),
            Some(OutcomeTier::Failure),
            Some(OutcomeTier::Partial)
        ]
    );
    let results: Vec<_> = plan.plan().iter().map(|f| f.result().to_vec()).collect();
    assert_eq!(results, vec![vec![10], vec![0], vec![7]]);

    let err = plan.apply_next(&env).unwrap_err();
    assert_eq!(err, StateViolation::PastEnd { step: 3, len: 3 });
    assert_eq!(err.error_code(), "STATE_PAST_END");
    assert_eq!(err.severity(), ErrorSeverity::Validation);
}

#[test]
fn replace_is_rejected_behind_cursor_at_every_step() {
    let rng = ScriptedRng::new(&[95]);
    let config = CraftingConfig::default();
    let env = CraftEnv::new(&rng, &config, 0);
    let mut plan = ExecutablePlan::new(vec![iron(1), iron(2), iron(3), iron(4)], 0).unwrap();

    for step in 0..4 {
        for index in 0..step {
            assert!(matches!(
                plan.replace(index, iron(9)),
                Err(StateViolation::ReplaceBeforeStep { .. })
            ));
        }
        plan.apply_next(&env).unwrap();
    }

    assert!(plan.slot_states().iter().all(|s| *s == SlotState::Completed));
    assert_eq!(plan.remaining(), 0);
}

#[test]
fn pushed_slot_reopens_a_finished_sequencer() {
    let rng = ScriptedRng::new(&[47]);
    let config = CraftingConfig::default();
    let env = CraftEnv::new(&rng, &config, 0);
    let mut plan = ExecutablePlan::new(vec![iron(10)], 0).unwrap();

    plan.apply_next(&env).unwrap();
    assert!(plan.is_finished());

    plan.push(iron(20));
    let outcome = plan.apply_next(&env).unwrap();
    assert_eq!(outcome.tier, Some(OutcomeTier::Bonus));
    assert_eq!(plan.get(1).unwrap().result(), &[22]);
    assert!(plan.is_finished());
}

#[test]
fn repeated_plan_application_grows_proficiency() {
    let rng = ScriptedRng::new(&[95]);
    let config = CraftingConfig::default();
    let env = CraftEnv::new(&rng, &config, 0);
    let mut plan = Plan::new(vec![iron(10)]).unwrap();

    for _ in 0..CraftingConfig::DEFAULT_GROWTH_INTERVAL {
        plan.apply(&env).unwrap();
    }
    assert_eq!(plan.get(0).unwrap().proficiency().level(), 1);

    for _ in 0..100 {
        plan.apply(&env).unwrap();
    }
    assert_eq!(plan.get(0).unwrap().proficiency(), Proficiency::MAX);
}

#[test]
fn moved_out_sequencer_is_empty_and_reusable() {
    let rng = ScriptedRng::new(&[95]);
    let config = CraftingConfig::default();
    let env = CraftEnv::new(&rng, &config, 0);
    let mut plan = ExecutablePlan::new(vec![iron(10)], 0).unwrap();

    let mut moved = plan.take();
    assert!(plan.is_empty());
    assert_eq!(
        plan.apply_next(&env),
        Err(StateViolation::PastEnd { step: 0, len: 0 })
    );
    assert!(moved.apply_next(&env).is_ok());
}
