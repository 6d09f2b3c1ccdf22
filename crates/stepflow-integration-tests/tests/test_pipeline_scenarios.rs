//! # End-to-End Pipeline Scenarios
//!
//! Builds plans from the reference processors, connects them, and runs
//! them through the driver.
//!
//! ## What This Tests
//!
//! 1. A plain emit → transform → fold pipeline succeeds with the expected
//!    value and no overflow.
//! 2. A recoverable halt surfaces its issues to the caller before recovery,
//!    and recovery resumes to the correct final value, including when two
//!    stages halt on the same batch.
//! 3. Overflow from a bounded consumer comes back in order.
//! 4. Configuration loaded from JSON drives the run as documented.

use stepflow_compose::{connect, ConnectExt};
use stepflow_core::{
    feed, BoxMachine, Continuation, DoneTransition, EndOfInput, Halted, Issue, StateMachine,
    Transition,
};
use stepflow_driver::{
    run, AlwaysRecover, Decision, Driver, DriverConfig, Execution, NeverRecover, Step,
};
use stepflow_machines::{Collect, Emit, Filter, Map, Sum, Take, TryFold};

fn reject_zero(acc: &i64, x: &i64) -> Result<i64, Issue> {
    if *x == 0 {
        Err(Issue::new("BadZero"))
    } else {
        Ok(acc + x)
    }
}

fn reject_negative(acc: &i64, x: &i64) -> Result<i64, Issue> {
    if *x < 0 {
        Err(Issue::new("Negative"))
    } else {
        Ok(acc + x)
    }
}

/// Transformer that halts recoverably on `stop`; recovery drops that item.
#[derive(Clone, Copy)]
struct SkipAt(i64);

impl StateMachine<i64, i64, ()> for SkipAt {
    fn initial(&self) -> Box<dyn Continuation<i64, i64, ()>> {
        Box::new(*self)
    }
}

impl Continuation<i64, i64, ()> for SkipAt {
    fn apply(self: Box<Self>, items: Vec<i64>) -> Transition<i64, i64, ()> {
        match items.iter().position(|x| *x == self.0) {
            Some(at) => {
                let mut output = items;
                let overflow = output.split_off(at);
                let rest = overflow[1..].to_vec();
                let issues = vec![Issue::new(format!("skipping {}", self.0))];
                Transition::Halt {
                    halted: Halted::recoverable(issues, move || self.apply(rest)),
                    output,
                    overflow,
                }
            }
            None => Transition::Continue {
                state: self,
                output: items,
            },
        }
    }

    fn apply_eoi(self: Box<Self>, _eoi: EndOfInput) -> DoneTransition<i64, i64, ()> {
        DoneTransition::succeed((), Vec::new(), Vec::new())
    }
}

// ---------------------------------------------------------------------------
// 1. Simple pipeline
// ---------------------------------------------------------------------------

#[test]
fn emit_double_sum_is_twelve() {
    let plan = Emit::new(vec![1, 2, 3])
        .connect(Map::new(|x: i64| x * 2))
        .connect(Sum::<i64>::new());
    let done = run(&plan);
    assert!(done.is_success());
    assert_eq!(done.value(), Some(&12));
    assert!(done.overflow().is_empty());
}

#[test]
fn same_plan_runs_twice_with_same_result() {
    let plan = connect(
        Emit::new(vec![5, 6, 7]).chunk_size(2),
        connect(Filter::new(|x: &i64| *x != 6), Collect::new()),
    );
    let first = run(&plan);
    let second = run(&plan);
    assert_eq!(first.value(), Some(&vec![5, 7]));
    assert_eq!(first.value(), second.value());
}

#[test]
fn pumped_and_unpumped_runs_agree() {
    let plan = Emit::new((1..=20).collect::<Vec<i64>>())
        .chunk_size(3)
        .connect(Filter::new(|x: &i64| x % 3 == 0))
        .connect(Sum::<i64>::new());
    for pump_steps in [0, 1, 4, 7, 50] {
        let mut driver = Driver::new(DriverConfig::default().with_pump_steps(pump_steps));
        let done = driver.run(&plan, NeverRecover);
        assert_eq!(done.value(), Some(&63), "pump_steps = {pump_steps}");
    }
}

// ---------------------------------------------------------------------------
// 2. Recoverable halt
// ---------------------------------------------------------------------------

#[test]
fn recoverable_halt_is_observed_then_recovered() {
    let plan = Emit::new(vec![1, 0, 2]).connect(TryFold::new(0, reject_zero));

    let mut observed: Vec<Vec<Issue>> = Vec::new();
    let mut driver = Driver::new(DriverConfig::default());
    let done = driver.run(&plan, |issues: &[Issue]| {
        observed.push(issues.to_vec());
        Decision::Recover
    });

    assert_eq!(observed, vec![vec![Issue::new("BadZero")]]);
    assert_eq!(done.value(), Some(&3));
    assert_eq!(driver.last_stats().recoveries, 1);
}

#[test]
fn recoverable_halt_step_by_step() {
    let plan = Emit::new(vec![1, 0, 2]).connect(TryFold::new(0, reject_zero));
    let step = Execution::start(&plan, DriverConfig::default()).resume();
    let Step::HaltedRecoverable(halt) = step else {
        panic!("expected a recoverable halt");
    };
    assert_eq!(halt.issues()[0].message, "BadZero");

    let Step::Succeeded { done, stats } = halt.recover().resume() else {
        panic!("expected success after recovery");
    };
    assert_eq!(done.value(), Some(&3));
    assert_eq!(stats.recoveries, 1);
    assert_eq!(stats.eoi_applications, 1);
}

#[test]
fn declining_recovery_leaves_final_halt() {
    let plan = Emit::new(vec![1, 0, 2]).connect(TryFold::new(0, reject_zero));
    let done = run(&plan);
    let DoneTransition::Halt { halted, .. } = done else {
        panic!("expected halt");
    };
    assert_eq!(halted.issues(), &[Issue::new("BadZero")]);
    assert!(!halted.is_recoverable());
}

#[test]
fn repeated_recoveries_through_three_stages() {
    let stages = || {
        (
            Emit::new(vec![1, 0, 2, 0, 3]),
            Map::new(|x: i64| x),
            TryFold::new(0, reject_zero),
        )
    };

    let (a, b, c) = stages();
    let left = a.connect(b).connect(c);
    let (a, b, c) = stages();
    let right = a.connect(b.connect(c));

    for pump_steps in [0, 2] {
        let config = DriverConfig::default().with_pump_steps(pump_steps);
        let l = Driver::new(config.clone()).run(&left, AlwaysRecover);
        let r = Driver::new(config).run(&right, AlwaysRecover);
        assert_eq!(l.value(), Some(&6));
        assert_eq!(r.value(), Some(&6));
    }
}

#[test]
fn halts_in_two_stages_are_both_surfaced_and_recovered() {
    let plans = || -> [BoxMachine<(), (), i64>; 2] {
        let emit = || Emit::new(vec![-1, 7, 2]);
        let fold = || TryFold::new(0, reject_negative);
        [
            Box::new(emit().connect(SkipAt(7)).connect(fold())),
            Box::new(emit().connect(SkipAt(7).connect(fold()))),
        ]
    };

    for pump_steps in [0, 2] {
        let config = DriverConfig::default().with_pump_steps(pump_steps);
        for plan in plans() {
            let mut observed: Vec<String> = Vec::new();
            let mut driver = Driver::new(config.clone());
            let done = driver.run(&plan, |issues: &[Issue]| {
                observed.extend(issues.iter().map(|issue| issue.message.clone()));
                Decision::Recover
            });
            assert_eq!(observed, vec!["skipping 7", "Negative"]);
            assert_eq!(done.value(), Some(&2));
            assert_eq!(driver.last_stats().recoveries, 2);
        }
    }
}

#[test]
fn recovery_budget_from_json() {
    let plan = Emit::new(vec![0, 0, 0, 4]).connect(TryFold::new(0, reject_zero));
    let config = DriverConfig::from_json(r#"{ "max_recoveries": 2 }"#).unwrap();
    let mut driver = Driver::try_new(config).unwrap();
    let done = driver.run(&plan, AlwaysRecover);
    assert!(!done.is_success());
    assert_eq!(driver.last_stats().recoveries, 2);
}

// ---------------------------------------------------------------------------
// 3. Overflow propagation
// ---------------------------------------------------------------------------

#[test]
fn take_two_of_five_overflows_last_three() {
    let t = Take::<char>::new(2)
        .initial()
        .apply(vec!['a', 'b', 'c', 'd', 'e']);
    let done = t.into_done().ok().expect("take finishes on first batch");
    assert_eq!(done.value(), Some(&vec!['a', 'b']));
    assert_eq!(done.overflow(), &['c', 'd', 'e']);
}

#[test]
fn take_behind_transformer_returns_only_unfed_chunks() {
    // The transformer consumed the whole second batch, so the composite
    // reports no overflow of its own; only the chunk never fed comes back.
    let chain = Map::new(|c: char| c.to_ascii_uppercase()).connect(Take::new(2));
    let fed = feed(&chain, vec![vec!['a'], vec!['b', 'c'], vec!['d']]);
    assert_eq!(fed.done.value(), Some(&vec!['A', 'B']));
    assert_eq!(fed.done.overflow(), &['d']);
}

#[test]
fn eoi_cascade_finalizes_every_stage() {
    let chain = Map::new(|x: i64| x + 1)
        .connect(Filter::new(|x: &i64| *x > 1))
        .connect(Collect::new());
    let done = chain.initial().apply_eoi(EndOfInput);
    assert_eq!(done.value(), Some(&Vec::<i64>::new()));
}
