//! Crash semantics: plain durable linearizability skips crashed operations, and the buffered
//! variant additionally rolls volatile state back to a nondeterministically persisted
//! snapshot.

use {
    braid_core::{scenario, Actor, ExecutionResult, OpResult},
    braid_verifier::{
        assert_consistent, assert_inconsistent, BufferedDurableLinearizabilityVerifier,
        DurableLinearizabilityVerifier, LinearizabilityVerifier,
    },
    sequential_spec::{Counter, CounterOp, CounterRet},
};

fn crashed_increment_then_get() -> braid_core::ExecutionScenario<CounterOp> {
    scenario! {
        init: [],
        parallel: [[CounterOp::IncrementAndGet, CounterOp::Get]],
        post: [],
    }
}

fn recorded(read: u64) -> ExecutionResult<CounterRet> {
    ExecutionResult::of_parallel(vec![vec![
        OpResult::Crashed,
        OpResult::Value(CounterRet(read)),
    ]])
}

#[test]
fn crashed_operation_is_skipped_without_effect() {
    let mut verifier =
        DurableLinearizabilityVerifier::new(crashed_increment_then_get(), Counter::default);
    assert_consistent!(verifier, recorded(0));
    // The skipped increment must not have bumped the counter.
    assert_inconsistent!(verifier, recorded(1));
}

#[test]
fn baseline_has_no_crash_vocabulary() {
    let mut verifier = LinearizabilityVerifier::new(crashed_increment_then_get(), Counter::default);
    assert_inconsistent!(verifier, recorded(0));
}

#[test]
fn buffered_crash_may_lose_completed_operations() {
    // The first increment completed, but nothing forced it out of the write-back buffer
    // before the crash, so recovery may observe 0 or 1 and nothing else.
    let scenario = scenario! {
        init: [],
        parallel: [[CounterOp::IncrementAndGet, CounterOp::IncrementAndGet, CounterOp::Get]],
        post: [],
    };
    let with_read = |read: u64| {
        ExecutionResult::of_parallel(vec![vec![
            OpResult::Value(CounterRet(1)),
            OpResult::Crashed,
            OpResult::Value(CounterRet(read)),
        ]])
    };
    let mut verifier = BufferedDurableLinearizabilityVerifier::new(scenario, Counter::default);
    assert_consistent!(verifier, with_read(0));
    assert_consistent!(verifier, with_read(1));
    assert_inconsistent!(verifier, with_read(2));
}

#[test]
fn barrier_pins_the_persisted_snapshot() {
    let scenario = scenario! {
        init: [],
        parallel: [[
            CounterOp::IncrementAndGet,
            Actor::new(CounterOp::Get).flushing(),
            CounterOp::IncrementAndGet,
            CounterOp::Get,
        ]],
        post: [],
    };
    let with_read = |read: u64| {
        ExecutionResult::of_parallel(vec![vec![
            OpResult::Value(CounterRet(1)),
            OpResult::Value(CounterRet(1)),
            OpResult::Crashed,
            OpResult::Value(CounterRet(read)),
        ]])
    };
    let mut verifier = BufferedDurableLinearizabilityVerifier::new(scenario, Counter::default);
    // The barrier forced the first increment out, so recovery cannot lose it.
    assert_consistent!(verifier, with_read(1));
    assert_inconsistent!(verifier, with_read(0));
    // The crashed increment was skipped, so recovery cannot observe it either.
    assert_inconsistent!(verifier, with_read(2));
}

#[test]
fn crash_group_completes_before_state_rolls_back() {
    // Both threads crash together. The group resolves once, to a single persisted snapshot,
    // so the post read observes the initial state: neither increment was flushed.
    let scenario = scenario! {
        init: [],
        parallel: [[CounterOp::IncrementAndGet], [CounterOp::IncrementAndGet]],
        post: [CounterOp::Get],
    };
    let with_read = |read: u64| {
        ExecutionResult::new(
            Vec::new(),
            vec![
                vec![OpResult::Crashed.into()],
                vec![OpResult::Crashed.into()],
            ],
            vec![OpResult::Value(CounterRet(read))],
        )
    };
    let mut verifier = BufferedDurableLinearizabilityVerifier::new(scenario, Counter::default);
    assert_consistent!(verifier, with_read(0));
    assert_inconsistent!(verifier, with_read(1));
}
