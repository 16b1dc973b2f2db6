//! Suspension semantics: an operation recorded as resumed must suspend somewhere legal and
//! complete with the recorded value; never-resumed and cancelled operations take no effect.

use {
    braid_core::{scenario, Actor, ExecutionResult, OpResult},
    braid_verifier::{assert_consistent, assert_inconsistent, LinearizabilityVerifier},
    sequential_spec::{BoundedChannel, ChannelOp, ChannelRet},
};

fn receive_and_send(receiver: Actor<ChannelOp<char>>) -> braid_core::ExecutionScenario<ChannelOp<char>> {
    scenario! {
        init: [],
        parallel: [[receiver], [ChannelOp::Send('a')]],
        post: [],
    }
}

fn recorded(receive: OpResult<ChannelRet<char>>) -> ExecutionResult<ChannelRet<char>> {
    ExecutionResult::of_parallel(vec![vec![receive], vec![OpResult::Value(ChannelRet::SendOk)]])
}

#[test]
fn receive_may_suspend_and_resume_with_the_sent_item() {
    let mut verifier = LinearizabilityVerifier::new(
        receive_and_send(Actor::new(ChannelOp::Receive).suspendable()),
        || BoundedChannel::new(1),
    );
    assert_consistent!(
        verifier,
        recorded(OpResult::Resumed(ChannelRet::ReceiveOk('a'))),
    );
}

#[test]
fn resumption_value_must_match_the_reference() {
    let mut verifier = LinearizabilityVerifier::new(
        receive_and_send(Actor::new(ChannelOp::Receive).suspendable()),
        || BoundedChannel::new(1),
    );
    assert_inconsistent!(
        verifier,
        recorded(OpResult::Resumed(ChannelRet::ReceiveOk('b'))),
    );
}

#[test]
fn forever_suspended_receive_takes_no_effect() {
    let mut verifier = LinearizabilityVerifier::new(
        receive_and_send(Actor::new(ChannelOp::Receive).suspendable()),
        || BoundedChannel::new(1),
    );
    assert_consistent!(verifier, recorded(OpResult::Suspended));
}

#[test]
fn suspension_requires_the_actor_flag() {
    let mut verifier =
        LinearizabilityVerifier::new(receive_and_send(Actor::new(ChannelOp::Receive)), || {
            BoundedChannel::new(1)
        });
    assert_inconsistent!(verifier, recorded(OpResult::Suspended));
}

#[test]
fn cancellation_requires_the_actor_flag() {
    let mut cancellable = LinearizabilityVerifier::new(
        receive_and_send(Actor::new(ChannelOp::Receive).cancellable()),
        || BoundedChannel::new(1),
    );
    assert_consistent!(cancellable, recorded(OpResult::Cancelled));

    let mut plain = LinearizabilityVerifier::new(
        receive_and_send(Actor::new(ChannelOp::Receive).suspendable()),
        || BoundedChannel::new(1),
    );
    assert_inconsistent!(plain, recorded(OpResult::Cancelled));
}

#[test]
fn resumed_receive_still_respects_channel_state() {
    // Two sends fill the two-slot channel before the receive can possibly run; the receive
    // must then observe the oldest item, not the newest.
    let scenario = scenario! {
        init: [ChannelOp::Send('x'), ChannelOp::Send('y')],
        parallel: [[Actor::new(ChannelOp::Receive).suspendable()]],
        post: [],
    };
    let mut verifier = LinearizabilityVerifier::new(scenario, || BoundedChannel::new(2));
    let with_receive = |item: char| {
        ExecutionResult::new(
            vec![
                OpResult::Value(ChannelRet::SendOk),
                OpResult::Value(ChannelRet::SendOk),
            ],
            vec![vec![OpResult::Value(ChannelRet::ReceiveOk(item)).into()]],
            Vec::new(),
        )
    };
    assert_consistent!(verifier, with_receive('x'));
    assert_inconsistent!(verifier, with_receive('y'));
}
