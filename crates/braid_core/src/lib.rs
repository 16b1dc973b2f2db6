//! This module specifies the execution data model for the
//! [Braid](https://docs.rs/braid_verifier/) concurrency-testing libraries: which operations a
//! test runs ([`ExecutionScenario`]) and what one concurrent run of those operations produced
//! ([`ExecutionResult`]).
//!
//! Both sides are immutable values: a scenario is only "mutated" by deriving a new scenario,
//! and a verifier only ever reads a result. The runner that schedules threads and records
//! outcomes lives elsewhere; this crate is the vocabulary shared between it and the verifier.
//!
//! # Features
//!
//! - `serde`: Implement `Serialize` and `Deserialize` where applicable.

#![deny(unused_must_use)]
#![warn(rust_2018_idioms, unreachable_pub)]

mod result;
mod scenario;

use sequential_spec::Exception;

pub use result::{ExecutionResult, OpResult, TimedResult};
pub use scenario::ExecutionScenario;

/// One operation instance within a scenario: the operation itself plus the flags the verifier
/// consults when matching recorded outcomes.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Actor<Op> {
    pub op: Op,
    /// Whether the operation may legally suspend instead of completing.
    pub can_suspend: bool,
    /// Whether a suspended invocation may be cancelled, in which case it takes no effect.
    pub cancel_on_suspension: bool,
    /// Exceptions the operation is allowed to raise; any other raised exception is a
    /// specification bug, not an incorrect result.
    pub allowed_exceptions: Vec<Exception>,
    /// Marks the operation as quiescently consistent; consumed by the quiescent verifier.
    pub quiescent_consistent: bool,
    /// Marks a persistence barrier; consumed by the buffered durable verifier.
    pub flushes: bool,
}

impl<Op> Actor<Op> {
    pub fn new(op: Op) -> Self {
        Actor {
            op,
            can_suspend: false,
            cancel_on_suspension: false,
            allowed_exceptions: Vec::new(),
            quiescent_consistent: false,
            flushes: false,
        }
    }

    pub fn suspendable(mut self) -> Self {
        self.can_suspend = true;
        self
    }

    pub fn cancellable(mut self) -> Self {
        self.can_suspend = true;
        self.cancel_on_suspension = true;
        self
    }

    pub fn allowing(mut self, exception: Exception) -> Self {
        self.allowed_exceptions.push(exception);
        self
    }

    pub fn quiescent(mut self) -> Self {
        self.quiescent_consistent = true;
        self
    }

    pub fn flushing(mut self) -> Self {
        self.flushes = true;
        self
    }
}

impl<Op> From<Op> for Actor<Op> {
    fn from(op: Op) -> Self {
        Actor::new(op)
    }
}
