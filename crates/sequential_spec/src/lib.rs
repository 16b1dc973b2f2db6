//! This library provides the vocabulary for defining the correctness of a concurrent data
//! structure via a sequential "reference implementation".
//!
//! # Defining Correctness Via A Reference Implementation
//!
//! [`SequentialSpec`] is a trait for defining correctness operationally (e.g. "*this structure
//! should behave like a FIFO queue*"). Implementing it is straightforward: define two `enum`s
//! for invocations and returns, associate them as [`SequentialSpec::Op`] and
//! [`SequentialSpec::Ret`], and implement [`SequentialSpec::invoke`]. This library ships
//! reusable implementations such as [`Register`], [`Counter`], and [`FifoQueue`], plus
//! [`BoundedChannel`] for specifications whose operations can suspend, and [`KRelaxedQueue`]
//! as an example of a [quantitatively relaxed][`RelaxedSpec`] structure.
//!
//! # Outcomes Instead Of Panics
//!
//! [`SequentialSpec::invoke`] returns an [`Invoked`] value rather than panicking or returning a
//! bare `Ret`: a reference operation may complete with a return value, raise a named
//! [`Exception`], or [suspend][`Invoked::Suspended`] (think "receive on an empty channel").
//! A verifier replaying operations against the specification matches these outcomes against
//! the results recorded from a real concurrent run.
//!
//! # Additional Reading
//!
//! - ["Linearizability: A Correctness Condition for Concurrent
//!   Objects"](https://doi.org/10.1145/78969.78972) by Herlihy and Wing
//! - ["Quantitative Relaxation of Concurrent Data
//!   Structures"](https://doi.org/10.1145/2429069.2429109) by Henzinger et al.

#![deny(unused_must_use)]
#![warn(rust_2018_idioms, unreachable_pub)]

mod channel;
mod counter;
mod queue;
mod register;
mod relaxed;

pub use channel::{BoundedChannel, ChannelOp, ChannelRet};
pub use counter::{Counter, CounterOp, CounterRet};
pub use queue::{no_such_element, FifoQueue, QueueOp, QueueRet};
pub use register::{Register, RegisterOp, RegisterRet};
pub use relaxed::{CostTransition, KRelaxedQueue, RelaxedQueueOp, RelaxedQueueRet, RelaxedSpec};

/// A named exception raised by a reference operation, standing in for the exception types a
/// reference implementation in a managed language would throw. Two exceptions are equal iff
/// their names are equal.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Exception(String);

impl Exception {
    pub fn new(name: impl Into<String>) -> Self {
        Exception(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Exception {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The outcome of applying one operation to a reference implementation.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Invoked<Ret> {
    /// The operation completed and returned a value.
    Completed(Ret),
    /// The operation raised an exception.
    Raised(Exception),
    /// The operation cannot make progress in the current state. The implementation must leave
    /// itself unchanged when reporting this.
    Suspended,
}

/// An implementation of this trait serves as a sequential "reference object" (in the sense of
/// an operational specification, not a Rust reference) against which a verifier validates the
/// results observed from a concurrent execution.
///
/// Verifiers additionally require `Clone + Eq + Hash` on the implementing type: cloning yields
/// the fresh instances that transitions are applied to, and `Eq`/`Hash` define the
/// *observable-state equivalence* used to deduplicate states reached by different operation
/// orders. Derived implementations over the structure's logical content are almost always the
/// right choice.
pub trait SequentialSpec {
    /// The type of operations. Often an enum.
    type Op: Clone;

    /// The type of values returned by operations. Often an enum or [`Option`].
    type Ret: Clone + PartialEq;

    /// Applies an operation to this reference object, reporting how it concluded.
    fn invoke(&mut self, op: &Self::Op) -> Invoked<Self::Ret>;
}
