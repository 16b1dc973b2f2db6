use crate::{Invoked, SequentialSpec};

/// A monotone counter with atomic-style operations.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Counter(pub u64);

/// An operation on a [`Counter`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum CounterOp {
    /// Increments and returns the incremented value.
    IncrementAndGet,
    /// Returns the current value.
    Get,
}

/// A return value from a [`Counter`] operation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CounterRet(pub u64);

impl SequentialSpec for Counter {
    type Op = CounterOp;
    type Ret = CounterRet;

    fn invoke(&mut self, op: &Self::Op) -> Invoked<Self::Ret> {
        match op {
            CounterOp::IncrementAndGet => {
                self.0 += 1;
                Invoked::Completed(CounterRet(self.0))
            }
            CounterOp::Get => Invoked::Completed(CounterRet(self.0)),
        }
    }
}
