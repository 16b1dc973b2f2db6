use {
    hb_clock::HbClock,
    sequential_spec::Exception,
    std::fmt::{Debug, Display, Formatter},
};

/// The recorded outcome of one operation in a concurrent execution.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[non_exhaustive]
pub enum OpResult<Ret> {
    /// The operation completed with a value.
    Value(Ret),
    /// The operation raised an exception.
    Exception(Exception),
    /// The operation never completed: its thread blocked, hung, or was torn down.
    NoResult,
    /// The operation was interrupted by a crash. Only meaningful to durable verifiers.
    Crashed,
    /// The operation suspended and was never resumed.
    Suspended,
    /// The operation suspended and was then cancelled.
    Cancelled,
    /// The operation suspended at invocation and later resumed, completing with a value.
    Resumed(Ret),
}

/// A parallel-part outcome together with the happens-before clock recorded when the operation
/// started.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct TimedResult<Ret> {
    pub result: OpResult<Ret>,
    pub clock: HbClock,
}

impl<Ret> TimedResult<Ret> {
    pub fn new(result: OpResult<Ret>, clock: HbClock) -> Self {
        TimedResult { result, clock }
    }
}

impl<Ret> From<OpResult<Ret>> for TimedResult<Ret> {
    /// Wraps a result with an empty clock, i.e. no happens-before constraint.
    fn from(result: OpResult<Ret>) -> Self {
        TimedResult {
            result,
            clock: HbClock::new(),
        }
    }
}

/// Everything one concurrent run of a scenario produced, shaped exactly like the scenario it
/// belongs to.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ExecutionResult<Ret> {
    pub init: Vec<OpResult<Ret>>,
    pub parallel: Vec<Vec<TimedResult<Ret>>>,
    pub post: Vec<OpResult<Ret>>,
}

impl<Ret> ExecutionResult<Ret> {
    pub fn new(
        init: Vec<OpResult<Ret>>,
        parallel: Vec<Vec<TimedResult<Ret>>>,
        post: Vec<OpResult<Ret>>,
    ) -> Self {
        ExecutionResult {
            init,
            parallel,
            post,
        }
    }

    /// A result for a parallel-only scenario, with every clock empty.
    pub fn of_parallel(parallel: Vec<Vec<OpResult<Ret>>>) -> Self {
        ExecutionResult {
            init: Vec::new(),
            parallel: parallel
                .into_iter()
                .map(|thread| thread.into_iter().map(TimedResult::from).collect())
                .collect(),
            post: Vec::new(),
        }
    }
}

impl<Ret> Display for OpResult<Ret>
where
    Ret: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            OpResult::Value(value) => write!(f, "{value:?}"),
            OpResult::Exception(exception) => write!(f, "raised {exception}"),
            OpResult::NoResult => write!(f, "no result"),
            OpResult::Crashed => write!(f, "crashed"),
            OpResult::Suspended => write!(f, "suspended"),
            OpResult::Cancelled => write!(f, "cancelled"),
            OpResult::Resumed(value) => write!(f, "{value:?} after suspension"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn displays_outcomes() {
        assert_eq!(format!("{}", OpResult::Value(7)), "7");
        assert_eq!(
            format!("{}", OpResult::<u64>::Exception(Exception::new("Overflow"))),
            "raised Overflow",
        );
        assert_eq!(format!("{}", OpResult::<u64>::Crashed), "crashed");
        assert_eq!(format!("{}", OpResult::Resumed(3)), "3 after suspension");
    }

    #[test]
    fn of_parallel_leaves_clocks_unconstrained() {
        let result = ExecutionResult::of_parallel(vec![vec![OpResult::Value(1)]]);
        assert_eq!(result.parallel[0][0].clock, HbClock::new());
    }
}
