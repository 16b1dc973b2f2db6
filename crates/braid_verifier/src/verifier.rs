use {
    crate::report::Counterexample,
    braid_core::ExecutionResult,
    sequential_spec::{Exception, SequentialSpec},
    std::{
        collections::{HashSet, VecDeque},
        fmt::{Display, Formatter},
        hash::Hash,
    },
};

/// Shorthand for a specification's operation type.
pub type SpecOp<S> = <S as SequentialSpec>::Op;

/// Shorthand for a specification's return type.
pub type SpecRet<S> = <S as SequentialSpec>::Ret;

/// The verdict for one recorded execution.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum Verdict<Op, Ret> {
    /// Some legal sequential execution explains the recorded results.
    Consistent,
    /// No legal sequential execution explains the recorded results.
    Inconsistent(Box<Counterexample<Op, Ret>>),
}

impl<Op, Ret> Verdict<Op, Ret> {
    pub fn is_consistent(&self) -> bool {
        matches!(self, Verdict::Consistent)
    }
}

/// Pinpoints one operation within a scenario.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum OpLocation {
    Init { index: usize },
    Parallel { thread: usize, index: usize },
    Post { index: usize },
}

impl Display for OpLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            OpLocation::Init { index } => write!(f, "init operation {index}"),
            OpLocation::Parallel { thread, index } => {
                write!(f, "operation {index} of thread {thread}")
            }
            OpLocation::Post { index } => write!(f, "post operation {index}"),
        }
    }
}

/// A verification failure that is *not* an inconsistency verdict. Distinguishing the two
/// matters: an inconsistency incriminates the structure under test, while these errors
/// incriminate the test or the reference specification.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum VerifyError {
    /// The reference implementation raised an exception outside the actor's allowed set while
    /// an operation was replayed against it.
    UnexpectedException {
        location: OpLocation,
        raised: Exception,
    },
}

impl Display for VerifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            VerifyError::UnexpectedException { location, raised } => write!(
                f,
                "the sequential specification raised {raised} at {location}, \
                 which the actor does not allow",
            ),
        }
    }
}

impl std::error::Error for VerifyError {}

/// Decides whether recorded results are explainable under some consistency model. A verifier
/// is bound to one scenario at construction and may be invoked once per recorded run of that
/// scenario.
pub trait Verifier {
    type Spec: SequentialSpec;

    fn verify(
        &mut self,
        results: &ExecutionResult<SpecRet<Self::Spec>>,
    ) -> Result<Verdict<SpecOp<Self::Spec>, SpecRet<Self::Spec>>, VerifyError>;
}

/// Skips re-verification of result sets already accepted for the bound scenario. An outer
/// runner typically executes the same scenario under many schedules, most of which record the
/// handful of results seen before, so this shortcut pays for itself quickly.
///
/// The cache holds accepted results only (a rejection carries a counterexample the caller
/// wants) and evicts first-in-first-out once `capacity` entries accumulate.
pub struct CachedVerifier<V: Verifier> {
    inner: V,
    capacity: usize,
    accepted: HashSet<ExecutionResult<SpecRet<V::Spec>>>,
    order: VecDeque<ExecutionResult<SpecRet<V::Spec>>>,
}

impl<V> CachedVerifier<V>
where
    V: Verifier,
    SpecRet<V::Spec>: Eq + Hash,
{
    pub fn new(inner: V) -> Self {
        Self::with_capacity(inner, 1024)
    }

    pub fn with_capacity(inner: V, capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be positive");
        CachedVerifier {
            inner,
            capacity,
            accepted: HashSet::new(),
            order: VecDeque::new(),
        }
    }

    pub fn into_inner(self) -> V {
        self.inner
    }
}

impl<V> Verifier for CachedVerifier<V>
where
    V: Verifier,
    SpecRet<V::Spec>: Eq + Hash,
{
    type Spec = V::Spec;

    fn verify(
        &mut self,
        results: &ExecutionResult<SpecRet<V::Spec>>,
    ) -> Result<Verdict<SpecOp<V::Spec>, SpecRet<V::Spec>>, VerifyError> {
        if self.accepted.contains(results) {
            return Ok(Verdict::Consistent);
        }
        let verdict = self.inner.verify(results)?;
        if verdict.is_consistent() {
            if self.order.len() == self.capacity {
                if let Some(evicted) = self.order.pop_front() {
                    self.accepted.remove(&evicted);
                }
            }
            self.accepted.insert(results.clone());
            self.order.push_back(results.clone());
        }
        Ok(verdict)
    }
}

#[cfg(test)]
mod test {
    use {super::*, braid_core::OpResult, sequential_spec::Counter};

    /// Accepts everything and counts how often it is actually consulted.
    struct CountingVerifier {
        calls: usize,
    }

    impl Verifier for CountingVerifier {
        type Spec = Counter;

        fn verify(
            &mut self,
            _results: &ExecutionResult<SpecRet<Counter>>,
        ) -> Result<Verdict<SpecOp<Counter>, SpecRet<Counter>>, VerifyError> {
            self.calls += 1;
            Ok(Verdict::Consistent)
        }
    }

    fn results(value: u64) -> ExecutionResult<SpecRet<Counter>> {
        ExecutionResult::of_parallel(vec![vec![OpResult::Value(
            sequential_spec::CounterRet(value),
        )]])
    }

    #[test]
    fn repeat_results_hit_the_cache() {
        let mut cached = CachedVerifier::new(CountingVerifier { calls: 0 });
        assert!(cached.verify(&results(1)).unwrap().is_consistent());
        assert!(cached.verify(&results(1)).unwrap().is_consistent());
        assert!(cached.verify(&results(2)).unwrap().is_consistent());
        assert_eq!(cached.into_inner().calls, 2);
    }

    #[test]
    fn eviction_is_first_in_first_out() {
        let mut cached = CachedVerifier::with_capacity(CountingVerifier { calls: 0 }, 1);
        assert!(cached.verify(&results(1)).unwrap().is_consistent());
        assert!(cached.verify(&results(2)).unwrap().is_consistent()); // evicts 1
        assert!(cached.verify(&results(1)).unwrap().is_consistent()); // misses again
        assert_eq!(cached.into_inner().calls, 3);
    }
}
