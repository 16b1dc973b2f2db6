use {
    crate::{
        linearizability::LinearizabilityVerifier,
        verifier::{SpecRet, Verdict, Verifier, VerifyError},
    },
    braid_core::{ExecutionResult, ExecutionScenario, OpResult},
    sequential_spec::SequentialSpec,
    std::hash::Hash,
};

/// Serializability: the recorded results need only be explainable by *some* total order of all
/// operations, with no obligation to respect real-time order or even per-thread program order
/// across segments.
///
/// Implemented by conversion: every operation of init ∥ parallel ∥ post becomes its own
/// single-operation parallel thread with an unconstrained clock, and the flattened scenario is
/// checked for linearizability.
pub struct SerializabilityVerifier<S: SequentialSpec> {
    inner: LinearizabilityVerifier<S>,
}

impl<S> SerializabilityVerifier<S>
where
    S: SequentialSpec + Clone + Eq + Hash + 'static,
{
    pub fn new(scenario: ExecutionScenario<S::Op>, fresh: impl FnOnce() -> S) -> Self {
        let singletons = scenario
            .init()
            .iter()
            .chain(scenario.parallel().iter().flatten())
            .chain(scenario.post().iter())
            .map(|actor| vec![actor.clone()])
            .collect();
        let converted = ExecutionScenario::new(Vec::new(), singletons, Vec::new());
        SerializabilityVerifier {
            inner: LinearizabilityVerifier::new(converted, fresh),
        }
    }
}

impl<S> Verifier for SerializabilityVerifier<S>
where
    S: SequentialSpec + Clone + Eq + Hash + 'static,
{
    type Spec = S;

    fn verify(
        &mut self,
        results: &ExecutionResult<SpecRet<S>>,
    ) -> Result<Verdict<S::Op, S::Ret>, VerifyError> {
        let singletons = results
            .init
            .iter()
            .cloned()
            .chain(
                results
                    .parallel
                    .iter()
                    .flatten()
                    .map(|timed| timed.result.clone()),
            )
            .chain(results.post.iter().cloned())
            .map(|result: OpResult<SpecRet<S>>| vec![result])
            .collect();
        self.inner.verify(&ExecutionResult::of_parallel(singletons))
    }
}
