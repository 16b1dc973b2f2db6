use {
    crate::{
        lts::Candidate,
        search::{Engine, Mode},
        verifier::{SpecRet, Verdict, Verifier, VerifyError},
    },
    braid_core::{ExecutionResult, ExecutionScenario},
    sequential_spec::SequentialSpec,
    std::hash::Hash,
};

/// Checks whether recorded results are explainable by some sequential execution of the
/// reference implementation that respects both per-thread program order and the recorded
/// happens-before clocks. This is the strictest model offered and the skeleton every other
/// verifier builds on.
pub struct LinearizabilityVerifier<S: SequentialSpec> {
    engine: Engine<S>,
}

impl<S> LinearizabilityVerifier<S>
where
    S: SequentialSpec + Clone + Eq + Hash + 'static,
{
    /// Binds a verifier to `scenario`. `fresh` produces the reference instance the init part
    /// starts from; transitions beyond it are derived by cloning.
    pub fn new(scenario: ExecutionScenario<S::Op>, fresh: impl FnOnce() -> S) -> Self {
        LinearizabilityVerifier {
            engine: Engine::new(
                scenario,
                fresh(),
                Mode::Linearizability,
                Box::new(sequential_step),
            ),
        }
    }

    /// Number of distinct reference states materialized so far. Structurally equal snapshots
    /// are interned, so commuting operations keep this far below the interleaving count.
    pub fn explored_states(&self) -> usize {
        self.engine.state_count()
    }
}

/// The deterministic generator: clone the state, apply the operation, offer the single
/// resulting transition.
pub(crate) fn sequential_step<S>(state: &S, op: &S::Op) -> Vec<Candidate<S>>
where
    S: SequentialSpec + Clone,
{
    let mut next = state.clone();
    let outcome = next.invoke(op);
    vec![Candidate {
        outcome,
        next,
        cost: 0,
        predicate: false,
    }]
}

impl<S> Verifier for LinearizabilityVerifier<S>
where
    S: SequentialSpec + Clone + Eq + Hash + 'static,
{
    type Spec = S;

    fn verify(
        &mut self,
        results: &ExecutionResult<SpecRet<S>>,
    ) -> Result<Verdict<S::Op, S::Ret>, VerifyError> {
        self.engine.verify(results)
    }
}
