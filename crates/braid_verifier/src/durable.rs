use {
    crate::{
        linearizability::sequential_step,
        search::{Engine, Mode},
        verifier::{SpecRet, Verdict, Verifier, VerifyError},
    },
    braid_core::{ExecutionResult, ExecutionScenario},
    sequential_spec::SequentialSpec,
    std::hash::Hash,
};

/// Durable linearizability: operations recorded as crashed are assumed to have taken no
/// effect. Such an operation is skipped (the thread moves past it while the reference state
/// stays put) and everything else follows the baseline rules.
pub struct DurableLinearizabilityVerifier<S: SequentialSpec> {
    engine: Engine<S>,
}

impl<S> DurableLinearizabilityVerifier<S>
where
    S: SequentialSpec + Clone + Eq + Hash + 'static,
{
    pub fn new(scenario: ExecutionScenario<S::Op>, fresh: impl FnOnce() -> S) -> Self {
        DurableLinearizabilityVerifier {
            engine: Engine::new(scenario, fresh(), Mode::Durable, Box::new(sequential_step)),
        }
    }
}

impl<S> Verifier for DurableLinearizabilityVerifier<S>
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

/// Durable linearizability over write-back persistence: completed operations may still be
/// lost on a crash unless a barrier forced them out.
///
/// Every state the volatile run reaches is a *persistence candidate*. An actor constructed
/// with [`flushing`](braid_core::Actor::flushing) pins the candidates to the state it
/// produced. When a crash group completes (every thread whose next recorded result is a crash
/// has processed it), the search forks once per candidate, modeling the nondeterministic
/// write-back buffer.
pub struct BufferedDurableLinearizabilityVerifier<S: SequentialSpec> {
    engine: Engine<S>,
}

impl<S> BufferedDurableLinearizabilityVerifier<S>
where
    S: SequentialSpec + Clone + Eq + Hash + 'static,
{
    pub fn new(scenario: ExecutionScenario<S::Op>, fresh: impl FnOnce() -> S) -> Self {
        BufferedDurableLinearizabilityVerifier {
            engine: Engine::new(
                scenario,
                fresh(),
                Mode::BufferedDurable,
                Box::new(sequential_step),
            ),
        }
    }
}

impl<S> Verifier for BufferedDurableLinearizabilityVerifier<S>
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
