use {
    crate::{
        lts::Candidate,
        search::{Engine, Mode},
        verifier::{SpecRet, Verdict, Verifier, VerifyError},
    },
    braid_core::{ExecutionResult, ExecutionScenario},
    sequential_spec::{RelaxedSpec, SequentialSpec},
    std::hash::Hash,
};

/// How the penalties along one candidate linearization combine into a path cost, following
/// paragraph 4.3 of "Quantitative Relaxation of Concurrent Data Structures" by Henzinger,
/// Kirsch, Payer, Sezgin, and Sokolova.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum PathCostFunction {
    /// Requires every transition cost to be zero. A nonzero cost indicates a broken relaxed
    /// specification and aborts verification.
    NonRelaxed,
    /// Bounds the maximal transition cost: `pcost = max{cost_i | 1 <= i <= n}`. Ignores
    /// predicates.
    Max,
    /// Bounds the longest run of predicate-satisfying transitions:
    /// `pcost = max{j - i + 1 | phi(i, j)}`. Ignores costs.
    PhiInterval,
    /// Combines the two: `pcost = max{l(i, j) | phi(i, j)}` where
    /// `l(i, j) = max{cost_r + (r - i + 1) | i <= r <= j}`.
    PhiIntervalRestrictedMax,
}

/// The per-context accumulator for a [`PathCostFunction`]. Stepping it with a transition's
/// cost and predicate either yields the successor accumulator or rejects the transition.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct CostCounter {
    function: PathCostFunction,
    relaxation_factor: u32,
    predicate_run: u32,
}

impl CostCounter {
    pub(crate) fn new(function: PathCostFunction, relaxation_factor: u32) -> Self {
        CostCounter {
            function,
            relaxation_factor,
            predicate_run: 0,
        }
    }

    pub(crate) fn next(self, cost: u32, predicate: bool) -> Option<CostCounter> {
        match self.function {
            PathCostFunction::NonRelaxed => {
                assert!(
                    cost == 0,
                    "a non-relaxed path cost saw a transition of cost {cost}. \
                     This indicates a bug in the relaxed specification.",
                );
                Some(self)
            }
            PathCostFunction::Max => (cost < self.relaxation_factor).then_some(self),
            PathCostFunction::PhiInterval => {
                let run = if predicate { self.predicate_run + 1 } else { 0 };
                (run < self.relaxation_factor).then_some(CostCounter {
                    predicate_run: run,
                    ..self
                })
            }
            PathCostFunction::PhiIntervalRestrictedMax => {
                if self.predicate_run + cost >= self.relaxation_factor {
                    return None;
                }
                let run = if predicate { self.predicate_run + 1 } else { 0 };
                Some(CostCounter {
                    predicate_run: run,
                    ..self
                })
            }
        }
    }
}

/// Checks recorded results against a [`RelaxedSpec`]: every candidate transition the relaxed
/// specification offers is explored, and a candidate linearization survives only while its
/// accumulated path cost stays below the relaxation factor.
pub struct QuantitativeRelaxationVerifier<S: SequentialSpec> {
    engine: Engine<S>,
}

impl<S> QuantitativeRelaxationVerifier<S>
where
    S: RelaxedSpec + Clone + Eq + Hash + 'static,
{
    pub fn new(
        scenario: ExecutionScenario<S::Op>,
        fresh: impl FnOnce() -> S,
        relaxation_factor: u32,
        path_cost: PathCostFunction,
    ) -> Self {
        assert!(relaxation_factor > 0, "relaxation factor must be positive");
        QuantitativeRelaxationVerifier {
            engine: Engine::new(
                scenario,
                fresh(),
                Mode::Quantitative {
                    relaxation_factor,
                    path_cost,
                },
                Box::new(relaxed_step),
            ),
        }
    }
}

fn relaxed_step<S>(state: &S, op: &S::Op) -> Vec<Candidate<S>>
where
    S: RelaxedSpec,
{
    state
        .relaxed_invoke(op)
        .into_iter()
        .map(|transition| Candidate {
            outcome: transition.result,
            next: transition.next,
            cost: transition.cost,
            predicate: transition.predicate,
        })
        .collect()
}

impl<S> Verifier for QuantitativeRelaxationVerifier<S>
where
    S: RelaxedSpec + Clone + Eq + Hash + 'static,
{
    type Spec = S;

    fn verify(
        &mut self,
        results: &ExecutionResult<SpecRet<S>>,
    ) -> Result<Verdict<S::Op, S::Ret>, VerifyError> {
        self.engine.verify(results)
    }
}
