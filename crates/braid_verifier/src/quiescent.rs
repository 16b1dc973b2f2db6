use {
    crate::{
        linearizability::LinearizabilityVerifier,
        verifier::{SpecRet, Verdict, Verifier, VerifyError},
    },
    braid_core::{Actor, ExecutionResult, ExecutionScenario, TimedResult},
    hb_clock::HbClock,
    sequential_spec::SequentialSpec,
    std::hash::Hash,
};

/// Quiescent consistency: operations marked
/// [`quiescent`](braid_core::Actor::quiescent) may be reordered freely against
/// operations they ran concurrently with, while unmarked operations keep their per-thread
/// program order.
///
/// The model is enforced by conversion rather than by a bespoke search: each marked actor in a
/// thread with more than one operation moves to its own fresh single-operation thread, clocks
/// are dropped (real-time order does not bind a quiescently consistent structure), and the
/// converted scenario is checked for linearizability.
pub struct QuiescentConsistencyVerifier<S: SequentialSpec> {
    original_parallel: Vec<Vec<Actor<S::Op>>>,
    inner: LinearizabilityVerifier<S>,
}

impl<S> QuiescentConsistencyVerifier<S>
where
    S: SequentialSpec + Clone + Eq + Hash + 'static,
{
    pub fn new(scenario: ExecutionScenario<S::Op>, fresh: impl FnOnce() -> S) -> Self {
        let original_parallel = scenario.parallel().to_vec();
        let converted = ExecutionScenario::new(
            scenario.init().to_vec(),
            relocate(&original_parallel, original_parallel.to_vec()),
            scenario.post().to_vec(),
        );
        QuiescentConsistencyVerifier {
            original_parallel,
            inner: LinearizabilityVerifier::new(converted, fresh),
        }
    }
}

/// Rebuilds the parallel part so that every quiescently consistent actor of a multi-operation
/// thread lands in its own appended singleton thread. Applied to the actors themselves when
/// converting the scenario and to each run's outcomes when converting results, so positions
/// always line up.
fn relocate<Op, T>(parallel: &[Vec<Actor<Op>>], items: Vec<Vec<T>>) -> Vec<Vec<T>> {
    let mut relocated: Vec<Vec<T>> = (0..parallel.len()).map(|_| Vec::new()).collect();
    for (thread, (actors, thread_items)) in parallel.iter().zip(items).enumerate() {
        let movable = actors.len() > 1;
        for (actor, item) in actors.iter().zip(thread_items) {
            if actor.quiescent_consistent && movable {
                relocated.push(vec![item]);
            } else {
                relocated[thread].push(item);
            }
        }
    }
    relocated
}

impl<S> Verifier for QuiescentConsistencyVerifier<S>
where
    S: SequentialSpec + Clone + Eq + Hash + 'static,
{
    type Spec = S;

    fn verify(
        &mut self,
        results: &ExecutionResult<SpecRet<S>>,
    ) -> Result<Verdict<S::Op, S::Ret>, VerifyError> {
        let unclocked = results
            .parallel
            .iter()
            .map(|thread| {
                thread
                    .iter()
                    .map(|timed| TimedResult::new(timed.result.clone(), HbClock::new()))
                    .collect()
            })
            .collect();
        let converted = ExecutionResult::new(
            results.init.clone(),
            relocate(&self.original_parallel, unclocked),
            results.post.clone(),
        );
        self.inner.verify(&converted)
    }
}

#[cfg(test)]
mod test {
    use {super::*, braid_core::scenario};

    #[test]
    fn relocation_moves_marked_actors_out_of_long_threads() {
        let scenario: ExecutionScenario<&str> = scenario! {
            init: [],
            parallel: [
                [Actor::new("a").quiescent(), Actor::new("b")],
                [Actor::new("c").quiescent()],
            ],
            post: [],
        };
        let relocated = relocate(scenario.parallel(), scenario.parallel().to_vec());

        // "a" moved to a fresh thread; "c" was alone, so it stayed.
        assert_eq!(relocated.len(), 3);
        assert_eq!(relocated[0][0].op, "b");
        assert_eq!(relocated[1][0].op, "c");
        assert_eq!(relocated[2][0].op, "a");
    }
}
