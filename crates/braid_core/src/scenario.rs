use crate::Actor;

/// The full operation plan for one test execution: an init part run before the threads start,
/// one operation sequence per parallel thread, and a post part run after the threads finish.
///
/// Scenarios are immutable. Deriving a variation (as scenario mutators do when shrinking or
/// growing a plan) consumes the scenario and returns a new one; the operation sequences of an
/// existing scenario are never modified in place.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ExecutionScenario<Op> {
    init: Vec<Actor<Op>>,
    parallel: Vec<Vec<Actor<Op>>>,
    post: Vec<Actor<Op>>,
}

/// Creates an [`ExecutionScenario`] from operation (or [`Actor`]) expressions.
///
/// # Example
/// ```
/// use braid_core::scenario;
/// use sequential_spec::CounterOp;
///
/// let scenario = scenario! {
///     init: [],
///     parallel: [[CounterOp::IncrementAndGet], [CounterOp::IncrementAndGet]],
///     post: [CounterOp::Get],
/// };
/// assert_eq!(scenario.thread_count(), 2);
/// ```
#[macro_export]
macro_rules! scenario {
    (
        init: [$($init:expr),* $(,)?],
        parallel: [$([$($op:expr),* $(,)?]),* $(,)?],
        post: [$($post:expr),* $(,)?] $(,)?
    ) => {
        $crate::ExecutionScenario::new(
            vec![$($crate::Actor::from($init)),*],
            vec![$(vec![$($crate::Actor::from($op)),*]),*],
            vec![$($crate::Actor::from($post)),*],
        )
    };
}

impl<Op> ExecutionScenario<Op> {
    pub fn new(
        init: Vec<Actor<Op>>,
        parallel: Vec<Vec<Actor<Op>>>,
        post: Vec<Actor<Op>>,
    ) -> Self {
        ExecutionScenario {
            init,
            parallel,
            post,
        }
    }

    pub fn init(&self) -> &[Actor<Op>] {
        &self.init
    }

    pub fn parallel(&self) -> &[Vec<Actor<Op>>] {
        &self.parallel
    }

    pub fn post(&self) -> &[Actor<Op>] {
        &self.post
    }

    pub fn thread_count(&self) -> usize {
        self.parallel.len()
    }

    /// Derives a scenario with one more init operation.
    pub fn with_init_op(mut self, actor: impl Into<Actor<Op>>) -> Self {
        self.init.push(actor.into());
        self
    }

    /// Derives a scenario with one more operation appended to `thread`, growing the parallel
    /// part if the thread does not exist yet.
    pub fn with_parallel_op(mut self, thread: usize, actor: impl Into<Actor<Op>>) -> Self {
        if thread >= self.parallel.len() {
            self.parallel.resize_with(thread + 1, Vec::new);
        }
        self.parallel[thread].push(actor.into());
        self
    }

    /// Derives a scenario with one more post operation.
    pub fn with_post_op(mut self, actor: impl Into<Actor<Op>>) -> Self {
        self.post.push(actor.into());
        self
    }
}
