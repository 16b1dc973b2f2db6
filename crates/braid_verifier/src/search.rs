use {
    crate::{
        context::{Context, ContextContainer, PolicyState},
        lts::{Candidate, Edge, Lts, StateId},
        quantitative::{CostCounter, PathCostFunction},
        report::{Counterexample, Divergence},
        verifier::{OpLocation, Verdict, VerifyError},
    },
    braid_core::{Actor, ExecutionResult, ExecutionScenario, OpResult},
    sequential_spec::{Invoked, SequentialSpec},
    std::{collections::HashSet, hash::Hash},
    tracing::{debug, trace},
};

/// The verification models that share the context-expansion skeleton. Quiescent consistency
/// and serializability are not listed: both are scenario conversions layered on
/// [`Linearizability`](Mode::Linearizability).
#[derive(Clone, Copy, Debug)]
pub(crate) enum Mode {
    Linearizability,
    Durable,
    BufferedDurable,
    Quantitative {
        relaxation_factor: u32,
        path_cost: PathCostFunction,
    },
}

type Generate<S> = Box<dyn Fn(&S, &<S as SequentialSpec>::Op) -> Vec<Candidate<S>>>;

/// The search for a legal linearization of one scenario's recorded results.
///
/// The engine owns the scenario, the transition system, and a generator closure that asks the
/// sequential specification for candidate transitions. Each call to [`Engine::verify`]
/// replays the init part, explores interleavings of the parallel part depth-first with
/// memoization, and replays the post part from every accepting frontier until one passes.
pub(crate) struct Engine<S: SequentialSpec> {
    scenario: ExecutionScenario<S::Op>,
    mode: Mode,
    generate: Generate<S>,
    lts: Lts<S>,
    parallel_offsets: Vec<usize>,
    post_offset: usize,
}

impl<S> Engine<S>
where
    S: SequentialSpec + Clone + Eq + Hash,
{
    pub(crate) fn new(
        scenario: ExecutionScenario<S::Op>,
        root: S,
        mode: Mode,
        generate: Generate<S>,
    ) -> Self {
        // Actors get stable ids in scenario order so transitions cache across verify calls.
        let mut offset = scenario.init().len();
        let mut parallel_offsets = Vec::with_capacity(scenario.thread_count());
        for thread in scenario.parallel() {
            parallel_offsets.push(offset);
            offset += thread.len();
        }
        Engine {
            lts: Lts::new(root),
            scenario,
            mode,
            generate,
            parallel_offsets,
            post_offset: offset,
        }
    }

    pub(crate) fn state_count(&self) -> usize {
        self.lts.state_count()
    }

    pub(crate) fn verify(
        &mut self,
        results: &ExecutionResult<S::Ret>,
    ) -> Result<Verdict<S::Op, S::Ret>, VerifyError> {
        self.check_shape(results);
        let thread_count = self.scenario.thread_count();

        let root = match self.replay_init(results)? {
            Ok(state) => state,
            Err(index) => {
                return Ok(self.inconsistent(
                    results,
                    vec![0; thread_count],
                    Divergence::Init { index },
                ))
            }
        };

        let ops_per_thread: Vec<usize> = self.scenario.parallel().iter().map(Vec::len).collect();
        let mut stack = vec![Context::initial(
            thread_count,
            root,
            self.initial_policy(root, thread_count),
        )];
        let mut visited = HashSet::new();
        let mut deepest = vec![0; thread_count];
        let mut deepest_total = 0;
        let mut reached_frontier = false;
        let mut post_divergence = 0;

        while let Some(context) = stack.pop() {
            if !visited.insert(context.memo_key()) {
                continue; // b/c an equivalent context was already explored
            }
            trace!(?context, "expanding");

            let total: usize = context.executed.iter().sum();
            if total > deepest_total {
                deepest_total = total;
                deepest.copy_from_slice(&context.executed);
            }

            if context.is_exhausted(&ops_per_thread) {
                match self.replay_post(context.state, results)? {
                    None => {
                        debug!(
                            contexts = visited.len(),
                            states = self.lts.state_count(),
                            "found a legal linearization"
                        );
                        return Ok(Verdict::Consistent);
                    }
                    Some(progress) => {
                        reached_frontier = true;
                        post_divergence = post_divergence.max(progress);
                        continue;
                    }
                }
            }

            for thread in 0..thread_count {
                let mut children = self.container();
                self.expand(&context, thread, results, &mut children)?;
                stack.extend(children.into_children());
            }
        }

        debug!(
            contexts = visited.len(),
            states = self.lts.state_count(),
            "search exhausted without a legal linearization"
        );
        let divergence = if reached_frontier {
            Divergence::Post {
                index: post_divergence,
            }
        } else {
            Divergence::Parallel
        };
        Ok(self.inconsistent(results, deepest, divergence))
    }

    /// Produces every child of `context` reachable by linearizing (or skipping) the next step
    /// of `thread`.
    fn expand(
        &mut self,
        context: &Context,
        thread: usize,
        results: &ExecutionResult<S::Ret>,
        children: &mut ContextContainer,
    ) -> Result<(), VerifyError> {
        if let PolicyState::Buffered { crash_pending, .. } = &context.policy {
            if crash_pending[thread] {
                return Ok(()); // b/c the thread's crash awaits the rest of its crash group
            }
        }

        let index = context.executed[thread];
        if context.suspended[thread].is_some() {
            return self.expand_resumption(context, thread, index, results, children);
        }
        if index >= self.scenario.parallel()[thread].len() {
            return Ok(());
        }

        let recorded = &results.parallel[thread][index];
        if !recorded.clock.permits(&context.executed, thread) {
            return Ok(()); // b/c happens-before knowledge orders this operation later
        }
        let actor = self.scenario.parallel()[thread][index].clone();

        match &recorded.result {
            OpResult::NoResult => children.push(skip(context, thread)),
            OpResult::Suspended => {
                if actor.can_suspend {
                    children.push(skip(context, thread));
                }
            }
            OpResult::Cancelled => {
                if actor.cancel_on_suspension {
                    children.push(skip(context, thread));
                }
            }
            OpResult::Crashed => match self.mode {
                Mode::Durable => children.push(skip(context, thread)),
                Mode::BufferedDurable => self.expand_crash(context, thread, results, children),
                Mode::Linearizability | Mode::Quantitative { .. } => (),
            },
            OpResult::Resumed(_) if matches!(self.mode, Mode::Quantitative { .. }) => (),
            OpResult::Value(_) | OpResult::Exception(_) | OpResult::Resumed(_) => {
                let actor_id = self.parallel_offsets[thread] + index;
                let location = OpLocation::Parallel { thread, index };
                for edge in self.edges_for(context.state, actor_id, &actor.op) {
                    check_allowed(&edge, &actor, location)?;
                    match (&recorded.result, &edge.outcome) {
                        (OpResult::Value(v), Invoked::Completed(c)) if c == v => {
                            advance(context, thread, &edge, actor.flushes, children);
                        }
                        (OpResult::Exception(e), Invoked::Raised(r)) if r == e => {
                            advance(context, thread, &edge, actor.flushes, children);
                        }
                        (OpResult::Resumed(v), Invoked::Completed(c)) if c == v => {
                            advance(context, thread, &edge, actor.flushes, children);
                        }
                        (OpResult::Resumed(_), Invoked::Suspended) if actor.can_suspend => {
                            children.push(suspend(context, thread));
                        }
                        _ => (),
                    }
                }
            }
            _ => (), // b/c future result kinds have no transition here
        }
        Ok(())
    }

    /// A suspended invocation may linearize at any later point; it completes with the recorded
    /// resumption value or stays parked.
    fn expand_resumption(
        &mut self,
        context: &Context,
        thread: usize,
        index: usize,
        results: &ExecutionResult<S::Ret>,
        children: &mut ContextContainer,
    ) -> Result<(), VerifyError> {
        let OpResult::Resumed(expected) = &results.parallel[thread][index].result else {
            unreachable!("only operations recorded as resumed suspend mid-search");
        };
        let actor = self.scenario.parallel()[thread][index].clone();
        let actor_id = self.parallel_offsets[thread] + index;
        let location = OpLocation::Parallel { thread, index };
        for edge in self.edges_for(context.state, actor_id, &actor.op) {
            check_allowed(&edge, &actor, location)?;
            if let Invoked::Completed(value) = &edge.outcome {
                if value == expected {
                    advance(context, thread, &edge, actor.flushes, children);
                }
            }
        }
        Ok(())
    }

    /// Buffered durability: the last crash of a crash group rolls the volatile state back to
    /// one of the persisted candidates; earlier crashes of the group are deferred.
    fn expand_crash(
        &mut self,
        context: &Context,
        thread: usize,
        results: &ExecutionResult<S::Ret>,
        children: &mut ContextContainer,
    ) {
        let PolicyState::Buffered {
            persisted,
            crash_pending,
        } = &context.policy
        else {
            unreachable!("crash expansion outside the buffered durable model");
        };
        let group_continues = (0..context.executed.len()).any(|other| {
            other != thread
                && !crash_pending[other]
                && context.executed[other] < results.parallel[other].len()
                && matches!(
                    results.parallel[other][context.executed[other]].result,
                    OpResult::Crashed,
                )
        });
        if group_continues {
            let mut child = skip(context, thread);
            if let PolicyState::Buffered { crash_pending, .. } = &mut child.policy {
                crash_pending[thread] = true;
            }
            children.push(child);
        } else {
            for &candidate in persisted {
                let mut child = skip(context, thread);
                child.state = candidate;
                child.policy = PolicyState::Buffered {
                    persisted: vec![candidate],
                    crash_pending: vec![false; crash_pending.len()],
                };
                children.push(child);
            }
        }
    }

    fn edges_for(&mut self, from: StateId, actor_id: usize, op: &S::Op) -> Vec<Edge<S::Ret>> {
        let generate = &self.generate;
        self.lts.edges(from, actor_id, |state| generate(state, op))
    }

    /// Replays the init part in program order. `Ok(state)` roots the parallel search;
    /// `Err(index)` reports the first non-matching operation.
    fn replay_init(
        &mut self,
        results: &ExecutionResult<S::Ret>,
    ) -> Result<Result<StateId, usize>, VerifyError> {
        let mut state = self.lts.root();
        for index in 0..self.scenario.init().len() {
            let actor = self.scenario.init()[index].clone();
            let matched = self.replay_step(
                &mut state,
                index,
                &actor,
                &results.init[index],
                OpLocation::Init { index },
            )?;
            if !matched {
                return Ok(Err(index));
            }
        }
        Ok(Ok(state))
    }

    /// Replays the post part from an accepting frontier. `None` means every post operation
    /// matched; `Some(index)` reports how far the replay got.
    fn replay_post(
        &mut self,
        from: StateId,
        results: &ExecutionResult<S::Ret>,
    ) -> Result<Option<usize>, VerifyError> {
        let mut state = from;
        for index in 0..self.scenario.post().len() {
            let actor = self.scenario.post()[index].clone();
            let matched = self.replay_step(
                &mut state,
                self.post_offset + index,
                &actor,
                &results.post[index],
                OpLocation::Post { index },
            )?;
            if !matched {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    fn replay_step(
        &mut self,
        state: &mut StateId,
        actor_id: usize,
        actor: &Actor<S::Op>,
        recorded: &OpResult<S::Ret>,
        location: OpLocation,
    ) -> Result<bool, VerifyError> {
        for edge in self.edges_for(*state, actor_id, &actor.op) {
            check_allowed(&edge, actor, location)?;
            let matched = match (recorded, &edge.outcome) {
                (OpResult::Value(v), Invoked::Completed(c)) => c == v,
                (OpResult::Exception(e), Invoked::Raised(r)) => r == e,
                // Suspensions and crashes have no place in a single-threaded segment.
                _ => false,
            };
            if matched {
                *state = edge.target;
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn container(&self) -> ContextContainer {
        match self.mode {
            Mode::Durable => ContextContainer::bounded(2),
            _ => ContextContainer::unbounded(),
        }
    }

    fn initial_policy(&self, root: StateId, thread_count: usize) -> PolicyState {
        match self.mode {
            Mode::BufferedDurable => PolicyState::Buffered {
                persisted: vec![root],
                crash_pending: vec![false; thread_count],
            },
            Mode::Quantitative {
                relaxation_factor,
                path_cost,
            } => PolicyState::Relaxed {
                counter: CostCounter::new(path_cost, relaxation_factor),
            },
            _ => PolicyState::Baseline,
        }
    }

    fn inconsistent(
        &self,
        results: &ExecutionResult<S::Ret>,
        linearized: Vec<usize>,
        divergence: Divergence,
    ) -> Verdict<S::Op, S::Ret> {
        Verdict::Inconsistent(Box::new(Counterexample {
            scenario: self.scenario.clone(),
            results: results.clone(),
            linearized,
            divergence,
        }))
    }

    fn check_shape(&self, results: &ExecutionResult<S::Ret>) {
        let matches = results.init.len() == self.scenario.init().len()
            && results.post.len() == self.scenario.post().len()
            && results.parallel.len() == self.scenario.thread_count()
            && self
                .scenario
                .parallel()
                .iter()
                .zip(&results.parallel)
                .all(|(actors, outcomes)| actors.len() == outcomes.len());
        assert!(
            matches,
            "the recorded results are shaped differently than the scenario. \
             This indicates a bug in the runner.",
        );
    }
}

fn check_allowed<Op, Ret>(
    edge: &Edge<Ret>,
    actor: &Actor<Op>,
    location: OpLocation,
) -> Result<(), VerifyError> {
    if let Invoked::Raised(raised) = &edge.outcome {
        if !actor.allowed_exceptions.contains(raised) {
            return Err(VerifyError::UnexpectedException {
                location,
                raised: raised.clone(),
            });
        }
    }
    Ok(())
}

/// The operation takes no effect: the thread moves past it and the state stays put.
fn skip(context: &Context, thread: usize) -> Context {
    let mut child = context.clone();
    child.executed[thread] += 1;
    child
}

/// The invocation parks with a fresh ticket; the thread stays on the same operation.
fn suspend(context: &Context, thread: usize) -> Context {
    let mut child = context.clone();
    child.suspended[thread] = Some(child.next_ticket);
    child.next_ticket += 1;
    child
}

/// The operation linearizes along `edge`. The child is dropped instead of pushed when a
/// relaxed path-cost accumulator rejects the transition.
fn advance<Ret>(
    context: &Context,
    thread: usize,
    edge: &Edge<Ret>,
    flushes: bool,
    children: &mut ContextContainer,
) {
    let mut child = context.clone();
    child.executed[thread] += 1;
    child.suspended[thread] = None;
    child.state = edge.target;
    match &mut child.policy {
        PolicyState::Baseline => (),
        PolicyState::Buffered { persisted, .. } => {
            if flushes {
                *persisted = vec![edge.target];
            } else if let Err(position) = persisted.binary_search(&edge.target) {
                persisted.insert(position, edge.target);
            }
        }
        PolicyState::Relaxed { counter } => match counter.next(edge.cost, edge.predicate) {
            Some(next) => *counter = next,
            None => return, // b/c the path cost exceeded the relaxation factor
        },
    }
    children.push(child);
}
