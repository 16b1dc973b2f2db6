use crate::{lts::StateId, quantitative::CostCounter};

/// Correlates a suspended invocation with the resumption that eventually completes it.
pub(crate) type Ticket = u32;

/// Variant-specific context payload. Folding the payloads into one closed enum keeps a single
/// `Context` type for every verification model.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) enum PolicyState {
    Baseline,
    /// Buffered durability: `persisted` holds every state that may have reached persistent
    /// storage since the last barrier (kept sorted for canonical equality), and
    /// `crash_pending` marks threads whose crash awaits the rest of its crash group.
    Buffered {
        persisted: Vec<StateId>,
        crash_pending: Vec<bool>,
    },
    /// Quantitative relaxation: the running path-cost accumulator.
    Relaxed { counter: CostCounter },
}

/// One node of the verification search: how far each thread's operation sequence has been
/// linearized, which threads have a suspended invocation in flight, and which reference state
/// the linearized prefix produced. Contexts are immutable; expansion clones.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Context {
    pub(crate) executed: Vec<usize>,
    pub(crate) suspended: Vec<Option<Ticket>>,
    pub(crate) next_ticket: Ticket,
    pub(crate) state: StateId,
    pub(crate) policy: PolicyState,
}

/// The deduplication key for visited contexts. Ticket numbers are bookkeeping: two contexts
/// that differ only in how invocations were numbered explore identical futures, so the key
/// keeps the suspension *pattern* and drops the numbers.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct MemoKey {
    executed: Vec<usize>,
    suspended: Vec<bool>,
    state: StateId,
    policy: PolicyState,
}

impl Context {
    pub(crate) fn initial(thread_count: usize, state: StateId, policy: PolicyState) -> Self {
        Context {
            executed: vec![0; thread_count],
            suspended: vec![None; thread_count],
            next_ticket: 0,
            state,
            policy,
        }
    }

    pub(crate) fn memo_key(&self) -> MemoKey {
        MemoKey {
            executed: self.executed.clone(),
            suspended: self.suspended.iter().map(Option::is_some).collect(),
            state: self.state,
            policy: self.policy.clone(),
        }
    }

    /// Whether every thread linearized its whole sequence with nothing in flight.
    pub(crate) fn is_exhausted(&self, ops_per_thread: &[usize]) -> bool {
        self.executed
            .iter()
            .zip(ops_per_thread)
            .all(|(done, total)| done == total)
            && self.suspended.iter().all(Option::is_none)
            && match &self.policy {
                PolicyState::Buffered { crash_pending, .. } => {
                    !crash_pending.iter().any(|pending| *pending)
                }
                _ => true,
            }
    }
}

/// Collects the child contexts produced by expanding one thread of one context. Each
/// verification model declares up front how many children a single expansion may legally
/// produce; exceeding a declared bound means the model itself is broken, not the execution
/// under test.
pub(crate) struct ContextContainer {
    bound: Option<usize>,
    children: Vec<Context>,
}

impl ContextContainer {
    pub(crate) fn bounded(bound: usize) -> Self {
        ContextContainer {
            bound: Some(bound),
            children: Vec::with_capacity(bound),
        }
    }

    pub(crate) fn unbounded() -> Self {
        ContextContainer {
            bound: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, context: Context) {
        if let Some(bound) = self.bound {
            assert!(
                self.children.len() < bound,
                "a single expansion produced more than {bound} sibling contexts. \
                 This indicates a bug in the verification model.",
            );
        }
        self.children.push(context);
    }

    pub(crate) fn into_children(self) -> Vec<Context> {
        self.children
    }
}

#[cfg(test)]
mod test {
    use {super::*, crate::quantitative::PathCostFunction};

    fn baseline(executed: Vec<usize>) -> Context {
        let thread_count = executed.len();
        Context {
            executed,
            suspended: vec![None; thread_count],
            next_ticket: 0,
            state: crate::lts::test_state_id(0),
            policy: PolicyState::Baseline,
        }
    }

    #[test]
    fn memo_key_ignores_ticket_numbers() {
        let mut first = baseline(vec![1, 0]);
        first.suspended[1] = Some(0);
        first.next_ticket = 1;

        let mut second = baseline(vec![1, 0]);
        second.suspended[1] = Some(4);
        second.next_ticket = 5;

        assert_ne!(first, second);
        assert_eq!(first.memo_key(), second.memo_key());
    }

    #[test]
    fn memo_key_distinguishes_policy_payloads() {
        let counting = Context {
            policy: PolicyState::Relaxed {
                counter: crate::quantitative::CostCounter::new(PathCostFunction::PhiInterval, 3),
            },
            ..baseline(vec![0])
        };
        assert_ne!(baseline(vec![0]).memo_key(), counting.memo_key());
    }

    #[test]
    fn exhaustion_requires_settled_suspensions() {
        let mut context = baseline(vec![2, 1]);
        assert!(context.is_exhausted(&[2, 1]));
        assert!(!context.is_exhausted(&[2, 2]));

        context.suspended[0] = Some(0);
        assert!(!context.is_exhausted(&[2, 1]));
    }

    #[test]
    #[should_panic(expected = "This indicates a bug")]
    fn bounded_container_rejects_overflow() {
        let mut container = ContextContainer::bounded(2);
        container.push(baseline(vec![0]));
        container.push(baseline(vec![1]));
        container.push(baseline(vec![2]));
    }
}
