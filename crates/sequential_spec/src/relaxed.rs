use {
    crate::{Invoked, SequentialSpec},
    std::collections::VecDeque,
};

/// One candidate transition of a [`RelaxedSpec`]: the successor state, the outcome, and the
/// quantitative penalty of choosing this transition over the strict one.
#[derive(Clone, Debug)]
pub struct CostTransition<S: SequentialSpec> {
    pub next: S,
    pub result: Invoked<S::Ret>,
    /// The transition cost, e.g. how many elements the strict structure would have returned
    /// first.
    pub cost: u32,
    /// Whether the transition counts toward predicate-based path cost functions. Defaults to
    /// `cost != 0`.
    pub predicate: bool,
}

impl<S: SequentialSpec> CostTransition<S> {
    pub fn new(next: S, result: Invoked<S::Ret>, cost: u32) -> Self {
        CostTransition {
            next,
            result,
            cost,
            predicate: cost != 0,
        }
    }

    pub fn new_with_predicate(next: S, result: Invoked<S::Ret>, cost: u32, predicate: bool) -> Self {
        CostTransition {
            next,
            result,
            cost,
            predicate,
        }
    }
}

/// A sequential specification with quantitatively relaxed semantics: each operation offers a
/// set of candidate transitions with costs, following "Quantitative Relaxation of Concurrent
/// Data Structures" by Henzinger et al. The strict [`SequentialSpec::invoke`] remains available
/// for non-relaxed verification of the same type.
pub trait RelaxedSpec: SequentialSpec + Sized {
    /// Enumerates every candidate transition for `op` from the current state. A non-relaxed
    /// operation must yield exactly one zero-cost candidate.
    fn relaxed_invoke(&self, op: &Self::Op) -> Vec<CostTransition<Self>>;
}

/// A k-relaxed FIFO queue: `Poll` may return any of the first `k` elements, with cost equal to
/// the number of older elements skipped. `Offer` is strict.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct KRelaxedQueue<T> {
    k: usize,
    items: VecDeque<T>,
}

/// An operation on a [`KRelaxedQueue`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RelaxedQueueOp<T> {
    Offer(T),
    Poll,
}

/// A return value from a [`KRelaxedQueue`] operation.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RelaxedQueueRet<T> {
    OfferOk,
    PollOk(Option<T>),
}

impl<T> KRelaxedQueue<T> {
    pub fn new(k: usize) -> Self {
        assert!(k > 0, "relaxation degree must be positive");
        KRelaxedQueue {
            k,
            items: VecDeque::new(),
        }
    }
}

impl<T> SequentialSpec for KRelaxedQueue<T>
where
    T: Clone + PartialEq,
{
    type Op = RelaxedQueueOp<T>;
    type Ret = RelaxedQueueRet<T>;

    fn invoke(&mut self, op: &Self::Op) -> Invoked<Self::Ret> {
        match op {
            RelaxedQueueOp::Offer(item) => {
                self.items.push_back(item.clone());
                Invoked::Completed(RelaxedQueueRet::OfferOk)
            }
            RelaxedQueueOp::Poll => {
                Invoked::Completed(RelaxedQueueRet::PollOk(self.items.pop_front()))
            }
        }
    }
}

impl<T> RelaxedSpec for KRelaxedQueue<T>
where
    T: Clone + PartialEq,
{
    fn relaxed_invoke(&self, op: &Self::Op) -> Vec<CostTransition<Self>> {
        match op {
            RelaxedQueueOp::Offer(item) => {
                let mut next = self.clone();
                next.items.push_back(item.clone());
                vec![CostTransition::new(
                    next,
                    Invoked::Completed(RelaxedQueueRet::OfferOk),
                    0,
                )]
            }
            RelaxedQueueOp::Poll => {
                if self.items.is_empty() {
                    return vec![CostTransition::new(
                        self.clone(),
                        Invoked::Completed(RelaxedQueueRet::PollOk(None)),
                        0,
                    )];
                }
                (0..self.k.min(self.items.len()))
                    .map(|skipped| {
                        let mut next = self.clone();
                        let item = next.items.remove(skipped).unwrap();
                        CostTransition::new(
                            next,
                            Invoked::Completed(RelaxedQueueRet::PollOk(Some(item))),
                            skipped as u32,
                        )
                    })
                    .collect()
            }
        }
    }
}
