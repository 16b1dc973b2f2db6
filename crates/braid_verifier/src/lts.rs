use {
    sequential_spec::{Invoked, SequentialSpec},
    std::{collections::HashMap, hash::Hash},
};

/// Identifies one interned reference state within an [`Lts`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct StateId(u32);

/// A memoized transition: the outcome of applying one actor's operation to a state, the
/// resulting state, and the quantitative penalty of this particular transition (zero outside
/// relaxed verification).
#[derive(Clone, Debug)]
pub(crate) struct Edge<Ret> {
    pub(crate) outcome: Invoked<Ret>,
    pub(crate) target: StateId,
    pub(crate) cost: u32,
    pub(crate) predicate: bool,
}

/// A transition produced by a generator closure, before its successor state is interned.
pub(crate) struct Candidate<S: SequentialSpec> {
    pub(crate) outcome: Invoked<S::Ret>,
    pub(crate) next: S,
    pub(crate) cost: u32,
    pub(crate) predicate: bool,
}

/// A lazily materialized labeled transition system over a sequential specification.
///
/// States are *interned*: a successor snapshot is looked up by the specification type's own
/// `Eq`/`Hash` before a fresh id is handed out, so snapshots reached by different operation
/// orders collapse to a single node. Without this collapse the reachable graph would be a tree
/// whose size is factorial in the operation count.
///
/// Edges are computed on first request and cached per `(state, actor)` for the lifetime of the
/// `Lts`. Each verifier owns its own `Lts`, so constructing a fresh verifier is what clears
/// the cache between independent verification runs.
pub(crate) struct Lts<S: SequentialSpec> {
    states: Vec<S>,
    edges: Vec<HashMap<usize, Vec<Edge<S::Ret>>>>,
    index: HashMap<S, StateId>,
}

impl<S> Lts<S>
where
    S: SequentialSpec + Clone + Eq + Hash,
{
    pub(crate) fn new(root: S) -> Self {
        let mut lts = Lts {
            states: Vec::new(),
            edges: Vec::new(),
            index: HashMap::new(),
        };
        lts.intern(root);
        lts
    }

    pub(crate) fn root(&self) -> StateId {
        StateId(0)
    }

    /// Lookup-or-insert. This is the only way states enter the table, so no two ids can ever
    /// refer to equal snapshots.
    pub(crate) fn intern(&mut self, state: S) -> StateId {
        if let Some(&id) = self.index.get(&state) {
            return id;
        }
        let id = StateId(self.states.len() as u32);
        self.index.insert(state.clone(), id);
        self.states.push(state);
        self.edges.push(HashMap::new());
        id
    }

    pub(crate) fn state(&self, id: StateId) -> &S {
        &self.states[id.0 as usize]
    }

    pub(crate) fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Returns the outgoing edges labeled `actor_id` from `from`, invoking `generate` against
    /// the state on first use and caching the interned result.
    pub(crate) fn edges(
        &mut self,
        from: StateId,
        actor_id: usize,
        generate: impl FnOnce(&S) -> Vec<Candidate<S>>,
    ) -> Vec<Edge<S::Ret>> {
        if let Some(cached) = self.edges[from.0 as usize].get(&actor_id) {
            return cached.clone();
        }
        let candidates = generate(&self.states[from.0 as usize]);
        let edges: Vec<_> = candidates
            .into_iter()
            .map(|candidate| Edge {
                outcome: candidate.outcome,
                target: self.intern(candidate.next),
                cost: candidate.cost,
                predicate: candidate.predicate,
            })
            .collect();
        self.edges[from.0 as usize].insert(actor_id, edges.clone());
        edges
    }
}

#[cfg(test)]
pub(crate) fn test_state_id(id: u32) -> StateId {
    StateId(id)
}
