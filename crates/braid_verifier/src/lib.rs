//! Braid Verifier decides whether the results recorded from one concurrent execution are
//! explainable by a legal sequential execution of a reference implementation.
//!
//! The inputs are an [`ExecutionScenario`](braid_core::ExecutionScenario) (which operations
//! ran, partitioned into init / parallel / post segments) and an
//! [`ExecutionResult`](braid_core::ExecutionResult) (what each operation returned, with a
//! happens-before clock per parallel operation). The verifier lazily materializes a labeled
//! transition system over the [`SequentialSpec`](sequential_spec::SequentialSpec) and searches
//! the interleavings allowed by program order and the clocks. The search is exhaustive;
//! structural interning of reference states and memoization of visited frontiers keep it
//! tractable.
//!
//! # Example
//!
//! ```toml
//! [dependencies]
//! braid_core = "0"
//! sequential_spec = "0"
//!
//! [dev-dependencies]
//! braid_verifier = "0"
//! ```
//!
//! ```rust
//! use braid_core::{scenario, ExecutionResult, OpResult};
//! use braid_verifier::{LinearizabilityVerifier, Verifier};
//! use sequential_spec::{Counter, CounterOp, CounterRet};
//!
//! // Two threads each increment an atomic counter once.
//! let scenario = scenario! {
//!     init: [],
//!     parallel: [[CounterOp::IncrementAndGet], [CounterOp::IncrementAndGet]],
//!     post: [],
//! };
//! let mut verifier = LinearizabilityVerifier::new(scenario, Counter::default);
//!
//! // Observing 2 on one thread and 1 on the other is explainable in either order.
//! let observed = ExecutionResult::of_parallel(vec![
//!     vec![OpResult::Value(CounterRet(2))],
//!     vec![OpResult::Value(CounterRet(1))],
//! ]);
//! assert!(verifier.verify(&observed).unwrap().is_consistent());
//!
//! // Observing 1 twice is not: no interleaving of two increments yields a duplicate.
//! let impossible = ExecutionResult::of_parallel(vec![
//!     vec![OpResult::Value(CounterRet(1))],
//!     vec![OpResult::Value(CounterRet(1))],
//! ]);
//! let verdict = verifier.verify(&impossible).unwrap();
//! assert!(!verdict.is_consistent());
//! ```
//!
//! # Beyond Linearizability
//!
//! The same search skeleton carries the weaker and alternative models:
//! [`DurableLinearizabilityVerifier`] and [`BufferedDurableLinearizabilityVerifier`] for
//! crash-tolerant structures, [`QuiescentConsistencyVerifier`],
//! [`QuantitativeRelaxationVerifier`] for structures relaxed per Henzinger et al., and
//! [`SerializabilityVerifier`]. [`CachedVerifier`] wraps any of them to skip re-verification
//! of result sets already accepted.

#![deny(unused_must_use)]
#![warn(rust_2018_idioms, unreachable_pub)]

mod context;
mod durable;
mod linearizability;
mod lts;
mod quantitative;
mod quiescent;
mod report;
mod search;
mod serializability;
mod verifier;

/// Asserts that a verifier accepts the results, rendering the counterexample on failure.
#[macro_export]
macro_rules! assert_consistent {
    ($verifier:expr, $results:expr $(,)?) => {
        match $crate::Verifier::verify(&mut $verifier, &$results) {
            Ok($crate::Verdict::Consistent) => (),
            Ok($crate::Verdict::Inconsistent(counterexample)) => {
                panic!("expected a consistent execution\n{counterexample}")
            }
            Err(error) => panic!("verification failed: {error}"),
        }
    };
}

/// Asserts that a verifier rejects the results.
#[macro_export]
macro_rules! assert_inconsistent {
    ($verifier:expr, $results:expr $(,)?) => {
        match $crate::Verifier::verify(&mut $verifier, &$results) {
            Ok($crate::Verdict::Inconsistent(_)) => (),
            Ok($crate::Verdict::Consistent) => panic!("expected an inconsistent execution"),
            Err(error) => panic!("verification failed: {error}"),
        }
    };
}

pub use durable::{BufferedDurableLinearizabilityVerifier, DurableLinearizabilityVerifier};

pub use linearizability::LinearizabilityVerifier;

pub use quantitative::{PathCostFunction, QuantitativeRelaxationVerifier};

pub use quiescent::QuiescentConsistencyVerifier;

pub use report::{Counterexample, Divergence};

pub use serializability::SerializabilityVerifier;

pub use verifier::{CachedVerifier, OpLocation, SpecOp, SpecRet, Verdict, Verifier, VerifyError};
