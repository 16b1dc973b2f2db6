use {
    braid_core::{ExecutionResult, ExecutionScenario},
    colorful::{Color, Colorful},
    std::fmt::{Debug, Display, Formatter},
};

/// Which segment of the scenario could not be explained.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum Divergence {
    /// The init replay stopped matching at this operation.
    Init { index: usize },
    /// No interleaving of the parallel part reaches a full linearization.
    Parallel,
    /// Every full linearization of the parallel part was reached, but the post replay stopped
    /// matching; `index` is the furthest post operation any of them explained.
    Post { index: usize },
}

/// Everything needed to render why a recorded execution has no sequential explanation: the
/// scenario, the recorded results, and how far the search got before giving up.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Counterexample<Op, Ret> {
    pub scenario: ExecutionScenario<Op>,
    pub results: ExecutionResult<Ret>,
    /// Operations per parallel thread that the deepest search frontier linearized.
    pub linearized: Vec<usize>,
    pub divergence: Divergence,
}

impl<Op, Ret> Display for Counterexample<Op, Ret>
where
    Op: Debug,
    Ret: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        writeln!(
            f,
            "No sequential execution of the reference implementation explains these results:"
        )?;
        if !self.scenario.init().is_empty() {
            writeln!(f, "init:")?;
            for (index, (actor, result)) in self
                .scenario
                .init()
                .iter()
                .zip(&self.results.init)
                .enumerate()
            {
                let line = format!("  {:?} → {}", actor.op, result);
                if self.divergence == (Divergence::Init { index }) {
                    writeln!(f, "{}", line.color(Color::Red))?;
                } else {
                    writeln!(f, "{line}")?;
                }
            }
        }
        for (thread, (actors, outcomes)) in self
            .scenario
            .parallel()
            .iter()
            .zip(&self.results.parallel)
            .enumerate()
        {
            writeln!(f, "thread {thread}:")?;
            for (index, (actor, timed)) in actors.iter().zip(outcomes).enumerate() {
                let line = format!("  {:?} → {} @{}", actor.op, timed.result, timed.clock);
                let stuck =
                    self.divergence == Divergence::Parallel && index >= self.linearized[thread];
                if stuck {
                    writeln!(f, "{}", line.color(Color::Red))?;
                } else {
                    writeln!(f, "{line}")?;
                }
            }
        }
        if !self.scenario.post().is_empty() {
            writeln!(f, "post:")?;
            for (index, (actor, result)) in self
                .scenario
                .post()
                .iter()
                .zip(&self.results.post)
                .enumerate()
            {
                let line = format!("  {:?} → {}", actor.op, result);
                let stuck = matches!(self.divergence, Divergence::Post { index: i } if index >= i);
                if stuck {
                    writeln!(f, "{}", line.color(Color::Red))?;
                } else {
                    writeln!(f, "{line}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        braid_core::{scenario, OpResult},
    };

    #[test]
    fn renders_every_segment() {
        let counterexample = Counterexample {
            scenario: scenario! {
                init: ["setup"],
                parallel: [["a"], ["b"]],
                post: ["teardown"],
            },
            results: ExecutionResult::new(
                vec![OpResult::Value(0)],
                vec![
                    vec![OpResult::Value(1).into()],
                    vec![OpResult::<i32>::NoResult.into()],
                ],
                vec![OpResult::Value(9)],
            ),
            linearized: vec![1, 0],
            divergence: Divergence::Parallel,
        };

        let rendered = counterexample.to_string();
        assert!(rendered.contains("init:"));
        assert!(rendered.contains("thread 0:"));
        assert!(rendered.contains("thread 1:"));
        assert!(rendered.contains("no result"));
        assert!(rendered.contains("post:"));
        assert!(rendered.contains("@<>"));
    }
}
