//! A happens-before clock for concurrency testing.
//!
//! An [`HbClock`] annotates one operation in a concurrent execution: entry `t` records how many
//! operations of thread `t` were known to have completed before the annotated operation started.
//! Clocks therefore induce a partial order on operations, and a verifier can use
//! [`HbClock::permits`] to decide whether an operation may be linearized given how far each
//! thread has already progressed.
//!
//! Missing entries are implicitly zero, so clocks of different lengths compare (and hash)
//! consistently. An empty clock constrains nothing.

use std::cmp::{max, Ordering};
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Happens-before knowledge recorded at the start of one operation. Entry `t` is the number of
/// operations of thread `t` that must precede the annotated operation in any legal
/// linearization.
#[derive(Clone, Debug, Default, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct HbClock(Vec<u32>);

/// Creates an [`HbClock`] containing the specified entries.
///
/// # Example
/// ```
/// use hb_clock::hbclock;
///
/// let unconstrained = hbclock![];
/// let after_two_of_thread_1 = hbclock![0, 2];
/// ```
#[macro_export]
macro_rules! hbclock {
    () => (
        $crate::HbClock::new()
    );
    ($($x:expr),+ $(,)?) => (
        $crate::HbClock::from(vec![$($x),+])
    );
}

impl HbClock {
    pub fn new() -> Self {
        HbClock(Vec::new())
    }

    pub fn new_with_threads(thread_count: usize) -> Self {
        HbClock(vec![0; thread_count])
    }

    /// Number of operations of `thread` that completed before the clocked operation started.
    /// Threads beyond the stored length contribute no constraint.
    pub fn completed_before(&self, thread: usize) -> u32 {
        self.0.get(thread).copied().unwrap_or(0)
    }

    /// Whether an operation of thread `own` carrying this clock may start once each thread `t`
    /// has completed `executed[t]` operations. The entry for `own` is a recording artifact and
    /// is ignored.
    pub fn permits(&self, executed: &[usize], own: usize) -> bool {
        self.0
            .iter()
            .enumerate()
            .all(|(t, &count)| t == own || count as usize <= executed.get(t).copied().unwrap_or(0))
    }

    /// Notes one more completed operation of `thread`. Intended for runners assembling clocks
    /// while an execution unfolds.
    pub fn record(&mut self, thread: usize) {
        if thread >= self.0.len() {
            self.0.resize(thread + 1, 0);
        }
        self.0[thread] += 1;
    }

    /// Takes the pointwise maximum with `other`, i.e. absorbs its happens-before knowledge.
    pub fn merge_in(&mut self, other: &Self) {
        if other.0.len() > self.0.len() {
            self.0.resize(other.0.len(), 0);
        }
        for (entry, &incoming) in self.0.iter_mut().zip(other.0.iter()) {
            *entry = max(*entry, incoming);
        }
    }

    pub fn reset(&mut self) {
        self.0.fill(0);
    }
}

impl Display for HbClock {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "<")?;
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{entry}")?;
        }
        write!(f, ">")
    }
}

impl From<Vec<u32>> for HbClock {
    fn from(entries: Vec<u32>) -> Self {
        HbClock(entries)
    }
}

impl Hash for HbClock {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Trailing zeros are not observable, so they must not perturb the hash.
        let significant = self
            .0
            .iter()
            .rposition(|entry| *entry != 0)
            .map(|i| i + 1)
            .unwrap_or(0);
        self.0[..significant].hash(state);
    }
}

impl PartialEq for HbClock {
    fn eq(&self, rhs: &Self) -> bool {
        let len = max(self.0.len(), rhs.0.len());
        (0..len).all(|i| self.completed_before(i) == rhs.completed_before(i))
    }
}

impl PartialOrd for HbClock {
    fn partial_cmp(&self, rhs: &Self) -> Option<Ordering> {
        let len = max(self.0.len(), rhs.0.len());
        let mut seen_less = false;
        let mut seen_greater = false;
        for i in 0..len {
            match self.completed_before(i).cmp(&rhs.completed_before(i)) {
                Ordering::Less => seen_less = true,
                Ordering::Greater => seen_greater = true,
                Ordering::Equal => (),
            }
            if seen_less && seen_greater {
                return None; // incomparable
            }
        }
        Some(match (seen_less, seen_greater) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => Ordering::Equal,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_display() {
        assert_eq!(format!("{}", hbclock![2, 0, 1]), "<2 0 1>");

        // Notably equal clocks don't necessarily display the same.
        assert_eq!(format!("{}", hbclock![]), "<>");
        assert_eq!(format!("{}", hbclock![0]), "<0>");
    }

    #[test]
    fn can_equate() {
        assert_eq!(hbclock![], hbclock![]);
        assert_eq!(hbclock![0, 0], hbclock![]);
        assert_eq!(hbclock![1, 0], hbclock![1]);

        assert_ne!(hbclock![], hbclock![0, 1]);
        assert_ne!(hbclock![2], hbclock![1]);
    }

    #[test]
    fn can_hash() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(clock: &HbClock) -> u64 {
            let mut hasher = DefaultHasher::new();
            clock.hash(&mut hasher);
            hasher.finish()
        }

        // same hash if equal
        assert_eq!(hash_of(&hbclock![]), hash_of(&hbclock![0, 0]));
        assert_eq!(hash_of(&hbclock![1]), hash_of(&hbclock![1, 0]));

        // otherwise hash varies w/ high probability
        assert_ne!(hash_of(&hbclock![]), hash_of(&hbclock![1]));
        assert_ne!(hash_of(&hbclock![0, 1]), hash_of(&hbclock![1, 0]));
    }

    #[test]
    fn can_record_and_merge() {
        let mut clock = hbclock![];
        clock.record(2);
        clock.record(0);
        clock.record(2);
        assert_eq!(clock, hbclock![1, 0, 2]);

        clock.merge_in(&hbclock![0, 3, 1, 1]);
        assert_eq!(clock, hbclock![1, 3, 2, 1]);

        clock.reset();
        assert_eq!(clock, hbclock![]);
    }

    #[test]
    fn can_order_partially() {
        use Ordering::*;

        assert_eq!(Some(Equal), hbclock![].partial_cmp(&hbclock![0, 0]));
        assert_eq!(Some(Less), hbclock![1, 2].partial_cmp(&hbclock![1, 3]));
        assert_eq!(Some(Greater), hbclock![2, 1].partial_cmp(&hbclock![2]));
        assert_eq!(None, hbclock![1, 0].partial_cmp(&hbclock![0, 1]));
    }

    #[test]
    fn permits_respects_completed_counts() {
        // No constraints.
        assert!(hbclock![].permits(&[0, 0], 0));

        // Thread 1's operation requires two completed operations of thread 0.
        assert!(hbclock![2, 0].permits(&[2, 0], 1));
        assert!(hbclock![2, 0].permits(&[3, 1], 1));
        assert!(!hbclock![2, 0].permits(&[1, 5], 1));

        // The own-thread entry is ignored.
        assert!(hbclock![9, 1].permits(&[0, 1], 0));

        // Entries beyond the executed slice are only satisfied at zero.
        assert!(hbclock![0, 0, 1].permits(&[0, 0, 1], 1));
        assert!(!hbclock![0, 0, 1].permits(&[0, 0], 1));
    }
}
