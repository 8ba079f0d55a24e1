//! Compiling path entries into a nondeterministic automaton.

use core::fmt;

use smallvec::SmallVec;

use super::entry::PathEntry;

/// Expecting an object that matches the entry with the same index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct State {
    pub next: SmallVec<[usize; 4]>,
    pub accepting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Automaton {
    pub states: Vec<State>,
    pub starts: Vec<usize>,
}

impl Automaton {
    pub fn compile(entries: &[PathEntry<'_>]) -> Self {
        let n = entries.len();
        let mut states = Vec::with_capacity(n);

        for (i, entry) in entries.iter().enumerate() {
            let mut state = State {
                next: SmallVec::new(),
                accepting: false,
            };
            if i + 1 < n {
                state.next.push(i + 1);
            } else {
                state.accepting = true;
            }
            if entry.mode.repeats() {
                state.next.push(i);
            }
            // Jump past every immediately following skippable entry.
            for (j, later) in entries.iter().enumerate().skip(i + 1) {
                if !later.mode.skippable() {
                    break;
                }
                if j + 1 < n {
                    state.next.push(j + 1);
                } else {
                    state.accepting = true;
                }
            }
            states.push(state);
        }

        let mut starts = Vec::new();
        if n > 0 {
            starts.push(0);
        }
        for (j, entry) in entries.iter().enumerate() {
            if !entry.mode.skippable() {
                break;
            }
            // Skipping everything would accept vacuously.
            if j + 1 < n {
                starts.push(j + 1);
            }
        }

        Automaton { states, starts }
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, state) in self.states.iter().enumerate() {
            write!(f, "state {} ->", i)?;
            for next in &state.next {
                write!(f, " {}", next)?;
            }
            if state.accepting {
                write!(f, " ACCEPT")?;
            }
            writeln!(f)?;
        }
        write!(f, "start:")?;
        for start in &self.starts {
            write!(f, " {}", start)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::path::entry::{MatchMode, Matcher};

    fn entries(modes: &[MatchMode]) -> Vec<PathEntry<'static>> {
        modes
            .iter()
            .map(|&mode| PathEntry {
                mode,
                matcher: Matcher::Any,
                is_result: false,
            })
            .collect()
    }

    fn next(a: &Automaton, i: usize) -> Vec<usize> {
        a.states[i].next.to_vec()
    }

    #[test]
    fn test_fixed_path() {
        use MatchMode::*;
        let a = Automaton::compile(&entries(&[One, One, One]));
        assert_eq!(next(&a, 0), vec![1]);
        assert_eq!(next(&a, 1), vec![2]);
        assert!(next(&a, 2).is_empty());
        assert!(a.states[2].accepting);
        assert!(!a.states[1].accepting);
        assert_eq!(a.starts, vec![0]);
    }

    #[test]
    fn test_star_in_the_middle() {
        use MatchMode::*;
        let a = Automaton::compile(&entries(&[One, Star, One]));
        assert_eq!(next(&a, 0), vec![1, 2]);
        assert_eq!(next(&a, 1), vec![2, 1]);
        assert!(a.states[2].accepting);
        assert!(!a.states[0].accepting);
    }

    #[test]
    fn test_trailing_skippable_accepts_early() {
        use MatchMode::*;
        let a = Automaton::compile(&entries(&[One, Plus, Optional]));
        assert_eq!(next(&a, 0), vec![1]);
        assert_eq!(next(&a, 1), vec![2, 1]);
        assert!(a.states[1].accepting);
        assert!(a.states[2].accepting);
    }

    #[test]
    fn test_leading_skippable_adds_starts() {
        use MatchMode::*;
        let a = Automaton::compile(&entries(&[Optional, Star, One]));
        assert_eq!(a.starts, vec![0, 1, 2]);

        let all_optional = Automaton::compile(&entries(&[Star, Optional]));
        assert_eq!(all_optional.starts, vec![0, 1]);
    }
}
