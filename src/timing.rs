//! Per-actor durations.
use crate::EvalConfig;
use dfeval_ir::{ActorKind, Context, Id};
use dfeval_utils::{Error, EvalResult};
use itertools::Itertools;
use std::collections::{HashMap, HashSet};

/// Execution times of atomic actors, by actor name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingTable {
    timings: HashMap<Id, f64>,
}

impl TimingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration of the actors named `actor`. Returns the previous
    /// entry.
    pub fn insert<S: Into<Id>>(
        &mut self,
        actor: S,
        duration: f64,
    ) -> Option<f64> {
        self.timings.insert(actor.into(), duration)
    }

    pub fn get<S: Into<Id>>(&self, actor: S) -> Option<f64> {
        self.timings.get(&actor.into()).copied()
    }

    pub fn len(&self) -> usize {
        self.timings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    /// Write a duration into every actor of every graph of `ctx`:
    /// * atomic actors get their table entry, or `config.default_timing`;
    /// * hierarchical actors get `config.hierarchical_timing`;
    /// * interfaces get `config.interface_timing`.
    pub fn apply(
        &self,
        ctx: &mut Context,
        config: &EvalConfig,
    ) -> EvalResult<()> {
        for (name, duration) in
            self.timings.iter().sorted_by_key(|(n, _)| **n)
        {
            if !duration.is_finite() || *duration < 0.0 {
                return Err(Error::malformed(format!(
                    "timing of actor `{name}' is {duration}, it must be finite and non-negative"
                )));
            }
        }
        let mut used = HashSet::new();
        let mut defaulted = 0;
        for graph in ctx.graphs_mut() {
            for actor in graph.actors_mut() {
                actor.duration = match actor.kind {
                    ActorKind::Atomic => match self.timings.get(&actor.name) {
                        Some(d) => {
                            used.insert(actor.name);
                            *d
                        }
                        None => {
                            defaulted += 1;
                            config.default_timing
                        }
                    },
                    ActorKind::Hierarchical(_) => config.hierarchical_timing,
                    ActorKind::Interface(_) => config.interface_timing,
                };
            }
        }
        if defaulted > 0 {
            log::debug!(
                "{defaulted} atomic actors use the default timing {}",
                config.default_timing
            );
        }
        let unused = self
            .timings
            .keys()
            .filter(|name| !used.contains(*name))
            .sorted()
            .collect_vec();
        if !unused.is_empty() {
            log::warn!(
                "timing entries do not match any atomic actor: {}",
                unused.iter().join(", ")
            );
        }
        Ok(())
    }
}

impl<S: Into<Id>> FromIterator<(S, f64)> for TimingTable {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        TimingTable {
            timings: iter.into_iter().map(|(n, d)| (n.into(), d)).collect(),
        }
    }
}
