//! Synchronization orchestrator
//!
//! One run is one sequential pass over one trigger event. Designated
//! best-effort steps are caught, logged, and recorded in a [`SyncReport`]
//! instead of aborting the run; critical steps propagate and end it. No step
//! is ever rolled back — the design accepts eventual consistency between the
//! two services.

pub mod annotate;
pub mod release;

#[cfg(test)]
mod tests;

/// Outcome of one task or one best-effort step within a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The target was updated
    Updated {
        /// Task identifier or step name
        target: String,
    },
    /// No reference found; nothing to do
    Skipped,
    /// The operation failed and was isolated
    Failed {
        /// Task identifier or step name
        target: String,
        /// Rendered failure cause
        reason: String,
    },
}

/// Accumulated outcomes of one run
///
/// Exists only for the run's duration; the CLI layer turns it into an exit
/// signal according to each mode's policy.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Per-task / per-step outcomes, in execution order
    pub outcomes: Vec<Outcome>,
}

impl SyncReport {
    fn record_updated(&mut self, target: impl Into<String>) {
        self.outcomes.push(Outcome::Updated {
            target: target.into(),
        });
    }

    fn record_skipped(&mut self) {
        self.outcomes.push(Outcome::Skipped);
    }

    fn record_failed(&mut self, target: impl Into<String>, reason: impl ToString) {
        self.outcomes.push(Outcome::Failed {
            target: target.into(),
            reason: reason.to_string(),
        });
    }

    /// Targets of all failed outcomes
    #[must_use]
    pub fn failed_targets(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                Outcome::Failed { target, .. } => Some(target.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether any outcome failed
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed_targets().is_empty()
    }
}
