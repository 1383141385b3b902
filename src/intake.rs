//! Submit → validate → enqueue cycle behind the URL field.

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::queue::IntakeQueue;
use crate::validator::{self, ValidationPolicy};

/// Why a submission was refused. Both kinds leave the session unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("'{input}' is not a valid URL")]
    InvalidUrl { input: String },

    #[error("the queue refused the URL")]
    EnqueueRejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntakeState {
    #[default]
    Idle,
    Validating,
    Accepted,
    Rejected,
}

/// Terminal outcome of one [`IntakeWorkflow::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Accepted(String),
    Rejected(IntakeError),
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Submission::Accepted(_))
    }
}

/// Holds the URL field text and drives it through validation into the queue.
pub struct IntakeWorkflow<P> {
    policy: P,
    input: String,
    state: IntakeState,
    warning: Option<IntakeError>,
}

impl<P: ValidationPolicy> IntakeWorkflow<P> {
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            input: String::new(),
            state: IntakeState::Idle,
            warning: None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Mutable access for the text field widget
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn state(&self) -> IntakeState {
        self.state
    }

    /// Warning from the last rejected submission, cleared on the next accept
    pub fn warning(&self) -> Option<&IntakeError> {
        self.warning.as_ref()
    }

    /// Handles an Add click or Enter in the URL field.
    ///
    /// On acceptance the field is cleared; on rejection it keeps its text and
    /// a warning is recorded. The workflow is back in [`IntakeState::Idle`]
    /// when this returns.
    pub fn submit(&mut self, queue: &mut IntakeQueue) -> Submission {
        self.transition(IntakeState::Validating);

        let outcome = match validator::validate_url(&self.policy, &self.input) {
            None => Err(IntakeError::InvalidUrl {
                input: self.input.clone(),
            }),
            Some(url) if queue.enqueue(&url) => Ok(url),
            Some(_) => Err(IntakeError::EnqueueRejected),
        };

        let submission = match outcome {
            Ok(url) => {
                self.transition(IntakeState::Accepted);
                debug!(%url, "submission accepted");
                self.input.clear();
                self.warning = None;
                Submission::Accepted(url)
            }
            Err(err) => {
                self.transition(IntakeState::Rejected);
                warn!(error = %err, "submission rejected");
                self.warning = Some(err.clone());
                Submission::Rejected(err)
            }
        };

        self.transition(IntakeState::Idle);
        submission
    }

    fn transition(&mut self, next: IntakeState) {
        trace!(from = ?self.state, to = ?next, "intake transition");
        self.state = next;
    }
}
