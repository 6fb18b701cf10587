//! Bookkeeping for multi-step writes that span documents.
//!
//! The store only guarantees atomicity per document, so an operation that
//! writes twice can stop halfway. No step here has a compensating action:
//! each [`Step`] names the residue a failure leaves behind, and reads are
//! built to tolerate it (see [`super::populate`]).

use std::future::Future;

use log::warn;

use crate::errors::GraphError;

/// One write of a multi-step operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub name: &'static str,
    /// State left behind if this step fails after earlier steps were applied.
    pub residue: &'static str,
}

impl Step {
    pub const fn new(name: &'static str, residue: &'static str) -> Self {
        Self { name, residue }
    }
}

/// Tracks which steps of one operation have been applied.
#[derive(Debug)]
pub struct Saga {
    operation: &'static str,
    applied: Vec<&'static str>,
}

impl Saga {
    pub fn begin(operation: &'static str) -> Self {
        Self {
            operation,
            applied: Vec::new(),
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Names of the steps applied so far, in order.
    pub fn applied(&self) -> &[&'static str] {
        &self.applied
    }

    /// Runs `step`. On failure the error is returned as is; if earlier steps
    /// already wrote, the residue is logged and nothing is undone.
    pub async fn run<T, E, F>(&mut self, step: Step, action: F) -> Result<T, GraphError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<GraphError>,
    {
        match action.await {
            Ok(value) => {
                self.applied.push(step.name);
                Ok(value)
            }
            Err(err) => {
                let err = err.into();
                if !self.applied.is_empty() {
                    warn!(
                        "{}: step '{}' failed after [{}] were applied; left behind: {} ({err})",
                        self.operation,
                        step.name,
                        self.applied.join(", "),
                        step.residue,
                    );
                }
                Err(err)
            }
        }
    }
}
