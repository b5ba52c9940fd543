use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::step::WorkflowStep;
use crate::models::{Category, ProgressData, Requirements, ServiceRequest};

/// Point-in-time snapshot of a workflow run.
///
/// The runner never mutates a published snapshot: each transition builds a new value
/// and swaps it in, so references handed to callbacks stay consistent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub step: WorkflowStep,
    pub sr_uuid: Option<Uuid>,
    pub taxonomy: Option<Vec<Category>>,
    /// Latest service request snapshot (with sides once requirements were fetched)
    pub service_request: Option<ServiceRequest>,
    pub requirements: Option<Requirements>,
    pub progress: Option<ProgressData>,
    /// Sides uploaded during this run
    pub uploaded_sides: Vec<Uuid>,
    pub completed: bool,
    pub errors: Vec<String>,
}

impl WorkflowState {
    pub fn step_number(&self) -> u8 {
        self.step.number()
    }

    pub fn step_name(&self) -> &'static str {
        self.step.name()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Result of a single step, passed to `on_step_complete`
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutput {
    Taxonomy(Vec<Category>),
    ServiceRequestCreated(ServiceRequest),
    Requirements(ServiceRequest),
    /// Side UUIDs uploaded by this step
    ImagesUploaded(Vec<Uuid>),
    Progress(ProgressData),
    Submitted(ServiceRequest),
}

/// Flags for full runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowOptions {
    pub skip_taxonomy: bool,
    pub skip_submit: bool,
}

impl WorkflowOptions {
    pub fn skips(&self, step: WorkflowStep) -> bool {
        match step {
            WorkflowStep::GetTaxonomy => self.skip_taxonomy,
            WorkflowStep::Submit => self.skip_submit,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = WorkflowState::default();
        assert_eq!(state.step_number(), 0);
        assert_eq!(state.step_name(), "Not Started");
        assert!(!state.completed);
        assert!(!state.has_errors());
    }

    #[test]
    fn test_only_optional_steps_are_skippable() {
        let options = WorkflowOptions {
            skip_taxonomy: true,
            skip_submit: true,
        };
        assert!(options.skips(WorkflowStep::GetTaxonomy));
        assert!(options.skips(WorkflowStep::Submit));
        assert!(!options.skips(WorkflowStep::UploadImages));
        assert!(!WorkflowOptions::default().skips(WorkflowStep::Submit));
    }
}
