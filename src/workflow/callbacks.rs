use async_trait::async_trait;

use super::state::{StepOutput, WorkflowState};
use super::step::WorkflowStep;
use crate::error::{LegitmarkError, Result};
use crate::models::{ImageData, Side, SideGroup};

/// Lifecycle hooks awaited by the runner between steps.
///
/// Every method defaults to a no-op. The runner does not start the next step (or
/// the step body) until the hook returns.
#[async_trait]
pub trait WorkflowCallbacks: Send + Sync {
    async fn on_step_start(&self, _step: WorkflowStep, _state: &WorkflowState) {}

    async fn on_step_complete(
        &self,
        _step: WorkflowStep,
        _output: &StepOutput,
        _state: &WorkflowState,
    ) {
    }

    async fn on_step_error(
        &self,
        _step: WorkflowStep,
        _error: &LegitmarkError,
        _state: &WorkflowState,
    ) {
    }

    /// Called before each required side is requested from the [`ImageProvider`]
    async fn on_upload_progress(&self, _uploaded: usize, _total: usize, _side: &Side) {}
}

/// Hooks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallbacks;

impl WorkflowCallbacks for NoopCallbacks {}

/// Supplies image bytes for each required side during the upload step
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// `Ok(None)` skips the side without recording it as uploaded
    async fn image_for_side(&self, side: &Side, group: &SideGroup) -> Result<Option<ImageData>>;
}
