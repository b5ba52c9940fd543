//! Callback and image-provider doubles that record what the runner did

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;

use legitmark::error::{LegitmarkError, Result};
use legitmark::models::{ImageData, Side, SideGroup};
use legitmark::workflow::{ImageProvider, StepOutput, WorkflowCallbacks, WorkflowState, WorkflowStep};

/// Appends one line per hook invocation, e.g. `start:3`, `complete:3`, `error:6`,
/// `progress:1/2:Front`
#[derive(Debug, Default)]
pub struct RecordingCallbacks {
    pub events: Mutex<Vec<String>>,
    /// Step number visible in the state passed to each `on_step_start`
    pub start_states: Mutex<Vec<u8>>,
}

impl RecordingCallbacks {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl WorkflowCallbacks for RecordingCallbacks {
    async fn on_step_start(&self, step: WorkflowStep, state: &WorkflowState) {
        // yield so ordering only holds if the runner awaits the hook
        tokio::task::yield_now().await;
        self.start_states.lock().push(state.step_number());
        self.events.lock().push(format!("start:{}", step.number()));
    }

    async fn on_step_complete(&self, step: WorkflowStep, output: &StepOutput, _state: &WorkflowState) {
        tokio::task::yield_now().await;
        let detail = match output {
            StepOutput::ImagesUploaded(sides) => format!(":{}", sides.len()),
            _ => String::new(),
        };
        self.events
            .lock()
            .push(format!("complete:{}{}", step.number(), detail));
    }

    async fn on_step_error(&self, step: WorkflowStep, error: &LegitmarkError, _state: &WorkflowState) {
        self.events
            .lock()
            .push(format!("error:{}:{}", step.number(), error.kind()));
    }

    async fn on_upload_progress(&self, uploaded: usize, total: usize, side: &Side) {
        self.events
            .lock()
            .push(format!("progress:{uploaded}/{total}:{}", side.name));
    }
}

/// Returns a small JPEG for every side except the ones listed in `skip`
#[derive(Debug, Default)]
pub struct FixtureImages {
    skip: HashSet<String>,
    /// `(side name, synthetic group name)` per request
    pub requested: Mutex<Vec<(String, String)>>,
}

impl FixtureImages {
    pub fn skipping(sides: &[&str]) -> Self {
        Self {
            skip: sides.iter().map(|s| s.to_string()).collect(),
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ImageProvider for FixtureImages {
    async fn image_for_side(&self, side: &Side, group: &SideGroup) -> Result<Option<ImageData>> {
        self.requested
            .lock()
            .push((side.name.clone(), group.name.clone()));
        if self.skip.contains(&side.name) {
            return Ok(None);
        }
        Ok(Some(ImageData::jpeg(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])))
    }
}
