use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::callbacks::{ImageProvider, NoopCallbacks, WorkflowCallbacks};
use super::state::{StepOutput, WorkflowOptions, WorkflowState};
use super::step::WorkflowStep;
use crate::client::LegitmarkApi;
use crate::error::{LegitmarkError, Result};
use crate::models::{
    Category, CreateServiceRequest, IncludeOptions, ProgressData, ServiceRequest, SideGroup,
};

/// Drives a service request through the six workflow steps.
///
/// Steps can run one at a time (wizard screens) or in sequence through [`run`] and
/// [`run_from`]. A runner holds the state of a single workflow; use one instance per
/// concurrent workflow.
///
/// [`run`]: WorkflowRunner::run
/// [`run_from`]: WorkflowRunner::run_from
pub struct WorkflowRunner<A: LegitmarkApi> {
    api: A,
    callbacks: Arc<dyn WorkflowCallbacks>,
    images: Option<Arc<dyn ImageProvider>>,
    state: WorkflowState,
}

impl<A: LegitmarkApi> std::fmt::Debug for WorkflowRunner<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowRunner")
            .field("state", &self.state)
            .field("has_image_provider", &self.images.is_some())
            .finish()
    }
}

impl<A: LegitmarkApi> WorkflowRunner<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            callbacks: Arc::new(NoopCallbacks),
            images: None,
            state: WorkflowState::default(),
        }
    }

    pub fn with_callbacks(mut self, callbacks: Arc<dyn WorkflowCallbacks>) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn with_image_provider(mut self, images: Arc<dyn ImageProvider>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Current snapshot
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Attach an existing service request so later steps can run without step 2
    pub fn set_sr_uuid(&mut self, sr_uuid: Uuid) {
        self.transition(|s| WorkflowState {
            sr_uuid: Some(sr_uuid),
            ..s.clone()
        });
    }

    /// Back to step 0 with nothing cached
    pub fn reset(&mut self) {
        self.state = WorkflowState::default();
    }

    fn transition(&mut self, next: impl FnOnce(&WorkflowState) -> WorkflowState) {
        self.state = next(&self.state);
    }

    async fn begin(&mut self, step: WorkflowStep) {
        self.transition(|s| WorkflowState {
            step,
            ..s.clone()
        });
        debug!(step = step.number(), step_name = step.name(), "Workflow step starting");
        self.callbacks.on_step_start(step, &self.state).await;
    }

    async fn finish<T>(
        &mut self,
        step: WorkflowStep,
        result: Result<T>,
        output: impl FnOnce(&T) -> StepOutput,
    ) -> Result<T> {
        match result {
            Ok(value) => {
                let output = output(&value);
                debug!(step = step.number(), step_name = step.name(), "Workflow step complete");
                self.callbacks
                    .on_step_complete(step, &output, &self.state)
                    .await;
                Ok(value)
            }
            Err(err) => {
                self.transition(|s| {
                    let mut errors = s.errors.clone();
                    errors.push(err.to_string());
                    WorkflowState {
                        errors,
                        ..s.clone()
                    }
                });
                error!(
                    step = step.number(),
                    step_name = step.name(),
                    kind = %err.kind(),
                    retryable = err.is_retryable(),
                    error = %err.message(),
                    "Workflow step failed"
                );
                self.callbacks.on_step_error(step, &err, &self.state).await;
                Err(err)
            }
        }
    }

    fn require_sr_uuid(&self, step: WorkflowStep) -> Result<Uuid> {
        self.state.sr_uuid.ok_or_else(|| {
            LegitmarkError::workflow(format!(
                "No service request available for step {}",
                step.number()
            ))
            .with_suggestions([
                "Run step 2 (create_service_request) first",
                "Or call set_sr_uuid with an existing service request",
            ])
        })
    }

    /// Step 1
    pub async fn get_taxonomy(&mut self) -> Result<Vec<Category>> {
        let step = WorkflowStep::GetTaxonomy;
        self.begin(step).await;

        let result = self.api.get_taxonomy_tree(true).await;
        if let Ok(categories) = &result {
            self.transition(|s| WorkflowState {
                taxonomy: Some(categories.clone()),
                ..s.clone()
            });
        }
        self.finish(step, result, |c| StepOutput::Taxonomy(c.clone()))
            .await
    }

    /// Step 2
    pub async fn create_service_request(
        &mut self,
        request: &CreateServiceRequest,
    ) -> Result<ServiceRequest> {
        let step = WorkflowStep::CreateServiceRequest;
        self.begin(step).await;

        let result = self.api.create_service_request(request).await;
        if let Ok(sr) = &result {
            self.transition(|s| WorkflowState {
                sr_uuid: Some(sr.uuid),
                service_request: Some(sr.clone()),
                ..s.clone()
            });
        }
        self.finish(step, result, |sr| {
            StepOutput::ServiceRequestCreated(sr.clone())
        })
        .await
    }

    /// Step 3
    pub async fn get_requirements(&mut self) -> Result<ServiceRequest> {
        let step = WorkflowStep::GetRequirements;
        self.begin(step).await;

        let result = match self.require_sr_uuid(step) {
            Ok(sr_uuid) => self.api.get_service_request(sr_uuid, IncludeOptions::all()).await,
            Err(err) => Err(err),
        };
        if let Ok(sr) = &result {
            let requirements = sr.requirements.clone().unwrap_or_default();
            self.transition(|s| WorkflowState {
                requirements: Some(requirements),
                service_request: Some(sr.clone()),
                ..s.clone()
            });
        }
        self.finish(step, result, |sr| StepOutput::Requirements(sr.clone()))
            .await
    }

    /// Step 4: upload every required side, one at a time, in server order.
    ///
    /// Sides come from the cached service request snapshot. Each side reaches the
    /// image provider wrapped in a single-side group built from its own group fields.
    pub async fn upload_images(&mut self) -> Result<Vec<Uuid>> {
        let step = WorkflowStep::UploadImages;
        self.begin(step).await;

        let result = self.upload_required_sides().await;
        self.finish(step, result, |uploaded| {
            StepOutput::ImagesUploaded(uploaded.clone())
        })
        .await
    }

    async fn upload_required_sides(&mut self) -> Result<Vec<Uuid>> {
        let sr_uuid = self.require_sr_uuid(WorkflowStep::UploadImages)?;
        if self.state.requirements.is_none() {
            return Err(LegitmarkError::workflow("Requirements have not been fetched")
                .with_suggestion("Run step 3 (get_requirements) first"));
        }
        let images = self.images.clone().ok_or_else(|| {
            LegitmarkError::workflow("No image provider configured for the upload step")
                .with_suggestion("Attach one with WorkflowRunner::with_image_provider")
        })?;

        let sides: Vec<_> = self
            .state
            .service_request
            .as_ref()
            .map(|sr| sr.required_sides().into_iter().cloned().collect())
            .unwrap_or_default();
        let total = sides.len();
        let mut uploaded = Vec::new();

        for side in &sides {
            self.callbacks
                .on_upload_progress(uploaded.len(), total, side)
                .await;

            let group = SideGroup::synthetic_for(side);
            match images.image_for_side(side, &group).await? {
                Some(image) => {
                    self.api.upload_image(sr_uuid, side.uuid, image).await?;
                    uploaded.push(side.uuid);
                    self.transition(|s| {
                        let mut uploaded_sides = s.uploaded_sides.clone();
                        uploaded_sides.push(side.uuid);
                        WorkflowState {
                            uploaded_sides,
                            ..s.clone()
                        }
                    });
                }
                None => {
                    debug!(side_uuid = %side.uuid, side = %side.name, "No image supplied; skipping side");
                }
            }
        }

        info!(
            sr_uuid = %sr_uuid,
            uploaded = uploaded.len(),
            required = total,
            "Uploaded side images"
        );
        Ok(uploaded)
    }

    /// Step 5
    pub async fn check_progress(&mut self) -> Result<ProgressData> {
        let step = WorkflowStep::CheckProgress;
        self.begin(step).await;

        let result = match self.require_sr_uuid(step) {
            Ok(sr_uuid) => self.api.get_progress(sr_uuid).await,
            Err(err) => Err(err),
        };
        if let Ok(progress) = &result {
            self.transition(|s| WorkflowState {
                progress: Some(*progress),
                ..s.clone()
            });
        }
        self.finish(step, result, |p| StepOutput::Progress(*p)).await
    }

    /// Step 6.
    ///
    /// Gated on the cached progress from step 5; progress is not re-fetched here.
    pub async fn submit(&mut self) -> Result<ServiceRequest> {
        let step = WorkflowStep::Submit;
        self.begin(step).await;

        let result = match self.submit_precondition() {
            Ok(sr_uuid) => self.api.submit_service_request(sr_uuid).await,
            Err(err) => Err(err),
        };
        if let Ok(sr) = &result {
            self.transition(|s| WorkflowState {
                service_request: Some(sr.clone()),
                completed: true,
                ..s.clone()
            });
        }
        self.finish(step, result, |sr| StepOutput::Submitted(sr.clone()))
            .await
    }

    fn submit_precondition(&self) -> Result<Uuid> {
        let sr_uuid = self.require_sr_uuid(WorkflowStep::Submit)?;
        match self.state.progress {
            Some(progress) if !progress.met => Err(LegitmarkError::workflow(format!(
                "Photo requirements not met: {}/{} required sides uploaded",
                progress.current_required, progress.total_required
            ))
            .with_detail("current_required", progress.current_required.into())
            .with_detail("total_required", progress.total_required.into())
            .with_suggestions([
                "Upload the remaining required sides (step 4)",
                "Run step 5 (check_progress) again before submitting",
            ])),
            _ => Ok(sr_uuid),
        }
    }

    /// Run every step in order, stopping at the first failure
    #[instrument(skip(self, request), fields(external_id = ?request.external_id))]
    pub async fn run(
        &mut self,
        request: &CreateServiceRequest,
        options: WorkflowOptions,
    ) -> Result<WorkflowState> {
        self.run_from(WorkflowStep::GetTaxonomy, Some(request), options)
            .await
    }

    /// Resume at `start`. Steps 1 and 2 need `request`; later steps need an SR UUID
    /// already in state (from an earlier step 2 or [`set_sr_uuid`]).
    ///
    /// [`set_sr_uuid`]: WorkflowRunner::set_sr_uuid
    #[instrument(skip(self, request), fields(start = start.number()))]
    pub async fn run_from(
        &mut self,
        start: WorkflowStep,
        request: Option<&CreateServiceRequest>,
        options: WorkflowOptions,
    ) -> Result<WorkflowState> {
        if start == WorkflowStep::NotStarted {
            return Err(LegitmarkError::validation(
                "Workflow can only start from steps 1-6",
            ));
        }
        if start <= WorkflowStep::CreateServiceRequest && request.is_none() {
            return Err(LegitmarkError::workflow(format!(
                "Starting at step {} requires a service request descriptor",
                start.number()
            ))
            .with_suggestion("Pass the CreateServiceRequest, or start from step 3 with set_sr_uuid"));
        }
        if start > WorkflowStep::CreateServiceRequest && self.state.sr_uuid.is_none() {
            return Err(LegitmarkError::workflow(format!(
                "Starting at step {} requires an existing service request",
                start.number()
            ))
            .with_suggestion("Call set_sr_uuid before resuming"));
        }

        info!(start = %start, ?options, "Running workflow");

        for &step in start.remaining() {
            if options.skips(step) {
                debug!(step = step.number(), step_name = step.name(), "Skipping step");
                continue;
            }
            match step {
                WorkflowStep::GetTaxonomy => {
                    self.get_taxonomy().await?;
                }
                WorkflowStep::CreateServiceRequest => {
                    // checked above for every start at or before this step
                    let Some(request) = request else {
                        return Err(LegitmarkError::workflow(
                            "Missing service request descriptor",
                        ));
                    };
                    self.create_service_request(request).await?;
                }
                WorkflowStep::GetRequirements => {
                    self.get_requirements().await?;
                }
                WorkflowStep::UploadImages => {
                    self.upload_images().await?;
                }
                WorkflowStep::CheckProgress => {
                    self.check_progress().await?;
                }
                WorkflowStep::Submit => {
                    self.submit().await?;
                }
                WorkflowStep::NotStarted => {}
            }
        }

        if options.skip_submit {
            warn!(sr_uuid = ?self.state.sr_uuid, "Workflow finished without submitting");
        }
        self.transition(|s| WorkflowState {
            completed: true,
            ..s.clone()
        });
        info!(sr_uuid = ?self.state.sr_uuid, "Workflow complete");
        Ok(self.state.clone())
    }

    /// Like [`run_from`](WorkflowRunner::run_from) with a raw step number; numbers outside
    /// 1-6 are a `VALIDATION_ERROR`
    pub async fn run_from_number(
        &mut self,
        start: u8,
        request: Option<&CreateServiceRequest>,
        options: WorkflowOptions,
    ) -> Result<WorkflowState> {
        let step = WorkflowStep::try_from(start)?;
        self.run_from(step, request, options).await
    }
}
