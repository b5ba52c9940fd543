//! # Service Request Workflow
//!
//! A resumable six-step state machine over [`LegitmarkApi`](crate::client::LegitmarkApi):
//!
//! 1. Get Taxonomy (optional)
//! 2. Create SR
//! 3. Get Requirements
//! 4. Upload Images
//! 5. Check Progress
//! 6. Submit (optional)
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use legitmark::models::{CreateServiceRequest, ImageData, ItemDescriptor, Side, SideGroup};
//! use legitmark::workflow::{ImageProvider, WorkflowOptions, WorkflowRunner};
//! use legitmark::{LegitmarkClient, LegitmarkConfig};
//!
//! struct Photos;
//!
//! #[async_trait::async_trait]
//! impl ImageProvider for Photos {
//!     async fn image_for_side(
//!         &self,
//!         side: &Side,
//!         _group: &SideGroup,
//!     ) -> legitmark::Result<Option<ImageData>> {
//!         let path = format!("photos/{}.jpg", side.name);
//!         Ok(std::fs::read(path).ok().map(ImageData::jpeg))
//!     }
//! }
//!
//! # async fn example(request: CreateServiceRequest) -> legitmark::Result<()> {
//! let client = LegitmarkClient::new(LegitmarkConfig::from_env()?)?;
//! let mut runner = WorkflowRunner::new(client).with_image_provider(Arc::new(Photos));
//! let state = runner.run(&request, WorkflowOptions::default()).await?;
//! assert!(state.completed);
//! # Ok(())
//! # }
//! ```

mod callbacks;
mod runner;
mod state;
mod step;

pub use callbacks::{ImageProvider, NoopCallbacks, WorkflowCallbacks};
pub use runner::WorkflowRunner;
pub use state::{StepOutput, WorkflowOptions, WorkflowState};
pub use step::WorkflowStep;
