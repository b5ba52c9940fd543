//! Domain types exchanged with the Legitmark API.
//!
//! Response types ignore unknown fields so server-side additions never break
//! decoding.

pub mod image;
pub mod progress;
pub mod service_request;
pub mod side;
pub mod state;
pub mod taxonomy;

pub use image::ImageData;
pub use progress::ProgressData;
pub use service_request::{CreateServiceRequest, IncludeOptions, ItemDescriptor, ServiceRequest};
pub use side::{Requirements, Side, SideGroup, SideMedia};
pub use state::{PrimaryState, SrState, SupplementState};
pub use taxonomy::{Brand, Category, ItemType};
