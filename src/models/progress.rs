use serde::{Deserialize, Serialize};

use super::side::Side;

/// Upload progress snapshot for a service request.
///
/// `met` is the only gate for submission eligibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressData {
    pub current_required: usize,
    pub total_required: usize,
    pub current_optional: usize,
    pub total_optional: usize,
    pub met: bool,
}

impl ProgressData {
    /// Derive counts from a sides listing; a side counts as uploaded once it has media
    pub fn from_sides(sides: &[Side]) -> Self {
        let (required, optional): (Vec<&Side>, Vec<&Side>) =
            sides.iter().partition(|side| side.required);

        let current_required = required.iter().filter(|side| side.has_media()).count();
        let current_optional = optional.iter().filter(|side| side.has_media()).count();

        Self {
            current_required,
            total_required: required.len(),
            current_optional,
            total_optional: optional.len(),
            met: current_required == required.len(),
        }
    }

    pub fn missing_required(&self) -> usize {
        self.total_required.saturating_sub(self.current_required)
    }
}
