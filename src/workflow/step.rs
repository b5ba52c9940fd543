use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LegitmarkError;

/// Steps of the service-request workflow, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum WorkflowStep {
    /// Initial state before any step ran
    NotStarted = 0,
    GetTaxonomy = 1,
    CreateServiceRequest = 2,
    GetRequirements = 3,
    UploadImages = 4,
    CheckProgress = 5,
    Submit = 6,
}

impl WorkflowStep {
    /// Dispatch table; `run_from` iterates it starting at the requested step
    pub const ALL: [WorkflowStep; 6] = [
        Self::GetTaxonomy,
        Self::CreateServiceRequest,
        Self::GetRequirements,
        Self::UploadImages,
        Self::CheckProgress,
        Self::Submit,
    ];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::GetTaxonomy => "Get Taxonomy",
            Self::CreateServiceRequest => "Create SR",
            Self::GetRequirements => "Get Requirements",
            Self::UploadImages => "Upload Images",
            Self::CheckProgress => "Check Progress",
            Self::Submit => "Submit",
        }
    }

    /// Steps a run may skip through options
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::GetTaxonomy | Self::Submit)
    }

    /// Steps from `self` (inclusive) to the end of the table
    pub fn remaining(&self) -> &'static [WorkflowStep] {
        let start = usize::from(self.number().max(1)) - 1;
        &Self::ALL[start..]
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.number())
    }
}

impl TryFrom<u8> for WorkflowStep {
    type Error = LegitmarkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NotStarted),
            1 => Ok(Self::GetTaxonomy),
            2 => Ok(Self::CreateServiceRequest),
            3 => Ok(Self::GetRequirements),
            4 => Ok(Self::UploadImages),
            5 => Ok(Self::CheckProgress),
            6 => Ok(Self::Submit),
            other => Err(LegitmarkError::validation(format!(
                "Invalid workflow step {other}; expected 1-6"
            ))),
        }
    }
}

impl Default for WorkflowStep {
    fn default() -> Self {
        Self::NotStarted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_match_table_positions() {
        for (index, step) in WorkflowStep::ALL.iter().enumerate() {
            assert_eq!(usize::from(step.number()), index + 1);
            assert_eq!(WorkflowStep::try_from(step.number()).unwrap(), *step);
        }
    }

    #[test]
    fn test_remaining_slices_table() {
        assert_eq!(
            WorkflowStep::GetRequirements.remaining(),
            &[
                WorkflowStep::GetRequirements,
                WorkflowStep::UploadImages,
                WorkflowStep::CheckProgress,
                WorkflowStep::Submit
            ]
        );
        assert_eq!(WorkflowStep::NotStarted.remaining().len(), 6);
        assert_eq!(WorkflowStep::Submit.remaining(), &[WorkflowStep::Submit]);
    }

    #[test]
    fn test_out_of_range_step_is_rejected() {
        assert!(WorkflowStep::try_from(7).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(WorkflowStep::UploadImages.to_string(), "Upload Images (4)");
        assert_eq!(WorkflowStep::default().name(), "Not Started");
    }
}
