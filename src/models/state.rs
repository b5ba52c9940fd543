use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Two-part state codes travel as upper-case strings. Values this client does not
/// know yet decode into `Other` instead of failing.
macro_rules! state_code_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $code:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// Code not recognized by this client version
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $code,)+
                    Self::Other(code) => code.as_str(),
                }
            }
        }

        impl From<&str> for $name {
            fn from(code: &str) -> Self {
                match code {
                    $($code => Self::$variant,)+
                    other => Self::Other(other.to_string()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let code = String::deserialize(deserializer)?;
                Ok(Self::from(code.as_str()))
            }
        }
    };
}

state_code_enum! {
    /// Workflow stage of a service request
    PrimaryState {
        /// Created, images may still be uploaded
        Draft => "DRAFT",
        /// Submitted, awaiting quality control of the photos
        Qc => "QC",
        Queue => "QUEUE",
        /// An authenticator is working on it
        Underway => "UNDERWAY",
        Complete => "COMPLETE",
        Cancelled => "CANCELLED",
    }
}

state_code_enum! {
    /// Sub-status qualifying the primary state
    SupplementState {
        Pending => "PENDING",
        Rejected => "REJECTED",
        Assigned => "ASSIGNED",
        Approved => "APPROVED",
        Complete => "COMPLETE",
    }
}

/// Primary/supplement state pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrState {
    pub primary: PrimaryState,
    #[serde(default)]
    pub supplement: Option<SupplementState>,
}

impl SrState {
    pub fn new(primary: PrimaryState, supplement: Option<SupplementState>) -> Self {
        Self {
            primary,
            supplement,
        }
    }

    /// Whether the pair follows the observed API rule: no supplement exactly when
    /// the request is still a draft. Informational only; never enforced.
    pub fn is_consistent(&self) -> bool {
        match (&self.primary, &self.supplement) {
            (PrimaryState::Draft, None) => true,
            (PrimaryState::Draft, Some(_)) => false,
            (_, None) => false,
            (_, Some(SupplementState::Other(_))) => false,
            (_, Some(_)) => true,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.primary == PrimaryState::Draft
    }

    /// Completed or cancelled; no further transitions happen server-side
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.primary,
            PrimaryState::Complete | PrimaryState::Cancelled
        )
    }
}

impl fmt::Display for SrState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.supplement {
            Some(supplement) => write!(f, "{}/{}", self.primary, supplement),
            None => write!(f, "{}", self.primary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_codes_parse() {
        assert_eq!(PrimaryState::from("UNDERWAY"), PrimaryState::Underway);
        assert_eq!(SupplementState::from("APPROVED"), SupplementState::Approved);
        assert_eq!(
            PrimaryState::from("ARCHIVED"),
            PrimaryState::Other("ARCHIVED".to_string())
        );
    }

    #[test]
    fn test_state_serde() {
        let state: SrState =
            serde_json::from_str(r#"{"primary":"COMPLETE","supplement":"APPROVED"}"#).unwrap();
        assert_eq!(state.primary, PrimaryState::Complete);
        assert_eq!(state.supplement, Some(SupplementState::Approved));
        assert_eq!(
            serde_json::to_string(&state).unwrap(),
            r#"{"primary":"COMPLETE","supplement":"APPROVED"}"#
        );
    }

    #[test]
    fn test_draft_supplement_invariant() {
        assert!(SrState::new(PrimaryState::Draft, None).is_consistent());
        assert!(!SrState::new(PrimaryState::Draft, Some(SupplementState::Pending)).is_consistent());
        assert!(!SrState::new(PrimaryState::Qc, None).is_consistent());
        assert!(SrState::new(PrimaryState::Qc, Some(SupplementState::Pending)).is_consistent());
    }

    #[test]
    fn test_display() {
        let state = SrState::new(PrimaryState::Complete, Some(SupplementState::Rejected));
        assert_eq!(state.to_string(), "COMPLETE/REJECTED");
        assert!(state.is_terminal());
    }
}
