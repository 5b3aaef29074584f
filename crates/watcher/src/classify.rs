use std::fmt;

use primitives::{HomeworkRecord, HomeworkStatus};

/// Sent when a record is missing its name or status.
pub const SERVER_ERROR_MESSAGE: &str = "Server communication error.";

/// Sent when the status is not one of the known review statuses.
pub const UNKNOWN_STATUS_MESSAGE: &str = "Unknown homework status.";

/// Why a record could not be turned into a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// `homework_name` or `status` was absent.
    MissingField {
        /// Name as received
        name: Option<String>,
        /// Status as received
        status: Option<String>,
    },
    /// Status key outside the known catalog.
    UnknownStatus {
        /// Submission name
        name: String,
        /// Unrecognized status key
        status: String,
    },
}

impl ClassifyError {
    /// Notification text to send in place of a verdict.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => SERVER_ERROR_MESSAGE,
            Self::UnknownStatus { .. } => UNKNOWN_STATUS_MESSAGE,
        }
    }
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { name, status } => {
                write!(f, "incomplete homework record (name: {:?}, status: {:?})", name, status)
            }
            Self::UnknownStatus { name, status } => {
                write!(f, "unknown status {:?} for homework {:?}", status, name)
            }
        }
    }
}

impl std::error::Error for ClassifyError {}

/// Build the notification for a homework record.
pub fn classify(record: &HomeworkRecord) -> Result<String, ClassifyError> {
    let (Some(name), Some(status)) = (&record.name, &record.status) else {
        return Err(ClassifyError::MissingField {
            name: record.name.clone(),
            status: record.status.clone(),
        });
    };

    let Some(known) = HomeworkStatus::from_key(status) else {
        return Err(ClassifyError::UnknownStatus { name: name.clone(), status: status.clone() });
    };

    Ok(format!("Your submission '{}' was reviewed!\n\n{}", name, known.verdict()))
}
