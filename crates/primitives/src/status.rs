/// Review statuses the service reports for a submission.
///
/// These three keys are the only ones that produce a verdict; any other
/// status string is treated as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    /// A reviewer picked the submission up.
    Reviewing,
    /// The submission passed review.
    Approved,
    /// The reviewer sent the submission back.
    Rejected,
}

impl HomeworkStatus {
    /// Every known status.
    pub const ALL: [Self; 3] = [Self::Reviewing, Self::Approved, Self::Rejected];

    /// Look up a status by its API key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.key() == key)
    }

    /// Key used by the review API.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Reviewing => "reviewing",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the chat.
    pub const fn verdict(self) -> &'static str {
        match self {
            Self::Reviewing => "The work has been taken for review.",
            Self::Approved => "The reviewer liked everything, you can move on to the next lesson.",
            Self::Rejected => "Unfortunately, the reviewer found errors in the work.",
        }
    }
}
