//! Follow-up (StatusTL) and verification (StatusVer) codes.
//!
//! Both are stored as SMALLINT in the legacy numbering. The meaning of each
//! code is inferred from the dispatch and response call sites; see DESIGN.md.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum FollowUpStatus {
    New,
    NotSelected,
    Dispatched,
    SentToVillage,
    Resolved,
    Submitted,
}

impl FollowUpStatus {
    pub const ALL: [FollowUpStatus; 6] = [
        FollowUpStatus::New,
        FollowUpStatus::NotSelected,
        FollowUpStatus::Dispatched,
        FollowUpStatus::SentToVillage,
        FollowUpStatus::Resolved,
        FollowUpStatus::Submitted,
    ];

    pub fn code(self) -> i16 {
        match self {
            FollowUpStatus::New => 1,
            FollowUpStatus::NotSelected => 3,
            FollowUpStatus::Dispatched => 4,
            FollowUpStatus::SentToVillage => 5,
            FollowUpStatus::Resolved => 6,
            FollowUpStatus::Submitted => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FollowUpStatus::New => "new",
            FollowUpStatus::NotSelected => "not selected for dispatch",
            FollowUpStatus::Dispatched => "dispatched, awaiting village response",
            FollowUpStatus::SentToVillage => "sent to village",
            FollowUpStatus::Resolved => "resolved, pending verification",
            FollowUpStatus::Submitted => "resolved and submitted",
        }
    }

    /// Codes that count towards a finding's resolved counter.
    pub fn is_terminal(self) -> bool {
        self == FollowUpStatus::Submitted
    }
}

impl From<FollowUpStatus> for i16 {
    fn from(value: FollowUpStatus) -> Self {
        value.code()
    }
}

impl TryFrom<i16> for FollowUpStatus {
    type Error = UnknownStatusCode;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        FollowUpStatus::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or(UnknownStatusCode {
                kind: "follow-up",
                code,
            })
    }
}

impl fmt::Display for FollowUpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum VerificationStatus {
    Pending,
    Submitted,
    NotApplicable,
}

impl VerificationStatus {
    pub const ALL: [VerificationStatus; 3] = [
        VerificationStatus::Pending,
        VerificationStatus::Submitted,
        VerificationStatus::NotApplicable,
    ];

    pub fn code(self) -> i16 {
        match self {
            VerificationStatus::Pending => 1,
            VerificationStatus::Submitted => 2,
            VerificationStatus::NotApplicable => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Submitted => "submitted by village, pending verification",
            VerificationStatus::NotApplicable => "closed, not dispatched",
        }
    }
}

impl From<VerificationStatus> for i16 {
    fn from(value: VerificationStatus) -> Self {
        value.code()
    }
}

impl TryFrom<i16> for VerificationStatus {
    type Error = UnknownStatusCode;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        VerificationStatus::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or(UnknownStatusCode {
                kind: "verification",
                code,
            })
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} status code {code}")]
pub struct UnknownStatusCode {
    pub kind: &'static str,
    pub code: i16,
}

/// One entry of a status code catalog as shown to operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCodeEntry {
    pub code: i16,
    pub label: &'static str,
}

pub fn follow_up_catalog() -> Vec<StatusCodeEntry> {
    FollowUpStatus::ALL
        .into_iter()
        .map(|s| StatusCodeEntry {
            code: s.code(),
            label: s.label(),
        })
        .collect()
}

pub fn verification_catalog() -> Vec<StatusCodeEntry> {
    VerificationStatus::ALL
        .into_iter()
        .map(|s| StatusCodeEntry {
            code: s.code(),
            label: s.label(),
        })
        .collect()
}
