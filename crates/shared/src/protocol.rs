use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Respondent;

/// Answered questions keyed by question id, one entry per question.
pub type SurveyResponses = BTreeMap<String, String>;

/// Request body for the submission endpoint. The respondent block is
/// flattened into the top level and absent entirely on anonymous
/// submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyPayload {
    pub is_anonymous: bool,
    #[serde(flatten)]
    pub respondent: Option<Respondent>,
    pub responses: SurveyResponses,
}

impl SurveyPayload {
    pub fn anonymous(responses: SurveyResponses) -> Self {
        Self {
            is_anonymous: true,
            respondent: None,
            responses,
        }
    }

    pub fn personal(respondent: Respondent, responses: SurveyResponses) -> Self {
        Self {
            is_anonymous: false,
            respondent: Some(respondent),
            responses,
        }
    }

    pub fn answered_count(&self) -> usize {
        self.responses.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}
