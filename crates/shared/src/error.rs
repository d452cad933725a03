use thiserror::Error;

/// Alert text for an incomplete survey, as shown on the form.
pub const MSG_INCOMPLETE: &str = "Por favor, responde todas las preguntas.";
/// Alert text for invalid personal data.
pub const MSG_INVALID_RESPONDENT: &str = "Por favor, revisa tus datos personales.";
/// Alert text when the endpoint could not be reached.
pub const MSG_TRANSPORT: &str = "Error al enviar la encuesta. Por favor, intenta nuevamente.";
/// Prefix for server-side rejections; the server message follows.
pub const MSG_REJECTED_PREFIX: &str = "Error al enviar la evaluación";
/// Fallback when the server rejects without a message.
pub const MSG_UNKNOWN: &str = "Error desconocido";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("survey incomplete: {answered} of {expected} questions answered")]
    IncompleteSurvey { answered: usize, expected: usize },
    #[error("invalid respondent data: {0}")]
    InvalidRespondent(String),
    #[error("transport failure: {0}")]
    Transport(anyhow::Error),
    #[error("submission rejected: {0}")]
    Rejected(String),
}

impl SubmitError {
    pub fn rejected(server_error: Option<String>) -> Self {
        Self::Rejected(server_error.unwrap_or_else(|| MSG_UNKNOWN.to_string()))
    }

    /// Message shown to the respondent. Internal detail stays in the
    /// `Display` impl; the user only sees the form's fixed texts.
    pub fn user_message(&self) -> String {
        match self {
            Self::IncompleteSurvey { .. } => MSG_INCOMPLETE.to_string(),
            Self::InvalidRespondent(_) => MSG_INVALID_RESPONDENT.to_string(),
            Self::Transport(_) => MSG_TRANSPORT.to_string(),
            Self::Rejected(message) => format!("{MSG_REJECTED_PREFIX}: {message}"),
        }
    }
}
