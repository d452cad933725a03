use std::{collections::BTreeSet, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::{
        is_valid_email, Respondent, Sex, FIELD_ANONYMOUS_SWITCH, FIELD_EDAD, FIELD_EMAIL,
        FIELD_NOMBRE, FIELD_SEXO, QUESTION_PREFIX, RESPONDENT_FIELDS, SECTION_PERSONAL_DATA,
    },
    error::SubmitError,
    protocol::{SubmissionResult, SurveyPayload, SurveyResponses},
};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

pub mod config;
pub mod form;
pub mod presenter;
pub mod transport;

pub use form::InMemoryFormState;
pub use presenter::{ChannelPresenter, Notice};
pub use transport::HttpTransport;

/// View of the survey form's controls. Implementations own whatever
/// actually renders the form; the controller only reads values and
/// flips flags through this surface.
pub trait FormState: Send + Sync {
    /// Whether a toggle or checkbox field is currently checked.
    fn is_checked(&self, field_id: &str) -> bool;
    /// Current text value of a field, if the field exists.
    fn value(&self, field_id: &str) -> Option<String>;
    fn set_required(&self, field_id: &str, required: bool);
    fn set_visible(&self, section_id: &str, visible: bool);
    /// Disable the submit control and show the busy indicator while
    /// `true`; restore the control and its original label on `false`.
    fn set_busy(&self, busy: bool);
    /// Names of the option groups rendered on the form, one per question.
    fn choice_groups(&self) -> Vec<String>;
    /// `(group name, selected value)` for every group with a selection.
    fn checked_choices(&self) -> Vec<(String, String)>;
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers one payload. `Err` means the endpoint was unreachable;
    /// an application-level rejection comes back as `Ok` with
    /// `success == false`.
    async fn send(&self, payload: &SurveyPayload) -> Result<SubmissionResult>;
}

pub trait Presenter: Send + Sync {
    fn show_success(&self);
    fn show_error(&self, message: &str);
}

impl<F: FormState + ?Sized> FormState for Arc<F> {
    fn is_checked(&self, field_id: &str) -> bool {
        (**self).is_checked(field_id)
    }

    fn value(&self, field_id: &str) -> Option<String> {
        (**self).value(field_id)
    }

    fn set_required(&self, field_id: &str, required: bool) {
        (**self).set_required(field_id, required)
    }

    fn set_visible(&self, section_id: &str, visible: bool) {
        (**self).set_visible(section_id, visible)
    }

    fn set_busy(&self, busy: bool) {
        (**self).set_busy(busy)
    }

    fn choice_groups(&self) -> Vec<String> {
        (**self).choice_groups()
    }

    fn checked_choices(&self) -> Vec<(String, String)> {
        (**self).checked_choices()
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, payload: &SurveyPayload) -> Result<SubmissionResult> {
        (**self).send(payload).await
    }
}

impl<P: Presenter + ?Sized> Presenter for Arc<P> {
    fn show_success(&self) {
        (**self).show_success()
    }

    fn show_error(&self, message: &str) {
        (**self).show_error(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Validating,
    Submitting,
}

/// Terminal state of one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Server accepted the payload; confirmation shown.
    Succeeded,
    /// Server answered with `success == false`; rejection shown.
    Rejected,
    /// Endpoint unreachable; retry message shown.
    TransportFailed,
    /// Payload construction or validation failed; nothing was sent.
    Invalid,
    /// Another submission was in flight; this trigger was ignored.
    InFlight,
}

/// Orchestrates one survey submission end to end: snapshot the form,
/// build the payload, validate it, deliver it, present the outcome.
pub struct SurveyFormController<F: FormState, T: Transport, P: Presenter> {
    form: F,
    transport: T,
    presenter: P,
    phase: Mutex<Phase>,
}

impl<F: FormState, T: Transport, P: Presenter> SurveyFormController<F, T, P> {
    pub fn new(form: F, transport: T, presenter: P) -> Self {
        Self {
            form,
            transport,
            presenter,
            phase: Mutex::new(Phase::Idle),
        }
    }

    /// Reacts to the anonymity switch: hides or shows the personal-data
    /// section and keeps every respondent field's `required` flag the
    /// logical negation of the anonymous flag.
    pub fn set_anonymous(&self, anonymous: bool) {
        self.form.set_visible(SECTION_PERSONAL_DATA, !anonymous);
        for field in RESPONDENT_FIELDS {
            self.form.set_required(field, !anonymous);
        }
    }

    /// Snapshot of the current form state as a wire payload. Personal
    /// fields are read only when the submission is not anonymous; a
    /// non-integer age or malformed email is an error here, never a
    /// coerced sentinel.
    pub fn build_payload(&self) -> Result<SurveyPayload, SubmitError> {
        let responses: SurveyResponses = self
            .form
            .checked_choices()
            .into_iter()
            .map(|(group, value)| (strip_question_prefix(&group), value))
            .collect();

        if self.form.is_checked(FIELD_ANONYMOUS_SWITCH) {
            return Ok(SurveyPayload::anonymous(responses));
        }
        let respondent = self.read_respondent()?;
        Ok(SurveyPayload::personal(respondent, responses))
    }

    fn read_respondent(&self) -> Result<Respondent, SubmitError> {
        let nombre = self.required_value(FIELD_NOMBRE)?;
        let email = self.required_value(FIELD_EMAIL)?;
        if !is_valid_email(&email) {
            return Err(SubmitError::InvalidRespondent(format!(
                "email '{email}' is not a valid address"
            )));
        }
        let edad_raw = self.required_value(FIELD_EDAD)?;
        let edad: i64 = edad_raw.trim().parse().map_err(|_| {
            SubmitError::InvalidRespondent(format!("edad '{edad_raw}' is not an integer"))
        })?;
        let sexo_raw = self.required_value(FIELD_SEXO)?;
        let sexo = Sex::from_form_value(&sexo_raw).ok_or_else(|| {
            SubmitError::InvalidRespondent(format!("sexo '{sexo_raw}' is not a known option"))
        })?;
        Ok(Respondent {
            nombre,
            email,
            edad,
            sexo,
        })
    }

    fn required_value(&self, field_id: &str) -> Result<String, SubmitError> {
        match self.form.value(field_id) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(SubmitError::InvalidRespondent(format!(
                "field '{field_id}' is empty"
            ))),
        }
    }

    /// Number of questions on the form, derived from the distinct
    /// option groups present. Groups may carry any number of options.
    pub fn expected_question_count(&self) -> usize {
        self.form
            .choice_groups()
            .into_iter()
            .filter(|group| group.starts_with(QUESTION_PREFIX))
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn validate(&self, payload: &SurveyPayload) -> Result<(), SubmitError> {
        let expected = self.expected_question_count();
        let answered = payload.answered_count();
        if answered != expected {
            return Err(SubmitError::IncompleteSurvey { answered, expected });
        }
        Ok(())
    }

    /// Delivers a validated payload. The busy flag is raised before the
    /// transport call and lowered on every exit path.
    pub async fn submit(&self, payload: &SurveyPayload) -> SubmitOutcome {
        self.form.set_busy(true);
        let outcome = match self.transport.send(payload).await {
            Ok(SubmissionResult { success: true, .. }) => {
                info!(
                    anonymous = payload.is_anonymous,
                    answered = payload.answered_count(),
                    "survey submission accepted"
                );
                self.presenter.show_success();
                SubmitOutcome::Succeeded
            }
            Ok(SubmissionResult { error, .. }) => {
                warn!(?error, "survey submission rejected by server");
                let err = SubmitError::rejected(error);
                self.presenter.show_error(&err.user_message());
                SubmitOutcome::Rejected
            }
            Err(err) => {
                error!(%err, "survey submission transport failure");
                let err = SubmitError::Transport(err);
                self.presenter.show_error(&err.user_message());
                SubmitOutcome::TransportFailed
            }
        };
        self.form.set_busy(false);
        outcome
    }

    /// The submit-event path: single-flight guard, build, validate,
    /// deliver. Every failure is surfaced through the presenter; nothing
    /// propagates past this call.
    pub async fn handle_submit(&self) -> SubmitOutcome {
        {
            let mut phase = self.phase.lock().await;
            if *phase != Phase::Idle {
                warn!("submission already in flight; ignoring trigger");
                return SubmitOutcome::InFlight;
            }
            *phase = Phase::Validating;
        }

        let payload = match self.build_payload().and_then(|payload| {
            self.validate(&payload)?;
            Ok(payload)
        }) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(%err, "survey submission blocked before transport");
                self.presenter.show_error(&err.user_message());
                *self.phase.lock().await = Phase::Idle;
                return SubmitOutcome::Invalid;
            }
        };

        *self.phase.lock().await = Phase::Submitting;
        let outcome = self.submit(&payload).await;
        *self.phase.lock().await = Phase::Idle;
        outcome
    }
}

fn strip_question_prefix(group: &str) -> String {
    group
        .strip_prefix(QUESTION_PREFIX)
        .unwrap_or(group)
        .to_string()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod transport_tests;
