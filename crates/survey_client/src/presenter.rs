use std::time::Duration;

use tokio::sync::broadcast;

use crate::Presenter;

/// How long an error notice stays on screen before auto-dismissing.
pub const ERROR_NOTICE_TTL: Duration = Duration::from_secs(5);

pub const SUCCESS_TITLE: &str = "Evaluación Completada";
pub const SUCCESS_BODY: &str =
    "Gracias por completar la evaluación. Tu respuesta ha sido registrada correctamente.";
pub const SUCCESS_REMINDER: &str = "Si necesitas ayuda, siempre puedes acudir a un profesional \
     de la salud, asistente social o Carabineros.";

/// User-facing notification. The success notice is a fixed confirmation
/// and never discloses a score or classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success {
        title: String,
        body: String,
        reminder: String,
    },
    Error {
        message: String,
        ttl: Duration,
    },
}

/// Presenter publishing notices over a broadcast channel for whatever
/// renders the page to pick up. Dropped notices (no subscriber, lagging
/// subscriber) are not an error.
pub struct ChannelPresenter {
    notices: broadcast::Sender<Notice>,
}

impl ChannelPresenter {
    pub fn new(capacity: usize) -> Self {
        let (notices, _) = broadcast::channel(capacity);
        Self { notices }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }
}

impl Default for ChannelPresenter {
    fn default() -> Self {
        Self::new(16)
    }
}

impl Presenter for ChannelPresenter {
    fn show_success(&self) {
        let _ = self.notices.send(Notice::Success {
            title: SUCCESS_TITLE.to_string(),
            body: SUCCESS_BODY.to_string(),
            reminder: SUCCESS_REMINDER.to_string(),
        });
    }

    fn show_error(&self, message: &str) {
        let _ = self.notices.send(Notice::Error {
            message: message.to_string(),
            ttl: ERROR_NOTICE_TTL,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_notices_carry_the_auto_dismiss_ttl() {
        let presenter = ChannelPresenter::default();
        let mut notices = presenter.subscribe();

        presenter.show_error("algo salió mal");
        assert_eq!(
            notices.try_recv().expect("notice"),
            Notice::Error {
                message: "algo salió mal".to_string(),
                ttl: Duration::from_secs(5),
            }
        );
    }

    #[test]
    fn success_notice_is_the_fixed_confirmation() {
        let presenter = ChannelPresenter::default();
        let mut notices = presenter.subscribe();

        presenter.show_success();
        let Ok(Notice::Success { title, body, .. }) = notices.try_recv() else {
            panic!("expected a success notice");
        };
        assert_eq!(title, SUCCESS_TITLE);
        assert_eq!(body, SUCCESS_BODY);
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let presenter = ChannelPresenter::default();
        presenter.show_success();
        presenter.show_error("sin suscriptores");
    }
}
