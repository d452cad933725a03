use serde::{Deserialize, Serialize};

/// Prefix shared by every question's option-group name on the form.
pub const QUESTION_PREFIX: &str = "question_";

pub const FIELD_ANONYMOUS_SWITCH: &str = "anonymousSwitch";
pub const FIELD_NOMBRE: &str = "nombre";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_EDAD: &str = "edad";
pub const FIELD_SEXO: &str = "sexo";
pub const SECTION_PERSONAL_DATA: &str = "personalData";

/// Respondent fields whose `required` flag tracks the anonymity switch.
pub const RESPONDENT_FIELDS: [&str; 4] = [FIELD_NOMBRE, FIELD_EMAIL, FIELD_EDAD, FIELD_SEXO];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "Otro")]
    Other,
}

impl Sex {
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "F" => Some(Self::Female),
            "M" => Some(Self::Male),
            "Otro" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_form_value(&self) -> &'static str {
        match self {
            Self::Female => "F",
            Self::Male => "M",
            Self::Other => "Otro",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respondent {
    pub nombre: String,
    pub email: String,
    pub edad: i64,
    pub sexo: Sex,
}

/// Shape check equivalent to the form's email pattern: one `@`, no
/// whitespace, and a dot with non-empty sides in the domain part.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.split_once('.') {
        Some((head, tail)) => !head.is_empty() && !tail.is_empty(),
        None => false,
    }
}
