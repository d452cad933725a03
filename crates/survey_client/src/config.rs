use std::{collections::HashMap, fs, time::Duration};

use anyhow::{bail, Context};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint_url: String,
    pub request_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint_url: "http://127.0.0.1:8000/api/submit-survey".into(),
            request_timeout_seconds: 30,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("survey.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("endpoint_url") {
                settings.endpoint_url = v.clone();
            }
            if let Some(v) = file_cfg.get("request_timeout_seconds") {
                if let Ok(parsed) = v.parse::<u64>() {
                    settings.request_timeout_seconds = parsed;
                }
            }
        }
    }

    if let Ok(v) = std::env::var("SURVEY_ENDPOINT_URL") {
        settings.endpoint_url = v;
    }
    if let Ok(v) = std::env::var("APP__ENDPOINT_URL") {
        settings.endpoint_url = v;
    }

    if let Ok(v) = std::env::var("SURVEY_REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_seconds = parsed;
        }
    }
    if let Ok(v) = std::env::var("APP__REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_seconds = parsed;
        }
    }

    settings
}

pub fn validate_endpoint_url(raw: &str) -> anyhow::Result<Url> {
    let url =
        Url::parse(raw.trim()).with_context(|| format!("invalid survey endpoint url '{raw}'"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        bail!(
            "survey endpoint url '{raw}' must use http or https, got '{}'",
            url.scheme()
        );
    }
    Ok(url)
}
