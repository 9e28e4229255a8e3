use anyhow::{Context, Result, anyhow};
use feed_app::Session;

const DEFAULT_API_URL: &str = "https://my-feed.tech786projects.com";
const DEFAULT_USER_NAME: &str = "Walter";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub log_level: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = get_or(&lookup, "FEED_API_URL", DEFAULT_API_URL);
        let connect_timeout_secs = parse_u64(&lookup, "FEED_CONNECT_TIMEOUT_SECS", 5)?;
        let request_timeout_secs = parse_u64(&lookup, "FEED_REQUEST_TIMEOUT_SECS", 15)?;
        let user_name = get_or(&lookup, "FEED_USER_NAME", DEFAULT_USER_NAME);
        let user_avatar = lookup("FEED_USER_AVATAR")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let log_level = lookup("LOG_LEVEL")
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());

        Ok(Self {
            api_url,
            connect_timeout_secs,
            request_timeout_secs,
            user_name,
            user_avatar,
            log_level,
        })
    }

    pub fn session(&self) -> Session {
        let session = Session::new(self.user_name.clone());
        match &self.user_avatar {
            Some(avatar) => session.with_avatar(avatar.clone()),
            None => session,
        }
    }
}

fn get_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64> {
    let value = lookup(key)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let settings = settings_from(&[]).expect("defaults are valid");
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.connect_timeout_secs, 5);
        assert_eq!(settings.request_timeout_secs, 15);
        assert_eq!(settings.user_name, DEFAULT_USER_NAME);
        assert!(settings.user_avatar.is_none());
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn env_values_override_defaults() {
        let settings = settings_from(&[
            ("FEED_API_URL", "http://localhost:3000"),
            ("FEED_REQUEST_TIMEOUT_SECS", "30"),
            ("FEED_USER_NAME", "Audrey Peck"),
            ("FEED_USER_AVATAR", "https://x/a.png"),
            ("RUST_LOG", "debug"),
        ])
        .expect("values are valid");
        assert_eq!(settings.api_url, "http://localhost:3000");
        assert_eq!(settings.request_timeout_secs, 30);
        assert_eq!(settings.log_level, "debug");

        let session = settings.session();
        assert_eq!(session.display_name, "Audrey Peck");
        assert_eq!(session.avatar.as_deref(), Some("https://x/a.png"));
    }

    #[test]
    fn log_level_prefers_log_level_over_rust_log() {
        let settings = settings_from(&[("LOG_LEVEL", "warn"), ("RUST_LOG", "debug")])
            .expect("values are valid");
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = settings_from(&[("FEED_CONNECT_TIMEOUT_SECS", "0")]).expect_err("zero fails");
        assert!(err.to_string().contains("FEED_CONNECT_TIMEOUT_SECS"));
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        assert!(settings_from(&[("FEED_REQUEST_TIMEOUT_SECS", "soon")]).is_err());
    }
}
