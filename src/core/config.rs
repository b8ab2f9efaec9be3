use std::env;

use tracing::info;

use crate::errors::ConfigError;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-pro-exp-02-05";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

impl GeminiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_key: required(&lookup, "GEMINI_API_KEY")?,
            model: lookup("GEMINI_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub phone_number: String,
}

impl TwilioConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    ///
    /// Logs a masked view of whatever is present before validating, so a
    /// misconfigured deployment shows which value is missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sid = lookup("TWILIO_ACCOUNT_SID");
        let token = lookup("TWILIO_AUTH_TOKEN");
        let phone = lookup("TWILIO_PHONE_NUMBER");

        info!(
            account_sid_prefix = %sid.as_deref().map_or("None", sid_prefix),
            auth_token_len = token.as_deref().map_or(0, str::len),
            phone_number = %phone.as_deref().unwrap_or("None"),
            "Loaded Twilio credentials"
        );

        Ok(Self {
            account_sid: non_empty(sid, "TWILIO_ACCOUNT_SID")?,
            auth_token: non_empty(token, "TWILIO_AUTH_TOKEN")?,
            phone_number: non_empty(phone, "TWILIO_PHONE_NUMBER")?,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup(key), key)
}

fn non_empty(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn sid_prefix(sid: &str) -> &str {
    sid.get(..6).unwrap_or(sid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_gemini_config_defaults_model() {
        let env = vars(&[("GEMINI_API_KEY", "key")]);
        let config = GeminiConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.api_key, "key");
        assert_eq!(config.model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_gemini_config_requires_key() {
        let env = vars(&[("GEMINI_MODEL", "gemini-2.5-flash")]);
        let err = GeminiConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert_eq!(err, ConfigError::Missing("GEMINI_API_KEY"));
    }

    #[test]
    fn test_twilio_config_rejects_empty_values() {
        let env = vars(&[
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_AUTH_TOKEN", ""),
            ("TWILIO_PHONE_NUMBER", "+15550000000"),
        ]);
        let err = TwilioConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert_eq!(err, ConfigError::Missing("TWILIO_AUTH_TOKEN"));
    }

    #[test]
    fn test_sid_prefix_handles_short_values() {
        assert_eq!(sid_prefix("AC1234567890"), "AC1234");
        assert_eq!(sid_prefix("AC1"), "AC1");
    }
}
