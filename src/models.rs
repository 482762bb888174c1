//! Data models and structures
//!
//! Defines the hotspot records returned to callers and the process-wide
//! configuration loaded at startup.

use crate::conversation::RequestConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// A named region of the scene with its communication options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotspot {
    #[serde(rename = "hotspotName")]
    pub name: String,
    pub options: Vec<String>,
}

impl Hotspot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }
}

impl fmt::Display for Hotspot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.name, self.options)
    }
}

/// Bearer credential for the chat API. Redacted from debug output.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Default request body cap, sized for base64-encoded phone photos.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: ApiKey,
    pub openai_base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub vsd_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = match lookup("OPENAI_API_KEY") {
            Some(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => match lookup("OPENAI_API_KEY_FILE") {
                Some(path) => std::fs::read_to_string(&path)
                    .map_err(|e| Error::Config(format!("Cannot read key file {}: {}", path, e)))?
                    .trim()
                    .to_string(),
                None => {
                    return Err(Error::Config(
                        "OPENAI_API_KEY or OPENAI_API_KEY_FILE must be set".to_string(),
                    ))
                }
            },
        };

        if openai_api_key.is_empty() {
            return Err(Error::Config("OpenAI API key is empty".to_string()));
        }

        Ok(Self {
            openai_api_key: ApiKey::new(openai_api_key),
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| crate::ai::openai::client::DEFAULT_BASE_URL.to_string()),
            model: lookup("HOTSPOT_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
            max_tokens: parse_var(&lookup, "HOTSPOT_MAX_TOKENS", 500)?,
            request_timeout: Duration::from_secs(parse_var(&lookup, "REQUEST_TIMEOUT_SECS", 60)?),
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_var(&lookup, "PORT", 5000)?,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            max_upload_bytes: parse_var(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            vsd_path: lookup("VSD_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("sampleVSD.json")),
        })
    }

    pub fn request_config(&self) -> RequestConfig {
        RequestConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {} '{}': {}", key, raw, e))),
        None => Ok(default),
    }
}
