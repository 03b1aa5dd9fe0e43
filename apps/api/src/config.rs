use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Directory of this crate at build time. `.env` and the default dataset path
/// are resolved relative to it.
const CRATE_DIR: &str = env!("CARGO_MANIFEST_DIR");
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every setting has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    #[cfg_attr(not(feature = "model"), allow(dead_code))]
    pub dataset_path: PathBuf,
    pub openai_base_url: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        load_dotenv();

        Ok(Config {
            port: parse_env("PORT", DEFAULT_PORT)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            dataset_path: std::env::var("DATASET_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_dataset_path()),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            rust_log: "info".to_string(),
            dataset_path: default_dataset_path(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Loads `<crate>/.env` when it exists, otherwise falls back to the usual
/// search from the working directory. A missing file is not an error.
fn load_dotenv() {
    let crate_env = Path::new(CRATE_DIR).join(".env");
    if crate_env.exists() {
        dotenvy::from_path(&crate_env).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

/// `<crate>/../../assets/resume-dataset.csv`
pub fn default_dataset_path() -> PathBuf {
    Path::new(CRATE_DIR)
        .join("..")
        .join("..")
        .join("assets")
        .join("resume-dataset.csv")
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dataset_path_is_under_assets() {
        let path = default_dataset_path();
        assert!(path.ends_with("assets/resume-dataset.csv"));
        assert!(path.starts_with(CRATE_DIR));
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let port: u16 = parse_env("RESUME_API_TEST_UNSET_PORT", 1234).unwrap();
        assert_eq!(port, 1234);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("RESUME_API_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("RESUME_API_TEST_BAD_PORT", 8000);
        assert!(result.is_err());
    }
}
