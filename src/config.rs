use std::env;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

/// Base URL used when `JOBS_API_BASE_URL` is not set
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Suite configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Root address of the service under test
    /// Format: http://HOST:PORT (a trailing slash is tolerated)
    pub base_url: Url,

    /// Timeout applied to every request
    /// Default: 10 seconds
    pub request_timeout: Duration,

    /// Directory of the rolling log files
    /// Default: logs
    pub log_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Optional environment variables:
    /// - JOBS_API_BASE_URL: base URL of the service (default: http://127.0.0.1:8080)
    /// - REQUEST_TIMEOUT_SECS: per-request timeout in seconds (default: 10)
    /// - LOG_DIR: directory for log files (default: logs)
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let base_url = match env::var("JOBS_API_BASE_URL") {
            Ok(raw) => parse_base_url(&raw)?,
            Err(_) => parse_base_url(DEFAULT_BASE_URL)?,
        };

        let request_timeout = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => Duration::from_secs(10),
        };

        let log_dir = env::var("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("logs"));

        Ok(Config {
            base_url,
            request_timeout,
            log_dir,
        })
    }

    /// Apply command-line overrides on top of the environment
    pub fn with_overrides(
        mut self,
        base_url: Option<&str>,
        timeout_secs: Option<u64>,
        log_dir: Option<PathBuf>,
    ) -> Result<Self, String> {
        if let Some(raw) = base_url {
            self.base_url = parse_base_url(raw)?;
        }
        if let Some(secs) = timeout_secs {
            if secs == 0 {
                return Err("timeout must be at least one second".to_string());
            }
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = log_dir {
            self.log_dir = dir;
        }
        Ok(self)
    }
}

/// Parse and normalize a base URL so that joining `api/jobs` onto it works
pub fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| format!("invalid base URL {raw:?}: {e}"))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("base URL {raw:?} must use http or https"));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(format!("base URL {raw:?} has no host"));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, String> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err("REQUEST_TIMEOUT_SECS must be at least 1".to_string()),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(format!("REQUEST_TIMEOUT_SECS must be a number of seconds, got {raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let url = parse_base_url("http://127.0.0.1:8080").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/");

        let url = parse_base_url("http://localhost:5000/prefix").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/prefix/");
        assert_eq!(url.join("api/jobs").unwrap().as_str(), "http://localhost:5000/prefix/api/jobs");
    }

    #[test]
    fn base_url_rejects_other_schemes() {
        assert!(parse_base_url("ftp://example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn timeout_must_be_positive() {
        assert_eq!(parse_timeout("3").unwrap(), Duration::from_secs(3));
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("soon").is_err());
    }

    #[test]
    fn overrides_replace_environment_values() {
        let config = Config {
            base_url: parse_base_url(DEFAULT_BASE_URL).unwrap(),
            request_timeout: Duration::from_secs(10),
            log_dir: PathBuf::from("logs"),
        }
        .with_overrides(Some("https://jobs.example.com"), Some(2), None)
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://jobs.example.com/");
        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }
}
