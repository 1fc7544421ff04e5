use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::delivery::RetryPolicy;
use crate::render::RenderOptions;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "site_delivery.json5";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON5 for this schema.
    #[error("failed to parse config file {path}: {message}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// An environment variable holds an unusable value.
    #[error("invalid value '{value}' for {key}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },
}

/// `sanity` section.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SanitySection {
    /// Project id.
    pub project_id: Option<String>,
    /// Dataset.
    pub dataset: Option<String>,
    /// Dated API version.
    pub api_version: Option<String>,
    /// Read through the CDN.
    pub use_cdn: Option<bool>,
    /// Turns the CMS links off entirely.
    pub enabled: Option<bool>,
}

impl SanitySection {
    fn merge(self, other: SanitySection) -> SanitySection {
        SanitySection {
            project_id: other.project_id.or(self.project_id),
            dataset: other.dataset.or(self.dataset),
            api_version: other.api_version.or(self.api_version),
            use_cdn: other.use_cdn.or(self.use_cdn),
            enabled: other.enabled.or(self.enabled),
        }
    }
}

/// `retry` section.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RetrySection {
    /// Total attempts per source.
    pub max_attempts: Option<u32>,
    /// Pause between attempts.
    pub delay_ms: Option<u64>,
    /// Budget of one attempt.
    pub attempt_timeout_ms: Option<u64>,
}

impl RetrySection {
    fn merge(self, other: RetrySection) -> RetrySection {
        RetrySection {
            max_attempts: other.max_attempts.or(self.max_attempts),
            delay_ms: other.delay_ms.or(self.delay_ms),
            attempt_timeout_ms: other.attempt_timeout_ms.or(self.attempt_timeout_ms),
        }
    }
}

/// `http` section.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HttpSection {
    /// Transport-level retries inside the HTTP client.
    pub transport_retries: Option<u32>,
    /// Whole-request timeout.
    pub timeout_secs: Option<u64>,
}

impl HttpSection {
    fn merge(self, other: HttpSection) -> HttpSection {
        HttpSection {
            transport_retries: other.transport_retries.or(self.transport_retries),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }
}

/// `carousel` section.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CarouselSection {
    /// Settle period of a transition.
    pub settle_ms: Option<u64>,
    /// Auto-advance period; 0 disables auto-advance.
    pub auto_advance_ms: Option<u64>,
}

impl CarouselSection {
    fn merge(self, other: CarouselSection) -> CarouselSection {
        CarouselSection {
            settle_ms: other.settle_ms.or(self.settle_ms),
            auto_advance_ms: other.auto_advance_ms.or(self.auto_advance_ms),
        }
    }
}

/// `render` section.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RenderSection {
    /// Currency suffix.
    pub currency: Option<String>,
    /// Long-text budget.
    pub truncate_chars: Option<usize>,
    /// Placeholder text.
    pub placeholder_text: Option<String>,
    /// Image for items without one.
    pub fallback_image: Option<String>,
}

impl RenderSection {
    fn merge(self, other: RenderSection) -> RenderSection {
        RenderSection {
            currency: other.currency.or(self.currency),
            truncate_chars: other.truncate_chars.or(self.truncate_chars),
            placeholder_text: other.placeholder_text.or(self.placeholder_text),
            fallback_image: other.fallback_image.or(self.fallback_image),
        }
    }
}

/// # Delivery Config
///
/// ```json5
/// {
///   sanity: { projectId: "xwla8vtz", dataset: "production", useCdn: true },
///   staticData: "assets/data/properties.json",
///   retry: { maxAttempts: 3, delayMs: 1000 },
/// }
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryConfig {
    /// CMS connection.
    #[serde(default)]
    pub sanity: SanitySection,
    /// Path or URL of `properties.json`.
    pub static_data: Option<String>,
    /// Per-source retry policy.
    #[serde(default)]
    pub retry: RetrySection,
    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpSection,
    /// Carousel timing.
    #[serde(default)]
    pub carousel: CarouselSection,
    /// Formatting settings.
    #[serde(default)]
    pub render: RenderSection,
}

impl DeliveryConfig {
    /// Built-in defaults.
    pub fn defaults() -> Self {
        DeliveryConfig {
            sanity: SanitySection {
                project_id: Some("xwla8vtz".to_string()),
                dataset: Some("production".to_string()),
                api_version: Some("2024-02-06".to_string()),
                use_cdn: Some(true),
                enabled: Some(true),
            },
            static_data: Some("assets/data/properties.json".to_string()),
            retry: RetrySection {
                max_attempts: Some(3),
                delay_ms: Some(1000),
                attempt_timeout_ms: None,
            },
            http: HttpSection {
                transport_retries: Some(0),
                timeout_secs: Some(10),
            },
            carousel: CarouselSection {
                settle_ms: Some(100),
                auto_advance_ms: Some(8000),
            },
            render: RenderSection {
                currency: Some("AED".to_string()),
                truncate_chars: Some(100),
                placeholder_text: None,
                fallback_image: None,
            },
        }
    }

    /// Merges two configs; `Some` values of `other` win.
    pub fn merge(self, other: DeliveryConfig) -> DeliveryConfig {
        DeliveryConfig {
            sanity: self.sanity.merge(other.sanity),
            static_data: other.static_data.or(self.static_data),
            retry: self.retry.merge(other.retry),
            http: self.http.merge(other.http),
            carousel: self.carousel.merge(other.carousel),
            render: self.render.merge(other.render),
        }
    }

    /// Parses a JSON5 document.
    pub fn from_json5(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        json5::from_str(raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Reads a JSON5 file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json5(&raw, path)
    }

    /// Overrides taken from `lookup` (normally the process environment).
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| -> Result<Option<u64>, ConfigError> {
            lookup(key)
                .map(|value| {
                    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                        key: key.to_string(),
                        value,
                    })
                })
                .transpose()
        };
        let flag = |key: &str| -> Result<Option<bool>, ConfigError> {
            lookup(key)
                .map(|value| match value.trim().to_lowercase().as_str() {
                    "1" | "true" | "yes" | "on" => Ok(true),
                    "0" | "false" | "no" | "off" => Ok(false),
                    _ => Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        value,
                    }),
                })
                .transpose()
        };

        let max_attempts = parsed("SITE_RETRY_MAX_ATTEMPTS")?
            .map(|n| {
                u32::try_from(n).map_err(|_| ConfigError::InvalidValue {
                    key: "SITE_RETRY_MAX_ATTEMPTS".to_string(),
                    value: n.to_string(),
                })
            })
            .transpose()?;

        Ok(DeliveryConfig {
            sanity: SanitySection {
                project_id: lookup("SITE_SANITY_PROJECT_ID"),
                dataset: lookup("SITE_SANITY_DATASET"),
                api_version: lookup("SITE_SANITY_API_VERSION"),
                use_cdn: flag("SITE_SANITY_USE_CDN")?,
                enabled: None,
            },
            static_data: lookup("SITE_STATIC_DATA"),
            retry: RetrySection {
                max_attempts,
                delay_ms: parsed("SITE_RETRY_DELAY_MS")?,
                attempt_timeout_ms: None,
            },
            ..Default::default()
        })
    }

    /// Overrides taken from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    /// Defaults, then `path` (or [`DEFAULT_CONFIG_FILE`]) if it exists, then
    /// the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = path.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = Self::defaults();

        if file.exists() {
            config = config.merge(Self::from_file(&file)?);
            log::info!("Loaded delivery config from {}", file.display());
        } else if path.is_some() {
            return Err(ConfigError::Io {
                path: file,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        } else {
            log::info!("Config file not found at {}. Using defaults and environment.", file.display());
        }

        Ok(config.merge(Self::from_env()?))
    }

    /// Retry policy of network-backed sources.
    pub fn retry_policy(&self) -> RetryPolicy {
        let policy = RetryPolicy::new(
            self.retry.max_attempts.unwrap_or(3),
            Duration::from_millis(self.retry.delay_ms.unwrap_or(1000)),
        );
        match self.retry.attempt_timeout_ms {
            Some(ms) => policy.with_attempt_timeout(Duration::from_millis(ms)),
            None => policy,
        }
    }

    /// Render options with defaults filled in.
    pub fn render_options(&self) -> RenderOptions {
        let defaults = RenderOptions::default();
        RenderOptions {
            currency: self.render.currency.clone().unwrap_or(defaults.currency),
            truncate_chars: self.render.truncate_chars.unwrap_or(defaults.truncate_chars),
            placeholder_text: self.render.placeholder_text.clone().unwrap_or(defaults.placeholder_text),
            fallback_image: self.render.fallback_image.clone().unwrap_or(defaults.fallback_image),
            ..defaults
        }
    }

    /// Carousel settle period.
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.carousel.settle_ms.unwrap_or(100))
    }

    /// Auto-advance period, `None` when disabled.
    pub fn auto_advance(&self) -> Option<Duration> {
        match self.carousel.auto_advance_ms.unwrap_or(8000) {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// HTTP timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs.unwrap_or(10))
    }

    /// Transport retries of the HTTP client.
    pub fn transport_retries(&self) -> u32 {
        self.http.transport_retries.unwrap_or(0)
    }

    /// CMS settings, `None` when the CMS is disabled or has no project id.
    #[cfg(feature = "sources")]
    pub fn sanity_config(&self) -> Option<crate::sources::SanityConfig> {
        if !self.sanity.enabled.unwrap_or(true) {
            return None;
        }
        let defaults = crate::sources::SanityConfig::default();
        let project_id = self.sanity.project_id.clone().filter(|id| !id.trim().is_empty())?;
        Some(crate::sources::SanityConfig {
            project_id,
            dataset: self.sanity.dataset.clone().unwrap_or(defaults.dataset),
            api_version: self.sanity.api_version.clone().unwrap_or(defaults.api_version),
            use_cdn: self.sanity.use_cdn.unwrap_or(defaults.use_cdn),
        })
    }

    /// Location of `properties.json`, if configured.
    #[cfg(feature = "sources")]
    pub fn static_source(&self) -> Option<crate::sources::StaticSource> {
        self.static_data
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(crate::sources::StaticSource::parse)
    }
}
