//! Runtime configuration.
//!
//! Built once from environment variables, overridden by CLI flags, and
//! passed explicitly to the commands that need it.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::diff::{FilterOptions, HeaderMode};
use crate::error::ConfigError;
use crate::llm::{Provider, ProviderSelection};

/// Default timeout for a single LLM provider call (5 minutes).
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 300;

/// Maximum characters of diff text sent to the LLM.
pub const DEFAULT_MAX_DIFF_CHARS: usize = 30_000;

pub const AUTHOR_NAME_ENV_VAR: &str = "HUNKCOMMIT_AUTHOR_NAME";
pub const AUTHOR_EMAIL_ENV_VAR: &str = "HUNKCOMMIT_AUTHOR_EMAIL";
pub const PROVIDER_ENV_VAR: &str = "HUNKCOMMIT_PROVIDER";
pub const TIMEOUT_ENV_VAR: &str = "HUNKCOMMIT_LLM_TIMEOUT";

/// Commit author used instead of the git config identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorIdentity {
    pub name: String,
    pub email: String,
}

impl AuthorIdentity {
    /// `Name <email>` as accepted by `git commit --author`.
    pub fn signature(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// Build from an optional name/email pair. Both or neither must be set.
    pub fn from_parts(
        name: Option<String>,
        email: Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        match (name, email) {
            (Some(name), Some(email)) => Ok(Some(Self { name, email })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::IncompleteAuthor { present: "name" }),
            (None, Some(_)) => Err(ConfigError::IncompleteAuthor { present: "email" }),
        }
    }
}

/// Everything the commands read at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub author: Option<AuthorIdentity>,
    pub provider: ProviderSelection,
    pub llm_timeout: Duration,
    pub exclude_lockfiles: bool,
    pub max_diff_chars: usize,
    /// File header layout for reconstructed patches.
    pub header_mode: HeaderMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            author: None,
            provider: ProviderSelection::default(),
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            exclude_lockfiles: true,
            max_diff_chars: DEFAULT_MAX_DIFF_CHARS,
            header_mode: HeaderMode::PerChunk,
        }
    }
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub provider: Option<Provider>,
    pub timeout_secs: Option<u64>,
    pub keep_lockfiles: bool,
    pub grouped_headers: bool,
}

impl Config {
    /// Read configuration from `HUNKCOMMIT_*` environment variables.
    ///
    /// Invalid provider or timeout values are logged and ignored. A partial
    /// author identity is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        config.author = AuthorIdentity::from_parts(
            non_empty_var(AUTHOR_NAME_ENV_VAR),
            non_empty_var(AUTHOR_EMAIL_ENV_VAR),
        )?;

        if let Some(raw) = non_empty_var(PROVIDER_ENV_VAR) {
            match parse_provider(&raw) {
                Ok(provider) => config.provider = ProviderSelection::from_primary(provider),
                Err(e) => warn!("{}, using default provider", e),
            }
        }

        if let Some(raw) = non_empty_var(TIMEOUT_ENV_VAR) {
            match raw.parse::<u64>() {
                Ok(secs) => config.llm_timeout = Duration::from_secs(secs),
                Err(_) => warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, raw, DEFAULT_LLM_TIMEOUT_SECS
                ),
            }
        }

        Ok(config)
    }

    /// Apply command-line overrides on top of this configuration.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        if overrides.author_name.is_some() || overrides.author_email.is_some() {
            let name = overrides
                .author_name
                .or_else(|| self.author.as_ref().map(|a| a.name.clone()));
            let email = overrides
                .author_email
                .or_else(|| self.author.as_ref().map(|a| a.email.clone()));
            self.author = AuthorIdentity::from_parts(name, email)?;
        }
        if let Some(provider) = overrides.provider {
            self.provider = ProviderSelection::from_primary(provider);
        }
        if let Some(secs) = overrides.timeout_secs {
            self.llm_timeout = Duration::from_secs(secs);
        }
        if overrides.keep_lockfiles {
            self.exclude_lockfiles = false;
        }
        if overrides.grouped_headers {
            self.header_mode = HeaderMode::Grouped;
        }
        Ok(self)
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            exclude_lockfiles: self.exclude_lockfiles,
        }
    }
}

/// Parse a provider name, case-insensitively.
pub fn parse_provider(raw: &str) -> Result<Provider, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "claude" => Ok(Provider::Claude),
        "codex" => Ok(Provider::Codex),
        _ => Err(ConfigError::UnknownProvider(raw.to_string())),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 4] = [
        AUTHOR_NAME_ENV_VAR,
        AUTHOR_EMAIL_ENV_VAR,
        PROVIDER_ENV_VAR,
        TIMEOUT_ENV_VAR,
    ];

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars_unset(ALL_VARS, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config, Config::default());
        });
    }

    #[test]
    fn test_from_env_reads_all_values() {
        temp_env::with_vars(
            [
                (AUTHOR_NAME_ENV_VAR, Some("Bot")),
                (AUTHOR_EMAIL_ENV_VAR, Some("bot@example.com")),
                (PROVIDER_ENV_VAR, Some("Codex")),
                (TIMEOUT_ENV_VAR, Some("42")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(
                    config.author.unwrap().signature(),
                    "Bot <bot@example.com>"
                );
                assert_eq!(config.provider.primary, Provider::Codex);
                assert_eq!(config.provider.fallback, Provider::Claude);
                assert_eq!(config.llm_timeout, Duration::from_secs(42));
            },
        );
    }

    #[test]
    fn test_from_env_invalid_values_fall_back() {
        temp_env::with_vars(
            [
                (AUTHOR_NAME_ENV_VAR, None),
                (AUTHOR_EMAIL_ENV_VAR, None),
                (PROVIDER_ENV_VAR, Some("gpt")),
                (TIMEOUT_ENV_VAR, Some("soon")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.provider, ProviderSelection::default());
                assert_eq!(
                    config.llm_timeout,
                    Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS)
                );
            },
        );
    }

    #[test]
    fn test_from_env_partial_author_is_error() {
        temp_env::with_vars(
            [
                (AUTHOR_NAME_ENV_VAR, Some("Bot")),
                (AUTHOR_EMAIL_ENV_VAR, None),
                (PROVIDER_ENV_VAR, None),
                (TIMEOUT_ENV_VAR, None),
            ],
            || {
                assert_eq!(
                    Config::from_env(),
                    Err(ConfigError::IncompleteAuthor { present: "name" })
                );
            },
        );
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::default()
            .with_overrides(ConfigOverrides {
                author_name: Some("Me".to_string()),
                author_email: Some("me@example.com".to_string()),
                provider: Some(Provider::Codex),
                timeout_secs: Some(5),
                keep_lockfiles: true,
                grouped_headers: true,
            })
            .unwrap();

        assert_eq!(config.header_mode, HeaderMode::Grouped);
        assert_eq!(config.author.as_ref().unwrap().name, "Me");
        assert_eq!(config.provider.primary, Provider::Codex);
        assert_eq!(config.llm_timeout, Duration::from_secs(5));
        assert!(!config.filter_options().exclude_lockfiles);
    }

    #[test]
    fn test_override_email_only_keeps_env_name() {
        let base = Config {
            author: Some(AuthorIdentity {
                name: "Env".to_string(),
                email: "env@example.com".to_string(),
            }),
            ..Config::default()
        };
        let config = base
            .with_overrides(ConfigOverrides {
                author_email: Some("cli@example.com".to_string()),
                ..ConfigOverrides::default()
            })
            .unwrap();
        assert_eq!(config.author.unwrap().signature(), "Env <cli@example.com>");
    }

    #[test]
    fn test_override_partial_author_without_base_is_error() {
        let result = Config::default().with_overrides(ConfigOverrides {
            author_email: Some("cli@example.com".to_string()),
            ..ConfigOverrides::default()
        });
        assert_eq!(
            result,
            Err(ConfigError::IncompleteAuthor { present: "email" })
        );
    }

    #[test]
    fn test_parse_provider() {
        assert_eq!(parse_provider(" CLAUDE "), Ok(Provider::Claude));
        assert_eq!(parse_provider("codex"), Ok(Provider::Codex));
        assert!(parse_provider("other").is_err());
    }
}
