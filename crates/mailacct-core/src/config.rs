//! Per-protocol credential configuration.
//!
//! Configuration is read once and shared read-only by every resolution.
//! Lookups go through the protocol's [`Capabilities`] row, so a value set
//! for something a protocol cannot use is ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::account::{AccountType, Capabilities};
use crate::error::{Error, Result};

/// Values configured for one protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolOverrides {
    /// User name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Login name, when it differs from the user name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// Password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Command printing a fresh OAuth access token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_refresh_command: Option<String>,
}

/// Credential configuration for all protocols.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IMAP settings.
    pub imap: ProtocolOverrides,
    /// POP settings.
    pub pop: ProtocolOverrides,
    /// SMTP settings.
    pub smtp: ProtocolOverrides,
    /// NNTP settings.
    pub nntp: ProtocolOverrides,
}

impl Config {
    /// Loads configuration from a JSON file.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Default configuration file location.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mailacct")
            .join("config.json")
    }

    /// Raw settings for `kind`.
    #[must_use]
    pub const fn overrides(&self, kind: AccountType) -> &ProtocolOverrides {
        match kind {
            AccountType::Imap => &self.imap,
            AccountType::Pop => &self.pop,
            AccountType::Smtp => &self.smtp,
            AccountType::Nntp => &self.nntp,
        }
    }

    /// Configured user name for `kind`.
    #[must_use]
    pub fn user(&self, kind: AccountType) -> Option<&str> {
        self.lookup(kind, |c| c.user_override, |o| o.user.as_deref())
    }

    /// Configured login name for `kind`.
    #[must_use]
    pub fn login(&self, kind: AccountType) -> Option<&str> {
        self.lookup(kind, |c| c.login_override, |o| o.login.as_deref())
    }

    /// Configured password for `kind`.
    #[must_use]
    pub fn password(&self, kind: AccountType) -> Option<&str> {
        self.lookup(kind, |c| c.password_override, |o| o.password.as_deref())
    }

    /// Configured OAuth refresh command for `kind`.
    #[must_use]
    pub fn oauth_refresh_command(&self, kind: AccountType) -> Option<&str> {
        self.lookup(
            kind,
            |c| c.oauth,
            |o| o.oauth_refresh_command.as_deref(),
        )
    }

    fn lookup<'a>(
        &'a self,
        kind: AccountType,
        allowed: impl FnOnce(Capabilities) -> bool,
        field: impl FnOnce(&'a ProtocolOverrides) -> Option<&'a str>,
    ) -> Option<&'a str> {
        if !allowed(kind.capabilities()) {
            return None;
        }
        field(self.overrides(kind)).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use std::io::Write;

    use super::*;

    fn all_set(value: &str) -> ProtocolOverrides {
        ProtocolOverrides {
            user: Some(format!("{value}-user")),
            login: Some(format!("{value}-login")),
            password: Some(format!("{value}-pass")),
            oauth_refresh_command: Some(format!("{value}-cmd")),
        }
    }

    #[test]
    fn test_default_has_nothing() {
        let config = Config::default();
        for kind in AccountType::ALL {
            assert!(config.user(kind).is_none());
            assert!(config.login(kind).is_none());
            assert!(config.password(kind).is_none());
            assert!(config.oauth_refresh_command(kind).is_none());
        }
    }

    #[test]
    fn test_lookups_follow_capabilities() {
        let config = Config {
            imap: all_set("imap"),
            pop: all_set("pop"),
            smtp: all_set("smtp"),
            nntp: all_set("nntp"),
        };

        assert_eq!(config.login(AccountType::Imap), Some("imap-login"));
        assert_eq!(config.login(AccountType::Pop), None);
        assert_eq!(config.user(AccountType::Pop), Some("pop-user"));
        assert_eq!(config.user(AccountType::Smtp), None);
        assert_eq!(config.password(AccountType::Smtp), Some("smtp-pass"));
        assert_eq!(config.password(AccountType::Nntp), Some("nntp-pass"));
        assert_eq!(
            config.oauth_refresh_command(AccountType::Pop),
            Some("pop-cmd")
        );
        assert_eq!(config.oauth_refresh_command(AccountType::Nntp), None);
    }

    #[test]
    fn test_empty_values_are_absent() {
        let config = Config {
            imap: ProtocolOverrides {
                user: Some(String::new()),
                ..ProtocolOverrides::default()
            },
            ..Config::default()
        };
        assert!(config.user(AccountType::Imap).is_none());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"imap": {{"login": "alice@example.com", "oauth_refresh_command": "get-token"}}}}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.login(AccountType::Imap), Some("alice@example.com"));
        assert_eq!(
            config.oauth_refresh_command(AccountType::Imap),
            Some("get-token")
        );
        assert_eq!(config.smtp, ProtocolOverrides::default());
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(Config::load(file.path()), Err(Error::Config(_))));
    }

    #[test]
    fn test_default_path_ends_with_app_dir() {
        let path = Config::default_path();
        assert!(path.ends_with("mailacct/config.json"));
    }
}
