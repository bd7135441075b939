//! Account identity comparison.
//!
//! Two accounts match when a session opened for one can serve the other:
//! same protocol, host (case-insensitive) and port, and compatible users.
//! An account without an explicit user stands for the default user, which
//! is the configured user for the protocol or else the system user name.

use super::model::{Account, AccountType};
use crate::config::Config;
use crate::env::Environment;

/// Compares accounts against the configured default identity.
#[derive(Debug, Clone, Copy)]
pub struct AccountMatcher<'a> {
    config: &'a Config,
    system_user: &'a str,
}

impl<'a> AccountMatcher<'a> {
    /// Creates a matcher using `config` overrides and the system user from `env`.
    #[must_use]
    pub fn new(config: &'a Config, env: &'a Environment) -> Self {
        Self {
            config,
            system_user: env.username(),
        }
    }

    /// User an account of `kind` without an explicit user stands for.
    #[must_use]
    pub fn default_user(&self, kind: AccountType) -> &'a str {
        self.config.user(kind).unwrap_or(self.system_user)
    }

    /// Returns true if `a1` and `a2` name the same endpoint and login.
    ///
    /// Defaults are taken from `a1`'s protocol. For NNTP an account with
    /// an explicit user never matches one without, since anonymous and
    /// authenticated news access are not interchangeable.
    #[must_use]
    pub fn matches(&self, a1: &Account, a2: &Account) -> bool {
        if a1.kind != a2.kind {
            return false;
        }
        if !a1.host.eq_ignore_ascii_case(&a2.host) {
            return false;
        }
        if a1.effective_port() != a2.effective_port() {
            return false;
        }

        let user = self.default_user(a1.kind);

        match (a1.user(), a2.user()) {
            (Some(u1), Some(u2)) => u1 == u2,
            (u1, _) if a1.kind == AccountType::Nntp => u1.is_none_or(str::is_empty),
            (Some(u1), None) => u1 == user,
            (None, Some(u2)) => u2 == user,
            (None, None) => true,
        }
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
    use super::*;
    use crate::config::ProtocolOverrides;

    fn env() -> Environment {
        Environment::new("sysuser", false)
    }

    fn imap(host: &str) -> Account {
        Account::new(AccountType::Imap, host).with_port(993)
    }

    #[test]
    fn test_different_types_never_match() {
        let config = Config::default();
        let env = env();
        let matcher = AccountMatcher::new(&config, &env);
        let a1 = Account::new(AccountType::Imap, "mail.example.com").with_port(110);
        let a2 = Account::new(AccountType::Pop, "mail.example.com").with_port(110);
        assert!(!matcher.matches(&a1, &a2));
    }

    #[test]
    fn test_host_is_case_insensitive() {
        let config = Config::default();
        let env = env();
        let matcher = AccountMatcher::new(&config, &env);
        assert!(matcher.matches(&imap("Mail.Example.COM"), &imap("mail.example.com")));
        assert!(!matcher.matches(&imap("mail.example.com"), &imap("mail.example.org")));
    }

    #[test]
    fn test_port_must_match() {
        let config = Config::default();
        let env = env();
        let matcher = AccountMatcher::new(&config, &env);
        let a2 = Account::new(AccountType::Imap, "h").with_port(143);
        assert!(!matcher.matches(&imap("h"), &a2));
    }

    #[test]
    fn test_implicit_port_uses_protocol_default() {
        let config = Config::default();
        let env = env();
        let matcher = AccountMatcher::new(&config, &env);
        let implicit = Account::new(AccountType::Imap, "h").with_ssl();
        assert!(matcher.matches(&implicit, &imap("h")));
    }

    #[test]
    fn test_explicit_users_compare_exactly() {
        let config = Config::default();
        let env = env();
        let matcher = AccountMatcher::new(&config, &env);
        assert!(matcher.matches(&imap("h").with_user("bob"), &imap("h").with_user("bob")));
        assert!(!matcher.matches(&imap("h").with_user("bob"), &imap("h").with_user("Bob")));
    }

    #[test]
    fn test_one_explicit_user_compares_with_system_user() {
        let config = Config::default();
        let env = env();
        let matcher = AccountMatcher::new(&config, &env);
        assert!(matcher.matches(&imap("h").with_user("sysuser"), &imap("h")));
        assert!(matcher.matches(&imap("h"), &imap("h").with_user("sysuser")));
        assert!(!matcher.matches(&imap("h").with_user("bob"), &imap("h")));
        assert!(!matcher.matches(&imap("h"), &imap("h").with_user("bob")));
    }

    #[test]
    fn test_configured_user_replaces_system_user() {
        let config = Config {
            imap: ProtocolOverrides {
                user: Some("configured".to_string()),
                ..ProtocolOverrides::default()
            },
            ..Config::default()
        };
        let env = env();
        let matcher = AccountMatcher::new(&config, &env);
        assert_eq!(matcher.default_user(AccountType::Imap), "configured");
        assert!(matcher.matches(&imap("h").with_user("configured"), &imap("h")));
        assert!(!matcher.matches(&imap("h").with_user("sysuser"), &imap("h")));
    }

    #[test]
    fn test_smtp_ignores_configured_user() {
        let config = Config {
            smtp: ProtocolOverrides {
                user: Some("configured".to_string()),
                ..ProtocolOverrides::default()
            },
            ..Config::default()
        };
        let env = env();
        let matcher = AccountMatcher::new(&config, &env);
        assert_eq!(matcher.default_user(AccountType::Smtp), "sysuser");
    }

    #[test]
    fn test_no_explicit_users_match() {
        let config = Config::default();
        let env = env();
        let matcher = AccountMatcher::new(&config, &env);
        assert!(matcher.matches(&imap("h"), &imap("h")));
    }

    mod nntp {
        use super::*;

        fn news() -> Account {
            Account::new(AccountType::Nntp, "news.example.com").with_port(119)
        }

        #[test]
        fn explicit_user_never_matches_anonymous() {
            let config = Config::default();
            let env = env();
            let matcher = AccountMatcher::new(&config, &env);
            assert!(!matcher.matches(&news().with_user("sysuser"), &news()));
            assert!(!matcher.matches(&news().with_user("reader"), &news()));
        }

        #[test]
        fn anonymous_matches_anything_on_same_server() {
            let config = Config::default();
            let env = env();
            let matcher = AccountMatcher::new(&config, &env);
            assert!(matcher.matches(&news(), &news()));
            assert!(matcher.matches(&news(), &news().with_user("reader")));
        }

        #[test]
        fn empty_explicit_user_counts_as_anonymous() {
            let config = Config::default();
            let env = env();
            let matcher = AccountMatcher::new(&config, &env);
            assert!(matcher.matches(&news().with_user(""), &news()));
        }

        #[test]
        fn both_explicit_compare_exactly() {
            let config = Config::default();
            let env = env();
            let matcher = AccountMatcher::new(&config, &env);
            assert!(matcher.matches(&news().with_user("reader"), &news().with_user("reader")));
            assert!(!matcher.matches(&news().with_user("reader"), &news().with_user("other")));
        }
    }
}
