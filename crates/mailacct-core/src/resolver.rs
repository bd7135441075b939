//! Credential resolution.
//!
//! Each credential is taken, in order, from the account itself, from the
//! protocol's configuration, and finally from an interactive prompt. Once
//! a credential's flag is set, resolving it again does nothing.

use tracing::debug;

use crate::account::{Account, AccountFlag};
use crate::config::Config;
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::prompt::Prompter;

/// Fills in account credentials on demand.
#[derive(Debug)]
pub struct CredentialResolver<'a, P: ?Sized> {
    config: &'a Config,
    env: &'a Environment,
    prompter: &'a P,
}

impl<'a, P: Prompter + ?Sized> CredentialResolver<'a, P> {
    /// Creates a resolver.
    #[must_use]
    pub const fn new(config: &'a Config, env: &'a Environment, prompter: &'a P) -> Self {
        Self {
            config,
            env,
            prompter,
        }
    }

    /// Configuration consulted by this resolver.
    #[must_use]
    pub const fn config(&self) -> &'a Config {
        self.config
    }

    /// Ensures the account has a user name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonInteractive`] if nothing is configured and
    /// prompting is disabled, or [`Error::PromptFailed`] if the prompt
    /// is aborted.
    pub fn resolve_user(&self, account: &mut Account) -> Result<()> {
        if account.has(AccountFlag::User) {
            return Ok(());
        }

        if let Some(user) = self.config.user(account.kind()) {
            debug!("Using configured {} user for {}", account.kind(), account.host());
            account.set_user(user);
            return Ok(());
        }

        if !self.env.interactive() {
            return Err(Error::NonInteractive);
        }

        let label = format!("Username at {}: ", account.host());
        let user = self.prompter.prompt_text(&label, self.env.username())?;
        account.set_user(user);
        Ok(())
    }

    /// Ensures the account has a login name.
    ///
    /// Without a configured login the login is the user name, so this
    /// fails exactly when [`resolve_user`](Self::resolve_user) does.
    ///
    /// # Errors
    ///
    /// Returns the error from resolving the user name.
    pub fn resolve_login(&self, account: &mut Account) -> Result<()> {
        if account.has(AccountFlag::Login) {
            return Ok(());
        }

        if let Some(login) = self.config.login(account.kind()) {
            debug!("Using configured {} login for {}", account.kind(), account.host());
            account.set_login(login);
            return Ok(());
        }

        if let Err(e) = self.resolve_user(account) {
            debug!("Couldn't get user info for {}: {e}", account.host());
            return Err(e);
        }
        let user = account.user().unwrap_or_default().to_string();
        account.set_login(user);
        Ok(())
    }

    /// Ensures the account has a password.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonInteractive`] if nothing is configured and
    /// prompting is disabled, or [`Error::PromptFailed`] if the prompt
    /// is aborted.
    pub fn resolve_password(&self, account: &mut Account) -> Result<()> {
        if account.has(AccountFlag::Pass) {
            return Ok(());
        }

        if let Some(pass) = self.config.password(account.kind()) {
            debug!("Using configured {} password for {}", account.kind(), account.host());
            account.set_password(pass);
            return Ok(());
        }

        if !self.env.interactive() {
            return Err(Error::NonInteractive);
        }

        let who = account.login().or_else(|| account.user()).unwrap_or_default();
        let label = format!("Password for {who}@{}: ", account.host());
        let pass = self.prompter.prompt_secret(&label)?;
        account.set_password(pass);
        Ok(())
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
    use std::cell::RefCell;

    use super::*;
    use crate::account::AccountType;
    use crate::config::ProtocolOverrides;
    use crate::prompt::PromptError;

    /// Prompter that records labels and answers from a fixed reply.
    #[derive(Default)]
    struct Scripted {
        reply: Option<&'static str>,
        asked: RefCell<Vec<(String, Option<String>)>>,
    }

    impl Scripted {
        fn answering(reply: &'static str) -> Self {
            Self {
                reply: Some(reply),
                ..Self::default()
            }
        }

        fn answer(&self) -> std::result::Result<String, PromptError> {
            self.reply
                .map(str::to_string)
                .ok_or(PromptError::Cancelled)
        }
    }

    impl Prompter for Scripted {
        fn prompt_text(
            &self,
            label: &str,
            default: &str,
        ) -> std::result::Result<String, PromptError> {
            self.asked
                .borrow_mut()
                .push((label.to_string(), Some(default.to_string())));
            self.answer()
        }

        fn prompt_secret(&self, label: &str) -> std::result::Result<String, PromptError> {
            self.asked.borrow_mut().push((label.to_string(), None));
            self.answer()
        }
    }

    fn interactive() -> Environment {
        Environment::new("sysuser", true)
    }

    fn batch() -> Environment {
        Environment::new("sysuser", false)
    }

    fn imap() -> Account {
        Account::new(AccountType::Imap, "imap.example.com")
    }

    fn imap_config(overrides: ProtocolOverrides) -> Config {
        Config {
            imap: overrides,
            ..Config::default()
        }
    }

    mod user {
        use super::*;

        #[test]
        fn already_set_is_noop() {
            let config = Config::default();
            let env = batch();
            let prompter = Scripted::default();
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = imap().with_user("alice");
            resolver.resolve_user(&mut account).unwrap();
            assert_eq!(account.user(), Some("alice"));
            assert!(prompter.asked.borrow().is_empty());
        }

        #[test]
        fn configured_user_wins_over_prompt() {
            let config = imap_config(ProtocolOverrides {
                user: Some("configured".to_string()),
                ..ProtocolOverrides::default()
            });
            let env = interactive();
            let prompter = Scripted::answering("typed");
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = imap();
            resolver.resolve_user(&mut account).unwrap();
            assert_eq!(account.user(), Some("configured"));
            assert!(prompter.asked.borrow().is_empty());
        }

        #[test]
        fn non_interactive_fails() {
            let config = Config::default();
            let env = batch();
            let prompter = Scripted::answering("typed");
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = imap();
            assert!(matches!(
                resolver.resolve_user(&mut account),
                Err(Error::NonInteractive)
            ));
            assert!(account.user().is_none());
            assert!(prompter.asked.borrow().is_empty());
        }

        #[test]
        fn prompts_with_system_user_default() {
            let config = Config::default();
            let env = interactive();
            let prompter = Scripted::answering("typed");
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = imap();
            resolver.resolve_user(&mut account).unwrap();
            assert_eq!(account.user(), Some("typed"));
            assert_eq!(
                prompter.asked.borrow().as_slice(),
                [(
                    "Username at imap.example.com: ".to_string(),
                    Some("sysuser".to_string())
                )]
            );
        }

        #[test]
        fn cancelled_prompt_fails() {
            let config = Config::default();
            let env = interactive();
            let prompter = Scripted::default();
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = imap();
            assert!(matches!(
                resolver.resolve_user(&mut account),
                Err(Error::PromptFailed(PromptError::Cancelled))
            ));
            assert!(!account.has(AccountFlag::User));
        }

        #[test]
        fn smtp_ignores_configured_user() {
            let config = Config {
                smtp: ProtocolOverrides {
                    user: Some("configured".to_string()),
                    ..ProtocolOverrides::default()
                },
                ..Config::default()
            };
            let env = batch();
            let prompter = Scripted::default();
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = Account::new(AccountType::Smtp, "smtp.example.com");
            assert!(matches!(
                resolver.resolve_user(&mut account),
                Err(Error::NonInteractive)
            ));
        }

        #[test]
        fn idempotent() {
            let config = Config::default();
            let env = interactive();
            let prompter = Scripted::answering("typed");
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = imap();
            resolver.resolve_user(&mut account).unwrap();
            let first = account.clone();
            resolver.resolve_user(&mut account).unwrap();
            assert_eq!(account, first);
            assert_eq!(prompter.asked.borrow().len(), 1);
        }
    }

    mod login {
        use super::*;

        #[test]
        fn imap_login_override() {
            let config = imap_config(ProtocolOverrides {
                user: Some("user".to_string()),
                login: Some("login@example.com".to_string()),
                ..ProtocolOverrides::default()
            });
            let env = batch();
            let prompter = Scripted::default();
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = imap();
            resolver.resolve_login(&mut account).unwrap();
            assert_eq!(account.login(), Some("login@example.com"));
            assert!(account.user().is_none());
        }

        #[test]
        fn pop_login_override_is_ignored() {
            let config = Config {
                pop: ProtocolOverrides {
                    user: Some("popuser".to_string()),
                    login: Some("poplogin".to_string()),
                    ..ProtocolOverrides::default()
                },
                ..Config::default()
            };
            let env = batch();
            let prompter = Scripted::default();
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = Account::new(AccountType::Pop, "pop.example.com");
            resolver.resolve_login(&mut account).unwrap();
            assert_eq!(account.login(), Some("popuser"));
        }

        #[test]
        fn derived_from_user() {
            let config = Config::default();
            let env = batch();
            let prompter = Scripted::default();
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = imap().with_user("alice");
            resolver.resolve_login(&mut account).unwrap();
            assert_eq!(account.login(), Some("alice"));
        }

        #[test]
        fn fails_like_resolve_user() {
            let config = Config::default();
            let env = batch();
            let prompter = Scripted::default();
            let resolver = CredentialResolver::new(&config, &env, &prompter);

            let mut for_user = imap();
            let mut for_login = imap();
            let user_err = resolver.resolve_user(&mut for_user).unwrap_err();
            let login_err = resolver.resolve_login(&mut for_login).unwrap_err();
            assert!(matches!(user_err, Error::NonInteractive));
            assert!(matches!(login_err, Error::NonInteractive));
            assert!(!for_login.has(AccountFlag::Login));
        }

        #[test]
        fn prompted_user_becomes_login() {
            let config = Config::default();
            let env = interactive();
            let prompter = Scripted::answering("typed");
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = imap();
            resolver.resolve_login(&mut account).unwrap();
            assert_eq!(account.user(), Some("typed"));
            assert_eq!(account.login(), Some("typed"));

            resolver.resolve_login(&mut account).unwrap();
            assert_eq!(prompter.asked.borrow().len(), 1);
        }
    }

    mod password {
        use super::*;

        #[test]
        fn configured_password() {
            let config = imap_config(ProtocolOverrides {
                password: Some("secret".to_string()),
                ..ProtocolOverrides::default()
            });
            let env = batch();
            let prompter = Scripted::default();
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = imap();
            resolver.resolve_password(&mut account).unwrap();
            assert_eq!(account.password(), Some("secret"));
        }

        #[test]
        fn non_interactive_fails() {
            let config = Config::default();
            let env = batch();
            let prompter = Scripted::answering("typed");
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = imap().with_user("alice");
            assert!(matches!(
                resolver.resolve_password(&mut account),
                Err(Error::NonInteractive)
            ));
        }

        #[test]
        fn prompt_label_prefers_login() {
            let config = Config::default();
            let env = interactive();
            let prompter = Scripted::answering("pw");
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = imap().with_user("alice").with_login("alice@corp");
            resolver.resolve_password(&mut account).unwrap();
            assert_eq!(account.password(), Some("pw"));
            assert_eq!(
                prompter.asked.borrow()[0],
                ("Password for alice@corp@imap.example.com: ".to_string(), None)
            );
        }

        #[test]
        fn prompt_label_falls_back_to_user() {
            let config = Config::default();
            let env = interactive();
            let prompter = Scripted::answering("pw");
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = imap().with_user("alice");
            resolver.resolve_password(&mut account).unwrap();
            assert_eq!(
                prompter.asked.borrow()[0].0,
                "Password for alice@imap.example.com: "
            );
        }

        #[test]
        fn cancelled_prompt_fails() {
            let config = Config::default();
            let env = interactive();
            let prompter = Scripted::default();
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = imap().with_user("alice");
            assert!(matches!(
                resolver.resolve_password(&mut account),
                Err(Error::PromptFailed(PromptError::Cancelled))
            ));
            assert!(account.password().is_none());
        }

        #[test]
        fn unset_password_prompts_again() {
            let config = Config::default();
            let env = interactive();
            let prompter = Scripted::answering("pw");
            let resolver = CredentialResolver::new(&config, &env, &prompter);
            let mut account = imap().with_user("alice");

            resolver.resolve_password(&mut account).unwrap();
            resolver.resolve_password(&mut account).unwrap();
            assert_eq!(prompter.asked.borrow().len(), 1);

            account.unset_password();
            resolver.resolve_password(&mut account).unwrap();
            assert_eq!(prompter.asked.borrow().len(), 2);
            assert_eq!(account.password(), Some("pw"));
        }
    }
}
