//! Account model types.

use serde::{Deserialize, Serialize};

use super::flags::{AccountFlag, AccountFlags};

/// Protocol an account connects with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// IMAP mail retrieval.
    Imap,
    /// POP3 mail retrieval.
    Pop,
    /// SMTP mail submission.
    Smtp,
    /// NNTP news access.
    Nntp,
}

/// What a protocol can take from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// A configured user name applies.
    pub user_override: bool,
    /// A configured login name applies.
    pub login_override: bool,
    /// A configured password applies.
    pub password_override: bool,
    /// OAuth bearer tokens can be built.
    pub oauth: bool,
}

impl AccountType {
    /// All account types.
    pub const ALL: [Self; 4] = [Self::Imap, Self::Pop, Self::Smtp, Self::Nntp];

    /// Returns the capability row for this protocol.
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Self::Imap => Capabilities {
                user_override: true,
                login_override: true,
                password_override: true,
                oauth: true,
            },
            Self::Pop => Capabilities {
                user_override: true,
                login_override: false,
                password_override: true,
                oauth: true,
            },
            Self::Smtp => Capabilities {
                user_override: false,
                login_override: false,
                password_override: true,
                oauth: true,
            },
            Self::Nntp => Capabilities {
                user_override: true,
                login_override: false,
                password_override: true,
                oauth: false,
            },
        }
    }

    /// Get default port, with or without implicit TLS.
    #[must_use]
    pub const fn default_port(self, ssl: bool) -> u16 {
        match (self, ssl) {
            (Self::Imap, false) => 143,
            (Self::Imap, true) => 993,
            (Self::Pop, false) => 110,
            (Self::Pop, true) => 995,
            (Self::Smtp, false) => 25,
            (Self::Smtp, true) => 465,
            (Self::Nntp, false) => 119,
            (Self::Nntp, true) => 563,
        }
    }

    /// Get display name for the protocol.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Imap => "IMAP",
            Self::Pop => "POP",
            Self::Smtp => "SMTP",
            Self::Nntp => "NNTP",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A remote endpoint and the credentials resolved for it so far.
///
/// Credential fields are only readable while their flag is set; the
/// accessors return `None` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub(super) kind: AccountType,
    pub(super) host: String,
    pub(super) port: u16,
    pub(super) user: String,
    pub(super) login: String,
    pub(super) pass: String,
    pub(super) flags: AccountFlags,
}

impl Account {
    /// Create an account for `host` with no credentials resolved.
    #[must_use]
    pub fn new(kind: AccountType, host: impl Into<String>) -> Self {
        Self {
            kind,
            host: host.into(),
            port: 0,
            user: String::new(),
            login: String::new(),
            pass: String::new(),
            flags: AccountFlags::empty(),
        }
    }

    /// Protocol of this account.
    #[must_use]
    pub const fn kind(&self) -> AccountType {
        self.kind
    }

    /// Server hostname.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Current flags.
    #[must_use]
    pub const fn flags(&self) -> AccountFlags {
        self.flags
    }

    /// Returns true if `flag` is set.
    #[must_use]
    pub const fn has(&self, flag: AccountFlag) -> bool {
        self.flags.contains(flag)
    }

    /// Explicit port, if one was given.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        if self.has(AccountFlag::Port) {
            Some(self.port)
        } else {
            None
        }
    }

    /// Explicit port, or the protocol default for the SSL setting.
    #[must_use]
    pub const fn effective_port(&self) -> u16 {
        match self.port() {
            Some(port) => port,
            None => self.kind.default_port(self.ssl()),
        }
    }

    /// Resolved user name.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.has(AccountFlag::User).then_some(self.user.as_str())
    }

    /// Resolved login name.
    #[must_use]
    pub fn login(&self) -> Option<&str> {
        self.has(AccountFlag::Login).then_some(self.login.as_str())
    }

    /// Resolved password.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.has(AccountFlag::Pass).then_some(self.pass.as_str())
    }

    /// Whether the connection uses implicit TLS.
    #[must_use]
    pub const fn ssl(&self) -> bool {
        self.has(AccountFlag::Ssl)
    }

    /// Set an explicit port.
    pub fn set_port(&mut self, port: u16) {
        self.port = port;
        self.flags.insert(AccountFlag::Port);
    }

    /// Set the user name.
    pub fn set_user(&mut self, user: impl Into<String>) {
        self.user = user.into();
        self.flags.insert(AccountFlag::User);
    }

    /// Set the login name.
    pub fn set_login(&mut self, login: impl Into<String>) {
        self.login = login.into();
        self.flags.insert(AccountFlag::Login);
    }

    /// Set the password.
    pub fn set_password(&mut self, pass: impl Into<String>) {
        self.pass = pass.into();
        self.flags.insert(AccountFlag::Pass);
    }

    /// Enable implicit TLS.
    pub fn set_ssl(&mut self) {
        self.flags.insert(AccountFlag::Ssl);
    }

    /// Forget the password so the next resolution fetches it again.
    ///
    /// Used after the server rejects the credentials.
    pub fn unset_password(&mut self) {
        self.flags.remove(AccountFlag::Pass);
    }

    /// Builder-style [`set_port`](Self::set_port).
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.set_port(port);
        self
    }

    /// Builder-style [`set_user`](Self::set_user).
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.set_user(user);
        self
    }

    /// Builder-style [`set_login`](Self::set_login).
    #[must_use]
    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.set_login(login);
        self
    }

    /// Builder-style [`set_password`](Self::set_password).
    #[must_use]
    pub fn with_password(mut self, pass: impl Into<String>) -> Self {
        self.set_password(pass);
        self
    }

    /// Builder-style [`set_ssl`](Self::set_ssl).
    #[must_use]
    pub fn with_ssl(mut self) -> Self {
        self.set_ssl();
        self
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

    mod account_type_tests {
        use super::*;

        #[test]
        fn default_ports() {
            assert_eq!(AccountType::Imap.default_port(false), 143);
            assert_eq!(AccountType::Imap.default_port(true), 993);
            assert_eq!(AccountType::Pop.default_port(true), 995);
            assert_eq!(AccountType::Smtp.default_port(true), 465);
            assert_eq!(AccountType::Nntp.default_port(false), 119);
        }

        #[test]
        fn only_imap_has_login_override() {
            for kind in AccountType::ALL {
                assert_eq!(
                    kind.capabilities().login_override,
                    kind == AccountType::Imap
                );
            }
        }

        #[test]
        fn nntp_has_no_oauth() {
            assert!(!AccountType::Nntp.capabilities().oauth);
            assert!(AccountType::Smtp.capabilities().oauth);
        }

        #[test]
        fn display() {
            assert_eq!(AccountType::Pop.to_string(), "POP");
        }
    }

    mod account_tests {
        use super::*;

        #[test]
        fn new_has_no_credentials() {
            let account = Account::new(AccountType::Imap, "imap.example.com");
            assert_eq!(account.host(), "imap.example.com");
            assert!(account.flags().is_empty());
            assert!(account.user().is_none());
            assert!(account.login().is_none());
            assert!(account.password().is_none());
            assert!(account.port().is_none());
            assert!(!account.ssl());
        }

        #[test]
        fn setters_set_flags() {
            let account = Account::new(AccountType::Smtp, "smtp.example.com")
                .with_user("alice")
                .with_login("alice@example.com")
                .with_password("secret")
                .with_port(587);
            assert_eq!(account.user(), Some("alice"));
            assert_eq!(account.login(), Some("alice@example.com"));
            assert_eq!(account.password(), Some("secret"));
            assert_eq!(account.port(), Some(587));
            assert!(account.has(AccountFlag::User));
            assert!(account.has(AccountFlag::Login));
        }

        #[test]
        fn effective_port_falls_back_to_default() {
            let plain = Account::new(AccountType::Imap, "h");
            assert_eq!(plain.effective_port(), 143);
            let tls = Account::new(AccountType::Imap, "h").with_ssl();
            assert_eq!(tls.effective_port(), 993);
            let explicit = Account::new(AccountType::Imap, "h").with_ssl().with_port(1993);
            assert_eq!(explicit.effective_port(), 1993);
        }

        #[test]
        fn unset_password_hides_password() {
            let mut account = Account::new(AccountType::Pop, "pop.example.com").with_password("pw");
            account.unset_password();
            assert!(account.password().is_none());
            assert!(!account.has(AccountFlag::Pass));
        }
    }
}
