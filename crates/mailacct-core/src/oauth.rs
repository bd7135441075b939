//! OAuth bearer tokens for account authentication.

use mailacct_oauth::refresh::{CommandRunner, fetch_refresh_token};
use mailacct_oauth::sasl;
use tracing::debug;

use crate::account::Account;
use crate::error::{Error, Result};
use crate::prompt::Prompter;
use crate::resolver::CredentialResolver;

/// SASL mechanism the token is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mechanism {
    /// OAUTHBEARER (RFC 7628).
    #[default]
    OAuthBearer,
    /// XOAUTH2 (Google/Microsoft proprietary).
    XOAuth2,
}

impl Mechanism {
    /// SASL mechanism name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OAuthBearer => "OAUTHBEARER",
            Self::XOAuth2 => "XOAUTH2",
        }
    }
}

/// Builds base64 SASL initial responses from a refresh command.
#[derive(Debug, Clone, Copy)]
pub struct OAuthBearerBuilder<'r, R> {
    runner: &'r R,
    mechanism: Mechanism,
}

impl<'r, R: CommandRunner> OAuthBearerBuilder<'r, R> {
    /// Creates a builder for OAUTHBEARER tokens.
    #[must_use]
    pub const fn new(runner: &'r R) -> Self {
        Self {
            runner,
            mechanism: Mechanism::OAuthBearer,
        }
    }

    /// Selects the SASL mechanism.
    #[must_use]
    pub const fn mechanism(mut self, mechanism: Mechanism) -> Self {
        self.mechanism = mechanism;
        self
    }

    /// Resolves the login, runs the protocol's refresh command and
    /// returns the encoded initial response.
    ///
    /// A login resolved here stays on the account even if a later step
    /// fails.
    ///
    /// # Errors
    ///
    /// Returns the login resolution error, [`Error::NoRefreshCommand`] if
    /// no command is configured for the protocol (nothing is spawned),
    /// or [`Error::OAuth`] if the command fails or prints no token.
    pub fn build<P: Prompter + ?Sized>(
        &self,
        resolver: &CredentialResolver<'_, P>,
        account: &mut Account,
    ) -> Result<String> {
        resolver.resolve_login(account)?;

        let command = resolver
            .config()
            .oauth_refresh_command(account.kind())
            .ok_or(Error::NoRefreshCommand(account.kind()))?;

        debug!(
            "Fetching {} token for {}",
            self.mechanism.as_str(),
            account.host()
        );
        let token = fetch_refresh_token(self.runner, command)?;
        let login = account.login().unwrap_or_default();

        Ok(match self.mechanism {
            Mechanism::OAuthBearer => {
                sasl::oauthbearer_response(login, account.host(), account.effective_port(), &token)
            }
            Mechanism::XOAuth2 => sasl::xoauth2_response(login, &token),
        })
    }
}
