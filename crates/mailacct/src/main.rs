//! `mailacct` - resolve mail account credentials from the command line.

mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use mailacct_core::{
    Account, AccountMatcher, Config, ConnectionUrl, CredentialResolver, Environment, Mechanism,
    OAuthBearerBuilder,
};
use mailacct_oauth::ShellRunner;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use terminal::TerminalPrompter;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Never prompt; fail if a credential is not configured
    #[arg(long, global = true)]
    batch: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve the login name for an account URL
    Login {
        /// Account URL, e.g. imaps://imap.example.com
        url: String,
    },
    /// Print a base64 SASL token built from the configured refresh command
    Token {
        /// Account URL, e.g. smtps://alice@smtp.example.com
        url: String,
        /// Build an XOAUTH2 token instead of OAUTHBEARER
        #[arg(long)]
        xoauth2: bool,
    },
    /// Exit successfully if two account URLs name the same login
    Match {
        /// First account URL
        first: String,
        /// Second account URL
        second: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailacct=info,mailacct_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    debug!("Loaded config from {}", config_path.display());

    let mut env = Environment::detect();
    if cli.batch {
        env = env.non_interactive();
    }

    let resolver = CredentialResolver::new(&config, &env, &TerminalPrompter);

    match cli.command {
        Command::Login { url } => {
            let mut account = parse_account(&url)?;
            resolver.resolve_login(&mut account)?;
            println!(
                "{}@{}:{}",
                account.login().unwrap_or_default(),
                account.host(),
                account.effective_port()
            );
        }
        Command::Token { url, xoauth2 } => {
            let mut account = parse_account(&url)?;
            let mechanism = if xoauth2 {
                Mechanism::XOAuth2
            } else {
                Mechanism::OAuthBearer
            };
            let token = OAuthBearerBuilder::new(&ShellRunner)
                .mechanism(mechanism)
                .build(&resolver, &mut account)?;
            info!("Built {} token for {}", mechanism.as_str(), account.host());
            println!("{token}");
        }
        Command::Match { first, second } => {
            let a1 = parse_account(&first)?;
            let a2 = parse_account(&second)?;
            if !AccountMatcher::new(&config, &env).matches(&a1, &a2) {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Builds an account from URL text, taking protocol and TLS from the scheme.
fn parse_account(text: &str) -> anyhow::Result<Account> {
    let url: ConnectionUrl = text.parse()?;
    let Some(kind) = url.scheme.account_type() else {
        bail!("unsupported URL scheme in {text}");
    };

    let mut account = Account::from_url(kind, &url)?;
    if url.scheme.is_secure() {
        account.set_ssl();
    }
    Ok(account)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;
    use mailacct_core::AccountType;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_account_sets_ssl_from_scheme() {
        let account = parse_account("smtps://alice@smtp.example.com").unwrap();
        assert_eq!(account.kind(), AccountType::Smtp);
        assert!(account.ssl());
        assert_eq!(account.user(), Some("alice"));
        assert_eq!(account.effective_port(), 465);
    }

    #[test]
    fn test_parse_account_rejects_unknown_scheme() {
        assert!(parse_account("http://example.com").is_err());
    }

    #[test]
    fn test_parse_account_requires_host() {
        assert!(parse_account("imap:INBOX").is_err());
    }
}
