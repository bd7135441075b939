//! # mailacct-core
//!
//! Account identity and credential resolution for mail protocol clients.
//!
//! This crate provides:
//! - The [`Account`] model shared by IMAP, POP, SMTP and NNTP clients
//! - [`AccountMatcher`] to tell whether an open session can serve an account
//! - Conversion between accounts and [`ConnectionUrl`]s
//! - [`CredentialResolver`] to fill in user, login and password from
//!   configuration or interactive prompts
//! - [`OAuthBearerBuilder`] to turn a refresh command into a SASL token
//!
//! ## Example
//!
//! ```no_run
//! use mailacct_core::{Account, AccountType, Config, CredentialResolver, Environment, Prompter, PromptError};
//!
//! struct NoPrompt;
//!
//! impl Prompter for NoPrompt {
//!     fn prompt_text(&self, _: &str, _: &str) -> Result<String, PromptError> {
//!         Err(PromptError::Cancelled)
//!     }
//!     fn prompt_secret(&self, _: &str) -> Result<String, PromptError> {
//!         Err(PromptError::Cancelled)
//!     }
//! }
//!
//! # fn main() -> mailacct_core::Result<()> {
//! let config = Config::load(Config::default_path())?;
//! let env = Environment::detect();
//! let resolver = CredentialResolver::new(&config, &env, &NoPrompt);
//!
//! let mut account = Account::new(AccountType::Imap, "imap.example.com").with_ssl();
//! resolver.resolve_login(&mut account)?;
//! resolver.resolve_password(&mut account)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod account;
pub mod config;
pub mod env;
mod error;
pub mod oauth;
pub mod prompt;
pub mod resolver;

pub use account::{
    Account, AccountFlag, AccountFlags, AccountMatcher, AccountType, Capabilities, ConnectionUrl,
    Scheme,
};
pub use config::{Config, ProtocolOverrides};
pub use env::Environment;
pub use error::{Error, Result};
pub use oauth::{Mechanism, OAuthBearerBuilder};
pub use prompt::{PromptError, Prompter};
pub use resolver::CredentialResolver;
