//! # mailacct-oauth
//!
//! SASL initial responses and `OAuth2` refresh-command plumbing for mail
//! protocols (IMAP/POP/SMTP).
//!
//! ## Features
//!
//! - **SASL mechanisms**: OAUTHBEARER (RFC 7628), XOAUTH2 (proprietary) and PLAIN (RFC 4616)
//! - **Refresh commands**: run an operator-configured command and take the
//!   first line of its output as the access token
//!
//! ## Quick Start
//!
//! ```no_run
//! use mailacct_oauth::refresh::{ShellRunner, fetch_refresh_token};
//! use mailacct_oauth::sasl::oauthbearer_response;
//!
//! # fn main() -> mailacct_oauth::Result<()> {
//! let token = fetch_refresh_token(&ShellRunner, "oauth2-refresh --account work")?;
//! let auth_string = oauthbearer_response("user@example.com", "imap.example.com", 993, &token);
//! // Send: AUTHENTICATE OAUTHBEARER {auth_string}
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod refresh;
pub mod sasl;

pub use error::{Error, Result};
pub use refresh::{ChildProcess, CommandRunner, ShellRunner, fetch_refresh_token};
