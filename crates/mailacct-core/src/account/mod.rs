//! Account module.
//!
//! Provides the account model, identity matching and URL conversion.

mod connection_url;
mod flags;
mod matcher;
mod model;

pub use connection_url::{ConnectionUrl, Scheme};
pub use flags::{AccountFlag, AccountFlags};
pub use matcher::AccountMatcher;
pub use model::{Account, AccountType, Capabilities};
