//! Account field flags.

use std::ops::BitOr;

/// A single account flag.
///
/// Each credential flag records that the matching [`Account`](super::Account)
/// field holds a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountFlag {
    /// `user` is set.
    User,
    /// `login` is set.
    Login,
    /// `pass` is set.
    Pass,
    /// `port` is set.
    Port,
    /// The connection uses implicit TLS.
    Ssl,
}

impl AccountFlag {
    const fn bit(self) -> u8 {
        match self {
            Self::User => 1,
            Self::Login => 1 << 1,
            Self::Pass => 1 << 2,
            Self::Port => 1 << 3,
            Self::Ssl => 1 << 4,
        }
    }
}

/// Set of account flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AccountFlags(u8);

impl AccountFlags {
    /// Creates an empty flag set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns true if `flag` is set.
    #[must_use]
    pub const fn contains(self, flag: AccountFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    /// Sets `flag`.
    pub const fn insert(&mut self, flag: AccountFlag) {
        self.0 |= flag.bit();
    }

    /// Clears `flag`.
    pub const fn remove(&mut self, flag: AccountFlag) {
        self.0 &= !flag.bit();
    }

    /// Returns true if no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<AccountFlag> for AccountFlags {
    fn from(flag: AccountFlag) -> Self {
        Self(flag.bit())
    }
}

impl BitOr for AccountFlag {
    type Output = AccountFlags;

    fn bitor(self, rhs: Self) -> AccountFlags {
        AccountFlags(self.bit() | rhs.bit())
    }
}

impl BitOr<AccountFlag> for AccountFlags {
    type Output = Self;

    fn bitor(self, rhs: AccountFlag) -> Self {
        Self(self.0 | rhs.bit())
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

    #[test]
    fn test_empty() {
        let flags = AccountFlags::empty();
        assert!(flags.is_empty());
        assert!(!flags.contains(AccountFlag::User));
    }

    #[test]
    fn test_insert_and_remove() {
        let mut flags = AccountFlags::empty();
        flags.insert(AccountFlag::Pass);
        flags.insert(AccountFlag::User);
        assert!(flags.contains(AccountFlag::Pass));
        assert!(flags.contains(AccountFlag::User));
        assert!(!flags.contains(AccountFlag::Login));

        flags.remove(AccountFlag::Pass);
        assert!(!flags.contains(AccountFlag::Pass));
        assert!(flags.contains(AccountFlag::User));
    }

    #[test]
    fn test_bitor() {
        let flags = AccountFlag::User | AccountFlag::Port | AccountFlag::Ssl;
        assert!(flags.contains(AccountFlag::User));
        assert!(flags.contains(AccountFlag::Port));
        assert!(flags.contains(AccountFlag::Ssl));
        assert!(!flags.contains(AccountFlag::Login));
    }
}
