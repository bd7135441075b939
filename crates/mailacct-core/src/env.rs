//! Process environment consulted during resolution.

use std::io::IsTerminal;

/// Ambient user name and interaction mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    username: String,
    interactive: bool,
}

impl Environment {
    /// Creates an environment with explicit values.
    #[must_use]
    pub fn new(username: impl Into<String>, interactive: bool) -> Self {
        Self {
            username: username.into(),
            interactive,
        }
    }

    /// Reads the system user name from `USER`, `LOGNAME` or `USERNAME`,
    /// and allows prompting when standard input is a terminal.
    #[must_use]
    pub fn detect() -> Self {
        let username = ["USER", "LOGNAME", "USERNAME"]
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
            .unwrap_or_default();
        Self::new(username, std::io::stdin().is_terminal())
    }

    /// Disables prompting.
    #[must_use]
    pub fn non_interactive(mut self) -> Self {
        self.interactive = false;
        self
    }

    /// System user name; empty if unknown.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Whether the user may be prompted.
    #[must_use]
    pub const fn interactive(&self) -> bool {
        self.interactive
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_non_interactive_overrides_detection() {
        let env = Environment::new("alice", true).non_interactive();
        assert_eq!(env.username(), "alice");
        assert!(!env.interactive());
    }
}
