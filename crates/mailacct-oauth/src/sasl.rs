//! SASL authentication mechanisms.
//!
//! Implements:
//! - PLAIN (RFC 4616) - Basic username/password authentication
//! - OAUTHBEARER (RFC 7628) - Standard `OAuth2` authentication
//! - XOAUTH2 (Google/Microsoft proprietary) - Legacy `OAuth2` authentication

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Generates PLAIN initial response (RFC 4616).
///
/// Format: `\0<username>\0<password>` (base64 encoded)
///
/// # Example
///
/// ```
/// use mailacct_oauth::sasl::plain_response;
///
/// let response = plain_response("user@example.com", "password123");
/// assert_eq!(response, "AHVzZXJAZXhhbXBsZS5jb20AcGFzc3dvcmQxMjM=");
/// ```
#[must_use]
pub fn plain_response(username: &str, password: &str) -> String {
    // Empty authorization identity: act as the authentication identity
    let auth_string = format!("\0{username}\0{password}");
    STANDARD.encode(auth_string.as_bytes())
}

/// Builds the unencoded OAUTHBEARER initial response (RFC 7628).
///
/// Format: `n,a=<login>,\x01host=<host>\x01port=<port>\x01auth=Bearer <token>\x01\x01`
///
/// The `n,a=<login>,` prefix is the GS2 header; `\x01` separates the
/// key/value pairs that follow it.
#[must_use]
pub fn oauthbearer_payload(login: &str, host: &str, port: u16, token: &str) -> String {
    format!("n,a={login},\x01host={host}\x01port={port}\x01auth=Bearer {token}\x01\x01")
}

/// Generates OAUTHBEARER initial response (RFC 7628), base64 encoded.
///
/// # Arguments
///
/// * `login` - Authorization identity
/// * `host` - Server hostname the token is presented to
/// * `port` - Server port the token is presented to
/// * `token` - `OAuth2` access token
///
/// # Example
///
/// ```
/// use mailacct_oauth::sasl::oauthbearer_response;
///
/// let response = oauthbearer_response("user@example.com", "imap.example.com", 993, "ya29.a0...");
/// // Can be used with IMAP AUTHENTICATE OAUTHBEARER or SMTP AUTH OAUTHBEARER
/// ```
#[must_use]
pub fn oauthbearer_response(login: &str, host: &str, port: u16, token: &str) -> String {
    STANDARD.encode(oauthbearer_payload(login, host, port, token).as_bytes())
}

/// Generates XOAUTH2 initial response (Google/Microsoft proprietary).
///
/// Format: `user=<user>\x01auth=Bearer <token>\x01\x01`
#[must_use]
pub fn xoauth2_response(user: &str, token: &str) -> String {
    let auth_string = format!("user={user}\x01auth=Bearer {token}\x01\x01");
    STANDARD.encode(auth_string.as_bytes())
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

    fn decode(response: &str) -> String {
        String::from_utf8(STANDARD.decode(response).unwrap()).unwrap()
    }

    #[test]
    fn test_oauthbearer_payload_format() {
        let payload = oauthbearer_payload("alice", "mail.example.com", 993, "tok123");
        assert_eq!(
            payload,
            "n,a=alice,\x01host=mail.example.com\x01port=993\x01auth=Bearer tok123\x01\x01"
        );
    }

    #[test]
    fn test_oauthbearer_response_encodes_payload() {
        let response = oauthbearer_response("alice", "mail.example.com", 993, "tok123");
        assert_eq!(
            decode(&response),
            oauthbearer_payload("alice", "mail.example.com", 993, "tok123")
        );
    }

    #[test]
    fn test_oauthbearer_separators_are_control_bytes() {
        let payload = oauthbearer_payload("a", "h", 1, "t");
        assert_eq!(payload.bytes().filter(|&b| b == 0x01).count(), 5);
        assert!(payload.ends_with("\x01\x01"));
    }

    #[test]
    fn test_xoauth2_format() {
        let response = xoauth2_response("test@test.com", "abc");
        assert_eq!(decode(&response), "user=test@test.com\x01auth=Bearer abc\x01\x01");
    }

    #[test]
    fn test_plain_response_format() {
        let response = plain_response("test", "pass@word!");
        assert_eq!(decode(&response), "\0test\0pass@word!");
    }

    #[test]
    fn test_responses_are_base64() {
        let response = oauthbearer_response("user@example.com", "host", 143, "token");
        // Should not contain raw text, only base64 characters
        assert!(!response.contains("user@example.com"));
        assert!(!response.contains("token"));
        assert!(STANDARD.decode(&response).is_ok());
    }
}
