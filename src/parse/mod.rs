//! Parsing of the account CLI's console output
//!
//! The CLI prints human-oriented, colored text. This module turns it into an
//! [`ParsedAccount`] record in two steps:
//!
//! 1. [`ansi::normalize`] strips terminal escape sequences
//! 2. [`account::extract`] applies the labeled-field patterns, then the
//!    `User <name> renewed until <date>!` sentence when no username was found
//!
//! Parsing has no side effects of its own. The one environment lookup it may
//! need (the server domain) is passed in by the caller.

pub mod account;
pub mod ansi;
pub mod date;

pub use account::{extract, ParsedAccount};
pub use ansi::normalize;
pub use date::reformat_expiry;

/// Normalize and extract in one step
pub fn parse_output<F>(raw: &str, fallback_domain: F) -> ParsedAccount
where
    F: FnOnce() -> String,
{
    extract(&normalize(raw), fallback_domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colored_output() {
        let raw = "\x1b[1;32mDomain\x1b[0m : \x1b[33mvpn.example.com\x1b[0m\n\
                   \x1b[1;32mUsername\x1b[0m : alice\n\
                   \x1b[1;32mPassword\x1b[0m : hunter2\n\
                   \x1b[1;32mExpires On\x1b[0m : 26-11-2025 14:30\n\
                   \x1b[1;32mPort UDP\x1b[0m : 5667\n";

        let account = parse_output(raw, || panic!("domain lookup not needed"));

        assert_eq!(account.domain.as_deref(), Some("vpn.example.com"));
        assert_eq!(account.username.as_deref(), Some("alice"));
        assert_eq!(account.password.as_deref(), Some("hunter2"));
        assert_eq!(account.expired.as_deref(), Some("26-11-2025 14:30"));
        assert_eq!(account.port.as_deref(), Some("5667"));
    }

    #[test]
    fn test_parse_error_text() {
        let account = parse_output("No such file or directory (os error 2)", || {
            "unused".to_string()
        });
        assert!(!account.is_success());
    }
}
