//! Account record extraction

use super::date::reformat_expiry;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

/// Fields scraped from the CLI output
///
/// A field is `Some` only when its pattern matched. `username` decides
/// whether a command succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
}

impl ParsedAccount {
    pub fn is_success(&self) -> bool {
        self.username.is_some()
    }
}

/// Which [`ParsedAccount`] field a labeled pattern fills
#[derive(Debug, Clone, Copy)]
enum Field {
    Domain,
    Username,
    Password,
    Expired,
    Port,
}

fn labeled(label: &str, value: &str) -> Regex {
    Regex::new(&format!(r"{label}[ \t]*:[ \t]*({value})")).expect("field pattern is valid")
}

/// `<Label> : <value>` patterns; labels are case-sensitive
static LABELED_FIELDS: LazyLock<Vec<(Field, Regex)>> = LazyLock::new(|| {
    vec![
        (Field::Domain, labeled("Domain", ".+")),
        (Field::Username, labeled("Username", ".+")),
        (Field::Password, labeled("Password", ".+")),
        (Field::Expired, labeled("Expires (?:On|At)", ".+")),
        (Field::Port, labeled("Port UDP", r"\d+")),
    ]
});

/// `User <name> renewed until <date>!`
static RENEWED_SENTENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"User[ \t]+(\S+)[ \t]+renewed until[ \t]+([^!\n]+)!")
        .expect("renewal pattern is valid")
});

/// Extract an account record from normalized CLI output
///
/// The labeled fields are tried first. Only when they yield no username is
/// the renewal sentence consulted; if it matches and no domain was printed,
/// `fallback_domain` supplies one. It is never called otherwise.
pub fn extract<F>(text: &str, fallback_domain: F) -> ParsedAccount
where
    F: FnOnce() -> String,
{
    let mut account = ParsedAccount::default();

    for (field, pattern) in LABELED_FIELDS.iter() {
        let Some(value) = capture_value(pattern, text) else {
            continue;
        };
        let slot = match field {
            Field::Domain => &mut account.domain,
            Field::Username => &mut account.username,
            Field::Password => &mut account.password,
            Field::Expired => &mut account.expired,
            Field::Port => &mut account.port,
        };
        *slot = Some(value);
    }

    if account.username.is_none() {
        if let Some(caps) = RENEWED_SENTENCE.captures(text) {
            let username = caps[1].to_string();
            let raw_date = caps[2].trim();
            debug!("Renewal sentence matched for {}: {:?}", username, raw_date);

            account.expired =
                Some(reformat_expiry(raw_date).unwrap_or_else(|| raw_date.to_string()));
            account.username = Some(username);
            if account.domain.is_none() {
                account.domain = Some(fallback_domain());
            }
        }
    }

    account
}

/// First capture of `pattern`, trimmed; blank values count as no match
fn capture_value(pattern: &Regex, text: &str) -> Option<String> {
    let value = pattern.captures(text)?.get(1)?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}
