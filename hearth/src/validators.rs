use std::sync::LazyLock;

use email_address::EmailAddress;
use regex::Regex;
use url::Url;

static HANDLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_]{1,32}$").unwrap_or_else(|err| panic!("invalid handle pattern: {err}"))
});

/// Returns `true` if the provided string is a syntactically valid email address.
pub fn is_valid_email(value: &str) -> bool {
    EmailAddress::is_valid(value)
}

/// Returns `true` if the provided string parses as a URL with a scheme.
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Returns `true` for 1-32 ASCII letters, digits or underscores.
pub fn is_valid_handle(value: &str) -> bool {
    HANDLE_PATTERN.is_match(value)
}
