//! Clean captured output before it is shown or logged

use std::sync::LazyLock;

use regex::{Captures, Regex};

static ANSI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]|\x1b[()][0-9A-Za-z]|\x1b[=>]")
        .expect("ANSI regex is valid")
});
static IPV4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").expect("IPv4 regex is valid")
});
static MAC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-fA-F0-9:]{17}|[a-fA-F0-9]{12}").expect("MAC regex is valid")
});
static IPV6: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9A-Fa-f]{1,4}:[0-9A-Fa-f]{1,4}:[0-9A-Fa-f]{1,4}:")
        .expect("IPv6 regex is valid")
});

/// Address prefixes left readable: private, loopback and broadcast ranges
const KEPT_IPV4_PREFIXES: [&str; 5] = ["192.168.", "10.", "127.", "0.", "255"];

/// Shorter user names would mask ordinary words
const MIN_USER_LEN: usize = 3;

/// Remove terminal escape sequences.
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    ANSI.replace_all(text, "").into_owned()
}

/// Mask public IPv4 addresses, MAC addresses, IPv6 prefixes and the user name.
#[must_use]
pub fn redact(text: &str, user: Option<&str>) -> String {
    let text = IPV4.replace_all(text, |caps: &Captures| {
        let ip = &caps[0];
        if KEPT_IPV4_PREFIXES.iter().any(|p| ip.starts_with(p)) {
            ip.to_string()
        } else {
            "[**ipv4**]".to_string()
        }
    });
    let text = MAC.replace_all(&text, "[**filter**]");
    let text = IPV6.replace_all(&text, "[**ipv6**]");
    match user {
        Some(user) if user.len() >= MIN_USER_LEN => text.replace(user, "[**$USER**]"),
        _ => text.into_owned(),
    }
}

/// Strip escapes and, when `redact_output` is set, mask private data.
#[must_use]
pub fn clean(text: &str, redact_output: bool, user: Option<&str>) -> String {
    let text = strip_ansi(text);
    if redact_output {
        redact(&text, user)
    } else {
        text
    }
}
