//! Static lookup tables for identity resolution.
//!
//! Aliases are stored pre-normalized (see [`crate::normalize::normalize_name`]).
//! Domains match the host itself or any subdomain of it.

/// Every key the monitoring feed reports on.
pub const MONITORED_PROVIDERS: &[&str] = &[
    "88code",
    "aicodemirror",
    "anyrouter",
    "augmunt",
    "duckcoding",
    "foxcode",
    "galaxycode",
    "instcopilot",
    "packycode",
    "privnode",
    "rightcodes",
    "xyai",
];

/// Normalized display name -> monitored key.
pub const NAME_ALIASES: &[(&str, &str)] = &[
    ("88code", "88code"),
    ("88codeai", "88code"),
    ("aicodemirror", "aicodemirror"),
    ("anyrouter", "anyrouter"),
    ("augmunt", "augmunt"),
    ("duckcoding", "duckcoding"),
    ("duckcode", "duckcoding"),
    ("foxcode", "foxcode"),
    ("galaxycode", "galaxycode"),
    ("instcopilot", "instcopilot"),
    ("packycode", "packycode"),
    ("packyapi", "packycode"),
    ("privnode", "privnode"),
    ("rightcodes", "rightcodes"),
    ("rightcode", "rightcodes"),
    ("xyai", "xyai"),
];

/// Domain suffix -> monitored key.
pub const DOMAIN_ALIASES: &[(&str, &str)] = &[
    ("88code.org", "88code"),
    ("88code.com", "88code"),
    ("aicodemirror.com", "aicodemirror"),
    ("anyrouter.top", "anyrouter"),
    ("augmunt.com", "augmunt"),
    ("duckcoding.com", "duckcoding"),
    ("foxcode.io", "foxcode"),
    ("foxcode.rjj.cc", "foxcode"),
    ("galaxycode.ai", "galaxycode"),
    ("instcopilot-api.com", "instcopilot"),
    ("packyapi.com", "packycode"),
    ("packycode.com", "packycode"),
    ("privnode.com", "privnode"),
    ("right.codes", "rightcodes"),
    ("xyai.io", "xyai"),
];

pub fn lookup_name(normalized: &str) -> Option<&'static str> {
    NAME_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, key)| *key)
}

pub fn lookup_domain(host: &str) -> Option<&'static str> {
    DOMAIN_ALIASES
        .iter()
        .find(|(suffix, _)| host_matches(host, suffix))
        .map(|(_, key)| *key)
}

fn host_matches(host: &str, suffix: &str) -> bool {
    host == suffix
        || host
            .strip_suffix(suffix)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
