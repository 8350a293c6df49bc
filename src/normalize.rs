use url::Url;

use crate::error::NormalizeError;

/// Characters dropped from display names besides whitespace.
const NAME_SEPARATORS: &[char] = &['.', '-', '_'];

/// Collapse a display name into a lookup token: `"Fox Code"`, `"fox.code"` and
/// `"  FOXCODE "` all become `"foxcode"`.
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && !NAME_SEPARATORS.contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercased hostname of `raw` without a leading `www.`.
pub fn normalize_host(raw: &str) -> Result<String, NormalizeError> {
    let invalid = |reason: String| NormalizeError::InvalidUrl {
        input: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| invalid("URL has no host".to_string()))?;

    let host = host.trim_end_matches('.').to_ascii_lowercase();
    Ok(match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    })
}
