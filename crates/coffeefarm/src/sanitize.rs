//! Scrubbing for values that end up in logs and error messages.

/// Longest server error body kept in an error message.
pub const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Replaces userinfo in a URL with `****`, so
/// `http://user:pw@host/api` logs as `http://****@host/api`.
pub fn redact_url(url: &str) -> String {
    if let Some(scheme_end) = url.find("://") {
        let after_scheme = &url[scheme_end + 3..];
        let authority_end = after_scheme.find('/').unwrap_or(after_scheme.len());
        if let Some(at_pos) = after_scheme[..authority_end].rfind('@') {
            return format!(
                "{}****@{}",
                &url[..scheme_end + 3],
                &after_scheme[at_pos + 1..]
            );
        }
    }
    url.to_string()
}

/// Cuts `body` to [`MAX_ERROR_BODY_LENGTH`] characters on a char boundary.
pub fn truncate_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY_LENGTH) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// Shortens a bearer token for debug output: first and last four chars.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

/// Summarises a data URI without its payload.
pub fn describe_data_uri(uri: &str) -> String {
    match uri.split_once(',') {
        Some((header, payload)) if header.starts_with("data:") => {
            format!("{} ({} chars)", header, payload.len())
        }
        _ => format!("<{} chars>", uri.len()),
    }
}
