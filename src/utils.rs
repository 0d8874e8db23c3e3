use std::error::Error;

/// Reduces a URI-encoded status such as `http://.../def/core#Active` to the part after
/// the final `#`. Values without `#` pass through.
pub(crate) fn status_from_uri(raw: &str) -> &str {
    match raw.rsplit_once('#') {
        Some((_, fragment)) => fragment,
        None => raw,
    }
}

/// Last path segment of a measure reference, e.g.
/// `http://.../id/measures/1029TH-level-downstage-i-15_min-mASD` -> `1029TH-level-downstage-i-15_min-mASD`.
pub(crate) fn last_path_segment(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Upper-cases the first character, leaving the rest alone ("level" -> "Level").
pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders an error and its sources as one line: "outer: inner: root".
pub(crate) fn describe_error(error: &(dyn Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
