// src/utils.rs
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static OTP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6}$").expect("valid otp regex"));

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid name regex"));

/// Syntactic email check, same rule the forms have always used
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Exactly six ASCII digits
pub fn is_valid_otp(code: &str) -> bool {
    OTP_RE.is_match(code)
}

/// Letters and whitespace only
pub fn is_plain_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Content type for the CV formats the API accepts
pub fn content_type_for(file_name: &str) -> Option<&'static str> {
    match get_file_extension(file_name).as_deref() {
        Some("pdf") => Some("application/pdf"),
        Some("doc") => Some("application/msword"),
        Some("docx") => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        _ => None,
    }
}

/// Keep only the last path component so a server-provided name can't escape the target dir
pub fn safe_file_name(name: &str, fallback: &str) -> String {
    let candidate = name
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .unwrap_or_default();

    if candidate.is_empty() || candidate == "." || candidate == ".." {
        fallback.to_string()
    } else {
        candidate.to_string()
    }
}

/// Append `endpoint` to `base` unless it is already an absolute URL
pub fn join_url(base: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return endpoint.to_string();
    }

    let base = base.trim_end_matches('/');
    if endpoint.starts_with('/') {
        format!("{}{}", base, endpoint)
    } else {
        format!("{}/{}", base, endpoint)
    }
}
