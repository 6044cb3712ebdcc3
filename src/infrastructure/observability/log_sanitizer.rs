const MAX_LOGGED_CHARS: usize = 200;

const SECRET_MARKERS: [&str; 5] = ["Bearer ", "api_key=", "x-api-key: ", "\"api_key\":\"", "token="];

/// Shortens upstream response bodies for logging and masks credentials echoed back
/// by providers.
pub fn sanitize_for_log(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total = trimmed.chars().count();
    let mut out = if total > MAX_LOGGED_CHARS {
        let head: String = trimmed.chars().take(MAX_LOGGED_CHARS).collect();
        format!("{}... ({} chars total)", head, total)
    } else {
        trimmed.to_string()
    };

    for marker in SECRET_MARKERS {
        out = redact_after(&out, marker);
    }
    out
}

fn redact_after(text: &str, marker: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(idx) = rest.find(marker) {
        let value_start = idx + marker.len();
        result.push_str(&rest[..value_start]);
        result.push_str("[REDACTED]");

        let tail = &rest[value_start..];
        let value_len = tail
            .find(|c: char| c.is_whitespace() || matches!(c, '&' | '"' | '\'' | ',' | '}'))
            .unwrap_or(tail.len());
        rest = &tail[value_len..];
    }

    result.push_str(rest);
    result
}
