//! HTML escaping helpers.
//!
//! Small, allocation-light escapers for the three contexts the renderer writes
//! into: element text, attribute values and URLs inside attributes.

/// Escapes text for use inside an element body.
pub fn esc_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes text for use inside a quoted attribute value.
pub fn esc_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a URL for an `href`/`action` attribute.
///
/// Whitespace and control characters are dropped, and `javascript:`/`data:`
/// schemes are rejected (an empty string is returned).
pub fn esc_url(url: &str) -> String {
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();

    let lower = cleaned.to_ascii_lowercase();
    if lower.starts_with("javascript:") || lower.starts_with("data:") {
        return String::new();
    }

    esc_attr(&cleaned)
}

/// Tags kept by [`sanitize_post`]. Everything else is stripped.
pub const ALLOWED_POST_TAGS: &[&str] = &[
    "a", "abbr", "b", "br", "code", "del", "em", "i", "ins", "mark", "small", "span", "strong",
    "sub", "sup", "u",
];

/// Tags whose content is dropped along with the tag itself.
const DROP_CONTENT_TAGS: &[&str] = &["script", "style", "iframe", "object", "template"];

/// Reduces rich text to a safe inline subset.
///
/// Allowed tags are re-emitted without attributes, other tags are removed
/// (keeping their text), and script-like elements lose their content too.
/// Text between tags passes through untouched; a `<` that does not open a
/// tag is escaped.
pub fn sanitize_post(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let Some(end) = after.find('>') else {
            out.push_str("&lt;");
            rest = after;
            continue;
        };

        let inner = &after[..end];
        let closing = inner.starts_with('/');
        let name: String = inner
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        if name.is_empty() {
            out.push_str("&lt;");
            rest = after;
            continue;
        }

        rest = &after[end + 1..];

        if !closing && DROP_CONTENT_TAGS.contains(&name.as_str()) {
            let close = format!("</{}", name);
            match rest.to_ascii_lowercase().find(&close) {
                Some(pos) => {
                    let tail = &rest[pos..];
                    rest = tail.find('>').map_or("", |gt| &tail[gt + 1..]);
                }
                None => rest = "",
            }
            continue;
        }

        if ALLOWED_POST_TAGS.contains(&name.as_str()) {
            out.push('<');
            if closing {
                out.push('/');
            }
            out.push_str(&name);
            out.push('>');
        }
    }

    out.push_str(rest);
    out
}
