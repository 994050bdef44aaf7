//! Allowlist HTML sanitizer.
//!
//! Page bodies are author-trusted but unreviewed: the owner's scripts are
//! allowed to run (isolation is the renderer's job), but anything outside an
//! explicit allowlist of tags and attributes is removed outright. This is an
//! allowlist, not a blocklist: a vector we never heard of is excluded by
//! default instead of needing enumeration.
//!
//! The filter is a single-pass tokenizer, not a full HTML parse. Disallowed
//! elements lose their tags but keep their children; disallowed attributes
//! are dropped, never escaped-and-kept. `<script>`/`<style>` bodies are
//! carried verbatim as raw text. Output is canonical (lowercase names,
//! double-quoted values), which makes the filter idempotent.

use thiserror::Error;

/// Error raised on markup the tokenizer cannot terminate. The caller must
/// treat this as a render failure; partially sanitized output is never
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeError {
    #[error("Unterminated tag")]
    UnterminatedTag,
    #[error("Unterminated comment")]
    UnterminatedComment,
    #[error("Unterminated <{0}> element")]
    UnterminatedRawText(String),
}

/// Tags that survive sanitization. Sorted for binary search.
const ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "address", "article", "aside", "audio", "b", "blockquote", "body", "br",
    "button", "caption", "cite", "code", "col", "colgroup", "dd", "details", "div", "dl", "dt",
    "em", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "head",
    "header", "hr", "html", "i", "iframe", "img", "input", "label", "li", "link", "main",
    "mark", "meta", "nav", "ol", "option", "p", "picture", "pre", "q", "script", "section",
    "select", "small", "source", "span", "strong", "style", "sub", "summary", "sup", "table",
    "tbody", "td", "textarea", "tfoot", "th", "thead", "time", "title", "tr", "track", "u",
    "ul", "video",
];

/// Attributes that survive sanitization. Sorted for binary search.
const ALLOWED_ATTRIBUTES: &[&str] = &[
    "allow",
    "allowfullscreen",
    "async",
    "charset",
    "crossorigin",
    "defer",
    "frameborder",
    "href",
    "integrity",
    "referrerpolicy",
    "rel",
    "scrolling",
    "src",
    "target",
    "type",
];

/// Elements whose body is raw text: never tag-parsed, carried verbatim.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

fn is_allowed_tag(name: &str) -> bool {
    ALLOWED_TAGS.binary_search(&name).is_ok()
}

fn is_allowed_attribute(name: &str) -> bool {
    ALLOWED_ATTRIBUTES.binary_search(&name).is_ok()
}

fn is_raw_text_tag(name: &str) -> bool {
    RAW_TEXT_TAGS.contains(&name)
}

struct OpenTag {
    /// Lowercased element name.
    name: String,
    /// Lowercased attribute names with their raw values, in source order.
    attrs: Vec<(String, Option<String>)>,
    self_closing: bool,
}

/// Sanitizes an HTML body against the tag/attribute allowlist.
///
/// Applying the filter twice changes nothing: `sanitize(sanitize(x))`
/// equals `sanitize(x)` for any input that sanitizes at all.
pub fn sanitize(html: &str) -> Result<String, SanitizeError> {
    let bytes = html.as_bytes();
    // ASCII lowering preserves byte offsets, so `lower` can serve every
    // case-insensitive search while `html` supplies the emitted slices.
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut i = 0usize;

    while i < bytes.len() {
        match find_byte(bytes, b'<', i) {
            None => {
                out.push_str(&html[i..]);
                break;
            }
            Some(lt) => {
                out.push_str(&html[i..lt]);
                i = lt;
            }
        }

        match bytes.get(i + 1).copied() {
            None => {
                // Trailing '<' is plain text.
                out.push('<');
                i += 1;
            }
            Some(b'!') => {
                if lower[i..].starts_with("<!--") {
                    let end = lower[i + 4..]
                        .find("-->")
                        .ok_or(SanitizeError::UnterminatedComment)?;
                    i = i + 4 + end + 3;
                } else if lower[i..].starts_with("<!doctype") {
                    let end = find_byte(bytes, b'>', i).ok_or(SanitizeError::UnterminatedTag)?;
                    out.push_str(&html[i..=end]);
                    i = end + 1;
                } else {
                    // Other markup declarations (CDATA and friends) are dropped.
                    let end = find_byte(bytes, b'>', i).ok_or(SanitizeError::UnterminatedTag)?;
                    i = end + 1;
                }
            }
            Some(b'?') => {
                // Processing instructions are dropped.
                let end = find_byte(bytes, b'>', i).ok_or(SanitizeError::UnterminatedTag)?;
                i = end + 1;
            }
            Some(b'/') => {
                let name_start = i + 2;
                let name_end = scan_name(bytes, name_start);
                let end =
                    find_byte(bytes, b'>', name_start).ok_or(SanitizeError::UnterminatedTag)?;
                if name_end > name_start {
                    let name = &lower[name_start..name_end];
                    if is_allowed_tag(name) {
                        out.push_str("</");
                        out.push_str(name);
                        out.push('>');
                    }
                }
                i = end + 1;
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let (tag, after) = parse_open_tag(html, &lower, i)?;
                i = after;
                if is_allowed_tag(&tag.name) {
                    emit_tag(&mut out, &tag);
                    if is_raw_text_tag(&tag.name) && !tag.self_closing {
                        let close_pat = format!("</{}", tag.name);
                        let rel = lower[i..]
                            .find(&close_pat)
                            .ok_or_else(|| SanitizeError::UnterminatedRawText(tag.name.clone()))?;
                        let close_start = i + rel;
                        out.push_str(&html[i..close_start]);
                        let gt = find_byte(bytes, b'>', close_start)
                            .ok_or(SanitizeError::UnterminatedTag)?;
                        out.push_str("</");
                        out.push_str(&tag.name);
                        out.push('>');
                        i = gt + 1;
                    }
                }
            }
            _ => {
                // '<' not opening anything tag-like is plain text.
                out.push('<');
                i += 1;
            }
        }
    }

    Ok(out)
}

fn find_byte(bytes: &[u8], needle: u8, from: usize) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == needle).map(|p| from + p)
}

fn scan_name(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    i
}

fn parse_open_tag(
    html: &str,
    lower: &str,
    start: usize,
) -> Result<(OpenTag, usize), SanitizeError> {
    let bytes = html.as_bytes();
    let name_start = start + 1;
    let mut i = scan_name(bytes, name_start);
    let name = lower[name_start..i].to_string();
    let mut attrs = Vec::new();
    let mut self_closing = false;

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            return Err(SanitizeError::UnterminatedTag);
        }
        match bytes[i] {
            b'>' => {
                i += 1;
                break;
            }
            b'/' => {
                if bytes.get(i + 1) == Some(&b'>') {
                    self_closing = true;
                    i += 2;
                    break;
                }
                i += 1;
            }
            _ => {
                let an_start = i;
                while i < bytes.len()
                    && !bytes[i].is_ascii_whitespace()
                    && !matches!(bytes[i], b'=' | b'>' | b'/')
                {
                    i += 1;
                }
                if i == an_start {
                    // Stray byte that can't start an attribute name.
                    i += 1;
                    continue;
                }
                let attr_name = lower[an_start..i].to_string();

                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                let mut value = None;
                if i < bytes.len() && bytes[i] == b'=' {
                    i += 1;
                    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    if i >= bytes.len() {
                        return Err(SanitizeError::UnterminatedTag);
                    }
                    match bytes[i] {
                        quote @ (b'"' | b'\'') => {
                            let v_start = i + 1;
                            let v_end = find_byte(bytes, quote, v_start)
                                .ok_or(SanitizeError::UnterminatedTag)?;
                            value = Some(html[v_start..v_end].to_string());
                            i = v_end + 1;
                        }
                        _ => {
                            let v_start = i;
                            while i < bytes.len()
                                && !bytes[i].is_ascii_whitespace()
                                && bytes[i] != b'>'
                            {
                                i += 1;
                            }
                            value = Some(html[v_start..i].to_string());
                        }
                    }
                }
                attrs.push((attr_name, value));
            }
        }
    }

    Ok((
        OpenTag {
            name,
            attrs,
            self_closing,
        },
        i,
    ))
}

fn emit_tag(out: &mut String, tag: &OpenTag) {
    out.push('<');
    out.push_str(&tag.name);
    for (name, value) in &tag.attrs {
        if !is_allowed_attribute(name) {
            continue;
        }
        out.push(' ');
        out.push_str(name);
        if let Some(value) = value {
            out.push_str("=\"");
            // Only the quote needs escaping; entities already present are
            // left alone so a second pass changes nothing.
            out.push_str(&value.replace('"', "&quot;"));
            out.push('"');
        }
    }
    if tag.self_closing {
        out.push_str(" />");
    } else {
        out.push('>');
    }
}
