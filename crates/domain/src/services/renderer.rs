//! Render planning for untrusted page bodies.
//!
//! Decides, per classification, how a sanitized body is executed:
//!
//! - Full documents run inside an isolated browsing context (`<iframe
//!   srcdoc>` with a sandbox policy). The embedded document may run its own
//!   scripts and mutate its own DOM, but it gets no same-origin access to the
//!   host: no cookies, no storage, no parent DOM.
//! - Fragments are inlined into the host document. Their `<script>` elements
//!   are lifted out of the markup and re-emitted separately so each one is
//!   registered with the host document exactly once, independent of how the
//!   surrounding markup gets injected.

use super::classifier::{classify, HtmlKind};
use super::sanitizer::{sanitize, SanitizeError};

/// Sandbox grants for an embedded full document.
///
/// `allow-scripts` is always granted (the owner's script is the point) and
/// `allow-same-origin` is never granted; it is deliberately not even a field.
/// Top-level navigation is an explicit opt-in, not a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SandboxPolicy {
    allow_popups: bool,
    allow_top_navigation_by_user_activation: bool,
}

impl SandboxPolicy {
    /// Default embed policy: scripts and popups, nothing else.
    pub fn embedded() -> Self {
        Self {
            allow_popups: true,
            allow_top_navigation_by_user_activation: false,
        }
    }

    /// Opts into gesture-gated top-level navigation.
    pub fn with_user_initiated_top_navigation(mut self) -> Self {
        self.allow_top_navigation_by_user_activation = true;
        self
    }

    /// The space-separated token list for the `sandbox` attribute.
    pub fn tokens(&self) -> String {
        let mut tokens = String::from("allow-scripts");
        if self.allow_popups {
            tokens.push_str(" allow-popups");
        }
        if self.allow_top_navigation_by_user_activation {
            tokens.push_str(" allow-top-navigation-by-user-activation");
        }
        tokens
    }
}

/// A `<script>` lifted out of a fragment, to be re-emitted by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentScript {
    /// Canonical open tag, e.g. `<script src="app.js" async>`.
    pub open_tag: String,
    /// Inline body; empty for external scripts.
    pub body: String,
}

/// How a page body is to be rendered.
#[derive(Debug, Clone)]
pub enum RenderPlan {
    /// Sanitized fragment markup plus its lifted scripts.
    InlineFragment {
        markup: String,
        scripts: Vec<FragmentScript>,
    },
    /// Sanitized full document for a sandboxed frame.
    SandboxedDocument {
        srcdoc: String,
        sandbox: SandboxPolicy,
    },
}

impl RenderPlan {
    /// Classifies and sanitizes a page body into a render plan.
    pub fn build(html: &str) -> Result<RenderPlan, SanitizeError> {
        match classify(html) {
            HtmlKind::FullDocument => Ok(RenderPlan::SandboxedDocument {
                srcdoc: sanitize(html)?,
                sandbox: SandboxPolicy::embedded(),
            }),
            HtmlKind::Fragment => {
                let sanitized = sanitize(html)?;
                let (markup, scripts) = extract_fragment_scripts(&sanitized);
                Ok(RenderPlan::InlineFragment { markup, scripts })
            }
        }
    }
}

/// Splits canonical sanitized fragment markup into script-free markup and the
/// scripts it contained, in source order.
///
/// Operates on sanitizer output only: names are lowercase and attribute
/// values double-quoted, so a light re-scan is reliable.
fn extract_fragment_scripts(sanitized: &str) -> (String, Vec<FragmentScript>) {
    let bytes = sanitized.as_bytes();
    let mut markup = String::with_capacity(sanitized.len());
    let mut scripts = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let Some(rel) = sanitized[i..].find('<') else {
            markup.push_str(&sanitized[i..]);
            break;
        };
        let lt = i + rel;
        markup.push_str(&sanitized[i..lt]);
        i = lt;

        if let Some(tag_end) = tag_end_at(bytes, i) {
            if starts_element(&sanitized[i..], "script") {
                let open = &sanitized[i..=tag_end];
                if open.ends_with("/>") {
                    // Self-closing script: no body, normalize the open tag.
                    let trimmed = open.trim_end_matches("/>").trim_end();
                    scripts.push(FragmentScript {
                        open_tag: format!("{trimmed}>"),
                        body: String::new(),
                    });
                    i = tag_end + 1;
                } else {
                    let body_start = tag_end + 1;
                    match sanitized[body_start..].find("</script>") {
                        Some(body_len) => {
                            scripts.push(FragmentScript {
                                open_tag: open.to_string(),
                                body: sanitized[body_start..body_start + body_len].to_string(),
                            });
                            i = body_start + body_len + "</script>".len();
                        }
                        None => {
                            // Cannot happen for sanitizer output; keep the
                            // remainder untouched rather than guessing.
                            markup.push_str(&sanitized[i..]);
                            i = bytes.len();
                        }
                    }
                }
            } else if starts_element(&sanitized[i..], "style") && !sanitized[i..=tag_end].ends_with("/>")
            {
                // Copy the whole raw-text element so its body is never
                // mistaken for markup.
                match sanitized[tag_end + 1..].find("</style>") {
                    Some(body_len) => {
                        let end = tag_end + 1 + body_len + "</style>".len();
                        markup.push_str(&sanitized[i..end]);
                        i = end;
                    }
                    None => {
                        markup.push_str(&sanitized[i..]);
                        i = bytes.len();
                    }
                }
            } else {
                markup.push_str(&sanitized[i..=tag_end]);
                i = tag_end + 1;
            }
        } else {
            // Bare '<' text.
            markup.push('<');
            i += 1;
        }
    }

    (markup, scripts)
}

/// Whether the input starts an element with the given (lowercase) name.
fn starts_element(s: &str, name: &str) -> bool {
    let Some(rest) = s.strip_prefix('<') else {
        return false;
    };
    let Some(after) = rest.strip_prefix(name) else {
        return false;
    };
    matches!(after.bytes().next(), Some(b' ') | Some(b'>') | Some(b'/'))
}

/// Index of the '>' closing the tag starting at `start`, honoring
/// double-quoted attribute values. `None` when `start` is not a tag.
fn tag_end_at(bytes: &[u8], start: usize) -> Option<usize> {
    match bytes.get(start + 1) {
        Some(b) if b.is_ascii_alphabetic() || *b == b'/' || *b == b'!' => {}
        _ => return None,
    }
    let mut in_quote = false;
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => in_quote = !in_quote,
            b'>' if !in_quote => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}
