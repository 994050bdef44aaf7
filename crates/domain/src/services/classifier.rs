//! Stored-HTML classification.
//!
//! Decides whether a page body is a complete standalone document or a
//! fragment to be injected into the host page. The decision picks the
//! isolation strategy: full documents go into a sandboxed frame, fragments
//! are inlined.

/// Classification of a stored HTML body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlKind {
    /// A snippet without its own document structure.
    Fragment,
    /// A complete document with its own head/body.
    FullDocument,
}

/// Classifies a stored HTML body.
///
/// This is a string heuristic, not a parse: content counts as a full
/// document if it contains `<!doctype` or `<html` anywhere,
/// case-insensitively. A marker inside a comment or a script string
/// misclassifies (accepted limitation; see tests).
pub fn classify(html: &str) -> HtmlKind {
    let lowered = html.to_ascii_lowercase();
    if lowered.contains("<!doctype") || lowered.contains("<html") {
        HtmlKind::FullDocument
    } else {
        HtmlKind::Fragment
    }
}
