//! Inline markup sanitizing
//!
//! Block text fields carry a small subset of HTML (bold, italic, links...).
//! Instead of passing that markup through, it is parsed into [`Inline`] nodes
//! against an allowlist. Anything outside the allowlist loses its tag but
//! keeps its text, and `script`/`style` elements are dropped entirely, so the
//! output can only ever contain escaped text plus the elements listed here.

use scraper::{ElementRef, Html, Node};
use serde::Serialize;

/// Sanitized inline content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Inline {
    /// Plain text, entities already decoded
    Text(String),
    Bold(Vec<Inline>),
    Italic(Vec<Inline>),
    Underline(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Mark(Vec<Inline>),
    Code(Vec<Inline>),
    /// Hyperlink whose URL passed [`is_safe_url`]
    Link { url: String, content: Vec<Inline> },
    LineBreak,
}

/// Parse an inline-markup string into sanitized nodes
///
/// The markup is parsed as an HTML fragment, so misnested or unclosed tags are
/// repaired the way a browser would repair them before the allowlist is applied.
pub fn sanitize(markup: &str) -> Vec<Inline> {
    if markup.is_empty() {
        return Vec::new();
    }
    let fragment = Html::parse_fragment(markup);
    let mut out = Vec::new();
    collect_children(fragment.root_element(), &mut out);
    out
}

fn collect_children(parent: ElementRef<'_>, out: &mut Vec<Inline>) {
    for child in parent.children() {
        match child.value() {
            Node::Text(text) => push_text(out, text),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    collect_element(element, out);
                }
            }
            _ => {}
        }
    }
}

fn collect_element(element: ElementRef<'_>, out: &mut Vec<Inline>) {
    let name = element.value().name();
    if dropped_element(name) {
        return;
    }
    if name == "br" {
        out.push(Inline::LineBreak);
        return;
    }

    let mut content = Vec::new();
    collect_children(element, &mut content);

    let kind = ElementKind::for_tag(name, element.value().attr("href"));
    for node in kind.wrap(content) {
        match node {
            Inline::Text(text) => push_text(out, &text),
            other => out.push(other),
        }
    }
}

/// Append text, merging with a preceding text node so stripped tags don't
/// fragment it
fn push_text(out: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(prev)) = out.last_mut() {
        prev.push_str(text);
    } else {
        out.push(Inline::Text(text.to_string()));
    }
}

/// Plain-text projection of sanitized content
pub fn plain_text(content: &[Inline]) -> String {
    let mut out = String::new();
    collect_text(content, &mut out);
    out
}

fn collect_text(content: &[Inline], out: &mut String) {
    for item in content {
        match item {
            Inline::Text(text) => out.push_str(text),
            Inline::LineBreak => out.push('\n'),
            Inline::Link { content, .. }
            | Inline::Bold(content)
            | Inline::Italic(content)
            | Inline::Underline(content)
            | Inline::Strikethrough(content)
            | Inline::Mark(content)
            | Inline::Code(content) => collect_text(content, out),
        }
    }
}

/// Whether a URL may be emitted as a link or image source
///
/// Allows `http`, `https` and `mailto`, plus scheme-less relative references.
pub fn is_safe_url(url: &str) -> bool {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return false;
    }
    // Browsers ignore embedded whitespace/control chars when reading a scheme
    let compact: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    match compact.find(':') {
        None => true,
        Some(colon) => {
            let before = &compact[..colon];
            // A ':' after a path, query or fragment start is not a scheme
            if before.contains(['/', '?', '#']) {
                return true;
            }
            matches!(
                before.to_ascii_lowercase().as_str(),
                "http" | "https" | "mailto"
            )
        }
    }
}

/// Elements removed together with everything inside them
fn dropped_element(name: &str) -> bool {
    matches!(name, "script" | "style" | "template" | "noscript")
}

enum ElementKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Mark,
    Code,
    Link(Option<String>),
    /// Not on the allowlist: the tag goes, the text stays
    Stripped,
}

impl ElementKind {
    fn for_tag(name: &str, href: Option<&str>) -> Self {
        match name {
            "b" | "strong" => ElementKind::Bold,
            "i" | "em" => ElementKind::Italic,
            "u" => ElementKind::Underline,
            "s" | "del" | "strike" => ElementKind::Strikethrough,
            "mark" => ElementKind::Mark,
            "code" => ElementKind::Code,
            "a" => ElementKind::Link(href.and_then(link_target)),
            _ => ElementKind::Stripped,
        }
    }

    fn wrap(self, content: Vec<Inline>) -> Vec<Inline> {
        let node = match self {
            ElementKind::Bold => Inline::Bold(content),
            ElementKind::Italic => Inline::Italic(content),
            ElementKind::Underline => Inline::Underline(content),
            ElementKind::Strikethrough => Inline::Strikethrough(content),
            ElementKind::Mark => Inline::Mark(content),
            ElementKind::Code => Inline::Code(content),
            ElementKind::Link(Some(url)) => Inline::Link { url, content },
            // Unsafe or missing href: keep the text, drop the link
            ElementKind::Link(None) | ElementKind::Stripped => return content,
        };
        vec![node]
    }
}

/// Attribute values arrive with entities already decoded by the parser
fn link_target(href: &str) -> Option<String> {
    let url = href.trim();
    is_safe_url(url).then(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(sanitize("The river Anduin"), vec![text("The river Anduin")]);
        assert!(sanitize("").is_empty());
    }

    #[test]
    fn test_allowed_tags_become_nodes() {
        let result = sanitize("A <b>bold</b> and <i>quiet</i> oath");
        assert_eq!(
            result,
            vec![
                text("A "),
                Inline::Bold(vec![text("bold")]),
                text(" and "),
                Inline::Italic(vec![text("quiet")]),
                text(" oath"),
            ]
        );
    }

    #[test]
    fn test_nested_and_unclosed_tags() {
        let result = sanitize("<b>outer <i>inner</i></b> tail");
        assert_eq!(
            result,
            vec![
                Inline::Bold(vec![text("outer "), Inline::Italic(vec![text("inner")])]),
                text(" tail"),
            ]
        );

        // Misnested: the italic run is reopened after the bold closes
        let result = sanitize("<b>outer <i>inner</b> tail");
        assert_eq!(
            result,
            vec![
                Inline::Bold(vec![text("outer "), Inline::Italic(vec![text("inner")])]),
                Inline::Italic(vec![text(" tail")]),
            ]
        );

        let result = sanitize("<em>never closed");
        assert_eq!(result, vec![Inline::Italic(vec![text("never closed")])]);
    }

    #[test]
    fn test_script_is_dropped_with_contents() {
        let result = sanitize("safe<script>alert('x')</script> text");
        assert_eq!(result, vec![text("safe text")]);

        let result = sanitize("before<style>p{}</style>");
        assert_eq!(result, vec![text("before")]);

        // Unterminated script swallows the rest
        assert_eq!(sanitize("ok<script>steal()"), vec![text("ok")]);
    }

    #[test]
    fn test_unknown_tags_keep_text() {
        let result = sanitize(r#"<div onclick="evil()">hello <span>world</span></div>"#);
        assert_eq!(result, vec![text("hello world")]);
    }

    #[test]
    fn test_event_handler_attributes_never_survive() {
        let result = sanitize(r#"<b onmouseover="evil()">x</b>"#);
        assert_eq!(result, vec![Inline::Bold(vec![text("x")])]);
    }

    #[test]
    fn test_links() {
        let result = sanitize(r#"see <a href="https://wiki.example.org/Gondor">Gondor</a>"#);
        assert_eq!(
            result,
            vec![
                text("see "),
                Inline::Link {
                    url: "https://wiki.example.org/Gondor".into(),
                    content: vec![text("Gondor")],
                },
            ]
        );

        let result = sanitize(r#"<a href="javascript:alert(1)">click</a>"#);
        assert_eq!(result, vec![text("click")]);

        let result = sanitize("<a>bare</a>");
        assert_eq!(result, vec![text("bare")]);
    }

    #[test]
    fn test_entities_are_decoded_to_text() {
        let result = sanitize("Fish &amp; chips &lt;3");
        assert_eq!(result, vec![text("Fish & chips <3")]);

        // A bare '<' that opens no tag stays text
        assert_eq!(sanitize("a < b"), vec![text("a < b")]);
    }

    #[test]
    fn test_link_href_quoting_and_entities() {
        let result = sanitize("<a href='https://wiki.example.org/?a=1&amp;b=2'>q</a>");
        assert_eq!(
            result,
            vec![Inline::Link {
                url: "https://wiki.example.org/?a=1&b=2".into(),
                content: vec![text("q")],
            }]
        );

        // Entity-encoded scheme is decoded before the safety check
        let result = sanitize(r#"<a href="&#106;avascript:alert(1)">x</a>"#);
        assert_eq!(result, vec![text("x")]);
    }

    #[test]
    fn test_comments_and_templates_are_dropped() {
        let result = sanitize("a<!-- hidden -->b<template><b>t</b></template>c");
        assert_eq!(result, vec![text("abc")]);
    }

    #[test]
    fn test_line_breaks() {
        let result = sanitize("one<br>two<br/>three");
        assert_eq!(
            result,
            vec![
                text("one"),
                Inline::LineBreak,
                text("two"),
                Inline::LineBreak,
                text("three"),
            ]
        );
        assert_eq!(plain_text(&result), "one\ntwo\nthree");
    }

    #[test]
    fn test_safe_url() {
        assert!(is_safe_url("https://example.com/a.png"));
        assert!(is_safe_url("mailto:scribe@example.com"));
        assert!(is_safe_url("/relative/path"));
        assert!(is_safe_url("page?at=10:30"));
        assert!(!is_safe_url("javascript:alert(1)"));
        assert!(!is_safe_url("JaVa\tScript:alert(1)"));
        assert!(!is_safe_url("data:text/html,<b>x</b>"));
        assert!(!is_safe_url("  "));
    }
}
