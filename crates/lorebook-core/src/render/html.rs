//! HTML output for the presentation tree
//!
//! All text goes through `html_escape`; the only markup emitted is the fixed
//! set of elements written here.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::inline::Inline;
use super::tree::{ImageView, ListKind, RenderNode, Rendered, TableRow};

/// Shown in place of a document with nothing to render
const EMPTY_STATE: &str = "No content";

/// Serialize rendered output to an HTML fragment
pub fn render_html(rendered: &Rendered) -> String {
    let mut out = String::new();
    match rendered {
        Rendered::Empty => {
            out.push_str(&format!("<div class=\"lore-empty\">{EMPTY_STATE}</div>\n"));
        }
        Rendered::Blocks(blocks) => {
            for block in blocks {
                write_node(&mut out, &block.node);
                out.push('\n');
            }
        }
    }
    out
}

fn write_node(out: &mut String, node: &RenderNode) {
    match node {
        RenderNode::Heading { rank, content } => {
            let tag = rank.tag();
            out.push_str(&format!(r#"<{tag} class="lore-{tag}">"#));
            write_inline(out, content);
            close_tag(out, tag);
        }
        RenderNode::Paragraph { content } => {
            out.push_str("<p>");
            write_inline(out, content);
            out.push_str("</p>");
        }
        RenderNode::List { kind, items } => {
            let tag = match kind {
                ListKind::Numbered => "ol",
                ListKind::Bulleted => "ul",
            };
            open_tag(out, tag);
            for item in items {
                out.push_str("<li>");
                write_inline(out, item);
                out.push_str("</li>");
            }
            close_tag(out, tag);
        }
        RenderNode::Quote { text, caption } => {
            out.push_str("<figure class=\"lore-quote\"><blockquote>");
            write_inline(out, text);
            out.push_str("</blockquote>");
            if let Some(caption) = caption {
                out.push_str("<figcaption>");
                write_inline(out, caption);
                out.push_str("</figcaption>");
            }
            out.push_str("</figure>");
        }
        RenderNode::Delimiter => out.push_str("<hr class=\"lore-delimiter\">"),
        RenderNode::Code { code } => {
            out.push_str("<pre><code>");
            out.push_str(&encode_text(code));
            out.push_str("</code></pre>");
        }
        RenderNode::Table { rows } => write_table(out, rows),
        RenderNode::Image(image) => write_image(out, image),
        RenderNode::Unsupported { block_type } => {
            out.push_str("<div class=\"lore-unsupported\">");
            out.push_str(&encode_text(&RenderNode::placeholder_label(block_type)));
            out.push_str("</div>");
        }
    }
}

fn write_table(out: &mut String, rows: &[TableRow]) {
    out.push_str("<table>");
    for row in rows {
        let cell_tag = if row.header { "th" } else { "td" };
        out.push_str("<tr>");
        for cell in &row.cells {
            wrap(out, cell_tag, cell);
        }
        out.push_str("</tr>");
    }
    out.push_str("</table>");
}

fn write_image(out: &mut String, image: &ImageView) {
    let mut classes = vec!["lore-image"];
    if image.stretched {
        classes.push("stretched");
    }
    if image.with_border {
        classes.push("with-border");
    }
    if image.with_background {
        classes.push("with-background");
    }

    out.push_str(&format!(
        r#"<figure class="{}"><img src="{}""#,
        classes.join(" "),
        encode_double_quoted_attribute(&image.url)
    ));
    if let Some(caption) = &image.caption {
        let alt = super::inline::plain_text(caption);
        out.push_str(&format!(r#" alt="{}""#, encode_double_quoted_attribute(&alt)));
    }
    out.push('>');
    if let Some(caption) = &image.caption {
        out.push_str("<figcaption>");
        write_inline(out, caption);
        out.push_str("</figcaption>");
    }
    out.push_str("</figure>");
}

fn write_inline(out: &mut String, content: &[Inline]) {
    for item in content {
        match item {
            Inline::Text(text) => out.push_str(&encode_text(text)),
            Inline::Bold(inner) => wrap(out, "strong", inner),
            Inline::Italic(inner) => wrap(out, "em", inner),
            Inline::Underline(inner) => wrap(out, "u", inner),
            Inline::Strikethrough(inner) => wrap(out, "s", inner),
            Inline::Mark(inner) => wrap(out, "mark", inner),
            Inline::Code(inner) => wrap(out, "code", inner),
            Inline::Link { url, content } => {
                out.push_str(&format!(
                    r#"<a href="{}" rel="noopener noreferrer nofollow">"#,
                    encode_double_quoted_attribute(url)
                ));
                write_inline(out, content);
                out.push_str("</a>");
            }
            Inline::LineBreak => out.push_str("<br>"),
        }
    }
}

fn wrap(out: &mut String, tag: &str, inner: &[Inline]) {
    open_tag(out, tag);
    write_inline(out, inner);
    close_tag(out, tag);
}

fn open_tag(out: &mut String, tag: &str) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
}

fn close_tag(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
