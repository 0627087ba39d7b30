//! Block rendering
//!
//! Maps a document to a presentation tree, one node per block, in order.
//! Rendering is pure: it never mutates the document and never fails. Missing
//! input becomes [`Rendered::Empty`]; unknown or malformed blocks become a
//! visible [`RenderNode::Unsupported`] placeholder.
//!
//! Every user-authored inline field goes through [`sanitize`]; code blocks are
//! kept as opaque text.

mod html;
mod inline;
mod tree;

use tracing::debug;

use crate::document::{Block, BlockData, Document, ImageData};

pub use html::render_html;
pub use inline::{is_safe_url, plain_text, sanitize, Inline};
pub use tree::{HeadingRank, ImageView, ListKind, RenderNode, Rendered, RenderedBlock, TableRow};

/// Render a document, or the empty state when there is none
pub fn render(document: Option<&Document>) -> Rendered {
    let Some(document) = document.filter(|d| !d.is_empty()) else {
        return Rendered::Empty;
    };

    let blocks = document
        .blocks
        .iter()
        .enumerate()
        .map(|(index, block)| RenderedBlock {
            key: block
                .id
                .clone()
                .unwrap_or_else(|| format!("block-{}", index)),
            node: render_block(block),
        })
        .collect();

    Rendered::Blocks(blocks)
}

/// Render the transport form; unparseable text renders as the empty state
pub fn render_str(serialized: &str) -> Rendered {
    match Document::parse(serialized) {
        Ok(document) => render(Some(&document)),
        Err(e) => {
            debug!("Rendering empty state for unparseable document: {}", e);
            Rendered::Empty
        }
    }
}

/// Render a single block
pub fn render_block(block: &Block) -> RenderNode {
    let data = match block.parse_data() {
        Ok(data) => data,
        Err(e) => {
            debug!("Rendering placeholder for malformed block: {}", e);
            return RenderNode::unsupported(&block.kind);
        }
    };

    match data {
        BlockData::Header(header) => match HeadingRank::from_level(header.level) {
            Some(rank) => RenderNode::Heading {
                rank,
                content: sanitize(&header.text),
            },
            None => RenderNode::unsupported(&block.kind),
        },
        BlockData::Paragraph(paragraph) => RenderNode::Paragraph {
            content: sanitize(&paragraph.text),
        },
        BlockData::List(list) => RenderNode::List {
            kind: list.style.into(),
            items: list.items.iter().map(|item| sanitize(item)).collect(),
        },
        BlockData::Quote(quote) => RenderNode::Quote {
            text: sanitize(&quote.text),
            caption: optional_caption(quote.caption.as_deref()),
        },
        BlockData::Delimiter => RenderNode::Delimiter,
        BlockData::Code(code) => RenderNode::Code { code: code.code },
        BlockData::Table(table) => RenderNode::Table {
            rows: table
                .content
                .iter()
                .enumerate()
                .map(|(index, row)| TableRow {
                    header: index == 0,
                    cells: row.iter().map(|cell| sanitize(cell)).collect(),
                })
                .collect(),
        },
        BlockData::Image(image) => render_image(image, &block.kind),
        BlockData::Unknown(kind) => RenderNode::unsupported(kind),
    }
}

fn render_image(image: ImageData, kind: &str) -> RenderNode {
    let url = image.file.url.trim();
    if !is_safe_url(url) {
        return RenderNode::unsupported(kind);
    }
    RenderNode::Image(ImageView {
        url: url.to_string(),
        caption: optional_caption(image.caption.as_deref()),
        stretched: image.stretched,
        with_border: image.with_border,
        with_background: image.with_background,
    })
}

/// Captions render only when present and not blank
fn optional_caption(caption: Option<&str>) -> Option<Vec<Inline>> {
    caption
        .filter(|c| !c.trim().is_empty())
        .map(sanitize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn single(block: Block) -> RenderNode {
        render_block(&block)
    }

    fn sample_document() -> Document {
        Document::from_blocks(vec![
            Block::new("header", json!({"level": 1, "text": "The Ashen Court"})).with_id("h"),
            Block::new("paragraph", json!({"text": "Ruled by <b>three</b> queens."})),
            Block::new("list", json!({"style": "ordered", "items": ["Mira", "Sel"]})),
            Block::new("delimiter", json!({})),
            Block::new("code", json!({"code": "<b>not bold</b>"})),
            Block::new(
                "image",
                json!({"file": {"url": "https://cdn.example.com/court.png"}, "stretched": true}),
            ),
            Block::new("footnote", json!({"text": "see appendix"})),
        ])
    }

    #[test]
    fn test_absent_and_empty_documents_render_empty_state() {
        assert_eq!(render(None), Rendered::Empty);
        assert_eq!(render(Some(&Document::empty())), Rendered::Empty);
        assert!(render_str("not json at all").is_empty());
        assert!(render_str(r#"{"blocks":[]}"#).is_empty());
    }

    #[test]
    fn test_one_node_per_block_in_order() {
        let rendered = render(Some(&sample_document()));
        let blocks = rendered.blocks();
        assert_eq!(blocks.len(), 7);
        assert_eq!(blocks[0].key, "h");
        assert_eq!(blocks[1].key, "block-1");
        assert!(matches!(blocks[0].node, RenderNode::Heading { .. }));
        assert!(matches!(blocks[3].node, RenderNode::Delimiter));
        assert!(matches!(blocks[6].node, RenderNode::Unsupported { .. }));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let doc = sample_document();
        assert_eq!(render(Some(&doc)), render(Some(&doc)));
        assert_eq!(render_html(&render(Some(&doc))), render_html(&render(Some(&doc))));
    }

    #[test]
    fn test_heading_rank_lookup() {
        for (level, rank) in [
            (1, HeadingRank::H1),
            (2, HeadingRank::H2),
            (3, HeadingRank::H3),
            (4, HeadingRank::H4),
            (5, HeadingRank::H5),
            (6, HeadingRank::H6),
        ] {
            let node = single(Block::new("header", json!({"level": level, "text": "T"})));
            assert_eq!(
                node,
                RenderNode::Heading {
                    rank,
                    content: vec![text("T")]
                }
            );
        }
    }

    #[test]
    fn test_out_of_range_heading_is_unsupported() {
        for level in [0, 7, -1] {
            let node = single(Block::new("header", json!({"level": level, "text": "T"})));
            assert_eq!(node, RenderNode::unsupported("header"));
        }
    }

    #[test]
    fn test_malformed_known_block_degrades_to_placeholder() {
        let node = single(Block::new("header", json!({"text": "no level"})));
        assert_eq!(node, RenderNode::unsupported("header"));

        let node = single(Block::new("table", json!({"content": "oops"})));
        assert_eq!(node, RenderNode::unsupported("table"));
    }

    #[test]
    fn test_unknown_block_keeps_type_name() {
        let rendered = render(Some(&Document::from_blocks(vec![Block::new(
            "footnote",
            json!({}),
        )])));
        assert_eq!(
            rendered.blocks()[0].node,
            RenderNode::unsupported("footnote")
        );
        assert!(render_html(&rendered).contains("footnote"));
    }

    #[test]
    fn test_bad_block_metadata_only_affects_that_block() {
        let rendered = render_str(
            r#"{"blocks":[
                {"id":7,"type":"image","data":{"file":{"url":"https://cdn.example.com/map.png"}}},
                {"data":{}},
                {"type":"paragraph","data":{"text":"still here"}}
            ]}"#,
        );
        let blocks = rendered.blocks();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].key, "7");
        assert!(matches!(blocks[0].node, RenderNode::Image(_)));
        assert_eq!(blocks[1].node, RenderNode::unsupported(""));
        assert_eq!(
            blocks[2].node,
            RenderNode::Paragraph {
                content: vec![text("still here")]
            }
        );
        assert!(render_html(&rendered).contains(">Unsupported block</div>"));
    }

    #[test]
    fn test_list_fallback_to_bullets() {
        let node = single(Block::new(
            "list",
            json!({"style": "checklist", "items": ["<i>one</i>", "two"]}),
        ));
        assert_eq!(
            node,
            RenderNode::List {
                kind: ListKind::Bulleted,
                items: vec![vec![Inline::Italic(vec![text("one")])], vec![text("two")]],
            }
        );
    }

    #[test]
    fn test_quote_caption_only_when_non_empty() {
        let with = single(Block::new(
            "quote",
            json!({"text": "Winter comes", "caption": "Old saying"}),
        ));
        let blank = single(Block::new("quote", json!({"text": "Winter comes", "caption": " "})));
        let missing = single(Block::new("quote", json!({"text": "Winter comes"})));

        assert!(matches!(with, RenderNode::Quote { caption: Some(_), .. }));
        assert!(matches!(blank, RenderNode::Quote { caption: None, .. }));
        assert!(matches!(missing, RenderNode::Quote { caption: None, .. }));
    }

    #[test]
    fn test_code_is_not_sanitized() {
        let node = single(Block::new("code", json!({"code": "<script>x()</script>"})));
        assert_eq!(
            node,
            RenderNode::Code {
                code: "<script>x()</script>".into()
            }
        );
    }

    #[test]
    fn test_ragged_table_is_kept_as_is() {
        let node = single(Block::new(
            "table",
            json!({"content": [["Name", "Realm", "Age"], ["Mira"], ["Sel", "<b>North</b>"]]}),
        ));
        let RenderNode::Table { rows } = node else {
            panic!("Expected Table");
        };
        let widths: Vec<_> = rows.iter().map(|r| r.cells.len()).collect();
        assert_eq!(widths, [3, 1, 2]);
        let headers: Vec<_> = rows.iter().map(|r| r.header).collect();
        assert_eq!(headers, [true, false, false]);
        assert_eq!(rows[2].cells[1], vec![Inline::Bold(vec![text("North")])]);
    }

    #[test]
    fn test_image_flags_are_independent() {
        let node = single(Block::new(
            "image",
            json!({
                "file": {"url": "https://cdn.example.com/a.png"},
                "caption": "",
                "stretched": true,
                "withBorder": true,
                "withBackground": false
            }),
        ));
        assert_eq!(
            node,
            RenderNode::Image(ImageView {
                url: "https://cdn.example.com/a.png".into(),
                caption: None,
                stretched: true,
                with_border: true,
                with_background: false,
            })
        );
    }

    #[test]
    fn test_null_image_flags_read_as_false() {
        let node = single(Block::new(
            "image",
            json!({
                "file": {"url": "https://cdn.example.com/a.png "},
                "stretched": null,
                "withBorder": null,
                "withBackground": true
            }),
        ));
        assert_eq!(
            node,
            RenderNode::Image(ImageView {
                url: "https://cdn.example.com/a.png".into(),
                caption: None,
                stretched: false,
                with_border: false,
                with_background: true,
            })
        );
    }

    #[test]
    fn test_image_with_script_url_is_unsupported() {
        let node = single(Block::new(
            "image",
            json!({"file": {"url": "javascript:alert(1)"}}),
        ));
        assert_eq!(node, RenderNode::unsupported("image"));
    }
}
