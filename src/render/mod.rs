//! Stream body rendering
//!
//! Renders stream blocks to HTML through Tera. Each block kind owns a
//! small built-in template; the block's value payload becomes the
//! template context.

use anyhow::{Context, Result};
use tera::{Context as TeraContext, Tera};

use crate::blocks::{Block, HeadingSize, StreamBody};
use crate::models::Image;

const HEADING_TEMPLATE: &str = "\
{% if tag %}<{{ tag }}>{{ heading_text }}</{{ tag }}>{% else %}<h2>{{ heading_text }}</h2>{% endif %}";

const PARAGRAPH_TEMPLATE: &str = "{{ html | safe }}";

const IMAGE_TEMPLATE: &str = "\
<figure><img src=\"/images/{{ image }}\" alt=\"{{ caption }}\">\
{% if caption or attribution %}<figcaption>{{ caption }}\
{% if attribution %} - {{ attribution }}{% endif %}</figcaption>{% endif %}</figure>";

const QUOTE_TEMPLATE: &str = "\
<blockquote><p>{{ text }}</p>\
{% if attribute_name %}<cite>{{ attribute_name }}</cite>{% endif %}</blockquote>";

const EMBED_TEMPLATE: &str = "<div class=\"embed\" data-url=\"{{ url }}\"></div>";

pub struct StreamRenderer {
    tera: Tera,
}

impl StreamRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("blocks/heading_block.html", HEADING_TEMPLATE),
            ("blocks/paragraph_block.html", PARAGRAPH_TEMPLATE),
            ("blocks/image_block.html", IMAGE_TEMPLATE),
            ("blocks/blockquote.html", QUOTE_TEMPLATE),
            ("blocks/embed_block.html", EMBED_TEMPLATE),
        ])
        .context("Failed to register block templates")?;
        Ok(Self { tera })
    }

    /// Render a single block to HTML
    pub fn render_block(&self, block: &Block) -> Result<String> {
        let mut context = block_context(block)?;
        if let Block::Heading { size, .. } = block {
            // The empty sentinel falls back to h2 in the template
            if *size != HeadingSize::Unset {
                context.insert("tag", size.tag());
            }
        }
        self.tera
            .render(block.template(), &context)
            .with_context(|| format!("Failed to render block '{}'", block.kind()))
    }

    /// Render a full body, blocks concatenated in order
    pub fn render_body(&self, body: &StreamBody) -> Result<String> {
        let mut html = String::new();
        for block in &body.blocks {
            html.push_str(&self.render_block(block)?);
            html.push('\n');
        }
        Ok(html)
    }
}

fn block_context(block: &Block) -> Result<TeraContext> {
    // The adjacently tagged wire form holds the payload under "value"
    let wire = serde_json::to_value(block).context("Failed to serialize block")?;
    let value = wire.get("value").cloned().unwrap_or(serde_json::json!({}));
    TeraContext::from_value(value).context("Failed to build block context")
}

/// Fixed-size thumbnail img tag for an image record
pub fn rendition_img(image: &Image, width: u32, height: u32) -> String {
    format!(
        "<img src=\"/images/{}\" width=\"{}\" height=\"{}\" alt=\"{}\">",
        image.id,
        width,
        height,
        tera::escape_html(&image.title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_heading_with_size() {
        let renderer = StreamRenderer::new().unwrap();
        let html = renderer
            .render_block(&Block::Heading {
                heading_text: "Hello".to_string(),
                size: HeadingSize::H3,
            })
            .unwrap();
        assert_eq!(html, "<h3>Hello</h3>");
    }

    #[test]
    fn test_render_heading_without_size_defaults_h2() {
        let renderer = StreamRenderer::new().unwrap();
        let html = renderer
            .render_block(&Block::Heading {
                heading_text: "Hello".to_string(),
                size: HeadingSize::Unset,
            })
            .unwrap();
        assert_eq!(html, "<h2>Hello</h2>");
    }

    #[test]
    fn test_render_paragraph_keeps_html() {
        let renderer = StreamRenderer::new().unwrap();
        let html = renderer
            .render_block(&Block::Paragraph {
                html: "<p>Rich <b>text</b></p>".to_string(),
            })
            .unwrap();
        assert_eq!(html, "<p>Rich <b>text</b></p>");
    }

    #[test]
    fn test_render_quote_with_attribution() {
        let renderer = StreamRenderer::new().unwrap();
        let html = renderer
            .render_block(&Block::Quote {
                text: "Words".to_string(),
                attribute_name: "Someone".to_string(),
            })
            .unwrap();
        assert!(html.contains("<cite>Someone</cite>"));
    }

    #[test]
    fn test_render_body_concatenates_in_order() {
        let renderer = StreamRenderer::new().unwrap();
        let body = StreamBody::new(vec![
            Block::Heading {
                heading_text: "Title".to_string(),
                size: HeadingSize::H2,
            },
            Block::Paragraph {
                html: "<p>One</p>".to_string(),
            },
        ]);
        let html = renderer.render_body(&body).unwrap();
        let title_pos = html.find("Title").unwrap();
        let para_pos = html.find("One").unwrap();
        assert!(title_pos < para_pos);
    }

    #[test]
    fn test_rendition_img_escapes_title() {
        let image = Image::new("a <b> c".to_string(), "x.jpg".to_string(), 10, 10);
        let tag = rendition_img(&image, 50, 50);
        assert!(tag.contains("a &lt;b&gt; c"));
    }
}
