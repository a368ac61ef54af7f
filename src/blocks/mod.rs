//! Stream block schema
//!
//! This module defines the structured content units that make up a page
//! body: heading, rich paragraph, image with caption, quote, and embed.
//! A body is an ordered, heterogeneous sequence of blocks serialized as
//! JSON (`[{"type": ..., "value": {...}}, ...]`), and decoding followed
//! by encoding loses no information.
//!
//! Each block type carries a rendering template identifier and an icon
//! identifier consumed by the template layer and the editing UI.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed heading size enumeration with an explicit "unset" sentinel.
///
/// Unset serializes as the empty string rather than field absence, so a
/// stored heading always carries a size key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingSize {
    #[default]
    #[serde(rename = "")]
    Unset,
    H2,
    H3,
    H4,
}

impl HeadingSize {
    /// HTML tag name to render with; Unset falls back to h2.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Unset | Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
        }
    }
}

/// A single structured content unit.
///
/// The wire form matches the stored stream format: a `type` tag naming
/// the block kind and a `value` object with the block's fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Block {
    /// Heading with a selectable h2-h4 size
    #[serde(rename = "heading_block")]
    Heading {
        heading_text: String,
        #[serde(default)]
        size: HeadingSize,
    },
    /// Rich text paragraph (sanitized HTML supplied by the editor)
    #[serde(rename = "paragraph_block")]
    Paragraph { html: String },
    /// Image with associated caption and attribution
    #[serde(rename = "image_block")]
    Image {
        image: i64,
        #[serde(default)]
        caption: String,
        #[serde(default)]
        attribution: String,
    },
    /// Quoted text attributed to an author
    #[serde(rename = "block_quote")]
    Quote {
        text: String,
        #[serde(default)]
        attribute_name: String,
    },
    /// Embedded media by URL
    #[serde(rename = "embed_block")]
    Embed { url: String },
}

impl Block {
    /// Wire name of this block kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading_block",
            Self::Paragraph { .. } => "paragraph_block",
            Self::Image { .. } => "image_block",
            Self::Quote { .. } => "block_quote",
            Self::Embed { .. } => "embed_block",
        }
    }

    /// Rendering template identifier
    pub fn template(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "blocks/heading_block.html",
            Self::Paragraph { .. } => "blocks/paragraph_block.html",
            Self::Image { .. } => "blocks/image_block.html",
            Self::Quote { .. } => "blocks/blockquote.html",
            Self::Embed { .. } => "blocks/embed_block.html",
        }
    }

    /// Icon identifier for the editing UI
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "title",
            Self::Paragraph { .. } => "fa-paragraph",
            Self::Image { .. } => "image",
            Self::Quote { .. } => "fa-quote-left",
            Self::Embed { .. } => "fa-s15",
        }
    }

    /// Check that every required field is populated.
    ///
    /// Optional fields (image caption and attribution, quote author,
    /// heading size) are never rejected when empty.
    pub fn validate(&self) -> Result<(), BlockError> {
        match self {
            Self::Heading { heading_text, .. } if heading_text.is_empty() => {
                Err(BlockError::missing("heading_block", "heading_text"))
            }
            Self::Paragraph { html } if html.is_empty() => {
                Err(BlockError::missing("paragraph_block", "html"))
            }
            Self::Image { image, .. } if *image <= 0 => {
                Err(BlockError::missing("image_block", "image"))
            }
            Self::Quote { text, .. } if text.is_empty() => {
                Err(BlockError::missing("block_quote", "text"))
            }
            Self::Embed { url } if url.is_empty() => {
                Err(BlockError::missing("embed_block", "url"))
            }
            _ => Ok(()),
        }
    }
}

/// Block-level validation and serialization errors
#[derive(Debug, Error)]
pub enum BlockError {
    #[error("Block '{block}' is missing required field '{field}'")]
    MissingField {
        block: &'static str,
        field: &'static str,
    },

    #[error("Invalid stream body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

impl BlockError {
    fn missing(block: &'static str, field: &'static str) -> Self {
        Self::MissingField { block, field }
    }
}

/// Ordered, heterogeneous sequence of blocks composing a page body.
///
/// The empty sequence is a valid body and is what new pages start with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamBody {
    pub blocks: Vec<Block>,
}

impl StreamBody {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Encode to the stored JSON form
    pub fn to_json(&self) -> Result<String, BlockError> {
        Ok(serde_json::to_string(&self.blocks)?)
    }

    /// Decode from the stored JSON form; an empty string decodes to the
    /// empty body (columns default to no content).
    pub fn from_json(raw: &str) -> Result<Self, BlockError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let blocks: Vec<Block> = serde_json::from_str(raw)?;
        Ok(Self { blocks })
    }

    /// Validate every block in order, failing on the first bad one
    pub fn validate(&self) -> Result<(), BlockError> {
        for block in &self.blocks {
            block.validate()?;
        }
        Ok(())
    }
}

/// Declared field of a block type, as shown to the editing UI
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub help_text: &'static str,
}

/// Editor-facing description of a block type
#[derive(Debug, Clone, Serialize)]
pub struct BlockSpec {
    pub name: &'static str,
    pub icon: &'static str,
    pub template: &'static str,
    pub fields: &'static [FieldSpec],
}

/// Specs for every block type, in editor display order.
///
/// Image caption is optional; captions are entered freely or left
/// blank.
pub const BLOCK_SPECS: &[BlockSpec] = &[
    BlockSpec {
        name: "heading_block",
        icon: "title",
        template: "blocks/heading_block.html",
        fields: &[
            FieldSpec {
                name: "heading_text",
                required: true,
                help_text: "",
            },
            FieldSpec {
                name: "size",
                required: false,
                help_text: "Select a header size",
            },
        ],
    },
    BlockSpec {
        name: "paragraph_block",
        icon: "fa-paragraph",
        template: "blocks/paragraph_block.html",
        fields: &[FieldSpec {
            name: "html",
            required: true,
            help_text: "",
        }],
    },
    BlockSpec {
        name: "image_block",
        icon: "image",
        template: "blocks/image_block.html",
        fields: &[
            FieldSpec {
                name: "image",
                required: true,
                help_text: "",
            },
            FieldSpec {
                name: "caption",
                required: false,
                help_text: "",
            },
            FieldSpec {
                name: "attribution",
                required: false,
                help_text: "",
            },
        ],
    },
    BlockSpec {
        name: "block_quote",
        icon: "fa-quote-left",
        template: "blocks/blockquote.html",
        fields: &[
            FieldSpec {
                name: "text",
                required: true,
                help_text: "",
            },
            FieldSpec {
                name: "attribute_name",
                required: false,
                help_text: "Name of the author",
            },
        ],
    },
    BlockSpec {
        name: "embed_block",
        icon: "fa-s15",
        template: "blocks/embed_block.html",
        fields: &[FieldSpec {
            name: "url",
            required: true,
            help_text: "Insert a URL to embed, e.g. youtube.com/embed/",
        }],
    },
];

/// Look up a block spec by wire name
pub fn block_spec(name: &str) -> Option<&'static BlockSpec> {
    BLOCK_SPECS.iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_body() -> StreamBody {
        StreamBody::new(vec![
            Block::Heading {
                heading_text: "About us".to_string(),
                size: HeadingSize::H2,
            },
            Block::Paragraph {
                html: "<p>Hello</p>".to_string(),
            },
            Block::Image {
                image: 7,
                caption: "A caption".to_string(),
                attribution: String::new(),
            },
            Block::Quote {
                text: "Quoted".to_string(),
                attribute_name: "Anna".to_string(),
            },
            Block::Embed {
                url: "https://youtube.com/embed/xyz".to_string(),
            },
        ])
    }

    #[test]
    fn test_round_trip_preserves_order_and_content() {
        let body = sample_body();
        let encoded = body.to_json().unwrap();
        let decoded = StreamBody::from_json(&encoded).unwrap();
        assert_eq!(body, decoded);
    }

    #[test]
    fn test_wire_format_uses_type_and_value_keys() {
        let body = StreamBody::new(vec![Block::Heading {
            heading_text: "Hi".to_string(),
            size: HeadingSize::H3,
        }]);
        let encoded = body.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(parsed[0]["type"], "heading_block");
        assert_eq!(parsed[0]["value"]["heading_text"], "Hi");
        assert_eq!(parsed[0]["value"]["size"], "h3");
    }

    #[test]
    fn test_unset_heading_size_is_empty_string_not_absent() {
        let body = StreamBody::new(vec![Block::Heading {
            heading_text: "Hi".to_string(),
            size: HeadingSize::Unset,
        }]);
        let encoded = body.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(parsed[0]["value"]["size"], "");
    }

    #[test]
    fn test_missing_size_decodes_as_unset() {
        let raw = r#"[{"type":"heading_block","value":{"heading_text":"Hi"}}]"#;
        let body = StreamBody::from_json(raw).unwrap();
        assert_eq!(
            body.blocks[0],
            Block::Heading {
                heading_text: "Hi".to_string(),
                size: HeadingSize::Unset,
            }
        );
    }

    #[test]
    fn test_empty_string_decodes_to_empty_body() {
        let body = StreamBody::from_json("").unwrap();
        assert!(body.is_empty());
        let body = StreamBody::from_json("[]").unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn test_validate_image_requires_reference() {
        let block = Block::Image {
            image: 0,
            caption: String::new(),
            attribution: String::new(),
        };
        assert!(block.validate().is_err());

        let block = Block::Image {
            image: 3,
            caption: String::new(),
            attribution: String::new(),
        };
        assert!(block.validate().is_ok());
    }

    #[test]
    fn test_validate_optional_fields_may_be_empty() {
        let block = Block::Quote {
            text: "something".to_string(),
            attribute_name: String::new(),
        };
        assert!(block.validate().is_ok());

        let block = Block::Heading {
            heading_text: "h".to_string(),
            size: HeadingSize::Unset,
        };
        assert!(block.validate().is_ok());
    }

    #[test]
    fn test_body_validate_fails_on_first_bad_block() {
        let body = StreamBody::new(vec![
            Block::Paragraph {
                html: "<p>ok</p>".to_string(),
            },
            Block::Embed { url: String::new() },
        ]);
        let err = body.validate().unwrap_err();
        assert!(err.to_string().contains("embed_block"));
    }

    #[test]
    fn test_image_caption_spec_is_optional() {
        let spec = block_spec("image_block").unwrap();
        let caption = spec.fields.iter().find(|f| f.name == "caption").unwrap();
        assert!(!caption.required);
        let image = spec.fields.iter().find(|f| f.name == "image").unwrap();
        assert!(image.required);
    }

    #[test]
    fn test_template_and_icon_identifiers() {
        let body = sample_body();
        let templates: Vec<&str> = body.blocks.iter().map(|b| b.template()).collect();
        assert_eq!(
            templates,
            vec![
                "blocks/heading_block.html",
                "blocks/paragraph_block.html",
                "blocks/image_block.html",
                "blocks/blockquote.html",
                "blocks/embed_block.html",
            ]
        );
        assert_eq!(body.blocks[3].icon(), "fa-quote-left");
    }

    #[test]
    fn test_every_spec_has_matching_template() {
        for spec in BLOCK_SPECS {
            assert!(spec.template.starts_with("blocks/"));
            assert!(block_spec(spec.name).is_some());
        }
    }
}
