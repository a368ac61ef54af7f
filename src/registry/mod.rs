//! Content type registries
//!
//! Static descriptors for every page kind and snippet the system knows.
//! The page descriptors carry the tree placement rules (which kinds a
//! page may have as children) and the admin panel layout; the API
//! exposes both so clients never hard-code them.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::PageKind;

/// A group of edit fields shown together in the admin form
#[derive(Debug, Clone, Serialize)]
pub struct PanelGroup {
    pub heading: &'static str,
    pub fields: &'static [&'static str],
}

/// Descriptor for one page kind
#[derive(Debug, Clone, Serialize)]
pub struct PageTypeDescriptor {
    pub kind: PageKind,
    pub name: &'static str,
    pub template: &'static str,
    /// None allows any kind; Some(&[]) forbids children entirely
    pub allowed_subpage_kinds: Option<&'static [PageKind]>,
    pub panels: &'static [PanelGroup],
}

impl PageTypeDescriptor {
    /// Whether a child of the given kind may be created under this kind
    pub fn allows_child(&self, child: PageKind) -> bool {
        match self.allowed_subpage_kinds {
            None => true,
            Some(kinds) => kinds.contains(&child),
        }
    }
}

pub const PAGE_TYPES: &[PageTypeDescriptor] = &[
    PageTypeDescriptor {
        kind: PageKind::Standard,
        name: "Standard page",
        template: "base/standard_page.html",
        allowed_subpage_kinds: None,
        panels: &[
            PanelGroup {
                heading: "Content",
                fields: &["introduction", "image_id", "body"],
            },
        ],
    },
    PageTypeDescriptor {
        kind: PageKind::Home,
        name: "Home page",
        template: "base/home_page.html",
        allowed_subpage_kinds: None,
        panels: &[
            PanelGroup {
                heading: "Hero section",
                fields: &["hero_image_id", "hero_text", "hero_cta", "hero_cta_link_id"],
            },
            PanelGroup {
                heading: "Body",
                fields: &["body"],
            },
            PanelGroup {
                heading: "Promo section",
                fields: &["promo_image_id", "promo_title", "promo_text"],
            },
            PanelGroup {
                heading: "Featured sections",
                fields: &[
                    "featured_section_1_title",
                    "featured_section_1_id",
                    "featured_section_2_title",
                    "featured_section_2_id",
                    "featured_section_3_title",
                    "featured_section_3_id",
                ],
            },
        ],
    },
    PageTypeDescriptor {
        kind: PageKind::Gallery,
        name: "Gallery page",
        template: "base/gallery_page.html",
        // Gallery pages are leaves
        allowed_subpage_kinds: Some(&[]),
        panels: &[
            PanelGroup {
                heading: "Content",
                fields: &["introduction", "image_id", "body", "collection_name"],
            },
        ],
    },
    PageTypeDescriptor {
        kind: PageKind::Centrum,
        name: "Centrum page",
        template: "base/centrum_page.html",
        allowed_subpage_kinds: None,
        panels: &[
            PanelGroup {
                heading: "Content",
                fields: &["image_id", "body"],
            },
        ],
    },
    PageTypeDescriptor {
        kind: PageKind::Blog,
        name: "Blog page",
        template: "blog/blog_page.html",
        allowed_subpage_kinds: None,
        panels: &[
            PanelGroup {
                heading: "Blog information",
                fields: &["date", "tags", "categories"],
            },
            PanelGroup {
                heading: "Content",
                fields: &["intro", "body", "gallery_images"],
            },
        ],
    },
    PageTypeDescriptor {
        kind: PageKind::BlogIndex,
        name: "Blog index page",
        template: "blog/blog_index_page.html",
        allowed_subpage_kinds: Some(&[PageKind::Blog]),
        panels: &[
            PanelGroup {
                heading: "Content",
                fields: &["intro"],
            },
        ],
    },
    PageTypeDescriptor {
        kind: PageKind::BlogTagIndex,
        name: "Blog tag index page",
        template: "blog/blog_tag_index_page.html",
        allowed_subpage_kinds: Some(&[]),
        panels: &[],
    },
];

static PAGE_TYPE_INDEX: Lazy<HashMap<PageKind, &'static PageTypeDescriptor>> =
    Lazy::new(|| PAGE_TYPES.iter().map(|d| (d.kind, d)).collect());

/// Descriptor lookup by kind
pub fn page_type(kind: PageKind) -> &'static PageTypeDescriptor {
    PAGE_TYPE_INDEX[&kind]
}

/// Descriptor for one snippet type
#[derive(Debug, Clone, Serialize)]
pub struct SnippetDescriptor {
    pub slug: &'static str,
    pub name: &'static str,
    /// At most one record may exist
    pub singleton: bool,
    pub fields: &'static [&'static str],
}

pub const SNIPPETS: &[SnippetDescriptor] = &[
    SnippetDescriptor {
        slug: "footer_text",
        name: "Footer text",
        singleton: true,
        fields: &["body"],
    },
    SnippetDescriptor {
        slug: "person",
        name: "Person",
        singleton: false,
        fields: &["first_name", "last_name", "job_title", "image_id"],
    },
    SnippetDescriptor {
        slug: "blog_category",
        name: "Blog category",
        singleton: false,
        fields: &["name", "icon_image_id"],
    },
];
