//! Document assembly: grouping every selected page with one style registry,
//! then rendering the result as a single HTML document.

use serde::{Deserialize, Serialize};

use super::html::{serialize_document, Element, Node};
use super::options::{LayoutMode, RenderOptions, DEFAULT_TITLE};
use crate::assets::{ImageAnchor, ImageAnchorManager};
use crate::error::Warning;
use crate::layout::px;
use crate::model::{Metadata, SourceDocument};
use crate::structure::{group_page, Fragment, ListBlock, PageContext, PageItem, StructuralUnit, TableUnit};
use crate::style::{StyleClass, StyleRegistry};

/// Rules emitted before the generated classes.
pub const BASE_STYLESHEET: &str = "\
.page { position: relative; margin: 0 auto 16px; overflow: hidden; }
.positioned span, .positioned img, .positioned table { position: absolute; white-space: pre; }
.positioned table span { position: static; }
.positioned p, .positioned li, .positioned h1, .positioned h2, .positioned h3, .positioned h4, .positioned h5, .positioned h6 { margin: 0; }
ul.list, ol.list { list-style: none; margin: 0; padding: 0; }
table.grid { border-collapse: collapse; }
table.grid th, table.grid td { border: 1px solid #999; padding: 2px 4px; }";

/// One page of assembled content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledPage {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Content stream in page order
    pub items: Vec<PageItem>,
}

/// The assembled document: metadata, style sheet and per-page content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledDocument {
    /// Detected language code or "unknown"
    pub language: String,
    /// Generator/Originator tag
    pub generator: String,
    /// Document title
    pub title: String,
    /// Source metadata
    pub metadata: Metadata,
    /// Style classes in allocation order
    pub classes: Vec<StyleClass>,
    /// Selected pages in document order
    pub pages: Vec<AssembledPage>,
}

impl AssembledDocument {
    /// Generated class rules, one per line.
    pub fn stylesheet(&self) -> String {
        self.classes
            .iter()
            .map(StyleClass::to_css_rule)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// All image anchors in sequence order.
    pub fn images(&self) -> impl Iterator<Item = &ImageAnchor> {
        self.pages
            .iter()
            .flat_map(|p| p.items.iter())
            .filter_map(|item| match item {
                PageItem::Image(anchor) => Some(anchor),
                _ => None,
            })
    }
}

/// Groups pages and renders assembled documents.
pub struct Assembler<'o> {
    options: &'o RenderOptions,
}

impl<'o> Assembler<'o> {
    /// Create an assembler.
    pub fn new(options: &'o RenderOptions) -> Self {
        Self { options }
    }

    /// Group every selected page of `doc`.
    ///
    /// Recovered image failures are appended to `warnings`.
    pub fn assemble(
        &self,
        doc: &SourceDocument,
        language: impl Into<String>,
        images: &mut ImageAnchorManager<'_>,
        warnings: &mut Vec<Warning>,
    ) -> AssembledDocument {
        let mut registry = StyleRegistry::with_prefix(self.options.class_prefix.clone());
        let mut pages = Vec::new();

        {
            let mut ctx = PageContext {
                registry: &mut registry,
                images,
                warnings,
                normalize: self.options.normalize_unicode,
            };

            for page in doc
                .pages
                .iter()
                .filter(|p| self.options.page_selection.includes(p.number))
            {
                let items = group_page(page, &self.options.grouping, &mut ctx);
                log::debug!("Assembler: page {} produced {} items", page.number, items.len());
                pages.push(AssembledPage {
                    number: page.number,
                    width: page.width,
                    height: page.height,
                    items,
                });
            }
        }

        AssembledDocument {
            language: language.into(),
            generator: self.options.generator.clone(),
            title: doc
                .metadata
                .title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            metadata: doc.metadata.clone(),
            classes: registry.classes().cloned().collect(),
            pages,
        }
    }

    /// Render an assembled document as HTML text.
    pub fn render(&self, doc: &AssembledDocument) -> String {
        let html = Element::new("html")
            .attr("lang", doc.language.clone())
            .child(self.head(doc))
            .child(
                Element::new("body").children(
                    doc.pages
                        .iter()
                        .map(|page| Node::Element(self.page(page))),
                ),
            );
        serialize_document(&html)
    }

    fn head(&self, doc: &AssembledDocument) -> Element {
        let mut head = Element::new("head")
            .child(Element::new("meta").attr("charset", "UTF-8"))
            .child(meta("Generator", &doc.generator))
            .child(meta("Originator", &doc.generator));
        for (name, value) in doc.metadata.entries() {
            head.push(meta(name, &value));
        }

        let mut css = BASE_STYLESHEET.to_string();
        let classes = doc.stylesheet();
        if !classes.is_empty() {
            css.push('\n');
            css.push_str(&classes);
        }

        head.child(Element::new("title").text(doc.title.clone()))
            .child(meta("viewport", "width=device-width, initial-scale=1.0"))
            .child(Element::new("style").child(Node::Raw(css)))
    }

    fn page(&self, page: &AssembledPage) -> Element {
        let (mode, size) = match self.options.layout {
            LayoutMode::Positioned => (
                "page positioned",
                format!("width: {}; height: {};", px(page.width), px(page.height)),
            ),
            LayoutMode::Flow => (
                "page flow",
                format!("width: {}; min-height: {};", px(page.width), px(page.height)),
            ),
        };

        Element::new("div")
            .attr("class", mode)
            .attr("id", format!("page-{}", page.number))
            .attr("style", size)
            .children(page.items.iter().map(|item| Node::Element(self.item(item))))
    }

    fn item(&self, item: &PageItem) -> Element {
        match item {
            PageItem::Unit(unit) => self.unit(unit),
            PageItem::List(list) => self.list(list),
            PageItem::Image(anchor) => self.image(anchor),
        }
    }

    fn unit(&self, unit: &StructuralUnit) -> Element {
        match unit {
            StructuralUnit::Paragraph { fragments } => {
                Element::new("p").children(self.fragments(fragments, true))
            }
            StructuralUnit::Heading { level, fragments } => {
                Element::new(format!("h{}", (*level).clamp(1, 6)))
                    .children(self.fragments(fragments, true))
            }
            StructuralUnit::ListItem { fragments, .. } => {
                Element::new("li").children(self.fragments(fragments, true))
            }
            StructuralUnit::Table(table) => self.table(table),
        }
    }

    fn list(&self, list: &ListBlock) -> Element {
        Element::new(list.kind.tag())
            .attr("class", format!("list {}", list.kind.css_class()))
            .attr_opt("type", list.kind.ordinal_type())
            .children(list.items.iter().map(|item| Node::Element(self.unit(item))))
    }

    fn table(&self, table: &TableUnit) -> Element {
        let mut el = Element::new("table").attr("class", "grid");
        if self.options.layout == LayoutMode::Positioned {
            el = el.attr("style", table.placement.to_css(None));
        }

        for (index, row) in table.rows.iter().enumerate() {
            let cell_tag = if index < table.header_rows { "th" } else { "td" };
            let tr = Element::new("tr").children(row.iter().map(|fragment| {
                Node::Element(
                    Element::new(cell_tag)
                        .children(self.fragments(std::slice::from_ref(fragment), false)),
                )
            }));
            el.push(tr);
        }
        el
    }

    fn image(&self, anchor: &ImageAnchor) -> Element {
        let el = Element::new("img")
            .attr("class", "image")
            .attr("src", anchor.src.clone())
            .attr("alt", anchor.alt.clone())
            .attr("width", anchor.width.to_string())
            .attr("height", anchor.height.to_string());
        match self.options.layout {
            LayoutMode::Positioned => el.attr(
                "style",
                anchor
                    .placement
                    .to_css(Some((anchor.display_width, anchor.display_height))),
            ),
            LayoutMode::Flow => el,
        }
    }

    /// Render fragments as class-tagged spans, wrapping linked ones.
    fn fragments(&self, fragments: &[Fragment], positioned: bool) -> Vec<Node> {
        let mut nodes = Vec::with_capacity(fragments.len() * 2);
        for (index, fragment) in fragments.iter().enumerate() {
            if index > 0 && self.options.layout == LayoutMode::Flow {
                nodes.push(Node::text(" "));
            }

            let mut span = Element::new("span").attr("class", fragment.class_id.clone());
            if positioned && self.options.layout == LayoutMode::Positioned {
                span = span.attr("style", fragment.placement.to_css(None));
            }
            let span = span.text(fragment.text.clone());

            nodes.push(match &fragment.link {
                Some(uri) => Node::Element(Element::new("a").attr("href", uri.clone()).child(span)),
                None => Node::Element(span),
            });
        }
        nodes
    }
}

fn meta(name: &str, content: &str) -> Element {
    Element::new("meta").attr("name", name).attr("content", content)
}
