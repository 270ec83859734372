//! Minimal HTML node tree and serializer.

const VOID_TAGS: &[&str] = &["meta", "img", "br", "link"];
const INLINE_TAGS: &[&str] = &["a", "span", "img", "br", "b", "i", "em", "strong", "sup"];

/// Escape text for HTML element and attribute context.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// A markup node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An element with attributes and children
    Element(Element),
    /// Escaped text
    Text(String),
    /// Pre-formatted content emitted verbatim (style sheets)
    Raw(String),
}

impl Node {
    /// Text node.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    fn is_inline(&self) -> bool {
        match self {
            Node::Element(el) => INLINE_TAGS.contains(&el.tag.as_str()),
            Node::Text(_) => true,
            Node::Raw(_) => false,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name
    pub tag: String,
    /// Attributes in insertion order
    pub attrs: Vec<(String, String)>,
    /// Child nodes
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Add an attribute when `value` is present.
    pub fn attr_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// Append a child.
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append a text child.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    /// Append children.
    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    /// Append a child in place.
    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Serialize the element and its subtree.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_element(self, 0, &mut out);
        out
    }
}

/// Serialize a full document with doctype.
pub fn serialize_document(root: &Element) -> String {
    let mut out = String::from("<!DOCTYPE html>\n");
    write_element(root, 0, &mut out);
    out.push('\n');
    out
}

fn write_open_tag(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_html(value));
        out.push('"');
    }
    out.push('>');
}

fn write_inline(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&escape_html(text)),
        Node::Raw(raw) => out.push_str(raw),
        Node::Element(el) => {
            write_open_tag(el, out);
            if VOID_TAGS.contains(&el.tag.as_str()) {
                return;
            }
            for child in &el.children {
                write_inline(child, out);
            }
            out.push_str("</");
            out.push_str(&el.tag);
            out.push('>');
        }
    }
}

fn write_element(el: &Element, depth: usize, out: &mut String) {
    write_open_tag(el, out);
    if VOID_TAGS.contains(&el.tag.as_str()) {
        return;
    }

    if el.children.iter().all(Node::is_inline) {
        for child in &el.children {
            write_inline(child, out);
        }
    } else {
        let indent = "  ".repeat(depth + 1);
        for child in &el.children {
            out.push('\n');
            match child {
                Node::Element(child) => {
                    out.push_str(&indent);
                    write_element(child, depth + 1, out);
                }
                Node::Raw(raw) => out.push_str(raw),
                Node::Text(_) => {
                    out.push_str(&indent);
                    write_inline(child, out);
                }
            }
        }
        out.push('\n');
        out.push_str(&"  ".repeat(depth));
    }

    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_inline_children_on_one_line() {
        let p = Element::new("p")
            .child(Element::new("span").attr("class", "style-0").text("Hello"))
            .text(" world");
        assert_eq!(p.to_html(), r#"<p><span class="style-0">Hello</span> world</p>"#);
    }

    #[test]
    fn test_block_children_indented() {
        let div = Element::new("div")
            .child(Element::new("p").text("a"))
            .child(Element::new("p").text("b"));
        assert_eq!(div.to_html(), "<div>\n  <p>a</p>\n  <p>b</p>\n</div>");
    }

    #[test]
    fn test_void_and_attribute_escaping() {
        let img = Element::new("img").attr("alt", "\"quoted\"");
        assert_eq!(img.to_html(), r#"<img alt="&quot;quoted&quot;">"#);
    }

    #[test]
    fn test_raw_not_escaped() {
        let style = Element::new("style").child(Node::Raw(".a { font-family: 'X'; }".into()));
        assert_eq!(
            style.to_html(),
            "<style>\n.a { font-family: 'X'; }\n</style>"
        );
    }

    #[test]
    fn test_serialize_document() {
        let html = Element::new("html").attr("lang", "en").child(Element::new("body"));
        assert_eq!(
            serialize_document(&html),
            "<!DOCTYPE html>\n<html lang=\"en\">\n  <body></body>\n</html>\n"
        );
    }
}
