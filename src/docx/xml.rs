//! Mutable XML tree for WordprocessingML parts.
//!
//! `word/document.xml` is parsed once into an arena of nodes that can be
//! traversed and edited in place, then serialized back to bytes. The tree is
//! the single source of truth: the paragraph and table views elsewhere in
//! this crate are just node-id handles over it, so object-model edits and
//! raw-tree edits can never diverge.
//!
//! Tag matching is namespace-prefix-insensitive (`w:p` and `p` both match
//! local name `p`), mirroring how WordprocessingML consumers compare tags.
use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Handle to a node in an [`XmlTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// An element with its qualified name, raw attribute list and ordered children.
    ///
    /// Attribute values are kept exactly as written (still entity-escaped) and
    /// re-emitted verbatim, so attributes round-trip byte-for-byte.
    Element {
        name: String,
        attrs: Vec<(String, String)>,
        children: Vec<NodeId>,
    },
    /// Character data, stored unescaped.
    Text(String),
    /// A comment, stored with its raw inner text.
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
}

/// An in-memory XML document.
///
/// Node 0 is a synthetic root that holds the document element (and any
/// top-level comments); it is never reported by [`XmlTree::parent`].
#[derive(Debug, Clone)]
pub struct XmlTree {
    nodes: Vec<Node>,
}

const ROOT: NodeId = NodeId(0);

/// Declaration emitted on serialization. Word writes exactly this line.
const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n";

impl XmlTree {
    /// Parse an XML part into a tree.
    ///
    /// Uses streaming event parsing; any malformed markup is fatal and
    /// surfaces as [`Error::Xml`]. Once parsed, traversal cannot fail.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut tree = Self {
            nodes: vec![Node {
                kind: NodeKind::Element {
                    name: String::new(),
                    attrs: Vec::new(),
                    children: Vec::new(),
                },
                parent: None,
            }],
        };

        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::with_capacity(1024);
        let mut stack: Vec<NodeId> = vec![ROOT];
        // Text content can arrive split across Text/GeneralRef events; it is
        // accumulated here and flushed as one text node.
        let mut pending_text = String::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let parent = *stack.last().ok_or_else(unbalanced)?;
                    tree.flush_text(parent, &mut pending_text);
                    let id = tree.push_element(e, parent)?;
                    stack.push(id);
                },
                Ok(Event::Empty(ref e)) => {
                    let parent = *stack.last().ok_or_else(unbalanced)?;
                    tree.flush_text(parent, &mut pending_text);
                    tree.push_element(e, parent)?;
                },
                Ok(Event::End(_)) => {
                    let parent = *stack.last().ok_or_else(unbalanced)?;
                    tree.flush_text(parent, &mut pending_text);
                    if stack.len() <= 1 {
                        return Err(unbalanced());
                    }
                    stack.pop();
                },
                Ok(Event::Text(e)) => {
                    let raw = String::from_utf8_lossy(e.as_ref());
                    pending_text.push_str(&unescape_xml(&raw));
                },
                Ok(Event::CData(e)) => {
                    pending_text.push_str(&String::from_utf8_lossy(e.as_ref()));
                },
                Ok(Event::GeneralRef(e)) => {
                    let name = String::from_utf8_lossy(&e).into_owned();
                    push_general_ref(&mut pending_text, &name);
                },
                Ok(Event::Comment(e)) => {
                    let parent = *stack.last().ok_or_else(unbalanced)?;
                    tree.flush_text(parent, &mut pending_text);
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    tree.push_node(NodeKind::Comment(text), parent);
                },
                // The declaration is re-emitted canonically on write; DOCTYPE
                // and processing instructions do not occur in WordprocessingML.
                Ok(Event::Decl(_)) | Ok(Event::DocType(_)) | Ok(Event::PI(_)) => {},
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(e.to_string())),
            }
            buf.clear();
        }

        if stack.len() != 1 {
            return Err(unbalanced());
        }
        Ok(tree)
    }

    /// The document (outermost) element, if the part had one.
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(ROOT)
            .iter()
            .copied()
            .find(|&id| matches!(self.nodes[id.index()].kind, NodeKind::Element { .. }))
    }

    /// Qualified name of an element node, `None` for text and comments.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.index()].kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Local part of an element's qualified name (`w:p` -> `p`).
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.name(id)
            .map(|name| name.rsplit(':').next().unwrap_or(name))
    }

    /// Whether `id` is an element whose local name equals `local`.
    #[inline]
    pub fn is_element(&self, id: NodeId, local: &str) -> bool {
        self.local_name(id) == Some(local)
    }

    /// Parent node, `None` at the document element.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        match self.nodes[id.index()].parent {
            Some(p) if p != ROOT => Some(p),
            _ => None,
        }
    }

    /// Ordered children of a node (empty for text and comments).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.index()].kind {
            NodeKind::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Replace the child list of an element.
    ///
    /// Detached nodes stay in the arena but are no longer reachable or
    /// serialized. Attached children get their parent pointer updated.
    pub fn set_children(&mut self, id: NodeId, new_children: Vec<NodeId>) {
        for &child in &new_children {
            self.nodes[child.index()].parent = Some(id);
        }
        if let NodeKind::Element { children, .. } = &mut self.nodes[id.index()].kind {
            *children = new_children;
        }
    }

    /// Append a child to an element.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        if let NodeKind::Element { children, .. } = &mut self.nodes[parent.index()].kind {
            children.push(child);
        }
    }

    /// Create a detached element node.
    pub fn new_element(&mut self, name: &str, attrs: Vec<(String, String)>) -> NodeId {
        self.alloc(NodeKind::Element {
            name: name.to_string(),
            attrs,
            children: Vec::new(),
        })
    }

    /// Create a detached text node.
    pub fn new_text(&mut self, content: &str) -> NodeId {
        self.alloc(NodeKind::Text(content.to_string()))
    }

    /// Text content of a text node, `None` otherwise.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.index()].kind {
            NodeKind::Text(content) => Some(content),
            _ => None,
        }
    }

    /// Concatenated text of an element's direct text-node children.
    ///
    /// For `w:t` this is the run text; mixed content concatenates in order.
    pub fn element_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            if let Some(text) = self.text(child) {
                out.push_str(text);
            }
        }
        out
    }

    /// Replace the text content of an element.
    ///
    /// Existing text-node children are dropped; non-text children (rare for
    /// `w:t`, but legal XML) are kept after the new text. An empty string
    /// leaves no text node at all.
    pub fn set_element_text(&mut self, id: NodeId, content: &str) {
        let mut kept: Vec<NodeId> = self
            .children(id)
            .iter()
            .copied()
            .filter(|&child| self.text(child).is_none())
            .collect();
        if !content.is_empty() {
            let text = self.new_text(content);
            kept.insert(0, text);
        }
        self.set_children(id, kept);
    }

    /// All nodes of the subtree rooted at `id`, in document (pre-order)
    /// order, starting with `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            for &child in self.children(node).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Serialize the tree back to bytes, declaration included.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = String::with_capacity(self.nodes.len() * 32);
        out.push_str(XML_DECL);
        for &child in self.children(ROOT) {
            self.write_node(child, &mut out);
        }
        out.into_bytes()
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.index()].kind {
            NodeKind::Element {
                name,
                attrs,
                children,
            } => {
                out.push('<');
                out.push_str(name);
                for (key, value) in attrs {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(value);
                    out.push('"');
                }
                if children.is_empty() {
                    out.push_str("/>");
                } else {
                    out.push('>');
                    for &child in children {
                        self.write_node(child, out);
                    }
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            },
            NodeKind::Text(content) => out.push_str(&escape_xml(content)),
            NodeKind::Comment(content) => {
                out.push_str("<!--");
                out.push_str(content);
                out.push_str("-->");
            },
        }
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, parent: None });
        id
    }

    fn push_node(&mut self, kind: NodeKind, parent: NodeId) -> NodeId {
        let id = self.alloc(kind);
        self.append_child(parent, id);
        id
    }

    fn push_element(
        &mut self,
        start: &quick_xml::events::BytesStart<'_>,
        parent: NodeId,
    ) -> Result<NodeId> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
            attrs.push((
                String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                String::from_utf8_lossy(&attr.value).into_owned(),
            ));
        }
        Ok(self.push_node(
            NodeKind::Element {
                name,
                attrs,
                children: Vec::new(),
            },
            parent,
        ))
    }

    fn flush_text(&mut self, parent: NodeId, pending: &mut String) {
        if pending.is_empty() {
            return;
        }
        // Inter-element whitespace outside the document element belongs to
        // the declaration line and is re-created on write.
        if parent == ROOT && pending.trim().is_empty() {
            pending.clear();
            return;
        }
        let content = std::mem::take(pending);
        self.push_node(NodeKind::Text(content), parent);
    }
}

fn unbalanced() -> Error {
    Error::Xml("unbalanced element nesting".to_string())
}

/// Escape XML special characters for text content.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Unescape the five standard XML entities. Unknown entities pass through.
pub fn unescape_xml(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Append a resolved general entity reference (`name` without `&`/`;`).
fn push_general_ref(out: &mut String, name: &str) {
    match name {
        "amp" => out.push('&'),
        "lt" => out.push('<'),
        "gt" => out.push('>'),
        "quot" => out.push('"'),
        "apos" => out.push('\''),
        _ => {
            if let Some(ch) = resolve_char_ref(name) {
                out.push(ch);
            } else {
                // Unknown named entity: keep the reference literally.
                out.push('&');
                out.push_str(name);
                out.push(';');
            }
        },
    }
}

/// Resolve a numeric character reference (`#225` / `#xE1`).
fn resolve_char_ref(name: &str) -> Option<char> {
    let digits = name.strip_prefix('#')?;
    let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse().ok()?
    };
    char::from_u32(code)
}
