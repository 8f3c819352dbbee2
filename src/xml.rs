//! Owned XML tree used to edit project documents in place.
//!
//! The tree keeps element order, attribute order, comments, CDATA sections and
//! processing instructions so that a document which is parsed and written back
//! without edits is semantically identical to the original. Whitespace-only
//! text between elements is dropped while parsing and regenerated with a
//! two-space indent when writing, which is the layout µVision itself uses.

use std::io::Write;

use quick_xml::{
    Reader, Writer,
    events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event, attributes::AttrError},
};

/// Errors raised while reading or writing XML.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// The underlying parser rejected the input.
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    /// An attribute could not be parsed.
    #[error("invalid attribute: {0}")]
    Attribute(#[from] AttrError),

    /// Writing the serialized document failed.
    #[error("failed to write XML: {0}")]
    Io(#[from] std::io::Error),

    /// The input is well-formed XML but not a usable document.
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Values from the `<?xml ...?>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDeclaration {
    pub version: String,
    pub standalone: Option<String>,
}

impl Default for XmlDeclaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            standalone: Some("no".to_string()),
        }
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub declaration: XmlDeclaration,

    /// Comments, processing instructions and doctype found before the root
    prolog: Vec<XmlNode>,

    root: XmlElement,
}

/// A node inside an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    DocType(String),
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlDocument {
    /// Create a document around an existing root element.
    #[must_use]
    pub fn with_root(root: XmlElement) -> Self {
        Self {
            declaration: XmlDeclaration::default(),
            prolog: Vec::new(),
            root,
        }
    }

    /// Parse a document from a string.
    ///
    /// A leading byte-order mark is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not well-formed, has mismatched tags,
    /// or has no root element.
    pub fn parse(source: &str) -> Result<Self, XmlError> {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);

        let mut reader = Reader::from_str(source);

        let mut declaration = XmlDeclaration::default();
        let mut prolog = Vec::new();
        let mut root: Option<XmlElement> = None;
        let mut stack: Vec<XmlElement> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Eof => break,
                Event::Decl(decl) => {
                    if let Ok(version) = decl.version() {
                        declaration.version = String::from_utf8_lossy(&version).into_owned();
                    }
                    declaration.standalone = match decl.standalone() {
                        Some(Ok(value)) => Some(String::from_utf8_lossy(&value).into_owned()),
                        _ => None,
                    };
                }
                Event::Start(start) => {
                    stack.push(element_from_start(&start)?);
                }
                Event::Empty(empty) => {
                    let element = element_from_start(&empty)?;
                    attach(element, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    let Some(element) = stack.pop() else {
                        return Err(XmlError::Malformed("unexpected closing tag".to_string()));
                    };
                    attach(element, &mut stack, &mut root)?;
                }
                Event::Text(text) => {
                    let content = text.unescape()?.into_owned();
                    // Indentation between elements is regenerated on write
                    if !content.trim().is_empty() {
                        push_node(XmlNode::Text(content), &mut stack, &mut prolog);
                    }
                }
                Event::CData(cdata) => {
                    let content = String::from_utf8_lossy(&cdata).into_owned();
                    push_node(XmlNode::CData(content), &mut stack, &mut prolog);
                }
                Event::Comment(comment) => {
                    let content = String::from_utf8_lossy(&comment).into_owned();
                    push_node(XmlNode::Comment(content), &mut stack, &mut prolog);
                }
                Event::PI(pi) => {
                    let content = String::from_utf8_lossy(&pi).into_owned();
                    push_node(XmlNode::ProcessingInstruction(content), &mut stack, &mut prolog);
                }
                Event::DocType(doctype) => {
                    let content = String::from_utf8_lossy(&doctype).into_owned();
                    push_node(XmlNode::DocType(content), &mut stack, &mut prolog);
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(XmlError::Malformed(format!(
                "element <{}> is never closed",
                open.name
            )));
        }

        let root = root.ok_or_else(|| XmlError::Malformed("document has no root element".to_string()))?;

        Ok(Self {
            declaration,
            prolog,
            root,
        })
    }

    /// The root element.
    #[must_use]
    pub const fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Mutable access to the root element.
    pub const fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    /// Serialize the document, always declaring UTF-8 encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, XmlError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new(
            &self.declaration.version,
            Some("UTF-8"),
            self.declaration.standalone.as_deref(),
        )))?;

        for node in &self.prolog {
            node.write_to(&mut writer)?;
        }
        self.root.write_to(&mut writer)?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Serialize the document into a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn to_xml_string(&self) -> Result<String, XmlError> {
        let bytes = self.to_bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, XmlError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new(name);

    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn attach(
    element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
        return Ok(());
    }

    if root.is_some() {
        return Err(XmlError::Malformed(format!(
            "second root element <{}>",
            element.name
        )));
    }

    *root = Some(element);
    Ok(())
}

fn push_node(node: XmlNode, stack: &mut [XmlElement], prolog: &mut Vec<XmlNode>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        // Text outside the root carries no meaning
        None if matches!(node, XmlNode::Text(_)) => {}
        None => prolog.push(node),
    }
}

impl XmlNode {
    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), XmlError> {
        match self {
            Self::Element(element) => element.write_to(writer)?,
            Self::Text(text) => writer.write_event(Event::Text(BytesText::new(text.as_str())))?,
            Self::CData(content) => writer.write_event(Event::CData(BytesCData::new(content.as_str())))?,
            Self::Comment(comment) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?;
            }
            Self::ProcessingInstruction(content) => {
                writer.write_event(Event::PI(BytesPI::new(content.as_str())))?;
            }
            Self::DocType(content) => {
                writer.write_event(Event::DocType(BytesText::from_escaped(content.as_str())))?;
            }
        }
        Ok(())
    }
}

impl XmlElement {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an element holding a single text node.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.set_text(text);
        element
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes in source order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Self> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Direct children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.child_elements().filter(move |element| element.name == name)
    }

    /// First direct child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.child_elements().find(|element| element.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Self> {
        self.child_elements_mut().find(|element| element.name == name)
    }

    /// First direct child with the given name, appended when missing.
    pub fn child_or_insert(&mut self, name: &str) -> &mut Self {
        let existing = self
            .children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(element) if element.name == name));

        match existing {
            Some(index) => self.element_at_mut(index),
            None => self.push_child(Self::new(name)),
        }
    }

    /// Text content of the first direct child with the given name.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(Self::text)
    }

    /// Append a child element and return it.
    pub fn push_child(&mut self, child: Self) -> &mut Self {
        self.children.push(XmlNode::Element(child));
        self.element_at_mut(self.children.len() - 1)
    }

    /// Keep only the child elements for which `keep` returns `true`.
    ///
    /// Non-element children are always kept. Returns the number of removed
    /// elements.
    pub fn retain_children(&mut self, mut keep: impl FnMut(&Self) -> bool) -> usize {
        let before = self.children.len();
        self.children.retain(|node| match node {
            XmlNode::Element(element) => keep(element),
            _ => true,
        });
        before - self.children.len()
    }

    /// Concatenated text and CDATA content of this element.
    #[must_use]
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(text) | XmlNode::CData(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace all children with a single text node (none when `text` is empty).
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.children.clear();
        if !text.is_empty() {
            self.children.push(XmlNode::Text(text));
        }
    }

    // ── Descendant search ──────────────────────────────────────────────
    //
    // Searches are depth-first in document order and do not descend into a
    // matching element, so results never overlap.

    /// First descendant matching `pred`.
    pub fn find(&self, pred: impl Fn(&Self) -> bool) -> Option<&Self> {
        self.find_all(pred).into_iter().next()
    }

    /// All outermost descendants matching `pred`, in document order.
    pub fn find_all(&self, pred: impl Fn(&Self) -> bool) -> Vec<&Self> {
        let mut found = Vec::new();
        self.collect(&pred, &mut found);
        found
    }

    /// First descendant matching `pred`, mutably.
    pub fn find_mut(&mut self, pred: impl Fn(&Self) -> bool) -> Option<&mut Self> {
        self.find_all_mut(pred).into_iter().next()
    }

    /// All outermost descendants matching `pred`, mutably.
    pub fn find_all_mut(&mut self, pred: impl Fn(&Self) -> bool) -> Vec<&mut Self> {
        let mut found = Vec::new();
        self.collect_mut(&pred, &mut found);
        found
    }

    /// First descendant with the given element name.
    #[must_use]
    pub fn descendant(&self, name: &str) -> Option<&Self> {
        self.find(|element| element.name == name)
    }

    pub fn descendant_mut(&mut self, name: &str) -> Option<&mut Self> {
        self.find_mut(|element| element.name == name)
    }

    /// All outermost descendants with the given element name.
    #[must_use]
    pub fn descendants(&self, name: &str) -> Vec<&Self> {
        self.find_all(|element| element.name == name)
    }

    pub fn descendants_mut(&mut self, name: &str) -> Vec<&mut Self> {
        self.find_all_mut(|element| element.name == name)
    }

    fn collect<'a>(&'a self, pred: &impl Fn(&Self) -> bool, found: &mut Vec<&'a Self>) {
        for child in self.child_elements() {
            if pred(child) {
                found.push(child);
            } else {
                child.collect(pred, found);
            }
        }
    }

    fn collect_mut<'a>(&'a mut self, pred: &impl Fn(&Self) -> bool, found: &mut Vec<&'a mut Self>) {
        for child in self.child_elements_mut() {
            if pred(child) {
                found.push(child);
            } else {
                child.collect_mut(pred, found);
            }
        }
    }

    fn element_at_mut(&mut self, index: usize) -> &mut Self {
        match &mut self.children[index] {
            XmlNode::Element(element) => element,
            _ => unreachable!("index {index} does not point at an element"),
        }
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), XmlError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            child.write_to(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}
