//! Owned XML element tree.
//!
//! Project documents are small enough to hold in memory, so both the engine
//! and the persistence layer work on a plain [`Element`] tree and only touch
//! `quick-xml` when parsing or serializing.

use std::fs;
use std::path::Path;

use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{EngineError, Result};

/// An XML element with attributes, text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set or replace an attribute, keeping attribute order stable.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// First child with the given tag.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// Children with the given tag, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Descendant at a slash separated tag path; the empty path is `self`.
    pub fn find(&self, path: &str) -> Option<&Element> {
        self.at(&self.path_indices(path)?)
    }

    pub fn find_mut(&mut self, path: &str) -> Option<&mut Element> {
        let indices = self.path_indices(path)?;
        self.at_mut(&indices)
    }

    /// Child indices leading to the element at `path`.
    pub fn path_indices(&self, path: &str) -> Option<Vec<usize>> {
        let mut indices = Vec::new();
        let mut current = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let index = current.children.iter().position(|c| c.name == segment)?;
            indices.push(index);
            current = &current.children[index];
        }
        Some(indices)
    }

    pub fn at(&self, indices: &[usize]) -> Option<&Element> {
        indices
            .iter()
            .try_fold(self, |element, &i| element.children.get(i))
    }

    pub fn at_mut(&mut self, indices: &[usize]) -> Option<&mut Element> {
        let mut current = self;
        for &i in indices {
            current = current.children.get_mut(i)?;
        }
        Some(current)
    }

    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> Result<Element> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event().map_err(EngineError::xml)? {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let mut element = stack
                        .pop()
                        .ok_or_else(|| EngineError::xml("unexpected closing tag"))?;
                    if element.text.trim().is_empty() {
                        element.text.clear();
                    }
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = std::str::from_utf8(&text).map_err(EngineError::xml)?;
                        current
                            .text
                            .push_str(&unescape(raw).map_err(EngineError::xml)?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = std::str::from_utf8(&data).map_err(EngineError::xml)?;
                        current.text.push_str(raw);
                    }
                }
                Event::GeneralRef(reference) => {
                    if let Some(current) = stack.last_mut() {
                        let name = std::str::from_utf8(&reference).map_err(EngineError::xml)?;
                        current.text.push_str(&resolve_reference(name)?);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(EngineError::xml(format!("unclosed element <{}>", open.name)));
        }
        root.ok_or_else(|| EngineError::xml("document has no root element"))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Element> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(EngineError::xml)?
            .to_string();
        let mut element = Element::new(name);
        for attr in start.attributes() {
            let attr = attr.map_err(EngineError::xml)?;
            let key = std::str::from_utf8(attr.key.as_ref()).map_err(EngineError::xml)?;
            let raw = std::str::from_utf8(&attr.value).map_err(EngineError::xml)?;
            let value = unescape(raw).map_err(EngineError::xml)?;
            element
                .attributes
                .push((key.to_string(), value.into_owned()));
        }
        Ok(element)
    }

    /// Serialize with an XML declaration and two-space indentation.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(EngineError::xml)?;
        self.write_into(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(EngineError::xml)
    }

    fn write_into(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.text.is_empty() {
            return writer
                .write_event(Event::Empty(start))
                .map_err(EngineError::xml);
        }

        writer
            .write_event(Event::Start(start))
            .map_err(EngineError::xml)?;
        if !self.text.is_empty() {
            writer
                .write_event(Event::Text(BytesText::new(&self.text)))
                .map_err(EngineError::xml)?;
        }
        for child in &self.children {
            child.write_into(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(EngineError::xml)
    }

    /// Read and parse a document file.
    ///
    /// Both I/O and parse failures are reported as
    /// [`EngineError::OpenFailure`].
    pub fn read_file(path: &Path) -> Result<Element> {
        let open_failure = |reason: String| EngineError::OpenFailure {
            path: path.to_path_buf(),
            reason,
        };
        let content = fs::read_to_string(path).map_err(|e| open_failure(e.to_string()))?;
        Self::parse(&content).map_err(|e| open_failure(e.to_string()))
    }

    pub fn write_file(&self, path: &Path) -> Result<()> {
        let xml = self.to_xml()?;
        fs::write(path, xml).map_err(|e| EngineError::io("write", path, e))
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(EngineError::xml("more than one root element")),
    }
}

fn resolve_reference(name: &str) -> Result<String> {
    if let Some(value) = resolve_predefined_entity(name) {
        return Ok(value.to_string());
    }
    let code = match name.strip_prefix('#') {
        Some(hex) if hex.starts_with('x') || hex.starts_with('X') => {
            u32::from_str_radix(&hex[1..], 16).ok()
        }
        Some(decimal) => decimal.parse::<u32>().ok(),
        None => None,
    };
    code.and_then(char::from_u32)
        .map(String::from)
        .ok_or_else(|| EngineError::xml(format!("unknown entity &{name};")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Element {
        Element::new("HybMeshData").with_child(
            Element::new("FLOW")
                .with_child(Element::new("INFO").with_child(Element::new("SAVED").with_text("now")))
                .with_child(
                    Element::new("STATE").with_child(
                        Element::new("GRID2D")
                            .with_attribute("name", "a <b> & \"c\"")
                            .with_child(Element::new("N_VERTICES").with_text("4")),
                    ),
                ),
        )
    }

    #[test]
    fn test_parse_serialized_tree() {
        let tree = sample();
        let xml = tree.to_xml().unwrap();
        assert!(xml.starts_with("<?xml"));
        assert_eq!(Element::parse(&xml).unwrap(), tree);
    }

    #[test]
    fn test_find_paths() {
        let tree = sample();
        assert_eq!(tree.find("").unwrap().name, "HybMeshData");
        assert_eq!(tree.find("FLOW/INFO/SAVED").unwrap().text, "now");
        assert!(tree.find("FLOW/COMMANDS").is_none());
        assert_eq!(tree.path_indices("FLOW/STATE"), Some(vec![0, 1]));
    }

    #[test]
    fn test_entities_and_cdata() {
        let xml = r#"<A><B k="x &amp; y">1 &lt; 2 &#65;&#x42;</B><C><![CDATA[<raw>]]></C></A>"#;
        let root = Element::parse(xml).unwrap();
        let b = root.child("B").unwrap();
        assert_eq!(b.attribute("k"), Some("x & y"));
        assert_eq!(b.text, "1 < 2 AB");
        assert_eq!(root.child("C").unwrap().text, "<raw>");
    }

    #[test]
    fn test_rejects_broken_documents() {
        assert!(Element::parse("").is_err());
        assert!(Element::parse("<A><B></A>").is_err());
        assert!(Element::parse("<A/><B/>").is_err());
    }

    #[test]
    fn test_read_file_reports_open_failure() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.hmp");
        assert!(matches!(
            Element::read_file(&missing),
            Err(EngineError::OpenFailure { .. })
        ));

        let garbage = dir.path().join("garbage.hmp");
        fs::write(&garbage, "not xml <<<").unwrap();
        assert!(matches!(
            Element::read_file(&garbage),
            Err(EngineError::OpenFailure { .. })
        ));

        let good = dir.path().join("good.hmp");
        sample().write_file(&good).unwrap();
        assert_eq!(Element::read_file(&good).unwrap(), sample());
    }
}
