#![forbid(unsafe_code)]

//! The owned XML node and document types.

/// A namespace binding: the URI plus the prefix it was declared under.
/// `prefix: None` means the default (unprefixed) namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    pub uri: String,
    pub prefix: Option<String>,
}

impl Namespace {
    pub fn new(uri: impl Into<String>, prefix: Option<&str>) -> Self {
        Self {
            uri: uri.into(),
            prefix: prefix.map(str::to_owned),
        }
    }

    /// A default-namespace binding (no prefix).
    pub fn default_ns(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            prefix: None,
        }
    }
}

/// An owned XML element.
///
/// Attribute and child order is semantically significant and preserved.
/// Element children and a text value are mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlNode {
    pub tag: String,
    pub namespace: Option<Namespace>,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    pub text: Option<String>,
}

impl XmlNode {
    /// Create an element with no namespace, attributes, or content.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            namespace: None,
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// The name as serialized: `prefix:tag` when the namespace has a prefix.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(Namespace {
                prefix: Some(p), ..
            }) => format!("{p}:{}", self.tag),
            _ => self.tag.clone(),
        }
    }

    /// Look up an attribute value by its name as written.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing one with the same name.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn append_child(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    /// Collect descendant-or-self elements whose local tag matches,
    /// namespace-agnostic, in document order.
    pub(crate) fn collect_by_local_name<'a>(&'a self, tag: &str, out: &mut Vec<&'a XmlNode>) {
        if self.tag == tag {
            out.push(self);
        }
        for child in &self.children {
            child.collect_by_local_name(tag, out);
        }
    }

    pub(crate) fn collect_by_attr<'a>(
        &'a self,
        name: &str,
        value: &str,
        out: &mut Vec<&'a XmlNode>,
    ) {
        if self.attr(name) == Some(value) {
            out.push(self);
        }
        for child in &self.children {
            child.collect_by_attr(name, value, out);
        }
    }

    /// Remove every descendant subtree whose local tag matches.
    /// Returns the number of subtrees removed.
    pub fn remove_descendants(&mut self, tag: &str) -> usize {
        let before = self.children.len();
        self.children.retain(|c| c.tag != tag);
        let mut removed = before - self.children.len();
        for child in &mut self.children {
            removed += child.remove_descendants(tag);
        }
        removed
    }
}

/// An owned XML document: exactly one root element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlTree {
    root: XmlNode,
}

impl XmlTree {
    /// Wrap an already-built element as a document root.
    pub fn from_root(root: XmlNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &XmlNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut XmlNode {
        &mut self.root
    }

    pub fn into_root(self) -> XmlNode {
        self.root
    }

    /// All elements (root included) with the given local tag name,
    /// namespace-agnostic, in document order.
    pub fn find_by_local_name(&self, tag: &str) -> Vec<&XmlNode> {
        let mut out = Vec::new();
        self.root.collect_by_local_name(tag, &mut out);
        out
    }

    /// All elements carrying an attribute `name` equal to `value`.
    pub fn find_by_attr(&self, name: &str, value: &str) -> Vec<&XmlNode> {
        let mut out = Vec::new();
        self.root.collect_by_attr(name, value, &mut out);
        out
    }

    /// Remove every descendant subtree with the given local tag name.
    pub fn remove_descendants(&mut self, tag: &str) -> usize {
        self.root.remove_descendants(tag)
    }

    /// Serialize the whole document, including the XML declaration.
    pub fn serialize(&self) -> String {
        crate::writer::serialize_document(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> XmlTree {
        XmlTree::parse(
            r#"<Batch><Invoice ID="A"><Total>10</Total></Invoice><Invoice ID="B"><Total>20</Total></Invoice></Batch>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_find_by_local_name() {
        let tree = sample();
        assert_eq!(tree.find_by_local_name("Invoice").len(), 2);
        assert_eq!(tree.find_by_local_name("Total").len(), 2);
        assert_eq!(tree.find_by_local_name("Batch").len(), 1);
        assert!(tree.find_by_local_name("Nope").is_empty());
    }

    #[test]
    fn test_find_by_attr() {
        let tree = sample();
        let hits = tree.find_by_attr("ID", "B");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tag, "Invoice");
    }

    #[test]
    fn test_remove_descendants() {
        let mut tree = sample();
        assert_eq!(tree.remove_descendants("Invoice"), 2);
        assert!(tree.find_by_local_name("Invoice").is_empty());
        assert!(tree.root().children.is_empty());
    }

    #[test]
    fn test_clone_is_deep() {
        let tree = sample();
        let mut copy = tree.clone();
        copy.remove_descendants("Invoice");
        assert_eq!(tree.find_by_local_name("Invoice").len(), 2);
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut node = XmlNode::new("a");
        node.set_attr("x", "1");
        node.set_attr("x", "2");
        assert_eq!(node.attributes.len(), 1);
        assert_eq!(node.attr("x"), Some("2"));
    }
}
