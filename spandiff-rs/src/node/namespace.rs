//! Namespace resolution for element and attribute names.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::constants::{XMLNS, XML_NAMESPACE};

/// A name resolved against the in-scope namespace bindings.
///
/// Two names are the same when both the namespace URI and the local name
/// match; the prefix used in the source is irrelevant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpandedName {
    /// The namespace URI (empty string for no namespace).
    pub namespace_uri: Rc<str>,
    /// The local part of the name (without prefix).
    pub local_name: String,
}

impl ExpandedName {
    /// Creates an expanded name with a namespace.
    pub fn new(uri: impl Into<Rc<str>>, local: impl Into<String>) -> Self {
        Self {
            namespace_uri: uri.into(),
            local_name: local.into(),
        }
    }

    /// Creates an expanded name with no namespace.
    pub fn no_namespace(local: impl Into<String>) -> Self {
        Self::new("", local)
    }
}

impl fmt::Display for ExpandedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_uri.is_empty() {
            write!(f, "{}", self.local_name)
        } else {
            write!(f, "{{{}}}{}", self.namespace_uri, self.local_name)
        }
    }
}

/// Stack of prefix bindings, one scope per open element.
pub struct NamespaceContext {
    /// URI interning cache.
    uri_cache: FxHashMap<String, Rc<str>>,
    scopes: Vec<FxHashMap<String, Rc<str>>>,
}

impl Default for NamespaceContext {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceContext {
    /// Creates a context with only the `xml` prefix bound.
    pub fn new() -> Self {
        let mut ctx = NamespaceContext {
            uri_cache: FxHashMap::default(),
            scopes: vec![FxHashMap::default()],
        };
        ctx.bind("xml", XML_NAMESPACE);
        ctx
    }

    /// Opens a scope for an element and binds its declarations.
    ///
    /// `declarations` are `(prefix, uri)` pairs; the default namespace uses
    /// the empty prefix.
    pub fn enter<'a>(&mut self, declarations: impl IntoIterator<Item = (&'a str, &'a str)>) {
        self.scopes.push(FxHashMap::default());
        for (prefix, uri) in declarations {
            self.bind(prefix, uri);
        }
    }

    /// Closes the innermost element scope.
    pub fn leave(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Binds a prefix to a URI in the current scope.
    pub fn bind(&mut self, prefix: &str, uri: &str) {
        let uri = self.intern_uri(uri);
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(prefix.to_string(), uri);
        }
    }

    /// Resolves a prefix to its URI, searching from the innermost scope.
    pub fn resolve(&self, prefix: &str) -> Option<Rc<str>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(prefix).cloned())
    }

    /// Resolves an element name; unprefixed names take the default namespace.
    pub fn element_name(&self, qname: &str) -> ExpandedName {
        match split_qname(qname) {
            (Some(prefix), local) => self.prefixed(prefix, local, qname),
            (None, local) => match self.resolve("") {
                Some(uri) => ExpandedName::new(uri, local),
                None => ExpandedName::no_namespace(local),
            },
        }
    }

    /// Resolves an attribute name; unprefixed attributes have no namespace.
    pub fn attribute_name(&self, qname: &str) -> ExpandedName {
        match split_qname(qname) {
            (Some(prefix), local) => self.prefixed(prefix, local, qname),
            (None, local) => ExpandedName::no_namespace(local),
        }
    }

    fn prefixed(&self, prefix: &str, local: &str, qname: &str) -> ExpandedName {
        match self.resolve(prefix) {
            Some(uri) => ExpandedName::new(uri, local),
            None => {
                warn!(name = qname, "unbound namespace prefix, using no namespace");
                ExpandedName::no_namespace(local)
            }
        }
    }

    fn intern_uri(&mut self, uri: &str) -> Rc<str> {
        if let Some(cached) = self.uri_cache.get(uri) {
            cached.clone()
        } else {
            let rc: Rc<str> = uri.into();
            self.uri_cache.insert(uri.to_string(), rc.clone());
            rc
        }
    }
}

/// Splits a qualified name into prefix and local name.
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

/// Returns the declared prefix if `name` is a namespace declaration.
///
/// `xmlns` declares the default namespace (empty prefix).
pub fn declared_prefix(name: &str) -> Option<&str> {
    if name == XMLNS {
        Some("")
    } else {
        name.strip_prefix("xmlns:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("rdf:RDF"), (Some("rdf"), "RDF"));
        assert_eq!(split_qname("Class"), (None, "Class"));
    }

    #[test]
    fn test_declared_prefix() {
        assert_eq!(declared_prefix("xmlns"), Some(""));
        assert_eq!(declared_prefix("xmlns:owl"), Some("owl"));
        assert_eq!(declared_prefix("xml:lang"), None);
        assert_eq!(declared_prefix("rdf:about"), None);
    }

    #[test]
    fn test_scopes() {
        let mut ctx = NamespaceContext::new();
        ctx.enter([("a", "http://example.com/a")]);
        ctx.enter([("b", "http://example.com/b")]);
        assert!(ctx.resolve("a").is_some());
        assert!(ctx.resolve("b").is_some());

        ctx.leave();
        assert!(ctx.resolve("a").is_some());
        assert!(ctx.resolve("b").is_none());
    }

    #[test]
    fn test_prefixes_resolve_to_same_name() {
        let mut ctx = NamespaceContext::new();
        ctx.enter([
            ("owl", "http://www.w3.org/2002/07/owl#"),
            ("o", "http://www.w3.org/2002/07/owl#"),
        ]);
        assert_eq!(ctx.element_name("owl:Class"), ctx.element_name("o:Class"));
    }

    #[test]
    fn test_default_namespace_applies_to_elements_only() {
        let mut ctx = NamespaceContext::new();
        ctx.enter([("", "http://example.com/d")]);
        assert_eq!(
            ctx.element_name("item"),
            ExpandedName::new("http://example.com/d", "item")
        );
        assert_eq!(ctx.attribute_name("id"), ExpandedName::no_namespace("id"));
    }

    #[test]
    fn test_xml_prefix_always_bound() {
        let ctx = NamespaceContext::new();
        assert_eq!(
            ctx.attribute_name("xml:lang").namespace_uri.as_ref(),
            XML_NAMESPACE
        );
    }
}
