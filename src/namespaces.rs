//! XML namespace handling
//!
//! Qualified names, the namespaces the WCS 1.0 schema touches, and the scoped
//! prefix resolution used while reading documents.

use crate::error::SchemaError;
use crate::names::split_qname;
use std::fmt;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// WCS 1.0 target namespace
pub const WCS_NAMESPACE: &str = "http://www.opengis.net/wcs";

/// GML namespace
pub const GML_NAMESPACE: &str = "http://www.opengis.net/gml";

/// XLink namespace
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// XML Schema instance namespace
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// The namespace bound to the reserved `xml` prefix
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Conventional prefixes for the namespaces above
pub const WELL_KNOWN_PREFIXES: &[(&str, &str)] = &[
    ("wcs", WCS_NAMESPACE),
    ("gml", GML_NAMESPACE),
    ("xlink", XLINK_NAMESPACE),
    ("xsi", XSI_NAMESPACE),
];

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName in the WCS namespace
    pub fn wcs(local_name: impl Into<String>) -> Self {
        Self::namespaced(WCS_NAMESPACE, local_name)
    }

    /// Create a QName in the GML namespace
    pub fn gml(local_name: impl Into<String>) -> Self {
        Self::namespaced(GML_NAMESPACE, local_name)
    }

    /// Create a QName in the XLink namespace
    pub fn xlink(local_name: impl Into<String>) -> Self {
        Self::namespaced(XLINK_NAMESPACE, local_name)
    }

    /// Namespace URI, if any
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Check whether the name lives in the given namespace
    pub fn is_in(&self, namespace: &str) -> bool {
        self.namespace.as_deref() == Some(namespace)
    }

    /// Parse a name in Clark notation (`{uri}local`) or a bare local name
    pub fn from_clark(text: &str) -> Self {
        match text.strip_prefix('{').and_then(|rest| rest.split_once('}')) {
            Some((ns, local)) => Self::namespaced(ns, local),
            None => Self::local(text),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => f.write_str(&self.local_name),
        }
    }
}

/// The conventional prefix for a well-known namespace
pub fn well_known_prefix(namespace: &str) -> Option<&'static str> {
    WELL_KNOWN_PREFIXES
        .iter()
        .find(|(_, uri)| *uri == namespace)
        .map(|(prefix, _)| *prefix)
}

/// If the raw attribute name declares a namespace, return the declared prefix
/// (empty for the default namespace)
pub fn declared_prefix(raw_name: &str) -> Option<&str> {
    if raw_name == "xmlns" {
        Some("")
    } else {
        raw_name.strip_prefix("xmlns:")
    }
}

/// Stack of in-scope namespace declarations
///
/// Each element pushes one scope holding the declarations it carries. Lookup
/// walks from the innermost scope outwards and finally consults the fallback
/// bindings, which resolve well-known prefixes documents often use without
/// declaring them.
#[derive(Debug, Clone)]
pub struct NamespaceScopes {
    scopes: Vec<Vec<(Prefix, NamespaceUri)>>,
    fallback: Vec<(Prefix, NamespaceUri)>,
}

impl NamespaceScopes {
    /// Create scopes with the well-known prefixes as fallback bindings
    pub fn new() -> Self {
        Self::with_fallback(
            WELL_KNOWN_PREFIXES
                .iter()
                .map(|(p, uri)| (p.to_string(), uri.to_string())),
        )
    }

    /// Create scopes with explicit fallback bindings
    pub fn with_fallback(bindings: impl IntoIterator<Item = (Prefix, NamespaceUri)>) -> Self {
        Self {
            scopes: Vec::new(),
            fallback: bindings.into_iter().collect(),
        }
    }

    /// Enter an element carrying the given declarations
    pub fn push_scope(&mut self, declarations: Vec<(Prefix, NamespaceUri)>) {
        self.scopes.push(declarations);
    }

    /// Leave the innermost element
    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Number of declarations currently in scope
    pub fn binding_count(&self) -> usize {
        self.scopes.iter().map(Vec::len).sum()
    }

    /// Look up the namespace bound to a prefix (empty prefix = default namespace)
    ///
    /// `Some("")` means the default namespace was explicitly undeclared.
    pub fn lookup(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE);
        }
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .chain(self.fallback.iter())
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Resolve an element name; unprefixed names take the default namespace
    pub fn resolve_element(&self, raw_name: &str) -> Result<QName, SchemaError> {
        match split_qname(raw_name) {
            (Some(prefix), local) => self.resolve_prefixed(prefix, local),
            (None, local) => Ok(match self.lookup("") {
                Some(ns) if !ns.is_empty() => QName::namespaced(ns, local),
                _ => QName::local(local),
            }),
        }
    }

    /// Resolve an attribute name; unprefixed attributes are in no namespace
    pub fn resolve_attribute(&self, raw_name: &str) -> Result<QName, SchemaError> {
        match split_qname(raw_name) {
            (Some(prefix), local) => self.resolve_prefixed(prefix, local),
            (None, local) => Ok(QName::local(local)),
        }
    }

    fn resolve_prefixed(&self, prefix: &str, local: &str) -> Result<QName, SchemaError> {
        match self.lookup(prefix) {
            Some(ns) if !ns.is_empty() => Ok(QName::namespaced(ns, local)),
            _ => Err(SchemaError::UnboundPrefix(prefix.to_string())),
        }
    }
}

impl Default for NamespaceScopes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qname_creation() {
        let qname = QName::namespaced("http://example.com", "element");
        assert_eq!(qname.namespace(), Some("http://example.com"));
        assert_eq!(qname.local_name, "element");
        assert!(QName::wcs("GetCoverage").is_in(WCS_NAMESPACE));
    }

    #[test]
    fn test_clark_notation() {
        let qname = QName::gml("Envelope");
        let text = qname.to_string();
        assert_eq!(text, "{http://www.opengis.net/gml}Envelope");
        assert_eq!(QName::from_clark(&text), qname);
        assert_eq!(QName::from_clark("plain"), QName::local("plain"));
    }

    #[test]
    fn test_declared_prefix() {
        assert_eq!(declared_prefix("xmlns"), Some(""));
        assert_eq!(declared_prefix("xmlns:gml"), Some("gml"));
        assert_eq!(declared_prefix("xlink:href"), None);
    }

    #[test]
    fn test_scoped_resolution() {
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope(vec![("".to_string(), WCS_NAMESPACE.to_string())]);
        assert_eq!(
            scopes.resolve_element("GetCoverage").unwrap(),
            QName::wcs("GetCoverage")
        );
        assert_eq!(
            scopes.resolve_attribute("service").unwrap(),
            QName::local("service")
        );

        scopes.push_scope(vec![("g".to_string(), GML_NAMESPACE.to_string())]);
        assert_eq!(scopes.resolve_element("g:pos").unwrap(), QName::gml("pos"));
        scopes.pop_scope();
        assert_eq!(
            scopes.resolve_element("g:pos"),
            Err(SchemaError::UnboundPrefix("g".to_string()))
        );
    }

    #[test]
    fn test_fallback_and_shadowing() {
        let mut scopes = NamespaceScopes::new();
        assert_eq!(
            scopes.resolve_element("wcs:GetCapabilities").unwrap(),
            QName::wcs("GetCapabilities")
        );

        scopes.push_scope(vec![("wcs".to_string(), "urn:other".to_string())]);
        assert_eq!(
            scopes.resolve_element("wcs:GetCapabilities").unwrap(),
            QName::namespaced("urn:other", "GetCapabilities")
        );
        assert_eq!(scopes.binding_count(), 1);
        assert_eq!(scopes.lookup("xml"), Some(XML_NAMESPACE));
    }

    #[test]
    fn test_undeclared_default_namespace() {
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope(vec![("".to_string(), WCS_NAMESPACE.to_string())]);
        scopes.push_scope(vec![("".to_string(), String::new())]);
        assert_eq!(scopes.resolve_element("x").unwrap(), QName::local("x"));
    }
}
