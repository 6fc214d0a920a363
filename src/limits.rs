//! Resource guards for reading untrusted documents
//!
//! Capabilities documents come from remote servers. The codec checks every
//! element against these bounds so that a hostile or broken document fails
//! with an error instead of exhausting the stack or memory.

use crate::error::{Error, Result, SchemaError};

/// Resource limits applied while reading documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Deepest element nesting accepted, counting the root as 1
    pub max_xml_depth: usize,

    /// Largest document accepted, in bytes
    pub max_xml_size: usize,

    /// Most attributes accepted on one element
    pub max_attributes: usize,

    /// Most namespace bindings in scope at once
    pub max_namespaces: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_depth: 1000,
            max_xml_size: 64 << 20,
            max_attributes: 512,
            max_namespaces: 512,
        }
    }
}

impl Limits {
    /// Default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Tighter limits for documents from unknown servers
    pub fn strict() -> Self {
        Self {
            max_xml_depth: 100,
            max_xml_size: 8 << 20,
            max_attributes: 64,
            max_namespaces: 64,
        }
    }

    /// Loose limits for large trusted catalogues
    pub fn permissive() -> Self {
        Self {
            max_xml_depth: 10_000,
            max_xml_size: 1 << 30,
            max_attributes: 8192,
            max_namespaces: 8192,
        }
    }

    /// Replace the depth bound
    pub fn with_max_xml_depth(mut self, depth: usize) -> Self {
        self.max_xml_depth = depth;
        self
    }

    /// Replace the size bound
    pub fn with_max_xml_size(mut self, size: usize) -> Self {
        self.max_xml_size = size;
        self
    }

    /// Replace the per-element attribute bound
    pub fn with_max_attributes(mut self, count: usize) -> Self {
        self.max_attributes = count;
        self
    }

    /// Replace the namespace binding bound
    pub fn with_max_namespaces(mut self, count: usize) -> Self {
        self.max_namespaces = count;
        self
    }

    /// Depth violations are schema errors so they can carry a document path
    pub fn check_xml_depth(&self, depth: usize) -> std::result::Result<(), SchemaError> {
        if depth > self.max_xml_depth {
            return Err(SchemaError::DepthExceeded {
                depth,
                max: self.max_xml_depth,
            });
        }
        Ok(())
    }

    /// Check a document's byte length
    pub fn check_xml_size(&self, size: usize) -> Result<()> {
        bounded("document size in bytes", size, self.max_xml_size)
    }

    /// Check the attribute count of one start tag
    pub fn check_attributes(&self, count: usize) -> Result<()> {
        bounded("attribute count", count, self.max_attributes)
    }

    /// Check the number of namespace bindings in scope
    pub fn check_namespaces(&self, count: usize) -> Result<()> {
        bounded("namespace binding count", count, self.max_namespaces)
    }
}

fn bounded(what: &str, actual: usize, max: usize) -> Result<()> {
    if actual > max {
        return Err(Error::LimitExceeded(format!("{} {} exceeds maximum {}", what, actual, max)));
    }
    Ok(())
}
