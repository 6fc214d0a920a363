//! Codec configuration

use crate::error::{Error, SchemaError};
use crate::limits::Limits;
use std::fmt;
use std::str::FromStr;

/// How the reader treats recoverable problems
///
/// Unknown elements and attributes, bad literals and missing required
/// features are recoverable. Syntax errors, unbound prefixes, an unknown root
/// element and excessive depth always abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReadMode {
    /// Abort on the first problem
    #[default]
    Strict,
    /// Collect diagnostics and keep reading
    Lax,
    /// Drop recoverable problems silently
    Skip,
}

impl ReadMode {
    /// Get the mode as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadMode::Strict => "strict",
            ReadMode::Lax => "lax",
            ReadMode::Skip => "skip",
        }
    }
}

impl FromStr for ReadMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(ReadMode::Strict),
            "lax" => Ok(ReadMode::Lax),
            "skip" => Ok(ReadMode::Skip),
            _ => Err(Error::Schema(SchemaError::InvalidValue {
                feature: "mode".to_string(),
                value: s.to_string(),
                reason: "must be 'strict', 'lax' or 'skip'".to_string(),
            })),
        }
    }
}

impl fmt::Display for ReadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reader and writer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    mode: ReadMode,
    limits: Limits,
    indent: Option<usize>,
    xml_declaration: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            mode: ReadMode::default(),
            limits: Limits::default(),
            indent: Some(2),
            xml_declaration: true,
        }
    }
}

impl CodecConfig {
    /// Default configuration: strict reads, indented output with a declaration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the read mode
    pub fn with_mode(mut self, mode: ReadMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the resource limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Indent written output by `width` spaces per level; `None` writes one line
    pub fn with_indent(mut self, width: Option<usize>) -> Self {
        self.indent = width;
        self
    }

    /// Emit (or omit) the `<?xml ...?>` declaration
    pub fn with_xml_declaration(mut self, enabled: bool) -> Self {
        self.xml_declaration = enabled;
        self
    }

    /// Read mode
    pub fn mode(&self) -> ReadMode {
        self.mode
    }

    /// Resource limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Indentation width
    pub fn indent(&self) -> Option<usize> {
        self.indent
    }

    /// Whether the XML declaration is written
    pub fn xml_declaration(&self) -> bool {
        self.xml_declaration
    }
}
