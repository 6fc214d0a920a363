//! Read state shared across the unmarshaller's recursion

use crate::codec::config::{CodecConfig, ReadMode};
use crate::error::{Diagnostic, Error, Result, SchemaError};
use crate::limits::Limits;
use tracing::warn;

/// Diagnostics, current element path and depth of a read in progress
#[derive(Debug)]
pub(crate) struct ReadContext {
    mode: ReadMode,
    limits: Limits,
    path: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl ReadContext {
    pub(crate) fn new(config: &CodecConfig) -> Self {
        Self {
            mode: config.mode(),
            limits: config.limits().clone(),
            path: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Current element nesting depth (the root element is depth 1)
    pub(crate) fn depth(&self) -> usize {
        self.path.len()
    }

    /// Slash-separated path of the current element
    pub(crate) fn path(&self) -> String {
        if self.path.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", self.path.join("/"))
        }
    }

    /// Enter an element; exceeding the depth limit is always fatal
    pub(crate) fn enter(&mut self, segment: String) -> Result<()> {
        self.path.push(segment);
        self.limits
            .check_xml_depth(self.depth())
            .map_err(|e| self.fatal(e))
    }

    pub(crate) fn exit(&mut self) {
        self.path.pop();
    }

    /// An unrecoverable problem at the current path
    pub(crate) fn fatal(&self, error: SchemaError) -> Error {
        Error::Invalid(Diagnostic::new(error).with_path(self.path()))
    }

    /// Raise or collect a problem found at the current path
    pub(crate) fn raise_or_collect(&mut self, error: SchemaError) -> Result<()> {
        let diagnostic = Diagnostic::new(error).with_path(self.path());
        self.report(diagnostic)
    }

    /// Raise or collect a located diagnostic, according to the read mode
    pub(crate) fn report(&mut self, diagnostic: Diagnostic) -> Result<()> {
        match self.mode {
            ReadMode::Strict => Err(Error::Invalid(diagnostic)),
            ReadMode::Lax => {
                warn!(path = %diagnostic.path, "{}", diagnostic.error);
                self.diagnostics.push(diagnostic);
                Ok(())
            }
            ReadMode::Skip => Ok(()),
        }
    }

    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_and_depth() {
        let config = CodecConfig::new().with_limits(Limits::new().with_max_xml_depth(2));
        let mut context = ReadContext::new(&config);
        assert_eq!(context.path(), "/");

        context.enter("wcs:GetCoverage".to_string()).unwrap();
        context.enter("wcs:output".to_string()).unwrap();
        assert_eq!(context.path(), "/wcs:GetCoverage/wcs:output");

        let err = context.enter("wcs:format".to_string()).unwrap_err();
        assert_eq!(
            err.schema_error(),
            Some(&SchemaError::DepthExceeded { depth: 3, max: 2 })
        );
    }

    #[test]
    fn test_mode_policy() {
        let error = SchemaError::UnexpectedAttribute("foo".to_string());

        let mut strict = ReadContext::new(&CodecConfig::new());
        assert!(strict.raise_or_collect(error.clone()).is_err());

        let mut lax = ReadContext::new(&CodecConfig::new().with_mode(ReadMode::Lax));
        lax.raise_or_collect(error.clone()).unwrap();
        assert_eq!(lax.into_diagnostics().len(), 1);

        let mut skip = ReadContext::new(&CodecConfig::new().with_mode(ReadMode::Skip));
        skip.raise_or_collect(error).unwrap();
        assert!(skip.into_diagnostics().is_empty());
    }
}
