//! Template format plugins.
//!
//! Each format parses text into the shared [`Document`] model and dumps a
//! document back to text. The registry is an explicit object built at
//! startup and handed to the orchestrator; there is no process-wide plugin
//! state.

use std::collections::HashMap;

use crate::app::error::{Error, Result};
use crate::app::template::Document;

pub trait TemplateFormat: Send + Sync {
    fn name(&self) -> &'static str;
    fn extensions(&self) -> &'static [&'static str];
    fn parse(&self, text: &str) -> Result<Document>;
    fn dump(&self, doc: &Document) -> Result<String>;

    /// Hook invoked with the stack outputs after a non-detached
    /// create/update. Formats that carry post-processing logic override it.
    fn post(&self, _outputs: &HashMap<String, String>) -> Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for dyn TemplateFormat + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateFormat")
            .field("name", &self.name())
            .finish()
    }
}

pub struct JsonFormat;

impl TemplateFormat for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json", "js"]
    }

    fn parse(&self, text: &str) -> Result<Document> {
        serde_json::from_str(text).map_err(|e| Error::TemplateParse(e.to_string()))
    }

    fn dump(&self, doc: &Document) -> Result<String> {
        Ok(serde_json::to_string_pretty(doc)?)
    }
}

pub struct YamlFormat;

impl TemplateFormat for YamlFormat {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml", "template"]
    }

    fn parse(&self, text: &str) -> Result<Document> {
        serde_yaml::from_str(text).map_err(|e| Error::TemplateParse(e.to_string()))
    }

    fn dump(&self, doc: &Document) -> Result<String> {
        serde_yaml::to_string(doc).map_err(|e| Error::TemplateParse(e.to_string()))
    }
}

/// Extension-keyed registry of formats. Later registrations shadow earlier
/// ones for the same extension.
pub struct FormatRegistry {
    formats: Vec<Box<dyn TemplateFormat>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    /// Registry with the built-in JSON and YAML formats.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(JsonFormat));
        registry.register(Box::new(YamlFormat));
        registry
    }

    pub fn register(&mut self, format: Box<dyn TemplateFormat>) {
        self.formats.push(format);
    }

    pub fn find_by_ext(&self, ext: &str) -> Option<&dyn TemplateFormat> {
        self.formats
            .iter()
            .rev()
            .find(|f| f.extensions().contains(&ext))
            .map(|f| f.as_ref())
    }

    /// Resolve a format for a source, failing with the source name echoed.
    pub fn for_source(&self, path_or_url: &str) -> Result<&dyn TemplateFormat> {
        let ext = crate::app::template::extension_of(path_or_url);
        self.find_by_ext(&ext)
            .ok_or_else(|| Error::UnknownFormat(path_or_url.to_string()))
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
