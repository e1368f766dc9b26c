//! Message catalog translator.
//!
//! A catalog is a TOML file with a `[messages]` table mapping message ids
//! to translations:
//!
//! ```toml
//! locale = "de"
//!
//! [messages]
//! "Correct ({}/{})" = "Richtig ({}/{})"
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use sortable_core::traits::Translator;

/// Translator backed by a fixed message table. Unknown ids pass through.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogTranslator {
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    messages: HashMap<String, String>,
}

impl CatalogTranslator {
    pub fn from_messages(messages: HashMap<String, String>) -> Self {
        Self {
            locale: None,
            messages,
        }
    }

    /// Load a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog: {}", path.display()))?;
        let catalog: CatalogTranslator = toml::from_str(&content)
            .with_context(|| format!("failed to parse catalog: {}", path.display()))?;
        tracing::debug!(
            locale = catalog.locale.as_deref().unwrap_or("unknown"),
            entries = catalog.messages.len(),
            "loaded message catalog"
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Translator for CatalogTranslator {
    fn gettext(&self, msgid: &str) -> String {
        self.messages
            .get(msgid)
            .cloned()
            .unwrap_or_else(|| msgid.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("de.toml");
        std::fs::write(
            &path,
            r#"
locale = "de"

[messages]
"Correct ({}/{})" = "Richtig ({}/{})"
"Incorrect ({}/{})" = "Falsch ({}/{})"
"#,
        )
        .unwrap();

        let catalog = CatalogTranslator::load(&path).unwrap();
        assert_eq!(catalog.locale.as_deref(), Some("de"));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.gettext("Correct ({}/{})"), "Richtig ({}/{})");
        assert_eq!(
            catalog.gettext("Max number of attempts reached"),
            "Max number of attempts reached"
        );
    }

    #[test]
    fn missing_catalog_is_an_error() {
        assert!(CatalogTranslator::load(Path::new("/nonexistent/catalog.toml")).is_err());
    }
}
