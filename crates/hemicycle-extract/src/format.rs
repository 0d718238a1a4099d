use serde::{Deserialize, Serialize};

/// Which XML vocabulary a source publishes its documents in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum XmlDialect {
    /// Arbitrary XML where passages carry a language attribute.
    #[default]
    Generic,
    /// Minutes made of named section elements holding paragraphs.
    Structured,
}

/// Format signal of a retrieved document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Xml(XmlDialect),
    Html,
}

impl Format {
    /// Derives the format from the document URL suffix and its declared content
    /// type. The body itself is never inspected.
    ///
    /// `application/xhtml+xml` is treated as HTML.
    pub fn detect(url: &str, content_type: Option<&str>, dialect: XmlDialect) -> Self {
        let path = url.split(|c| c == '?' || c == '#').next().unwrap_or(url);
        let xml_suffix = path.to_ascii_lowercase().ends_with(".xml");

        let xml_type = content_type
            .map(|c| c.to_ascii_lowercase())
            .map(|c| c.contains("xml") && !c.contains("xhtml"))
            .unwrap_or(false);

        if xml_suffix || xml_type {
            Self::Xml(dialect)
        } else {
            Self::Html
        }
    }
}
