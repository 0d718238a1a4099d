use hemicycle_extract::{CleanRule, Extractor, StructuredDialect, TextCleaner, XmlDialect};
use serde::{Deserialize, Serialize};

/// Everything that differs between two document collections of the same site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceProfile {
    /// Label attached to every record
    pub source_label: String,
    /// Language code selected in the markup
    pub language: String,
    /// Cleaned texts must be strictly longer than this
    pub min_text_length: usize,
    /// Exact `title` of the next-page anchor
    pub next_label: String,
    /// Word looked up, ignoring case, in anchor texts when no title matches
    pub next_marker: String,
    pub rewrite: UrlRewrite,
    pub xml_dialect: XmlDialect,
    pub dialect: StructuredDialect,
    /// Replaces the built-in cleanup rules when set
    pub rules: Option<Vec<CleanRule>>,
}

impl Default for SourceProfile {
    fn default() -> Self {
        Self::adopted_texts()
    }
}

impl SourceProfile {
    /// Texts adopted in plenary, published as HTML with an XML alternative.
    pub fn adopted_texts() -> Self {
        Self {
            source_label: String::from("European Parliament Adopted Text"),
            language: String::from("nl"),
            min_text_length: hemicycle_extract::DEFAULT_MIN_TEXT_LENGTH,
            next_label: String::from("Volgende"),
            next_marker: String::from("Volgende"),
            rewrite: UrlRewrite::new("-TOC_NL.html", &["_NL.html", "_NL.xml"]),
            xml_dialect: XmlDialect::Generic,
            dialect: StructuredDialect::default(),
            rules: None,
        }
    }

    /// Sitting minutes, published in the structured XML dialect.
    pub fn minutes() -> Self {
        Self {
            source_label: String::from("European Parliament Minutes"),
            rewrite: UrlRewrite::new("-TOC_NL.html", &["_NL.xml", "_NL.html"]),
            xml_dialect: XmlDialect::Structured,
            ..Self::adopted_texts()
        }
    }

    pub fn extractor(&self) -> anyhow::Result<Extractor> {
        let mut extractor = Extractor::new(&self.language)
            .with_min_text_length(self.min_text_length)
            .with_dialect(self.dialect.clone());
        if let Some(rules) = &self.rules {
            extractor = extractor.with_cleaner(TextCleaner::new(rules)?);
        }
        Ok(extractor)
    }
}

/// Maps a table of contents URL to the URLs of the full document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRewrite {
    pub toc_suffix: String,
    /// Replacement suffixes in priority order; only the first two are used
    pub document_suffixes: Vec<String>,
}

impl UrlRewrite {
    pub fn new(toc_suffix: &str, document_suffixes: &[&str]) -> Self {
        Self {
            toc_suffix: toc_suffix.to_string(),
            document_suffixes: document_suffixes.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn locate(&self, page: &str) -> ItemLocator {
        let base = match page.strip_suffix(&self.toc_suffix) {
            Some(base) if !self.toc_suffix.is_empty() => base,
            _ => {
                return ItemLocator {
                    page: page.to_string(),
                    primary: page.to_string(),
                    fallback: None,
                }
            }
        };

        let mut candidates = self.document_suffixes.iter().map(|s| format!("{base}{s}"));
        ItemLocator {
            page: page.to_string(),
            primary: candidates.next().unwrap_or_else(|| page.to_string()),
            fallback: candidates.next(),
        }
    }
}

/// Where to find the full document behind a table of contents page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLocator {
    pub page: String,
    pub primary: String,
    pub fallback: Option<String>,
}
