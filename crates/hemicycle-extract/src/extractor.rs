use crate::clean::TextCleaner;
use crate::error::ExtractError;
use crate::format::{Format, XmlDialect};
use crate::html::html_passages;
use crate::xml::{generic_passages, parse_lenient, structured_passages, StructuredDialect};

/// Cleaned texts must be strictly longer than this many characters by default.
pub const DEFAULT_MIN_TEXT_LENGTH: usize = 50;

/// Extraction strategies, one per markup flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    GenericXml,
    StructuredXml,
    Html,
}

impl From<Format> for Strategy {
    fn from(format: Format) -> Self {
        match format {
            Format::Xml(XmlDialect::Generic) => Self::GenericXml,
            Format::Xml(XmlDialect::Structured) => Self::StructuredXml,
            Format::Html => Self::Html,
        }
    }
}

impl Strategy {
    fn passages(self, body: &[u8], extractor: &Extractor) -> Result<Vec<String>, ExtractError> {
        match self {
            Self::GenericXml => generic_passages(&parse_lenient(body)?, &extractor.language),
            Self::StructuredXml => structured_passages(&parse_lenient(body)?, &extractor.dialect),
            Self::Html => Ok(html_passages(body, &extractor.language)),
        }
    }
}

/// Turns a raw document into cleaned target-language text.
#[derive(Debug, Clone)]
pub struct Extractor {
    language: String,
    min_text_length: usize,
    dialect: StructuredDialect,
    cleaner: TextCleaner,
}

impl Extractor {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.trim().to_lowercase(),
            min_text_length: DEFAULT_MIN_TEXT_LENGTH,
            dialect: StructuredDialect::default(),
            cleaner: TextCleaner::default(),
        }
    }

    pub fn with_min_text_length(mut self, min_text_length: usize) -> Self {
        self.min_text_length = min_text_length;
        self
    }

    pub fn with_dialect(mut self, dialect: StructuredDialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_cleaner(mut self, cleaner: TextCleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Extracts and cleans the passages of `body`.
    ///
    /// Any error means the document has no usable content.
    pub fn extract(&self, body: &[u8], format: Format) -> Result<String, ExtractError> {
        let passages = Strategy::from(format).passages(body, self)?;
        if passages.is_empty() {
            return Err(ExtractError::Empty);
        }
        self.accept(&passages.join("\n"))
    }

    fn accept(&self, text: &str) -> Result<String, ExtractError> {
        let text = self.cleaner.clean(text);
        let len = text.chars().count();
        if len == 0 {
            Err(ExtractError::Empty)
        } else if len <= self.min_text_length {
            Err(ExtractError::TooShort {
                len,
                min: self.min_text_length,
            })
        } else {
            Ok(text)
        }
    }
}
