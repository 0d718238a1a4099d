//! Extraction of target-language passages from parliamentary documents.
//!
//! Three markup flavours are supported: generic XML carrying `lang` / `xml:lang`
//! annotations, the structured minutes dialect made of named section elements,
//! and plain HTML. Every extracted passage goes through the [`TextCleaner`]
//! before being accepted.

pub mod clean;
mod error;
mod extractor;
mod format;
mod html;
pub mod xml;

pub use crate::clean::{default_rules, CleanRule, TextCleaner};
pub use crate::error::ExtractError;
pub use crate::extractor::{Extractor, Strategy, DEFAULT_MIN_TEXT_LENGTH};
pub use crate::format::{Format, XmlDialect};
pub use crate::xml::StructuredDialect;
