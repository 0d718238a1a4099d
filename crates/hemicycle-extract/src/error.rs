/// Reasons why a document yields no usable content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("couldn't parse document: {0}")]
    Parse(String),

    #[error("no text found in document")]
    Empty,

    #[error("cleaned text too short: {len} chars, more than {min} required")]
    TooShort { len: usize, min: usize },
}
