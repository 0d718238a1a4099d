//! XML extraction strategies.

mod generic;
pub mod recover;
mod structured;

use lazy_static::lazy_static;
use sxd_document::dom::{ChildOfElement, Element};
use sxd_document::{parser, Package};

use crate::error::ExtractError;

pub(crate) use generic::generic_passages;
pub use structured::StructuredDialect;
pub(crate) use structured::structured_passages;

lazy_static! {
    static ref XP_FACTORY: sxd_xpath::Factory = sxd_xpath::Factory::new();
}

/// Leniently parses raw bytes into an XML package.
///
/// Invalid UTF-8 is replaced, then the markup goes through [`recover::recover`]
/// so that only a body without any element fails.
pub fn parse_lenient(body: &[u8]) -> Result<Package, ExtractError> {
    let raw = String::from_utf8_lossy(body);
    let xml = recover::recover(&raw)?;
    parser::parse(&xml).map_err(|e| ExtractError::Parse(e.to_string()))
}

/// Returns the single element below the document root.
pub(crate) fn root_element(package: &Package) -> Result<Element<'_>, ExtractError> {
    package
        .as_document()
        .root()
        .children()
        .into_iter()
        .find_map(|child| child.element())
        .ok_or_else(|| ExtractError::Parse("missing root element".into()))
}

/// Every non blank text node of the document, trimmed, in document order.
pub(crate) fn all_text(package: &Package) -> Result<Vec<String>, ExtractError> {
    let document = package.as_document();
    let xpath = XP_FACTORY
        .build("//text()")
        .map_err(|e| ExtractError::Parse(e.to_string()))?
        .ok_or_else(|| ExtractError::Parse("missing XPath".into()))?;

    let value = xpath
        .evaluate(&sxd_xpath::Context::new(), document.root())
        .map_err(|e| ExtractError::Parse(e.to_string()))?;

    let texts = match value {
        sxd_xpath::Value::Nodeset(nodes) => nodes
            .document_order()
            .into_iter()
            .map(|node| node.string_value().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect(),
        _ => Vec::new(),
    };
    Ok(texts)
}

/// Concatenation of all descendant text nodes.
pub(crate) fn inner_text(element: Element) -> String {
    let mut text = String::new();
    push_text(element, &mut text);
    text
}

fn push_text(element: Element, text: &mut String) {
    for child in element.children() {
        match child {
            ChildOfElement::Text(t) => text.push_str(t.text()),
            ChildOfElement::Element(e) => push_text(e, text),
            _ => (),
        }
    }
}

/// Child elements only.
pub(crate) fn child_elements<'d>(element: Element<'d>) -> impl Iterator<Item = Element<'d>> {
    element
        .children()
        .into_iter()
        .filter_map(|child| child.element())
}

/// Value of the `lang` / `xml:lang` attribute.
pub(crate) fn language_of<'d>(element: Element<'d>) -> Option<&'d str> {
    element
        .attributes()
        .into_iter()
        .find(|attr| attr.name().local_part() == "lang")
        .map(|attr| attr.value())
}
