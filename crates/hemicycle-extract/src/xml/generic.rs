use sxd_document::dom::Element;
use sxd_document::Package;

use super::{all_text, child_elements, inner_text, language_of, root_element};
use crate::error::ExtractError;

/// Passages of generic XML written in `language`.
///
/// Elements whose language attribute equals `language` (ignoring case) are
/// selected; elements nested in an already selected one are not selected a
/// second time. Without any such element every text node of the document is
/// used instead.
pub(crate) fn generic_passages(
    package: &Package,
    language: &str,
) -> Result<Vec<String>, ExtractError> {
    let root = root_element(package)?;

    let mut tagged = Vec::new();
    collect_tagged(root, language, &mut tagged);

    let passages = tagged
        .into_iter()
        .map(|element| inner_text(element).trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>();

    if passages.is_empty() {
        log::debug!("No element tagged with language {language}, using the whole document");
        all_text(package)
    } else {
        Ok(passages)
    }
}

fn collect_tagged<'d>(element: Element<'d>, language: &str, tagged: &mut Vec<Element<'d>>) {
    let matches = language_of(element)
        .map(|lang| lang.trim().eq_ignore_ascii_case(language))
        .unwrap_or(false);

    if matches {
        tagged.push(element);
    } else {
        for child in child_elements(element) {
            collect_tagged(child, language, tagged);
        }
    }
}
