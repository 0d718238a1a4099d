use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sxd_document::dom::Element;
use sxd_document::Package;

use super::{child_elements, inner_text, root_element};
use crate::error::ExtractError;

lazy_static! {
    static ref LETTER_RUN: Regex = Regex::new(r"\p{L}{5,}").unwrap();
}

/// Paragraphs at least this long are never treated as a speaker list.
const SPEAKER_LIST_MAX_LEN: usize = 100;

/// Paragraphs shorter than this need a real word to be kept.
const SHORT_FRAGMENT_LEN: usize = 20;

/// Element names of the structured minutes dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDialect {
    #[serde(default = "default_section_kinds")]
    pub section_kinds: Vec<String>,

    #[serde(default = "default_paragraph")]
    pub paragraph: String,

    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_speaker_tags")]
    pub speaker_tags: Vec<String>,
}

impl Default for StructuredDialect {
    fn default() -> Self {
        Self {
            section_kinds: default_section_kinds(),
            paragraph: default_paragraph(),
            table: default_table(),
            speaker_tags: default_speaker_tags(),
        }
    }
}

fn default_section_kinds() -> Vec<String> {
    [
        "PV.Sitting.Resumption.Text",
        "PV.Approval.Text",
        "PV.Debate.Text",
        "PV.Vote.Text",
        "PV.Other.Text",
        "PV.Sitting.Closure.Text",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_paragraph() -> String {
    String::from("PARA")
}

fn default_table() -> String {
    String::from("TABLE")
}

fn default_speaker_tags() -> Vec<String> {
    vec![String::from("ORATEUR.LIST"), String::from("PARTICIPANT.NAME")]
}

impl StructuredDialect {
    fn is_section(&self, name: &str) -> bool {
        self.section_kinds.iter().any(|kind| kind == name)
    }

    fn is_speaker_tag(&self, name: &str) -> bool {
        self.speaker_tags.iter().any(|tag| tag == name)
    }

    /// Text of a paragraph, unless one of the relevance filters rejects it.
    fn accept(&self, paragraph: Element) -> Option<String> {
        let text = inner_text(paragraph).trim().to_string();
        if text.is_empty() {
            return None;
        }

        let len = text.chars().count();
        if len < SPEAKER_LIST_MAX_LEN && self.only_speakers(paragraph, &text) {
            return None;
        }
        if len < SHORT_FRAGMENT_LEN && !LETTER_RUN.is_match(&text) {
            return None;
        }
        Some(text)
    }

    fn only_speakers(&self, element: Element, text: &str) -> bool {
        child_elements(element).any(|child| {
            let is_speakers = self.is_speaker_tag(child.name().local_part())
                && inner_text(child).trim() == text;
            is_speakers || self.only_speakers(child, text)
        })
    }

    fn walk(&self, element: Element, in_section: bool, in_table: bool, out: &mut Vec<String>) {
        let name = element.name().local_part();
        let in_section = in_section || self.is_section(name);
        let in_table = in_table || name == self.table;

        if in_section && name == self.paragraph {
            if !in_table {
                out.extend(self.accept(element));
            }
            return;
        }

        for child in child_elements(element) {
            self.walk(child, in_section, in_table, out);
        }
    }
}

/// Paragraphs found under any section kind of `dialect`, in document order.
pub(crate) fn structured_passages(
    package: &Package,
    dialect: &StructuredDialect,
) -> Result<Vec<String>, ExtractError> {
    let root = root_element(package)?;
    let mut out = Vec::new();
    dialect.walk(root, false, false, &mut out);
    Ok(out)
}
