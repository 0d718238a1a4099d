//! Recovery pass turning arbitrary, possibly broken, XML into a well-formed
//! and namespace-free document.
//!
//! Unclosed elements are closed, stray closing tags dropped, unknown entities
//! resolved (HTML5 names) or kept verbatim, malformed attributes discarded and
//! namespace prefixes stripped. A `<` that can't start markup, and tags whose
//! name is not a valid XML name, are kept as text. Everything is wrapped in a single
//! [`RECOVERED_ROOT`] element so that loose text and multiple roots survive.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt::Write;

use lazy_static::lazy_static;
use quick_xml::escape::{escape, resolve_html5_entity, resolve_predefined_entity};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Reader;
use regex::{Captures, Regex};

use crate::error::ExtractError;

pub const RECOVERED_ROOT: &str = "recovered";

lazy_static! {
    static ref ENTITY: Regex =
        Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[A-Za-z][A-Za-z0-9]*);").unwrap();
    static ref BARE_LT: Regex =
        Regex::new(r"(?s)(<!\[CDATA\[.*?\]\]>)|<([^\p{L}_/!?]|$)").unwrap();
}

pub fn recover(input: &str) -> Result<String, ExtractError> {
    let input = escape_bare_lt(input);
    let mut reader = Reader::from_str(&input);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut doc = Rebuilder::default();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => doc.open(&e),
            Ok(Event::Empty(e)) => doc.empty(&e),
            Ok(Event::End(e)) => doc.close(&e),
            Ok(Event::Text(e)) => doc.text(&lenient_unescape(&String::from_utf8_lossy(&e))),
            Ok(Event::CData(e)) => doc.text(&String::from_utf8_lossy(&e)),
            Ok(Event::Eof) => break,
            Ok(_) => (),
            Err(e) => {
                log::debug!(
                    "Stopping XML recovery at byte {} got: {e}",
                    reader.buffer_position()
                );
                break;
            }
        }
    }

    doc.finish()
}

#[derive(Debug, Default)]
struct Rebuilder {
    out: String,
    // Local names of the open elements
    open: Vec<String>,
    elements: usize,
}

impl Rebuilder {
    fn open(&mut self, e: &BytesStart) {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        if is_valid_name(&name) {
            self.start_tag(&name, e);
            self.out.push('>');
            self.open.push(name);
        } else {
            self.raw_text("<", e, ">");
        }
    }

    fn empty(&mut self, e: &BytesStart) {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        if is_valid_name(&name) {
            self.start_tag(&name, e);
            self.out.push_str("/>");
        } else {
            self.raw_text("<", e, "/>");
        }
    }

    fn close(&mut self, e: &BytesEnd) {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        if !is_valid_name(&name) {
            self.raw_text("</", e, ">");
            return;
        }
        let Some(pos) = self.open.iter().rposition(|open| *open == name) else {
            return;
        };
        while self.open.len() > pos {
            self.pop();
        }
    }

    fn text(&mut self, text: &str) {
        self.out.push_str(&escape(text));
    }

    // Markup that is not an element, written back as the text it was
    fn raw_text(&mut self, open: &str, raw: &[u8], close: &str) {
        let raw = format!("{open}{}{close}", String::from_utf8_lossy(raw));
        self.text(&lenient_unescape(&raw));
    }

    fn pop(&mut self) {
        if let Some(name) = self.open.pop() {
            self.out.push_str("</");
            self.out.push_str(&name);
            self.out.push('>');
        }
    }

    fn start_tag(&mut self, name: &str, e: &BytesStart) {
        self.elements += 1;
        self.out.push('<');
        self.out.push_str(name);

        let mut seen = HashSet::new();
        let mut attributes = e.attributes();
        attributes.with_checks(false);
        for attr in attributes.flatten() {
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            if !is_valid_name(&key) || !seen.insert(key.clone()) {
                continue;
            }
            let raw = String::from_utf8_lossy(&attr.value);
            let value = lenient_unescape(&raw);
            write!(self.out, " {key}=\"{}\"", escape(value.as_ref())).ok();
        }
    }

    fn finish(mut self) -> Result<String, ExtractError> {
        while !self.open.is_empty() {
            self.pop();
        }
        if self.elements == 0 {
            return Err(ExtractError::Parse("no element found".into()));
        }
        Ok(format!("<{RECOVERED_ROOT}>{}</{RECOVERED_ROOT}>", self.out))
    }
}

// A `<` followed by something that can't start markup, outside CDATA sections
fn escape_bare_lt(input: &str) -> Cow<'_, str> {
    BARE_LT.replace_all(input, |caps: &Captures| match caps.get(1) {
        Some(cdata) => cdata.as_str().to_string(),
        None => format!("&lt;{}", &caps[2]),
    })
}

// Unknown entities are kept verbatim instead of failing the whole text
fn lenient_unescape(raw: &str) -> Cow<'_, str> {
    ENTITY.replace_all(raw, |caps: &Captures| {
        resolve_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    })
}

fn resolve_entity(entity: &str) -> Option<String> {
    if let Some(num) = entity.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    resolve_predefined_entity(entity)
        .or_else(|| resolve_html5_entity(entity))
        .map(String::from)
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => (),
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
