use select::document::Document;
use select::node::Node;
use select::predicate::Name;

const LANG_ATTRS: [&str; 2] = ["lang", "xml:lang"];

/// Passages of an HTML page written in `language`.
///
/// Elements whose `lang` or `xml:lang` attribute starts with `language`
/// (ignoring case) are selected, outermost first; when there is none every
/// `<p>` is used instead.
pub(crate) fn html_passages(body: &[u8], language: &str) -> Vec<String> {
    let page = String::from_utf8_lossy(body);
    let document = Document::from(page.as_ref());

    let is_tagged = |node: &Node| has_language(node, language);
    let tagged = document
        .find(is_tagged)
        .filter(|node| !has_tagged_ancestor(node, language))
        .collect::<Vec<_>>();

    let nodes = if tagged.is_empty() {
        log::debug!("No element tagged with language {language}, using paragraphs");
        document.find(Name("p")).collect()
    } else {
        tagged
    };

    nodes
        .into_iter()
        .map(|node| visible_text(&node))
        .filter(|text| !text.is_empty())
        .collect()
}

fn has_language(node: &Node, language: &str) -> bool {
    LANG_ATTRS.iter().any(|attr| {
        node.attr(attr)
            .map(|value| value.trim().to_lowercase().starts_with(&language.to_lowercase()))
            .unwrap_or(false)
    })
}

fn has_tagged_ancestor(node: &Node, language: &str) -> bool {
    let mut parent = node.parent();
    while let Some(p) = parent {
        if has_language(&p, language) {
            return true;
        }
        parent = p.parent();
    }
    false
}

/// Text runs below `node`, each trimmed, joined by a single space.
fn visible_text(node: &Node) -> String {
    let mut runs = Vec::new();
    push_runs(node, &mut runs);
    runs.join(" ")
}

fn push_runs<'a>(node: &Node<'a>, runs: &mut Vec<&'a str>) {
    if let Some(text) = node.as_text() {
        let text = text.trim();
        if !text.is_empty() {
            runs.push(text);
        }
        return;
    }
    if matches!(node.name(), Some("script" | "style" | "noscript" | "template")) {
        return;
    }
    for child in node.children() {
        push_runs(&child, runs);
    }
}
