//! Node model of the summary document.
//!
//! The text is split once into typed nodes (TOC block, entry fragments, body
//! end marker, and untouched markup in between). Mutations work on nodes and
//! [`Document::render`] reassembles the text. Unmodified nodes render back to
//! their exact source bytes.

pub mod mutate;

use crate::toc::{self, Toc};
use regex::Regex;
use std::sync::LazyLock;

/// Heading anchor that identifies an entry. Counting and listing use this alone.
pub static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<h3 id="([^"]+)">"#).unwrap());

static RE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\s*)<h3 id="([^"]+)">([^<]*)</h3>(\s*)<p>([\s\S]*?)</p>(\s*)<hr>"#).unwrap()
});

// The separator that closes the body is kept with whatever precedes it; the
// node starts right after it.
static RE_BODY_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<hr>(\s*\n\s*</article>)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Markup the tool does not interpret.
    Text(String),
    Toc(Toc),
    Entry(EntryNode),
    /// Whitespace and `</article>` following the final separator.
    BodyEnd(String),
}

/// One `<h3>` / `<p>` / `<hr>` fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryNode {
    /// Whitespace in front of the heading.
    pub lead: String,
    pub name: String,
    pub display: String,
    gap_before_paragraph: String,
    /// Escaped paragraph content, see [`crate::codec`].
    pub content: String,
    gap_before_separator: String,
}

impl EntryNode {
    /// A freshly rendered fragment: heading, paragraph and separator on their own lines.
    pub fn new(name: &str, content: &str, lead: String) -> Self {
        EntryNode {
            lead,
            name: name.to_string(),
            display: name.to_string(),
            gap_before_paragraph: "\n".to_string(),
            content: content.to_string(),
            gap_before_separator: "\n".to_string(),
        }
    }

    /// True when both the anchor and the heading text are `name`.
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name && self.display == name
    }

    pub fn render(&self) -> String {
        format!(
            r#"{}<h3 id="{}">{}</h3>{}<p>{}</p>{}<hr>"#,
            self.lead,
            self.name,
            self.display,
            self.gap_before_paragraph,
            self.content,
            self.gap_before_separator
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn parse(text: &str) -> Document {
        let mut spans: Vec<(usize, usize, Node)> = Vec::new();

        if let Some((start, end, toc)) = toc::find(text) {
            spans.push((start, end, Node::Toc(toc)));
        }

        for caps in RE_ENTRY.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            spans.push((
                whole.start(),
                whole.end(),
                Node::Entry(EntryNode {
                    lead: caps[1].to_string(),
                    name: caps[2].to_string(),
                    display: caps[3].to_string(),
                    gap_before_paragraph: caps[4].to_string(),
                    content: caps[5].to_string(),
                    gap_before_separator: caps[6].to_string(),
                }),
            ));
        }

        if let Some(end) = RE_BODY_END.captures(text).and_then(|c| c.get(1)) {
            spans.push((end.start(), end.end(), Node::BodyEnd(end.as_str().to_string())));
        }

        spans.sort_by_key(|(start, _, _)| *start);

        let mut nodes = Vec::with_capacity(spans.len() * 2 + 1);
        let mut cursor = 0;
        for (start, end, node) in spans {
            // Overlapping matches stay part of the surrounding text.
            if start < cursor {
                continue;
            }
            if start > cursor {
                nodes.push(Node::Text(text[cursor..start].to_string()));
            }
            nodes.push(node);
            cursor = end;
        }
        if cursor < text.len() {
            nodes.push(Node::Text(text[cursor..].to_string()));
        }

        Document { nodes }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(s) | Node::BodyEnd(s) => out.push_str(s),
                Node::Toc(toc) => out.push_str(&toc.render()),
                Node::Entry(entry) => out.push_str(&entry.render()),
            }
        }
        out
    }

    #[cfg(test)]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[cfg(test)]
    pub fn toc(&self) -> Option<&Toc> {
        self.nodes.iter().find_map(|n| match n {
            Node::Toc(toc) => Some(toc),
            _ => None,
        })
    }

    pub(crate) fn toc_mut(&mut self) -> Option<&mut Toc> {
        self.nodes.iter_mut().find_map(|n| match n {
            Node::Toc(toc) => Some(toc),
            _ => None,
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = &EntryNode> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Entry(entry) => Some(entry),
            _ => None,
        })
    }

    /// Names of every `<h3 id>` heading, sorted and deduplicated.
    ///
    /// Includes headings whose fragment is malformed and stayed plain text.
    pub fn heading_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for node in &self.nodes {
            match node {
                Node::Entry(entry) => names.push(entry.name.clone()),
                Node::Text(text) => {
                    names.extend(RE_HEADING.captures_iter(text).map(|c| c[1].to_string()))
                }
                Node::Toc(_) | Node::BodyEnd(_) => {}
            }
        }
        names.sort();
        names.dedup();
        names
    }
}
