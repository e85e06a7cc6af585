//! Add, update and delete entries while keeping the TOC and body sorted.
//!
//! Each operation either fully succeeds on the in-memory [`Document`] or
//! returns an error before anything changed. Persisting the result (and
//! recounting) is the store's job.

use super::{Document, EntryNode, Node, RE_HEADING};
use crate::error::{Error, Result};
use tracing::{debug, warn};

/// Body end written after an appended fragment.
const BODY_CLOSE: &str = "\n\n    </article>";

/// What an add touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    /// False when the document has no TOC block; the body insert still happened.
    pub toc_updated: bool,
}

/// What a delete removed. Both counts are zero when the entry was already gone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Removal {
    pub toc_links: usize,
    pub fragments: usize,
}

impl Removal {
    pub fn is_empty(&self) -> bool {
        self.toc_links == 0 && self.fragments == 0
    }
}

impl Document {
    /// Insert a new entry fragment in sorted position and rebuild the TOC.
    ///
    /// The position is taken from every `<h3 id>` heading, so a malformed
    /// fragment still orders its neighbours.
    pub fn add_entry(&mut self, name: &str, content: &str) -> Result<AddOutcome> {
        let headings = self.heading_names();
        if headings.iter().any(|existing| existing == name) {
            return Err(Error::PatternMismatch(format!(
                "entry {name} is already in the document"
            )));
        }

        // Headings are sorted, so the first larger name is the insertion point.
        let next = headings.into_iter().find(|existing| existing.as_str() > name);

        let (at, inserted) = self
            .nodes
            .iter_mut()
            .enumerate()
            .find_map(|(i, node)| {
                splice_before(node, next.as_deref(), name, content).map(|nodes| (i, nodes))
            })
            .ok_or_else(|| {
                Error::PatternMismatch(match &next {
                    Some(next) => format!("heading of {next}"),
                    None => "end of the article body".to_string(),
                })
            })?;

        let toc_updated = match self.toc_mut() {
            Some(toc) => {
                let mut names: Vec<String> = toc.names().map(str::to_string).collect();
                names.push(name.to_string());
                names.sort();
                names.dedup();
                toc.rebuild(names);
                true
            }
            None => {
                warn!(entry = name, "no toc-list block found, table of contents left unchanged");
                false
            }
        };

        debug!(entry = name, before = ?next, "inserting fragment");
        self.nodes.splice(at..at, inserted);
        Ok(AddOutcome { toc_updated })
    }

    /// Replace the paragraph of exactly one entry. The name never changes.
    pub fn update_entry(&mut self, name: &str, content: &str) -> Result<()> {
        let matching: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| matches!(n, Node::Entry(e) if e.is_named(name)))
            .map(|(i, _)| i)
            .collect();

        match matching.as_slice() {
            [] => Err(Error::EntryNotFound(name.to_string())),
            [index] => {
                if let Node::Entry(entry) = &mut self.nodes[*index] {
                    let lead = std::mem::take(&mut entry.lead);
                    *entry = EntryNode::new(name, content, lead);
                }
                Ok(())
            }
            _ => Err(Error::PatternMismatch(format!(
                "entry {name} appears {} times",
                matching.len()
            ))),
        }
    }

    /// Remove the TOC link and the fragment for `name`. Missing parts are ignored.
    pub fn remove_entry(&mut self, name: &str) -> Removal {
        let toc_links = self.toc_mut().map_or(0, |toc| toc.remove(name));

        let before = self.nodes.len();
        self.nodes
            .retain(|n| !matches!(n, Node::Entry(e) if e.is_named(name)));
        let fragments = before - self.nodes.len();

        Removal {
            toc_links,
            fragments,
        }
    }
}

/// Nodes to insert in front of `node` when it is the insertion point for a
/// new entry that sorts before `next` (or last, when `next` is `None`).
/// `node` is adjusted in place. Returns `None` when `node` is not the point.
fn splice_before(
    node: &mut Node,
    next: Option<&str>,
    name: &str,
    content: &str,
) -> Option<Vec<Node>> {
    match (node, next) {
        (Node::BodyEnd(end), None) => {
            *end = BODY_CLOSE.to_string();
            Some(vec![Node::Entry(EntryNode::new(name, content, "\n\n".to_string()))])
        }
        (Node::Entry(entry), Some(next)) if entry.name == next => {
            // The whitespace before `next` now precedes the new fragment.
            let lead = std::mem::replace(&mut entry.lead, "\n".to_string()) + "\n";
            Some(vec![Node::Entry(EntryNode::new(name, content, lead))])
        }
        (Node::Text(text), Some(next)) => {
            let start = RE_HEADING
                .captures_iter(text)
                .find(|c| &c[1] == next)?
                .get(0)?
                .start();
            let before = text[..start].to_string();
            let after = format!("\n{}", &text[start..]);
            *text = after;

            let mut nodes = Vec::with_capacity(2);
            if !before.is_empty() {
                nodes.push(Node::Text(before));
            }
            nodes.push(Node::Entry(EntryNode::new(name, content, "\n".to_string())));
            Some(nodes)
        }
        _ => None,
    }
}

/// Add `name` with paragraph `content` to `text`.
pub fn add(text: &str, name: &str, content: &str) -> Result<(String, AddOutcome)> {
    let mut doc = Document::parse(text);
    let outcome = doc.add_entry(name, content)?;
    Ok((doc.render(), outcome))
}

/// Replace the paragraph of `name` in `text`.
pub fn update(text: &str, name: &str, content: &str) -> Result<String> {
    let mut doc = Document::parse(text);
    doc.update_entry(name, content)?;
    Ok(doc.render())
}

/// Remove `name` from `text`. Deleting an absent entry returns the text unchanged.
pub fn delete(text: &str, name: &str) -> (String, Removal) {
    let mut doc = Document::parse(text);
    let removal = doc.remove_entry(name);
    (doc.render(), removal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::tests::SAMPLE;

    #[test]
    fn add_between_inserts_before_next_heading() {
        let (text, outcome) = add(SAMPLE, "beta", "desc").unwrap();
        assert!(outcome.toc_updated);
        assert!(text.contains(
            "<hr>\n\n\n<h3 id=\"beta\">beta</h3>\n<p>desc</p>\n<hr>\n<h3 id=\"gamma\">gamma</h3>"
        ));
        let doc = Document::parse(&text);
        assert_eq!(doc.heading_names(), vec!["alpha", "beta", "gamma"]);
        let order: Vec<&str> = doc.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn add_rebuilds_toc_in_order() {
        let (text, _) = add(SAMPLE, "beta", "desc").unwrap();
        assert!(text.contains(
            "<div class=\"toc-list\">\n                <a href=\"#alpha\">alpha</a>\n                <a href=\"#beta\">beta</a>\n                <a href=\"#gamma\">gamma</a>\n            </div>\n        </div>"
        ));
    }

    #[test]
    fn add_last_goes_before_article_close() {
        let (text, _) = add(SAMPLE, "zeta", "z").unwrap();
        assert!(text.contains(
            "<p>third &amp; last</p>\n<hr>\n\n<h3 id=\"zeta\">zeta</h3>\n<p>z</p>\n<hr>\n\n    </article>"
        ));
        let doc = Document::parse(&text);
        let order: Vec<&str> = doc.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["alpha", "gamma", "zeta"]);
    }

    #[test]
    fn add_first_goes_before_first_entry() {
        let (text, _) = add(SAMPLE, "Zulu", "upper sorts first").unwrap();
        let doc = Document::parse(&text);
        let order: Vec<&str> = doc.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["Zulu", "alpha", "gamma"]);
    }

    #[test]
    fn add_without_toc_still_inserts() {
        let text = "<article>\n<h3 id=\"a\">a</h3>\n<p>x</p>\n<hr>\n</article>";
        let (out, outcome) = add(text, "b", "y").unwrap();
        assert!(!outcome.toc_updated);
        assert_eq!(Document::parse(&out).heading_names(), vec!["a", "b"]);
    }

    #[test]
    fn add_last_without_body_end_fails() {
        let text = "<div class=\"toc-list\"></div></div>";
        let err = add(text, "a", "x").unwrap_err();
        assert!(matches!(err, Error::PatternMismatch(_)));
    }

    #[test]
    fn add_orders_around_malformed_fragment() {
        let text = "<article>\n<h3 id=\"a\">a</h3>\n<p>x</p>\n<hr>\n<h3 id=\"c\">c</h3>\n<div>broken</div>\n<hr>\n</article>";
        let (out, _) = add(text, "b", "y").unwrap();
        assert_eq!(
            out,
            "<article>\n<h3 id=\"a\">a</h3>\n<p>x</p>\n<hr>\n\n<h3 id=\"b\">b</h3>\n<p>y</p>\n<hr>\n<h3 id=\"c\">c</h3>\n<div>broken</div>\n<hr>\n</article>"
        );
        assert_eq!(Document::parse(&out).heading_names(), vec!["a", "b", "c"]);

        let err = add(text, "c", "again").unwrap_err();
        assert!(matches!(err, Error::PatternMismatch(_)));
    }

    #[test]
    fn add_existing_name_fails() {
        let err = add(SAMPLE, "alpha", "again").unwrap_err();
        assert!(matches!(err, Error::PatternMismatch(_)));
    }

    #[test]
    fn update_replaces_whole_fragment() {
        let text = update(SAMPLE, "gamma", "new &lt;body&gt;").unwrap();
        assert!(text.contains("\n\n<h3 id=\"gamma\">gamma</h3>\n<p>new &lt;body&gt;</p>\n<hr>\n    </article>"));
        assert!(!text.contains("third &amp; last"));
        assert!(text.contains("第一个"));
    }

    #[test]
    fn update_missing_entry() {
        let err = update(SAMPLE, "beta", "x").unwrap_err();
        assert!(matches!(err, Error::EntryNotFound(ref n) if n == "beta"));
    }

    #[test]
    fn update_duplicate_entry_is_ambiguous() {
        let text = SAMPLE.replace(
            "<h3 id=\"gamma\">",
            "<h3 id=\"alpha\">alpha</h3>\n<p>dup</p>\n<hr>\n<h3 id=\"gamma\">",
        );
        let err = update(&text, "alpha", "x").unwrap_err();
        assert!(matches!(err, Error::PatternMismatch(_)));
    }

    #[test]
    fn delete_removes_toc_link_and_fragment() {
        let (text, removal) = delete(SAMPLE, "alpha");
        assert_eq!(
            removal,
            Removal {
                toc_links: 1,
                fragments: 1
            }
        );
        assert!(!text.contains("alpha"));
        assert!(!text.contains("第一个"));
        assert!(text.contains("<article>\n\n<h3 id=\"gamma\">"));
        assert_eq!(Document::parse(&text).heading_names(), vec!["gamma"]);
    }

    #[test]
    fn delete_is_idempotent() {
        let (once, _) = delete(SAMPLE, "gamma");
        let (twice, removal) = delete(&once, "gamma");
        assert_eq!(once, twice);
        assert!(removal.is_empty());
    }

    #[test]
    fn delete_unknown_leaves_text_unchanged() {
        let (text, removal) = delete(SAMPLE, "omega");
        assert_eq!(text, SAMPLE);
        assert!(removal.is_empty());
    }
}
