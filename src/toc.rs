//! The `toc-list` block: one `<a href="#NAME">NAME</a>` link per entry.

use regex::Regex;
use std::sync::LazyLock;

pub const TOC_OPEN: &str = r#"<div class="toc-list">"#;

static RE_TOC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div class="toc-list">([\s\S]*?)(</div>\s*</div>)"#).unwrap()
});

static RE_TOC_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##"<a href="#([^"]+)">([^<]*)</a>"##).unwrap());

const LINK_INDENT: &str = "                ";
const INNER_CLOSE_INDENT: &str = "            ";
const OUTER_CLOSE_INDENT: &str = "        ";

/// Parsed `toc-list` container. Rendering an unmodified value reproduces the
/// source text exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toc {
    pub links: Vec<TocLink>,
    /// Text between the last link and the inner `</div>`.
    trail: String,
    /// The `</div> ... </div>` run closing the container.
    close: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocLink {
    /// Everything between the previous link (or the opening tag) and this one.
    lead: String,
    pub name: String,
    pub display: String,
}

/// Find the TOC block in `text`, returning its byte span and parsed form.
pub fn find(text: &str) -> Option<(usize, usize, Toc)> {
    let caps = RE_TOC.captures(text)?;
    let whole = caps.get(0)?;
    let inner = caps.get(1)?.as_str();
    let close = caps.get(2)?.as_str().to_string();

    let mut links = Vec::new();
    let mut cursor = 0;
    for link in RE_TOC_LINK.captures_iter(inner) {
        let Some(m) = link.get(0) else { continue };
        links.push(TocLink {
            lead: inner[cursor..m.start()].to_string(),
            name: link[1].to_string(),
            display: link[2].to_string(),
        });
        cursor = m.end();
    }

    Some((
        whole.start(),
        whole.end(),
        Toc {
            links,
            trail: inner[cursor..].to_string(),
            close,
        },
    ))
}

impl Toc {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(|l| l.name.as_str())
    }

    /// Replace every link with a freshly indented list of `names`, in the given order.
    pub fn rebuild<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.links = names
            .into_iter()
            .map(|name| {
                let name: String = name.into();
                TocLink {
                    lead: format!("\n{LINK_INDENT}"),
                    display: name.clone(),
                    name,
                }
            })
            .collect();
        self.trail = format!("\n{INNER_CLOSE_INDENT}");
        self.close = format!("</div>\n{OUTER_CLOSE_INDENT}</div>");
    }

    /// Drop every `<a href="#name">name</a>` link together with the whitespace
    /// in front of it. Returns how many links were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let mut removed = 0;
        let mut carry = String::new();
        let mut kept: Vec<TocLink> = Vec::with_capacity(self.links.len());

        for mut link in std::mem::take(&mut self.links) {
            if link.name == name && link.display == name {
                // Non-whitespace text before the link survives.
                carry.push_str(link.lead.trim_end());
                removed += 1;
                continue;
            }
            if !carry.is_empty() {
                link.lead = std::mem::take(&mut carry) + &link.lead;
            }
            kept.push(link);
        }
        if !carry.is_empty() {
            self.trail = carry + &self.trail;
        }
        self.links = kept;
        removed
    }

    pub fn render(&self) -> String {
        let mut out = String::from(TOC_OPEN);
        for link in &self.links {
            out.push_str(&link.lead);
            out.push_str(&link.render());
        }
        out.push_str(&self.trail);
        out.push_str(&self.close);
        out
    }
}

impl TocLink {
    pub fn render(&self) -> String {
        format!(r##"<a href="#{}">{}</a>"##, self.name, self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "<nav>\n    <div class=\"toc\">\n        <div class=\"toc-list\">\n            <a href=\"#alpha\">alpha</a>\n            <a href=\"#gamma\">gamma</a>\n        </div>\n    </div>\n</nav>";

    #[test]
    fn find_parses_links() {
        let (start, end, toc) = find(SAMPLE).unwrap();
        assert_eq!(toc.names().collect::<Vec<_>>(), vec!["alpha", "gamma"]);
        assert!(SAMPLE[start..end].starts_with(TOC_OPEN));
        assert!(SAMPLE[start..end].ends_with("</div>\n    </div>"));
    }

    #[test]
    fn render_unmodified_is_identity() {
        let (start, end, toc) = find(SAMPLE).unwrap();
        assert_eq!(toc.render(), &SAMPLE[start..end]);
    }

    #[test]
    fn rebuild_uses_fixed_indentation() {
        let (_, _, mut toc) = find(SAMPLE).unwrap();
        toc.rebuild(["alpha", "beta"]);
        assert_eq!(
            toc.render(),
            "<div class=\"toc-list\">\n                <a href=\"#alpha\">alpha</a>\n                <a href=\"#beta\">beta</a>\n            </div>\n        </div>"
        );
    }

    #[test]
    fn remove_drops_link_and_leading_whitespace() {
        let (start, end, mut toc) = find(SAMPLE).unwrap();
        assert_eq!(toc.remove("alpha"), 1);
        let expected = SAMPLE[start..end].replace("\n            <a href=\"#alpha\">alpha</a>", "");
        assert_eq!(toc.render(), expected);
        assert_eq!(toc.remove("alpha"), 0);
    }

    #[test]
    fn remove_keeps_surrounding_markup() {
        let text = "<div class=\"toc-list\"><b>x</b> <a href=\"#a\">a</a></div></div>";
        let (_, _, mut toc) = find(text).unwrap();
        toc.remove("a");
        assert_eq!(toc.render(), "<div class=\"toc-list\"><b>x</b></div></div>");
    }

    #[test]
    fn missing_block() {
        assert!(find("<div class=\"toc\"></div>").is_none());
    }

    #[test]
    fn link_rendering() {
        let (_, _, toc) = find(SAMPLE).unwrap();
        assert_eq!(toc.links[1].render(), "<a href=\"#gamma\">gamma</a>");
    }
}
