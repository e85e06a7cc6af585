//! Plain-text entry data, independent of the document markup.

use std::fmt;

/// One plugin as the user edits it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub description: String,
    /// Order is preserved as entered.
    pub commands: Vec<Command>,
}

/// A command such as `.ping` with its explanation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub explanation: String,
}

impl Command {
    /// Parse a `NAME EXPLANATION` line, splitting on the first space.
    ///
    /// Returns `None` for blank lines. A line without a space has an empty
    /// explanation.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (name, explanation) = line.split_once(' ').unwrap_or((line, ""));
        Some(Command {
            name: name.to_string(),
            explanation: explanation.to_string(),
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.explanation.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} {}", self.name, self.explanation)
        }
    }
}
