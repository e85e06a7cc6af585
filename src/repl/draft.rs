//! In-memory edit session for one entry, and parsing of the edit sub-menu.

use crate::error::{Error, Result};
use crate::model::{Command, Entry};

/// One edit sub-menu choice. Indices are 1-based as typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Description,
    EditCommand(usize),
    AddCommand,
    RemoveCommand(usize),
    ClearCommands,
    Save,
    Discard,
}

impl EditAction {
    /// Parse `d`, `e N`, `a`, `r N`, `c`, `s` or `q`.
    pub fn parse(input: &str) -> Result<EditAction> {
        let input = input.trim().to_lowercase();
        let action = match input.as_str() {
            "d" => EditAction::Description,
            "a" => EditAction::AddCommand,
            "c" => EditAction::ClearCommands,
            "s" => EditAction::Save,
            "q" => EditAction::Discard,
            _ => {
                if let Some(index) = input.strip_prefix("e ") {
                    EditAction::EditCommand(parse_index(index)?)
                } else if let Some(index) = input.strip_prefix("r ") {
                    EditAction::RemoveCommand(parse_index(index)?)
                } else {
                    return Err(Error::InvalidInput(input.clone()));
                }
            }
        };
        Ok(action)
    }
}

fn parse_index(text: &str) -> Result<usize> {
    text.trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("not a number: {}", text.trim())))
}

/// Working copy of an entry. Nothing is written until the caller saves.
#[derive(Debug, Clone)]
pub struct Draft {
    original: Entry,
    current: Entry,
}

impl Draft {
    pub fn new(entry: Entry) -> Self {
        Draft {
            current: entry.clone(),
            original: entry,
        }
    }

    pub fn name(&self) -> &str {
        &self.current.name
    }

    pub fn description(&self) -> &str {
        &self.current.description
    }

    pub fn commands(&self) -> &[Command] {
        &self.current.commands
    }

    pub fn entry(&self) -> &Entry {
        &self.current
    }

    /// True when description or commands differ from what was loaded.
    pub fn is_dirty(&self) -> bool {
        self.current != self.original
    }

    /// Replace the description. Blank input keeps the current one.
    pub fn set_description(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.current.description = text.to_string();
        true
    }

    /// Command at 1-based `index`.
    pub fn command(&self, index: usize) -> Result<&Command> {
        index
            .checked_sub(1)
            .and_then(|i| self.current.commands.get(i))
            .ok_or_else(|| Error::InvalidIndex(index.to_string()))
    }

    /// Replace the command at 1-based `index` with a `NAME EXPLANATION` line.
    /// A blank line keeps the existing command.
    pub fn replace_command(&mut self, index: usize, line: &str) -> Result<bool> {
        self.command(index)?;
        match Command::parse(line) {
            Some(cmd) => {
                self.current.commands[index - 1] = cmd;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Append a `NAME EXPLANATION` line. Blank lines are ignored.
    pub fn append_command(&mut self, line: &str) -> bool {
        match Command::parse(line) {
            Some(cmd) => {
                self.current.commands.push(cmd);
                true
            }
            None => false,
        }
    }

    pub fn remove_command(&mut self, index: usize) -> Result<Command> {
        self.command(index)?;
        Ok(self.current.commands.remove(index - 1))
    }

    pub fn clear_commands(&mut self) {
        self.current.commands.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Draft {
        Draft::new(Entry {
            name: "ping".to_string(),
            description: "测试插件".to_string(),
            commands: vec![
                Command::parse(".ping 检查").unwrap(),
                Command::parse(".help 帮助信息").unwrap(),
            ],
        })
    }

    #[test]
    fn parse_actions() {
        assert_eq!(EditAction::parse("d").unwrap(), EditAction::Description);
        assert_eq!(EditAction::parse(" E 2 ").unwrap(), EditAction::EditCommand(2));
        assert_eq!(EditAction::parse("r 1").unwrap(), EditAction::RemoveCommand(1));
        assert_eq!(EditAction::parse("a").unwrap(), EditAction::AddCommand);
        assert_eq!(EditAction::parse("c").unwrap(), EditAction::ClearCommands);
        assert_eq!(EditAction::parse("s").unwrap(), EditAction::Save);
        assert_eq!(EditAction::parse("q").unwrap(), EditAction::Discard);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(EditAction::parse("x"), Err(Error::InvalidInput(_))));
        assert!(matches!(EditAction::parse("e two"), Err(Error::InvalidInput(_))));
        assert!(matches!(EditAction::parse("e"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn fresh_draft_is_clean() {
        assert!(!draft().is_dirty());
    }

    #[test]
    fn blank_description_keeps_current() {
        let mut d = draft();
        assert!(!d.set_description("   "));
        assert!(!d.is_dirty());
        assert!(d.set_description("新描述"));
        assert_eq!(d.description(), "新描述");
        assert!(d.is_dirty());
    }

    #[test]
    fn replace_and_remove_by_index() {
        let mut d = draft();
        assert!(d.replace_command(2, ".h help").unwrap());
        assert_eq!(d.commands()[1].to_string(), ".h help");
        let removed = d.remove_command(1).unwrap();
        assert_eq!(removed.name, ".ping");
        assert_eq!(d.commands().len(), 1);
    }

    #[test]
    fn out_of_range_index() {
        let mut d = draft();
        assert!(matches!(d.replace_command(0, ".x"), Err(Error::InvalidIndex(_))));
        assert!(matches!(d.remove_command(3), Err(Error::InvalidIndex(_))));
        assert!(!d.is_dirty());
    }

    #[test]
    fn append_and_clear() {
        let mut d = draft();
        assert!(!d.append_command(""));
        assert!(d.append_command(".new 新命令"));
        assert_eq!(d.commands().len(), 3);
        d.clear_commands();
        assert!(d.commands().is_empty());
        assert!(d.is_dirty());
    }

    #[test]
    fn undoing_changes_is_clean_again() {
        let mut d = draft();
        d.append_command(".tmp");
        d.remove_command(3).unwrap();
        assert!(!d.is_dirty());
    }
}
