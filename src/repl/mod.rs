//! Interactive menu driving sync, edit, delete and stats.
//!
//! All document changes go through [`crate::document::mutate`] on a freshly
//! read string and are persisted with one [`DocumentStore::write`].

mod console;
pub mod draft;

pub use console::Console;

use crate::codec;
use crate::config::Config;
use crate::document::{mutate, Document};
use crate::error::{Error, Result};
use crate::model::{Command, Entry};
use crate::repo;
use crate::store::DocumentStore;
use draft::{Draft, EditAction};
use std::io::{BufRead, Write};
use tracing::info;

const RULE: &str = "═══════════════════════════════════════";

pub struct Controller<R, W> {
    config: Config,
    store: DocumentStore,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> Controller<R, W> {
    pub fn new(config: Config, console: Console<R, W>) -> Self {
        let store = DocumentStore::new(config.document.clone());
        Controller {
            config,
            store,
            console,
        }
    }

    /// Run the top-level menu until `q` or end of input.
    pub fn run(&mut self) -> Result<()> {
        self.console.say(RULE)?;
        self.console.say("       Plugin summary manager")?;
        self.console.say(RULE)?;
        self.console
            .say(format!("Plugin directory: {}", self.config.root.display()))?;

        loop {
            self.console.say("\nChoose an action:")?;
            self.console.say("  1. Synchronize (find and add new plugins)")?;
            self.console.say("  2. Edit a plugin")?;
            self.console.say("  3. Delete a plugin")?;
            self.console.say("  4. Show stats")?;
            self.console.say("  q. Quit")?;

            let choice = match self.console.choose("\nChoice: ") {
                Ok(choice) => choice,
                Err(Error::InputClosed) => break,
                Err(e) => return Err(e),
            };

            let outcome = match choice.as_str() {
                "1" => self.synchronize(),
                "2" => self.edit(),
                "3" => self.delete(),
                "4" => self.stats(),
                "q" => break,
                _ => {
                    self.console.say("invalid choice")?;
                    continue;
                }
            };

            match outcome {
                Ok(()) => {}
                Err(Error::InputClosed) => break,
                Err(e) if e.is_recoverable() => self.console.say(format!("error: {e}"))?,
                Err(e) => return Err(e),
            }
        }

        self.console.say("\nBye!")?;
        Ok(())
    }

    /// Offer every plugin folder missing from the document for adding, then
    /// warn about document entries with no folder.
    pub fn synchronize(&mut self) -> Result<()> {
        let fs_names = repo::list_from_filesystem(&self.config)?;
        let doc_names = repo::list_from_document(&self.store.read()?);

        self.console
            .say(format!("\nPlugins in directory: {}", fs_names.len()))?;
        self.console
            .say(format!("Plugins in document: {}", doc_names.len()))?;

        let diff = repo::diff(&fs_names, &doc_names);
        if diff.is_empty() {
            self.console.say("\nPlugin list is in sync, nothing to do")?;
            return Ok(());
        }

        if !diff.missing.is_empty() {
            self.console.say(format!(
                "\n{} plugin(s) not yet in the document:",
                diff.missing.len()
            ))?;
            self.console.numbered(&diff.missing)?;

            for name in &diff.missing {
                self.console.say(format!("\n--- Add plugin: {name} ---"))?;
                match self
                    .console
                    .choose("Add this plugin? (y=add / s=skip / q=stop): ")?
                    .as_str()
                {
                    "q" => break,
                    "s" => continue,
                    "y" | "" => {
                        let entry = self.collect_entry(name)?;
                        match self.commit_add(&entry) {
                            Ok(()) => {}
                            Err(e) if e.is_recoverable() => {
                                self.console.say(format!("error: {e}"))?
                            }
                            Err(e) => return Err(e),
                        }
                    }
                    other => self
                        .console
                        .say(format!("invalid choice '{other}', skipping {name}"))?,
                }
            }
        }

        if !diff.extra.is_empty() {
            self.console.say(format!(
                "\nwarning: {} plugin(s) in the document but not in the directory:",
                diff.extra.len()
            ))?;
            self.console.numbered(&diff.extra)?;
        }
        Ok(())
    }

    /// Prompt for a description and a command list ended by an empty line.
    fn collect_entry(&mut self, name: &str) -> Result<Entry> {
        let description = self.console.ask("Description: ")?.trim().to_string();
        self.console
            .say("Commands, one per line as '.cmd explanation'; empty line to finish:")?;
        let mut commands = Vec::new();
        loop {
            let line = self.console.ask("")?;
            if line.is_empty() {
                break;
            }
            commands.extend(Command::parse(&line));
        }
        Ok(Entry {
            name: name.to_string(),
            description,
            commands,
        })
    }

    fn commit_add(&mut self, entry: &Entry) -> Result<()> {
        let text = self.store.read()?;
        let content = codec::encode(&entry.description, &entry.commands);
        let (text, outcome) = mutate::add(&text, &entry.name, &content)?;
        self.store.write(&text)?;
        info!(entry = %entry.name, "added entry");

        self.console.say(format!("added plugin: {}", entry.name))?;
        if !outcome.toc_updated {
            self.console
                .say("warning: no table of contents found, it was not updated")?;
        }
        Ok(())
    }

    /// Load one entry into a draft and run the edit sub-menu on it.
    pub fn edit(&mut self) -> Result<()> {
        let text = self.store.read()?;
        let names = repo::list_from_document(&text);
        let Some(name) = self.select(&names, "\nPlugin name or number (q=back): ")? else {
            return Ok(());
        };

        let doc = Document::parse(&text);
        let node = doc
            .entries()
            .find(|e| e.is_named(&name))
            .ok_or_else(|| Error::EntryNotFound(name.clone()))?;
        let (description, commands) = codec::decode(&node.content);
        let mut draft = Draft::new(Entry {
            name,
            description,
            commands,
        });

        loop {
            self.show_draft(&draft)?;
            let input = self.console.ask("\nAction: ")?;
            let action = match EditAction::parse(&input) {
                Ok(action) => action,
                Err(e) => {
                    self.console.say(format!("error: {e}"))?;
                    continue;
                }
            };
            match self.apply(&mut draft, action) {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) if e.is_recoverable() => self.console.say(format!("error: {e}"))?,
                Err(e) => return Err(e),
            }
        }
    }

    fn show_draft(&mut self, draft: &Draft) -> Result<()> {
        self.console
            .say(format!("\n══════ Editing: {} ══════", draft.name()))?;
        self.console
            .say(format!("Description: {}", draft.description()))?;
        self.console.say("Commands:")?;
        if draft.commands().is_empty() {
            self.console.say("  (no commands)")?;
        }
        for (i, cmd) in draft.commands().iter().enumerate() {
            self.console.say(format!("  {}. {}", i + 1, cmd))?;
        }

        self.console.say("\nActions:")?;
        self.console.say("  d      edit description")?;
        self.console.say("  e <n>  edit command n")?;
        self.console.say("  a      add a command")?;
        self.console.say("  r <n>  remove command n")?;
        self.console.say("  c      clear all commands")?;
        self.console.say("  s      save and return")?;
        self.console.say("  q      discard changes and return")?;
        Ok(())
    }

    /// Apply one sub-menu action. Returns true when the session is over.
    fn apply(&mut self, draft: &mut Draft, action: EditAction) -> Result<bool> {
        match action {
            EditAction::Description => {
                let text = self
                    .console
                    .ask("New description (empty keeps current): ")?;
                if draft.set_description(&text) {
                    self.console.say("description updated")?;
                }
            }
            EditAction::EditCommand(index) => {
                let current = draft.command(index)?.to_string();
                self.console.say(format!("Current: {current}"))?;
                let line = self.console.ask("New command (.cmd explanation): ")?;
                if draft.replace_command(index, &line)? {
                    self.console.say("command updated")?;
                }
            }
            EditAction::AddCommand => {
                let line = self.console.ask("New command (.cmd explanation): ")?;
                if draft.append_command(&line) {
                    self.console.say("command added")?;
                }
            }
            EditAction::RemoveCommand(index) => {
                let removed = draft.remove_command(index)?;
                self.console.say(format!("removed: {removed}"))?;
            }
            EditAction::ClearCommands => {
                if self.console.choose("Clear all commands? (y/n): ")? == "y" {
                    draft.clear_commands();
                    self.console.say("commands cleared")?;
                }
            }
            EditAction::Save => {
                if draft.is_dirty() {
                    self.commit_update(draft.entry())?;
                } else {
                    self.console.say("no changes")?;
                }
                return Ok(true);
            }
            EditAction::Discard => {
                self.console.say("changes discarded")?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn commit_update(&mut self, entry: &Entry) -> Result<()> {
        let text = self.store.read()?;
        let content = codec::encode(&entry.description, &entry.commands);
        let text = mutate::update(&text, &entry.name, &content)?;
        self.store.write(&text)?;
        info!(entry = %entry.name, "updated entry");
        self.console.say(format!("updated plugin: {}", entry.name))
    }

    /// Remove one entry after an explicit `y`.
    pub fn delete(&mut self) -> Result<()> {
        let text = self.store.read()?;
        let names = repo::list_from_document(&text);
        let Some(name) = self.select(&names, "\nPlugin to delete, name or number (q=back): ")?
        else {
            return Ok(());
        };
        if !names.contains(&name) {
            return Err(Error::EntryNotFound(name));
        }

        let confirm = self
            .console
            .choose(&format!("Delete plugin \"{name}\"? (y/n): "))?;
        if confirm != "y" {
            self.console.say("cancelled")?;
            return Ok(());
        }

        let text = self.store.read()?;
        let (text, removal) = mutate::delete(&text, &name);
        self.store.write(&text)?;
        info!(
            entry = %name,
            toc_links = removal.toc_links,
            fragments = removal.fragments,
            "deleted entry"
        );
        if removal.is_empty() {
            self.console
                .say(format!("warning: no removable fragment found for {name}"))?;
        }
        self.console.say(format!("deleted plugin: {name}"))
    }

    /// Print both counts and the diff lists.
    pub fn stats(&mut self) -> Result<()> {
        let fs_names = repo::list_from_filesystem(&self.config)?;
        let doc_names = repo::list_from_document(&self.store.read()?);
        let diff = repo::diff(&fs_names, &doc_names);

        self.console
            .say(format!("\nPlugins in directory: {}", fs_names.len()))?;
        self.console
            .say(format!("Plugins in document: {}", doc_names.len()))?;
        if !diff.missing.is_empty() {
            self.console
                .say(format!("missing: {}", diff.missing.join(", ")))?;
        }
        if !diff.extra.is_empty() {
            self.console.say(format!("extra: {}", diff.extra.join(", ")))?;
        }
        Ok(())
    }

    /// List `names` and read a name or 1-based index. `None` means go back.
    fn select(&mut self, names: &[String], prompt: &str) -> Result<Option<String>> {
        self.console.say("\nPlugins in document:")?;
        self.console.numbered(names)?;
        let input = self.console.ask(prompt)?;
        let input = input.trim();
        if input.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        resolve_selection(input, names).map(Some)
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.console.into_output()
    }
}

/// Map a typed name or 1-based index onto `names`.
///
/// All-digit input is an index and must be in range; anything else is taken
/// as a name verbatim.
pub fn resolve_selection(input: &str, names: &[String]) -> Result<String> {
    if input.is_empty() {
        return Err(Error::InvalidInput("empty selection".to_string()));
    }
    if input.chars().all(|c| c.is_ascii_digit()) {
        return input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| names.get(i))
            .cloned()
            .ok_or_else(|| Error::InvalidIndex(input.to_string()));
    }
    Ok(input.to_string())
}
