//! Line-based prompt/print over any reader and writer.

use crate::error::{Error, Result};
use std::io::{BufRead, Write};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    /// Print `prompt` without a newline and read one line.
    ///
    /// The line terminator is stripped; surrounding spaces are kept. End of
    /// input is reported as [`Error::InputClosed`].
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(Error::InputClosed);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// [`Console::ask`], trimmed and lowercased, for menu choices.
    pub fn choose(&mut self, prompt: &str) -> Result<String> {
        Ok(self.ask(prompt)?.trim().to_lowercase())
    }

    pub fn say(&mut self, message: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", message.as_ref())?;
        Ok(())
    }

    /// Print `names` as a 1-based numbered list.
    pub fn numbered<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        for (i, name) in names.iter().enumerate() {
            writeln!(self.output, "   {}. {}", i + 1, name.as_ref())?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
