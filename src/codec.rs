//! Conversion between an entry's paragraph markup and its plain-text form.
//!
//! A paragraph holds an escaped description, optionally followed by the
//! command label and a `<br>`-separated list of `<code>NAME</code> EXPLANATION`
//! items:
//!
//! ```text
//! 测试插件<br><br>命令：<code>.ping</code> 检查<br><code>.help</code> 帮助信息
//! ```

use crate::model::Command;

/// Separates the description from the command list.
pub const COMMAND_LABEL: &str = "<br><br>命令：";

const LINE_BREAK: &str = "<br>";

/// Escape the three reserved markup characters.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Reverse of [`escape`]. `&amp;` is replaced last so `&amp;lt;` decodes to `&lt;`.
pub fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Render a description and its commands as paragraph markup.
pub fn encode(description: &str, commands: &[Command]) -> String {
    let mut out = escape(description);

    let items: Vec<String> = commands
        .iter()
        .filter(|cmd| !cmd.name.trim().is_empty())
        .map(|cmd| format!("<code>{}</code> {}", escape(&cmd.name), escape(&cmd.explanation)))
        .collect();

    if !items.is_empty() {
        out.push_str(COMMAND_LABEL);
        out.push_str(&items.join(LINE_BREAK));
    }
    out
}

/// Split paragraph markup back into a description and its commands.
///
/// Without the command label the whole content is the description.
pub fn decode(content: &str) -> (String, Vec<Command>) {
    let Some((description, block)) = content.split_once(COMMAND_LABEL) else {
        return (unescape(content), Vec::new());
    };

    let commands = block.split(LINE_BREAK).filter_map(decode_item).collect();

    (unescape(description), commands)
}

/// One `<code>NAME</code> EXPLANATION` item. The explanation keeps its bytes;
/// only the single separating space is dropped. Items without a `<code>`
/// pair fall back to plain `NAME EXPLANATION` parsing.
fn decode_item(item: &str) -> Option<Command> {
    let Some((name, rest)) = item
        .trim_start()
        .strip_prefix("<code>")
        .and_then(|s| s.split_once("</code>"))
    else {
        return Command::parse(&unescape(item));
    };

    let name = unescape(name.trim());
    if name.is_empty() {
        return None;
    }
    let explanation = rest.strip_prefix(' ').unwrap_or(rest);
    Some(Command {
        name,
        explanation: unescape(explanation),
    })
}
