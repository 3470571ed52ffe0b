use std::io::{IsTerminal, Write};

use url::Url;

use crate::error::Result;
use crate::tui;

use super::DigestSink;

const SUMMARY_WIDTH: usize = 88;
const SUMMARY_INDENT: &str = "    ";

/// Collects the digest in memory for display; nothing is persisted.
#[derive(Debug, Default)]
pub struct TerminalWriter {
    buffer: String,
}

impl TerminalWriter {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Shows the digest: in the pager when attached to a terminal, as plain
    /// text otherwise.
    pub fn finish(self, title: &str) -> Result<()> {
        if std::io::stdout().is_terminal() {
            tui::run_pager(title, &self.buffer)
        } else {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(self.buffer.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

impl DigestSink for TerminalWriter {
    fn header_for(&self, source: &str, address: &str) -> String {
        match Url::parse(address).ok().and_then(|u| u.host_str().map(str::to_string)) {
            Some(host) => format!("\n{} {} ({})\n", tui::HEADER_MARK, source, host),
            None => format!("\n{} {}\n", tui::HEADER_MARK, source),
        }
    }

    fn link_line(&self, title: &str, url: &str, _read_later: Option<&str>) -> String {
        format!("{} {}\n  {}\n", tui::ITEM_MARK, title, url)
    }

    fn summary_block(&self, summary: &str) -> String {
        if summary.is_empty() {
            return String::new();
        }
        let options = textwrap::Options::new(SUMMARY_WIDTH)
            .initial_indent(SUMMARY_INDENT)
            .subsequent_indent(SUMMARY_INDENT);
        format!("{}\n\n", textwrap::fill(summary, options))
    }

    fn append(&mut self, text: &str) -> Result<()> {
        self.buffer.push_str(text);
        Ok(())
    }
}
