mod markdown;
mod terminal;

pub use markdown::MarkdownWriter;
pub use terminal::TerminalWriter;

use crate::error::Result;

/// Destination for one day's digest.
///
/// The formatting helpers only build text; nothing reaches the target until
/// it is passed to `append`.
pub trait DigestSink {
    /// Section header for a source, with an icon derived from `address`.
    fn header_for(&self, source: &str, address: &str) -> String;

    /// One item line. `read_later` is an optional "save for later" link.
    fn link_line(&self, title: &str, url: &str, read_later: Option<&str>) -> String;

    fn summary_block(&self, summary: &str) -> String;

    fn append(&mut self, text: &str) -> Result<()>;
}
