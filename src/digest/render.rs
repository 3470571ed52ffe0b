use crate::error::Result;
use crate::output::DigestSink;

const INSTAPAPER_SAVE_URL: &str = "https://www.instapaper.com/hello2?url=";

/// Writes one item: its link line, then its summary as a separate block.
pub fn render_item<W: DigestSink + ?Sized>(
    sink: &mut W,
    title: &str,
    url: &str,
    summary: Option<&str>,
    instapaper: bool,
) -> Result<()> {
    let read_later = instapaper.then(|| instapaper_link(url));
    let line = sink.link_line(title, url, read_later.as_deref());
    sink.append(&line)?;

    if let Some(summary) = summary.filter(|s| !s.is_empty()) {
        let block = sink.summary_block(summary);
        sink.append(&block)?;
    }
    Ok(())
}

pub fn instapaper_link(url: &str) -> String {
    format!("{}{}", INSTAPAPER_SAVE_URL, urlencoding::encode(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::MemorySink;

    #[test]
    fn renders_link_then_summary() {
        let mut sink = MemorySink::default();
        render_item(&mut sink, "Post", "https://a", Some("Gist."), false).unwrap();
        assert_eq!(sink.blocks, vec!["* Post (https://a)\n", "  Gist.\n"]);
    }

    #[test]
    fn skips_empty_summary() {
        let mut sink = MemorySink::default();
        render_item(&mut sink, "Post", "https://a", Some(""), false).unwrap();
        render_item(&mut sink, "Other", "https://b", None, false).unwrap();
        assert_eq!(sink.blocks.len(), 2);
    }

    #[test]
    fn instapaper_link_is_encoded() {
        assert_eq!(
            instapaper_link("https://a.example/x?y=1"),
            "https://www.instapaper.com/hello2?url=https%3A%2F%2Fa.example%2Fx%3Fy%3D1"
        );

        let mut sink = MemorySink::default();
        render_item(&mut sink, "Post", "https://a", None, true).unwrap();
        assert_eq!(
            sink.text(),
            "* Post (https://a) [https://www.instapaper.com/hello2?url=https%3A%2F%2Fa]\n"
        );
    }
}
