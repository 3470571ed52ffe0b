use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::Result;

use super::DigestSink;

const HACKER_NEWS_FAVICON: &str = "https://news.ycombinator.com/favicon.ico";
const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons?sz=32&domain=";
const INSTAPAPER_ICON: &str =
    "https://staticinstapaper.s3.dualstack.us-west-2.amazonaws.com/img/favicon.png";

/// Appends a digest to `<dir>/<prefix><date><suffix>.md`.
#[derive(Debug)]
pub struct MarkdownWriter {
    path: PathBuf,
}

impl MarkdownWriter {
    /// Prepares a fresh file for `date`: creates the directory and removes
    /// whatever an earlier run left behind.
    pub fn create(dir: impl AsRef<Path>, prefix: &str, suffix: &str, date: &str) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{prefix}{date}{suffix}.md"));

        match std::fs::remove_file(&path) {
            Ok(()) => tracing::debug!("Replacing {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DigestSink for MarkdownWriter {
    fn header_for(&self, source: &str, address: &str) -> String {
        match favicon_src(source, address) {
            Some(src) => format!(
                "\n### <img src=\"{}\" width=\"32\" height=\"32\" /> {}\n",
                src, source
            ),
            None => format!("\n### 🍵 {}\n", source),
        }
    }

    fn link_line(&self, title: &str, url: &str, read_later: Option<&str>) -> String {
        let mut line = String::new();
        if let Some(later) = read_later {
            line.push_str(&format!("[<img height=\"16\" src=\"{}\">]({})", INSTAPAPER_ICON, later));
        }
        line.push_str(&format!("[{}]({})  \n", title, url));
        line
    }

    fn summary_block(&self, summary: &str) -> String {
        if summary.is_empty() {
            return String::new();
        }
        format!("{} \n\n", summary)
    }

    fn append(&mut self, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(text.as_bytes())?;
        Ok(())
    }
}

fn favicon_src(source: &str, address: &str) -> Option<String> {
    if source.contains("Hacker News") {
        return Some(HACKER_NEWS_FAVICON.to_string());
    }
    let host = Url::parse(address).ok()?.host_str()?.to_string();
    Some(format!("{}{}", FAVICON_SERVICE, host))
}
