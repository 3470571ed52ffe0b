/// One entry pulled from a remote feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub url: String,
    pub title: String,
    /// Plain-text body, when the feed ships one.
    pub content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FetchedFeed {
    pub title: String,
    pub site_url: Option<String>,
    pub items: Vec<FeedItem>,
}

impl FetchedFeed {
    /// Address used for the section icon: the site link, else the first item.
    pub fn icon_address(&self) -> &str {
        self.site_url
            .as_deref()
            .or_else(|| self.items.first().map(|item| item.url.as_str()))
            .unwrap_or("")
    }
}
