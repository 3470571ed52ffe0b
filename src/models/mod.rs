mod feed;
mod seen;

pub use feed::{FeedItem, FetchedFeed};
pub use seen::{
    ArchivedDay, ArchivedItem, NewSeenItem, SeenArticle, SeenRow, SeenStatus, UNKNOWN_DATE,
};
pub(crate) use seen::non_empty;

#[cfg(test)]
pub use seen::UNKNOWN_FEED;
