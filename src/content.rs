use std::fmt;

pub const POSTS_CSV: &str = "posts.csv";
pub const COMMENTS_CSV: &str = "comments.csv";
pub const POST_VOTES_CSV: &str = "post_votes.csv";
pub const COMMENT_VOTES_CSV: &str = "comment_votes.csv";

pub const PERMALINK: &str = "permalink";
pub const SUBREDDIT: &str = "subreddit";
pub const TITLE: &str = "title";
pub const BODY: &str = "body";
pub const BODY_PREVIEW: &str = "body_preview";
pub const DATE: &str = "date";
pub const DIRECTION: &str = "direction";

pub const REAL_UPS: &str = "real_ups";
pub const REAL_COMMENTS: &str = "real_comments";

/// Which listing an export row points at.
///
/// Decides where the counts live in the `.json` response and which
/// columns enrichment adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Post,
    Comment,
}

impl ContentKind {
    /// Index of the listing that carries the addressed item.
    pub fn listing_index(self) -> usize {
        match self {
            ContentKind::Post => 0,
            ContentKind::Comment => 1,
        }
    }

    /// Export entry holding rows of this kind.
    pub fn csv_name(self) -> &'static str {
        match self {
            ContentKind::Post => POSTS_CSV,
            ContentKind::Comment => COMMENTS_CSV,
        }
    }

    /// Columns printed in the top-N ranking, in order.
    pub fn display_columns(self) -> &'static [&'static str] {
        match self {
            ContentKind::Post => &[SUBREDDIT, TITLE, REAL_UPS, REAL_COMMENTS],
            ContentKind::Comment => &[SUBREDDIT, BODY_PREVIEW, REAL_UPS],
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Post => f.write_str("post"),
            ContentKind::Comment => f.write_str("comment"),
        }
    }
}
