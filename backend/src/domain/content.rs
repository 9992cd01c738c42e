//! Field types shared by blog and photo records.

use serde::{Deserialize, Serialize};

use super::resource::FilterLiteral;

/// Publication state of a blog or photo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    /// Work in progress.
    #[default]
    Draft,
    /// Visible to its audience.
    Published,
    /// Visible to the author only.
    Private,
    /// Retired but kept.
    Archived,
    /// Soft-deleted.
    Deleted,
}

impl FilterLiteral for ContentStatus {
    const ALL: &'static [Self] = &[
        Self::Draft,
        Self::Published,
        Self::Private,
        Self::Archived,
        Self::Deleted,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Private => "private",
            Self::Archived => "archived",
            Self::Deleted => "deleted",
        }
    }
}

/// Audience of a blog or photo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Anyone.
    #[default]
    Public,
    /// Friends of the author.
    Friends,
    /// The author only.
    Private,
}

impl Visibility {
    const ALL: [Self; 3] = [Self::Public, Self::Friends, Self::Private];

    /// Canonical wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Friends => "friends",
            Self::Private => "private",
        }
    }

    /// Parse a visibility literal, ignoring ASCII case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|value| value.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Engagement counters, flattened upstream and nested here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Page views.
    pub views: u64,
    /// Likes.
    pub likes: u64,
    /// Comments.
    pub comments: u64,
    /// Shares.
    pub shares: u64,
}

/// Flat upstream counters; any may be missing or null.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RawCounters {
    #[serde(default)]
    view_count: Option<u64>,
    #[serde(default)]
    like_count: Option<u64>,
    #[serde(default)]
    comment_count: Option<u64>,
    #[serde(default)]
    share_count: Option<u64>,
}

impl From<RawCounters> for Stats {
    fn from(raw: RawCounters) -> Self {
        Self {
            views: raw.view_count.unwrap_or_default(),
            likes: raw.like_count.unwrap_or_default(),
            comments: raw.comment_count.unwrap_or_default(),
            shares: raw.share_count.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counters_default_to_zero() {
        let raw: RawCounters =
            serde_json::from_value(json!({ "like_count": 3, "view_count": null }))
                .expect("counters decode");
        assert_eq!(
            Stats::from(raw),
            Stats {
                views: 0,
                likes: 3,
                comments: 0,
                shares: 0
            }
        );
    }

    #[test]
    fn statuses_use_lowercase_literals() {
        assert_eq!(ContentStatus::parse_literal("PUBLISHED"), Some(ContentStatus::Published));
        assert_eq!(
            serde_json::to_value(ContentStatus::Archived).expect("status serialises"),
            json!("archived")
        );
    }

    #[test]
    fn visibility_parses_ignoring_case() {
        assert_eq!(Visibility::parse(" Friends"), Some(Visibility::Friends));
        assert_eq!(Visibility::parse("everyone"), None);
    }
}
