//! Blog posts.

use serde::{Deserialize, Serialize};

use super::content::{ContentStatus, RawCounters, Stats, Visibility};
use super::resource::{FilterLiteral, FilterSupport, Resource, ResourceKind};
use super::validation::{FieldViolation, clean_tags, optional_text, required_text};

/// Longest accepted blog summary, in characters.
pub const SUMMARY_MAX_CHARS: usize = 500;

/// Topic a blog post is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlogCategory {
    /// Technology.
    Tech,
    /// Everyday life.
    Life,
    /// Study notes.
    Study,
    /// Periodic summaries.
    Summary,
    /// Diary entries.
    Diary,
    /// Essays.
    Essay,
}

impl FilterLiteral for BlogCategory {
    const ALL: &'static [Self] = &[
        Self::Tech,
        Self::Life,
        Self::Study,
        Self::Summary,
        Self::Diary,
        Self::Essay,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Tech => "TECH",
            Self::Life => "LIFE",
            Self::Study => "STUDY",
            Self::Summary => "SUMMARY",
            Self::Diary => "DIARY",
            Self::Essay => "ESSAY",
        }
    }
}

/// Normalised blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Blog {
    /// Upstream identifier.
    pub id: i64,
    /// Headline.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Optional teaser.
    pub summary: Option<String>,
    /// Publication state.
    pub status: ContentStatus,
    /// Audience.
    pub visibility: Visibility,
    /// Free-form tags; empty when upstream sent none.
    pub tags: Vec<String>,
    /// Topic, if filed.
    pub category: Option<BlogCategory>,
    /// Creation timestamp as sent upstream.
    pub created_at: String,
    /// Last update timestamp as sent upstream.
    pub updated_at: String,
    /// Engagement counters.
    pub stats: Stats,
}

/// Blog post in the upstream wire shape.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBlog {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    status: Option<ContentStatus>,
    #[serde(default)]
    visibility: Option<Visibility>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    category: Option<BlogCategory>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(flatten)]
    counters: RawCounters,
}

/// Create or replace body as received from the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogInput {
    title: Option<String>,
    content: Option<String>,
    summary: Option<String>,
    status: Option<String>,
    visibility: Option<String>,
    tags: Option<Vec<String>>,
    category: Option<String>,
}

/// Validated blog body forwarded upstream.
///
/// Updates replace the whole post, so creates and updates share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogDraft {
    title: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    status: ContentStatus,
    visibility: Visibility,
    tags: Vec<String>,
    category: BlogCategory,
}

impl BlogDraft {
    /// Validate a caller-supplied body.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldViolation`] when `title` or `content` is blank,
    /// `category` is missing or unknown, `summary` is too long, or
    /// `status`/`visibility` hold unknown literals.
    pub fn try_from_input(input: BlogInput) -> Result<Self, FieldViolation> {
        let title = required_text("title", input.title, None)?;
        let content = required_text("content", input.content, None)?;
        let category = match input.category.as_deref().map(str::trim) {
            None | Some("") => return Err(FieldViolation::blank("category")),
            Some(raw) => BlogCategory::parse_literal(raw).ok_or_else(|| {
                FieldViolation::invalid(
                    "category",
                    format!("category must be one of {}", BlogCategory::expected()),
                )
            })?,
        };
        let summary = optional_text("summary", input.summary, Some(SUMMARY_MAX_CHARS))?;
        let status = parse_status(input.status.as_deref())?;
        let visibility = parse_visibility(input.visibility.as_deref())?;

        Ok(Self {
            title,
            content,
            summary,
            status,
            visibility,
            tags: clean_tags(input.tags),
            category,
        })
    }
}

pub(crate) fn parse_status(raw: Option<&str>) -> Result<ContentStatus, FieldViolation> {
    match raw.map(str::trim) {
        None | Some("") => Ok(ContentStatus::default()),
        Some(value) => ContentStatus::parse_literal(value).ok_or_else(|| {
            FieldViolation::invalid(
                "status",
                format!("status must be one of {}", ContentStatus::expected()),
            )
        }),
    }
}

pub(crate) fn parse_visibility(raw: Option<&str>) -> Result<Visibility, FieldViolation> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Visibility::default()),
        Some(value) => Visibility::parse(value).ok_or_else(|| {
            FieldViolation::invalid("visibility", "visibility must be one of public, friends, private")
        }),
    }
}

impl Resource for Blog {
    const KIND: ResourceKind = ResourceKind::Blogs;
    const FILTERS: FilterSupport = FilterSupport::ALL;

    type Category = BlogCategory;
    type Raw = RawBlog;
    type Input = BlogInput;
    type Draft = BlogDraft;
    type PatchInput = BlogInput;
    type Patch = BlogDraft;

    fn normalize(raw: RawBlog) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            content: raw.content,
            summary: raw.summary,
            status: raw.status.unwrap_or_default(),
            visibility: raw.visibility.unwrap_or_default(),
            tags: raw.tags.unwrap_or_default(),
            category: raw.category,
            created_at: raw.created_at.unwrap_or_default(),
            updated_at: raw.updated_at.unwrap_or_default(),
            stats: raw.counters.into(),
        }
    }

    fn category(&self) -> Option<BlogCategory> {
        self.category
    }

    fn status(&self) -> Option<ContentStatus> {
        Some(self.status)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.content.as_str()];
        fields.extend(self.summary.as_deref());
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }

    fn validate_draft(input: BlogInput) -> Result<BlogDraft, FieldViolation> {
        BlogDraft::try_from_input(input)
    }

    fn validate_patch(input: BlogInput) -> Result<BlogDraft, FieldViolation> {
        BlogDraft::try_from_input(input)
    }
}
