//! Photo gallery entries.

use serde::{Deserialize, Serialize};

use super::blog::{parse_status, parse_visibility};
use super::content::{ContentStatus, RawCounters, Stats, Visibility};
use super::resource::{FilterLiteral, FilterSupport, Resource, ResourceKind};
use super::validation::{FieldViolation, clean_tags, optional_text};

/// Longest accepted photo title, in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Longest accepted location name, in characters.
pub const LOCATION_MAX_CHARS: usize = 200;

/// Genre a photo is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PhotoCategory {
    /// Self-portraits.
    Selfie,
    /// Everyday snapshots.
    Daily,
    /// Portraits.
    Portrait,
    /// Landscapes.
    Landscape,
    /// Artwork.
    Art,
}

impl FilterLiteral for PhotoCategory {
    const ALL: &'static [Self] = &[
        Self::Selfie,
        Self::Daily,
        Self::Portrait,
        Self::Landscape,
        Self::Art,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Selfie => "SELFIE",
            Self::Daily => "DAILY",
            Self::Portrait => "PORTRAIT",
            Self::Landscape => "LANDSCAPE",
            Self::Art => "ART",
        }
    }
}

/// Normalised photo entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Photo {
    /// Upstream identifier.
    pub id: i64,
    /// Optional caption title.
    pub title: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Image URLs; empty when upstream sent none.
    pub url_list: Vec<String>,
    /// Where the photo was taken.
    pub location_name: Option<String>,
    /// Publication state.
    pub status: ContentStatus,
    /// Audience.
    pub visibility: Visibility,
    /// Free-form tags; empty when upstream sent none.
    pub tags: Vec<String>,
    /// Genre, if filed.
    pub category: Option<PhotoCategory>,
    /// Capture timestamp as sent upstream.
    pub taken_at: Option<String>,
    /// Creation timestamp as sent upstream.
    pub created_at: String,
    /// Last update timestamp as sent upstream.
    pub updated_at: String,
    /// Engagement counters.
    pub stats: Stats,
}

/// Photo entry in the upstream wire shape.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPhoto {
    id: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url_list: Option<Vec<String>>,
    #[serde(default)]
    location_name: Option<String>,
    #[serde(default)]
    status: Option<ContentStatus>,
    #[serde(default)]
    visibility: Option<Visibility>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    category: Option<PhotoCategory>,
    #[serde(default)]
    taken_at: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(flatten)]
    counters: RawCounters,
}

/// Create or update body as received from the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoInput {
    title: Option<String>,
    description: Option<String>,
    url_list: Option<Vec<String>>,
    location_name: Option<String>,
    status: Option<String>,
    visibility: Option<String>,
    tags: Option<Vec<String>>,
    category: Option<String>,
    taken_at: Option<String>,
}

/// Validated photo create body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    url_list: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location_name: Option<String>,
    status: ContentStatus,
    visibility: Visibility,
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<PhotoCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    taken_at: Option<String>,
}

/// Validated partial photo update; absent fields are left untouched upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhotoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url_list: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<ContentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<PhotoCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    taken_at: Option<String>,
}

fn clean_urls(urls: Vec<String>) -> Result<Vec<String>, FieldViolation> {
    let cleaned: Vec<String> = urls
        .into_iter()
        .map(|url| url.trim().to_owned())
        .filter(|url| !url.is_empty())
        .collect();
    if cleaned.is_empty() {
        return Err(FieldViolation::invalid(
            "url_list",
            "url_list must contain at least one URL",
        ));
    }
    Ok(cleaned)
}

fn parse_category(raw: Option<&str>) -> Result<Option<PhotoCategory>, FieldViolation> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => PhotoCategory::parse_literal(value).map(Some).ok_or_else(|| {
            FieldViolation::invalid(
                "category",
                format!("category must be one of {}", PhotoCategory::expected()),
            )
        }),
    }
}

impl PhotoDraft {
    /// Validate a caller-supplied create body.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldViolation`] when `url_list` holds no URL, `title` or
    /// `location_name` is too long, or an enum field holds an unknown literal.
    pub fn try_from_input(input: PhotoInput) -> Result<Self, FieldViolation> {
        let url_list = clean_urls(input.url_list.unwrap_or_default())?;
        Ok(Self {
            title: optional_text("title", input.title, Some(TITLE_MAX_CHARS))?,
            description: optional_text("description", input.description, None)?,
            url_list,
            location_name: optional_text("location_name", input.location_name, Some(LOCATION_MAX_CHARS))?,
            status: parse_status(input.status.as_deref())?,
            visibility: parse_visibility(input.visibility.as_deref())?,
            tags: clean_tags(input.tags),
            category: parse_category(input.category.as_deref())?,
            taken_at: optional_text("taken_at", input.taken_at, None)?,
        })
    }
}

impl PhotoPatch {
    /// Validate a caller-supplied partial update.
    ///
    /// Only fields present in the body are checked.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldViolation`] for any invalid field, or for a body
    /// with nothing left to change once blank values are dropped.
    pub fn try_from_input(input: PhotoInput) -> Result<Self, FieldViolation> {
        let patch = Self {
            title: optional_text("title", input.title, Some(TITLE_MAX_CHARS))?,
            description: optional_text("description", input.description, None)?,
            url_list: input.url_list.map(clean_urls).transpose()?,
            location_name: optional_text("location_name", input.location_name, Some(LOCATION_MAX_CHARS))?,
            status: input
                .status
                .as_deref()
                .map(|raw| parse_status(Some(raw)))
                .transpose()?,
            visibility: input
                .visibility
                .as_deref()
                .map(|raw| parse_visibility(Some(raw)))
                .transpose()?,
            tags: input.tags.map(|tags| clean_tags(Some(tags))),
            category: parse_category(input.category.as_deref())?,
            taken_at: optional_text("taken_at", input.taken_at, None)?,
        };
        if patch == Self::default() {
            return Err(FieldViolation::empty_patch());
        }
        Ok(patch)
    }
}

impl Resource for Photo {
    const KIND: ResourceKind = ResourceKind::Photos;
    const FILTERS: FilterSupport = FilterSupport::ALL;

    type Category = PhotoCategory;
    type Raw = RawPhoto;
    type Input = PhotoInput;
    type Draft = PhotoDraft;
    type PatchInput = PhotoInput;
    type Patch = PhotoPatch;

    fn normalize(raw: RawPhoto) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            url_list: raw.url_list.unwrap_or_default(),
            location_name: raw.location_name,
            status: raw.status.unwrap_or_default(),
            visibility: raw.visibility.unwrap_or_default(),
            tags: raw.tags.unwrap_or_default(),
            category: raw.category,
            taken_at: raw.taken_at,
            created_at: raw.created_at.unwrap_or_default(),
            updated_at: raw.updated_at.unwrap_or_default(),
            stats: raw.counters.into(),
        }
    }

    fn category(&self) -> Option<PhotoCategory> {
        self.category
    }

    fn status(&self) -> Option<ContentStatus> {
        Some(self.status)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = [&self.title, &self.description, &self.location_name]
            .into_iter()
            .filter_map(Option::as_deref)
            .collect();
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }

    fn validate_draft(input: PhotoInput) -> Result<PhotoDraft, FieldViolation> {
        PhotoDraft::try_from_input(input)
    }

    fn validate_patch(input: PhotoInput) -> Result<PhotoPatch, FieldViolation> {
        PhotoPatch::try_from_input(input)
    }
}
