//! Resource kinds and the contract every gateway-fronted record satisfies.
//!
//! The gateway serves three collections with identical read and write
//! policies. [`Resource`] captures what differs between them: the raw wire
//! shape, the `normalize` step, the filter fields, and the local validation
//! applied before a write is forwarded.

use std::fmt;

use fallback_data::Collection;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::content::ContentStatus;
use super::validation::FieldViolation;

/// Collections fronted by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Markdown blog posts.
    Blogs,
    /// Photo gallery entries.
    Photos,
    /// Contact form submissions.
    Contacts,
}

impl ResourceKind {
    /// Path segment used by both the gateway and the upstream service.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Blogs => "blogs",
            Self::Photos => "photos",
            Self::Contacts => "contacts",
        }
    }

    /// Singular noun used in messages.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Blogs => "blog",
            Self::Photos => "photo",
            Self::Contacts => "contact",
        }
    }

    /// Matching collection in the bundled fallback registry.
    #[must_use]
    pub const fn collection(self) -> Collection {
        match self {
            Self::Blogs => Collection::Blogs,
            Self::Photos => Collection::Photos,
            Self::Contacts => Collection::Contacts,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Which optional list filters a resource understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSupport {
    /// `category=` is accepted.
    pub category: bool,
    /// `status=` is accepted.
    pub status: bool,
}

impl FilterSupport {
    /// Both category and status filters.
    pub const ALL: Self = Self {
        category: true,
        status: true,
    };
    /// Free-text search only.
    pub const SEARCH_ONLY: Self = Self {
        category: false,
        status: false,
    };
}

/// A closed set of string literals usable as a list filter.
///
/// Parsing is ASCII case-insensitive; [`FilterLiteral::as_str`] yields the
/// canonical spelling sent upstream.
pub trait FilterLiteral: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Every accepted value, in documentation order.
    const ALL: &'static [Self];

    /// Canonical wire spelling.
    fn as_str(self) -> &'static str;

    /// Parse a literal, ignoring ASCII case.
    fn parse_literal(raw: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|value| value.as_str().eq_ignore_ascii_case(raw))
    }

    /// Comma-separated list of accepted values for error messages.
    fn expected() -> String {
        Self::ALL
            .iter()
            .map(|value| value.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Category type for resources that have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoCategory {}

impl FilterLiteral for NoCategory {
    const ALL: &'static [Self] = &[];

    fn as_str(self) -> &'static str {
        match self {}
    }
}

/// A record served by a gateway route.
pub trait Resource: Serialize + Clone + Send + Sync + 'static {
    /// Collection this record belongs to.
    const KIND: ResourceKind;
    /// Filters accepted on the list route.
    const FILTERS: FilterSupport;

    /// Category enumeration, or [`NoCategory`].
    type Category: FilterLiteral;
    /// Shape returned by the upstream service and stored in the fallback
    /// registry.
    type Raw: DeserializeOwned;
    /// Unvalidated create body.
    type Input: DeserializeOwned;
    /// Validated create body forwarded upstream.
    type Draft: Serialize;
    /// Unvalidated update body.
    type PatchInput: DeserializeOwned;
    /// Validated update body forwarded upstream.
    type Patch: Serialize;

    /// Reshape a raw record into the gateway's response shape.
    fn normalize(raw: Self::Raw) -> Self;

    /// Category used by the list filter.
    fn category(&self) -> Option<Self::Category>;

    /// Status used by the list filter.
    fn status(&self) -> Option<ContentStatus>;

    /// Text fields scanned by free-text search.
    fn search_fields(&self) -> Vec<&str>;

    /// Validate a create body.
    ///
    /// # Errors
    ///
    /// Returns the first [`FieldViolation`] found.
    fn validate_draft(input: Self::Input) -> Result<Self::Draft, FieldViolation>;

    /// Validate an update body.
    ///
    /// # Errors
    ///
    /// Returns the first [`FieldViolation`] found.
    fn validate_patch(input: Self::PatchInput) -> Result<Self::Patch, FieldViolation>;
}

/// Positive integer identifier taken from a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(i64);

impl ResourceId {
    /// Parse a path segment.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldViolation`] unless `raw` is a positive integer.
    ///
    /// # Examples
    /// ```
    /// use gateway::domain::ResourceId;
    ///
    /// assert_eq!(ResourceId::parse("42").map(|id| id.get()), Ok(42));
    /// assert!(ResourceId::parse("0").is_err());
    /// assert!(ResourceId::parse("abc").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, FieldViolation> {
        match raw.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(FieldViolation::invalid(
                "id",
                format!("id must be a positive integer, got {raw:?}"),
            )),
        }
    }

    /// The numeric value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
