//! List filters and their translation into upstream query strings.
//!
//! Inbound query values arrive as loose strings. [`ListQuery::parse`] turns
//! them into typed filters where "no filter" is `None`: blank values and the
//! `all` sentinel never survive parsing. [`QueryTranslator`] renders a parsed
//! query for the upstream service, and [`ListQuery::matches`] applies the
//! same filters to fallback records.

use pagination::PageRequest;
use serde::Deserialize;
use url::form_urlencoded;

use super::content::ContentStatus;
use super::resource::{FilterLiteral, FilterSupport, Resource};
use super::validation::FieldViolation;

/// Filter value meaning "do not filter".
pub const NO_FILTER: &str = "all";

/// Raw list query parameters, exactly as received.
///
/// Unknown parameters are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    /// 1-based page number.
    pub page: Option<String>,
    /// Page size.
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
    /// Category literal or `all`.
    pub category: Option<String>,
    /// Status literal or `all`.
    pub status: Option<String>,
}

/// Non-blank, trimmed search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    text: String,
    folded: String,
}

impl SearchTerm {
    /// Trim `raw`, returning `None` when nothing is left.
    ///
    /// # Examples
    /// ```
    /// use gateway::domain::SearchTerm;
    ///
    /// assert!(SearchTerm::new("   ").is_none());
    /// assert_eq!(SearchTerm::new(" rust ").map(|t| t.as_str().to_owned()), Some("rust".to_owned()));
    /// ```
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_owned(),
            folded: text.to_lowercase(),
        })
    }

    /// The trimmed text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Case-insensitive substring test.
    #[must_use]
    pub fn found_in(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.folded)
    }
}

/// Parsed list query for a resource with category type `C`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<C> {
    page: PageRequest,
    search: Option<SearchTerm>,
    category: Option<C>,
    status: Option<ContentStatus>,
}

impl<C: FilterLiteral> ListQuery<C> {
    /// Parse raw parameters, honouring the filters a resource supports.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldViolation`] when `page`/`perPage` are not integers in
    /// range, a filter literal is unknown, or a filter the resource does not
    /// support is set to anything other than blank or `all`.
    pub fn parse(params: &ListParams, support: FilterSupport) -> Result<Self, FieldViolation> {
        let page = PageRequest::from_optional(
            parse_number("page", params.page.as_deref())?,
            parse_number("perPage", params.per_page.as_deref())?,
        )
        .map_err(|err| {
            let field = match err {
                pagination::PageRequestError::PageOutOfRange { .. } => "page",
                pagination::PageRequestError::PerPageOutOfRange { .. } => "perPage",
            };
            FieldViolation::invalid(field, err.to_string())
        })?;

        let category = parse_filter::<C>("category", params.category.as_deref(), support.category)?;
        let status =
            parse_filter::<ContentStatus>("status", params.status.as_deref(), support.status)?;

        Ok(Self {
            page,
            search: params.search.as_deref().and_then(SearchTerm::new),
            category,
            status,
        })
    }

    /// Requested page window.
    #[must_use]
    pub const fn page(&self) -> PageRequest {
        self.page
    }

    /// Search term, if any.
    #[must_use]
    pub const fn search(&self) -> Option<&SearchTerm> {
        self.search.as_ref()
    }

    /// Category filter, if any.
    #[must_use]
    pub const fn category(&self) -> Option<C> {
        self.category
    }

    /// Status filter, if any.
    #[must_use]
    pub const fn status(&self) -> Option<ContentStatus> {
        self.status
    }

    /// Whether `record` passes every filter.
    ///
    /// Search is a case-insensitive substring match over the record's search
    /// fields; category and status must match exactly.
    pub fn matches<R>(&self, record: &R) -> bool
    where
        R: Resource<Category = C>,
    {
        let search_ok = self.search.as_ref().is_none_or(|term| {
            record
                .search_fields()
                .into_iter()
                .any(|field| term.found_in(field))
        });
        let category_ok = self
            .category
            .is_none_or(|wanted| record.category() == Some(wanted));
        let status_ok = self
            .status
            .is_none_or(|wanted| record.status() == Some(wanted));
        search_ok && category_ok && status_ok
    }
}

fn parse_number(field: &'static str, raw: Option<&str>) -> Result<Option<u32>, FieldViolation> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<u32>().map(Some).map_err(|_| {
            FieldViolation::invalid(field, format!("{field} must be a positive integer"))
        }),
    }
}

fn parse_filter<T: FilterLiteral>(
    field: &'static str,
    raw: Option<&str>,
    supported: bool,
) -> Result<Option<T>, FieldViolation> {
    let value = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(value) if value.eq_ignore_ascii_case(NO_FILTER) => return Ok(None),
        Some(value) => value,
    };
    if !supported {
        return Err(FieldViolation::invalid(
            field,
            format!("{field} filtering is not supported for this resource"),
        ));
    }
    T::parse_literal(value).map(Some).ok_or_else(|| {
        FieldViolation::invalid(field, format!("{field} must be one of {}", T::expected()))
    })
}

/// Renders parsed list queries as upstream query strings.
///
/// `page` and `perPage` are always present; `search`, `category` and
/// `status` appear only when set. Values are form-urlencoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryTranslator;

impl QueryTranslator {
    /// Encode `query` without a leading `?`.
    ///
    /// # Examples
    /// ```
    /// use gateway::domain::{BlogCategory, ListParams, ListQuery, QueryTranslator};
    /// use gateway::domain::FilterSupport;
    ///
    /// let params = ListParams {
    ///     search: Some(" rust & web ".to_owned()),
    ///     category: Some("all".to_owned()),
    ///     ..ListParams::default()
    /// };
    /// let query = ListQuery::<BlogCategory>::parse(&params, FilterSupport::ALL).expect("valid");
    /// assert_eq!(QueryTranslator::encode(&query), "page=1&perPage=10&search=rust+%26+web");
    /// ```
    #[must_use]
    pub fn encode<C: FilterLiteral>(query: &ListQuery<C>) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer
            .append_pair("page", &query.page.page().to_string())
            .append_pair("perPage", &query.page.per_page().to_string());
        if let Some(term) = &query.search {
            serializer.append_pair("search", term.as_str());
        }
        if let Some(category) = query.category {
            serializer.append_pair("category", category.as_str());
        }
        if let Some(status) = query.status {
            serializer.append_pair("status", status.as_str());
        }
        serializer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Blog, BlogCategory, Contact, NoCategory, PhotoCategory};
    use rstest::rstest;

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let value = Some((*value).to_owned());
            match *key {
                "page" => params.page = value,
                "perPage" => params.per_page = value,
                "search" => params.search = value,
                "category" => params.category = value,
                "status" => params.status = value,
                other => panic!("unexpected key {other}"),
            }
        }
        params
    }

    fn blog_query(pairs: &[(&str, &str)]) -> Result<ListQuery<BlogCategory>, FieldViolation> {
        ListQuery::parse(&params(pairs), FilterSupport::ALL)
    }

    #[test]
    fn sentinels_and_blank_search_are_omitted() {
        let query = blog_query(&[("category", "all"), ("status", "all"), ("search", "  ")])
            .expect("query is valid");
        assert_eq!(QueryTranslator::encode(&query), "page=1&perPage=10");
        assert!(query.search().is_none());
        assert!(query.category().is_none());
        assert!(query.status().is_none());
    }

    #[test]
    fn set_filters_are_encoded_canonically() {
        let query = blog_query(&[
            ("page", "2"),
            ("perPage", "6"),
            ("search", "machine learning"),
            ("category", "tech"),
            ("status", "Published"),
        ])
        .expect("query is valid");
        assert_eq!(
            QueryTranslator::encode(&query),
            "page=2&perPage=6&search=machine+learning&category=TECH&status=published"
        );
    }

    #[test]
    fn search_is_percent_encoded() {
        let query = blog_query(&[("search", "café?&=")]).expect("query is valid");
        assert_eq!(
            QueryTranslator::encode(&query),
            "page=1&perPage=10&search=caf%C3%A9%3F%26%3D"
        );
    }

    #[rstest]
    #[case::page_zero(&[("page", "0")], "page")]
    #[case::page_text(&[("page", "two")], "page")]
    #[case::per_page_large(&[("perPage", "101")], "perPage")]
    #[case::per_page_negative(&[("perPage", "-1")], "perPage")]
    #[case::unknown_category(&[("category", "GAMES")], "category")]
    #[case::unknown_status(&[("status", "live")], "status")]
    fn invalid_parameters_are_rejected(#[case] pairs: &[(&str, &str)], #[case] field: &str) {
        let violation = blog_query(pairs).expect_err("parameters are invalid");
        assert_eq!(violation.field(), field);
    }

    #[test]
    fn photo_categories_are_distinct_from_blog_categories() {
        let result = ListQuery::<PhotoCategory>::parse(
            &params(&[("category", "TECH")]),
            FilterSupport::ALL,
        );
        assert!(result.is_err());
    }

    #[rstest]
    #[case(&[("category", "TECH")], false)]
    #[case(&[("status", "draft")], false)]
    #[case(&[("category", "all"), ("status", "ALL"), ("search", "lin")], true)]
    fn contacts_accept_search_only(#[case] pairs: &[(&str, &str)], #[case] accepted: bool) {
        let result = ListQuery::<NoCategory>::parse(&params(pairs), Contact::FILTERS);
        assert_eq!(result.is_ok(), accepted);
    }

    #[test]
    fn matching_applies_every_filter() {
        let raw = serde_json::json!({
            "id": 1,
            "title": "Git workflow habits",
            "content": "Branching",
            "status": "published",
            "category": "TECH",
            "tags": ["Version Control"]
        });
        let blog = Blog::normalize(serde_json::from_value(raw).expect("raw blog decodes"));

        let hit = blog_query(&[("search", "version control"), ("category", "TECH")])
            .expect("query is valid");
        assert!(hit.matches(&blog));

        let wrong_status = blog_query(&[("status", "draft")]).expect("query is valid");
        assert!(!wrong_status.matches(&blog));

        let miss = blog_query(&[("search", "coffee")]).expect("query is valid");
        assert!(!miss.matches(&blog));
    }
}
