//! Contact form submissions.

use serde::{Deserialize, Serialize};

use super::content::ContentStatus;
use super::resource::{FilterSupport, NoCategory, Resource, ResourceKind};
use super::validation::{FieldViolation, required_text};

/// Longest accepted sender name, in characters.
pub const NAME_MAX_CHARS: usize = 100;
/// Longest accepted email address, in characters.
pub const EMAIL_MAX_CHARS: usize = 255;
/// Longest accepted subject line, in characters.
pub const THEME_MAX_CHARS: usize = 200;

/// Normalised contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    /// Upstream identifier.
    pub id: i64,
    /// Sender name.
    pub name: String,
    /// Sender email address.
    pub email: String,
    /// Subject line.
    pub theme: String,
    /// Message body.
    pub context: String,
    /// Submission timestamp as sent upstream.
    pub created_at: String,
}

/// Contact message in the upstream wire shape.
#[derive(Debug, Clone, Deserialize)]
pub struct RawContact {
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    theme: String,
    #[serde(default)]
    context: String,
    #[serde(default)]
    created_at: Option<String>,
}

/// Create or update body as received from the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInput {
    name: Option<String>,
    email: Option<String>,
    theme: Option<String>,
    context: Option<String>,
}

/// Validated contact create body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactDraft {
    name: String,
    email: String,
    theme: String,
    context: String,
}

/// Validated partial contact update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

fn name(value: Option<String>) -> Result<String, FieldViolation> {
    required_text("name", value, Some(NAME_MAX_CHARS))
}

fn email(value: Option<String>) -> Result<String, FieldViolation> {
    let email = required_text("email", value, Some(EMAIL_MAX_CHARS))?;
    if !email.contains('@') {
        return Err(FieldViolation::invalid(
            "email",
            "email must be a valid address",
        ));
    }
    Ok(email)
}

fn theme(value: Option<String>) -> Result<String, FieldViolation> {
    required_text("theme", value, Some(THEME_MAX_CHARS))
}

fn context(value: Option<String>) -> Result<String, FieldViolation> {
    required_text("context", value, None)
}

impl ContactDraft {
    /// Validate a caller-supplied create body.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldViolation`] when any field is blank or too long, or
    /// `email` lacks an `@`.
    pub fn try_from_input(input: ContactInput) -> Result<Self, FieldViolation> {
        Ok(Self {
            name: name(input.name)?,
            email: email(input.email)?,
            theme: theme(input.theme)?,
            context: context(input.context)?,
        })
    }
}

impl ContactPatch {
    /// Validate a caller-supplied partial update.
    ///
    /// Present fields follow the create rules; absent ones are skipped.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldViolation`] for an empty body or any invalid field.
    pub fn try_from_input(input: ContactInput) -> Result<Self, FieldViolation> {
        let ContactInput {
            name: new_name,
            email: new_email,
            theme: new_theme,
            context: new_context,
        } = input;
        if new_name.is_none() && new_email.is_none() && new_theme.is_none() && new_context.is_none()
        {
            return Err(FieldViolation::empty_patch());
        }
        Ok(Self {
            name: new_name.map(|value| name(Some(value))).transpose()?,
            email: new_email.map(|value| email(Some(value))).transpose()?,
            theme: new_theme.map(|value| theme(Some(value))).transpose()?,
            context: new_context.map(|value| context(Some(value))).transpose()?,
        })
    }
}

impl Resource for Contact {
    const KIND: ResourceKind = ResourceKind::Contacts;
    const FILTERS: FilterSupport = FilterSupport::SEARCH_ONLY;

    type Category = NoCategory;
    type Raw = RawContact;
    type Input = ContactInput;
    type Draft = ContactDraft;
    type PatchInput = ContactInput;
    type Patch = ContactPatch;

    fn normalize(raw: RawContact) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            email: raw.email,
            theme: raw.theme,
            context: raw.context,
            created_at: raw.created_at.unwrap_or_default(),
        }
    }

    fn category(&self) -> Option<NoCategory> {
        None
    }

    fn status(&self) -> Option<ContentStatus> {
        None
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.email.as_str(),
            self.theme.as_str(),
            self.context.as_str(),
        ]
    }

    fn validate_draft(input: ContactInput) -> Result<ContactDraft, FieldViolation> {
        ContactDraft::try_from_input(input)
    }

    fn validate_patch(input: ContactInput) -> Result<ContactPatch, FieldViolation> {
        ContactPatch::try_from_input(input)
    }
}
