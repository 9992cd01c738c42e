//! Names of the record collections held by the registry.

use std::fmt;

/// A record collection in the fallback registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Blog posts.
    Blogs,
    /// Photo posts.
    Photos,
    /// Contact messages.
    Contacts,
}

impl Collection {
    /// Every collection, in registry order.
    pub const ALL: [Self; 3] = [Self::Blogs, Self::Photos, Self::Contacts];

    /// The JSON key naming this collection.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blogs => "blogs",
            Self::Photos => "photos",
            Self::Contacts => "contacts",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
