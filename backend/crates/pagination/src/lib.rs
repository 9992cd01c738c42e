//! Page request and pagination envelope primitives.
//!
//! Gateway list endpoints answer with the same `{ items, pagination }` shape
//! whether the records came from the upstream service or from the bundled
//! fallback dataset. This crate owns that envelope and the page-window math
//! so both paths slice and count identically.
//!
//! # Example
//!
//! ```
//! use pagination::{PageRequest, Paginated};
//!
//! let request = PageRequest::new(2, 4).expect("valid page request");
//! let page = Paginated::from_filtered(1..=10, request);
//!
//! assert_eq!(page.items, vec![5, 6, 7, 8]);
//! assert_eq!(page.pagination.total, 10);
//! assert_eq!(page.pagination.total_page, 3);
//! ```

mod envelope;
mod request;

pub use envelope::{Paginated, Pagination};
pub use request::{DEFAULT_PAGE, DEFAULT_PER_PAGE, MAX_PER_PAGE, PageRequest, PageRequestError};
