//! Cross-page bulk selection for a server-paginated record list.
//!
//! A user may ask for "the first N records" while only one page is loaded.
//! The intent is honored lazily: each page, as it loads, has its in-range
//! records merged into the selection, while manual edits replace the selection
//! outright and are never clobbered by the bulk intent.
//!
//! - **[`core`]**: Pure, deterministic logic (pager, reconciliation, input
//!   parsing). No I/O.
//! - **[`io`]**: Side-effecting operations (configuration, HTTP page fetching).
//!
//! [`session`] combines the pager and the reconciler into one event-driven
//! state machine, and [`load`] drives fetches against it.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod load;
pub mod logging;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
