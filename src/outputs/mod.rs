//! Output rendering for published posts.
//!
//! # Submodules
//!
//! - [`post`]: builds the HTML body sent to WordPress, either from
//!   [`crate::models::StructuredFields`] or from a page's plain content

pub mod post;
