//! Domain records for user activity on movies.
//!
//! All three resources share a [`TimestampedEntity`] (store identity plus
//! timestamps) and belong to exactly one user and one movie. They map to
//! database rows via `sqlx::FromRow` and serialize as flat JSON via `serde`.

pub mod bookmark;
pub mod entity;
pub mod like;
pub mod review;

pub use bookmark::Bookmark;
pub use entity::{Resource, TimestampedEntity};
pub use like::Like;
pub use review::{Review, ReviewError};
