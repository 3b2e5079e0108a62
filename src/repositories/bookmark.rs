use super::{Document, Repository, SqlRepository};
use crate::models::Bookmark;

impl Document for Bookmark {
    const COLLECTION: &'static str = "bookmarks";
}

/// Bookmarks need nothing beyond the generic operations.
pub trait BookmarkRepository: Repository<Bookmark> {}

impl BookmarkRepository for SqlRepository<Bookmark> {}
