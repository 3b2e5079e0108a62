//! HTTP handlers and the request/response shapes they share.

pub mod bookmark_handlers;
pub mod health_handlers;
pub mod like_handlers;
pub mod review_handlers;

use crate::{
    errors::AppError,
    repositories::{DEFAULT_LIMIT, MAX_LIMIT, Page},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// `?limit=&offset=` on listing endpoints.
#[derive(Debug, Deserialize, Validate)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = MAX_LIMIT))]
    pub limit: i64,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl PageQuery {
    pub fn page(&self) -> Result<Page, AppError> {
        self.validate()?;
        Ok(Page::new(self.limit, self.offset))
    }
}

/// Body of `POST /bookmark` and `POST /like`.
#[derive(Debug, Deserialize)]
pub struct MovieRequest {
    pub movie_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MovieCount {
    pub count: u64,
    pub movie_id: Uuid,
}
