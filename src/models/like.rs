use super::entity::{Resource, TimestampedEntity};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user's like on a movie.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct Like {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub entity: TimestampedEntity,

    pub movie_id: Uuid,

    pub user_id: Uuid,
}

impl Like {
    pub fn new(user_id: Uuid, movie_id: Uuid) -> Self {
        Self {
            entity: TimestampedEntity::new(),
            movie_id,
            user_id,
        }
    }
}

impl Resource for Like {
    const KIND: &'static str = "like";

    fn entity(&self) -> &TimestampedEntity {
        &self.entity
    }

    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn movie_id(&self) -> Uuid {
        self.movie_id
    }
}
