//! Game event collaborator logic.
//!
//! Event scheduling is handled outside this crate; sales only need events to
//! exist and to have a displayable name.

use crate::{
    entities::{GameEvent, game_event},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Creates a game event the point-of-sale can sell at.
pub async fn create_event(
    db: &DatabaseConnection,
    name: String,
    location: Option<String>,
    starts_at: chrono::DateTime<chrono::Utc>,
) -> Result<game_event::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Event name cannot be empty".to_string(),
        });
    }

    let event = game_event::ActiveModel {
        name: Set(name.trim().to_string()),
        location: Set(location),
        starts_at: Set(starts_at),
        ..Default::default()
    };
    event.insert(db).await.map_err(Into::into)
}

/// Retrieves a game event by id.
pub async fn get_event_by_id(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<Option<game_event::Model>> {
    GameEvent::find_by_id(event_id).one(db).await.map_err(Into::into)
}

/// Resolves an event by id, failing with `NotFound` when absent.
pub(crate) async fn require_event<C>(conn: &C, event_id: i64) -> Result<game_event::Model>
where
    C: ConnectionTrait,
{
    GameEvent::find_by_id(event_id)
        .one(conn)
        .await?
        .ok_or(Error::NotFound {
            entity: "game event",
            id: event_id,
        })
}
