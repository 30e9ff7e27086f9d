//! Member collaborator logic.
//!
//! Member administration lives outside this crate; the core only creates and
//! resolves members so that owner and seller references can fail loudly when
//! they dangle.

use crate::{
    entities::{Member, member},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Creates a club member with the given display name.
pub async fn create_member(db: &DatabaseConnection, name: String) -> Result<member::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Member name cannot be empty".to_string(),
        });
    }

    let member = member::ActiveModel {
        name: Set(name.trim().to_string()),
        ..Default::default()
    };
    member.insert(db).await.map_err(Into::into)
}

/// Retrieves a member by id.
pub async fn get_member_by_id(
    db: &DatabaseConnection,
    member_id: i64,
) -> Result<Option<member::Model>> {
    Member::find_by_id(member_id).one(db).await.map_err(Into::into)
}

/// Resolves a member by id, failing with `NotFound` when absent.
///
/// Used by every mutating operation that records an owner or seller.
pub(crate) async fn require_member<C>(conn: &C, member_id: i64) -> Result<member::Model>
where
    C: ConnectionTrait,
{
    Member::find_by_id(member_id)
        .one(conn)
        .await?
        .ok_or(Error::NotFound {
            entity: "member",
            id: member_id,
        })
}
