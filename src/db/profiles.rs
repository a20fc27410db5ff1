use rust_decimal::Decimal;
use sea_orm::*;
use uuid::Uuid;

use crate::models::profiles::{self, NewProfile, ProfileType};

/// Insert a new profile. The password must already be hashed.
pub async fn insert_profile<C: ConnectionTrait>(
    db: &C,
    input: NewProfile,
) -> Result<profiles::Model, DbErr> {
    let new_profile = profiles::ActiveModel {
        id: Set(Uuid::new_v4()),
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        profession: Set(input.profession),
        balance: Set(input.balance),
        kind: Set(input.kind),
        username: Set(input.username),
        password_hash: Set(input.password_hash),
        created_at: Set(chrono::Utc::now()),
    };

    new_profile.insert(db).await
}

/// Fetch a single profile by ID.
pub async fn get_profile_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<profiles::Model>, DbErr> {
    profiles::Entity::find_by_id(id).one(db).await
}

/// Fetch a profile by ID and type, taking a row lock for the rest of the
/// surrounding transaction (a no-op on SQLite).
pub async fn lock_profile_of_type<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    kind: ProfileType,
) -> Result<Option<profiles::Model>, DbErr> {
    profiles::Entity::find_by_id(id)
        .filter(profiles::Column::Kind.eq(kind))
        .lock_exclusive()
        .one(db)
        .await
}

/// Fetch a profile by its unique username.
pub async fn get_profile_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<Option<profiles::Model>, DbErr> {
    profiles::Entity::find()
        .filter(profiles::Column::Username.eq(username))
        .one(db)
        .await
}

/// Overwrite a profile's balance.
pub async fn set_balance<C: ConnectionTrait>(
    db: &C,
    profile: profiles::Model,
    balance: Decimal,
) -> Result<profiles::Model, DbErr> {
    let mut active: profiles::ActiveModel = profile.into();
    active.balance = Set(balance);

    active.update(db).await
}
