use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database. Never serialized; responses carry only id and username.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String, // Argon2 PHC string, never leaves the auth module
    pub created_at: OffsetDateTime,
}
