use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// The type used for store-assigned ids.
pub type DocumentId = String;

/// A planning poker room
#[derive(Debug, Clone, FromRow)]
pub struct RoomData {
    pub id: DocumentId,
    pub name: String,
    /// Six digit code users type in to find the room. Assigned once at creation.
    pub pincode: String,
    /// What is currently being estimated
    pub topic: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A participant of a room
#[derive(Debug, Clone, FromRow)]
pub struct PlayerData {
    pub id: DocumentId,
    pub name: String,
    /// If this is true, the player facilitates the room. A room has at most one.
    pub host: bool,
    pub joined_at: DateTime<Utc>,
}

/// A vote joined with the current name of the player who cast it
#[derive(Debug, Clone, FromRow)]
pub struct VoteData {
    pub player_id: DocumentId,
    pub player_name: String,
    pub value: f64,
    pub voted_at: DateTime<Utc>,
}
