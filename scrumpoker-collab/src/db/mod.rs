use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

mod data;
pub use data::*;

mod memory;
pub use memory::*;

mod pg;
pub use pg::*;

pub type Result<T> = std::result::Result<T, DatabaseError>;
pub type SharedDatabase = Arc<dyn Database>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// An unknown or internal error happened with the database
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    /// A resource already exists
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        /// The resource in question
        resource: &'static str,
        /// The field that is conflicting
        field: &'static str,
        /// The conflicting value
        value: String,
    },
    /// A resource in the database doesn't exist
    #[error("{resource} not found")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
}

/// Helper trait to reduce boilerplate
pub trait IntoDatabaseError {
    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError;
    fn any(self) -> DatabaseError;
}

/// Represents a store that keeps rooms, players and their votes.
///
/// Every method is a self-contained operation against the store. Invariants that span
/// a check and a write (unique pin codes, host uniqueness, votes referencing players)
/// are enforced by the implementation in one step, never by the caller.
#[async_trait]
pub trait Database: Send + Sync {
    /// Creates a room. Fails with a conflict on `pincode` if another room already uses it.
    async fn create_room(&self, new_room: NewRoom) -> Result<RoomData>;
    async fn room_by_pincode(&self, pincode: &str) -> Result<RoomData>;
    async fn update_room_topic(&self, room_id: &str, topic: &str) -> Result<()>;

    /// Lists the players of a room in the order they joined
    async fn players(&self, room_id: &str) -> Result<Vec<PlayerData>>;
    async fn player_by_id(&self, room_id: &str, player_id: &str) -> Result<PlayerData>;
    /// Adds a player to a room. Fails with a conflict on `host` if the new player
    /// is a host and the room already has one.
    async fn create_player(&self, new_player: NewPlayer) -> Result<PlayerData>;
    async fn rename_player(&self, room_id: &str, player_id: &str, name: &str) -> Result<()>;

    /// Creates or replaces the vote of a player. Fails with not found if the player
    /// is not part of the room.
    async fn upsert_vote(&self, new_vote: NewVote) -> Result<()>;
    async fn votes(&self, room_id: &str) -> Result<Vec<VoteData>>;
    /// Deletes every vote in a room at once, returning how many were removed
    async fn delete_votes(&self, room_id: &str) -> Result<u64>;

    /// Releases the connection to the store
    async fn close(&self);
}

#[derive(Debug)]
pub struct NewRoom {
    pub name: String,
    pub pincode: String,
}

#[derive(Debug)]
pub struct NewPlayer {
    pub room_id: String,
    pub name: String,
    pub host: bool,
}

#[derive(Debug)]
pub struct NewVote {
    pub room_id: String,
    pub player_id: String,
    pub value: f64,
}
