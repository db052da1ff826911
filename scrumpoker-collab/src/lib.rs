mod db;
mod rooms;
mod util;
mod votings;

use std::sync::Arc;

pub use db::*;
pub use rooms::*;
pub use votings::*;

/// The scrumpoker collab system, facilitating rooms, players and voting rounds.
pub struct Collab {
    database: SharedDatabase,

    pub rooms: RoomManager,
    pub votings: VotingManager,
}

/// A type passed to the components of the collab system to reach the store.
#[derive(Clone)]
pub struct CollabContext {
    pub database: SharedDatabase,
}

impl Collab {
    pub fn new<Db>(database: Db) -> Self
    where
        Db: Database + 'static,
    {
        let database: SharedDatabase = Arc::new(database);

        let context = CollabContext {
            database: database.clone(),
        };

        Self {
            database,
            rooms: RoomManager::new(&context),
            votings: VotingManager::new(&context),
        }
    }

    /// Closes the underlying store. Called once when the server shuts down.
    pub async fn close(&self) {
        self.database.close().await
    }
}
