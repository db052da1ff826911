mod pincode;

use log::{debug, info, warn};
use rand::thread_rng;
use thiserror::Error;

use crate::{CollabContext, DatabaseError, NewPlayer, NewRoom, PlayerData, RoomData};

pub use pincode::*;

/// How many pin codes are tried before giving up on creating a room
const MAX_PINCODE_ATTEMPTS: usize = 10;

pub struct RoomManager {
    context: CollabContext,
}

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("there is already a user defined as host")]
    HostTaken,
    #[error("no free pin code found after {0} attempts")]
    PincodeExhausted(usize),
    #[error(transparent)]
    Db(#[from] DatabaseError),
}

/// A room together with everyone who joined it
#[derive(Debug)]
pub struct RoomSnapshot {
    pub room: RoomData,
    pub players: Vec<PlayerData>,
}

/// A player to be added to a room
#[derive(Debug)]
pub struct NewMember {
    pub name: String,
    pub host: bool,
}

impl RoomManager {
    pub fn new(context: &CollabContext) -> Self {
        Self {
            context: context.clone(),
        }
    }

    /// Creates a new room under a fresh pin code
    pub async fn create_room(&self, name: String) -> Result<RoomData, RoomError> {
        self.create_room_with(name, || generate_pincode(&mut thread_rng()))
            .await
    }

    async fn create_room_with(
        &self,
        name: String,
        mut next_pincode: impl FnMut() -> String + Send,
    ) -> Result<RoomData, RoomError> {
        let database = &self.context.database;

        for _ in 0..MAX_PINCODE_ATTEMPTS {
            let pincode = next_pincode();

            let created = database
                .create_room(NewRoom {
                    name: name.clone(),
                    pincode,
                })
                .await;

            match created {
                Ok(room) => {
                    info!("Room \"{}\" created with pin code {}", room.name, room.pincode);

                    return Ok(room);
                }
                Err(DatabaseError::Conflict {
                    field: "pincode",
                    value,
                    ..
                }) => {
                    debug!("Pin code {} is taken, trying another", value);
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(
            "Could not find a free pin code after {} attempts",
            MAX_PINCODE_ATTEMPTS
        );

        Err(RoomError::PincodeExhausted(MAX_PINCODE_ATTEMPTS))
    }

    /// Returns the room with the given pin code
    pub async fn room_by_pincode(&self, pincode: &str) -> Result<RoomData, DatabaseError> {
        self.context.database.room_by_pincode(pincode).await
    }

    /// Returns the room with the given pin code and its players
    pub async fn room_with_players(&self, pincode: &str) -> Result<RoomSnapshot, DatabaseError> {
        let room = self.room_by_pincode(pincode).await?;
        let players = self.context.database.players(&room.id).await?;

        Ok(RoomSnapshot { room, players })
    }

    /// Adds a player to the room, returning the room and the new player
    pub async fn join(
        &self,
        pincode: &str,
        member: NewMember,
    ) -> Result<(RoomData, PlayerData), RoomError> {
        let room = self.room_by_pincode(pincode).await?;

        let player = self
            .context
            .database
            .create_player(NewPlayer {
                room_id: room.id.clone(),
                name: member.name,
                host: member.host,
            })
            .await
            .map_err(|e| match e {
                DatabaseError::Conflict { field: "host", .. } => RoomError::HostTaken,
                e => e.into(),
            })?;

        info!(
            "{} joined room {}{}",
            player.name,
            room.pincode,
            if player.host { " as host" } else { "" }
        );

        Ok((room, player))
    }

    /// Sets what the room is currently estimating
    pub async fn set_topic(&self, pincode: &str, topic: &str) -> Result<(), DatabaseError> {
        let room = self.room_by_pincode(pincode).await?;

        self.context
            .database
            .update_room_topic(&room.id, topic)
            .await
    }

    /// Lists the players of a room in join order
    pub async fn players(&self, pincode: &str) -> Result<Vec<PlayerData>, DatabaseError> {
        let room = self.room_by_pincode(pincode).await?;

        self.context.database.players(&room.id).await
    }

    /// Changes the name of a player, leaving everything else untouched
    pub async fn rename_player(
        &self,
        pincode: &str,
        player_id: &str,
        name: &str,
    ) -> Result<(), DatabaseError> {
        let room = self.room_by_pincode(pincode).await?;
        let database = &self.context.database;

        database.player_by_id(&room.id, player_id).await?;
        database.rename_player(&room.id, player_id, name).await
    }
}
