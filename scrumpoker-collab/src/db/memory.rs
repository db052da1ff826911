use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::{
    util::document_id, Database, DatabaseError, NewPlayer, NewRoom, NewVote, PlayerData, Result,
    RoomData, VoteData,
};

/// An in-process store, used when no external database is configured.
///
/// All state lives behind a single lock, so every operation is atomic.
#[derive(Default)]
pub struct MemoryDatabase {
    rooms: Mutex<Vec<MemoryRoom>>,
}

struct MemoryRoom {
    data: RoomData,
    players: Vec<PlayerData>,
    votes: Vec<MemoryVote>,
}

struct MemoryVote {
    player_id: String,
    value: f64,
    voted_at: DateTime<Utc>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_room<T>(
        &self,
        room_id: &str,
        f: impl FnOnce(&mut MemoryRoom) -> Result<T>,
    ) -> Result<T> {
        let mut rooms = self.rooms.lock();

        let room = rooms
            .iter_mut()
            .find(|r| r.data.id == room_id)
            .ok_or(DatabaseError::NotFound {
                resource: "room",
                identifier: "id",
            })?;

        f(room)
    }
}

impl MemoryRoom {
    fn player_mut(&mut self, player_id: &str) -> Result<&mut PlayerData> {
        self.players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(DatabaseError::NotFound {
                resource: "player",
                identifier: "id",
            })
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn create_room(&self, new_room: NewRoom) -> Result<RoomData> {
        let mut rooms = self.rooms.lock();

        if rooms.iter().any(|r| r.data.pincode == new_room.pincode) {
            return Err(DatabaseError::Conflict {
                resource: "room",
                field: "pincode",
                value: new_room.pincode,
            });
        }

        let data = RoomData {
            id: document_id(),
            name: new_room.name,
            pincode: new_room.pincode,
            topic: None,
            created_at: Utc::now(),
        };

        rooms.push(MemoryRoom {
            data: data.clone(),
            players: vec![],
            votes: vec![],
        });

        Ok(data)
    }

    async fn room_by_pincode(&self, pincode: &str) -> Result<RoomData> {
        self.rooms
            .lock()
            .iter()
            .find(|r| r.data.pincode == pincode)
            .map(|r| r.data.clone())
            .ok_or(DatabaseError::NotFound {
                resource: "room",
                identifier: "pincode",
            })
    }

    async fn update_room_topic(&self, room_id: &str, topic: &str) -> Result<()> {
        self.with_room(room_id, |room| {
            room.data.topic = Some(topic.to_string());
            Ok(())
        })
    }

    async fn players(&self, room_id: &str) -> Result<Vec<PlayerData>> {
        self.with_room(room_id, |room| Ok(room.players.clone()))
    }

    async fn player_by_id(&self, room_id: &str, player_id: &str) -> Result<PlayerData> {
        self.with_room(room_id, |room| room.player_mut(player_id).map(|p| p.clone()))
    }

    async fn create_player(&self, new_player: NewPlayer) -> Result<PlayerData> {
        self.with_room(&new_player.room_id, |room| {
            if new_player.host {
                if let Some(host) = room.players.iter().find(|p| p.host) {
                    return Err(DatabaseError::Conflict {
                        resource: "player",
                        field: "host",
                        value: host.id.clone(),
                    });
                }
            }

            let player = PlayerData {
                id: document_id(),
                name: new_player.name,
                host: new_player.host,
                joined_at: Utc::now(),
            };

            room.players.push(player.clone());

            Ok(player)
        })
    }

    async fn rename_player(&self, room_id: &str, player_id: &str, name: &str) -> Result<()> {
        self.with_room(room_id, |room| {
            room.player_mut(player_id)?.name = name.to_string();
            Ok(())
        })
    }

    async fn upsert_vote(&self, new_vote: NewVote) -> Result<()> {
        self.with_room(&new_vote.room_id, |room| {
            room.player_mut(&new_vote.player_id)?;

            // Replacing moves the vote to the back, keeping the list ordered by time
            room.votes.retain(|v| v.player_id != new_vote.player_id);
            room.votes.push(MemoryVote {
                player_id: new_vote.player_id,
                value: new_vote.value,
                voted_at: Utc::now(),
            });

            Ok(())
        })
    }

    async fn votes(&self, room_id: &str) -> Result<Vec<VoteData>> {
        self.with_room(room_id, |room| {
            let votes = room
                .votes
                .iter()
                .filter_map(|vote| {
                    let player = room.players.iter().find(|p| p.id == vote.player_id)?;

                    Some(VoteData {
                        player_id: vote.player_id.clone(),
                        player_name: player.name.clone(),
                        value: vote.value,
                        voted_at: vote.voted_at,
                    })
                })
                .collect();

            Ok(votes)
        })
    }

    async fn delete_votes(&self, room_id: &str) -> Result<u64> {
        self.with_room(room_id, |room| {
            let removed = room.votes.len() as u64;
            room.votes.clear();

            Ok(removed)
        })
    }

    async fn close(&self) {}
}
