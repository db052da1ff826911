//! All schemas that are exposed from endpoints are defined here
//! along with the conversions from collab data

use chrono::{DateTime, Utc};
use scrumpoker_collab::{PlayerData, RoomData, RoomSnapshot, VoteData};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct Room {
    id: String,
    name: String,
    #[schema(example = "042137")]
    pincode: String,
    topic: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoomWithPlayers {
    #[serde(flatten)]
    room: Room,
    players: Vec<Player>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NewRoomResult {
    room_id: String,
    #[schema(example = "042137")]
    pincode: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Player {
    id: String,
    name: String,
    host: bool,
    joined_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JoinResult {
    room: Room,
    id: String,
    name: String,
    host: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Vote {
    player_id: String,
    player_name: String,
    value: f64,
    voted_at: DateTime<Utc>,
}

/// Helper trait to convert any type into a serialized version
pub trait ToSerialized<T>
where
    T: Serialize,
{
    fn to_serialized(&self) -> T;
}

impl<I, O> ToSerialized<Vec<O>> for Vec<I>
where
    I: ToSerialized<O>,
    O: Serialize,
{
    fn to_serialized(&self) -> Vec<O> {
        self.iter().map(|x| x.to_serialized()).collect()
    }
}

impl ToSerialized<Room> for RoomData {
    fn to_serialized(&self) -> Room {
        Room {
            id: self.id.clone(),
            name: self.name.clone(),
            pincode: self.pincode.clone(),
            topic: self.topic.clone(),
            created_at: self.created_at,
        }
    }
}

impl ToSerialized<NewRoomResult> for RoomData {
    fn to_serialized(&self) -> NewRoomResult {
        NewRoomResult {
            room_id: self.id.clone(),
            pincode: self.pincode.clone(),
        }
    }
}

impl ToSerialized<RoomWithPlayers> for RoomSnapshot {
    fn to_serialized(&self) -> RoomWithPlayers {
        RoomWithPlayers {
            room: self.room.to_serialized(),
            players: self.players.to_serialized(),
        }
    }
}

impl ToSerialized<Player> for PlayerData {
    fn to_serialized(&self) -> Player {
        Player {
            id: self.id.clone(),
            name: self.name.clone(),
            host: self.host,
            joined_at: self.joined_at,
        }
    }
}

impl ToSerialized<JoinResult> for (RoomData, PlayerData) {
    fn to_serialized(&self) -> JoinResult {
        let (room, player) = self;

        JoinResult {
            room: room.to_serialized(),
            id: player.id.clone(),
            name: player.name.clone(),
            host: player.host,
        }
    }
}

impl ToSerialized<Vote> for VoteData {
    fn to_serialized(&self) -> Vote {
        Vote {
            player_id: self.player_id.clone(),
            player_name: self.player_name.clone(),
            value: self.value,
            voted_at: self.voted_at,
        }
    }
}
