use log::info;

use crate::{CollabContext, DatabaseError, NewVote, VoteData};

/// Handles the voting rounds of rooms
pub struct VotingManager {
    context: CollabContext,
}

impl VotingManager {
    pub fn new(context: &CollabContext) -> Self {
        Self {
            context: context.clone(),
        }
    }

    /// Registers the vote of a player, replacing any earlier vote in this round
    pub async fn register_vote(
        &self,
        pincode: &str,
        player_id: &str,
        value: f64,
    ) -> Result<(), DatabaseError> {
        let database = &self.context.database;
        let room = database.room_by_pincode(pincode).await?;

        database
            .upsert_vote(NewVote {
                room_id: room.id,
                player_id: player_id.to_string(),
                value,
            })
            .await?;

        info!("Player {} voted {} in room {}", player_id, value, pincode);

        Ok(())
    }

    /// Lists the votes of the current round
    pub async fn votes(&self, pincode: &str) -> Result<Vec<VoteData>, DatabaseError> {
        let database = &self.context.database;
        let room = database.room_by_pincode(pincode).await?;

        database.votes(&room.id).await
    }

    /// Clears every vote in the room to start a new round. Players are kept.
    pub async fn reset(&self, pincode: &str) -> Result<(), DatabaseError> {
        let database = &self.context.database;
        let room = database.room_by_pincode(pincode).await?;

        let removed = database.delete_votes(&room.id).await?;
        info!("Reset room {}, {} vote(s) removed", pincode, removed);

        Ok(())
    }
}
