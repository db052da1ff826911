use async_trait::async_trait;
use sqlx::{
    migrate::Migrator, postgres::PgPoolOptions, query, query_as, Error as SqlxError, PgPool,
};

use crate::{
    util::document_id, Database, DatabaseError, IntoDatabaseError, NewPlayer, NewRoom, NewVote,
    PlayerData, Result, RoomData, VoteData,
};

static MIGRATOR: Migrator = sqlx::migrate!();

/// A postgres database implementation for scrumpoker
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    /// Connects to the database and brings its schema up to date
    pub async fn new(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| e.any())?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn create_room(&self, new_room: NewRoom) -> Result<RoomData> {
        // The unique index on pincode rejects a pin code that is already in use
        query_as::<_, RoomData>(
            "
            INSERT INTO rooms (id, name, pincode)
            VALUES ($1, $2, $3)
            RETURNING id, name, pincode, topic, created_at",
        )
        .bind(document_id())
        .bind(new_room.name)
        .bind(&new_room.pincode)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            SqlxError::Database(ref db_error) if db_error.is_unique_violation() => {
                DatabaseError::Conflict {
                    resource: "room",
                    field: "pincode",
                    value: new_room.pincode.clone(),
                }
            }
            e => e.any(),
        })
    }

    async fn room_by_pincode(&self, pincode: &str) -> Result<RoomData> {
        query_as::<_, RoomData>(
            "
            SELECT id, name, pincode, topic, created_at FROM rooms
            WHERE pincode = $1",
        )
        .bind(pincode)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.not_found_or("room", "pincode"))
    }

    async fn update_room_topic(&self, room_id: &str, topic: &str) -> Result<()> {
        let result = query("UPDATE rooms SET topic = $1 WHERE id = $2")
            .bind(topic)
            .bind(room_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound {
                resource: "room",
                identifier: "id",
            });
        }

        Ok(())
    }

    async fn players(&self, room_id: &str) -> Result<Vec<PlayerData>> {
        query_as::<_, PlayerData>(
            "
            SELECT id, name, host, joined_at FROM players
            WHERE room_id = $1
            ORDER BY joined_at ASC, seq ASC",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())
    }

    async fn player_by_id(&self, room_id: &str, player_id: &str) -> Result<PlayerData> {
        query_as::<_, PlayerData>(
            "SELECT id, name, host, joined_at FROM players WHERE id = $1 AND room_id = $2",
        )
        .bind(player_id)
        .bind(room_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.not_found_or("player", "id"))
    }

    async fn create_player(&self, new_player: NewPlayer) -> Result<PlayerData> {
        // The partial unique index on (room_id) WHERE host rejects a second host,
        // so concurrent joins cannot both succeed.
        query_as::<_, PlayerData>(
            "
            INSERT INTO players (id, room_id, name, host)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, host, joined_at",
        )
        .bind(document_id())
        .bind(&new_player.room_id)
        .bind(new_player.name)
        .bind(new_player.host)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            SqlxError::Database(ref db_error) if db_error.is_unique_violation() => {
                DatabaseError::Conflict {
                    resource: "player",
                    field: "host",
                    value: new_player.room_id.clone(),
                }
            }
            SqlxError::Database(ref db_error) if db_error.is_foreign_key_violation() => {
                DatabaseError::NotFound {
                    resource: "room",
                    identifier: "id",
                }
            }
            e => e.any(),
        })
    }

    async fn rename_player(&self, room_id: &str, player_id: &str, name: &str) -> Result<()> {
        let result = query("UPDATE players SET name = $1 WHERE id = $2 AND room_id = $3")
            .bind(name)
            .bind(player_id)
            .bind(room_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound {
                resource: "player",
                identifier: "id",
            });
        }

        Ok(())
    }

    async fn upsert_vote(&self, new_vote: NewVote) -> Result<()> {
        let result = query(
            "
            INSERT INTO votings (room_id, player_id, vote, voted_at)
            SELECT $1, $2, $3, clock_timestamp()
            WHERE EXISTS (SELECT 1 FROM players WHERE id = $2 AND room_id = $1)
            ON CONFLICT (room_id, player_id)
            DO UPDATE SET vote = EXCLUDED.vote, voted_at = EXCLUDED.voted_at",
        )
        .bind(&new_vote.room_id)
        .bind(&new_vote.player_id)
        .bind(new_vote.value)
        .execute(&self.pool)
        .await
        .map_err(|e| e.any())?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound {
                resource: "player",
                identifier: "id",
            });
        }

        Ok(())
    }

    async fn votes(&self, room_id: &str) -> Result<Vec<VoteData>> {
        query_as::<_, VoteData>(
            "
            SELECT
                votings.player_id,
                players.name AS player_name,
                votings.vote AS value,
                votings.voted_at
            FROM votings
                INNER JOIN players ON votings.player_id = players.id
            WHERE votings.room_id = $1
            ORDER BY votings.voted_at ASC",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())
    }

    async fn delete_votes(&self, room_id: &str) -> Result<u64> {
        query("DELETE FROM votings WHERE room_id = $1")
            .bind(room_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|r| r.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await
    }
}

impl IntoDatabaseError for SqlxError {
    fn any(self) -> DatabaseError {
        DatabaseError::Internal(Box::new(self))
    }

    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError {
        match self {
            SqlxError::RowNotFound => DatabaseError::NotFound {
                resource,
                identifier,
            },
            e => Self::any(e),
        }
    }
}

/// These run against the Postgres instance in `DATABASE_URL` and are skipped without one.
#[cfg(test)]
mod test {
    use std::{env, time::Duration};

    use rand::thread_rng;

    use crate::{
        generate_pincode, Database, DatabaseError, NewPlayer, NewRoom, NewVote, RoomData,
    };

    use super::PgDatabase;

    async fn test_database() -> Option<PgDatabase> {
        let Ok(url) = env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping postgres test");
            return None;
        };

        Some(PgDatabase::new(&url, 2).await.unwrap())
    }

    /// Creates a room under a pin code no earlier run has left behind
    async fn create_room(db: &PgDatabase) -> RoomData {
        loop {
            let created = db
                .create_room(NewRoom {
                    name: "Sprint 12".to_string(),
                    pincode: generate_pincode(&mut thread_rng()),
                })
                .await;

            match created {
                Ok(room) => return room,
                Err(DatabaseError::Conflict { .. }) => continue,
                Err(e) => panic!("could not create room: {}", e),
            }
        }
    }

    async fn join(db: &PgDatabase, room_id: &str, name: &str, host: bool) -> String {
        db.create_player(NewPlayer {
            room_id: room_id.to_string(),
            name: name.to_string(),
            host,
        })
        .await
        .unwrap()
        .id
    }

    fn vote(room_id: &str, player_id: &str, value: f64) -> NewVote {
        NewVote {
            room_id: room_id.to_string(),
            player_id: player_id.to_string(),
            value,
        }
    }

    #[tokio::test]
    async fn pincode_in_use_is_a_conflict() {
        let Some(db) = test_database().await else {
            return;
        };

        let room = create_room(&db).await;

        let result = db
            .create_room(NewRoom {
                name: "Copy".to_string(),
                pincode: room.pincode.clone(),
            })
            .await;

        assert!(matches!(
            result,
            Err(DatabaseError::Conflict {
                resource: "room",
                field: "pincode",
                ..
            })
        ));
        assert_eq!(db.room_by_pincode(&room.pincode).await.unwrap().id, room.id);
    }

    #[tokio::test]
    async fn second_host_is_a_conflict() {
        let Some(db) = test_database().await else {
            return;
        };
        let room_id = create_room(&db).await.id;

        join(&db, &room_id, "Thiago", true).await;

        let result = db
            .create_player(NewPlayer {
                room_id: room_id.clone(),
                name: "Ana".to_string(),
                host: true,
            })
            .await;

        assert!(matches!(
            result,
            Err(DatabaseError::Conflict { field: "host", .. })
        ));

        join(&db, &room_id, "Ana", false).await;

        let players = db.players(&room_id).await.unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players.iter().filter(|p| p.host).count(), 1);
    }

    #[tokio::test]
    async fn players_are_listed_in_join_order() {
        let Some(db) = test_database().await else {
            return;
        };
        let room_id = create_room(&db).await.id;

        for name in ["Thiago", "Ana", "Bruno"] {
            join(&db, &room_id, name, false).await;
        }

        let names: Vec<_> = db
            .players(&room_id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();

        assert_eq!(names, vec!["Thiago", "Ana", "Bruno"]);
    }

    #[tokio::test]
    async fn votes_are_upserted_per_player() {
        let Some(db) = test_database().await else {
            return;
        };
        let room_id = create_room(&db).await.id;
        let thiago = join(&db, &room_id, "Thiago", true).await;
        let ana = join(&db, &room_id, "Ana", false).await;

        db.upsert_vote(vote(&room_id, &thiago, 3.)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
        db.upsert_vote(vote(&room_id, &ana, 8.)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
        db.upsert_vote(vote(&room_id, &thiago, 5.)).await.unwrap();

        let votes = db.votes(&room_id).await.unwrap();
        let values: Vec<_> = votes
            .iter()
            .map(|v| (v.player_name.as_str(), v.value))
            .collect();

        assert_eq!(values, vec![("Ana", 8.), ("Thiago", 5.)]);
    }

    #[tokio::test]
    async fn votes_need_a_player_in_the_room() {
        let Some(db) = test_database().await else {
            return;
        };
        let room_id = create_room(&db).await.id;
        let other_room = create_room(&db).await.id;
        let outsider = join(&db, &other_room, "Bruno", false).await;

        for player_id in ["missing", outsider.as_str()] {
            let result = db.upsert_vote(vote(&room_id, player_id, 13.)).await;

            assert!(matches!(
                result,
                Err(DatabaseError::NotFound {
                    resource: "player",
                    ..
                })
            ));
        }

        assert!(db.votes(&room_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_votes_keeps_players() {
        let Some(db) = test_database().await else {
            return;
        };
        let room_id = create_room(&db).await.id;

        for name in ["Thiago", "Ana"] {
            let player = join(&db, &room_id, name, false).await;
            db.upsert_vote(vote(&room_id, &player, 2.)).await.unwrap();
        }

        assert_eq!(db.delete_votes(&room_id).await.unwrap(), 2);
        assert!(db.votes(&room_id).await.unwrap().is_empty());
        assert_eq!(db.players(&room_id).await.unwrap().len(), 2);
    }
}
