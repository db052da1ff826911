use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::{errors, rooms, schemas, serialized, votings};

#[derive(OpenApi)]
#[openapi(
    paths(
        rooms::create_room,
        rooms::room,
        rooms::join_room,
        rooms::set_topic,
        rooms::players,
        rooms::rename_player,
        votings::register_vote,
        votings::votes,
        votings::reset_votes,
    ),
    components(schemas(
        schemas::NewRoomSchema,
        schemas::JoinRoomSchema,
        schemas::TopicSchema,
        schemas::RenamePlayerSchema,
        schemas::NewVoteSchema,
        serialized::Room,
        serialized::RoomWithPlayers,
        serialized::NewRoomResult,
        serialized::Player,
        serialized::JoinResult,
        serialized::Vote,
        errors::ErrorBody,
    )),
    tags(
        (name = "rooms", description = "Rooms and the players in them"),
        (name = "votings", description = "Votes of the current round")
    ),
    info(
        title = "Scrum Poker API",
        description = "scrumpoker-server exposes endpoints to create rooms, join them and vote"
    )
)]
pub struct ApiDoc;

pub async fn docs() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
