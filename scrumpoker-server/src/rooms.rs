use axum::{
    extract::{Path, State},
    routing::{get, patch, post, put},
    Json,
};
use scrumpoker_collab::NewMember;

use crate::{
    context::ServerContext,
    errors::ServerResult,
    schemas::{JoinRoomSchema, NewRoomSchema, RenamePlayerSchema, TopicSchema, ValidatedJson},
    serialized::{JoinResult, NewRoomResult, Player, RoomWithPlayers, ToSerialized},
    Router,
};

#[utoipa::path(
    post,
    path = "/rooms",
    tag = "rooms",
    request_body = NewRoomSchema,
    responses(
        (status = 200, body = NewRoomResult),
        (status = 400, body = ErrorBody),
        (status = 500, body = ErrorBody)
    )
)]
pub(crate) async fn create_room(
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<NewRoomSchema>,
) -> ServerResult<Json<NewRoomResult>> {
    let room = context.collab.rooms.create_room(body.name).await?;

    Ok(Json(room.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/rooms/{pincode}",
    tag = "rooms",
    params(("pincode" = String, Path, description = "Pin code of the room")),
    responses(
        (status = 200, body = RoomWithPlayers),
        (status = 404, body = ErrorBody),
        (status = 500, body = ErrorBody)
    )
)]
pub(crate) async fn room(
    State(context): State<ServerContext>,
    Path(pincode): Path<String>,
) -> ServerResult<Json<RoomWithPlayers>> {
    let snapshot = context.collab.rooms.room_with_players(&pincode).await?;

    Ok(Json(snapshot.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/rooms/{pincode}/join",
    tag = "rooms",
    request_body = JoinRoomSchema,
    params(("pincode" = String, Path, description = "Pin code of the room")),
    responses(
        (status = 200, body = JoinResult),
        (status = 400, description = "Invalid body, or the room already has a host", body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 500, body = ErrorBody)
    )
)]
pub(crate) async fn join_room(
    State(context): State<ServerContext>,
    Path(pincode): Path<String>,
    ValidatedJson(body): ValidatedJson<JoinRoomSchema>,
) -> ServerResult<Json<JoinResult>> {
    let joined = context
        .collab
        .rooms
        .join(
            &pincode,
            NewMember {
                name: body.player_name,
                host: body.host.unwrap_or_default(),
            },
        )
        .await?;

    Ok(Json(joined.to_serialized()))
}

#[utoipa::path(
    put,
    path = "/rooms/{pincode}/topic",
    tag = "rooms",
    request_body = TopicSchema,
    params(("pincode" = String, Path, description = "Pin code of the room")),
    responses(
        (status = 200, description = "Topic was set"),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 500, body = ErrorBody)
    )
)]
pub(crate) async fn set_topic(
    State(context): State<ServerContext>,
    Path(pincode): Path<String>,
    ValidatedJson(body): ValidatedJson<TopicSchema>,
) -> ServerResult<()> {
    context
        .collab
        .rooms
        .set_topic(&pincode, &body.topic)
        .await?;

    Ok(())
}

#[utoipa::path(
    get,
    path = "/rooms/{pincode}/players",
    tag = "rooms",
    params(("pincode" = String, Path, description = "Pin code of the room")),
    responses(
        (status = 200, body = [Player]),
        (status = 404, body = ErrorBody),
        (status = 500, body = ErrorBody)
    )
)]
pub(crate) async fn players(
    State(context): State<ServerContext>,
    Path(pincode): Path<String>,
) -> ServerResult<Json<Vec<Player>>> {
    let players = context.collab.rooms.players(&pincode).await?;

    Ok(Json(players.to_serialized()))
}

#[utoipa::path(
    patch,
    path = "/rooms/{pincode}/players/{id}",
    tag = "rooms",
    request_body = RenamePlayerSchema,
    params(
        ("pincode" = String, Path, description = "Pin code of the room"),
        ("id" = String, Path, description = "Id of the player")
    ),
    responses(
        (status = 200, description = "Player was renamed"),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 500, body = ErrorBody)
    )
)]
pub(crate) async fn rename_player(
    State(context): State<ServerContext>,
    Path((pincode, player_id)): Path<(String, String)>,
    ValidatedJson(body): ValidatedJson<RenamePlayerSchema>,
) -> ServerResult<()> {
    context
        .collab
        .rooms
        .rename_player(&pincode, &player_id, &body.player_name)
        .await?;

    Ok(())
}

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_room))
        .route("/:pincode", get(room))
        .route("/:pincode/join", post(join_room))
        .route("/:pincode/topic", put(set_topic))
        .route("/:pincode/players", get(players))
        .route("/:pincode/players/:id", patch(rename_player))
}
