use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json,
};

use crate::{
    context::ServerContext,
    errors::ServerResult,
    schemas::{NewVoteSchema, ValidatedJson},
    serialized::{ToSerialized, Vote},
    Router,
};

#[utoipa::path(
    post,
    path = "/votings/{pincode}",
    tag = "votings",
    request_body = NewVoteSchema,
    params(("pincode" = String, Path, description = "Pin code of the room")),
    responses(
        (status = 200, description = "Vote was registered"),
        (status = 400, body = ErrorBody),
        (status = 404, description = "Room or player not found", body = ErrorBody),
        (status = 500, body = ErrorBody)
    )
)]
pub(crate) async fn register_vote(
    State(context): State<ServerContext>,
    Path(pincode): Path<String>,
    ValidatedJson(body): ValidatedJson<NewVoteSchema>,
) -> ServerResult<()> {
    context
        .collab
        .votings
        .register_vote(&pincode, &body.player_id, body.value)
        .await?;

    Ok(())
}

#[utoipa::path(
    get,
    path = "/votings/{pincode}",
    tag = "votings",
    params(("pincode" = String, Path, description = "Pin code of the room")),
    responses(
        (status = 200, body = [Vote]),
        (status = 404, body = ErrorBody),
        (status = 500, body = ErrorBody)
    )
)]
pub(crate) async fn votes(
    State(context): State<ServerContext>,
    Path(pincode): Path<String>,
) -> ServerResult<Json<Vec<Vote>>> {
    let votes = context.collab.votings.votes(&pincode).await?;

    Ok(Json(votes.to_serialized()))
}

#[utoipa::path(
    delete,
    path = "/votings/{pincode}/reset",
    tag = "votings",
    params(("pincode" = String, Path, description = "Pin code of the room")),
    responses(
        (status = 200, description = "All votes of the room were removed"),
        (status = 404, body = ErrorBody),
        (status = 500, body = ErrorBody)
    )
)]
pub(crate) async fn reset_votes(
    State(context): State<ServerContext>,
    Path(pincode): Path<String>,
) -> ServerResult<()> {
    context.collab.votings.reset(&pincode).await?;

    Ok(())
}

pub fn router() -> Router {
    Router::new()
        .route("/:pincode", get(votes).post(register_vote))
        .route("/:pincode/reset", delete(reset_votes))
}
