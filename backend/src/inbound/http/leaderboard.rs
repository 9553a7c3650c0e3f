//! Leaderboard HTTP handlers.
//!
//! ```text
//! GET /api/v1/leaderboard?range=today|week|month|all_time&limit=N
//! GET /api/v1/leaderboard/teams?range=...
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{LeaderboardResult, MAX_LEADERBOARD_LIMIT, TeamStanding, TimeRange};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, out_of_range_error, parse_enum};

const RANGE: FieldName = FieldName::new("range");
const LIMIT: FieldName = FieldName::new("limit");
const DEFAULT_RANGE: TimeRange = TimeRange::Week;

/// Query parameters for the individual board.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LeaderboardParams {
    /// `today`, `week` (default), `month` or `all_time`.
    pub range: Option<String>,
    /// Entries to return, 1 to 200; defaults to 50.
    pub limit: Option<usize>,
}

/// Query parameters for the team board.
#[derive(Debug, Deserialize, IntoParams)]
pub struct TeamParams {
    /// `today`, `week` (default), `month` or `all_time`.
    pub range: Option<String>,
}

fn range_or_default(raw: Option<&str>) -> ApiResult<TimeRange> {
    raw.map_or(Ok(DEFAULT_RANGE), |raw| parse_enum(raw, RANGE))
}

fn checked_limit(limit: Option<usize>) -> ApiResult<Option<usize>> {
    match limit {
        Some(0) => Err(out_of_range_error(LIMIT, "limit must be at least 1")),
        Some(n) if n > MAX_LEADERBOARD_LIMIT => Err(out_of_range_error(
            LIMIT,
            format!("limit must be at most {MAX_LEADERBOARD_LIMIT}"),
        )),
        other => Ok(other),
    }
}

/// Ranked salespeople for a time window.
///
/// Aggregation failures do not fail the request: `entries` is empty and
/// `error` carries the message.
#[utoipa::path(
    get,
    path = "/api/v1/leaderboard",
    params(LeaderboardParams),
    responses(
        (status = 200, description = "Ranked entries", body = LeaderboardResult),
        (status = 400, description = "Invalid range or limit", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["leaderboard"],
    operation_id = "getLeaderboard"
)]
#[get("/leaderboard")]
pub async fn get_leaderboard(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<LeaderboardParams>,
) -> ApiResult<web::Json<LeaderboardResult>> {
    let viewer = session.require_user(state.users.as_ref()).await?;
    let range = range_or_default(params.range.as_deref())?;
    let limit = checked_limit(params.limit)?;
    let result = state.leaderboard.leaderboard(&viewer.id, range, limit).await;
    Ok(web::Json(result))
}

/// Teams ranked by summed member points.
#[utoipa::path(
    get,
    path = "/api/v1/leaderboard/teams",
    params(TeamParams),
    responses(
        (status = 200, description = "Team standings", body = [TeamStanding]),
        (status = 400, description = "Invalid range", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 503, description = "Service unavailable", body = crate::domain::Error)
    ),
    tags = ["leaderboard"],
    operation_id = "getTeamStandings"
)]
#[get("/leaderboard/teams")]
pub async fn get_team_standings(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<TeamParams>,
) -> ApiResult<web::Json<Vec<TeamStanding>>> {
    session.require_user(state.users.as_ref()).await?;
    let range = range_or_default(params.range.as_deref())?;
    let standings = state.leaderboard.team_standings(range).await?;
    Ok(web::Json(standings))
}
