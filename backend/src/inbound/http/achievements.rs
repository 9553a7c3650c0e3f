//! Achievements screen.
//!
//! ```text
//! GET /api/v1/achievements
//! ```

use actix_web::{get, web};

use crate::domain::AchievementView;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Every achievement with the caller's unlock state.
#[utoipa::path(
    get,
    path = "/api/v1/achievements",
    responses(
        (status = 200, description = "Achievements; secret ones masked until earned", body = [AchievementView]),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 503, description = "Service unavailable", body = crate::domain::Error)
    ),
    tags = ["achievements"],
    operation_id = "listAchievements"
)]
#[get("/achievements")]
pub async fn list_achievements(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<AchievementView>>> {
    let user = session.require_user(state.users.as_ref()).await?;
    let views = state.achievements.list_for_user(&user.id).await?;
    Ok(web::Json(views))
}
