//! Personal goal handlers.
//!
//! ```text
//! GET /api/v1/goals
//! PUT /api/v1/goals
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{GoalMetric, GoalPeriod, GoalProgress};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, out_of_range_error, parse_enum, require};

const PERIOD: FieldName = FieldName::new("period");
const METRIC: FieldName = FieldName::new("metric");
const TARGET: FieldName = FieldName::new("target");

/// Request payload for setting a goal.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GoalRequest {
    #[schema(example = "weekly")]
    pub period: Option<String>,
    #[schema(example = "sales")]
    pub metric: Option<String>,
    #[schema(example = 15)]
    pub target: Option<u32>,
}

/// Goals of the caller with progress in the current period.
#[utoipa::path(
    get,
    path = "/api/v1/goals",
    responses(
        (status = 200, description = "Goal progress", body = [GoalProgress]),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["goals"],
    operation_id = "listGoals"
)]
#[get("/goals")]
pub async fn list_goals(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<GoalProgress>>> {
    let user = session.require_user(state.users.as_ref()).await?;
    let goals = state.goals_query.goals(&user.id).await?;
    Ok(web::Json(goals))
}

/// Insert or replace the caller's goal for a period and metric.
#[utoipa::path(
    put,
    path = "/api/v1/goals",
    request_body = GoalRequest,
    responses(
        (status = 200, description = "Goal with current progress", body = GoalProgress),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["goals"],
    operation_id = "setGoal"
)]
#[put("/goals")]
pub async fn set_goal(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<GoalRequest>,
) -> ApiResult<web::Json<GoalProgress>> {
    let user = session.require_user(state.users.as_ref()).await?;
    let GoalRequest {
        period,
        metric,
        target,
    } = payload.into_inner();
    let period: GoalPeriod = parse_enum(&require(period, PERIOD)?, PERIOD)?;
    let metric: GoalMetric = parse_enum(&require(metric, METRIC)?, METRIC)?;
    let target = require(target, TARGET)?;
    if target == 0 {
        return Err(out_of_range_error(TARGET, "goal target must be greater than zero"));
    }
    let progress = state.goals.set_goal(&user.id, period, metric, target).await?;
    Ok(web::Json(progress))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::UserRole;
    use crate::domain::ports::{MockGoalsCommand, MockGoalsQuery};
    use crate::inbound::http::test_utils::{fixture_state, session_cookie, test_app, user};

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(list_goals).service(set_goal);
    }

    async fn call(
        state: HttpState,
        caller_id: &str,
        request: actix_test::TestRequest,
    ) -> actix_web::dev::ServiceResponse {
        let app = actix_test::init_service(test_app(state, routes)).await;
        let cookie = session_cookie(&app, caller_id).await;
        actix_test::call_service(&app, request.cookie(cookie).to_request()).await
    }

    #[actix_web::test]
    async fn set_goal_returns_progress() {
        let caller = user(UserRole::Salesperson);
        let mut command = MockGoalsCommand::new();
        command
            .expect_set_goal()
            .withf(|_, period, metric, target| {
                *period == GoalPeriod::Weekly && *metric == GoalMetric::Sales && *target == 15
            })
            .returning(|_, period, metric, target| {
                Ok(GoalProgress {
                    period,
                    metric,
                    target,
                    current: 4,
                    completed: false,
                })
            });
        let mut state = fixture_state(&caller);
        state.goals = Arc::new(command);

        let res = call(
            state,
            &caller.id.to_string(),
            actix_test::TestRequest::put()
                .uri("/api/v1/goals")
                .set_json(json!({"period": "weekly", "metric": "sales", "target": 15})),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: GoalProgress = actix_test::read_body_json(res).await;
        assert_eq!(body.current, 4);
        assert!(!body.completed);
    }

    #[rstest]
    #[case(json!({"period": "yearly", "metric": "sales", "target": 3}), "period")]
    #[case(json!({"period": "daily", "metric": "revenue", "target": 3}), "metric")]
    #[case(json!({"period": "daily", "metric": "points"}), "target")]
    #[case(json!({"period": "daily", "metric": "points", "target": 0}), "target")]
    #[actix_web::test]
    async fn set_goal_validates_payload(#[case] payload: Value, #[case] field: &str) {
        let caller = user(UserRole::Salesperson);
        let mut command = MockGoalsCommand::new();
        command.expect_set_goal().never();
        let mut state = fixture_state(&caller);
        state.goals = Arc::new(command);

        let res = call(
            state,
            &caller.id.to_string(),
            actix_test::TestRequest::put()
                .uri("/api/v1/goals")
                .set_json(payload),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body.pointer("/details/field").and_then(Value::as_str), Some(field));
    }

    #[actix_web::test]
    async fn list_goals_reads_the_session_user() {
        let caller = user(UserRole::Salesperson);
        let expected = caller.id.clone();
        let mut query = MockGoalsQuery::new();
        query
            .expect_goals()
            .withf(move |id| *id == expected)
            .returning(|_| {
                Ok(vec![GoalProgress {
                    period: GoalPeriod::Daily,
                    metric: GoalMetric::Points,
                    target: 50,
                    current: 60,
                    completed: true,
                }])
            });
        let mut state = fixture_state(&caller);
        state.goals_query = Arc::new(query);

        let res = call(
            state,
            &caller.id.to_string(),
            actix_test::TestRequest::get().uri("/api/v1/goals"),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body[0]["period"], "daily");
        assert_eq!(body[0]["completed"], true);
    }
}
