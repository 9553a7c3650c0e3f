//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP endpoint of the inbound layer together
//! with the domain payloads they exchange and the session cookie security
//! scheme. Swagger UI serves it in debug builds; `openapi-dump` prints it.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{OrderCreated, OrderScope};
use crate::domain::{
    AchievementCategory, AchievementView, CommissionRateUpdate, Error, ErrorCode, GoalMetric,
    GoalPeriod, GoalProgress, LeaderboardEntry, LeaderboardResult, Order,
    OrderGamificationResult, OrderStatus, PlanType, PointBreakdown, PointsAward, RankChange,
    SaleType, StreakSummary, TeamStanding, UnlockedAchievement, UserRole,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie stamped with the user id by the identity provider.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Field sales rewards API",
        description = "Orders, points, streaks, achievements, leaderboards, goals and commission for field sales teams."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::orders::create_order,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::update_order_status,
        crate::inbound::http::orders::retry_rewards,
        crate::inbound::http::leaderboard::get_leaderboard,
        crate::inbound::http::leaderboard::get_team_standings,
        crate::inbound::http::achievements::list_achievements,
        crate::inbound::http::goals::list_goals,
        crate::inbound::http::goals::set_goal,
        crate::inbound::http::commission::set_commission_rate,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Order,
        OrderCreated,
        OrderScope,
        OrderStatus,
        PlanType,
        SaleType,
        PointBreakdown,
        PointsAward,
        StreakSummary,
        UnlockedAchievement,
        OrderGamificationResult,
        LeaderboardEntry,
        LeaderboardResult,
        RankChange,
        TeamStanding,
        AchievementCategory,
        AchievementView,
        GoalPeriod,
        GoalMetric,
        GoalProgress,
        CommissionRateUpdate,
        UserRole,
    )),
    tags(
        (name = "orders", description = "Order capture and status changes"),
        (name = "leaderboard", description = "Rankings and team standings"),
        (name = "achievements", description = "Achievement catalogue and unlocks"),
        (name = "goals", description = "Personal sales and points goals"),
        (name = "commission", description = "Commission rate administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
