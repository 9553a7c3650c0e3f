//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, Resource, test, web};

use crate::domain::ports::{
    FixtureAchievementsQuery, FixtureCommissionCommand, FixtureGoalsCommand, FixtureGoalsQuery,
    FixtureLeaderboardQuery, FixtureOrderCommand, FixtureOrderQuery, MockUserDirectory,
};
use crate::domain::{AuthenticatedUser, Error, UserId, UserRole};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const SIGN_IN_PATH: &str = "/__test/sign-in";

/// Session middleware with a fresh key and an insecure cookie named `session`.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Route standing in for the identity provider: stamps `{id}` into the session.
pub fn sign_in_route() -> Resource {
    web::resource(format!("{SIGN_IN_PATH}/{{id}}")).route(web::post().to(
        |session: SessionContext, id: web::Path<String>| async move {
            let id = UserId::new(id.into_inner())
                .map_err(|err| Error::invalid_request(err.to_string()))?;
            session.persist_user(&id)?;
            Ok::<_, Error>(HttpResponse::NoContent().finish())
        },
    ))
}

/// App with session support, the sign-in stand-in and `routes` under `/api/v1`.
pub fn test_app(
    state: HttpState,
    routes: fn(&mut web::ServiceConfig),
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(sign_in_route())
        .service(web::scope("/api/v1").configure(routes))
}

/// Sign in as `user_id` and return the resulting session cookie.
pub async fn session_cookie<S>(app: &S, user_id: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("{SIGN_IN_PATH}/{user_id}"))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "sign-in failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// A user with the given role and a fresh id.
pub fn user(role: UserRole) -> AuthenticatedUser {
    let id = UserId::random();
    AuthenticatedUser {
        email: format!("{id}@example.com"),
        id,
        role,
    }
}

/// Directory that resolves exactly `user`.
pub fn directory_for(user: &AuthenticatedUser) -> MockUserDirectory {
    let known = user.clone();
    let mut directory = MockUserDirectory::new();
    directory.expect_find_user().returning(move |id| {
        Ok((id == &known.id).then(|| known.clone()))
    });
    directory
}

/// HTTP state backed by fixtures, with `user` as the only known identity.
pub fn fixture_state(user: &AuthenticatedUser) -> HttpState {
    HttpState {
        users: Arc::new(directory_for(user)),
        orders: Arc::new(FixtureOrderCommand),
        orders_query: Arc::new(FixtureOrderQuery),
        leaderboard: Arc::new(FixtureLeaderboardQuery),
        achievements: Arc::new(FixtureAchievementsQuery),
        goals: Arc::new(FixtureGoalsCommand),
        goals_query: Arc::new(FixtureGoalsQuery),
        commission: Arc::new(FixtureCommissionCommand),
    }
}
