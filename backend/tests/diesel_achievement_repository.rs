//! Integration tests for `DieselAchievementRepository` against embedded PostgreSQL.

use chrono::{TimeZone, Utc};
use fieldsales::domain::ports::AchievementRepository;
use fieldsales::domain::{AchievementCondition, AchievementId, CustomCondition, UserId};
use fieldsales::outbound::persistence::{DbPool, DieselAchievementRepository, PoolConfig};
use pg_embedded_setup_unpriv::TestCluster;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use uuid::Uuid;

#[path = "support/pg_embed.rs"]
mod pg_embed;

use pg_embed::{
    execute, fresh_database, handle_cluster_setup_failure, seed_salesperson, test_cluster,
};

const TEST_DB: &str = "diesel_achievement_repo_test";
/// "First Sale", seeded by the initial migration.
const FIRST_SALE: &str = "6d1f0c52-3b7e-4c0a-9a51-0b9e0f6f0001";
const SEEDED_DEFINITIONS: usize = 15;

struct TestContext {
    runtime: Runtime,
    _cluster: TestCluster,
    database_url: String,
    repository: DieselAchievementRepository,
    rep: UserId,
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    let database_url = fresh_database(&cluster, &runtime, TEST_DB)?;
    let joined = Utc
        .with_ymd_and_hms(2026, 1, 5, 9, 0, 0)
        .single()
        .ok_or("invalid instant")?;
    let rep = seed_salesperson(&database_url, "Badge Rep", joined)?;

    let config = PoolConfig::new(database_url.as_str())
        .with_max_size(4)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        _cluster: cluster,
        database_url,
        repository: DieselAchievementRepository::new(pool),
        rep,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn first_sale() -> AchievementId {
    AchievementId::from_uuid(Uuid::parse_str(FIRST_SALE).expect("valid uuid"))
}

#[rstest]
fn seeded_definitions_decode_and_unknown_rows_are_skipped(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: seeded_definitions_decode skipped");
        return;
    };
    execute(
        &context.database_url,
        "INSERT INTO achievement_definitions \
         (id, name, description, category, condition_type, condition_value) \
         VALUES (gen_random_uuid(), 'Mystery', 'Unknown rule', 'special', 'moon_phase', 1)",
    )
    .expect("insert undecodable definition");

    let definitions = context
        .runtime
        .block_on(context.repository.definitions())
        .expect("load definitions");

    assert_eq!(definitions.len(), SEEDED_DEFINITIONS);
    assert!(definitions.iter().all(|definition| definition.name != "Mystery"));
    let bundle = definitions
        .iter()
        .find(|definition| definition.name == "Bundle Master")
        .expect("bundle definition");
    assert_eq!(
        bundle.condition,
        AchievementCondition::Custom(CustomCondition::AddOnBundle { min_add_ons: 3 })
    );
    let early_bird = definitions
        .iter()
        .find(|definition| definition.name == "Early Bird")
        .expect("early bird definition");
    assert!(early_bird.is_secret);
}

#[rstest]
fn duplicate_unlock_is_ignored(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: duplicate_unlock_is_ignored skipped");
        return;
    };
    let earned_at = Utc
        .with_ymd_and_hms(2026, 3, 4, 12, 0, 0)
        .single()
        .expect("valid instant");
    let achievement = first_sale();

    let first = context
        .runtime
        .block_on(context.repository.insert_unlock(&context.rep, &achievement, earned_at))
        .expect("first unlock");
    let second = context
        .runtime
        .block_on(context.repository.insert_unlock(
            &context.rep,
            &achievement,
            earned_at + chrono::TimeDelta::hours(1),
        ))
        .expect("second unlock");

    assert!(first);
    assert!(!second);
    let unlocked = context
        .runtime
        .block_on(context.repository.unlocked_for(&context.rep))
        .expect("unlocked");
    assert_eq!(unlocked.len(), 1);
    assert_eq!(unlocked[0].achievement_id, achievement);
    assert_eq!(unlocked[0].earned_at, earned_at);
}

#[rstest]
fn racing_unlocks_insert_once(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: racing_unlocks_insert_once skipped");
        return;
    };
    let earned_at = Utc::now();
    let achievement = first_sale();

    let (a, b) = context.runtime.block_on(async {
        tokio::join!(
            context.repository.insert_unlock(&context.rep, &achievement, earned_at),
            context.repository.insert_unlock(&context.rep, &achievement, earned_at)
        )
    });
    let outcomes = [a.expect("first racer"), b.expect("second racer")];

    assert_eq!(outcomes.iter().filter(|inserted| **inserted).count(), 1);
}
