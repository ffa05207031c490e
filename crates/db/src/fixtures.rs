use sqlx::Executor;
use tracing::info;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

const SEED_USER_IDS: &[&str] = &["usr-manager-001", "usr-alice-001", "usr-bob-001"];

const SEED_PROJECT_IDS: &[&str] = &["prj-apollo", "prj-gemini", "prj-mercury"];

const SEED_ASSIGNMENT_IDS: &[&str] =
    &["pa-alice-apollo", "pa-alice-gemini", "pa-bob-gemini", "pa-manager-mercury"];

const SEED_LEAVE_REQUEST_IDS: &[&str] = &["lr-seed-001", "lr-seed-002"];

const SEED_HISTORY_IDS: &[&str] = &["lh-seed-001"];

const SEED_RULE_IDS: &[&str] = &[
    "rule-critical-deadline",
    "rule-overload-relief",
    "rule-low-risk",
    "rule-good-history",
    "rule-manager-review",
];

/// Bootstrap dataset: an Engineering manager with two reports, three projects
/// and the approval rule catalog. Loading is idempotent.
pub struct SeedDataset;

impl SeedDataset {
    pub const SQL: &str = include_str!("../../../config/fixtures/leave_seed_data.sql");

    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;

        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        let result = SeedResult {
            users: SEED_USER_IDS.len(),
            leave_requests: SEED_LEAVE_REQUEST_IDS.len(),
            rules: SEED_RULE_IDS.len(),
        };
        info!(
            event_name = "system.seed.loaded",
            users = result.users,
            leave_requests = result.leave_requests,
            rules = result.rules,
            "seed dataset loaded"
        );

        Ok(result)
    }

    /// Checks that every seeded row is present.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let checks = vec![
            ("users", all_present(pool, "users", SEED_USER_IDS).await?),
            ("projects", all_present(pool, "projects", SEED_PROJECT_IDS).await?),
            (
                "project-assignments",
                all_present(pool, "project_assignments", SEED_ASSIGNMENT_IDS).await?,
            ),
            ("leave-requests", all_present(pool, "leave_requests", SEED_LEAVE_REQUEST_IDS).await?),
            ("leave-history", all_present(pool, "leave_history", SEED_HISTORY_IDS).await?),
            ("approval-rules", all_present(pool, "approval_rules", SEED_RULE_IDS).await?),
        ];

        let all_present = checks.iter().all(|(_, exists)| *exists);
        Ok(VerificationResult { all_present, checks })
    }
}

async fn all_present(
    pool: &DbPool,
    table: &'static str,
    ids: &[&str],
) -> Result<bool, RepositoryError> {
    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(1) FROM {table} WHERE id IN {}",
        sql_array_from_ids(ids)
    ))
    .fetch_one(pool)
    .await?;
    Ok(count == ids.len() as i64)
}

fn sql_array_from_ids(ids: &[&str]) -> String {
    let quoted = ids.iter().map(|id| format!("'{}'", id)).collect::<Vec<_>>().join(",");
    format!("({quoted})")
}

#[derive(Debug)]
pub struct SeedResult {
    pub users: usize,
    pub leave_requests: usize,
    pub rules: usize,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
