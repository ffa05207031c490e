use leavegate_core::config::LoadOptions;
use leavegate_core::RuleCatalog;
use leavegate_db::SqlLeaveStore;

use crate::commands::{open_pool, prepare, CommandFailure, CommandResult};

pub fn run(options: LoadOptions) -> CommandResult {
    let (config, runtime) = match prepare("rules", options) {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let rules = RuleCatalog::new(SqlLeaveStore::new(pool.clone())).list_active_rules().await;
        pool.close().await;
        Ok::<_, CommandFailure>(rules)
    });

    match result {
        Ok(rules) => {
            let message = format!("{} active approval rules", rules.len());
            CommandResult::success_with_data("rules", message, serde_json::to_value(&rules).ok())
        }
        Err(failure) => CommandResult::from_failure("rules", failure),
    }
}
