use leavegate_core::config::LoadOptions;
use leavegate_core::domain::leave::LeaveRequestId;
use leavegate_core::domain::user::UserId;
use leavegate_core::AutoApprovalEngine;
use leavegate_db::SqlLeaveStore;

use crate::commands::{open_pool, prepare, CommandFailure, CommandResult};

#[derive(Debug, Clone, Default)]
pub struct EvaluateArgs {
    pub request_id: String,
    pub user_id: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Evaluates one request. Engine failures are already folded into the
/// `error` verdict, so only setup problems produce a failed envelope.
pub fn run(options: LoadOptions, args: EvaluateArgs) -> CommandResult {
    let (config, runtime) = match prepare("evaluate", options) {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let EvaluateArgs { request_id, user_id, start, end } = args;
    let leave_request_id = LeaveRequestId(request_id.clone());

    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let engine = AutoApprovalEngine::new(SqlLeaveStore::new(pool.clone()));

        let verdict = match (user_id, start, end) {
            (Some(user_id), Some(start), Some(end)) => {
                engine.evaluate_iso(leave_request_id, UserId(user_id), &start, &end).await
            }
            _ => engine.evaluate_stored(&leave_request_id).await,
        };

        pool.close().await;
        Ok::<_, CommandFailure>(verdict)
    });

    match result {
        Ok(verdict) => {
            let message = format!("leave request {request_id} evaluated: {}", verdict.reason);
            let data = serde_json::to_value(&verdict).ok();
            CommandResult::success_with_data("evaluate", message, data)
        }
        Err(failure) => CommandResult::from_failure("evaluate", failure),
    }
}
