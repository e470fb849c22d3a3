//! Entry point of one invocation: provisioning first, then verb routing.

use crate::args::ArgumentBag;
use crate::config::{RepositoryConfig, Settings};
use crate::entity::Record;
use crate::error::{ActionFailure, AppError};
use crate::gateway::{setup_if_required, GatewayAdmin, HttpVerb};
use crate::handlers::{
    handle_create_table, handle_delete, handle_drop_table, handle_execute_query, handle_get, handle_patch,
    handle_put, handle_truncate_table,
};
use crate::response::{ActionResponse, Outcome};
use crate::state::AppState;
use crate::store::{EntityRepository, PgRepository};
use serde_json::Value;
use uuid::Uuid;

pub const POST_NOT_SUPPORTED: &str = "POST method not supported";

/// Routes one argument bag. Handler failures come back as error outcomes;
/// only top-level validation escapes as `ActionFailure`.
pub async fn dispatch(
    settings: &Settings,
    gateway: &dyn GatewayAdmin,
    args: &ArgumentBag,
    repo: &dyn EntityRepository,
) -> Result<Outcome, ActionFailure> {
    let provisioning = setup_if_required(settings, gateway, args).await;
    if provisioning.short_circuits() {
        return Ok(provisioning.into_outcome());
    }

    let raw = args.get_str("method").unwrap_or_default();
    let verb = match raw.parse::<HttpVerb>() {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(method = %raw, "unsupported method");
            return Ok(Outcome::error(e.to_string()));
        }
    };
    tracing::info!(method = %verb, table = %repo.table_name(), "dispatch");

    let outcome = match verb {
        HttpVerb::Get => handle_get(required_id(args)?, repo).await,
        HttpVerb::Delete => handle_delete(required_id(args)?, repo).await,
        HttpVerb::Put => handle_put(Record::from_args(args), repo).await,
        HttpVerb::Patch => handle_patch(Record::from_args(args), repo).await,
        HttpVerb::Post => dispatch_post(args, repo).await,
    };
    Ok(outcome)
}

/// Flags are checked in a fixed order; the first one set wins.
async fn dispatch_post(args: &ArgumentBag, repo: &dyn EntityRepository) -> Outcome {
    if args.flag("createtable", "YES") {
        handle_create_table(repo).await
    } else if args.flag("droptable", "YES") {
        handle_drop_table(repo).await
    } else if args.flag("truncatetable", "YES") {
        handle_truncate_table(repo).await
    } else if args.get("query").is_some() {
        handle_execute_query(args.get_str("query"), repo).await
    } else {
        Outcome::error(POST_NOT_SUPPORTED)
    }
}

fn required_id(args: &ArgumentBag) -> Result<Uuid, AppError> {
    match args.get_uuid("id") {
        Ok(Some(id)) => Ok(id),
        Ok(None) => Err(AppError::Validation("Id is null".into())),
        Err(raw) => Err(AppError::Validation(format!("Id is not a valid UUID: {}", raw))),
    }
}

/// Full invocation against PostgreSQL: resolves the repository, dispatches and wraps the envelope.
pub async fn execute(state: &AppState, params: Value) -> Value {
    let args = ArgumentBag::from_value(params);
    let outcome = match run(state, &args).await {
        Ok(outcome) => outcome,
        Err(failure) => {
            tracing::warn!(error = %failure.error, line = failure.line(), "invocation failed");
            Outcome::error(failure.to_string())
        }
    };
    ActionResponse::from(outcome).into_json()
}

async fn run(state: &AppState, args: &ArgumentBag) -> Result<Outcome, ActionFailure> {
    let config = RepositoryConfig::resolve(&state.settings, args);
    let repo = PgRepository::new(&config)?;
    dispatch(&state.settings, state.gateway.as_ref(), args, &repo).await
}
