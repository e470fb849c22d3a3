//! CRUD action for one entity table, with self-registering gateway routes and OpenAPI output.

pub mod args;
pub mod config;
pub mod dispatcher;
pub mod entity;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod sql;
pub mod state;
pub mod store;

pub use args::ArgumentBag;
pub use config::{RepositoryConfig, Settings};
pub use dispatcher::{dispatch, execute};
pub use entity::Record;
pub use error::{ActionFailure, AppError, ConfigError};
pub use gateway::{generate_openapi, setup_if_required, FunctionDescriptor, GatewayAdmin, HttpVerb, Provisioning};
pub use response::{ActionResponse, Outcome};
pub use routes::{action_routes, common_routes};
pub use state::AppState;
pub use store::{EntityRepository, PgRepository};
