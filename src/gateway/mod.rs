//! Function descriptor, gateway route provisioning and OpenAPI generation.

pub mod client;
pub mod descriptor;
pub mod openapi;
pub mod provisioner;
pub mod route;

pub use client::{ApisixAdminClient, GatewayAdmin, GatewayReply};
pub use descriptor::{FunctionDescriptor, HttpVerb};
pub use openapi::generate_openapi;
pub use provisioner::{setup_if_required, Provisioning};
pub use route::RouteConfig;
