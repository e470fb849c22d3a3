//! OpenAPI document for the action, built from the descriptor alone. Never contacts the gateway.

use super::descriptor::{FunctionDescriptor, HttpVerb};
use crate::entity::{ENTITY_TABLE_SUFFIX, RECORD_SCHEMA_NAME};
use serde_json::{json, Value};
use utoipa::openapi::path::{
    HttpMethod, Operation, OperationBuilder, ParameterBuilder, ParameterIn, PathItemBuilder, PathsBuilder,
};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::schema::{KnownFormat, ObjectBuilder, Schema, SchemaFormat, Type};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme};
use utoipa::openapi::{
    ComponentsBuilder, ContentBuilder, InfoBuilder, OpenApi, OpenApiBuilder, Ref, RefOr, Required, ResponseBuilder,
    Server,
};

pub const OPENAPI_VERSION: &str = "3.0.0";
pub const BEARER_SCHEME: &str = "bearerAuth";
const EXAMPLE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
const TOKEN_PLACEHOLDER: &str = "<token>";

/// Full document as JSON, with an `x-example` command on every operation.
pub fn generate_openapi(descriptor: &FunctionDescriptor) -> Value {
    let mut doc = match serde_json::to_value(build_document(descriptor)) {
        Ok(v) => v,
        Err(e) => return json!({ "error": format!("openapi serialization: {}", e) }),
    };
    doc["openapi"] = json!(OPENAPI_VERSION);
    doc["components"]["securitySchemes"][BEARER_SCHEME]["description"] =
        json!(format!("Bearer token issued by {}", descriptor.auth_url()));
    doc["components"]["securitySchemes"][BEARER_SCHEME]["x-token-url"] = json!(descriptor.auth_url());

    let uri = descriptor.uri();
    for verb in &descriptor.http_methods {
        let key = verb.as_str().to_lowercase();
        if let Some(op) = doc["paths"][&uri].get_mut(&key) {
            op["x-example"] = example_command(descriptor, *verb);
        }
    }
    doc
}

fn build_document(descriptor: &FunctionDescriptor) -> OpenApi {
    let mut item = PathItemBuilder::new();
    for verb in &descriptor.http_methods {
        item = item.operation(http_method(*verb), operation(descriptor, *verb));
    }
    let paths = PathsBuilder::new().path(descriptor.uri(), item.build());

    let components = ComponentsBuilder::new()
        .schema(RECORD_SCHEMA_NAME, record_schema())
        .schema("ActionResponse", envelope_schema())
        .security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        )
        .build();

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title(descriptor.action.clone())
                .version("1.0.0")
                .description(Some(format!(
                    "CRUD action {} in package {}",
                    descriptor.action, descriptor.package
                )))
                .build(),
        )
        .servers(Some(vec![Server::new(descriptor.server_url.clone())]))
        .paths(paths)
        .components(Some(components))
        .security(Some(vec![SecurityRequirement::new(BEARER_SCHEME, Vec::<String>::new())]))
        .build()
}

fn http_method(verb: HttpVerb) -> HttpMethod {
    match verb {
        HttpVerb::Get => HttpMethod::Get,
        HttpVerb::Put => HttpMethod::Put,
        HttpVerb::Delete => HttpMethod::Delete,
        HttpVerb::Patch => HttpMethod::Patch,
        HttpVerb::Post => HttpMethod::Post,
    }
}

fn summary(verb: HttpVerb) -> &'static str {
    match verb {
        HttpVerb::Get => "Read a record by id",
        HttpVerb::Put => "Insert a record",
        HttpVerb::Delete => "Delete a record by id",
        HttpVerb::Patch => "Insert or update a record",
        HttpVerb::Post => "Schema management (createtable/droptable/truncatetable) or read-only query",
    }
}

fn operation(descriptor: &FunctionDescriptor, verb: HttpVerb) -> Operation {
    let mut op = OperationBuilder::new()
        .operation_id(Some(format!("{}{}", verb.as_str().to_lowercase(), descriptor.action)))
        .summary(Some(summary(verb)))
        .tag(descriptor.package.clone())
        .response(
            "200",
            ResponseBuilder::new()
                .description("Response envelope: body.result on success, body.error on failure")
                .content(
                    "application/json",
                    ContentBuilder::new().schema(Some(Ref::from_schema_name("ActionResponse"))).build(),
                )
                .build(),
        );
    if verb.takes_id() {
        op = op.parameter(
            ParameterBuilder::new()
                .name("id")
                .parameter_in(ParameterIn::Query)
                .required(Required::True)
                .description(Some("Record identifier"))
                .schema(Some(uuid_schema()))
                .build(),
        );
    } else {
        op = op.request_body(Some(
            RequestBodyBuilder::new()
                .content(
                    "application/json",
                    ContentBuilder::new().schema(Some(Ref::from_schema_name(RECORD_SCHEMA_NAME))).build(),
                )
                .required(Some(Required::True))
                .build(),
        ));
    }
    op.build()
}

fn object(builder: ObjectBuilder) -> RefOr<Schema> {
    RefOr::T(Schema::Object(builder.build()))
}

fn uuid_schema() -> RefOr<Schema> {
    object(
        ObjectBuilder::new()
            .schema_type(Type::String)
            .format(Some(SchemaFormat::KnownFormat(KnownFormat::Uuid))),
    )
}

/// Mirrors `Record`'s JSON field names and types.
fn record_schema() -> RefOr<Schema> {
    object(
        ObjectBuilder::new()
            .schema_type(Type::Object)
            .property("id", uuid_schema())
            .property("descr", object(ObjectBuilder::new().schema_type(Type::String)))
            .property("enabled", object(ObjectBuilder::new().schema_type(Type::Boolean)))
            .property(
                "updDate",
                object(
                    ObjectBuilder::new()
                        .schema_type(Type::String)
                        .format(Some(SchemaFormat::KnownFormat(KnownFormat::DateTime))),
                ),
            )
            .required("id"),
    )
}

fn envelope_schema() -> RefOr<Schema> {
    let body = ObjectBuilder::new()
        .schema_type(Type::Object)
        .property("result", object(ObjectBuilder::new().description(Some("Operation payload"))))
        .property("error", object(ObjectBuilder::new().schema_type(Type::String)));
    object(
        ObjectBuilder::new()
            .schema_type(Type::Object)
            .property("body", object(body))
            .required("body"),
    )
}

fn example_body(descriptor: &FunctionDescriptor, verb: HttpVerb) -> Option<Value> {
    match verb {
        HttpVerb::Get | HttpVerb::Delete => None,
        HttpVerb::Put | HttpVerb::Patch => Some(json!({
            "id": EXAMPLE_ID,
            "descr": "example",
            "enabled": true,
            "updDate": "2024-01-01T00:00:00"
        })),
        HttpVerb::Post => Some(json!({
            "query": format!("SELECT * FROM {}{}", descriptor.action, ENTITY_TABLE_SUFFIX)
        })),
    }
}

/// Ready-to-run call against the public route, for documentation only.
fn example_command(descriptor: &FunctionDescriptor, verb: HttpVerb) -> Value {
    let url = if verb.takes_id() {
        format!("{}?id={}", descriptor.public_url(), EXAMPLE_ID)
    } else {
        descriptor.public_url()
    };
    let auth = format!("Bearer {}", TOKEN_PLACEHOLDER);
    let body = example_body(descriptor, verb);

    let mut curl = format!("curl -X {} '{}' -H 'Authorization: {}'", verb, url, auth);
    if let Some(ref b) = body {
        curl.push_str(&format!(" -H 'Content-Type: application/json' -d '{}'", b));
    }

    let mut example = json!({
        "method": verb.as_str(),
        "url": url,
        "headers": {
            "Authorization": auth,
            "Content-Type": "application/json"
        },
        "curl": curl
    });
    if let Some(b) = body {
        example["body"] = b;
    }
    example
}
