//! HTTP items resource served by `avault serve`.
//!
//! ```text
//! GET    /api/items[?categoryId=]   200 [item, ...] sorted by name
//! POST   /api/items                 201 {"id": ...}
//! PUT    /api/items   {id, ...}     200 {"success": true}
//! DELETE /api/items?id=             200 {"success": true}
//! ```
//!
//! Errors are `{"error": message}`: 400 for malformed bodies or a missing id,
//! 404 for unknown paths, 405 for other methods, 500 for store failures.

use std::io::Read;

use serde::Deserialize;
use serde_json::{Value, json};
use tiny_http::{Header, Method, Request, Response, Server};

use av_db::service::AvService;
use av_db::updates::item::{ItemUpdate, NewItem};

const ITEMS_PATH: &str = "/api/items";

/// Status code and JSON body of one handled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    fn store_error(error: &impl std::fmt::Display) -> Self {
        tracing::error!(%error, "items request failed");
        Self::error(500, error.to_string())
    }

    fn into_http(self) -> Response<std::io::Cursor<Vec<u8>>> {
        let mut response =
            Response::from_string(self.body.to_string()).with_status_code(self.status);
        if let Ok(header) = Header::from_bytes("Content-Type", "application/json") {
            response = response.with_header(header);
        }
        response
    }
}

#[derive(Debug, Deserialize)]
struct ItemPut {
    id: Option<String>,
    #[serde(flatten)]
    update: ItemUpdate,
}

/// Route one request against the store.
pub async fn route(service: &AvService, method: &Method, url: &str, body: &str) -> ApiResponse {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    if path.trim_end_matches('/') != ITEMS_PATH {
        return ApiResponse::error(404, format!("No route for {path}"));
    }

    match method {
        Method::Get => {
            let category = query_param(query, "categoryId");
            match service.list_items(category.as_deref()).await {
                Ok(items) => ApiResponse::ok(json!(items)),
                Err(error) => ApiResponse::store_error(&error),
            }
        }
        Method::Post => {
            let new: NewItem = match serde_json::from_str(body) {
                Ok(new) => new,
                Err(error) => return ApiResponse::error(400, format!("Invalid JSON body: {error}")),
            };
            match service.create_item(&new).await {
                Ok(item) => ApiResponse {
                    status: 201,
                    body: json!({ "id": item.id }),
                },
                Err(error) => ApiResponse::store_error(&error),
            }
        }
        Method::Put => {
            let put: ItemPut = match serde_json::from_str(body) {
                Ok(put) => put,
                Err(error) => return ApiResponse::error(400, format!("Invalid JSON body: {error}")),
            };
            let Some(id) = put.id.filter(|id| !id.trim().is_empty()) else {
                return ApiResponse::error(400, "Item ID required");
            };
            match service.update_item(&id, &put.update).await {
                Ok(_) => ApiResponse::ok(json!({ "success": true })),
                Err(error) => ApiResponse::store_error(&error),
            }
        }
        Method::Delete => {
            let Some(id) = query_param(query, "id").filter(|id| !id.trim().is_empty()) else {
                return ApiResponse::error(400, "Item ID required");
            };
            match service.delete_item(&id).await {
                Ok(()) => ApiResponse::ok(json!({ "success": true })),
                Err(error) => ApiResponse::store_error(&error),
            }
        }
        other => ApiResponse::error(405, format!("Method {other} not allowed")),
    }
}

/// First value of `key` in a query string, percent-decoded.
fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(name, _)| *name == key)
        .and_then(|(_, value)| {
            urlencoding::decode(&value.replace('+', " "))
                .ok()
                .map(std::borrow::Cow::into_owned)
        })
}

/// Serve requests until the process is stopped.
///
/// `tiny_http` blocks on `recv`, so the loop runs inside `block_in_place` and
/// re-enters the runtime through `handle` for each request, one at a time.
pub fn run(service: &AvService, bind: &str) -> anyhow::Result<()> {
    let server = Server::http(bind)
        .map_err(|error| anyhow::anyhow!("failed to bind {bind}: {error}"))?;
    let handle = tokio::runtime::Handle::current();
    tracing::info!(%bind, "serving {ITEMS_PATH}");

    tokio::task::block_in_place(|| {
        for request in server.incoming_requests() {
            respond(service, &handle, request);
        }
    });
    Ok(())
}

fn respond(service: &AvService, handle: &tokio::runtime::Handle, mut request: Request) {
    let mut body = String::new();
    let response = match request.as_reader().read_to_string(&mut body) {
        Ok(_) => handle.block_on(route(service, request.method(), request.url(), &body)),
        Err(error) => ApiResponse::error(400, format!("Unreadable request body: {error}")),
    };

    tracing::debug!(
        method = %request.method(),
        url = %request.url(),
        status = response.status,
        "request handled"
    );
    if let Err(error) = request.respond(response.into_http()) {
        tracing::warn!(%error, "failed to write response");
    }
}
