//! HTTP dispatcher — REST/HTTP+JSON binding over the same [`RequestHandler`].
//!
//! Every route here is a thin adapter: it decodes the REST request shape
//! into the same `*Params` structs [`super::axum_integration::a2a_router`]'s
//! JSON-RPC handlers build, calls the one [`RequestHandler`] method that
//! serves both bindings, and re-encodes the result as a plain JSON body (or
//! an SSE stream for the two streaming routes) instead of a JSON-RPC
//! envelope.
//!
//! # Routes
//!
//! | Method | Path | JSON-RPC equivalent |
//! |--------|------|----------------------|
//! | `GET`  | `/v1/card` | agent card discovery |
//! | `POST` | `/v1/message:send` | `message/send` |
//! | `POST` | `/v1/message:stream` | `message/stream` |
//! | `GET`  | `/v1/tasks/{id}` | `tasks/get` |
//! | `POST` | `/v1/tasks/{id}:cancel` | `tasks/cancel` |
//! | `GET`  | `/v1/tasks/{id}:subscribe` | `tasks/subscribe` |
//! | `POST` | `/v1/tasks/{id}/pushNotificationConfigs` | `tasks/pushNotificationConfig/set` |
//! | `GET`  | `/v1/tasks/{id}/pushNotificationConfigs` | `tasks/pushNotificationConfig/list` |
//! | `GET`  | `/v1/tasks/{id}/pushNotificationConfigs/{configId}` | `tasks/pushNotificationConfig/get` |
//! | `DELETE` | `/v1/tasks/{id}/pushNotificationConfigs/{configId}` | `tasks/pushNotificationConfig/delete` |

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use futures::stream::Stream;
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tracing::{error, warn};

use crate::config::HostConfig;
use crate::error::A2AError;
use crate::types::{AgentCard, StreamResponse};

use super::request_handler::{
    CancelTaskParams, GetTaskParams, RequestHandler, SendMessageParams, SubscribeToTaskParams,
};

struct AppState {
    handler: Arc<dyn RequestHandler>,
    agent_card: AgentCard,
}

/// Create an axum `Router` exposing the REST/HTTP+JSON binding under
/// `config.path` (default `/a2a`), with the `/v1/...` routes nested beneath it.
///
/// Mount alongside [`super::axum_integration::a2a_router`] to serve both
/// bindings from the same `RequestHandler`.
pub fn http_dispatcher_router(
    handler: Arc<dyn RequestHandler>,
    agent_card: AgentCard,
    config: &HostConfig,
) -> Router {
    let state = Arc::new(AppState {
        handler,
        agent_card,
    });

    let v1 = Router::new()
        .route("/v1/card", get(get_card))
        .route("/v1/message:send", post(send_message))
        .route("/v1/message:stream", post(stream_message))
        .route("/v1/tasks/{id}", get(get_task))
        .route("/v1/tasks/{id}:cancel", post(cancel_task))
        .route("/v1/tasks/{id}:subscribe", get(subscribe_task))
        .route(
            "/v1/tasks/{id}/pushNotificationConfigs",
            post(set_push_config).get(list_push_configs),
        )
        .route(
            "/v1/tasks/{id}/pushNotificationConfigs/{config_id}",
            get(get_push_config).delete(delete_push_config),
        );

    Router::new()
        .nest(&config.path, v1)
        .with_state(state)
}

/// Maps an [`A2AError`] to an HTTP status, the way a REST binding must
/// (JSON-RPC instead carries the code in the response body).
fn status_for(err: &A2AError) -> StatusCode {
    match err {
        A2AError::TaskNotFound { .. } => StatusCode::NOT_FOUND,
        A2AError::MethodNotFound { .. } => StatusCode::NOT_FOUND,
        A2AError::AuthenticatedExtendedCardNotConfigured { .. } => StatusCode::NOT_FOUND,
        A2AError::InvalidRequest { .. }
        | A2AError::InvalidParams { .. }
        | A2AError::ParseError { .. }
        | A2AError::InvalidJson(_)
        | A2AError::TaskNotCancelable { .. }
        | A2AError::UnsupportedOperation { .. }
        | A2AError::PushNotificationNotSupported { .. } => StatusCode::BAD_REQUEST,
        A2AError::ContentTypeNotSupported { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: A2AError) -> Response {
    let status = status_for(&err);
    let body = json!({
        "code": err.code(),
        "message": err.to_string(),
    });
    (status, Json(body)).into_response()
}

async fn get_card(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(&state.agent_card)
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Response {
    let params = match parse_send_message_params(body) {
        Ok(p) => p,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "message": e }))).into_response()
        }
    };

    match state.handler.on_message_send(params).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => error_response(e),
    }
}

async fn stream_message(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> Response {
    if !state.agent_card.capabilities.streaming.unwrap_or(false) {
        return error_response(A2AError::UnsupportedOperation {
            message: "Streaming is not supported by the agent".to_string(),
            data: None,
        });
    }

    let params = match parse_send_message_params(body) {
        Ok(p) => p,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "message": e }))).into_response()
        }
    };

    match state.handler.on_message_send_stream(params).await {
        Ok(rx) => Sse::new(plain_sse_stream(rx))
            .keep_alive(KeepAlive::default())
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Query string for `GET /v1/tasks/{id}` — `historyLength` is a plain
/// integer, `metadata` is a JSON-encoded object string.
#[derive(serde::Deserialize)]
struct GetTaskQuery {
    #[serde(default, rename = "historyLength")]
    history_length: Option<usize>,
    #[serde(default)]
    metadata: Option<String>,
}

async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<GetTaskQuery>,
) -> Response {
    let metadata = match query.metadata {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "message": format!("invalid 'metadata' query param: {}", e) })),
                )
                    .into_response()
            }
        },
        None => None,
    };

    let params = GetTaskParams {
        id,
        history_length: query.history_length,
        metadata,
        tenant: None,
    };

    match state.handler.on_get_task(params).await {
        Ok(task) => Json(task).into_response(),
        Err(e) => error_response(e),
    }
}

async fn cancel_task(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let params = CancelTaskParams {
        id,
        metadata: None,
        tenant: None,
    };

    match state.handler.on_cancel_task(params).await {
        Ok(task) => Json(task).into_response(),
        Err(e) => error_response(e),
    }
}

async fn subscribe_task(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let params = SubscribeToTaskParams {
        id,
        metadata: None,
        tenant: None,
    };

    match state.handler.on_subscribe_to_task(params).await {
        Ok(rx) => Sse::new(plain_sse_stream(rx))
            .keep_alive(KeepAlive::default())
            .into_response(),
        Err(e) => error_response(e),
    }
}

async fn set_push_config(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(config): Json<Value>,
) -> Response {
    let config_id = config
        .get("id")
        .and_then(|v| v.as_str())
        .map(String::from)
        .unwrap_or_else(|| id.clone());

    let params = json!({ "taskId": id, "configId": config_id, "config": config });
    match state
        .handler
        .on_set_task_push_notification_config(params)
        .await
    {
        Ok(result) => Json(result).into_response(),
        Err(e) => error_response(e),
    }
}

async fn list_push_configs(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let params = json!({ "id": id });
    match state
        .handler
        .on_list_task_push_notification_config(params)
        .await
    {
        Ok(result) => Json(result).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_push_config(
    State(state): State<Arc<AppState>>,
    Path((id, config_id)): Path<(String, String)>,
) -> Response {
    let params = json!({ "id": id, "pushNotificationConfigId": config_id });
    match state
        .handler
        .on_get_task_push_notification_config(params)
        .await
    {
        Ok(result) => Json(result).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_push_config(
    State(state): State<Arc<AppState>>,
    Path((id, config_id)): Path<(String, String)>,
) -> Response {
    let params = json!({ "id": id, "pushNotificationConfigId": config_id });
    match state
        .handler
        .on_delete_task_push_notification_config(params)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

fn parse_send_message_params(body: Value) -> Result<SendMessageParams, String> {
    // Reuses the exact field names of the JSON-RPC `message/send` params
    // object, since the REST body is the same shape minus the envelope.
    let obj = body.as_object().ok_or("body must be an object")?;

    let message: crate::types::Message = serde_json::from_value(
        obj.get("message")
            .cloned()
            .ok_or("missing 'message' field")?,
    )
    .map_err(|e| format!("invalid message: {}", e))?;

    let configuration = obj
        .get("configuration")
        .filter(|v| !v.is_null())
        .cloned()
        .map(|v| {
            let obj = v.as_object().ok_or_else(|| "configuration must be an object".to_string())?;
            Ok::<_, String>(crate::server::request_handler::SendMessageConfiguration {
                accepted_output_modes: obj.get("acceptedOutputModes").and_then(|v| {
                    v.as_array().map(|arr| {
                        arr.iter()
                            .filter_map(|v| v.as_str().map(String::from))
                            .collect()
                    })
                }),
                blocking: obj.get("blocking").and_then(|v| v.as_bool()),
                history_length: obj
                    .get("historyLength")
                    .and_then(|v| v.as_u64().map(|n| n as usize)),
                push_notification_config: obj.get("pushNotificationConfig").cloned(),
            })
        })
        .transpose()?;

    let metadata = obj.get("metadata").filter(|v| !v.is_null()).cloned();
    let tenant = obj.get("tenant").and_then(|v| v.as_str().map(String::from));

    Ok(SendMessageParams {
        message,
        configuration,
        metadata,
        tenant,
    })
}

/// SSE stream of bare `StreamResponse` JSON bodies — no JSON-RPC envelope,
/// matching the REST binding's plain-JSON convention.
fn plain_sse_stream(
    mut rx: broadcast::Receiver<StreamResponse>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let is_terminal = matches!(&event, StreamResponse::StatusUpdate(update) if update.r#final);

                    match serde_json::to_string(&event) {
                        Ok(json) => yield Ok(Event::default().data(json)),
                        Err(e) => error!(error = %e, "Failed to serialize REST SSE event"),
                    }

                    if is_terminal {
                        yield Ok(Event::default().event("done").data(""));
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => {
                    yield Ok(Event::default().event("done").data(""));
                    break;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(missed = n, "REST SSE stream lagged — some events were missed");
                }
            }
        }
    }
}
