//! GraphQL-over-HTTP exposure
//!
//! `POST {graphql_path}` accepts a single request object or a batch (JSON
//! array) and answers with the GraphQL response body of each outcome. GraphQL
//! errors are part of a `200 OK` body; only engine faults change the status.

use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{ExecutorConfig, HttpConfig};
use crate::core::{ExecutionRequest, RequestContext};
use crate::executor::QueryExecutor;
use crate::server::shutdown_signal;

/// Body of a GraphQL POST request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQLRequestBody {
    query: String,
    #[serde(default)]
    variables: Option<Map<String, Value>>,
    #[serde(default)]
    operation_name: Option<String>,
    #[serde(default)]
    extensions: Option<Map<String, Value>>,
}

impl GraphQLRequestBody {
    fn into_request(self, context: RequestContext) -> ExecutionRequest {
        let mut request = ExecutionRequest::new(self.query).with_context(context);
        if let Some(name) = self.operation_name {
            request = request.with_operation_name(name);
        }
        if let Some(variables) = self.variables {
            request = request.with_variables(variables);
        }
        if let Some(extensions) = self.extensions {
            request = request.with_extensions(extensions);
        }
        request
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GraphQLPayload {
    Single(GraphQLRequestBody),
    Batch(Vec<GraphQLRequestBody>),
}

/// GraphQL API exposure implementation
pub struct GraphQLExposure;

impl GraphQLExposure {
    /// Build the GraphQL router
    ///
    /// Returns a router with:
    /// - `POST {http.graphql_path}` for queries and batches
    /// - `GET /health`
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let executor = Arc::new(QueryExecutor::new(schema));
    /// let app = GraphQLExposure::build_router(executor, &HttpConfig::default());
    /// ```
    pub fn build_router(executor: Arc<QueryExecutor>, http: &HttpConfig) -> Router {
        Router::new()
            .route(&http.graphql_path, post(graphql_handler))
            .route("/health", get(health_check))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
            .with_state(executor)
    }

    /// Serve the GraphQL router on `addr` until Ctrl+C or SIGTERM
    pub async fn serve(
        executor: Arc<QueryExecutor>,
        config: &ExecutorConfig,
        addr: SocketAddr,
    ) -> Result<()> {
        let app = Self::build_router(executor, &config.http);
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(
            "GraphQL endpoint listening on http://{}{}",
            listener.local_addr()?,
            config.http.graphql_path
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

async fn graphql_handler(
    State(executor): State<Arc<QueryExecutor>>,
    headers: HeaderMap,
    Json(payload): Json<GraphQLPayload>,
) -> Response {
    let context = RequestContext::from_headers(headers);

    match payload {
        GraphQLPayload::Single(body) => match executor.execute(body.into_request(context)).await {
            Ok(outcome) => Json(outcome.to_specification()).into_response(),
            Err(e) => e.into_response(),
        },
        GraphQLPayload::Batch(bodies) => {
            let requests = bodies
                .into_iter()
                .map(|body| body.into_request(context.clone()))
                .collect();

            // a faulted entry is reported in place, the batch itself succeeds
            let results: Vec<Value> = executor
                .execute_batch(requests)
                .await
                .into_iter()
                .map(|result| match result {
                    Ok(outcome) => outcome.to_specification(),
                    Err(e) => json!({ "error": e.to_response() }),
                })
                .collect();

            Json(Value::Array(results)).into_response()
        }
    }
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
