//! API route handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use churn_model::{CustomerRecord, Forest, DECISION_THRESHOLD};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::AppState;

/// Handler failure: any error flattens to a 500 carrying the error text.
pub struct ApiError(anyhow::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = format!("{:#}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "detail": detail })),
        )
            .into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(error: E) -> Self {
        Self(error.into())
    }
}

/// Request body for `POST /predict`.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Caller-supplied identifier echoed in the response.
    pub customer_id: Option<String>,

    #[serde(flatten)]
    pub customer: CustomerRecord,
}

/// Response body for `POST /predict`.
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub customer_id: String,
    pub churn_probability: f64,
    pub prediction: bool,
}

/// Response body for `GET /model/info`.
#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub model_version: u32,
    pub creation_timestamp: String,
    pub model_type: String,
    pub signature: serde_json::Value,
}

/// Static welcome message.
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to the customer churn prediction API"
    }))
}

/// Scores one customer row against the current production model.
///
/// The model is reloaded from the registry on every call.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let loaded = state.registry.load_production(&state.model_name).await?;

    let forest: Forest = serde_json::from_slice(&loaded.artifact)?;

    let churn_probability = f64::from(forest.predict_proba(&request.customer.encode()));
    let prediction = churn_probability >= f64::from(DECISION_THRESHOLD);

    let customer_id = request
        .customer_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    info!(
        model_version = loaded.manifest.version,
        churn_probability, "Scored prediction request"
    );

    Ok(Json(PredictionResponse {
        customer_id,
        churn_probability,
        prediction,
    }))
}

/// Reports metadata for the current production model.
pub async fn model_info(
    State(state): State<AppState>,
) -> Result<Json<ModelInfoResponse>, ApiError> {
    let manifest = state
        .registry
        .load_production(&state.model_name)
        .await?
        .manifest;

    Ok(Json(ModelInfoResponse {
        model_version: manifest.version,
        creation_timestamp: manifest.created_at.to_rfc3339(),
        model_type: manifest.model_kind,
        signature: manifest.signature,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use bytes::Bytes;
    use chrono::Utc;
    use churn_model::{prepare_training_data, GbdtConfig};
    use http_body_util::BodyExt;
    use model_registry::{ModelManifest, ModelRegistry};
    use object_store::memory::InMemory;
    use tower::ServiceExt;

    use crate::{router, AppState};

    fn empty_state() -> AppState {
        AppState {
            registry: Arc::new(ModelRegistry::new(Arc::new(InMemory::new()))),
            model_name: "customer_churn".to_string(),
        }
    }

    /// Trains a small forest and promotes it as version 1.
    async fn state_with_production_model() -> AppState {
        let state = empty_state();

        let data = prepare_training_data();
        let config = GbdtConfig {
            num_rounds: 5,
            ..GbdtConfig::default()
        };
        let forest = churn_model::train(&data, &config).unwrap();

        let manifest = ModelManifest {
            name: state.model_name.clone(),
            version: 1,
            created_at: Utc::now(),
            model_kind: churn_model::MODEL_KIND.to_string(),
            signature: serde_json::to_value(churn_model::signature()).unwrap(),
            params: serde_json::to_value(&config).unwrap(),
            metrics: serde_json::json!({}),
        };
        let artifact = Bytes::from(serde_json::to_vec(&forest).unwrap());

        state.registry.save_version(&manifest, artifact).await.unwrap();
        state.registry.promote(&state.model_name, 1).await.unwrap();

        state
    }

    fn predict_body() -> serde_json::Value {
        serde_json::json!({
            "tenure": 12,
            "monthly_charges": 51.2,
            "total_charges": 512.0,
            "contract_type": "Month-to-month",
            "payment_method": "Electronic check",
            "internet_service": "Fiber optic",
            "online_security": "No",
            "tech_support": "No"
        })
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_predict(body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_returns_welcome_message() {
        let app = router(empty_state());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("churn"));
    }

    #[tokio::test]
    async fn test_predict_returns_thresholded_probability() {
        let app = router(state_with_production_model().await);

        let response = app.oneshot(post_predict(&predict_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;

        let probability = body["churn_probability"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&probability));
        assert_eq!(body["prediction"].as_bool().unwrap(), probability >= 0.5);
        assert!(!body["customer_id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_predict_echoes_customer_id() {
        let app = router(state_with_production_model().await);

        let mut body = predict_body();
        body["customer_id"] = serde_json::json!("cust-42");

        let response = app.oneshot(post_predict(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["customer_id"], "cust-42");
    }

    #[tokio::test]
    async fn test_predict_without_production_model_returns_500() {
        let app = router(empty_state());

        let response = app.oneshot(post_predict(&predict_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response_json(response).await;
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .contains("No production model promoted"));
    }

    #[tokio::test]
    async fn test_model_info_reports_promoted_version() {
        let app = router(state_with_production_model().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/model/info")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;

        assert_eq!(body["model_version"].as_u64().unwrap(), 1);
        assert_eq!(body["model_type"], "gradient_boosted_trees");
        assert!(!body["creation_timestamp"].as_str().unwrap().is_empty());
        assert!(body["signature"]["inputs"].as_array().unwrap().len() == 8);
    }

    #[tokio::test]
    async fn test_model_info_without_production_model_returns_500() {
        let app = router(empty_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/model/info")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
