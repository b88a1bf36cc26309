use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use fitcat_db::models::{
    DietDraft, DietFilter, DietPatch, DietSort, TrainingDraft, TrainingFilter, TrainingPatch,
    TrainingSort,
};
use fitcat_db::queries::{diets as diet_db, trainings as training_db};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct TrainingListParams {
    category: Option<String>,
    difficulty: Option<String>,
    intensity: Option<String>,
    sort: Option<String>,
    /// Comma-separated plan ids; when present, filter/sort params are
    /// ignored and only the named plans are returned.
    ids: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DietListParams {
    goal: Option<String>,
    sort: Option<String>,
    ids: Option<String>,
}

/// Parse a comma-separated id list, skipping entries that are not valid
/// UUIDs. A fully malformed list behaves like an empty one.
fn parse_ids(raw: &str) -> Vec<Uuid> {
    raw.split(',')
        .filter_map(|part| Uuid::parse_str(part.trim()).ok())
        .collect()
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request(format!("invalid plan id: {raw}")))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(pool: PgPool) -> Router {
    Router::new()
        .route("/api/trainings", get(list_trainings).post(create_training))
        .route(
            "/api/trainings/{id}",
            get(get_training).put(update_training).delete(delete_training),
        )
        .route("/api/diets", get(list_diets).post(create_diet))
        .route(
            "/api/diets/{id}",
            get(get_diet).put(update_diet).delete(delete_diet),
        )
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(pool)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(pool: PgPool, bind: &str, port: u16) -> Result<()> {
    let app = build_router(pool);
    let listener = bind_with_fallback(bind, port).await?;
    let addr = listener.local_addr()?;
    tracing::info!("fitcat serve listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("fitcat serve shut down");
    Ok(())
}

/// Bind `bind:port`, falling back to the next few ports when the requested
/// one is taken. Port 0 asks the OS for a free port directly.
async fn bind_with_fallback(bind: &str, port: u16) -> Result<tokio::net::TcpListener> {
    const MAX_ATTEMPTS: u16 = 10;

    if port == 0 {
        let addr: SocketAddr = format!("{bind}:0").parse()?;
        return Ok(tokio::net::TcpListener::bind(addr).await?);
    }

    let mut last_err = None;
    for attempt in 0..=MAX_ATTEMPTS {
        let Some(try_port) = port.checked_add(attempt) else {
            break;
        };
        let addr: SocketAddr = format!("{bind}:{try_port}").parse()?;
        match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::warn!("port {try_port} in use, trying next port");
                last_err = Some(e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(anyhow::anyhow!(
        "failed to bind any port in {port}..={}: {}",
        port.saturating_add(MAX_ATTEMPTS),
        last_err.map_or_else(|| "no ports attempted".to_string(), |e| e.to_string())
    ))
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

// ---------------------------------------------------------------------------
// Training handlers
// ---------------------------------------------------------------------------

async fn list_trainings(
    State(pool): State<PgPool>,
    Query(params): Query<TrainingListParams>,
) -> Result<axum::response::Response, AppError> {
    let trainings = if let Some(raw_ids) = &params.ids {
        training_db::list_trainings_by_ids(&pool, &parse_ids(raw_ids))
            .await
            .map_err(AppError::internal)?
    } else {
        let filter = TrainingFilter {
            category: params.category,
            difficulty: params.difficulty,
            intensity: params.intensity,
        };
        let sort = TrainingSort::from_param(params.sort.as_deref());
        training_db::list_trainings(&pool, &filter, sort)
            .await
            .map_err(AppError::internal)?
    };

    Ok(Json(trainings).into_response())
}

async fn get_training(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, AppError> {
    let id = parse_id(&id)?;
    let training = training_db::get_training(&pool, id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found("Training not found"))?;

    Ok(Json(training).into_response())
}

async fn create_training(
    State(pool): State<PgPool>,
    Json(draft): Json<TrainingDraft>,
) -> Result<axum::response::Response, AppError> {
    let new = draft
        .validate()
        .map_err(|e| AppError::bad_request(e.to_string()))?;

    let training = training_db::insert_training(&pool, &new)
        .await
        .map_err(AppError::internal)?;

    let body = serde_json::json!({
        "message": "Training created successfully",
        "id": training.id,
        "training": training,
    });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn update_training(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    Json(patch): Json<TrainingPatch>,
) -> Result<axum::response::Response, AppError> {
    let id = parse_id(&id)?;
    let training = training_db::update_training(&pool, id, &patch)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found("Training not found"))?;

    let body = serde_json::json!({
        "message": "Training updated successfully",
        "training": training,
    });
    Ok(Json(body).into_response())
}

async fn delete_training(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, AppError> {
    let id = parse_id(&id)?;
    let deleted = training_db::delete_training(&pool, id)
        .await
        .map_err(AppError::internal)?;
    if !deleted {
        return Err(AppError::not_found("Training not found"));
    }

    let body = serde_json::json!({ "message": "Training deleted successfully" });
    Ok(Json(body).into_response())
}

// ---------------------------------------------------------------------------
// Diet handlers
// ---------------------------------------------------------------------------

async fn list_diets(
    State(pool): State<PgPool>,
    Query(params): Query<DietListParams>,
) -> Result<axum::response::Response, AppError> {
    let diets = if let Some(raw_ids) = &params.ids {
        diet_db::list_diets_by_ids(&pool, &parse_ids(raw_ids))
            .await
            .map_err(AppError::internal)?
    } else {
        let filter = DietFilter { goal: params.goal };
        let sort = DietSort::from_param(params.sort.as_deref());
        diet_db::list_diets(&pool, &filter, sort)
            .await
            .map_err(AppError::internal)?
    };

    Ok(Json(diets).into_response())
}

async fn get_diet(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, AppError> {
    let id = parse_id(&id)?;
    let diet = diet_db::get_diet(&pool, id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found("Diet plan not found"))?;

    Ok(Json(diet).into_response())
}

async fn create_diet(
    State(pool): State<PgPool>,
    Json(draft): Json<DietDraft>,
) -> Result<axum::response::Response, AppError> {
    let new = draft
        .validate()
        .map_err(|e| AppError::bad_request(e.to_string()))?;

    let diet = diet_db::insert_diet(&pool, &new)
        .await
        .map_err(AppError::internal)?;

    let body = serde_json::json!({
        "message": "Diet plan created successfully",
        "id": diet.id,
        "diet": diet,
    });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn update_diet(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    Json(patch): Json<DietPatch>,
) -> Result<axum::response::Response, AppError> {
    let id = parse_id(&id)?;
    let diet = diet_db::update_diet(&pool, id, &patch)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found("Diet plan not found"))?;

    let body = serde_json::json!({
        "message": "Diet plan updated successfully",
        "diet": diet,
    });
    Ok(Json(body).into_response())
}

async fn delete_diet(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, AppError> {
    let id = parse_id(&id)?;
    let deleted = diet_db::delete_diet(&pool, id)
        .await
        .map_err(AppError::internal)?;
    if !deleted {
        return Err(AppError::not_found("Diet plan not found"));
    }

    let body = serde_json::json!({ "message": "Diet plan deleted successfully" });
    Ok(Json(body).into_response())
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

async fn health() -> axum::response::Response {
    Json(serde_json::json!({ "status": "Server is running" })).into_response()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use sqlx::PgPool;
    use tower::ServiceExt;

    use fitcat_test_utils::{create_test_db, drop_test_db};

    // -----------------------------------------------------------------------
    // HTTP helpers
    // -----------------------------------------------------------------------

    async fn send_request(pool: PgPool, uri: &str) -> axum::response::Response {
        let app = super::build_router(pool);
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn send_json(
        pool: PgPool,
        method: Method,
        uri: &str,
        body: serde_json::Value,
    ) -> axum::response::Response {
        let app = super::build_router(pool);
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn training_body(name: &str, duration: i64) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "duration": duration,
            "intensity": "Moderate",
        })
    }

    async fn create_training(pool: PgPool, body: serde_json::Value) -> serde_json::Value {
        let resp = send_json(pool, Method::POST, "/api/trainings", body).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        body_json(resp).await
    }

    // -----------------------------------------------------------------------
    // Health
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_health() {
        let (pool, db_name) = create_test_db().await;

        let resp = send_request(pool.clone(), "/api/health").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json, serde_json::json!({ "status": "Server is running" }));

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    // -----------------------------------------------------------------------
    // Trainings
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_list_trainings_empty() {
        let (pool, db_name) = create_test_db().await;

        let resp = send_request(pool.clone(), "/api/trainings").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json, serde_json::json!([]));

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_create_training_returns_document_with_defaults() {
        let (pool, db_name) = create_test_db().await;

        let json = create_training(pool.clone(), training_body("Morning Flow", 30)).await;
        assert_eq!(json["message"], "Training created successfully");
        assert!(json.get("id").is_some(), "response should carry the new id");
        assert_eq!(json["training"]["name"], "Morning Flow");
        assert_eq!(json["training"]["difficulty"], "Beginner");
        assert_eq!(json["training"]["category"], "Full Body");
        assert_eq!(json["training"]["caloriesBurned"], 150);
        assert_eq!(json["training"]["frequency"], "1x per week");
        assert_eq!(json["id"], json["training"]["id"]);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_create_training_missing_fields_is_400() {
        let (pool, db_name) = create_test_db().await;

        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/trainings",
            serde_json::json!({ "name": "No duration" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        let error = json["error"].as_str().unwrap();
        assert!(error.contains("duration"), "unexpected error: {error}");
        assert!(error.contains("intensity"), "unexpected error: {error}");

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_like_missing() {
        let (pool, db_name) = create_test_db().await;

        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/trainings",
            serde_json::json!({ "name": "  ", "duration": 30, "intensity": "Low" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_get_training_by_id() {
        let (pool, db_name) = create_test_db().await;

        let created = create_training(pool.clone(), training_body("HIIT Blast", 20)).await;
        let id = created["id"].as_str().unwrap();

        let resp = send_request(pool.clone(), &format!("/api/trainings/{id}")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["name"], "HIIT Blast");
        assert_eq!(json["duration"], 20);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_get_training_not_found() {
        let (pool, db_name) = create_test_db().await;

        let random_id = uuid::Uuid::new_v4();
        let resp = send_request(pool.clone(), &format!("/api/trainings/{random_id}")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Training not found");

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_malformed_id_is_400_not_500() {
        let (pool, db_name) = create_test_db().await;

        let resp = send_request(pool.clone(), "/api/trainings/not-a-uuid").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_list_trainings_filter_and_sort() {
        let (pool, db_name) = create_test_db().await;

        for (name, duration, difficulty) in [
            ("Long Push", 45, "Intermediate"),
            ("Short Push", 25, "Intermediate"),
            ("Easy Pull", 35, "Beginner"),
        ] {
            let mut body = training_body(name, duration);
            body["difficulty"] = serde_json::json!(difficulty);
            create_training(pool.clone(), body).await;
        }

        let resp = send_request(
            pool.clone(),
            "/api/trainings?difficulty=Intermediate&sort=duration",
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let names: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Short Push", "Long Push"]);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_unknown_filter_key_is_ignored() {
        let (pool, db_name) = create_test_db().await;

        create_training(pool.clone(), training_body("Alpha", 30)).await;
        create_training(pool.clone(), training_body("Beta", 40)).await;

        let plain = send_request(pool.clone(), "/api/trainings").await;
        assert_eq!(plain.status(), StatusCode::OK);
        let plain = body_json(plain).await;

        let with_bogus = send_request(pool.clone(), "/api/trainings?bogus=X").await;
        assert_eq!(with_bogus.status(), StatusCode::OK);
        let with_bogus = body_json(with_bogus).await;

        assert_eq!(with_bogus, plain);
        assert_eq!(plain.as_array().unwrap().len(), 2);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_unknown_sort_param_falls_back_to_newest() {
        let (pool, db_name) = create_test_db().await;

        create_training(pool.clone(), training_body("First", 30)).await;
        create_training(pool.clone(), training_body("Second", 30)).await;

        let resp = send_request(pool.clone(), "/api/trainings?sort=bogus").await;
        let json = body_json(resp).await;
        assert_eq!(json[0]["name"], "Second");

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_list_trainings_by_ids_skips_malformed_and_missing() {
        let (pool, db_name) = create_test_db().await;

        let created = create_training(pool.clone(), training_body("Selected", 30)).await;
        create_training(pool.clone(), training_body("Unselected", 30)).await;
        let id = created["id"].as_str().unwrap();
        let missing = uuid::Uuid::new_v4();

        let resp = send_request(
            pool.clone(),
            &format!("/api/trainings?ids={id},not-a-uuid,{missing}"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let arr = json.as_array().unwrap();
        assert_eq!(arr.len(), 1);
        assert_eq!(arr[0]["name"], "Selected");

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_update_training_merges_truthy_fields() {
        let (pool, db_name) = create_test_db().await;

        let created = create_training(pool.clone(), training_body("Original", 30)).await;
        let id = created["id"].as_str().unwrap();

        let resp = send_json(
            pool.clone(),
            Method::PUT,
            &format!("/api/trainings/{id}"),
            serde_json::json!({ "name": "", "duration": 50, "notes": "go harder" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "Training updated successfully");
        // Blank name is treated as not supplied.
        assert_eq!(json["training"]["name"], "Original");
        assert_eq!(json["training"]["duration"], 50);
        assert_eq!(json["training"]["notes"], "go harder");

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_update_training_not_found() {
        let (pool, db_name) = create_test_db().await;

        let random_id = uuid::Uuid::new_v4();
        let resp = send_json(
            pool.clone(),
            Method::PUT,
            &format!("/api/trainings/{random_id}"),
            serde_json::json!({ "name": "Ghost" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_delete_training() {
        let (pool, db_name) = create_test_db().await;

        let created = create_training(pool.clone(), training_body("Doomed", 30)).await;
        let id = created["id"].as_str().unwrap().to_owned();

        let resp = send_json(
            pool.clone(),
            Method::DELETE,
            &format!("/api/trainings/{id}"),
            serde_json::json!({}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "Training deleted successfully");

        let resp = send_request(pool.clone(), &format!("/api/trainings/{id}")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    // -----------------------------------------------------------------------
    // Diets
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_create_and_get_diet() {
        let (pool, db_name) = create_test_db().await;

        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/diets",
            serde_json::json!({
                "name": "Lean Cut",
                "goal": "Fat Loss",
                "calorieTarget": 1800,
                "macros": { "protein": 160, "carbs": 120, "fats": 60 },
                "meals": ["Breakfast", "Lunch", "Dinner"],
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "Diet plan created successfully");
        assert_eq!(json["diet"]["mealCount"], 3);
        assert_eq!(json["diet"]["macros"]["protein"], 160);

        let id = json["id"].as_str().unwrap();
        let resp = send_request(pool.clone(), &format!("/api/diets/{id}")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["name"], "Lean Cut");

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_create_diet_missing_fields_is_400() {
        let (pool, db_name) = create_test_db().await;

        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/diets",
            serde_json::json!({ "name": "Incomplete" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        let error = json["error"].as_str().unwrap();
        assert!(error.contains("calorieTarget"), "unexpected error: {error}");
        assert!(error.contains("goal"), "unexpected error: {error}");

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_list_diets_goal_filter_and_calorie_sort() {
        let (pool, db_name) = create_test_db().await;

        for (name, goal, calories) in [
            ("Big Bulk", "Muscle Gain", 3200),
            ("Small Bulk", "Muscle Gain", 2600),
            ("Cut", "Fat Loss", 1700),
        ] {
            let resp = send_json(
                pool.clone(),
                Method::POST,
                "/api/diets",
                serde_json::json!({ "name": name, "goal": goal, "calorieTarget": calories }),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let resp = send_request(pool.clone(), "/api/diets?goal=Muscle%20Gain&sort=calories").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let names: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Small Bulk", "Big Bulk"]);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_diet_not_found_message() {
        let (pool, db_name) = create_test_db().await;

        let random_id = uuid::Uuid::new_v4();
        let resp = send_request(pool.clone(), &format!("/api/diets/{random_id}")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Diet plan not found");

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_update_and_delete_diet() {
        let (pool, db_name) = create_test_db().await;

        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/diets",
            serde_json::json!({ "name": "Keto", "goal": "Fat Loss", "calorieTarget": 1900 }),
        )
        .await;
        let created = body_json(resp).await;
        let id = created["id"].as_str().unwrap().to_owned();

        let resp = send_json(
            pool.clone(),
            Method::PUT,
            &format!("/api/diets/{id}"),
            serde_json::json!({ "calorieTarget": 2000, "macros": { "protein": 150, "carbs": 40, "fats": 150 } }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "Diet plan updated successfully");
        assert_eq!(json["diet"]["calorieTarget"], 2000);
        assert_eq!(json["diet"]["macros"]["fats"], 150);

        let resp = send_json(
            pool.clone(),
            Method::DELETE,
            &format!("/api/diets/{id}"),
            serde_json::json!({}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "Diet plan deleted successfully");

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    // -----------------------------------------------------------------------
    // Port fallback
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_bind_with_fallback_skips_taken_port() {
        // Occupy an OS-assigned port, then ask for that same port.
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let taken_port = taken.local_addr().unwrap().port();

        let listener = super::bind_with_fallback("127.0.0.1", taken_port)
            .await
            .expect("should fall back to a nearby free port");
        let bound = listener.local_addr().unwrap().port();
        assert_ne!(bound, taken_port);
        assert!(
            (taken_port..=taken_port + 10).contains(&bound),
            "bound port {bound} should be within the fallback window"
        );
    }

    #[tokio::test]
    async fn test_bind_with_fallback_port_zero_asks_os() {
        let listener = super::bind_with_fallback("127.0.0.1", 0).await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }
}
