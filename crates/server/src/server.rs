use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{budgets, categories, expenses, reports, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/categories",
            post(categories::create).get(categories::list),
        )
        .route(
            "/categories/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::remove),
        )
        .route("/expenses", post(expenses::create).get(expenses::list))
        .route(
            "/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::remove),
        )
        .route("/budgets", post(budgets::create).get(budgets::list))
        .route(
            "/budgets/{id}",
            get(budgets::get)
                .put(budgets::update)
                .delete(budgets::remove),
        )
        .route("/reports/categorySpending", get(reports::category_spending))
        .route("/reports/monthlySpending", get(reports::monthly_spending))
        .route("/reports/budgetStatus", get(reports::budget_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request as HttpRequest, header};
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ActiveModelTrait, ActiveValue, Database};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();

        user::ActiveModel {
            username: ActiveValue::Set("alice".to_string()),
            password: ActiveValue::Set("password".to_string()),
            email: ActiveValue::Set("alice@example.com".to_string()),
        }
        .insert(&db)
        .await
        .unwrap();

        let engine = Engine::builder()
            .database(db.clone())
            .build()
            .await
            .unwrap();
        router(ServerState {
            engine: Arc::new(engine),
            db,
        })
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> HttpRequest<Body> {
        let credentials = BASE64.encode("alice:password");
        let builder = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Basic {credentials}"));
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn requests_without_credentials_are_rejected() {
        let app = test_router().await;
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/categories")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn requests_with_wrong_password_are_rejected() {
        let app = test_router().await;
        let credentials = BASE64.encode("alice:wrong");
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/categories")
                    .header(header::AUTHORIZATION, format!("Basic {credentials}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn category_crud_round_trip() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/categories",
                Some(json!({"name": "Food"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        // Duplicate names conflict.
        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/categories",
                Some(json!({"name": "Food"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .clone()
            .oneshot(request(
                Method::PUT,
                &format!("/categories/{id}"),
                Some(json!({"name": "Groceries"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["name"], "Groceries");

        let response = app
            .clone()
            .oneshot(request(
                Method::DELETE,
                &format!("/categories/{id}"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(request(Method::GET, &format!("/categories/{id}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reports_reflect_recorded_expenses() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/categories",
                Some(json!({"name": "Food"})),
            ))
            .await
            .unwrap();
        let food_id = json_body(response).await["id"].as_str().unwrap().to_string();

        for (amount, date) in [(10_00, "2023-10-05"), (25_50, "2023-10-20")] {
            let response = app
                .clone()
                .oneshot(request(
                    Method::POST,
                    "/expenses",
                    Some(json!({
                        "amount_cents": amount,
                        "description": "meal",
                        "date": date,
                        "category_id": food_id,
                    })),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/budgets",
                Some(json!({
                    "amount_cents": 30_00,
                    "start_date": "2023-10-01",
                    "end_date": "2023-10-31",
                    "category_id": food_id,
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/reports/categorySpending", None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["report"], json!([{"name": "Food", "total_cents": 3550}]));

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/reports/monthlySpending", None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(
            body["report"],
            json!([{"month": "2023-10", "total_cents": 3550}])
        );

        let response = app
            .oneshot(request(Method::GET, "/reports/budgetStatus", None))
            .await
            .unwrap();
        let body = json_body(response).await;
        let status = &body["report"][0];
        assert_eq!(status["category_name"], "Food");
        assert_eq!(status["current_spending_cents"], 3550);
        assert_eq!(status["remaining_cents"], -550);
        assert_eq!(status["exceeded"], true);
        assert_eq!(status["exceeded_by_cents"], 550);
    }

    #[tokio::test]
    async fn invalid_budget_window_is_unprocessable() {
        let app = test_router().await;
        let response = app
            .oneshot(request(
                Method::POST,
                "/budgets",
                Some(json!({
                    "amount_cents": 10_00,
                    "start_date": "2023-12-01",
                    "end_date": "2023-10-01",
                    "category_id": null,
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn missing_rows_surface_as_not_found() {
        let app = test_router().await;
        let response = app
            .oneshot(request(
                Method::GET,
                &format!("/budgets/{}", uuid::Uuid::new_v4()),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
