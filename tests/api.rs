// tests/api.rs

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use proserv::{
    build_router,
    common::{calendar::today, error::AppError},
    config::{AppState, Config, Stores},
    db::MemoryAccountStore,
    models::{
        account::Account,
        plan::{Plan, Role},
        reports::CheckoutSession,
    },
    services::payment_gateway::{PaymentGateway, PreferenceRequest},
};

struct FixedGateway;

#[async_trait]
impl PaymentGateway for FixedGateway {
    async fn create_preference(&self, request: &PreferenceRequest) -> Result<CheckoutSession, AppError> {
        Ok(CheckoutSession {
            checkout_url: format!("https://pagamento.test/checkout/{}", request.plan.as_str()),
            preference_id: "pref-test".into(),
        })
    }
}

struct TestApp {
    router: Router,
    accounts: Arc<MemoryAccountStore>,
}

fn app() -> TestApp {
    let accounts = Arc::new(MemoryAccountStore::new());
    let state = AppState::from_parts(
        Config::for_tests(),
        Stores::with_accounts(accounts.clone()),
        Arc::new(FixedGateway),
    );
    TestApp { router: build_router(state), accounts }
}

impl TestApp {
    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "email": email, "password": "senha123", "fullName": "Ana Souza" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn seed_client_and_service(&self, token: &str) -> (String, String) {
        let (_, client) = self
            .send(Method::POST, "/api/clients", Some(token), Some(json!({ "name": "Maria Oliveira" })))
            .await;
        let (_, service) = self
            .send(
                Method::POST,
                "/api/services",
                Some(token),
                Some(json!({ "name": "Corte", "price": 50.0, "duration": 45 })),
            )
            .await;
        (
            client["id"].as_str().unwrap().to_string(),
            service["id"].as_str().unwrap().to_string(),
        )
    }
}

fn this_month_day(day: u32) -> String {
    today().format(&format!("%Y-%m-{day:02}")).to_string()
}

#[tokio::test]
async fn register_login_and_me() {
    let app = app();
    app.register("ana@salao.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ana@salao.com", "password": "senha123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = app.send(Method::GET, "/api/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "ana@salao.com");
    assert_eq!(me["plan"], "free");
    assert!(me.get("passwordHash").is_none());

    let (_, nav) = app.send(Method::GET, "/api/me/navigation", Some(&token), None).await;
    let menu: Vec<&str> = nav["menu"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["feature"].as_str().unwrap())
        .collect();
    assert!(!menu.contains(&"finance"));
    assert!(!menu.contains(&"reports"));
    assert_eq!(nav["monthlyQuota"], 10);
}

#[tokio::test]
async fn requests_without_token_are_rejected() {
    let app = app();
    let (status, body) = app.send(Method::GET, "/api/clients", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "invalid_token");

    let (status, _) = app.send(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn free_plan_stops_at_ten_appointments_per_month() {
    let app = app();
    let token = app.register("ana@salao.com").await;
    let (client_id, service_id) = app.seed_client_and_service(&token).await;

    for day in 1..=10 {
        let (status, body) = app
            .send(
                Method::POST,
                "/api/appointments",
                Some(&token),
                Some(json!({
                    "clientId": client_id,
                    "serviceId": service_id,
                    "date": this_month_day(day),
                    "time": "09:00"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["clientName"], "Maria Oliveira");
        assert_eq!(body["value"], 50.0);
    }

    let (status, body) = app
        .send(
            Method::POST,
            "/api/appointments",
            Some(&token),
            Some(json!({
                "clientId": client_id,
                "serviceId": service_id,
                "date": this_month_day(11),
                "time": "10:00"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], "monthly_quota_reached");
    assert_eq!(body["details"]["limit"], 10);

    let (_, list) = app.send(Method::GET, "/api/appointments", Some(&token), None).await;
    assert_eq!(list.as_array().unwrap().len(), 10);

    let (_, dashboard) = app.send(Method::GET, "/api/dashboard", Some(&token), None).await;
    assert_eq!(dashboard["quota"]["used"], 10);
    assert_eq!(dashboard["quota"]["reached"], true);
}

#[tokio::test]
async fn validation_errors_are_localized() {
    let app = app();
    let token = app.register("ana@salao.com").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/appointments")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .body(Body::from(json!({ "date": "2024-05-10", "time": "09:00" }).to_string()))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "validation_error");
    assert_eq!(body["error"], "One or more fields are invalid.");
    assert_eq!(body["details"].as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn status_machine_over_http() {
    let app = app();
    let token = app.register("ana@salao.com").await;
    let (client_id, service_id) = app.seed_client_and_service(&token).await;

    let (_, created) = app
        .send(
            Method::POST,
            "/api/appointments",
            Some(&token),
            Some(json!({
                "clientId": client_id,
                "serviceId": service_id,
                "date": this_month_day(2),
                "time": "14:30"
            })),
        )
        .await;
    let id = created["id"].as_str().unwrap();
    assert_eq!(created["status"], "scheduled");

    let (status, done) = app
        .send(
            Method::PATCH,
            &format!("/api/appointments/{id}/status"),
            Some(&token),
            Some(json!({ "status": "concluido" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "completed");

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/api/appointments/{id}/status"),
            Some(&token),
            Some(json!({ "status": "canceled" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "invalid_status_transition");

    let (status, _) = app
        .send(Method::POST, &format!("/api/appointments/{id}/advance"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn premium_features_are_gated_until_upgrade() {
    let app = app();
    let token = app.register("ana@salao.com").await;

    let (status, body) = app
        .send(Method::GET, "/api/finance/overview", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "plan_upgrade_required");
    assert_eq!(body["details"]["requiredPlan"], "premium");

    let (status, body) = app
        .send(Method::POST, "/api/plans/select", Some(&token), Some(json!({ "plan": "premium" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "checkout");
    assert_eq!(body["checkoutUrl"], "https://pagamento.test/checkout/premium");

    let (status, account) = app
        .send(Method::POST, "/api/plans/confirm?payment=success&plano=premium", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(account["plan"], "premium");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/finance/transactions",
            Some(&token),
            Some(json!({
                "type": "income",
                "category": "service",
                "amount": 200.0,
                "date": this_month_day(3)
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, overview) = app
        .send(Method::GET, "/api/finance/overview", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["income"], 200.0);
    assert_eq!(overview["chart"].as_array().unwrap().len(), 6);

    let (status, report) = app
        .send(Method::GET, "/api/reports?period=semana", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["period"], "week");
    assert_eq!(report["statusBreakdown"].as_array().unwrap().len(), 4);

    let (status, body) = app
        .send(Method::GET, "/api/finance/overview?month=2024-13", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_month");
}

#[tokio::test]
async fn admin_overview_requires_admin_role() {
    let app = app();
    let user_token = app.register("ana@salao.com").await;

    let (status, body) = app
        .send(Method::GET, "/api/admin/overview", Some(&user_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "admin_required");

    app.accounts
        .insert(Account {
            id: Uuid::new_v4(),
            email: "admin@proserv.com".into(),
            full_name: Some("Admin".into()),
            password_hash: bcrypt::hash("senha123", 4).unwrap(),
            role: Role::Admin,
            plan: Plan::Premium,
            appointments_this_month: None,
            reference_month: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .unwrap();
    let (_, login) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "admin@proserv.com", "password": "senha123" })),
        )
        .await;
    let admin_token = login["token"].as_str().unwrap();

    let (status, overview) = app
        .send(Method::GET, "/api/admin/overview", Some(admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["totalUsers"], 2);
    assert_eq!(overview["usersByPlan"][0]["count"], 1);
}
