// tests/metric_requests_test.rs
// Custom metric creation, catalog requests and their review

mod common;

use async_graphql::{Request, Variables};
use serde_json::{Value, json};

use common::{TEST_PASSWORD, TestContext, register_company, setup, viewer};
use ecotrack::auth::{CurrentUser, Role};
use ecotrack::graphql::{Viewer, build_schema};
use ecotrack::metrics::{CreateMetricInput, MetricRequestStatus};

async fn super_admin(ctx: &TestContext) -> CurrentUser {
    let admin = ctx
        .state
        .auth
        .create_super_admin("Root", "root@ecotrack.io", TEST_PASSWORD)
        .await
        .unwrap();

    CurrentUser {
        id: admin.id,
        email: admin.email,
        role: Role::SuperAdmin,
        company_id: admin.company_id,
    }
}

/// Run an operation through the schema as `user`
async fn execute(ctx: &TestContext, user: &CurrentUser, query: &str, variables: Value) -> Value {
    let schema = build_schema(ctx.state.clone());
    let request = Request::new(query)
        .variables(Variables::from_json(variables))
        .data(Viewer(Some(user.clone())));

    serde_json::to_value(schema.execute(request).await).unwrap()
}

fn error_code(body: &Value) -> &str {
    body["errors"][0]["extensions"]["code"].as_str().unwrap_or_default()
}

fn metric_input(emission_factor: f64, company_id: Option<String>) -> CreateMetricInput {
    CreateMetricInput {
        name: "Refrigerante R-410A".to_string(),
        unit: "kg".to_string(),
        description: None,
        icon: "Snowflake".to_string(),
        color: "#03A9F4".to_string(),
        emission_factor,
        company_id,
    }
}

#[tokio::test]
async fn test_requests_are_listed_per_tenant() {
    let ctx = setup().await;
    let acme = register_company(&ctx.state, "Acme", "boss@acme.io").await;
    let globex = register_company(&ctx.state, "Globex", "boss@globex.io").await;
    let admin = super_admin(&ctx).await;

    let request = ctx
        .state
        .metrics
        .request_metric(&acme.user.company_id, "  Consumo de papel  ")
        .await
        .unwrap();
    assert_eq!(request.status, MetricRequestStatus::Pending);
    assert_eq!(request.description, "Consumo de papel");
    assert!(request.admin_note.is_none());

    ctx.state
        .metrics
        .request_metric(&globex.user.company_id, "Viajes en avión")
        .await
        .unwrap();

    let err = ctx
        .state
        .metrics
        .request_metric(&acme.user.company_id, "   ")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "BAD_USER_INPUT");

    let acme_view = ctx.state.metrics.list_requests(&viewer(&ctx.state, &acme)).await.unwrap();
    assert_eq!(acme_view.len(), 1);
    assert_eq!(acme_view[0].id, request.id);

    let admin_view = ctx.state.metrics.list_requests(&admin).await.unwrap();
    assert_eq!(admin_view.len(), 2);
}

#[tokio::test]
async fn test_review_sets_status_and_note() {
    let ctx = setup().await;
    let acme = register_company(&ctx.state, "Acme", "boss@acme.io").await;

    let request = ctx
        .state
        .metrics
        .request_metric(&acme.user.company_id, "Consumo de papel")
        .await
        .unwrap();

    let reviewed = ctx
        .state
        .metrics
        .review_request(&request.id, MetricRequestStatus::Approved, Some(" Added to catalog ".to_string()))
        .await
        .unwrap();
    assert_eq!(reviewed.status, MetricRequestStatus::Approved);
    assert_eq!(reviewed.admin_note.as_deref(), Some("Added to catalog"));

    let err = ctx
        .state
        .metrics
        .review_request(&request.id, MetricRequestStatus::Pending, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "BAD_USER_INPUT");

    let err = ctx
        .state
        .metrics
        .review_request("no-such-request", MetricRequestStatus::Rejected, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_request_roles_through_schema() {
    let ctx = setup().await;
    let acme = register_company(&ctx.state, "Acme", "boss@acme.io").await;
    let manager = viewer(&ctx.state, &acme);
    let admin = super_admin(&ctx).await;

    let body = execute(
        &ctx,
        &manager,
        "mutation { requestMetric(description: \"Consumo de papel\") { id status company { name } } }",
        json!({}),
    )
    .await;
    assert!(body["errors"].is_null(), "unexpected errors: {}", body);
    assert_eq!(body["data"]["requestMetric"]["status"], "PENDING");
    assert_eq!(body["data"]["requestMetric"]["company"]["name"], "Acme");
    let request_id = body["data"]["requestMetric"]["id"].as_str().unwrap().to_string();

    // Super admins review requests but have no tenant to request for
    let body = execute(
        &ctx,
        &admin,
        "mutation { requestMetric(description: \"Otra\") { id } }",
        json!({}),
    )
    .await;
    assert_eq!(error_code(&body), "FORBIDDEN");

    let review = r#"
        mutation($id: String!, $status: MetricRequestStatus!) {
            reviewMetricRequest(id: $id, status: $status, adminNote: "ok") { status adminNote }
        }
    "#;
    let variables = json!({"id": request_id, "status": "REJECTED"});

    let body = execute(&ctx, &manager, review, variables.clone()).await;
    assert_eq!(error_code(&body), "FORBIDDEN");

    let body = execute(&ctx, &admin, review, variables).await;
    assert!(body["errors"].is_null(), "unexpected errors: {}", body);
    assert_eq!(body["data"]["reviewMetricRequest"]["status"], "REJECTED");
    assert_eq!(body["data"]["reviewMetricRequest"]["adminNote"], "ok");

    let body = execute(&ctx, &manager, "{ metricRequests { id status } }", json!({})).await;
    assert_eq!(body["data"]["metricRequests"][0]["status"], "REJECTED");
}

#[tokio::test]
async fn test_goals_are_managed_by_company_managers_only() {
    let ctx = setup().await;
    let admin = super_admin(&ctx).await;
    let energy = common::catalog_metric(&ctx.state, &admin.company_id, "Energía").await;

    let body = execute(
        &ctx,
        &admin,
        "mutation($data: UpsertGoalInput!) { upsertGoal(data: $data) { id } }",
        json!({"data": {"metricId": energy.id, "target": 100.0, "year": 2025}}),
    )
    .await;
    assert_eq!(error_code(&body), "FORBIDDEN");

    let body = execute(&ctx, &admin, "mutation { deleteGoal(id: \"any\") }", json!({})).await;
    assert_eq!(error_code(&body), "FORBIDDEN");
}

#[tokio::test]
async fn test_create_metric_rejects_bad_emission_factor() {
    let ctx = setup().await;
    let acme = register_company(&ctx.state, "Acme", "boss@acme.io").await;
    let manager = viewer(&ctx.state, &acme);

    for factor in [-0.5, f64::NAN, f64::INFINITY] {
        let err = ctx
            .state
            .metrics
            .create(metric_input(factor, None), &manager)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "BAD_USER_INPUT", "factor {} accepted", factor);
    }

    let zero = ctx.state.metrics.create(metric_input(0.0, None), &manager).await.unwrap();
    assert_eq!(zero.emission_factor, 0.0);

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM metrics WHERE name = 'Refrigerante R-410A'")
        .fetch_one(&ctx.pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}

#[tokio::test]
async fn test_super_admin_creates_global_or_company_metrics() {
    let ctx = setup().await;
    let acme = register_company(&ctx.state, "Acme", "boss@acme.io").await;
    let admin = super_admin(&ctx).await;

    let global = ctx.state.metrics.create(metric_input(1.5, None), &admin).await.unwrap();
    assert!(global.company_id.is_none());
    assert!(
        ctx.state
            .metrics
            .find_all(&acme.user.company_id)
            .await
            .unwrap()
            .iter()
            .any(|m| m.id == global.id)
    );

    let err = ctx
        .state
        .metrics
        .create(metric_input(1.5, Some("no-such-company".to_string())), &admin)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}
