// tests/graphql_http_test.rs
// End-to-end requests through the axum router

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{TestContext, setup};
use ecotrack::api::create_router;

async fn send(ctx: &TestContext, request: Request<Body>) -> (StatusCode, Value) {
    let app = create_router(ctx.state.clone()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn graphql(ctx: &TestContext, token: Option<&str>, query: &str, variables: Value) -> Value {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = builder
        .body(Body::from(json!({"query": query, "variables": variables}).to_string()))
        .unwrap();

    let (status, body) = send(ctx, request).await;
    assert_eq!(status, StatusCode::OK);
    body
}

fn error_code(body: &Value) -> &str {
    body["errors"][0]["extensions"]["code"].as_str().unwrap_or_default()
}

const REGISTER_COMPANY: &str = r#"
    mutation Register($data: RegisterCompanyInput!) {
        registerCompany(data: $data) {
            accessToken
            user { id role status companyId }
        }
    }
"#;

async fn register(ctx: &TestContext, email: &str) -> String {
    let body = graphql(
        ctx,
        None,
        REGISTER_COMPANY,
        json!({
            "data": {
                "company": {"name": "Acme", "sector": "Retail", "employeesCount": 5},
                "admin": {"name": "Ana", "email": email, "password": "correct horse battery"}
            }
        }),
    )
    .await;

    assert!(body["errors"].is_null(), "unexpected errors: {}", body);
    assert_eq!(body["data"]["registerCompany"]["user"]["role"], "COMPANY_MANAGER");
    body["data"]["registerCompany"]["accessToken"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_register_then_query_my_company() {
    let ctx = setup().await;
    let token = register(&ctx, "ana@acme.io").await;

    let body = graphql(
        &ctx,
        Some(&token),
        "{ me { email role company { name } } myCompany { name isConfigured employeesCount createdAt } }",
        json!({}),
    )
    .await;

    assert!(body["errors"].is_null(), "unexpected errors: {}", body);
    assert_eq!(body["data"]["me"]["email"], "ana@acme.io");
    assert_eq!(body["data"]["me"]["company"]["name"], "Acme");
    assert_eq!(body["data"]["myCompany"]["isConfigured"], false);
    assert_eq!(body["data"]["myCompany"]["employeesCount"], 5);
    assert!(body["data"]["myCompany"]["createdAt"].is_string());
}

#[tokio::test]
async fn test_anonymous_and_invalid_tokens_are_unauthenticated() {
    let ctx = setup().await;

    let body = graphql(&ctx, None, "{ me { id } }", json!({})).await;
    assert_eq!(error_code(&body), "UNAUTHENTICATED");

    let body = graphql(&ctx, Some("not-a-jwt"), "{ me { id } }", json!({})).await;
    assert_eq!(error_code(&body), "UNAUTHENTICATED");

    // Public list stays reachable without a token
    let body = graphql(&ctx, None, "{ companies { id name } }", json!({})).await;
    assert!(body["errors"].is_null());
}

#[tokio::test]
async fn test_public_company_list_hides_tenant_data() {
    let ctx = setup().await;
    let token = register(&ctx, "ana@acme.io").await;

    let body = graphql(
        &ctx,
        Some(&token),
        r#"mutation($input: CreateMetricInput!) { createMetric(createMetricInput: $input) { id companyId } }"#,
        json!({"input": {
            "name": "Secret Process Gas",
            "unit": "kg",
            "icon": "flask",
            "color": "#333333",
            "emissionFactor": 7.5
        }}),
    )
    .await;
    assert!(body["errors"].is_null(), "unexpected errors: {}", body);
    assert!(body["data"]["createMetric"]["companyId"].is_string());

    let body = graphql(&ctx, None, "{ companies { id name sector } }", json!({})).await;
    assert!(body["errors"].is_null(), "unexpected errors: {}", body);
    assert_eq!(body["data"]["companies"][0]["name"], "Acme");
    assert_eq!(body["data"]["companies"][0]["sector"], "Retail");

    for query in [
        "{ companies { name companyMetrics { metric { name emissionFactor } } } }",
        "{ companies { name employeesCount } }",
    ] {
        let body = graphql(&ctx, None, query, json!({})).await;
        assert!(!body["errors"].is_null(), "{} should be rejected", query);
        assert!(!body.to_string().contains("Secret Process Gas"));
    }

    // Own company still exposes its tracked metrics
    let body = graphql(
        &ctx,
        Some(&token),
        "{ myCompany { companyMetrics { metric { name } } } }",
        json!({}),
    )
    .await;
    assert!(body["errors"].is_null(), "unexpected errors: {}", body);
    assert_eq!(
        body["data"]["myCompany"]["companyMetrics"][0]["metric"]["name"],
        "Secret Process Gas"
    );
}

#[tokio::test]
async fn test_onboarding_and_impact_over_http() {
    let ctx = setup().await;
    let token = register(&ctx, "ana@acme.io").await;

    let body = graphql(&ctx, Some(&token), "{ metrics { id name emissionFactor } }", json!({})).await;
    let metrics = body["data"]["metrics"].as_array().unwrap();
    let energy = metrics.iter().find(|m| m["name"] == "Energía").unwrap();
    let energy_id = energy["id"].as_str().unwrap();

    let body = graphql(
        &ctx,
        Some(&token),
        "mutation($ids: [String!]!) { completeOnboarding(metricIds: $ids) { isConfigured companyMetrics { isActive metric { name } } } }",
        json!({"ids": [energy_id]}),
    )
    .await;
    assert!(body["errors"].is_null(), "unexpected errors: {}", body);
    assert_eq!(body["data"]["completeOnboarding"]["isConfigured"], true);
    assert_eq!(
        body["data"]["completeOnboarding"]["companyMetrics"][0]["metric"]["name"],
        "Energía"
    );

    let create = r#"
        mutation($data: CreateImpactRecordInput!) {
            createImpactRecord(data: $data) { id totalImpact values { amount co2Equivalent metric { unit } } }
        }
    "#;
    let input = json!({"data": {"month": 5, "year": 2025, "values": [{"metricId": energy_id, "amount": 200.0}]}});

    let body = graphql(&ctx, Some(&token), create, input.clone()).await;
    assert!(body["errors"].is_null(), "unexpected errors: {}", body);
    assert_eq!(body["data"]["createImpactRecord"]["totalImpact"], 100.0);
    assert_eq!(body["data"]["createImpactRecord"]["values"][0]["metric"]["unit"], "kWh");

    let body = graphql(&ctx, Some(&token), create, input).await;
    assert_eq!(error_code(&body), "CONFLICT");
    assert_eq!(
        body["errors"][0]["message"],
        "An impact record already exists for period 5/2025."
    );

    let body = graphql(
        &ctx,
        Some(&token),
        "{ dashboardSummary { recordCount totalImpact impactScore latestPeriod { month year } } }",
        json!({}),
    )
    .await;
    assert_eq!(body["data"]["dashboardSummary"]["recordCount"], 1);
    assert_eq!(body["data"]["dashboardSummary"]["impactScore"], 0.0);
    assert_eq!(body["data"]["dashboardSummary"]["latestPeriod"]["month"], 5);
}

#[tokio::test]
async fn test_role_guard_on_user_listing() {
    let ctx = setup().await;
    let token = register(&ctx, "ana@acme.io").await;

    let body = graphql(&ctx, Some(&token), "{ users { id } }", json!({})).await;
    assert_eq!(error_code(&body), "FORBIDDEN");

    let body = graphql(&ctx, Some(&token), "{ pendingUsers { id } }", json!({})).await;
    assert!(body["errors"].is_null());
}

#[tokio::test]
async fn test_ai_insight_over_http() {
    let ctx = setup().await;
    let token = register(&ctx, "ana@acme.io").await;
    ctx.llm.reply("Vas muy bien.");

    let query = r#"
        query($history: [ChatMessageInput!]!, $context: String!) {
            getAiInsight(history: $history, context: $context)
        }
    "#;
    let variables = json!({
        "history": [{"role": "user", "content": "¿Cómo voy?"}],
        "context": "Energía: 100 kWh"
    });

    let body = graphql(&ctx, Some(&token), query, variables.clone()).await;
    assert_eq!(body["data"]["getAiInsight"], "Vas muy bien.");

    let body = graphql(&ctx, None, query, variables).await;
    assert_eq!(error_code(&body), "UNAUTHENTICATED");
    assert_eq!(ctx.llm.calls(), 1);
}

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = setup().await;

    for uri in ["/health", "/ready", "/live"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(&ctx, request).await;
        assert_eq!(status, StatusCode::OK, "{} failed: {}", uri, body);
    }

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (_, body) = send(&ctx, request).await;
    assert_eq!(body["db"], "ok");
    assert_eq!(body["ai"], "enabled");
}
