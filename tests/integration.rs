//! Integration tests for the payssion-rs library.
//!
//! These tests run the client against a local axum server standing in for the
//! gateway, plus a counting transport for the pre-flight checks.

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Form, Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use payssion_rs::{
    dispatch::CLIENT_USER_AGENT_HEADER,
    signer::sign,
    transport::{FormRequest, RawResponse, TransportFailure},
    CreateParams, DetailsParams, Operation, PayssionClient, PayssionConfig, PayssionError,
    RefundParams, RequestParams, Transport,
};

const API_KEY: &str = "test_api_key";
const SECRET_KEY: &str = "s3cret";

type Captured = Arc<Mutex<Vec<(HeaderMap, HashMap<String, String>)>>>;

async fn spawn_gateway(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/v1/", addr)
}

/// Verifies `api_sig` the way the gateway does and answers accordingly.
fn verify(operation: Operation, form: &HashMap<String, String>) -> Value {
    let params: RequestParams = form
        .iter()
        .filter(|(k, _)| k.as_str() != "api_sig")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let expected = sign(&params, operation.sig_keys(), SECRET_KEY);

    let signed = form.get("api_sig") == Some(&expected);
    if signed && form.get("api_key").map(String::as_str) == Some(API_KEY) {
        json!({
            "result_code": 200,
            "transaction_id": "T123",
            "order_id": form.get("order_id"),
            "redirect_url": "https://www.payssion.com/pay/T123",
        })
    } else {
        json!({"result_code": 402, "description": "invalid api_sig"})
    }
}

fn gateway(captured: Captured) -> Router {
    async fn create(
        State(captured): State<Captured>,
        headers: HeaderMap,
        Form(form): Form<HashMap<String, String>>,
    ) -> Json<Value> {
        let body = verify(Operation::Create, &form);
        captured.lock().unwrap().push((headers, form));
        Json(body)
    }

    async fn details(Form(form): Form<HashMap<String, String>>) -> Json<Value> {
        Json(verify(Operation::Details, &form))
    }

    async fn refund(Form(form): Form<HashMap<String, String>>) -> Json<Value> {
        Json(verify(Operation::Refund, &form))
    }

    Router::new()
        .route("/api/v1/payment/create", post(create))
        .route("/api/v1/payment/details", post(details))
        .route("/api/v1/refunds", post(refund))
        .with_state(captured)
}

fn client_for(base_url: &str) -> PayssionClient {
    let mut client = PayssionClient::new(API_KEY, SECRET_KEY, false).unwrap();
    client.set_url(base_url);
    client
}

#[tokio::test]
async fn test_create_round_trip() {
    let captured = Captured::default();
    let base_url = spawn_gateway(gateway(captured.clone())).await;
    let client = client_for(&base_url);

    let outcome = client
        .create(
            CreateParams::new("alipay_cn", "10.00", "USD", "order_1")
                .with_description("Test payment")
                .with_notify_url("https://your-site.com/notify"),
        )
        .await
        .unwrap();

    assert!(outcome.is_success);
    assert!(client.is_success());
    assert_eq!(outcome.response.result_code, Some(200));
    assert_eq!(outcome.response.transaction_id(), Some("T123"));
    assert_eq!(outcome.response.order_id(), Some("order_1"));

    let captured = captured.lock().unwrap();
    let (headers, form) = &captured[0];
    assert_eq!(
        headers.get("content-type").unwrap(),
        "application/x-www-form-urlencoded"
    );
    assert!(headers
        .get("user-agent")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("Payssion/rust/"));
    let ua: Value =
        serde_json::from_str(headers.get(CLIENT_USER_AGENT_HEADER).unwrap().to_str().unwrap())
            .unwrap();
    assert_eq!(ua["publisher"], "payssion");

    assert_eq!(form.get("description").unwrap(), "Test payment");
    assert_eq!(form.get("notify_url").unwrap(), "https://your-site.com/notify");
    assert!(!form.contains_key("secret_key"));
}

#[tokio::test]
async fn test_details_and_refund_round_trip() {
    let base_url = spawn_gateway(gateway(Captured::default())).await;
    let client = client_for(&base_url);

    let details = client
        .get_details(DetailsParams::by_transaction("T123").with_order_id("order_1"))
        .await
        .unwrap();
    assert!(details.is_success);

    let refund = client
        .refund(RefundParams::new("T123", "5.00", "USD"))
        .await
        .unwrap();
    assert!(refund.is_success);
}

#[tokio::test]
async fn test_wrong_secret_is_business_failure() {
    let base_url = spawn_gateway(gateway(Captured::default())).await;
    let mut config = PayssionConfig::new(API_KEY, "wrong", false).unwrap();
    config.base_url = base_url;
    let client = PayssionClient::from_config(config).unwrap();

    let outcome = client
        .refund(RefundParams::new("T123", "5.00", "USD"))
        .await
        .unwrap();

    assert!(!outcome.is_success);
    assert_eq!(outcome.response.result_code, Some(402));
    assert_eq!(outcome.response.description(), Some("invalid api_sig"));
    assert!(!client.is_success());
}

#[tokio::test]
async fn test_missing_result_code_is_not_success() {
    let app = Router::new().route(
        "/api/v1/payment/details",
        post(|| async { Json(json!({"description": "no code"})) }),
    );
    let client = client_for(&spawn_gateway(app).await);

    let outcome = client
        .get_details(DetailsParams::by_order("order_1"))
        .await
        .unwrap();

    assert_eq!(outcome.response.result_code, None);
    assert!(!outcome.is_success);
    assert!(!client.is_success());
}

#[tokio::test]
async fn test_service_unavailable_is_http_status_error() {
    let app = Router::new().route(
        "/api/v1/payment/create",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
    );
    let client = client_for(&spawn_gateway(app).await);

    let err = client
        .create(CreateParams::new("alipay_cn", "10.00", "USD", "order_1"))
        .await
        .unwrap_err();

    assert!(matches!(err, PayssionError::HttpStatus { status: 503, .. }));
    assert!(err.to_string().contains("503 Service Unavailable"));
    assert!(!client.is_success());
}

#[tokio::test]
async fn test_business_error_body_with_known_status_is_http_error() {
    let app = Router::new().route(
        "/api/v1/refunds",
        post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"result_code": 401}))) }),
    );
    let client = client_for(&spawn_gateway(app).await);

    let err = client
        .refund(RefundParams::new("T123", "5.00", "USD"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Response Http Error - 401 Unauthorized");
}

#[tokio::test]
async fn test_unmapped_status_is_transport_error() {
    // no route registered, so axum answers 404
    let base_url = spawn_gateway(Router::new()).await;
    let client = client_for(&base_url);

    let err = client
        .refund(RefundParams::new("T123", "5.00", "USD"))
        .await
        .unwrap_err();

    assert!(matches!(err, PayssionError::Transport { .. }));
    let message = err.to_string();
    assert!(message.contains(&base_url));
    assert!(message.contains("404"));
}

#[tokio::test]
async fn test_non_json_body_is_json_error() {
    let app = Router::new().route("/api/v1/refunds", post(|| async { "<html>ok</html>" }));
    let client = client_for(&spawn_gateway(app).await);

    let err = client
        .refund(RefundParams::new("T123", "5.00", "USD"))
        .await
        .unwrap_err();

    assert!(matches!(err, PayssionError::Json(_)));
}

#[tokio::test]
async fn test_unreachable_host_names_base_url() {
    let base_url = "http://127.0.0.1:1/api/v1/";
    let client = client_for(base_url);

    let err = client
        .create(CreateParams::new("alipay_cn", "10.00", "USD", "order_1"))
        .await
        .unwrap_err();

    assert!(matches!(err, PayssionError::Transport { .. }));
    assert!(err.to_string().contains(base_url));
}

#[tokio::test]
async fn test_concurrent_calls_keep_their_own_outcome() {
    let app = Router::new()
        .route(
            "/api/v1/payment/create",
            post(|| async { Json(json!({"result_code": 200})) }),
        )
        .route(
            "/api/v1/refunds",
            post(|| async { Json(json!({"result_code": 400})) }),
        );
    let client = client_for(&spawn_gateway(app).await);

    let (created, refunded) = tokio::join!(
        client.create(CreateParams::new("alipay_cn", "10.00", "USD", "order_1")),
        client.refund(RefundParams::new("T123", "5.00", "USD")),
    );

    assert!(created.unwrap().is_success);
    assert!(!refunded.unwrap().is_success);
}

/// Counts invocations and always answers `{"result_code": 200}`.
#[derive(Default)]
struct CountingTransport {
    calls: AtomicUsize,
}

#[async_trait]
impl Transport for CountingTransport {
    async fn post_form(&self, _request: FormRequest) -> Result<RawResponse, TransportFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RawResponse {
            status: 200,
            body: r#"{"result_code":200}"#.to_string(),
        })
    }
}

/// Forwards to a shared [`CountingTransport`] so the test keeps a handle on it.
struct SharedTransport(Arc<CountingTransport>);

#[async_trait]
impl Transport for SharedTransport {
    async fn post_form(&self, request: FormRequest) -> Result<RawResponse, TransportFailure> {
        self.0.post_form(request).await
    }
}

#[tokio::test]
async fn test_invalid_calls_never_reach_transport() {
    let transport = Arc::new(CountingTransport::default());
    let config = PayssionConfig::new(API_KEY, SECRET_KEY, true).unwrap();
    let client = PayssionClient::with_transport(config, SharedTransport(transport.clone()));

    for result in [
        client.create(RequestParams::new()).await,
        client.get_details(DetailsParams::default()).await,
        client.refund(RequestParams::new()).await,
    ] {
        let err = result.unwrap_err();
        assert!(matches!(err, PayssionError::Validation(_)));
        assert_eq!(err.to_string(), "params is null");
    }

    let err = client
        .call(Operation::Create, "Patch", RequestParams::new().with("pm_id", "x"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Not allowed request method type");
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    assert!(!client.is_success());

    client
        .refund(RefundParams::new("T123", "5.00", "USD"))
        .await
        .unwrap();
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    assert!(client.is_success());
}

#[test]
fn test_missing_credentials() {
    let err = PayssionClient::new("", SECRET_KEY, true).unwrap_err();
    assert!(matches!(err, PayssionError::Config(_)));
    assert_eq!(err.to_string(), "api_key is not set!");

    let err = PayssionClient::new(API_KEY, "", true).unwrap_err();
    assert_eq!(err.to_string(), "secret_key is not set!");
}

#[test]
fn test_signature_properties() {
    let base = RequestParams::new()
        .with("pm_id", "alipay_cn")
        .with("amount", "10.00")
        .with("currency", "USD")
        .with("order_id", "o1");
    let bumped = base.clone().with("amount", "10.01");
    let keys = &["pm_id", "amount", "currency", "order_id"];

    let sig = sign(&base, keys, SECRET_KEY);
    assert_eq!(sig.len(), 32);
    assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_eq!(sig, sign(&base, keys, SECRET_KEY));
    assert_ne!(sig, sign(&bumped, keys, SECRET_KEY));

    let missing = RequestParams::new().with("pm_id", "x");
    let empty = RequestParams::new().with("pm_id", "x").with("amount", "");
    assert_eq!(
        sign(&missing, &["pm_id", "amount"], SECRET_KEY),
        sign(&empty, &["pm_id", "amount"], SECRET_KEY)
    );
}
