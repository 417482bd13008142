#![allow(clippy::unwrap_used, missing_docs)]

use std::collections::VecDeque;
use std::future::{Future, ready};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use larder_api::models::{CouponFilter, CustomerFilter, CustomerStatus, IssueCreditInput, PageArgs};
use larder_api::{
    ClientBuilder, CouponErrorCode, CreditErrorCode, HttpClient, HttpClientError, HttpRequest,
    HttpResponse, LarderClient, LarderError, TenantContext,
};
use serde_json::{Value, json};

#[derive(Default)]
struct Script {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpClientError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

/// Replays canned responses in order and records every request.
#[derive(Clone, Default)]
struct ScriptedHttp(Arc<Script>);

impl ScriptedHttp {
    fn respond(&self, status: u16, body: Value) -> &Self {
        self.0.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: Bytes::from(body.to_string()),
        }));
        self
    }

    fn fail(&self, err: HttpClientError) -> &Self {
        self.0.responses.lock().unwrap().push_back(Err(err));
        self
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.0.requests.lock().unwrap().clone()
    }

    fn bodies(&self) -> Vec<Value> {
        self.requests()
            .iter()
            .map(|r| serde_json::from_slice(r.body.as_ref().unwrap()).unwrap())
            .collect()
    }
}

impl HttpClient for ScriptedHttp {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpClientError>> + Send {
        self.0.requests.lock().unwrap().push(request);
        let next = self
            .0
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(HttpClientError::Connection("script exhausted".to_owned())));
        ready(next)
    }
}

fn client(http: &ScriptedHttp) -> LarderClient<ScriptedHttp> {
    ClientBuilder::new("sk_test_123")
        .base_url("https://api.test/")
        .retry_delay(Duration::from_millis(1))
        .build_with(http.clone())
}

fn tenant() -> TenantContext {
    TenantContext::new("biz_1")
}

fn customer_page(ids: &[&str], end_cursor: Option<&str>, has_next: bool) -> Value {
    let edges: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "cursor": format!("cur_{id}"),
                "node": {
                    "id": id,
                    "firstName": "Ada",
                    "lastName": "Lovelace",
                    "email": format!("{id}@example.com"),
                    "status": "ACTIVE",
                    "creditBalanceCents": 0,
                    "createdAt": "2025-01-01T00:00:00Z"
                }
            })
        })
        .collect();
    json!({
        "data": {
            "result": {
                "edges": edges,
                "pageInfo": { "hasNextPage": has_next, "endCursor": end_cursor }
            }
        }
    })
}

#[tokio::test]
async fn list_posts_graphql_request_with_bearer_token() {
    let http = ScriptedHttp::default();
    http.respond(200, customer_page(&["c1", "c2"], Some("end1"), true));

    let filter = CustomerFilter {
        status: Some(CustomerStatus::Active),
        ..CustomerFilter::default()
    };
    let page = client(&http)
        .customers()
        .list(&tenant(), &filter, &PageArgs::first(20))
        .await
        .unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page.end_cursor(), Some("end1"));

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].url, "https://api.test/graphql");
    assert_eq!(
        requests[0].headers.get(http::header::AUTHORIZATION).unwrap(),
        "Bearer sk_test_123"
    );

    let body = &http.bodies()[0];
    assert_eq!(body["operationName"], "ListCustomers");
    assert!(body["query"].as_str().unwrap().contains("result: customers("));
    assert_eq!(body["variables"]["businessId"], "biz_1");
    assert_eq!(body["variables"]["first"], 20);
    assert_eq!(body["variables"]["filter"]["status"], "ACTIVE");
    assert!(body["variables"].get("after").is_none());
}

#[tokio::test]
async fn tenant_location_is_forwarded() {
    let http = ScriptedHttp::default();
    http.respond(200, customer_page(&[], None, false));

    let scoped = tenant().with_location("loc_9");
    client(&http)
        .customers()
        .list(&scoped, &CustomerFilter::default(), &PageArgs::after(5, Some("abc")))
        .await
        .unwrap();

    let body = &http.bodies()[0];
    assert_eq!(body["variables"]["locationId"], "loc_9");
    assert_eq!(body["variables"]["after"], "abc");
    assert_eq!(body["variables"]["first"], 5);
}

#[tokio::test]
async fn graphql_error_code_parses_into_domain_enum() {
    let http = ScriptedHttp::default();
    http.respond(
        200,
        json!({
            "data": null,
            "errors": [{ "message": "coupon archived", "extensions": { "code": "COUPON_ARCHIVED" } }]
        }),
    );

    let err = client(&http)
        .coupons()
        .archive(&tenant(), "cp_1")
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some("COUPON_ARCHIVED"));
    assert_eq!(
        err.domain_code::<CouponErrorCode>(),
        Some(CouponErrorCode::CouponArchived)
    );
    assert_eq!(err.domain_code::<CreditErrorCode>(), None);
}

#[tokio::test]
async fn error_envelope_on_non_success_status_is_preferred() {
    let http = ScriptedHttp::default();
    http.respond(
        400,
        json!({
            "errors": [{ "message": "too much", "extensions": { "code": "CREDIT_LIMIT_EXCEEDED" } }]
        }),
    );

    let input = IssueCreditInput {
        amount_cents: 1_000_000,
        reason: None,
    };
    let err = client(&http)
        .customers()
        .issue_credit(&tenant(), "cus_1", &input)
        .await
        .unwrap_err();

    assert!(matches!(err, LarderError::GraphQl(_)));
    assert_eq!(
        err.domain_code::<CreditErrorCode>(),
        Some(CreditErrorCode::CreditLimitExceeded)
    );
}

#[tokio::test]
async fn queries_retry_transient_failures() {
    let http = ScriptedHttp::default();
    http.respond(503, json!({ "message": "unavailable" }))
        .fail(HttpClientError::Timeout)
        .respond(200, customer_page(&["c1"], None, false));

    let page = client(&http)
        .customers()
        .list(&tenant(), &CustomerFilter::default(), &PageArgs::first(20))
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(http.requests().len(), 3);
}

#[tokio::test]
async fn queries_do_not_retry_domain_errors() {
    let http = ScriptedHttp::default();
    http.respond(
        200,
        json!({ "errors": [{ "message": "nope", "extensions": { "code": "BUSINESS_NOT_FOUND" } }] }),
    );

    let err = client(&http)
        .coupons()
        .list(&tenant(), &CouponFilter::default(), &PageArgs::first(20))
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some("BUSINESS_NOT_FOUND"));
    assert_eq!(http.requests().len(), 1);
}

#[tokio::test]
async fn mutations_are_never_retried() {
    let http = ScriptedHttp::default();
    http.respond(503, json!({ "message": "unavailable" }))
        .respond(200, json!({ "data": { "result": { "entity": { "id": "cp_1", "archived": true } } } }));

    let err = client(&http)
        .coupons()
        .archive(&tenant(), "cp_1")
        .await
        .unwrap_err();

    assert!(matches!(err, LarderError::Http { status: 503, .. }));
    assert_eq!(http.requests().len(), 1);
}

#[tokio::test]
async fn mutation_unwraps_entity_payload() {
    let http = ScriptedHttp::default();
    http.respond(
        200,
        json!({ "data": { "result": { "entity": { "id": "cp_1", "archived": true } } } }),
    );

    let archived = client(&http)
        .coupons()
        .archive(&tenant(), "cp_1")
        .await
        .unwrap();

    assert_eq!(archived.id, "cp_1");
    assert!(archived.archived);
    let body = &http.bodies()[0];
    assert_eq!(body["operationName"], "ArchiveCoupon");
    assert_eq!(body["variables"]["couponId"], "cp_1");
    assert_eq!(body["variables"]["businessId"], "biz_1");
}

#[tokio::test]
async fn stream_follows_end_cursors_to_the_last_page() {
    let http = ScriptedHttp::default();
    http.respond(200, customer_page(&["c1", "c2"], Some("p1"), true))
        .respond(200, customer_page(&["c3"], Some("p2"), false));

    let all = client(&http)
        .customers()
        .stream(&tenant(), CustomerFilter::default())
        .collect()
        .await
        .unwrap();

    let ids: Vec<_> = all.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["c1", "c2", "c3"]);

    let bodies = http.bodies();
    assert_eq!(bodies.len(), 2);
    assert!(bodies[0]["variables"].get("after").is_none());
    assert_eq!(bodies[1]["variables"]["after"], "p1");
}

#[tokio::test]
async fn stream_stops_on_repeated_end_cursor() {
    let http = ScriptedHttp::default();
    http.respond(200, customer_page(&["c1"], Some("same"), true))
        .respond(200, customer_page(&["c2"], Some("same"), true))
        .respond(200, customer_page(&["c3"], Some("same"), true));

    let all = client(&http)
        .customers()
        .stream(&tenant(), CustomerFilter::default())
        .collect()
        .await
        .unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(http.requests().len(), 2);
}

#[tokio::test]
async fn missing_data_is_an_error() {
    let http = ScriptedHttp::default();
    http.respond(200, json!({ "data": null }));

    let err = client(&http).business().get(&tenant()).await.unwrap_err();
    assert!(matches!(err, LarderError::MissingData));
}
