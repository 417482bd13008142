#![allow(clippy::unwrap_used, missing_docs)]

mod common;

use common::{MockHttp, client, customer_page, tenant};
use larder::api::HttpClientError;
use larder::api::models::{CustomerFilter, CustomerStatus};
use larder::session::AdminSession;

fn ids<N>(page: &larder::api::models::Connection<N>, id: impl Fn(&N) -> &str) -> Vec<String> {
    page.nodes().map(|n| id(n).to_owned()).collect()
}

#[tokio::test]
async fn next_and_previous_use_stored_cursors() {
    let http = MockHttp::default();
    http.respond(200, customer_page(&["c1", "c2"], Some("A"), true))
        .respond(200, customer_page(&["c3", "c4"], Some("B"), true))
        .respond(200, customer_page(&["c1", "c2"], Some("A"), true))
        .respond(200, customer_page(&["c3", "c4"], Some("B"), true));

    let session = AdminSession::new(client(&http), tenant());
    let mut pager = session.customers(CustomerFilter::default());

    let first = pager.current().await.unwrap();
    assert_eq!(ids(&first, |c| c.id.as_str()), ["c1", "c2"]);
    assert!(!pager.has_previous());
    assert!(pager.has_next());

    let second = pager.next_page().await.unwrap().unwrap();
    assert_eq!(ids(&second, |c| c.id.as_str()), ["c3", "c4"]);
    assert_eq!(pager.page_number(), 2);

    assert!(pager.previous_page().await.unwrap().is_some());
    assert!(pager.previous_page().await.unwrap().is_none());

    assert!(pager.next_page().await.unwrap().is_some());

    assert_eq!(
        http.afters(),
        [None, Some("A".to_owned()), None, Some("A".to_owned())]
    );
    assert!(http.bodies().iter().all(|b| b["variables"]["first"] == 20));
}

#[tokio::test]
async fn refreshing_the_current_page_sends_one_request() {
    let http = MockHttp::default();
    http.respond(200, customer_page(&["c1"], Some("A"), true))
        .respond(200, customer_page(&["c2"], Some("B"), true))
        .respond(200, customer_page(&["c2", "c3"], Some("C"), false));

    let session = AdminSession::new(client(&http), tenant());
    let mut pager = session.customers(CustomerFilter::default());
    pager.current().await.unwrap();
    pager.next_page().await.unwrap();

    let refreshed = pager.current().await.unwrap();
    assert_eq!(ids(&refreshed, |c| c.id.as_str()), ["c2", "c3"]);
    assert_eq!(pager.page_number(), 2);
    assert!(!pager.has_next());
    assert_eq!(http.request_count(), 3);
    assert_eq!(
        http.afters(),
        [None, Some("A".to_owned()), Some("A".to_owned())]
    );
}

#[tokio::test]
async fn next_page_stops_at_last_page() {
    let http = MockHttp::default();
    http.respond(200, customer_page(&["c1"], Some("A"), false));

    let session = AdminSession::new(client(&http), tenant());
    let mut pager = session.customers(CustomerFilter::default());

    pager.current().await.unwrap();
    assert!(!pager.has_next());
    assert!(pager.next_page().await.unwrap().is_none());
    assert_eq!(http.request_count(), 1);
}

#[tokio::test]
async fn next_page_before_any_fetch_is_none() {
    let http = MockHttp::default();
    let session = AdminSession::new(client(&http), tenant());
    let mut pager = session.customers(CustomerFilter::default());

    assert!(pager.next_page().await.unwrap().is_none());
    assert_eq!(http.request_count(), 0);
}

#[tokio::test]
async fn filter_change_restarts_from_first_page() {
    let http = MockHttp::default();
    http.respond(200, customer_page(&["c1"], Some("A"), true))
        .respond(200, customer_page(&["c2"], Some("B"), true))
        .respond(200, customer_page(&["c9"], Some("Z"), true));

    let session = AdminSession::new(client(&http), tenant());
    let mut pager = session.customers(CustomerFilter::default());
    pager.current().await.unwrap();
    pager.next_page().await.unwrap();

    let blocked = CustomerFilter {
        status: Some(CustomerStatus::Blocked),
        ..CustomerFilter::default()
    };
    assert!(pager.set_query(larder::api::resources::CustomersQuery { filter: blocked.clone() }));
    assert!(pager.page_info().is_none());
    assert!(!pager.has_previous());

    pager.current().await.unwrap();

    let afters = http.afters();
    assert_eq!(afters.last().unwrap(), &None);
    assert_eq!(http.bodies()[2]["variables"]["filter"]["status"], "BLOCKED");

    assert!(!pager.set_query(larder::api::resources::CustomersQuery { filter: blocked }));
}

#[tokio::test]
async fn failed_fetch_keeps_current_page() {
    let http = MockHttp::default();
    http.respond(200, customer_page(&["c1"], Some("A"), true))
        .respond(400, serde_json::json!({ "message": "bad request" }))
        .respond(200, customer_page(&["c2"], Some("B"), false));

    let session = AdminSession::new(client(&http), tenant());
    let mut pager = session.customers(CustomerFilter::default());
    pager.current().await.unwrap();

    assert!(pager.next_page().await.is_err());
    assert_eq!(pager.page_number(), 1);
    assert!(pager.has_next());

    let second = pager.next_page().await.unwrap().unwrap();
    assert_eq!(ids(&second, |c| c.id.as_str()), ["c2"]);
    assert_eq!(http.afters(), [None, Some("A".to_owned()), Some("A".to_owned())]);
}

#[tokio::test]
async fn transient_failures_are_retried_inside_a_page_fetch() {
    let http = MockHttp::default();
    http.fail(HttpClientError::Timeout)
        .respond(502, serde_json::json!({}))
        .respond(200, customer_page(&["c1"], None, false));

    let session = AdminSession::new(client(&http), tenant());
    let mut pager = session.customers(CustomerFilter::default());

    let page = pager.current().await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(http.request_count(), 3);
    assert!(pager.next_page().await.unwrap().is_none());
}

#[tokio::test]
async fn missing_end_cursor_ends_paging() {
    let http = MockHttp::default();
    http.respond(200, customer_page(&["c1"], None, true));

    let session = AdminSession::new(client(&http), tenant());
    let mut pager = session.customers(CustomerFilter::default());

    pager.current().await.unwrap();
    assert!(pager.has_next());
    assert!(pager.next_page().await.unwrap().is_none());
    assert_eq!(pager.page_number(), 1);
}
