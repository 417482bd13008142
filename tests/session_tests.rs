#![allow(clippy::unwrap_used, missing_docs)]

mod common;

use std::sync::Arc;

use common::{MockHttp, client, graphql_error, payload, tenant};
use larder::api::BusinessErrorCode;
use larder::errors::describe;
use larder::one_shot::{OneShotError, Phase, RunError};
use larder::selection::Selection;
use larder::session::AdminSession;
use serde_json::json;
use tokio::sync::Notify;

fn payout_account() -> serde_json::Value {
    payload(json!({ "id": "acct_1", "payoutsEnabled": true, "dashboardUrl": null }))
}

fn product(tags: &[&str]) -> serde_json::Value {
    payload(json!({
        "id": "prod_1",
        "name": "Chili",
        "priceCents": 1299,
        "tags": tags,
        "archived": false
    }))
}

#[tokio::test]
async fn finalize_payouts_runs_once() {
    let http = MockHttp::default();
    http.respond(200, payout_account());

    let session = AdminSession::new(client(&http), tenant());
    let account = session.finalize_payouts().await.unwrap();
    assert_eq!(account.id, "acct_1");
    assert_eq!(session.payouts_phase(), Phase::Done);

    let again = session.finalize_payouts().await.unwrap_err();
    assert!(matches!(again, RunError::Refused(OneShotError::AlreadyDone)));
    assert_eq!(http.request_count(), 1);
}

#[tokio::test]
async fn concurrent_finalize_is_refused_while_in_flight() {
    let http = MockHttp::default();
    let gate = Arc::new(Notify::new());
    http.respond_after(&gate, 200, payout_account());

    let session = AdminSession::new(client(&http), tenant());

    let first = session.finalize_payouts();
    let second = async {
        tokio::task::yield_now().await;
        let refused = session.finalize_payouts().await;
        gate.notify_one();
        refused
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.unwrap().id, "acct_1");
    assert!(matches!(
        second.unwrap_err(),
        RunError::Refused(OneShotError::AlreadyInFlight)
    ));
    assert_eq!(http.request_count(), 1);
}

#[tokio::test]
async fn failed_finalize_can_be_retried() {
    let http = MockHttp::default();
    http.respond(200, graphql_error("PAYOUT_ONBOARDING_INCOMPLETE"))
        .respond(200, payout_account());

    let session = AdminSession::new(client(&http), tenant());

    let api_err = match session.finalize_payouts().await.unwrap_err() {
        RunError::Failed(err) => err,
        other => panic!("expected an API failure, got {other:?}"),
    };
    assert_eq!(
        api_err.domain_code::<BusinessErrorCode>(),
        Some(BusinessErrorCode::PayoutOnboardingIncomplete)
    );
    assert!(describe::<BusinessErrorCode>(&api_err).contains("onboarding"));
    assert_eq!(session.payouts_phase(), Phase::NotStarted);

    assert!(session.finalize_payouts().await.is_ok());
    assert_eq!(http.request_count(), 2);
}

#[tokio::test]
async fn tag_edits_commit_on_success() {
    let http = MockHttp::default();
    http.respond(200, product(&["spicy", "vegan"]));

    let session = AdminSession::new(client(&http), tenant());
    let mut tags = Selection::new(["gluten-free".to_owned(), "vegan".to_owned()]);
    tags.toggle("gluten-free".to_owned());
    tags.toggle("spicy".to_owned());

    let updated = session
        .apply_product_tags("prod_1", &mut tags)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.tags, ["spicy", "vegan"]);
    assert!(!tags.is_dirty());

    let body = &http.bodies()[0];
    assert_eq!(body["operationName"], "SetProductTags");
    assert_eq!(body["variables"]["changes"], json!({ "add": ["spicy"], "remove": ["gluten-free"] }));
}

#[tokio::test]
async fn tag_edits_roll_back_on_failure() {
    let http = MockHttp::default();
    http.respond(200, graphql_error("TAG_NOT_FOUND"));

    let session = AdminSession::new(client(&http), tenant());
    let mut tags = Selection::new(["vegan".to_owned()]);
    tags.select("unknown".to_owned());

    assert!(session.apply_product_tags("prod_1", &mut tags).await.is_err());
    assert!(!tags.is_dirty());
    assert_eq!(tags.selected(), ["vegan"]);
}

#[tokio::test]
async fn unchanged_tags_send_nothing() {
    let http = MockHttp::default();
    let session = AdminSession::new(client(&http), tenant());
    let mut tags = Selection::new(["vegan".to_owned()]);

    assert!(session.apply_product_tags("prod_1", &mut tags).await.unwrap().is_none());
    assert_eq!(http.request_count(), 0);
}
