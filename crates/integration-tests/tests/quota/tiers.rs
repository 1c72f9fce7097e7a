use indoc::indoc;
use integration_tests::TestServer;
use reqwest::Method;

use super::decide;

#[tokio::test]
async fn configured_tiers_replace_defaults() {
    let config = indoc! {r#"
        [quota]
        path = "/v1/quota"
        unidentified_prefix = "anonymous-"

        [[quota.tiers]]
        name = "partner"
        patterns = ["partner-a", "partner-b"]
        trip = { quota = 100, spike_arrest = "10ps" }
        not_trip = { quota = 200, spike_arrest = 20 }

        [quota.others]
        trip = { quota = 5, spike_arrest = 1 }
        not_trip = { quota = 6, spike_arrest = 2 }

        [quota.unidentified]
        trip = { quota = 1, spike_arrest = 1 }
        not_trip = { quota = 2, spike_arrest = 1 }
    "#};

    let server = TestServer::start(config).await;

    let (partner, _) = decide(
        &server,
        Method::GET,
        &[("et-client-name", "acme-partner-b"), ("et-client-type", "trip")],
    )
    .await;

    let (former_default, _) = decide(&server, Method::GET, &[("et-client-name", "nsb-app")]).await;
    let (anonymous, _) = decide(&server, Method::GET, &[]).await;

    insta::assert_snapshot!(format!("{partner}\n---\n{former_default}\n---\n{anonymous}"), @r"
    x-quota-client-allowed: 100
    x-quota-client-identifier: acme-partner-b-trip
    x-spike-arrest-client-allowed: 10ps
    x-spike-arrest-client-identifier: acme-partner-b-trip
    ---
    x-quota-client-allowed: 6
    x-quota-client-identifier: nsb-app-notTrip
    x-spike-arrest-client-allowed: 2ps
    x-spike-arrest-client-identifier: nsb-app-notTrip
    ---
    et-client-name: anonymous-127.0.0.1
    x-quota-client-allowed: 2
    x-quota-client-identifier: anonymous-127.0.0.1-notTrip
    x-spike-arrest-client-allowed: 1ps
    x-spike-arrest-client-identifier: anonymous-127.0.0.1-notTrip
    ");
}

#[tokio::test]
async fn configured_header_names() {
    let config = indoc! {r#"
        [quota]
        client_name_header = "X-Client"
        client_type_header = "X-Query"
    "#};

    let server = TestServer::start(config).await;

    let (named, _) = decide(
        &server,
        Method::GET,
        &[("x-client", "entur-planner"), ("x-query", "trip"), ("et-client-name", "nsb")],
    )
    .await;

    let (anonymous, _) = decide(&server, Method::GET, &[("et-client-name", "nsb")]).await;

    insta::assert_snapshot!(format!("{named}\n---\n{anonymous}"), @r"
    x-quota-client-allowed: 4000
    x-quota-client-identifier: entur-planner-trip
    x-spike-arrest-client-allowed: 400ps
    x-spike-arrest-client-identifier: entur-planner-trip
    ---
    x-client: unkown-127.0.0.1
    x-quota-client-allowed: 60
    x-quota-client-identifier: unkown-127.0.0.1-notTrip
    x-spike-arrest-client-allowed: 20ps
    x-spike-arrest-client-identifier: unkown-127.0.0.1-notTrip
    ");
}

#[tokio::test]
async fn first_matching_tier_wins() {
    let server = TestServer::start("").await;

    let (headers, body) = decide(
        &server,
        Method::GET,
        &[("et-client-name", "entur-nsb-bridge"), ("et-client-type", "trip")],
    )
    .await;

    assert_eq!(body["client.tier"], "nsb");

    insta::assert_snapshot!(headers, @r"
    x-quota-client-allowed: 10000
    x-quota-client-identifier: entur-nsb-bridge-trip
    x-spike-arrest-client-allowed: 1000ps
    x-spike-arrest-client-identifier: entur-nsb-bridge-trip
    ");
}
