use indoc::indoc;
use integration_tests::TestServer;
use reqwest::Method;

use super::decide;

#[tokio::test]
async fn named_trip_client() {
    let server = TestServer::start("").await;

    let (headers, body) = decide(
        &server,
        Method::GET,
        &[("ET-Client-Name", "nsb-app"), ("ET-Client-Type", "trip")],
    )
    .await;

    insta::assert_snapshot!(headers, @r"
    x-quota-client-allowed: 10000
    x-quota-client-identifier: nsb-app-trip
    x-spike-arrest-client-allowed: 1000ps
    x-spike-arrest-client-identifier: nsb-app-trip
    ");

    insta::assert_json_snapshot!(body, @r#"
    {
      "client.name": "nsb-app",
      "client.name.synthesized": false,
      "client.queryClass": "trip",
      "client.tier": "nsb",
      "quota.client.allowed": 10000,
      "quota.client.identifier": "nsb-app-trip",
      "spikeArrest.client.allowed": "1000ps",
      "spikeArrest.client.identifier": "nsb-app-trip"
    }
    "#);
}

#[tokio::test]
async fn unknown_partner_gets_others_limits() {
    let server = TestServer::start("").await;

    let (headers, _) = decide(
        &server,
        Method::GET,
        &[("et-client-name", "unknown-partner"), ("et-client-type", "notTrip")],
    )
    .await;

    insta::assert_snapshot!(headers, @r"
    x-quota-client-allowed: 1000
    x-quota-client-identifier: unknown-partner-notTrip
    x-spike-arrest-client-allowed: 200ps
    x-spike-arrest-client-identifier: unknown-partner-notTrip
    ");
}

#[tokio::test]
async fn anonymous_client_is_named_after_its_address() {
    let server = TestServer::start("").await;

    let (headers, body) = decide(&server, Method::GET, &[("et-client-type", "trip")]).await;

    insta::assert_snapshot!(headers, @r"
    et-client-name: unkown-127.0.0.1
    x-quota-client-allowed: 30
    x-quota-client-identifier: unkown-127.0.0.1-trip
    x-spike-arrest-client-allowed: 2ps
    x-spike-arrest-client-identifier: unkown-127.0.0.1-trip
    ");

    insta::assert_json_snapshot!(body, @r#"
    {
      "client.name": "unkown-127.0.0.1",
      "client.name.synthesized": true,
      "client.queryClass": "trip",
      "client.tier": "unidentified",
      "quota.client.allowed": 30,
      "quota.client.identifier": "unkown-127.0.0.1-trip",
      "spikeArrest.client.allowed": "2ps",
      "spikeArrest.client.identifier": "unkown-127.0.0.1-trip"
    }
    "#);
}

#[tokio::test]
async fn post_is_classified_like_get() {
    let server = TestServer::start("").await;

    let request = [("et-client-name", "vy-itinerary-medium-priority"), ("et-client-type", "trip")];

    let (get_headers, get_body) = decide(&server, Method::GET, &request).await;
    let (post_headers, post_body) = decide(&server, Method::POST, &request).await;

    assert_eq!(get_headers, post_headers);
    assert_eq!(get_body, post_body);

    insta::assert_snapshot!(post_headers, @r"
    x-quota-client-allowed: 5000
    x-quota-client-identifier: vy-itinerary-medium-priority-trip
    x-spike-arrest-client-allowed: 600ps
    x-spike-arrest-client-identifier: vy-itinerary-medium-priority-trip
    ");
}

#[tokio::test]
async fn client_type_is_case_sensitive() {
    let server = TestServer::start("").await;

    let (headers, _) = decide(
        &server,
        Method::GET,
        &[("et-client-name", "skyss-reise"), ("et-client-type", "Trip")],
    )
    .await;

    insta::assert_snapshot!(headers, @r"
    x-quota-client-allowed: 3000
    x-quota-client-identifier: skyss-reise-notTrip
    x-spike-arrest-client-allowed: 200ps
    x-spike-arrest-client-identifier: skyss-reise-notTrip
    ");
}

#[tokio::test]
async fn disabled_quota() {
    let config = indoc! {r#"
        [quota]
        enabled = false
    "#};

    let server = TestServer::start(config).await;

    let response = server.client.get("/quota").await;
    assert_eq!(response.status(), 404);
    assert!(response.headers().get("x-quota-client-identifier").is_none());
}
