use indoc::indoc;
use integration_tests::TestServer;
use reqwest::Method;

use super::decide;

#[tokio::test]
async fn proxy_headers_ignored_by_default() {
    let server = TestServer::start("").await;

    let (headers, _) = decide(
        &server,
        Method::GET,
        &[("x-real-ip", "192.168.1.1"), ("x-forwarded-for", "192.168.1.2")],
    )
    .await;

    insta::assert_snapshot!(headers, @r"
    et-client-name: unkown-127.0.0.1
    x-quota-client-allowed: 60
    x-quota-client-identifier: unkown-127.0.0.1-notTrip
    x-spike-arrest-client-allowed: 20ps
    x-spike-arrest-client-identifier: unkown-127.0.0.1-notTrip
    ");
}

#[tokio::test]
async fn x_real_ip() {
    let config = indoc! {r#"
        [server.client_ip]
        x_real_ip = true
    "#};

    let server = TestServer::start(config).await;

    let (first, _) = decide(&server, Method::GET, &[("X-Real-Ip", "192.168.1.1")]).await;
    let (second, _) = decide(&server, Method::GET, &[("X-Real-Ip", "192.168.1.2")]).await;

    insta::assert_snapshot!(format!("{first}\n---\n{second}"), @r"
    et-client-name: unkown-192.168.1.1
    x-quota-client-allowed: 60
    x-quota-client-identifier: unkown-192.168.1.1-notTrip
    x-spike-arrest-client-allowed: 20ps
    x-spike-arrest-client-identifier: unkown-192.168.1.1-notTrip
    ---
    et-client-name: unkown-192.168.1.2
    x-quota-client-allowed: 60
    x-quota-client-identifier: unkown-192.168.1.2-notTrip
    x-spike-arrest-client-allowed: 20ps
    x-spike-arrest-client-identifier: unkown-192.168.1.2-notTrip
    ");
}

#[tokio::test]
async fn x_forwarded_for_with_trusted_hops() {
    let config = indoc! {r#"
        [server.client_ip]
        x_forwarded_for_trusted_hops = 1
    "#};

    let server = TestServer::start(config).await;

    let (headers, _) = decide(
        &server,
        Method::GET,
        &[("x-forwarded-for", "203.0.113.9, 10.0.0.1"), ("et-client-type", "trip")],
    )
    .await;

    insta::assert_snapshot!(headers, @r"
    et-client-name: unkown-203.0.113.9
    x-quota-client-allowed: 30
    x-quota-client-identifier: unkown-203.0.113.9-trip
    x-spike-arrest-client-allowed: 2ps
    x-spike-arrest-client-identifier: unkown-203.0.113.9-trip
    ");
}

#[tokio::test]
async fn named_clients_are_not_keyed_on_address() {
    let config = indoc! {r#"
        [server.client_ip]
        x_real_ip = true
    "#};

    let server = TestServer::start(config).await;

    let (first, _) = decide(
        &server,
        Method::GET,
        &[("et-client-name", "atb-bff"), ("X-Real-Ip", "192.168.1.1")],
    )
    .await;

    let (second, _) = decide(
        &server,
        Method::GET,
        &[("et-client-name", "atb-bff"), ("X-Real-Ip", "192.168.1.2")],
    )
    .await;

    assert_eq!(first, second);
}
