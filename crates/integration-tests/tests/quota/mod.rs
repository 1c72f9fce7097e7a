mod client_ip;
mod decision;
mod tiers;

use integration_tests::TestServer;

/// Sends a decision request and renders the decision headers, sorted, followed by
/// the JSON body.
async fn decide(server: &TestServer, method: reqwest::Method, headers: &[(&str, &str)]) -> (String, serde_json::Value) {
    let mut request = server.client.request(method, &server.config.quota.path);

    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    let response = request.send().await.unwrap();
    assert_eq!(response.status(), 200);

    let client_name_header = server.config.quota.client_name_header.to_ascii_lowercase();

    let mut lines: Vec<String> = response
        .headers()
        .iter()
        .filter(|(name, _)| {
            let name = name.as_str();
            name.starts_with("x-quota-") || name.starts_with("x-spike-arrest-") || name == client_name_header
        })
        .map(|(name, value)| format!("{name}: {}", value.to_str().unwrap()))
        .collect();

    lines.sort();

    let body = response.json().await.unwrap();

    (lines.join("\n"), body)
}
