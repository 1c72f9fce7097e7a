//! Headers carrying a quota decision to the enforcement layer.

use context::QuotaDecision;
use http::{HeaderMap, HeaderName, HeaderValue, header::InvalidHeaderValue};

pub const QUOTA_CLIENT_IDENTIFIER: HeaderName = HeaderName::from_static("x-quota-client-identifier");
pub const QUOTA_CLIENT_ALLOWED: HeaderName = HeaderName::from_static("x-quota-client-allowed");
pub const SPIKE_ARREST_CLIENT_IDENTIFIER: HeaderName = HeaderName::from_static("x-spike-arrest-client-identifier");
pub const SPIKE_ARREST_CLIENT_ALLOWED: HeaderName = HeaderName::from_static("x-spike-arrest-client-allowed");

/// Writes the decision into `headers`, replacing any values a client may have sent
/// itself. A synthesized identity also replaces the client name header so
/// everything downstream sees a named client.
pub(crate) fn insert_decision(headers: &mut HeaderMap, decision: &QuotaDecision, client_name_header: &HeaderName) {
    if let Err(err) = try_insert_decision(headers, decision, client_name_header) {
        // Client names arrive as header values and addresses are ASCII, so this
        // only happens if the prefix in the configuration is not header safe.
        log::warn!("Quota decision for '{}' is not representable as headers: {err}", decision.rate_key);
    }
}

fn try_insert_decision(
    headers: &mut HeaderMap,
    decision: &QuotaDecision,
    client_name_header: &HeaderName,
) -> Result<(), InvalidHeaderValue> {
    let rate_key = HeaderValue::from_str(decision.rate_key.as_str())?;
    let spike_arrest = HeaderValue::from_str(&decision.spike_arrest_allowed.to_string())?;

    let rewritten_name = decision
        .rewritten_client_name()
        .map(HeaderValue::from_str)
        .transpose()?;

    headers.insert(QUOTA_CLIENT_IDENTIFIER, rate_key.clone());
    headers.insert(QUOTA_CLIENT_ALLOWED, HeaderValue::from(decision.quota_allowed));
    headers.insert(SPIKE_ARREST_CLIENT_IDENTIFIER, rate_key);
    headers.insert(SPIKE_ARREST_CLIENT_ALLOWED, spike_arrest);

    if let Some(name) = rewritten_name {
        headers.insert(client_name_header.clone(), name);
    }

    Ok(())
}
