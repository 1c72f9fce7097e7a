use std::{collections::HashSet, fmt::Write, path::Path, sync::LazyLock};

use anyhow::bail;
use indoc::formatdoc;
use regex::{Captures, Regex};
use serde::Deserialize;
use toml::Value;

use crate::{Config, QuotaConfig, error::Error};

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*env\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern should be valid")
});

/// Tier names the classifier uses for its own fallbacks.
const RESERVED_TIER_NAMES: [&str; 2] = ["others", "unidentified"];

pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let path = path.as_ref().to_path_buf();
    let content = std::fs::read_to_string(&path).map_err(Error::ConfigOpen)?;
    let mut raw_config: Value = toml::from_str(&content).map_err(Error::ConfigParse)?;

    expand_env_placeholders(&mut Vec::new(), &mut raw_config)?;

    let config = Config::deserialize(raw_config)?;

    validate_endpoints(&config)?;
    validate_headers(&config.quota)?;

    let warnings = validate_tiers(&config.quota)?;

    for warning in warnings {
        log::warn!("{warning}");
    }

    log::debug!(
        "Loaded configuration from {} with {} quota tiers",
        path.display(),
        config.quota.tiers.len()
    );

    Ok(config)
}

fn expand_env_placeholders<'a>(path: &mut Vec<Result<&'a str, usize>>, value: &'a mut Value) -> Result<(), Error> {
    match value {
        Value::String(s) => {
            if !ENV_PLACEHOLDER.is_match(s) {
                return Ok(());
            }

            let mut missing = None;

            let expanded = ENV_PLACEHOLDER.replace_all(s, |captures: &Captures<'_>| {
                let name = &captures[1];

                match std::env::var(name) {
                    Ok(value) => value,
                    Err(err) => {
                        missing.get_or_insert_with(|| format!("{name}: {err}"));
                        String::new()
                    }
                }
            });

            if let Some(reason) = missing {
                return Err(Error::EnvVarSubstitution {
                    path: render_path(path),
                    reason,
                });
            }

            *s = expanded.into_owned();
        }
        Value::Array(values) => {
            for (i, value) in values.iter_mut().enumerate() {
                path.push(Err(i));
                expand_env_placeholders(path, value)?;
                path.pop();
            }
        }
        Value::Table(map) => {
            for (key, value) in map {
                path.push(Ok(key.as_str()));
                expand_env_placeholders(path, value)?;
                path.pop();
            }
        }
        Value::Integer(_) | Value::Float(_) | Value::Boolean(_) | Value::Datetime(_) => (),
    }

    Ok(())
}

fn render_path(path: &[Result<&str, usize>]) -> String {
    let mut p = String::new();

    for segment in path {
        match segment {
            Ok(s) => {
                p.push_str(s);
                p.push('.');
            }
            Err(i) => {
                if p.ends_with('.') {
                    p.pop();
                }

                // Writing into a String never fails.
                let _ = write!(p, "[{i}].");
            }
        }
    }

    if p.ends_with('.') {
        p.pop();
    }

    p
}

/// Validates that the endpoint paths can be mounted side by side.
pub(crate) fn validate_endpoints(config: &Config) -> anyhow::Result<()> {
    let quota = &config.quota;
    let health = &config.server.health;

    if quota.enabled && !quota.path.starts_with('/') {
        bail!("Quota decision path must start with '/', got '{}'", quota.path);
    }

    if health.enabled && !health.path.starts_with('/') {
        bail!("Health endpoint path must start with '/', got '{}'", health.path);
    }

    if quota.enabled && health.enabled && quota.path == health.path {
        bail!(
            "Duplicate endpoint path: the quota decision endpoint and the health endpoint cannot use the same path ({})",
            quota.path
        );
    }

    Ok(())
}

/// Validates that the configured header names, and the prefix written into header
/// values, are usable in HTTP headers.
pub(crate) fn validate_headers(quota: &QuotaConfig) -> anyhow::Result<()> {
    for (field, name) in [
        ("client_name_header", &quota.client_name_header),
        ("client_type_header", &quota.client_type_header),
    ] {
        if http::HeaderName::from_bytes(name.as_bytes()).is_err() {
            bail!("Invalid HTTP header name '{name}' in quota.{field}");
        }
    }

    if quota.client_name_header.eq_ignore_ascii_case(&quota.client_type_header) {
        bail!(
            "quota.client_name_header and quota.client_type_header must differ, both are '{}'",
            quota.client_name_header
        );
    }

    // Synthesized identities end up in rate key and client name headers.
    if http::HeaderValue::from_str(&quota.unidentified_prefix).is_err() {
        bail!(
            "Invalid quota.unidentified_prefix {:?}, it must be usable in an HTTP header value",
            quota.unidentified_prefix
        );
    }

    Ok(())
}

/// Validates the tier table and returns warnings for patterns that can never match.
///
/// # Errors
///
/// Returns an error if:
/// - A tier name is used twice or collides with a fallback tier
/// - A tier has no patterns, or an empty pattern that would match every client
pub(crate) fn validate_tiers(quota: &QuotaConfig) -> anyhow::Result<Vec<String>> {
    let mut names = HashSet::new();

    for tier in &quota.tiers {
        if RESERVED_TIER_NAMES.contains(&tier.name.as_str()) {
            bail!(formatdoc! {r#"
                Tier name '{}' is reserved for the fallback limits.

                Configure the fallback tiers in their own sections instead:

                  [quota.others]
                  trip = {{ quota = 500, spike_arrest = 150 }}
                  not_trip = {{ quota = 1000, spike_arrest = 200 }}
            "#, tier.name});
        }

        if !names.insert(tier.name.as_str()) {
            bail!("Duplicate quota tier name '{}'", tier.name);
        }

        if tier.patterns.is_empty() {
            bail!("Quota tier '{}' has no client name patterns", tier.name);
        }

        if tier.patterns.iter().any(|pattern| pattern.is_empty()) {
            bail!(
                "Quota tier '{}' has an empty pattern, which would match every client name",
                tier.name
            );
        }
    }

    Ok(shadowed_pattern_warnings(quota))
}

/// A pattern can never match when an earlier pattern is a substring of it: any
/// name containing the later pattern contains the earlier one too.
fn shadowed_pattern_warnings(quota: &QuotaConfig) -> Vec<String> {
    let ordered: Vec<(&str, &str)> = quota
        .tiers
        .iter()
        .flat_map(|tier| tier.patterns.iter().map(move |pattern| (tier.name.as_str(), pattern.as_str())))
        .collect();

    let mut warnings = Vec::new();

    for (i, (tier, pattern)) in ordered.iter().enumerate() {
        let shadowing = ordered[..i]
            .iter()
            .find(|(_, earlier)| pattern.contains(earlier));

        let Some((earlier_tier, earlier_pattern)) = shadowing else {
            continue;
        };

        if earlier_tier == tier {
            warnings.push(format!(
                "Pattern '{pattern}' in quota tier '{tier}' is redundant, '{earlier_pattern}' already matches it"
            ));
        } else {
            warnings.push(format!(
                "Pattern '{pattern}' in quota tier '{tier}' will never match, tier '{earlier_tier}' claims those clients first with '{earlier_pattern}'"
            ));
        }
    }

    warnings
}
