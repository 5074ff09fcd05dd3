use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

/// Scope name of the rule applied to routes without an override.
pub const DEFAULT_SCOPE: &str = "global-default";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("rate rule '{scope}' has a non-positive limit")]
    InvalidLimit { scope: String },

    #[error("rate rule '{scope}' has a non-positive window")]
    InvalidWindow { scope: String },

    #[error("invalid route rule '{0}', expected ROUTE=LIMIT/WINDOW_SECS")]
    InvalidRouteRule(String),
}

/// A quota of `limit` requests per fixed `window`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateRule {
    pub scope: String,
    pub limit: u64,
    #[serde(rename = "window_secs", serialize_with = "serialize_secs")]
    pub window: Duration,
}

fn serialize_secs<S: serde::Serializer>(window: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(window.as_secs())
}

impl RateRule {
    pub fn new(scope: impl Into<String>, limit: u64, window: Duration) -> Self {
        Self {
            scope: scope.into(),
            limit,
            window,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::InvalidLimit {
                scope: self.scope.clone(),
            });
        }
        if self.window.is_zero() {
            return Err(ConfigError::InvalidWindow {
                scope: self.scope.clone(),
            });
        }
        Ok(())
    }
}

/// Governor settings, built once at startup and handed to
/// [`RateGovernor::configure`](super::RateGovernor::configure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernorConfig {
    pub enabled: bool,
    pub default_rule: RateRule,
    /// Route template (e.g. `/api/auth/login`) to override rule.
    pub per_route_rules: HashMap<String, RateRule>,
}

impl Default for GovernorConfig {
    /// 1000 requests per hour, no overrides.
    fn default() -> Self {
        Self {
            enabled: true,
            default_rule: RateRule::new(DEFAULT_SCOPE, 1000, Duration::from_secs(3600)),
            per_route_rules: HashMap::new(),
        }
    }
}

impl GovernorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_rule.validate()?;
        for rule in self.per_route_rules.values() {
            rule.validate()?;
        }
        Ok(())
    }

    /// Override for `route` if one exists, otherwise the default rule.
    pub fn rule_for(&self, route: &str) -> &RateRule {
        self.per_route_rules.get(route).unwrap_or(&self.default_rule)
    }

    pub fn with_route_rule(mut self, route: impl Into<String>, limit: u64, window: Duration) -> Self {
        let route = route.into();
        self.per_route_rules
            .insert(route.clone(), RateRule::new(route, limit, window));
        self
    }

    /// All scopes a counter can live under.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.default_rule.scope.as_str())
            .chain(self.per_route_rules.values().map(|r| r.scope.as_str()))
    }
}

/// Parses `/api/auth/login=5/60,/api/auth/signup=10/3600` into override rules.
pub fn parse_route_rules(raw: &str) -> Result<HashMap<String, RateRule>, ConfigError> {
    let mut rules = HashMap::new();

    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let invalid = || ConfigError::InvalidRouteRule(item.to_string());

        let (route, quota) = item.rsplit_once('=').ok_or_else(invalid)?;
        let (limit, window) = quota.split_once('/').ok_or_else(invalid)?;
        let route = route.trim();
        if route.is_empty() {
            return Err(invalid());
        }

        let limit: u64 = limit.trim().parse().map_err(|_| invalid())?;
        let window: u64 = window.trim().parse().map_err(|_| invalid())?;

        let rule = RateRule::new(route, limit, Duration::from_secs(window));
        rule.validate()?;
        rules.insert(route.to_string(), rule);
    }

    Ok(rules)
}
