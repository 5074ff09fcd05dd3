use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::key::{ClientKey, RequestContext};
use super::rule::{ConfigError, GovernorConfig, RateRule};
use super::store::{Admission, CounterKey, CounterStore, InMemoryStore};

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Quota exhausted; `retry_after` is the number of whole seconds until
    /// the next window opens.
    Deny { retry_after: u64 },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Read-only view of the governor for the admin surface.
#[derive(Debug, Clone, Serialize)]
pub struct GovernorStatus {
    pub enabled: bool,
    pub default_rule: RateRule,
    pub route_rules: Vec<RateRule>,
    pub active_counters: usize,
}

struct Inner {
    config: RwLock<Arc<GovernorConfig>>,
    store: Arc<dyn CounterStore>,
    clock: Arc<dyn Clock>,
}

/// Fixed-window admission control, keyed by client and rule scope.
///
/// Cloning is cheap; clones share configuration and counters.
#[derive(Clone)]
pub struct RateGovernor {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for RateGovernor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateGovernor")
            .field("config", &self.config())
            .field("active_counters", &self.inner.store.len())
            .finish()
    }
}

impl RateGovernor {
    /// Validates `config` and builds a governor on the in-memory store and
    /// the system clock.
    pub fn configure(config: GovernorConfig) -> Result<Self, ConfigError> {
        Self::with_parts(config, Arc::new(InMemoryStore::new()), Arc::new(SystemClock))
    }

    pub fn with_clock(config: GovernorConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        Self::with_parts(config, Arc::new(InMemoryStore::new()), clock)
    }

    pub fn with_parts(
        config: GovernorConfig,
        store: Arc<dyn CounterStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        info!(
            enabled = config.enabled,
            limit = config.default_rule.limit,
            window_secs = config.default_rule.window.as_secs(),
            overrides = config.per_route_rules.len(),
            "Rate governor configured"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                config: RwLock::new(Arc::new(config)),
                store,
                clock,
            }),
        })
    }

    pub fn config(&self) -> Arc<GovernorConfig> {
        // The lock only guards an Arc swap, so a poisoned guard still holds a
        // complete value.
        let guard = self
            .inner
            .config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    pub fn is_enabled(&self) -> bool {
        self.config().enabled
    }

    pub fn now(&self) -> Duration {
        self.inner.clock.now()
    }

    /// Counts the request against its quota, or denies it when the quota for
    /// the current window is used up. Never fails.
    pub fn check_and_record(&self, ctx: &RequestContext) -> Decision {
        let config = self.config();
        if !config.enabled {
            return Decision::Allow;
        }

        let rule = config.rule_for(&ctx.route);
        let window_start = window_start(ctx.now, rule.window);
        let key = CounterKey::new(ctx.client.clone(), rule.scope.as_str());

        match self
            .inner
            .store
            .acquire(&key, window_start, rule.window, rule.limit)
        {
            Admission::Admitted { count } => {
                debug!(
                    client = %ctx.client,
                    scope = %rule.scope,
                    count,
                    limit = rule.limit,
                    "Request admitted"
                );
                Decision::Allow
            }
            Admission::Exhausted { window_end } => {
                let retry_after = seconds_until(ctx.now, window_end);
                warn!(
                    client = %ctx.client,
                    route = %ctx.route,
                    scope = %rule.scope,
                    limit = rule.limit,
                    retry_after,
                    "Rate limit exceeded"
                );
                Decision::Deny { retry_after }
            }
        }
    }

    /// Clears every counter held for `client`.
    pub fn reset(&self, client: &ClientKey) {
        let config = self.config();
        for scope in config.scopes() {
            self.inner
                .store
                .remove(&CounterKey::new(client.clone(), scope));
        }
        info!(client = %client, "Rate limit counters reset");
    }

    /// Replaces the configuration. Counters are dropped since window sizes
    /// may differ. An invalid config leaves the current one in place.
    pub fn reload(&self, config: GovernorConfig) -> Result<(), ConfigError> {
        config.validate()?;

        {
            let mut guard = self
                .inner
                .config
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *guard = Arc::new(config);
        }
        self.inner.store.clear();

        let config = self.config();
        info!(
            enabled = config.enabled,
            limit = config.default_rule.limit,
            window_secs = config.default_rule.window.as_secs(),
            overrides = config.per_route_rules.len(),
            "Rate governor reloaded"
        );
        Ok(())
    }

    /// Evicts counters of elapsed windows.
    pub fn sweep(&self) -> usize {
        let evicted = self.inner.store.evict_elapsed(self.now());
        if evicted > 0 {
            debug!(evicted, remaining = self.inner.store.len(), "Swept rate limit counters");
        }
        evicted
    }

    pub fn active_counters(&self) -> usize {
        self.inner.store.len()
    }

    pub fn snapshot(&self) -> GovernorStatus {
        let config = self.config();
        let mut route_rules: Vec<RateRule> = config.per_route_rules.values().cloned().collect();
        route_rules.sort_by(|a, b| a.scope.cmp(&b.scope));

        GovernorStatus {
            enabled: config.enabled,
            default_rule: config.default_rule.clone(),
            route_rules,
            active_counters: self.active_counters(),
        }
    }

    /// Runs [`sweep`](Self::sweep) every `period` on the current runtime.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let governor = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // First tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                governor.sweep();
            }
        })
    }
}

/// `floor(now / window) * window`
fn window_start(now: Duration, window: Duration) -> Duration {
    let window_ns = window.as_nanos();
    let start_ns = now.as_nanos() / window_ns * window_ns;
    Duration::new(
        (start_ns / 1_000_000_000) as u64,
        (start_ns % 1_000_000_000) as u32,
    )
}

/// Whole seconds from `now` to `end`, rounded up, at least one.
fn seconds_until(now: Duration, end: Duration) -> u64 {
    let remaining = end.saturating_sub(now);
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    secs.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::clock::ManualClock;
    use crate::rate_limit::rule::DEFAULT_SCOPE;
    use std::sync::Barrier;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn config(limit: u64, window: u64) -> GovernorConfig {
        GovernorConfig {
            enabled: true,
            default_rule: RateRule::new(DEFAULT_SCOPE, limit, secs(window)),
            per_route_rules: Default::default(),
        }
    }

    fn ctx(client: &str, route: &str, at: u64) -> RequestContext {
        RequestContext::new(ClientKey::new(client), route, secs(at))
    }

    #[test]
    fn test_window_start_floors() {
        assert_eq!(window_start(secs(0), secs(60)), secs(0));
        assert_eq!(window_start(secs(59), secs(60)), secs(0));
        assert_eq!(window_start(secs(61), secs(60)), secs(60));
        assert_eq!(
            window_start(Duration::from_millis(1_750), Duration::from_millis(500)),
            Duration::from_millis(1_500)
        );
    }

    #[test]
    fn test_seconds_until_rounds_up() {
        assert_eq!(seconds_until(secs(3), secs(60)), 57);
        assert_eq!(seconds_until(Duration::from_millis(3_200), secs(60)), 57);
        assert_eq!(seconds_until(Duration::from_millis(59_999), secs(60)), 1);
    }

    #[test]
    fn test_configure_rejects_invalid_rule() {
        assert!(matches!(
            RateGovernor::configure(config(0, 60)),
            Err(ConfigError::InvalidLimit { .. })
        ));
        assert!(matches!(
            RateGovernor::configure(config(3, 0)),
            Err(ConfigError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_limit_then_deny_then_new_window() {
        let governor = RateGovernor::configure(config(3, 60)).unwrap();

        assert_eq!(governor.check_and_record(&ctx("A", "/", 0)), Decision::Allow);
        assert_eq!(governor.check_and_record(&ctx("A", "/", 1)), Decision::Allow);
        assert_eq!(governor.check_and_record(&ctx("A", "/", 2)), Decision::Allow);
        assert_eq!(
            governor.check_and_record(&ctx("A", "/", 3)),
            Decision::Deny { retry_after: 57 }
        );
        assert_eq!(governor.check_and_record(&ctx("A", "/", 61)), Decision::Allow);
    }

    #[test]
    fn test_full_quota_available_in_next_window() {
        let governor = RateGovernor::configure(config(2, 10)).unwrap();
        for t in [0, 1] {
            assert!(governor.check_and_record(&ctx("k", "/", t)).is_allowed());
        }
        assert!(!governor.check_and_record(&ctx("k", "/", 2)).is_allowed());

        for t in [10, 11] {
            assert!(governor.check_and_record(&ctx("k", "/", t)).is_allowed());
        }
        assert!(!governor.check_and_record(&ctx("k", "/", 12)).is_allowed());
    }

    #[test]
    fn test_clients_do_not_share_quota() {
        let governor = RateGovernor::configure(config(1, 60)).unwrap();
        assert!(governor.check_and_record(&ctx("a", "/", 0)).is_allowed());
        assert!(governor.check_and_record(&ctx("b", "/", 0)).is_allowed());
        assert!(!governor.check_and_record(&ctx("a", "/", 0)).is_allowed());
    }

    #[test]
    fn test_disabled_allows_everything_and_stores_nothing() {
        let mut cfg = config(1, 60);
        cfg.enabled = false;
        let governor = RateGovernor::configure(cfg).unwrap();

        for i in 0..500 {
            let client = format!("client-{}", i % 7);
            assert!(governor.check_and_record(&ctx(&client, "/", 0)).is_allowed());
        }
        assert_eq!(governor.active_counters(), 0);
    }

    #[test]
    fn test_reset_restores_quota() {
        let governor = RateGovernor::configure(
            config(1, 60).with_route_rule("/api/auth/login", 1, secs(60)),
        )
        .unwrap();

        assert!(governor.check_and_record(&ctx("A", "/", 0)).is_allowed());
        assert!(governor.check_and_record(&ctx("A", "/api/auth/login", 0)).is_allowed());
        assert!(!governor.check_and_record(&ctx("A", "/", 1)).is_allowed());

        governor.reset(&ClientKey::new("A"));
        assert_eq!(governor.active_counters(), 0);
        assert!(governor.check_and_record(&ctx("A", "/", 2)).is_allowed());
        assert!(governor.check_and_record(&ctx("A", "/api/auth/login", 2)).is_allowed());
    }

    #[test]
    fn test_route_override_has_own_bucket() {
        let governor = RateGovernor::configure(
            config(100, 3600).with_route_rule("/api/auth/login", 2, secs(60)),
        )
        .unwrap();

        assert!(governor.check_and_record(&ctx("A", "/api/auth/login", 0)).is_allowed());
        assert!(governor.check_and_record(&ctx("A", "/api/auth/login", 1)).is_allowed());
        assert_eq!(
            governor.check_and_record(&ctx("A", "/api/auth/login", 2)),
            Decision::Deny { retry_after: 58 }
        );
        // Default bucket untouched by login attempts.
        assert!(governor.check_and_record(&ctx("A", "/api/listings", 2)).is_allowed());
        assert!(governor.check_and_record(&ctx("A", "/api/auth/login", 60)).is_allowed());
    }

    #[test]
    fn test_unknown_client_shares_one_bucket() {
        let governor = RateGovernor::configure(config(1, 60)).unwrap();
        let anon = RequestContext::new(ClientKey::unknown(), "/", secs(0));
        assert!(governor.check_and_record(&anon).is_allowed());
        assert!(!governor.check_and_record(&anon).is_allowed());
    }

    #[test]
    fn test_sweep_evicts_elapsed_windows() {
        let clock = ManualClock::new(secs(0));
        let governor = RateGovernor::with_clock(config(5, 60), Arc::new(clock.clone())).unwrap();

        governor.check_and_record(&ctx("a", "/", 0));
        governor.check_and_record(&ctx("b", "/", 30));
        assert_eq!(governor.active_counters(), 2);

        clock.set(secs(59));
        assert_eq!(governor.sweep(), 0);

        clock.set(secs(60));
        assert_eq!(governor.sweep(), 2);
        assert_eq!(governor.active_counters(), 0);
    }

    #[test]
    fn test_reload_swaps_config_and_clears_counters() {
        let governor = RateGovernor::configure(config(1, 60)).unwrap();
        assert!(governor.check_and_record(&ctx("A", "/", 0)).is_allowed());
        assert!(!governor.check_and_record(&ctx("A", "/", 0)).is_allowed());

        governor.reload(config(2, 60)).unwrap();
        assert_eq!(governor.active_counters(), 0);
        assert!(governor.check_and_record(&ctx("A", "/", 1)).is_allowed());
        assert!(governor.check_and_record(&ctx("A", "/", 1)).is_allowed());
        assert!(!governor.check_and_record(&ctx("A", "/", 1)).is_allowed());
    }

    #[test]
    fn test_invalid_reload_keeps_old_config() {
        let governor = RateGovernor::configure(config(1, 60)).unwrap();
        governor.check_and_record(&ctx("A", "/", 0));

        assert!(governor.reload(config(0, 60)).is_err());
        assert_eq!(governor.config().default_rule.limit, 1);
        assert_eq!(governor.active_counters(), 1);
    }

    #[test]
    fn test_concurrent_checks_admit_exactly_limit() {
        const THREADS: usize = 32;
        const LIMIT: u64 = 10;

        let governor = RateGovernor::configure(config(LIMIT, 60)).unwrap();
        let barrier = Barrier::new(THREADS);

        let allowed = std::thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        governor.check_and_record(&ctx("hot", "/", 5)).is_allowed()
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|allowed| *allowed)
                .count()
        });

        assert_eq!(allowed as u64, LIMIT);
        assert_eq!(THREADS - allowed, THREADS - LIMIT as usize);
    }

    #[test]
    fn test_late_request_across_boundary_cannot_double_admit() {
        let governor = RateGovernor::configure(config(2, 60)).unwrap();
        let at = |ms: u64| RequestContext::new(ClientKey::new("A"), "/", Duration::from_millis(ms));

        let mut admitted = 0;
        for ms in [60_000, 60_000] {
            admitted += governor.check_and_record(&at(ms)).is_allowed() as u64;
        }

        // Stamped in the previous window, arrives after the new one started.
        let late = governor.check_and_record(&at(59_999));
        assert_eq!(late, Decision::Deny { retry_after: 61 });

        for ms in [60_001, 60_001] {
            admitted += governor.check_and_record(&at(ms)).is_allowed() as u64;
        }

        assert_eq!(admitted, 2);
    }

    #[test]
    fn test_snapshot_lists_rules_sorted() {
        let governor = RateGovernor::configure(
            config(10, 60)
                .with_route_rule("/b", 1, secs(1))
                .with_route_rule("/a", 2, secs(2)),
        )
        .unwrap();
        governor.check_and_record(&ctx("x", "/a", 0));

        let status = governor.snapshot();
        assert!(status.enabled);
        assert_eq!(status.default_rule.limit, 10);
        let scopes: Vec<_> = status.route_rules.iter().map(|r| r.scope.as_str()).collect();
        assert_eq!(scopes, vec!["/a", "/b"]);
        assert_eq!(status.active_counters, 1);
    }

    #[tokio::test]
    async fn test_sweeper_task_evicts() {
        let clock = ManualClock::new(secs(0));
        let governor = RateGovernor::with_clock(config(5, 60), Arc::new(clock.clone())).unwrap();
        governor.check_and_record(&ctx("a", "/", 0));

        clock.set(secs(120));
        let handle = governor.spawn_sweeper(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(governor.active_counters(), 0);
        handle.abort();
    }
}
