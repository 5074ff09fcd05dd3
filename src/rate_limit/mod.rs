//! Request rate governance
//!
//! Fixed-window admission control for the public API:
//! - `rule` - quotas, governor configuration and its validation
//! - `key` - client identity and the per-request context
//! - `store` - pluggable counter storage (in-memory by default)
//! - `clock` - injectable time source
//! - `governor` - the admission check itself, reset/reload and sweeping

pub mod clock;
pub mod governor;
pub mod key;
pub mod rule;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use governor::{Decision, GovernorStatus, RateGovernor};
pub use key::{ClientKey, RequestContext};
pub use rule::{parse_route_rules, ConfigError, GovernorConfig, RateRule, DEFAULT_SCOPE};
pub use store::{Admission, CounterEntry, CounterKey, CounterStore, InMemoryStore};
