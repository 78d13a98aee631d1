//! Runtime configuration, read from `ORDERS_*` environment variables.

use crate::model::OrderStatus;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Which status changes `change_status` and payment recording accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Any status may follow any other.
    #[default]
    Unchecked,
    /// Only the moves allowed by [`OrderStatus::can_transition_to`].
    Enforced,
}

impl TransitionPolicy {
    pub fn allows(self, from: OrderStatus, to: OrderStatus) -> bool {
        match self {
            TransitionPolicy::Unchecked => true,
            TransitionPolicy::Enforced => from.can_transition_to(to),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfig {
    /// Capacity of the order store's request channel (`ORDERS_STORE_BUFFER`).
    pub store_buffer: usize,
    /// Capacity of the inbound payment event channel (`ORDERS_EVENT_BUFFER`).
    pub event_buffer: usize,
    /// Upper bound on each catalog / gateway round trip (`ORDERS_REQUEST_TIMEOUT_MS`, `0` = none).
    pub request_timeout: Option<Duration>,
    /// Currency sent with payment sessions (`ORDERS_PAYMENT_CURRENCY`).
    pub payment_currency: String,
    /// `ORDERS_ENFORCE_TRANSITIONS`
    pub transition_policy: TransitionPolicy,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            store_buffer: 32,
            event_buffer: 64,
            request_timeout: Some(Duration::from_millis(5000)),
            payment_currency: "usd".to_string(),
            transition_policy: TransitionPolicy::Unchecked,
        }
    }
}

impl OrderConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key-value source. Missing keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store_buffer = match var("ORDERS_STORE_BUFFER") {
            Some(v) => parse_capacity("ORDERS_STORE_BUFFER", v)?,
            None => defaults.store_buffer,
        };
        let event_buffer = match var("ORDERS_EVENT_BUFFER") {
            Some(v) => parse_capacity("ORDERS_EVENT_BUFFER", v)?,
            None => defaults.event_buffer,
        };
        let request_timeout = match var("ORDERS_REQUEST_TIMEOUT_MS") {
            Some(v) => match v.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(ms) => Some(Duration::from_millis(ms)),
                Err(_) => return Err(invalid("ORDERS_REQUEST_TIMEOUT_MS", v)),
            },
            None => defaults.request_timeout,
        };
        let payment_currency = var("ORDERS_PAYMENT_CURRENCY")
            .map(|v| v.trim().to_lowercase())
            .unwrap_or(defaults.payment_currency);
        let transition_policy = match var("ORDERS_ENFORCE_TRANSITIONS") {
            Some(v) => match v.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => TransitionPolicy::Enforced,
                "false" | "0" | "no" => TransitionPolicy::Unchecked,
                _ => return Err(invalid("ORDERS_ENFORCE_TRANSITIONS", v)),
            },
            None => defaults.transition_policy,
        };

        Ok(Self {
            store_buffer,
            event_buffer,
            request_timeout,
            payment_currency,
            transition_policy,
        })
    }
}

// mpsc channels panic on a zero capacity.
fn parse_capacity(key: &'static str, value: String) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid(key, value)),
    }
}

fn invalid(key: &'static str, value: String) -> ConfigError {
    ConfigError::Invalid { key, value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = OrderConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, OrderConfig::default());
        assert_eq!(config.payment_currency, "usd");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_overrides() {
        let config = OrderConfig::from_lookup(lookup(&[
            ("ORDERS_STORE_BUFFER", "8"),
            ("ORDERS_EVENT_BUFFER", "4"),
            ("ORDERS_REQUEST_TIMEOUT_MS", "0"),
            ("ORDERS_PAYMENT_CURRENCY", "EUR"),
            ("ORDERS_ENFORCE_TRANSITIONS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.store_buffer, 8);
        assert_eq!(config.event_buffer, 4);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.payment_currency, "eur");
        assert_eq!(config.transition_policy, TransitionPolicy::Enforced);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = OrderConfig::from_lookup(lookup(&[("ORDERS_STORE_BUFFER", "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "ORDERS_STORE_BUFFER",
                value: "0".into()
            }
        );

        let err =
            OrderConfig::from_lookup(lookup(&[("ORDERS_ENFORCE_TRANSITIONS", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("ORDERS_ENFORCE_TRANSITIONS"));

        assert!(OrderConfig::from_lookup(lookup(&[("ORDERS_REQUEST_TIMEOUT_MS", "-5")])).is_err());
    }

    #[test]
    fn test_policy() {
        use OrderStatus::*;
        assert!(TransitionPolicy::Unchecked.allows(Cancelled, Pending));
        assert!(TransitionPolicy::Enforced.allows(Pending, Paid));
        assert!(!TransitionPolicy::Enforced.allows(Cancelled, Paid));
    }
}
