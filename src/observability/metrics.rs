//! Prometheus metrics.
//!
//! Counters are recorded through the `metrics` facade everywhere; without an
//! installed recorder they are no-ops.

use crate::config::MetricsSettings;
use crate::{Error, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default exporter port.
pub const DEFAULT_METRICS_PORT: u16 = 9090;

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,
    /// Address to bind the metrics exporter.
    pub listen_addr: SocketAddr,
}

impl MetricsConfig {
    /// Builds metrics configuration from config settings with env overrides.
    #[must_use]
    pub fn from_settings(settings: Option<&MetricsSettings>) -> Self {
        Self::resolve(settings, |key| std::env::var(key).ok())
    }

    /// Same as [`MetricsConfig::from_settings`] with an explicit variable lookup.
    #[must_use]
    pub fn resolve<F>(settings: Option<&MetricsSettings>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut enabled = settings.and_then(|s| s.enabled).unwrap_or(false);
        let mut port = settings
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_METRICS_PORT);

        if let Some(v) = lookup("DOCCHAT_METRICS_ENABLED").and_then(|v| parse_bool(&v)) {
            enabled = v;
        }
        if let Some(p) = lookup("DOCCHAT_METRICS_PORT").and_then(|v| v.trim().parse().ok()) {
            port = p;
        }

        Self {
            enabled,
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
        }
    }
}

/// Installs the Prometheus recorder and its HTTP listener.
///
/// Returns `false` without doing anything when metrics are disabled.
///
/// # Errors
///
/// Returns an error if the recorder cannot be installed.
pub fn install_prometheus(config: &MetricsConfig) -> Result<bool> {
    if !config.enabled {
        return Ok(false);
    }

    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .install()
        .map_err(|e| Error::operation("install_prometheus", e))?;

    tracing::info!(addr = %config.listen_addr, "Prometheus exporter listening");
    Ok(true)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_by_default() {
        let config = MetricsConfig::resolve(None, |_| None);
        assert!(!config.enabled);
        assert_eq!(config.listen_addr.port(), DEFAULT_METRICS_PORT);
        assert!(!install_prometheus(&config).unwrap());
    }

    #[test]
    fn test_env_overrides() {
        let settings = MetricsSettings {
            enabled: Some(false),
            port: Some(9100),
        };
        let config = MetricsConfig::resolve(Some(&settings), |key| match key {
            "DOCCHAT_METRICS_ENABLED" => Some("yes".to_string()),
            "DOCCHAT_METRICS_PORT" => Some("9200".to_string()),
            _ => None,
        });
        assert!(config.enabled);
        assert_eq!(config.listen_addr.port(), 9200);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
