//! Transport selection and opening.

use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::{Result, TransportError};
use crate::loopback::LoopbackBus;
use crate::monitor::Monitor;
use crate::types::TransportKind;
use crate::udp::UdpMonitor;

/// Resolved transport selection for one allocation attempt.
///
/// Parsed from an expression string:
///
/// - `"loopback"` - a fresh in-process bus (silent unless the caller
///   attaches publishers to it)
/// - `"udp:<bind-addr>"` - a passively bound UDP socket, e.g.
///   `udp:0.0.0.0:9382`
///
/// Kinds without a driver (`can`) are rejected at parse time.
#[derive(Clone, Debug)]
pub enum TransportConfig {
    /// In-process bus.
    Loopback { bus: LoopbackBus },
    /// Passive UDP socket bound to `bind`.
    Udp { bind: SocketAddr },
}

impl TransportConfig {
    /// Loopback config sharing an existing `bus`, for in-process wiring.
    pub fn loopback(bus: LoopbackBus) -> Self {
        TransportConfig::Loopback { bus }
    }

    /// Transport family this config resolves to.
    pub fn kind(&self) -> TransportKind {
        match self {
            TransportConfig::Loopback { .. } => TransportKind::Loopback,
            TransportConfig::Udp { .. } => TransportKind::Udp,
        }
    }

    /// Open a receive-only monitor on the configured bus.
    pub async fn open(&self) -> Result<Monitor> {
        match self {
            TransportConfig::Loopback { bus } => Ok(Monitor::Loopback(bus.monitor())),
            TransportConfig::Udp { bind } => Ok(Monitor::Udp(UdpMonitor::bind(*bind).await?)),
        }
    }
}

impl FromStr for TransportConfig {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, rest) = match s.split_once(':') {
            Some((kind, rest)) => (kind, Some(rest)),
            None => (s, None),
        };
        match kind {
            "loopback" => {
                if rest.is_some() {
                    return Err(TransportError::Malformed(
                        "loopback takes no parameters".into(),
                    ));
                }
                Ok(TransportConfig::Loopback {
                    bus: LoopbackBus::new(),
                })
            }
            "udp" => {
                let addr = rest.ok_or_else(|| {
                    TransportError::Malformed(
                        "udp requires a bind address, e.g. udp:0.0.0.0:9382".into(),
                    )
                })?;
                let bind = addr.parse().map_err(|_| {
                    TransportError::Malformed(format!("invalid bind address: {addr}"))
                })?;
                Ok(TransportConfig::Udp { bind })
            }
            other => Err(TransportError::Unsupported(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_loopback() {
        let config: TransportConfig = "loopback".parse().unwrap();
        assert_eq!(config.kind(), TransportKind::Loopback);
    }

    #[test]
    fn parses_udp_with_bind_address() {
        let config: TransportConfig = "udp:127.0.0.1:9382".parse().unwrap();
        assert_eq!(config.kind(), TransportKind::Udp);
        match config {
            TransportConfig::Udp { bind } => {
                assert_eq!(bind, "127.0.0.1:9382".parse::<SocketAddr>().unwrap())
            }
            other => panic!("unexpected config: {other:?}"),
        }
    }

    #[test]
    fn rejects_driverless_kinds() {
        let err = "can:vcan0".parse::<TransportConfig>().unwrap_err();
        assert!(matches!(err, TransportError::Unsupported(_)));
    }

    #[test]
    fn rejects_malformed_expressions() {
        assert!(matches!(
            "udp".parse::<TransportConfig>(),
            Err(TransportError::Malformed(_))
        ));
        assert!(matches!(
            "udp:not-an-address".parse::<TransportConfig>(),
            Err(TransportError::Malformed(_))
        ));
        assert!(matches!(
            "loopback:extra".parse::<TransportConfig>(),
            Err(TransportError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn opens_monitor_of_matching_kind() {
        let config: TransportConfig = "loopback".parse().unwrap();
        let monitor = config.open().await.unwrap();
        assert_eq!(monitor.kind(), TransportKind::Loopback);
    }
}
