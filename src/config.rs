//! Runtime configuration and the shared [`Context`] handed to every constructor that
//! needs logging identity, tunables, or the outbound-frame queue -- deliberately
//! threaded explicitly rather than reached for via a process-wide static.

use std::sync::Arc;

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};

/// Engine-wide tunables an external config loader populates. Defaults mirror the
/// timeout table: 15 s grant timer, 5 s per-talkgroup hang, 180 s RF timeout.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grant_timer_secs: u32,
    pub hang_timer_secs: u32,
    pub rf_timeout_secs: u32,
    pub grant_source_check: bool,
    pub supervisory_mode: bool,
    pub sndcp_grants_enabled: bool,
    pub immediate_tsbk_retransmissions: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            grant_timer_secs: 15,
            hang_timer_secs: 5,
            rf_timeout_secs: 180,
            grant_source_check: true,
            supervisory_mode: false,
            sndcp_grants_enabled: false,
            immediate_tsbk_retransmissions: 2,
        }
    }
}

/// An opaque secret that deliberately does not derive `Debug`/`Display`, so a
/// `PeerConfig` never leaks its password into a log line by accident.
#[derive(Clone, Deserialize, Serialize)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        SecretBytes(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretBytes(..)")
    }
}

/// Peer-role identity used by the login handshake.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PeerConfig {
    pub peer_id: u32,
    pub password: SecretBytes,
    pub master_addr: String,
    pub master_port: u16,
    pub use_alternate_port: bool,
    pub ping_interval_secs: u32,
    pub login_timeout_secs: u32,
}

impl Default for PeerConfig {
    fn default() -> Self {
        PeerConfig {
            peer_id: 0,
            password: SecretBytes::new(Vec::new()),
            master_addr: String::new(),
            master_port: 62031,
            use_alternate_port: false,
            ping_interval_secs: 1,
            login_timeout_secs: 60,
        }
    }
}

/// Per-site identity and channel-plan configuration, as loaded from disk before the
/// engine turns it into a [`crate::control::site::SiteData`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SiteConfig {
    pub network_id: u32,
    pub system_id: u16,
    pub rfss_id: u8,
    pub site_id: u8,
    pub channel_id: u8,
    pub channel_number: u16,
    pub service_class: u8,
    pub callsign: String,
    pub is_control_channel: bool,
}

/// Shared context constructed once at startup and passed by reference into every
/// constructor that needs it. Carries the logging target name, the engine's tunables,
/// and a handle to the outbound-frame queue; nothing here is process-wide mutable
/// state.
pub struct Context {
    pub log_target: &'static str,
    pub engine: EngineConfig,
    outbound: Sender<bytes::Bytes>,
}

impl Context {
    pub fn new(log_target: &'static str, engine: EngineConfig, outbound: Sender<bytes::Bytes>) -> Arc<Self> {
        Arc::new(Context { log_target, engine, outbound })
    }

    pub fn send_frame(&self, frame: bytes::Bytes) -> Result<(), crossbeam_channel::SendError<bytes::Bytes>> {
        self.outbound.send(frame)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_engine_config_defaults_match_timeout_table() {
        let config = EngineConfig::default();
        assert_eq!(config.grant_timer_secs, 15);
        assert_eq!(config.hang_timer_secs, 5);
        assert_eq!(config.rf_timeout_secs, 180);
    }

    #[test]
    fn test_secret_bytes_debug_does_not_leak() {
        let secret = SecretBytes::new(b"passw0rd".to_vec());
        assert_eq!(format!("{:?}", secret), "SecretBytes(..)");
    }

    #[test]
    fn test_peer_config_default_login_timeout() {
        assert_eq!(PeerConfig::default().login_timeout_secs, 60);
    }

    #[test]
    fn test_context_send_frame() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let ctx = Context::new("p25-fne", EngineConfig::default(), tx);

        ctx.send_frame(bytes::Bytes::from_static(b"hello")).unwrap();
        assert_eq!(rx.recv().unwrap(), bytes::Bytes::from_static(b"hello"));
    }
}
