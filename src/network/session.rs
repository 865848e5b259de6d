//! Per-peer login handshake and keepalive state machine.
//!
//! Mirrors the master/peer connection lifecycle: a peer announces itself with `RPTL`,
//! proves it holds the shared password against a random salt, uploads its JSON
//! configuration, then settles into `Running` where it's kept alive by periodic pings.

use sha2::{Digest, Sha256};

use crate::error::NetworkError;

/// Length of the login challenge salt, in bytes.
pub const SALT_LEN: usize = 4;

/// Connection state of one peer, from the master's point of view.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConnState {
    /// No `RPTL` received yet.
    WaitingConnect,
    /// `RPTL` received, challenge salt sent, awaiting `RPTK`.
    WaitingLogin,
    /// `RPTK` accepted, awaiting `RPTC`.
    WaitingConfig,
    /// Fully connected; processing traffic.
    Running,
}

/// Milliseconds of missing pong traffic before a running peer times out.
pub const LOGIN_TIMEOUT_MS: u64 = 60_000;
/// Ping retry interval, in milliseconds.
pub const PING_INTERVAL_MS: u64 = 1_000;

/// Computes the `RPTK` digest a peer must present: `SHA-256(salt || password)`.
pub fn compute_auth_digest(salt: &[u8; SALT_LEN], password: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password);
    hasher.finalize().into()
}

/// Tracks one peer's connection lifecycle as observed by the master.
pub struct PeerSession {
    pub peer_id: u32,
    pub state: ConnState,
    salt: [u8; SALT_LEN],
    since_activity_ms: u64,
}

impl PeerSession {
    pub fn new(peer_id: u32, salt: [u8; SALT_LEN]) -> Self {
        PeerSession {
            peer_id,
            state: ConnState::WaitingConnect,
            salt,
            since_activity_ms: 0,
        }
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// Processes an inbound `RPTL`: starts the challenge.
    pub fn on_login(&mut self) {
        self.state = ConnState::WaitingLogin;
        self.since_activity_ms = 0;
    }

    /// Processes an inbound `RPTK`, checking the peer's digest against the expected
    /// one computed from the configured password.
    pub fn on_auth(&mut self, digest: &[u8; 32], password: &[u8]) -> Result<(), NetworkError> {
        if self.state != ConnState::WaitingLogin {
            return Err(NetworkError::NotAuthorized(self.peer_id));
        }

        let expected = compute_auth_digest(&self.salt, password);
        if &expected != digest {
            self.state = ConnState::WaitingConnect;
            return Err(NetworkError::AuthenticationFailed(self.peer_id));
        }

        self.state = ConnState::WaitingConfig;
        self.since_activity_ms = 0;
        Ok(())
    }

    /// Processes an inbound `RPTC`, completing the handshake.
    pub fn on_config(&mut self) -> Result<(), NetworkError> {
        if self.state != ConnState::WaitingConfig {
            return Err(NetworkError::NotAuthorized(self.peer_id));
        }

        self.state = ConnState::Running;
        self.since_activity_ms = 0;
        Ok(())
    }

    /// Records a ping/pong or any other traffic, resetting the watchdog.
    pub fn touch(&mut self) {
        self.since_activity_ms = 0;
    }

    /// Advances the inactivity watchdog; returns `true` once the session has timed out
    /// and should be dropped back to `WaitingConnect`.
    pub fn tick(&mut self, elapsed_ms: u64) -> bool {
        self.since_activity_ms += elapsed_ms;

        let timeout = match self.state {
            ConnState::WaitingConnect => return false,
            ConnState::Running => LOGIN_TIMEOUT_MS,
            _ => LOGIN_TIMEOUT_MS,
        };

        if self.since_activity_ms >= timeout {
            self.state = ConnState::WaitingConnect;
            self.since_activity_ms = 0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SALT: [u8; SALT_LEN] = [0xDE, 0xAD, 0xBE, 0xEF];
    const PASSWORD: &[u8] = b"passw0rd";

    #[test]
    fn test_compute_auth_digest_matches_manual_sha256() {
        let mut hasher = Sha256::new();
        hasher.update(SALT);
        hasher.update(PASSWORD);
        let expected: [u8; 32] = hasher.finalize().into();

        assert_eq!(compute_auth_digest(&SALT, PASSWORD), expected);
    }

    #[test]
    fn test_full_handshake_reaches_running() {
        let mut session = PeerSession::new(1, SALT);
        session.on_login();
        assert_eq!(session.state, ConnState::WaitingLogin);

        let digest = compute_auth_digest(&SALT, PASSWORD);
        session.on_auth(&digest, PASSWORD).unwrap();
        assert_eq!(session.state, ConnState::WaitingConfig);

        session.on_config().unwrap();
        assert_eq!(session.state, ConnState::Running);
    }

    #[test]
    fn test_bad_auth_digest_resets_to_waiting_connect() {
        let mut session = PeerSession::new(1, SALT);
        session.on_login();

        let err = session.on_auth(&[0u8; 32], PASSWORD).unwrap_err();
        assert_eq!(err, NetworkError::AuthenticationFailed(1));
        assert_eq!(session.state, ConnState::WaitingConnect);
    }

    #[test]
    fn test_config_out_of_order_is_rejected() {
        let mut session = PeerSession::new(1, SALT);
        assert!(session.on_config().is_err());
    }

    #[test]
    fn test_running_session_times_out_after_watchdog() {
        let mut session = PeerSession::new(1, SALT);
        session.state = ConnState::Running;

        assert!(!session.tick(LOGIN_TIMEOUT_MS - 1));
        assert!(session.tick(1));
        assert_eq!(session.state, ConnState::WaitingConnect);
    }

    #[test]
    fn test_touch_resets_watchdog() {
        let mut session = PeerSession::new(1, SALT);
        session.state = ConnState::Running;

        session.tick(LOGIN_TIMEOUT_MS - 1);
        session.touch();
        assert!(!session.tick(LOGIN_TIMEOUT_MS - 1));
    }
}
