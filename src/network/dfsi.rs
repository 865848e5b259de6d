//! V.24 DFSI sub-protocol: an optional transport substitution used when voice frames
//! are carried over a serial link to external fixed station equipment instead of
//! (or in addition to) the UDP peer network.

use crate::error::NetworkError;

/// DFSI control-frame function codes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FscFunction {
    Connect,
    Ack,
    Disconnect,
    Heartbeat,
    SelChan,
    ReportSelModes,
}

impl FscFunction {
    pub fn from_bits(bits: u8) -> Option<Self> {
        use FscFunction::*;
        Some(match bits {
            0x01 => Connect,
            0x02 => Ack,
            0x03 => Disconnect,
            0x04 => Heartbeat,
            0x05 => SelChan,
            0x06 => ReportSelModes,
            _ => return None,
        })
    }

    pub fn to_bits(self) -> u8 {
        use FscFunction::*;
        match self {
            Connect => 0x01,
            Ack => 0x02,
            Disconnect => 0x03,
            Heartbeat => 0x04,
            SelChan => 0x05,
            ReportSelModes => 0x06,
        }
    }
}

/// Minimum and maximum negotiable heartbeat interval, in seconds.
pub const HEARTBEAT_MIN_SECS: u32 = 5;
pub const HEARTBEAT_MAX_SECS: u32 = 30;

/// How long a connected link may go without a heartbeat before it's declared dead.
pub const HEARTBEAT_ABSENCE_TIMEOUT_SECS: u32 = 45;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DfsiState {
    Disconnected,
    Connecting,
    Connected,
}

/// Drives one end of the V.24 DFSI handshake and heartbeat supervision.
pub struct DfsiLink {
    state: DfsiState,
    heartbeat_interval_secs: u32,
    since_heartbeat_secs: u32,
}

impl DfsiLink {
    pub fn new() -> Self {
        DfsiLink {
            state: DfsiState::Disconnected,
            heartbeat_interval_secs: HEARTBEAT_MIN_SECS,
            since_heartbeat_secs: 0,
        }
    }

    pub fn state(&self) -> DfsiState {
        self.state
    }

    pub fn begin_connect(&mut self) {
        self.state = DfsiState::Connecting;
    }

    /// Negotiates the heartbeat interval carried in `FSC_CONNECT`/`FSC_ACK`, clamping
    /// to the allowed range, then completes the handshake.
    pub fn on_connect_ack(&mut self, requested_interval_secs: u32) -> Result<(), NetworkError> {
        if self.state != DfsiState::Connecting {
            return Err(NetworkError::NotAuthorized(0));
        }

        self.heartbeat_interval_secs =
            requested_interval_secs.clamp(HEARTBEAT_MIN_SECS, HEARTBEAT_MAX_SECS);
        self.state = DfsiState::Connected;
        self.since_heartbeat_secs = 0;
        Ok(())
    }

    pub fn on_disconnect(&mut self) {
        self.state = DfsiState::Disconnected;
        self.since_heartbeat_secs = 0;
    }

    pub fn on_heartbeat(&mut self) {
        self.since_heartbeat_secs = 0;
    }

    /// Advances the heartbeat watchdog by `elapsed_secs`; returns `true` if the link
    /// just timed out and fell back to `Disconnected`.
    pub fn tick(&mut self, elapsed_secs: u32) -> bool {
        if self.state != DfsiState::Connected {
            return false;
        }

        self.since_heartbeat_secs += elapsed_secs;
        if self.since_heartbeat_secs >= HEARTBEAT_ABSENCE_TIMEOUT_SECS {
            self.state = DfsiState::Disconnected;
            self.since_heartbeat_secs = 0;
            true
        } else {
            false
        }
    }

    pub fn heartbeat_interval_secs(&self) -> u32 {
        self.heartbeat_interval_secs
    }
}

impl Default for DfsiLink {
    fn default() -> Self {
        DfsiLink::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fsc_function_round_trip() {
        for f in [
            FscFunction::Connect,
            FscFunction::Ack,
            FscFunction::Disconnect,
            FscFunction::Heartbeat,
            FscFunction::SelChan,
            FscFunction::ReportSelModes,
        ] {
            assert_eq!(FscFunction::from_bits(f.to_bits()), Some(f));
        }
    }

    #[test]
    fn test_connect_handshake() {
        let mut link = DfsiLink::new();
        link.begin_connect();
        link.on_connect_ack(10).unwrap();

        assert_eq!(link.state(), DfsiState::Connected);
        assert_eq!(link.heartbeat_interval_secs(), 10);
    }

    #[test]
    fn test_heartbeat_interval_is_clamped() {
        let mut link = DfsiLink::new();
        link.begin_connect();
        link.on_connect_ack(1000).unwrap();
        assert_eq!(link.heartbeat_interval_secs(), HEARTBEAT_MAX_SECS);
    }

    #[test]
    fn test_ack_without_connect_is_rejected() {
        let mut link = DfsiLink::new();
        assert!(link.on_connect_ack(10).is_err());
    }

    #[test]
    fn test_heartbeat_absence_times_out() {
        let mut link = DfsiLink::new();
        link.begin_connect();
        link.on_connect_ack(5).unwrap();

        assert!(!link.tick(HEARTBEAT_ABSENCE_TIMEOUT_SECS - 1));
        assert!(link.tick(1));
        assert_eq!(link.state(), DfsiState::Disconnected);
    }

    #[test]
    fn test_heartbeat_resets_watchdog() {
        let mut link = DfsiLink::new();
        link.begin_connect();
        link.on_connect_ack(5).unwrap();

        link.tick(HEARTBEAT_ABSENCE_TIMEOUT_SECS - 1);
        link.on_heartbeat();
        assert!(!link.tick(HEARTBEAT_ABSENCE_TIMEOUT_SECS - 1));
    }
}
