//! Control-channel signaling cycle: decides, tick by tick, which broadcast TSBK the
//! engine should queue next when running as a dedicated control channel.

/// One outbound signaling duty the engine should discharge this tick. The engine maps
/// each variant to an actual TSBK construction; the scheduler itself only sequences
/// *what* goes out, not its encoded form.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SignalingDuty {
    IdenUp,
    RfssStatus,
    NetStatus,
    SyncBroadcast,
    GrantUpdate,
    SndcpAnnounce,
    AdjacentSite,
    Sccb,
    TimeDate,
    VendorBsi,
    GitHash,
    NetworkAdjacentBroadcast,
}

const TIME_DATE_PERIOD: u32 = 64;
const VENDOR_BSI_PERIOD: u32 = 127;
const GIT_HASH_PERIOD: u32 = 125;
const NETWORK_ADJACENT_PERIOD: u32 = 254;

/// Drives the 9-step (n = 0..=8) per-frame signaling sequence plus the periodic
/// inserts layered on top of it.
pub struct Scheduler {
    frame_count: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler { frame_count: 0 }
    }

    /// Duties for the current frame count's position (`n = frame_count % 9`) in the
    /// base cycle, plus any periodic duty whose period divides `frame_count`.
    pub fn duties(&self) -> Vec<SignalingDuty> {
        let n = self.frame_count % 9;
        let parity_even = self.frame_count % 2 == 0;

        let mut duties = match n {
            0 => vec![SignalingDuty::IdenUp],
            1 => vec![if parity_even { SignalingDuty::RfssStatus } else { SignalingDuty::NetStatus }],
            2 => vec![if parity_even { SignalingDuty::NetStatus } else { SignalingDuty::RfssStatus }],
            3 => vec![if parity_even { SignalingDuty::RfssStatus } else { SignalingDuty::NetStatus }],
            4 => vec![SignalingDuty::SyncBroadcast],
            5 => vec![SignalingDuty::GrantUpdate],
            6 => vec![SignalingDuty::SndcpAnnounce],
            7 => vec![SignalingDuty::AdjacentSite],
            8 => vec![SignalingDuty::Sccb],
            _ => unreachable!(),
        };

        if self.frame_count != 0 && self.frame_count % TIME_DATE_PERIOD == 0 {
            duties.push(SignalingDuty::TimeDate);
        }
        if self.frame_count != 0 && self.frame_count % VENDOR_BSI_PERIOD == 0 {
            duties.push(SignalingDuty::VendorBsi);
        }
        if self.frame_count != 0 && self.frame_count % GIT_HASH_PERIOD == 0 {
            duties.push(SignalingDuty::GitHash);
        }
        if self.frame_count != 0 && self.frame_count % NETWORK_ADJACENT_PERIOD == 0 {
            duties.push(SignalingDuty::NetworkAdjacentBroadcast);
        }

        duties
    }

    pub fn tick(&mut self) {
        self.frame_count = self.frame_count.wrapping_add(1);
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::new()
    }
}

/// Number of TSBKs packed per Multi-Block Frame.
pub const MBF_TSBK_COUNT: usize = 3;

/// Pads a partially-filled MBF slot with status-broadcast fillers so the caller
/// always transmits exactly [`MBF_TSBK_COUNT`] TSBKs per frame. `fillers` produces one
/// filler duty at a time (alternating RFSS/NET per the base cycle's own rule).
pub fn pad_mbf(queued: usize, parity_even: bool) -> Vec<SignalingDuty> {
    let mut fillers = Vec::new();
    let mut toggle = parity_even;

    for _ in queued..MBF_TSBK_COUNT {
        fillers.push(if toggle { SignalingDuty::RfssStatus } else { SignalingDuty::NetStatus });
        toggle = !toggle;
    }

    fillers
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_base_cycle_n0_is_iden_up() {
        let sched = Scheduler::new();
        assert_eq!(sched.duties(), vec![SignalingDuty::IdenUp]);
    }

    #[test]
    fn test_cycle_advances_through_nine_steps() {
        let mut sched = Scheduler::new();
        for _ in 0..9 {
            sched.tick();
        }
        assert_eq!(sched.frame_count(), 9);
        assert_eq!(sched.duties(), vec![SignalingDuty::IdenUp]);
    }

    #[test]
    fn test_time_date_period() {
        let mut sched = Scheduler::new();
        for _ in 0..TIME_DATE_PERIOD {
            sched.tick();
        }
        assert!(sched.duties().contains(&SignalingDuty::TimeDate));
    }

    #[test]
    fn test_git_hash_period() {
        let mut sched = Scheduler::new();
        for _ in 0..GIT_HASH_PERIOD {
            sched.tick();
        }
        assert!(sched.duties().contains(&SignalingDuty::GitHash));
    }

    #[test]
    fn test_pad_mbf_fills_to_three() {
        let padding = pad_mbf(1, true);
        assert_eq!(padding.len(), 2);
        assert_eq!(padding[0], SignalingDuty::RfssStatus);
        assert_eq!(padding[1], SignalingDuty::NetStatus);
    }

    #[test]
    fn test_pad_mbf_already_full() {
        assert!(pad_mbf(3, true).is_empty());
    }
}
