//! The P25 Control engine: the message-driven state machine that ties framing,
//! trunking signaling, grant admission, and the peer network together.

use std::collections::{HashMap, VecDeque};

use bytes::Bytes;

use crate::bits::Dibit;
use crate::config::EngineConfig;
use crate::consts::NID_DIBITS;
use crate::control::adjacent::AdjacentSiteTable;
use crate::control::grant::{AffiliationTable, GrantTable};
use crate::control::scheduler::{pad_mbf, SignalingDuty, Scheduler, MBF_TSBK_COUNT};
use crate::control::site::{IdentityEntry, IdentityTable, SiteData, SiteStatus};
use crate::error::{Error, FramingError, TrunkingError};
use crate::framing;
use crate::message::nid::DataUnit;
use crate::trunking::fields::{
    encode_adjacent_site, encode_channel_params_update, encode_group_traffic_update,
    Channel, ServiceOptions, SiteOptions, SystemServices, TalkGroup,
};
use crate::trunking::tsbk::{
    GroupVoiceGrant, NetworkStatusBroadcast, ResponseReason, RfssStatusBroadcast,
    ServiceResponse, TSBKFields, TSBKOpcode, TSBKReceiver,
};

/// Resolves a decoded talkgroup to the 32-bit destination ID the grant tables key on.
fn talk_group_to_dst(tg: TalkGroup) -> u32 {
    match tg {
        TalkGroup::Nobody => 0,
        TalkGroup::Default => 1,
        TalkGroup::Everbody => ALL_CALL,
        TalkGroup::Other(n) => n as u32,
    }
}

/// RF-side call state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RfState {
    Listening,
    LateEntry,
    Audio,
    Data,
    Rejected,
    Invalid,
}

/// Network-side call state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NetState {
    Idle,
    Audio,
    Data,
}

/// Reason a grant request was denied, per the admission decision table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GrantDenial {
    PttCollision,
    PttBonk,
    ChannelResourceUnavailable,
}

/// Outcome of the group-voice grant admission decision (§4.3): the decision branches
/// first on whether `dst` already holds a grant. An already-granted destination only
/// needs a source-collision check before its timer is refreshed (touching the grant
/// keeps its existing channel); a fresh request needs a channel on hand before
/// anything else, and is queued rather than denied outright when none is free.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GrantOutcome {
    /// `channel` is the wire-format channel value (the same 16 bits
    /// [`crate::trunking::fields::Channel::to_bits`] produces) to echo back in the
    /// grant TSBK.
    Granted { channel: u16 },
    /// No channel was free; the requester should retry rather than being told no.
    Queued,
    Denied(GrantDenial),
}

/// All-call destination sentinel: always admitted without a grant record.
const ALL_CALL: u32 = 0xFFFF;

struct HangEntry {
    source: u32,
    remaining_ms: u32,
}

/// The control-channel engine: owns every piece of per-site state and drives it from
/// RF-side TSBKs, network-side frames, and the tick clock.
pub struct Control {
    pub site: SiteData,
    pub identities: IdentityTable,
    pub grants: GrantTable,
    pub affiliations: AffiliationTable,
    pub adjacent: AdjacentSiteTable,
    pub config: EngineConfig,

    scheduler: Scheduler,
    rf_state: RfState,
    net_state: NetState,
    tsbk_rx: TSBKReceiver,
    interrupted: bool,
    is_control_channel: bool,
    mbf_queued: usize,
    hang: HashMap<u32, HangEntry>,
    free_channels: VecDeque<u16>,
    outbound: VecDeque<Bytes>,
    site_status: SiteStatus,
}

impl Control {
    pub fn new(site: SiteData, identities: IdentityTable, config: EngineConfig, is_control_channel: bool) -> Self {
        Control {
            site,
            identities,
            grants: GrantTable::new(),
            affiliations: AffiliationTable::new(),
            adjacent: AdjacentSiteTable::new(),
            config,
            scheduler: Scheduler::new(),
            rf_state: RfState::Listening,
            net_state: NetState::Idle,
            tsbk_rx: TSBKReceiver::new(),
            interrupted: false,
            is_control_channel,
            mbf_queued: 0,
            hang: HashMap::new(),
            free_channels: VecDeque::new(),
            outbound: VecDeque::new(),
            site_status: SiteStatus::new(),
        }
    }

    /// Current site status (active-grant count and other figures reported out in
    /// status broadcasts), synced from the grant table on every tick and admission.
    pub fn site_status(&self) -> SiteStatus {
        self.site_status
    }

    /// Registers a voice channel as available for grant admission.
    pub fn add_free_channel(&mut self, channel: u16) {
        self.free_channels.push_back(channel);
    }

    pub fn rf_state(&self) -> RfState {
        self.rf_state
    }

    pub fn net_state(&self) -> NetState {
        self.net_state
    }

    /// Drives one modem frame (already sync-aligned) through the RF pipeline.
    pub fn process_rf(&mut self, frame: &[Dibit]) -> Result<(), Error> {
        let nid = match framing::decode_nid(frame) {
            Ok(nid) => nid,
            Err(FramingError::UnknownDataUnit(_)) | Err(FramingError::SyncNotFound) => {
                // Undecodable NID: caller stays in its current state.
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if nid.data_unit != DataUnit::TrunkingSignaling {
            self.interrupted = true;
        }

        match nid.data_unit {
            DataUnit::TrunkingSignaling => self.process_tsbk_frame(&frame[NID_DIBITS..]),
            DataUnit::VoiceSimpleTerminator | DataUnit::VoiceLCTerminator => {
                self.rf_state = RfState::Listening;
                Ok(())
            }
            DataUnit::VoiceHeader => {
                self.rf_state = RfState::Audio;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn process_tsbk_frame(&mut self, payload: &[Dibit]) -> Result<(), Error> {
        self.tsbk_rx = TSBKReceiver::new();

        for &dibit in payload {
            if let Some(result) = self.tsbk_rx.feed(dibit) {
                let tsbk = result.map_err(TrunkingError::from)?;
                self.handle_tsbk(tsbk)?;
            }
        }

        Ok(())
    }

    fn handle_tsbk(&mut self, tsbk: TSBKFields) -> Result<(), Error> {
        if !tsbk.crc_valid() {
            return Err(TrunkingError::BadCrc.into());
        }

        let opcode = tsbk.opcode().ok_or(TrunkingError::UnsupportedOpcode(0))?;

        if opcode == TSBKOpcode::GroupVoiceGrant {
            let req = GroupVoiceGrant::new(tsbk);
            let dst = talk_group_to_dst(req.talk_group());
            let outcome = self.admit_group_grant(req.src_unit(), dst, false);
            self.respond_to_group_grant(outcome, req.opts(), req.talk_group(), req.src_unit());
        }

        Ok(())
    }

    /// Builds and queues the response TSBK for a group-voice grant outcome (§4.3/§8
    /// scenarios 5-6): a grant echoes the assigned channel back to the requester, a
    /// channel-starved request gets a queued response rather than an outright denial,
    /// and anything else gets an explicit deny response.
    fn respond_to_group_grant(&mut self, outcome: GrantOutcome, opts: ServiceOptions, talk_group: TalkGroup, src_unit: u32) {
        let tsbk = match outcome {
            GrantOutcome::Granted { channel } => {
                let channel = Channel::new(&channel.to_be_bytes());
                GroupVoiceGrant::build(true, opts, channel, talk_group, src_unit)
            }
            GrantOutcome::Queued => ServiceResponse::build(
                true,
                TSBKOpcode::GroupVoiceGrant,
                ResponseReason::ChannelResourceUnavailable,
                talk_group,
                src_unit,
            ),
            GrantOutcome::Denied(reason) => ServiceResponse::build(
                false,
                TSBKOpcode::GroupVoiceGrant,
                match reason {
                    GrantDenial::ChannelResourceUnavailable => ResponseReason::ChannelResourceUnavailable,
                    GrantDenial::PttCollision | GrantDenial::PttBonk => ResponseReason::PttCollision,
                },
                talk_group,
                src_unit,
            ),
        };

        self.queue_tsbk(tsbk);
        self.sync_site_status();
    }

    /// Decision table for voice channel grant admission (§4.3). Branches first on
    /// whether `dst` already holds a grant: an existing grant only needs a
    /// source-collision check before its timer is touched (an active call's own
    /// continuation would otherwise be rejected by an RF-busy check against its own
    /// audio), while a fresh request needs a channel on hand before the RF-busy and
    /// talkgroup-hang checks even matter.
    pub fn admit_group_grant(&mut self, src: u32, dst: u32, net_originated: bool) -> GrantOutcome {
        if dst == ALL_CALL {
            return match self.free_channels.front().copied() {
                Some(channel) => GrantOutcome::Granted { channel },
                None => GrantOutcome::Queued,
            };
        }

        let duration_ms = self.config.grant_timer_secs * 1000;

        if self.grants.is_granted(dst) {
            if let Some(existing_source) = self.grants.granted_source(dst) {
                if existing_source != src && self.config.grant_source_check {
                    return GrantOutcome::Denied(GrantDenial::PttCollision);
                }
            }

            let channel = self.grants.grant(dst, src, duration_ms, true, net_originated, None)
                .expect("regrant of an already-granted destination never needs a free channel");

            self.rf_state = RfState::Audio;
            self.hang.insert(dst, HangEntry { source: src, remaining_ms: self.config.hang_timer_secs * 1000 });

            return GrantOutcome::Granted { channel };
        }

        if !matches!(self.rf_state, RfState::Listening | RfState::Data) {
            return GrantOutcome::Denied(GrantDenial::PttCollision);
        }

        if let Some(hang) = self.hang.get(&dst) {
            if hang.source != src {
                return GrantOutcome::Denied(GrantDenial::PttBonk);
            }
        }

        let channel = match self.free_channels.pop_front() {
            Some(channel) => channel,
            None => return GrantOutcome::Queued,
        };

        match self.grants.grant(dst, src, duration_ms, true, net_originated, Some(channel)) {
            Ok(channel) => {
                self.rf_state = RfState::Audio;
                self.hang.insert(dst, HangEntry { source: src, remaining_ms: self.config.hang_timer_secs * 1000 });
                GrantOutcome::Granted { channel }
            }
            Err(_) => {
                self.free_channels.push_front(channel);
                GrantOutcome::Denied(GrantDenial::ChannelResourceUnavailable)
            }
        }
    }

    /// Transmission-loss handling (`TAG_LOST`): release the grant, reset RF state.
    pub fn on_transmission_loss(&mut self, dst: u32) {
        if let Some(channel) = self.grants.granted_channel(dst) {
            self.free_channels.push_back(channel);
        }
        self.grants.release_grant(dst, true);
        self.rf_state = RfState::Listening;
        self.sync_site_status();
    }

    /// Dequeues one peer-network frame (stubbed: the caller hands in already-decoded
    /// network traffic; the symmetric RF/net rejection rule lives here).
    pub fn process_net(&mut self, dst: u32, src: u32) -> GrantOutcome {
        if self.rf_state == RfState::Audio {
            return GrantOutcome::Denied(GrantDenial::PttCollision);
        }

        self.net_state = NetState::Audio;
        self.admit_group_grant(src, dst, true)
    }

    /// Pops one fully-framed outbound buffer from the TX queue.
    pub fn get_frame(&mut self) -> Option<Bytes> {
        self.outbound.pop_front()
    }

    pub fn queue_frame(&mut self, frame: Bytes) {
        self.outbound.push_back(frame);
    }

    /// Queues a TSBK's decoded bytes onto the peer-network outbound queue.
    fn queue_tsbk(&mut self, tsbk: TSBKFields) {
        self.queue_frame(Bytes::copy_from_slice(tsbk.as_bytes()));
    }

    /// Refreshes the reported active-grant count from the live grant table.
    fn sync_site_status(&mut self) {
        self.site_status.set_chan_cnt(self.grants.active_count());
    }

    /// Advances all timers and, when configured as a control channel, runs the
    /// signaling cycle scheduler.
    pub fn tick(&mut self, elapsed_ms: u32) {
        let mut any_released = false;
        for dst in self.grants.tick(elapsed_ms) {
            any_released = true;
            if let Some(channel) = self.grants.granted_channel(dst) {
                self.free_channels.push_back(channel);
            }
        }
        if any_released {
            self.sync_site_status();
        }

        self.hang.retain(|_, hang| {
            if hang.remaining_ms <= elapsed_ms {
                false
            } else {
                hang.remaining_ms -= elapsed_ms;
                true
            }
        });

        if elapsed_ms >= 1000 {
            self.adjacent.tick();
        }

        if self.is_control_channel && !self.interrupted {
            let mut duties = self.scheduler.duties();
            duties.truncate(MBF_TSBK_COUNT);
            self.mbf_queued = duties.len();

            for duty in duties {
                self.queue_signaling_duty(duty);
            }

            let parity_even = self.scheduler.frame_count() % 2 == 0;
            let padding = pad_mbf(self.mbf_queued, parity_even);
            self.mbf_queued += padding.len();

            for duty in padding {
                self.queue_signaling_duty(duty);
            }

            self.scheduler.tick();
        }

        self.interrupted = false;
    }

    pub fn pending_duties(&self) -> Vec<SignalingDuty> {
        self.scheduler.duties()
    }

    /// Maps one signaling duty to its TSBK encoding and queues it. Duties with no
    /// opcode recoverable from this crate's decode-derived [`TSBKOpcode`] catalog (the
    /// real P25 standard assigns them one, but nothing in this engine's grounding
    /// material fixes its bit pattern) go out as a [`TSBKOpcode::Reserved`] filler
    /// rather than a fabricated opcode.
    fn queue_signaling_duty(&mut self, duty: SignalingDuty) {
        match duty {
            SignalingDuty::IdenUp => {
                if let Some(entry) = self.identities.get(self.site.channel_id) {
                    let payload = encode_iden_up_payload(self.site.channel_id, entry);
                    self.queue_tsbk(TSBKFields::build(true, false, TSBKOpcode::ChannelParamsUpdate, 0, payload));
                } else {
                    self.queue_tsbk(filler_tsbk());
                }
            }
            SignalingDuty::RfssStatus => {
                let channel = Channel::build(self.site.channel_id, self.site.channel_number);
                let services = SystemServices::new(self.site.service_class);
                self.queue_tsbk(RfssStatusBroadcast::build(
                    0, true, self.site.system_id, self.site.rfss_id, self.site.site_id, channel, services,
                ));
            }
            SignalingDuty::NetStatus => {
                let channel = Channel::build(self.site.channel_id, self.site.channel_number);
                let services = SystemServices::new(self.site.service_class);
                self.queue_tsbk(NetworkStatusBroadcast::build(
                    0, self.site.network_id, self.site.system_id, channel, services,
                ));
            }
            SignalingDuty::GrantUpdate => {
                let mut active = self.grants.active_group_channels().into_iter();
                let mut next_update = || {
                    active.next()
                        .map(|(dst, channel)| (Channel::new(&channel.to_be_bytes()), TalkGroup::from_bits(dst as u16)))
                        .unwrap_or((Channel::build(0, 0), TalkGroup::Nobody))
                };
                let payload = encode_group_traffic_update(next_update(), next_update());
                self.queue_tsbk(TSBKFields::build(true, false, TSBKOpcode::GroupVoiceUpdate, 0, payload));
            }
            SignalingDuty::AdjacentSite => {
                if let Some(neighbor) = self.adjacent.next_round_robin().cloned() {
                    let failing = self.adjacent.is_failed(neighbor.site_id);
                    let opts = SiteOptions::new(0b0001 | if failing { 0b0100 } else { 0 });
                    let channel = Channel::build(neighbor.channel_id, neighbor.channel_number);
                    let services = SystemServices::new(neighbor.service_class);
                    let payload = encode_adjacent_site(
                        0, &opts, neighbor.system_id, neighbor.rfss_id, neighbor.site_id, channel, &services,
                    );
                    self.queue_tsbk(TSBKFields::build(true, false, TSBKOpcode::AdjacentSite, 0, payload));
                } else {
                    self.queue_tsbk(filler_tsbk());
                }
            }
            SignalingDuty::SyncBroadcast
            | SignalingDuty::SndcpAnnounce
            | SignalingDuty::Sccb
            | SignalingDuty::TimeDate
            | SignalingDuty::VendorBsi
            | SignalingDuty::GitHash
            | SignalingDuty::NetworkAdjacentBroadcast => {
                self.queue_tsbk(filler_tsbk());
            }
        }
    }
}

/// A lone reserved-opcode TSBK with no payload, used as filler for signaling duties
/// this engine's grounded opcode catalog has no encoding for.
fn filler_tsbk() -> TSBKFields {
    TSBKFields::build(true, false, TSBKOpcode::Reserved, 0, [0u8; 8])
}

/// Packs a channel identity's tuning parameters back into the raw step-unit fields
/// `encode_channel_params_update` expects, the inverse of the conversions
/// [`crate::trunking::fields::ChannelParams::new`] applies when decoding them.
fn encode_iden_up_payload(id: u8, entry: &IdentityEntry) -> [u8; 8] {
    let base = (entry.base_freq_hz / 5) as u32;
    let bandwidth = ((entry.bandwidth_khz * 1000.0) / 125.0).round() as u16;
    let spacing = ((entry.channel_spacing_khz * 1000.0) / 125.0).round() as u16;

    let offset_hz = (entry.tx_offset_mhz * 1_000_000.0).round() as i32;
    let magnitude = (offset_hz.unsigned_abs() / 250_000) as u16;
    let offset = if offset_hz >= 0 { magnitude | 0x100 } else { magnitude };

    encode_channel_params_update(id, bandwidth, offset, spacing, base)
}
