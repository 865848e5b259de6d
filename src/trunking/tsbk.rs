//! Receive Trunking Signalling Block (TSBK) packets and decode the various TSBK payloads.

use collect_slice::CollectSlice;

use crate::bits::{Dibit, DibitBytes};
use crate::buffer::Buffer;
use crate::coding::trellis::{self, TrellisFSM, DibitStates};
use crate::consts::CODING_DIBITS;
use crate::trunking::consts::{TSBK_DIBITS, TSBK_BYTES};
use crate::crc;
use crate::interleave::{self, Interleaver};
use crate::error::{Result, CodingError};
use crate::util::{slice_u16, slice_u24, write_u24};

crate::storage_type!(DataPayloadStorage, [Dibit; CODING_DIBITS]);

use crate::trunking::fields::{
    Channel,
    TalkGroup,
    SystemServices,
    ServiceOptions,
    SiteOptions,
};

/// State machine for receiving a TSBK packet.
///
/// The state machine consumes dibit symbols and performs the following steps:
///
/// 1. Buffer dibits until a full packet's worth are available
/// 2. Descramble symbols using the same deinterleaver as data packets
/// 3. Decode 1/2-rate convolutional code and attempt to correct any errors
/// 4. Group dibits into a buffer of bytes for further interpretation
pub struct TSBKReceiver {
    /// Current buffered dibits.
    dibits: Buffer<DataPayloadStorage>,
}

impl TSBKReceiver {
    /// Create a new `TSBKReceiver` in the initial state.
    pub fn new() -> TSBKReceiver {
        TSBKReceiver {
            dibits: Buffer::new(DataPayloadStorage::new()),
        }
    }

    /// Feed in a baseband symbol, possibly producing a complete TSBK packet. Return
    /// `Some(Ok(pkt))` if a packet was successfully received, `Some(Err(err))` if an
    /// error occurred, and `None` in the case of no event.
    pub fn feed(&mut self, dibit: Dibit) -> Option<Result<TSBKFields>> {
        let (count, dibits) = {
            let buf = match self.dibits.feed(dibit) {
                Some(buf) => buf,
                None => return None,
            };

            let mut dibits = [Dibit::default(); TSBK_DIBITS];
            let count = trellis::DibitDecoder::new(interleave::Deinterleaver::new(buf))
                .filter_map(|x| x.ok())
                .collect_slice(&mut dibits[..]);

            (count, dibits)
        };

        if count != dibits.len() {
            return Some(Err(CodingError::ViterbiUnrecoverable));
        }

        let mut bytes = [0; TSBK_BYTES];
        DibitBytes::new(dibits.iter().cloned()).collect_slice_checked(&mut bytes[..]);

        Some(Ok(TSBKFields::new(bytes)))
    }
}

/// Type of a TSBK payload.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TSBKOpcode {
    GroupVoiceGrant,
    GroupVoiceUpdate,
    GroupVoiceUpdateExplicit,
    UnitVoiceGrant,
    UnitCallRequest,
    UnitVoiceUpdate,
    PhoneGrant,
    PhoneCallRequest,
    UnitDataGrant,
    GroupDataGrant,
    GroupDataUpdate,
    GroupDataUpdateExplicit,
    UnitStatusUpdate,
    UnitStatusQuery,
    UnitShortMessage,
    UnitMonitor,
    UnitCallAlert,
    AckResponse,
    QueuedResponse,
    ExtendedFunctionResponse,
    DenyResponse,
    GroupAffiliationResponse,
    GroupAffiliationQuery,
    LocRegisterResponse,
    UnitRegisterResponse,
    UnitRegisterCommand,
    UnitAuthCommand,
    UnitDeregisterAck,
    RoamingAddrCommand,
    RoamingAddrUpdate,
    SystemServiceBroadcast,
    AltControlChannel,
    RfssStatusBroadcast,
    NetworkStatusBroadcast,
    AdjacentSite,
    ChannelParamsUpdate,
    ProtectionParamBroadcast,
    ProtectionParamUpdate,
    Reserved,
}

impl TSBKOpcode {
    /// Parse an opcode from the given 6 bits.
    pub fn from_bits(bits: u8) -> Option<TSBKOpcode> {
        use self::TSBKOpcode::*;

        assert!(bits >> 6 == 0);

        match bits {
            0b000000 => Some(GroupVoiceGrant),
            0b000001 => Some(Reserved),
            0b000010 => Some(GroupVoiceUpdate),
            0b000011 => Some(GroupVoiceUpdateExplicit),
            0b000100 => Some(UnitVoiceGrant),
            0b000101 => Some(UnitCallRequest),
            0b000110 => Some(UnitVoiceUpdate),
            0b000111 => Some(Reserved),

            0b001000 => Some(PhoneGrant),
            0b001001 => Some(Reserved),
            0b001010 => Some(PhoneCallRequest),
            0b001011..=0b001111 => Some(Reserved),

            0b010000 => Some(UnitDataGrant),
            0b010001 => Some(GroupDataGrant),
            0b010010 => Some(GroupDataUpdate),
            0b010011 => Some(GroupDataUpdateExplicit),
            0b010100..=0b010111 => Some(Reserved),

            0b011000 => Some(UnitStatusUpdate),
            0b011001 => Some(Reserved),
            0b011010 => Some(UnitStatusQuery),
            0b011011 => Some(Reserved),
            0b011100 => Some(UnitShortMessage),
            0b011101 => Some(UnitMonitor),
            0b011110 => Some(Reserved),
            0b011111 => Some(UnitCallAlert),
            0b100000 => Some(AckResponse),
            0b100001 => Some(QueuedResponse),
            0b100010 => Some(Reserved),
            0b100011 => Some(Reserved),
            0b100100 => Some(ExtendedFunctionResponse),
            0b100101 => Some(Reserved),
            0b100110 => Some(Reserved),
            0b100111 => Some(DenyResponse),

            0b101000 => Some(GroupAffiliationResponse),
            0b101001 => Some(Reserved),
            0b101010 => Some(GroupAffiliationQuery),
            0b101011 => Some(LocRegisterResponse),
            0b101100 => Some(UnitRegisterResponse),
            0b101101 => Some(UnitRegisterCommand),
            0b101110 => Some(UnitAuthCommand),
            0b101111 => Some(UnitDeregisterAck),

            0b110000..=0b110101 => Some(Reserved),
            0b110110 => Some(RoamingAddrCommand),
            0b110111 => Some(RoamingAddrUpdate),

            0b111000 => Some(SystemServiceBroadcast),
            0b111001 => Some(AltControlChannel),
            0b111010 => Some(RfssStatusBroadcast),
            0b111011 => Some(NetworkStatusBroadcast),
            0b111100 => Some(AdjacentSite),
            0b111101 => Some(ChannelParamsUpdate),
            0b111110 => Some(ProtectionParamBroadcast),
            0b111111 => Some(ProtectionParamUpdate),

            _ => None,
        }
    }
}

impl TSBKOpcode {
    /// Encode the opcode back to its 6-bit wire representation, the inverse of
    /// [`TSBKOpcode::from_bits`]. `Reserved` encodes to the first reserved slot in the
    /// opcode space, used as a filler for duties with no assigned opcode.
    pub fn to_bits(&self) -> u8 {
        use self::TSBKOpcode::*;

        match *self {
            GroupVoiceGrant => 0b000000,
            Reserved => 0b000001,
            GroupVoiceUpdate => 0b000010,
            GroupVoiceUpdateExplicit => 0b000011,
            UnitVoiceGrant => 0b000100,
            UnitCallRequest => 0b000101,
            UnitVoiceUpdate => 0b000110,
            PhoneGrant => 0b001000,
            PhoneCallRequest => 0b001010,
            UnitDataGrant => 0b010000,
            GroupDataGrant => 0b010001,
            GroupDataUpdate => 0b010010,
            GroupDataUpdateExplicit => 0b010011,
            UnitStatusUpdate => 0b011000,
            UnitStatusQuery => 0b011010,
            UnitShortMessage => 0b011100,
            UnitMonitor => 0b011101,
            UnitCallAlert => 0b011111,
            AckResponse => 0b100000,
            QueuedResponse => 0b100001,
            ExtendedFunctionResponse => 0b100100,
            DenyResponse => 0b100111,
            GroupAffiliationResponse => 0b101000,
            GroupAffiliationQuery => 0b101010,
            LocRegisterResponse => 0b101011,
            UnitRegisterResponse => 0b101100,
            UnitRegisterCommand => 0b101101,
            UnitAuthCommand => 0b101110,
            UnitDeregisterAck => 0b101111,
            RoamingAddrCommand => 0b110110,
            RoamingAddrUpdate => 0b110111,
            SystemServiceBroadcast => 0b111000,
            AltControlChannel => 0b111001,
            RfssStatusBroadcast => 0b111010,
            NetworkStatusBroadcast => 0b111011,
            AdjacentSite => 0b111100,
            ChannelParamsUpdate => 0b111101,
            ProtectionParamBroadcast => 0b111110,
            ProtectionParamUpdate => 0b111111,
        }
    }
}

/// Buffer of bytes that represents a TSBK packet.
pub type Buf = [u8; TSBK_BYTES];

/// A Trunking Signalling Block packet.
#[derive(Copy, Clone)]
pub struct TSBKFields(Buf);

impl TSBKFields {
    /// Interpret the given bytes as a TSBK packet.
    pub fn new(buf: Buf) -> TSBKFields { TSBKFields(buf) }

    /// Whether this packet is the last one in the TSBK group.
    pub fn is_tail(&self) -> bool { self.0[0] >> 7 == 1 }
    /// Whether the packet is encrypted.
    pub fn protected(&self) -> bool { self.0[0] >> 6 & 1 == 1 }
    /// Type of data contained in the payload.
    pub fn opcode(&self) -> Option<TSBKOpcode> { TSBKOpcode::from_bits(self.0[0] & 0x3F) }
    /// Manufacturer ID, which determines if the packet is standardized.
    pub fn mfg(&self) -> u8 { self.0[1] }
    /// Transmitted CRC.
    pub fn crc(&self) -> u16 { slice_u16(&self.0[10..]) }

    /// Calculate 16-bit CRC over bytes in packet.
    pub fn calc_crc(&self) -> u16 {
        crc::CRC16::new()
            .feed_bytes((&self.0[..10]).iter().cloned())
            .finish() as u16
    }

    /// Verify if the calculated CRC matches the transmitted one.
    pub fn crc_valid(&self) -> bool {
        self.crc() == self.calc_crc()
    }

    /// Bytes that make up the payload of the packet.
    pub fn payload(&self) -> &[u8] { &self.0[2..=9] }

    /// The full 12-byte decoded packet, for handing off to the peer-network outbound
    /// queue as-is.
    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    /// Build a TSBK packet from its constituent fields, computing the trailing CRC.
    /// `is_tail` marks the last block of a multi-block PDU (a lone TSBK is always its
    /// own tail).
    pub fn build(is_tail: bool, protected: bool, opcode: TSBKOpcode, mfg: u8, payload: [u8; 8]) -> TSBKFields {
        let mut buf = [0u8; TSBK_BYTES];

        buf[0] = ((is_tail as u8) << 7) | ((protected as u8) << 6) | (opcode.to_bits() & 0x3F);
        buf[1] = mfg;
        buf[2..10].copy_from_slice(&payload);

        let mut tsbk = TSBKFields(buf);
        let crc = tsbk.calc_crc();
        tsbk.0[10..12].copy_from_slice(&crc.to_be_bytes());

        tsbk
    }

    /// Convolutionally encode and interleave this packet's bytes into the coded dibit
    /// stream carried on the air, the inverse of [`TSBKReceiver::feed`]'s decode
    /// pipeline: bytes are split into dibits, run through the half-rate trellis
    /// encoder, and interleaved into transmission order.
    pub fn encode(&self) -> [Dibit; CODING_DIBITS] {
        let mut coded = [Dibit::default(); CODING_DIBITS];
        let mut fsm = TrellisFSM::<DibitStates>::new();
        let mut idx = 0;

        for dibit in crate::bits::Dibits::new(self.0.iter().cloned()) {
            let (hi, lo) = fsm.feed(dibit);
            coded[idx] = hi;
            coded[idx + 1] = lo;
            idx += 2;
        }

        let (hi, lo) = fsm.finish();
        coded[idx] = hi;
        coded[idx + 1] = lo;

        let mut out = [Dibit::default(); CODING_DIBITS];
        let _: usize = Interleaver::new(coded).collect_slice(&mut out[..]);
        out
    }
}

pub struct GroupVoiceGrant(Buf);

impl GroupVoiceGrant {
    pub fn new(tsbk: TSBKFields) -> Self { GroupVoiceGrant(tsbk.0) }

    pub fn opts(&self) -> ServiceOptions { ServiceOptions::new(self.0[2]) }
    pub fn channel(&self) -> Channel { Channel::new(&self.0[3..]) }
    pub fn talk_group(&self) -> TalkGroup { TalkGroup::new(&self.0[5..]) }
    pub fn src_unit(&self) -> u32 { slice_u24(&self.0[7..]) }

    /// Build the outbound TSBK payload for a granted group voice channel.
    pub fn build(is_tail: bool, opts: ServiceOptions, channel: Channel, talk_group: TalkGroup, src_unit: u32) -> TSBKFields {
        let mut payload = [0u8; 8];

        payload[0] = opts.to_byte();
        payload[1..3].copy_from_slice(&channel.to_bits().to_be_bytes());
        payload[3..5].copy_from_slice(&talk_group.to_bits().to_be_bytes());
        write_u24(&mut payload[5..8], src_unit);

        TSBKFields::build(is_tail, false, TSBKOpcode::GroupVoiceGrant, 0, payload)
    }
}

/// Reason a channel grant request was denied or queued, echoed back in a
/// [`DenyResponse`]/[`QueuedResponse`] TSBK. These are internal reason codes local to
/// this implementation rather than standardized values, in the same spirit as this
/// crate's other small locally-defined reason enums.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ResponseReason {
    /// The requested talkgroup/unit is already using a channel for a different source.
    PttCollision,
    /// No channel is currently available to grant.
    ChannelResourceUnavailable,
    /// Other/unspecified reason.
    Other,
}

impl ResponseReason {
    pub fn to_byte(&self) -> u8 {
        match *self {
            ResponseReason::PttCollision => 0,
            ResponseReason::ChannelResourceUnavailable => 1,
            ResponseReason::Other => 0xFF,
        }
    }

    pub fn from_byte(byte: u8) -> ResponseReason {
        match byte {
            0 => ResponseReason::PttCollision,
            1 => ResponseReason::ChannelResourceUnavailable,
            _ => ResponseReason::Other,
        }
    }
}

/// A response to a request for service that could not be granted outright: either an
/// outright denial ([`TSBKOpcode::DenyResponse`]) or a request placed in a wait queue
/// ([`TSBKOpcode::QueuedResponse`]).
pub struct ServiceResponse(Buf);

impl ServiceResponse {
    pub fn new(tsbk: TSBKFields) -> Self { ServiceResponse(tsbk.0) }

    /// Opcode of the service that was denied or queued.
    pub fn denied_opcode(&self) -> u8 { self.0[2] & 0x3F }
    pub fn reason(&self) -> ResponseReason { ResponseReason::from_byte(self.0[3]) }
    pub fn talk_group(&self) -> TalkGroup { TalkGroup::new(&self.0[4..]) }
    pub fn src_unit(&self) -> u32 { slice_u24(&self.0[6..]) }

    /// Build a deny or queue response TSBK for the given denied service request.
    pub fn build(queued: bool, denied: TSBKOpcode, reason: ResponseReason, talk_group: TalkGroup, src_unit: u32) -> TSBKFields {
        let mut payload = [0u8; 8];

        payload[0] = denied.to_bits() & 0x3F;
        payload[1] = reason.to_byte();
        payload[2..4].copy_from_slice(&talk_group.to_bits().to_be_bytes());
        write_u24(&mut payload[4..7], src_unit);

        let opcode = if queued { TSBKOpcode::QueuedResponse } else { TSBKOpcode::DenyResponse };
        TSBKFields::build(true, false, opcode, 0, payload)
    }
}

pub struct GroupVoiceUpdateExplicit(Buf);

impl GroupVoiceUpdateExplicit {
    pub fn new(tsbk: TSBKFields) -> Self { GroupVoiceUpdateExplicit(tsbk.0) }

    pub fn opts(&self) -> ServiceOptions { ServiceOptions::new(self.0[2]) }
    pub fn tx_channel(&self) -> Channel { Channel::new(&self.0[4..]) }
    pub fn rx_channel(&self) -> Channel { Channel::new(&self.0[6..]) }
    pub fn talk_group(&self) -> TalkGroup { TalkGroup::new(&self.0[8..]) }
}

pub struct UnitVoiceGrant(Buf);

impl UnitVoiceGrant {
    pub fn new(tsbk: TSBKFields) -> Self { UnitVoiceGrant(tsbk.0) }

    pub fn channel(&self) -> Channel { Channel::new(&self.0[2..]) }
    pub fn dest_unit(&self) -> u32 { slice_u24(&self.0[4..]) }
    pub fn src_unit(&self) -> u32 { slice_u24(&self.0[7..]) }
}

pub struct UnitCallRequest(Buf);

impl UnitCallRequest {
    pub fn new(tsbk: TSBKFields) -> Self { UnitCallRequest(tsbk.0) }

    pub fn opts(&self) -> ServiceOptions { ServiceOptions::new(self.0[2]) }
    pub fn dest_unit(&self) -> u32 { slice_u24(&self.0[4..]) }
    pub fn src_id(&self) -> u32 { slice_u24(&self.0[7..]) }
}

pub struct UnitVoiceUpdate(Buf);

impl UnitVoiceUpdate {
    pub fn new(tsbk: TSBKFields) -> Self { UnitVoiceUpdate(tsbk.0) }

    pub fn channel(&self) -> Channel { Channel::new(&self.0[2..]) }
    pub fn dest_unit(&self) -> u32 { slice_u24(&self.0[4..]) }
    pub fn src_unit(&self) -> u32 { slice_u24(&self.0[7..]) }
}

pub struct PhoneGrant(Buf);

impl PhoneGrant {
    pub fn new(tsbk: TSBKFields) -> Self { PhoneGrant(tsbk.0) }

    pub fn opts(&self) -> ServiceOptions { ServiceOptions::new(self.0[2]) }
    pub fn channel(&self) -> Channel { Channel::new(&self.0[3..]) }
    pub fn call_timer(&self) -> u16 { slice_u16(&self.0[5..]) }
    pub fn unit(&self) -> u32 { slice_u24(&self.0[7..]) }
}

pub struct UnitDataGrant(Buf);

impl UnitDataGrant {
    pub fn new(tsbk: TSBKFields) -> Self { UnitDataGrant(tsbk.0) }

    pub fn channel(&self) -> Channel { Channel::new(&self.0[2..]) }
    pub fn dest_unit(&self) -> u32 { slice_u24(&self.0[4..]) }
    pub fn src_unit(&self) -> u32 { slice_u24(&self.0[7..]) }
}

/// Site and RFSS information of current control channel.
pub struct RfssStatusBroadcast(Buf);

impl RfssStatusBroadcast {
    /// Create a new `RfssStatusBroadcast` decoder from base TSBK decoder.
    pub fn new(tsbk: TSBKFields) -> Self { RfssStatusBroadcast(tsbk.0) }

    /// Location registration area of current site.
    pub fn area(&self) -> u8 { self.0[2] }
    /// Whether the site is networked with the RFSS controller, which determines if it can
    /// communicate with other sites.
    pub fn networked(&self) -> bool { self.0[3] & 0b10000 != 0 }
    /// System ID of current site within WACN.
    pub fn system(&self) -> u16 { slice_u16(&self.0[3..=4]) & 0xFFF }
    /// RF Subsystem ID of current site within System.
    pub fn rfss(&self) -> u8 { self.0[5] }
    /// Site ID of current site within RFSS.
    pub fn site(&self) -> u8 { self.0[6] }
    /// Channel information for computing TX/RX frequencies.
    pub fn channel(&self) -> Channel { Channel::new(&self.0[7..=8]) }
    /// Services supported by the current site.
    pub fn services(&self) -> SystemServices { SystemServices::new(self.0[9]) }

    /// Build the outbound TSBK for a periodic RFSS status broadcast.
    pub fn build(area: u8, networked: bool, system: u16, rfss: u8, site: u8, channel: Channel, services: SystemServices) -> TSBKFields {
        let payload = crate::trunking::fields::encode_rfss_status_broadcast(area, networked, system, rfss, site, channel, &services);
        TSBKFields::build(true, false, TSBKOpcode::RfssStatusBroadcast, 0, payload)
    }
}

/// WACN (Wide Area Communication Network) and System ID information of current control
/// channel.
pub struct NetworkStatusBroadcast(Buf);

impl NetworkStatusBroadcast {
    /// Create a new `NetworkStatusBroadcast` decoder from the base TSBK decoder.
    pub fn new(tsbk: TSBKFields) -> Self { NetworkStatusBroadcast(tsbk.0) }

    /// Location registration area of site.
    pub fn area(&self) -> u8 { self.0[2] }
    /// WACN ID within the communications network.
    pub fn wacn(&self) -> u32 { slice_u24(&self.0[3..]) >> 4 }
    /// System ID of site within WACN.
    pub fn system(&self) -> u16 { slice_u16(&self.0[5..]) & 0xFFF }
    /// Channel information for computing TX/RX frequencies.
    pub fn channel(&self) -> Channel { Channel::new(&self.0[7..]) }
    /// Services supported by the current site.
    pub fn services(&self) -> SystemServices { SystemServices::new(self.0[9]) }

    /// Build the outbound TSBK for a periodic network status broadcast.
    pub fn build(area: u8, wacn: u32, system: u16, channel: Channel, services: SystemServices) -> TSBKFields {
        let payload = crate::trunking::fields::encode_network_status_broadcast(area, wacn, system, channel, &services);
        TSBKFields::build(true, false, TSBKOpcode::NetworkStatusBroadcast, 0, payload)
    }
}

/// Status of current site.
pub struct SiteStatusBroadcast(Buf);

impl SiteStatusBroadcast {
    /// Create a new `SiteStatusBroadcast` decoder from base TSBK decoder.
    pub fn new(tsbk: TSBKFields) -> Self { SiteStatusBroadcast(tsbk.0) }

    /// Location registration area of site.
    pub fn area(&self) -> u8 { self.0[2] }
    /// Properties of current site.
    pub fn opts(&self) -> SiteOptions { SiteOptions::new(self.0[3] >> 4) }
    /// System ID of site within WACN.
    pub fn system(&self) -> u16 { slice_u16(&self.0[3..]) & 0xFFF }
    /// RF Subsystem ID of site within System.
    pub fn rfss(&self) -> u8 { self.0[5] }
    /// Site ID of site within RFSS.
    pub fn site(&self) -> u8 { self.0[6] }
    /// Channel information for computing TX/RX frequencies.
    pub fn channel(&self) -> Channel { Channel::new(&self.0[7..]) }
    /// Services supported by the site.
    pub fn services(&self) -> SystemServices { SystemServices::new(self.0[9]) }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tsbk_fields() {
        let t = TSBKFields::new([
            0b10111001,
            0b00000001,
            0b11110000,
            0b00001111,
            0b10101010,
            0b01010101,
            0b00000000,
            0b11111111,
            0b11001100,
            0b00110011,
            0b11010111,
            0b11010111,
        ]);

        assert!(t.is_tail());
        assert!(!t.protected());
        assert_eq!(t.opcode(), Some(TSBKOpcode::AltControlChannel));
        assert_eq!(t.mfg(), 0b00000001);
        assert_eq!(t.crc(), 0b1101011111010111);
        assert_eq!(t.calc_crc(), 0b0111010000111100);
        assert!(!t.crc_valid());
        assert_eq!(t.payload(), &[
            0b11110000,
            0b00001111,
            0b10101010,
            0b01010101,
            0b00000000,
            0b11111111,
            0b11001100,
            0b00110011,
        ]);
    }

    #[test]
    fn test_adjacent_site() {
        let t = TSBKFields::new([
            0b00000000,
            0b00000000,
            0b11001100,
            0b11011111,
            0b00111100,
            0b10101010,
            0b01010101,
            0b00110110,
            0b01111110,
            0b01010001,
            0b00000000,
            0b00000000,
        ]);
        let a = AdjacentSite::new(t.payload());

        assert_eq!(a.area(), 0b11001100);
        assert!(a.opts().conventional());
        assert!(a.opts().failing());
        assert!(!a.opts().current());
        assert!(a.opts().networked());
        assert_eq!(a.system(), 0b111100111100);
        assert_eq!(a.rfss(), 0b10101010);
        assert_eq!(a.site(), 0b01010101);
        assert_eq!(a.channel().id(), 0b0011);
        assert_eq!(a.channel().number(), 0b011001111110);
        let s = a.services();
        assert!(s.is_composite());
        assert!(!s.updates_only());
        assert!(!s.is_backup());
        assert!(s.has_data());
        assert!(!s.has_voice());
        assert!(s.has_registration());
        assert!(!s.has_auth());
    }

    #[test]
    fn test_channel_params_update() {
        let t = TSBKFields::new([
            0b00111101,
            0b00000000,
            0b0110_0011,
            0b00100_010,
            0b110100_00,
            0b00110010,
            0b00001010,
            0b00100101,
            0b00010000,
            0b10100010,
            0b11111111,
            0b11111111,
        ]);
        let p = ChannelParamsUpdate::new(t.payload());

        assert_eq!(p.id(), 0b0110);
        assert_eq!(p.params().bandwidth, 12_500);
        assert_eq!(p.params().rx_freq(0b1001), 851_062_500);
    }

    #[test]
    fn test_group_voice_update() {
        let t = TSBKFields::new([
            0b00000010,
            0b00000000,
            0b01101111,
            0b01010101,
            0b11111111,
            0b11111111,
            0b10011010,
            0b10101010,
            0b00110011,
            0b11001100,
            0b00000000,
            0b00000000,
        ]);
        let u = GroupVoiceUpdate::new(t.payload()).updates();

        assert_eq!(u[0].0.id(), 0b0110);
        assert_eq!(u[0].0.number(), 0b111101010101);
        assert_eq!(u[0].1, TalkGroup::Everbody);
        assert_eq!(u[1].0.id(), 0b1001);
        assert_eq!(u[1].0.number(), 0b101010101010);
        assert_eq!(u[1].1, TalkGroup::Other(0b0011001111001100));
    }

    #[test]
    fn test_alt_control_channel() {
        let t = TSBKFields::new([
            0b00111001,
            0b00000000,
            0b11100011,
            0b01010101,
            0b10110110,
            0b10101111,
            0b01010001,
            0b11101010,
            0b10101010,
            0b10101110,
            0b00000000,
            0b11111111,
        ]);
        assert_eq!(t.opcode(), Some(TSBKOpcode::AltControlChannel));
        let a = AltControlChannel::new(t.payload());
        assert_eq!(a.rfss(), 0b11100011);
        assert_eq!(a.site(), 0b01010101);
        let c = a.alts();
        assert_eq!(c[0].0.id(), 0b1011);
        assert_eq!(c[0].0.number(), 0b011010101111);
        let s = c[0].1;
        assert!(s.is_composite());
        assert!(!s.updates_only());
        assert!(!s.is_backup());
        assert!(s.has_data());
        assert!(!s.has_voice());
        assert!(s.has_registration());
        assert!(!s.has_auth());
        assert_eq!(c[1].0.id(), 0b1110);
        assert_eq!(c[1].0.number(), 0b101010101010);
        let s = c[1].1;
        assert!(!s.is_composite());
        assert!(s.updates_only());
        assert!(s.is_backup());
        assert!(!s.has_data());
        assert!(s.has_voice());
        assert!(!s.has_registration());
        assert!(s.has_auth());
    }

    #[test]
    fn test_build_computes_valid_crc() {
        let t = TSBKFields::build(true, false, TSBKOpcode::GroupVoiceGrant, 0x99, [1, 2, 3, 4, 5, 6, 7, 8]);

        assert!(t.is_tail());
        assert!(!t.protected());
        assert_eq!(t.opcode(), Some(TSBKOpcode::GroupVoiceGrant));
        assert_eq!(t.mfg(), 0x99);
        assert!(t.crc_valid());
    }

    #[test]
    fn test_group_voice_grant_build_round_trips_through_decode() {
        let opts = ServiceOptions::new(0b1010_0011);
        let channel = Channel::build(0b0101, 0b0000_1111_0000);
        let talk_group = TalkGroup::Other(4321);

        let t = GroupVoiceGrant::build(true, opts, channel, talk_group, 0x00ABCDEF);
        assert!(t.crc_valid());

        let g = GroupVoiceGrant::new(t);
        assert_eq!(g.channel(), channel);
        assert_eq!(g.talk_group(), talk_group);
        assert_eq!(g.src_unit(), 0x00ABCDEF);
    }

    #[test]
    fn test_service_response_build_round_trips_through_decode() {
        let t = ServiceResponse::build(
            true,
            TSBKOpcode::GroupVoiceGrant,
            ResponseReason::ChannelResourceUnavailable,
            TalkGroup::Other(42),
            7,
        );
        assert!(t.crc_valid());
        assert_eq!(t.opcode(), Some(TSBKOpcode::QueuedResponse));

        let r = ServiceResponse::new(t);
        assert_eq!(r.denied_opcode(), TSBKOpcode::GroupVoiceGrant.to_bits());
        assert_eq!(r.reason(), ResponseReason::ChannelResourceUnavailable);
        assert_eq!(r.talk_group(), TalkGroup::Other(42));
        assert_eq!(r.src_unit(), 7);
    }

    #[test]
    fn test_rfss_status_broadcast_build_round_trips_through_decode() {
        let channel = Channel::build(0b0001, 100);
        let services = SystemServices::new(0b0011_0000);

        let t = RfssStatusBroadcast::build(0x10, true, 0x222, 3, 4, channel, services);
        assert!(t.crc_valid());
        assert_eq!(t.opcode(), Some(TSBKOpcode::RfssStatusBroadcast));

        let r = RfssStatusBroadcast::new(t);
        assert_eq!(r.area(), 0x10);
        assert!(r.networked());
        assert_eq!(r.system(), 0x222);
        assert_eq!(r.channel(), channel);
    }

    #[test]
    fn test_network_status_broadcast_build_round_trips_through_decode() {
        let channel = Channel::build(0b0010, 200);
        let services = SystemServices::new(0b0001_0000);

        let t = NetworkStatusBroadcast::build(0x08, 0xABCDE, 0x111, channel, services);
        assert!(t.crc_valid());

        let n = NetworkStatusBroadcast::new(t);
        assert_eq!(n.wacn(), 0xABCDE);
        assert_eq!(n.system(), 0x111);
        assert_eq!(n.channel(), channel);
    }

    #[test]
    fn test_encode_round_trips_through_tsbk_receiver() {
        let opts = ServiceOptions::new(0b1000_0011);
        let channel = Channel::build(0b0111, 0b0000_0000_1111);
        let talk_group = TalkGroup::Other(1000);

        let built = GroupVoiceGrant::build(true, opts, channel, talk_group, 0xABCDEF);
        let dibits = built.encode();

        let mut receiver = TSBKReceiver::new();
        let mut received = None;
        for dibit in dibits.iter().cloned() {
            if let Some(result) = receiver.feed(dibit) {
                received = Some(result.unwrap());
            }
        }

        let tsbk = received.expect("full TSBK packet should have been received");
        assert!(tsbk.crc_valid());
        assert_eq!(tsbk.opcode(), Some(TSBKOpcode::GroupVoiceGrant));

        let g = GroupVoiceGrant::new(tsbk);
        assert_eq!(g.channel(), channel);
        assert_eq!(g.talk_group(), talk_group);
        assert_eq!(g.src_unit(), 0xABCDEF);
    }
}
