//! Decode Link Control (LC) packets and payloads.

use crate::voice::consts::LINK_CONTROL_BYTES;
use crate::util::{slice_u16, slice_u24};

use crate::trunking::fields::{
    TalkGroup, ServiceOptions, AdjacentSite, ChannelParamsUpdate, GroupTrafficUpdate,
    AltControlChannel, RfssStatusBroadcast, NetworkStatusBroadcast, UnitCallAlert,
    UnitCallRequest, PhoneAlert,
};

/// Buffer of bytes that represents a link control packet.
pub type Buf = [u8; LINK_CONTROL_BYTES];

/// Type of a link control payload.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LinkControlOpcode {
    GroupVoiceTraffic,
    GroupVoiceUpdate,
    UnitVoiceTraffic,
    GroupVoiceUpdateExplicit,
    UnitCallRequest,
    PhoneTraffic,
    PhoneAlert,
    CallTermination,
    GroupAffiliationQuery,
    UnitRegistrationRequest,
    UnitAuthenticationRequst,
    UnitStatusRequest,
    SystemServiceBroadcast,
    AltControlChannel,
    AdjacentSite,
    RfssStatusBroadcast,
    NetworkStatusBroadcast,
    UnitStatusUpdate,
    UnitShortMessage,
    UnitCallAlert,
    ExtendedFunction,
    ChannelParamsUpdate,
    ProtectionParamBroadcast,
    AltControlChannelExplicit,
    AdjacentSiteExplicit,
    ChannelParamsExplicit,
    RfssStatusExplicit,
    NetworkStatusExplicit,
}

impl LinkControlOpcode {
    /// Try to parse an opcode from the given 6 bits.
    pub fn from_bits(bits: u8) -> Option<LinkControlOpcode> {
        use self::LinkControlOpcode::*;

        assert!(bits >> 6 == 0);

        match bits {
            0b000000 => Some(GroupVoiceTraffic),
            0b000010 => Some(GroupVoiceUpdate),
            0b000011 => Some(UnitVoiceTraffic),
            0b000100 => Some(GroupVoiceUpdateExplicit),
            0b000101 => Some(UnitCallRequest),
            0b000110 => Some(PhoneTraffic),
            0b000111 => Some(PhoneAlert),
            0b001111 => Some(CallTermination),
            0b010000 => Some(GroupAffiliationQuery),
            0b010001 => Some(UnitRegistrationRequest),
            0b010010 => Some(UnitAuthenticationRequst),
            0b010011 => Some(UnitStatusRequest),
            0b100000 => Some(SystemServiceBroadcast),
            0b100001 => Some(AltControlChannel),
            0b100010 => Some(AdjacentSite),
            0b100011 => Some(RfssStatusBroadcast),
            0b100100 => Some(NetworkStatusBroadcast),
            0b010100 => Some(UnitStatusUpdate),
            0b010101 => Some(UnitShortMessage),
            0b010110 => Some(UnitCallAlert),
            0b010111 => Some(ExtendedFunction),
            0b011000 => Some(ChannelParamsUpdate),
            0b100101 => Some(ProtectionParamBroadcast),
            0b100110 => Some(AltControlChannelExplicit),
            0b100111 => Some(AdjacentSiteExplicit),
            0b011001 => Some(ChannelParamsExplicit),
            0b101000 => Some(RfssStatusExplicit),
            0b101001 => Some(NetworkStatusExplicit),
            _ => None,
        }
    }
}

/// Base link control decoder, common to all packets.
#[derive(Copy, Clone)]
pub struct LinkControlFields(Buf);

impl LinkControlFields {
    /// Interpret the given bytes as a link control packet.
    pub fn new(buf: Buf) -> Self { LinkControlFields(buf) }

    /// Whether the packet is encrypted.
    pub fn protected(&self) -> bool { self.0[0] >> 7 == 1 }

    /// Type of data contained in the payload.
    pub fn opcode(&self) -> Option<LinkControlOpcode> {
        LinkControlOpcode::from_bits(self.0[0] & 0x3F)
    }

    /// Bytes that make up the payload.
    pub fn payload(&self) -> &[u8] { &self.0[1..=8] }
}

/// Identity of unit transmitting on the current talkgroup traffic channel.
pub struct GroupVoiceTraffic(Buf);

impl GroupVoiceTraffic {
    /// Create a new `GroupVoiceTraffic` from the base LC decoder.
    pub fn new(lc: LinkControlFields) -> Self { GroupVoiceTraffic(lc.0) }

    /// Manufacturer ID of current packet.
    pub fn mfg(&self) -> u8 { self.0[1] }
    /// Service options provided by current traffic channel.
    pub fn opts(&self) -> ServiceOptions { ServiceOptions::new(self.0[2]) }
    /// Current resident talkgroup of traffic channel.
    pub fn talkgroup(&self) -> TalkGroup { TalkGroup::new(&self.0[4..]) }
    /// Address of user currently transmitting.
    pub fn src_unit(&self) -> u32 { slice_u24(&self.0[6..]) }
}

/// Identity of units transmitting on current unit-to-unit traffic channel.
pub struct UnitVoiceTraffic(Buf);

impl UnitVoiceTraffic {
    /// Create a new `UnitVoiceTraffic` from the base LC decoder.
    pub fn new(lc: LinkControlFields) -> Self { UnitVoiceTraffic(lc.0) }

    /// Manufacturer ID of current packet.
    pub fn mfg(&self) -> u8 { self.0[1] }
    /// Service options provided by current traffic channel.
    pub fn opts(&self) -> ServiceOptions { ServiceOptions::new(self.0[2]) }
    /// Destination user address for current transmission.
    pub fn dest_unit(&self) -> u32 { slice_u24(&self.0[3..]) }
    /// Source user address for current transmission.
    pub fn src_unit(&self) -> u32 { slice_u24(&self.0[6..]) }
}

/// Identity of unit participating in current phone call.
pub struct PhoneTraffic(Buf);

impl PhoneTraffic {
    /// Create a new `PhoneTraffic` decoder from the base LC decoder.
    pub fn new(lc: LinkControlFields) -> Self { PhoneTraffic(lc.0) }

    /// Options requested/granted for the traffic channel.
    pub fn opts(&self) -> ServiceOptions { ServiceOptions::new(self.0[2]) }
    /// Maximum amount of time (in units of 100ms) that the phone call can occupy the
    /// traffic channel.
    pub fn call_timer(&self) -> u16 { slice_u16(&self.0[4..=5]) }
    /// Unit participating in call.
    pub fn unit(&self) -> u32 { slice_u24(&self.0[6..=8]) }
}
