//! Decode various trunking-related packet fields.

use crate::util::{slice_u16, slice_u24, slice_u32};

/// Options that can be requested/granted by a service.
pub struct ServiceOptions(u8);

impl ServiceOptions {
    /// Create a new `ServiceOptions` based on the given byte.
    pub fn new(opts: u8) -> ServiceOptions { ServiceOptions(opts) }

    /// Whether the service should be processed as an emergency.
    pub fn emergency(&self) -> bool { self.0 >> 7 == 1 }
    /// Whether the channel should be encrypted.
    pub fn protected(&self) -> bool { self.0 >> 6 & 1 == 1 }
    /// Whether the channel should be full duplex for simultaneous transmit and receive
    /// (otherwise fall back to half duplex.)
    pub fn full_duplex(&self) -> bool { self.0 >> 5 & 1 == 1 }
    /// Whether the service should be packet switched (otherwise fall back to circuit
    /// switched.)
    pub fn packet_switched(&self) -> bool { self.0 >> 4 & 1 == 1 }
    /// Priority assigned to service, with 1 as lowest and 7 as highest.
    pub fn prio(&self) -> u8 { self.0 & 0x7 }
    /// Raw byte, for embedding into an outbound TSBK payload.
    pub fn to_byte(&self) -> u8 { self.0 }
}

/// Uniquely identifies a channel within a site.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Channel(u16);

impl Channel {
    /// Create a new `Channel` from the given 16 bits.
    pub fn new(bytes: &[u8]) -> Channel { Channel(slice_u16(bytes)) }

    /// Build a `Channel` from an identity's channel ID and a channel number within it.
    pub fn build(id: u8, number: u16) -> Channel {
        Channel((id as u16 & 0xF) << 12 | (number & 0xFFF))
    }

    /// Channel ID whose parameters to use.
    pub fn id(&self) -> u8 { (self.0 >> 12) as u8 }
    /// Individual channel number within the channel.
    pub fn number(&self) -> u16 { self.0 & 0xFFF }
    /// Encode back to the 16-bit wire representation.
    pub fn to_bits(&self) -> u16 { self.0 }
}

/// Identifies which group a message belongs to.
///
/// In a production P25 system, users can set their radios to receive one or more
/// talkgroups, and the radio will only unsquelch if one of those talkgroups is seen.
/// Additionally, the user directs each transmission to a talkgroup selected on the
/// radio.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TalkGroup {
    /// Includes nobody.
    Nobody,
    /// Default talkgroup when no other is selected.
    Default,
    /// Includes everybody.
    Everbody,
    /// Specific group of users.
    Other(u16),
}

impl TalkGroup {
    /// Parse a talkgroup from the given 16 bit slice.
    pub fn new(bytes: &[u8]) -> TalkGroup {
        Self::from_bits(slice_u16(bytes))
    }

    /// Parse a talkgroup from the given 16 bits.
    pub fn from_bits(bits: u16) -> TalkGroup {
        use self::TalkGroup::*;

        match bits {
            0x0000 => Nobody,
            0x0001 => Default,
            0xFFFF => Everbody,
            _ => Other(bits),
        }
    }

    /// Encode back to the 16-bit wire representation.
    pub fn to_bits(&self) -> u16 {
        use self::TalkGroup::*;

        match *self {
            Nobody => 0x0000,
            Default => 0x0001,
            Everbody => 0xFFFF,
            Other(n) => n,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SystemServices(u8);

impl SystemServices {
    pub fn new(ssc: u8) -> Self { SystemServices(ssc) }

    pub fn is_composite(&self) -> bool { self.0 & 0x01 != 0 }
    pub fn updates_only(&self) -> bool { self.0 & 0x02 != 0 }
    pub fn is_backup(&self) -> bool { self.0 & 0x04 != 0 }
    pub fn has_data(&self) -> bool { self.0 & 0x10 != 0 }
    pub fn has_voice(&self) -> bool { self.0 & 0x20 != 0 }
    pub fn has_registration(&self) -> bool { self.0 & 0x40 != 0 }
    pub fn has_auth(&self) -> bool { self.0 & 0x80 != 0 }
    /// Raw byte, for embedding into an outbound TSBK payload.
    pub fn to_byte(&self) -> u8 { self.0 }
}

/// Maps channel identifiers (maximum 16 per control channel) to their tuning parameters.
pub type ChannelParamsMap = [Option<ChannelParams>; 16];

/// Computes TX/RX frequencies and bandwidth for channel numbers within a site.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ChannelParams {
    /// Base frequency in Hz.
    base: u32,
    /// Channel spacing in Hz.
    spacing: u32,
    /// Transmit frequency offset in Hz.
    offset: i32,
    /// Channel bandwidth in Hz.
    pub bandwidth: u32,
}

impl ChannelParams {
    /// Create a new `ChannelParams` from the given base frequency (5Hz steps), bandwidth
    /// (125Hz steps), TX offset (250kHz steps), and inter-channel spacing (125Hz steps.)
    pub fn new(base: u32, bandwidth: u16, offset: u16, spacing: u16) -> ChannelParams {
        // The MSB denotes the sign and the lower byte is the actual offset.
        let off = (offset as i32 & 0xFF) * 250_000;

        ChannelParams {
            base: base * 5,
            spacing: spacing as u32 * 125,
            offset: if offset >> 8 == 0 { -off } else { off },
            bandwidth: bandwidth as u32 * 125,
        }
    }

    /// Receive frequency for the given channel number in Hz.
    pub fn rx_freq(&self, ch: u16) -> u32 {
        self.base + self.spacing * ch as u32
    }

    /// Transmit frequency for the given channel number in Hz.
    pub fn tx_freq(&self, ch: u16) -> u32 {
        self.rx_freq(ch) + self.offset as u32
    }
}

/// Options for a P25 site.
pub struct SiteOptions(u8);

impl SiteOptions {
    /// Create a new `SiteOptions` from the given 4-bit word.
    pub fn new(opts: u8) -> SiteOptions {
        assert!(opts >> 4 == 0);
        SiteOptions(opts)
    }

    /// Whether site is "conventional", with no trunking.
    pub fn conventional(&self) -> bool { self.0 & 0b1000 != 0 }
    /// Whether site is in a failure state.
    pub fn failing(&self) -> bool { self.0 & 0b100 != 0 }
    /// Whether this information is up-to-date (whether broadcasting site is in
    /// communication with adjacent site.)
    pub fn current(&self) -> bool { self.0 & 0b10 != 0 }
    /// Whether site has active network connection with RFSS controller and can
    /// communicate with other sites.
    pub fn networked(&self) -> bool { self.0 & 1 != 0 }
    /// Raw 4-bit word, for embedding into an outbound TSBK payload.
    pub fn to_nibble(&self) -> u8 { self.0 }
}

/// Updates subscribers about new or ongoing talkgroup conversations.
///
/// Note that this can be used for both `GroupVoiceUpdate` and `GroupDataUpdate`.
pub struct GroupTrafficUpdate<'a>(&'a [u8]);

/// Alias for the `GroupVoiceUpdate` TSBK opcode's payload, which uses the same layout as
/// [`GroupTrafficUpdate`].
pub type GroupVoiceUpdate<'a> = GroupTrafficUpdate<'a>;

impl<'a> GroupTrafficUpdate<'a> {
    /// Create a new `GroupTrafficUpdate` decoder from the given payload bytes.
    pub fn new(payload: &'a [u8]) -> Self { GroupTrafficUpdate(payload) }

    /// Retrieve the set of active talkgroups included in the update along with the
    /// parameters for tuning to the traffic channel of each.
    pub fn updates(&self) -> [(Channel, TalkGroup); 2] {
        [
            (Channel::new(&self.0[0..=1]), TalkGroup::new(&self.0[2..=3])),
            (Channel::new(&self.0[4..=5]), TalkGroup::new(&self.0[6..=7])),
        ]
    }
}

/// Packs two active-talkgroup entries into the 8-byte payload `GroupTrafficUpdate`
/// decodes.
pub fn encode_group_traffic_update(first: (Channel, TalkGroup), second: (Channel, TalkGroup)) -> [u8; 8] {
    let mut buf = [0u8; 8];

    buf[0..2].copy_from_slice(&first.0.to_bits().to_be_bytes());
    buf[2..4].copy_from_slice(&first.1.to_bits().to_be_bytes());
    buf[4..6].copy_from_slice(&second.0.to_bits().to_be_bytes());
    buf[6..8].copy_from_slice(&second.1.to_bits().to_be_bytes());

    buf
}

/// Advertisement of an adjacent/nearby site within the same WACN (Wide Area Communication
/// Network.)
pub struct AdjacentSite<'a>(&'a [u8]);

impl<'a> AdjacentSite<'a> {
    /// Create a new `AdjacentSite` decoder from the given payload bytes.
    pub fn new(payload: &'a [u8]) -> Self { AdjacentSite(payload) }

    /// Location registration area of adjacent site, which determines whether a subscriber
    /// must update the network before roaming to the site.
    pub fn area(&self) -> u8 { self.0[0] }
    /// Description of adjacent site.
    pub fn opts(&self) -> SiteOptions { SiteOptions::new(self.0[1] >> 4) }
    /// System ID of adjacent site within WACN.
    pub fn system(&self) -> u16 { slice_u16(&self.0[1..=2]) & 0xFFF }
    /// RF Subsystem ID of adjacent site within the System.
    pub fn rfss(&self) -> u8 { self.0[3] }
    /// Site ID of adjacent site within the RFSS.
    pub fn site(&self) -> u8 { self.0[4] }
    /// Channel information for computing TX/RX frequencies.
    pub fn channel(&self) -> Channel { Channel::new(&self.0[5..=6]) }
    /// Services supported by the adjacent site.
    pub fn services(&self) -> SystemServices { SystemServices::new(self.0[7]) }
}

/// Packs an adjacent-site advertisement into the 8-byte payload `AdjacentSite` decodes.
pub fn encode_adjacent_site(area: u8, opts: &SiteOptions, system: u16, rfss: u8, site: u8, channel: Channel, services: &SystemServices) -> [u8; 8] {
    let mut buf = [0u8; 8];

    buf[0] = area;
    buf[1] = (opts.to_nibble() << 4) | ((system >> 8) & 0xF) as u8;
    buf[2] = (system & 0xFF) as u8;
    buf[3] = rfss;
    buf[4] = site;
    buf[5..7].copy_from_slice(&channel.to_bits().to_be_bytes());
    buf[7] = services.to_byte();

    buf
}

/// Advertisement of parameters used to calculate TX/RX frequencies within the given
/// associated channel.
pub struct ChannelParamsUpdate<'a>(&'a [u8]);

impl<'a> ChannelParamsUpdate<'a> {
    /// Create a new `ChannelParamsUpdate` decoder from the given payload bytes.
    pub fn new(payload: &'a [u8]) -> Self { ChannelParamsUpdate(payload) }

    /// Channel ID associated with the enclosed parameters (can be up to 16 per control
    /// channel.)
    pub fn id(&self) -> u8 { self.0[0] >> 4 }

    /// Parameters for the associated channel.
    pub fn params(&self) -> ChannelParams {
        ChannelParams::new(self.base(), self.bandwidth(), self.offset(), self.spacing())
    }

    /// Bandwidth in steps of 125Hz.
    fn bandwidth(&self) -> u16 {
        (self.0[0] as u16 & 0xF) << 5 | (self.0[1] >> 3) as u16
    }

    /// Offset of TX frequency from base RX frequency in steps of 250kHz.
    fn offset(&self) -> u16 {
        (self.0[1] as u16 & 0x7) << 6 | (self.0[2] >> 2) as u16
    }

    /// Spacing between individual channel numbers in steps of 125Hz.
    fn spacing(&self) -> u16 {
        (self.0[2] as u16 & 0x3) << 8 | self.0[3] as u16
    }

    /// Base RX frequency in steps of 5Hz.
    fn base(&self) -> u32 { slice_u32(&self.0[4..=7]) }
}

/// Packs the raw step-unit fields of a channel identity into the 8-byte payload
/// `ChannelParamsUpdate` decodes, the inverse of its bit layout. `bandwidth`/`offset`
/// are 9-bit fields and `spacing` a 10-bit field; `base` is the full 32-bit RX
/// frequency in 5Hz steps.
pub fn encode_channel_params_update(id: u8, bandwidth: u16, offset: u16, spacing: u16, base: u32) -> [u8; 8] {
    let mut buf = [0u8; 8];

    buf[0] = (id << 4) | ((bandwidth >> 5) & 0xF) as u8;
    buf[1] = (((bandwidth & 0x1F) << 3) | ((offset >> 6) & 0x7)) as u8;
    buf[2] = (((offset & 0x3F) << 2) | ((spacing >> 8) & 0x3)) as u8;
    buf[3] = (spacing & 0xFF) as u8;
    buf[4..8].copy_from_slice(&base.to_be_bytes());

    buf
}

/// Advertisement of one or more alternative control channels for the current site.
pub struct AltControlChannel<'a>(&'a [u8]);

impl<'a> AltControlChannel<'a> {
    /// Create a new `AltControlChannel` decoder from the given payload bytes.
    pub fn new(payload: &'a [u8]) -> Self { AltControlChannel(payload) }

    /// RF Subsystem ID of current site within System.
    pub fn rfss(&self) -> u8 { self.0[0] }
    /// Site ID of current site within RFSS.
    pub fn site(&self) -> u8 { self.0[1] }

    /// Retrieve alternative sites, with each site's tuning parameters and supported
    /// services.
    pub fn alts(&self) -> [(Channel, SystemServices); 2] {
        [
            (Channel::new(&self.0[2..=3]), SystemServices::new(self.0[4])),
            (Channel::new(&self.0[5..=6]), SystemServices::new(self.0[7])),
        ]
    }
}

/// Site and RFSS information of current control channel.
pub struct RfssStatusBroadcast<'a>(&'a [u8]);

impl<'a> RfssStatusBroadcast<'a> {
    /// Create a new `RfssStatusBroadcast` decoder from the given payload bytes.
    pub fn new(payload: &'a [u8]) -> Self { RfssStatusBroadcast(payload) }

    /// Location registration area of current site.
    pub fn area(&self) -> u8 { self.0[0] }
    /// Whether the site is networked with the RFSS controller, which determines if it can
    /// communicate with other sites.
    pub fn networked(&self) -> bool { self.0[1] & 0b10000 != 0 }
    /// System ID of current site within WACN.
    pub fn system(&self) -> u16 { slice_u16(&self.0[1..=2]) & 0xFFF }
    /// RF Subsystem ID of current site within System.
    pub fn rfss(&self) -> u8 { self.0[3] }
    /// Site ID of current site within RFSS.
    pub fn site(&self) -> u8 { self.0[4] }
    /// Channel information for computing TX/RX frequencies.
    pub fn channel(&self) -> Channel { Channel::new(&self.0[5..=6]) }
    /// Services supported by the current site.
    pub fn services(&self) -> SystemServices { SystemServices::new(self.0[7]) }
}

/// Packs current site/RFSS status into the 8-byte payload `RfssStatusBroadcast` decodes.
pub fn encode_rfss_status_broadcast(area: u8, networked: bool, system: u16, rfss: u8, site: u8, channel: Channel, services: &SystemServices) -> [u8; 8] {
    let mut buf = [0u8; 8];

    buf[0] = area;
    buf[1] = ((networked as u8) << 4) | ((system >> 8) & 0xF) as u8;
    buf[2] = (system & 0xFF) as u8;
    buf[3] = rfss;
    buf[4] = site;
    buf[5..7].copy_from_slice(&channel.to_bits().to_be_bytes());
    buf[7] = services.to_byte();

    buf
}

/// WACN (Wide Area Communication Network) and System ID information of current control
/// channel.
pub struct NetworkStatusBroadcast<'a>(&'a [u8]);

impl<'a> NetworkStatusBroadcast<'a> {
    /// Create a new `NetworkStatusBroadcast` decoder from the given payload bytes.
    pub fn new(payload: &'a [u8]) -> Self { NetworkStatusBroadcast(payload) }

    /// Location registration area of site.
    pub fn area(&self) -> u8 { self.0[0] }
    /// WACN ID within the communications network.
    pub fn wacn(&self) -> u32 { slice_u24(&self.0[1..=3]) >> 4 }
    /// System ID of site within WACN.
    pub fn system(&self) -> u16 { slice_u16(&self.0[3..=4]) & 0xFFF }
    /// Channel information for computing TX/RX frequencies.
    pub fn channel(&self) -> Channel { Channel::new(&self.0[5..=6]) }
    /// Services supported by the current site.
    pub fn services(&self) -> SystemServices { SystemServices::new(self.0[7]) }
}

/// Packs WACN/system status into the 8-byte payload `NetworkStatusBroadcast` decodes.
/// `wacn` is a 20-bit field sharing its low nibble's byte with `system`'s high nibble,
/// which is why `wacn()`'s decode shifts right by 4 -- the low 4 bits belong to `system`,
/// not to `wacn` itself.
pub fn encode_network_status_broadcast(area: u8, wacn: u32, system: u16, channel: Channel, services: &SystemServices) -> [u8; 8] {
    let mut buf = [0u8; 8];
    let shifted = wacn << 4;

    buf[0] = area;
    buf[1] = (shifted >> 16) as u8;
    buf[2] = (shifted >> 8) as u8;
    buf[3] = (shifted as u8) | ((system >> 8) & 0xF) as u8;
    buf[4] = (system & 0xFF) as u8;
    buf[5..7].copy_from_slice(&channel.to_bits().to_be_bytes());
    buf[7] = services.to_byte();

    buf
}

/// Registration response.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum RegResponse {
    /// Registration is accepted.
    Accept,
    /// RFSS was unable to verify registration.
    Fail,
    /// Registration isn't allowed at this location.
    Deny,
    /// Denied temporarily, but user may retry registration.
    Refuse,
}

impl RegResponse {
    /// Try to parse a registration response from the given 2 bits.
    pub fn from_bits(bits: u8) -> RegResponse {
        use self::RegResponse::*;

        assert!(bits >> 2 == 0);

        match bits {
            0b00 => Accept,
            0b01 => Fail,
            0b10 => Deny,
            0b11 => Refuse,
            _ => unreachable!(),
        }
    }
}

/// Request for a target unit to call a source unit.
pub struct UnitCallAlert<'a>(&'a [u8]);

impl<'a> UnitCallAlert<'a> {
    /// Create a new `UnitCallAlert` decoder from the given payload bytes.
    pub fn new(payload: &'a [u8]) -> Self { UnitCallAlert(payload) }

    /// Target unit.
    pub fn dest_unit(&self) -> u32 { slice_u24(&self.0[2..=4]) }
    /// Requesting unit.
    pub fn src_unit(&self) -> u32 { slice_u24(&self.0[5..=7]) }
}

/// Signals a target unit that a unit-to-unit all has been requested.
pub struct UnitCallRequest<'a>(&'a [u8]);

impl<'a> UnitCallRequest<'a> {
    /// Create a new `UnitCallRequest` decoder from the given payload bytes.
    pub fn new(payload: &'a [u8]) -> Self { UnitCallRequest(payload) }

    /// Options requested/granted for resulting channel.
    pub fn opts(&self) -> ServiceOptions { ServiceOptions::new(self.0[0]) }
    /// Target unit.
    pub fn dest_unit(&self) -> u32 { slice_u24(&self.0[2..=4]) }
    /// Requesting unit.
    pub fn src_unit(&self) -> u32 { slice_u24(&self.0[5..=7]) }
}

/// Alerts a unit of a call from the public phone network.
pub struct PhoneAlert<'a>(&'a [u8]);

impl<'a> PhoneAlert<'a> {
    /// Create a new `PhoneAlert` decoder from the given payload bytes.
    pub fn new(payload: &'a [u8]) -> Self { PhoneAlert(payload) }

    /// The 10-digit phone number of the calling party, as encoded bytes.
    pub fn digits(&self) -> &[u8] { &self.0[0..=4] }
    /// Unit the call is for.
    pub fn dest_unit(&self) -> u32 { slice_u24(&self.0[5..=7]) }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_channel_params() {
        // Example from the standard.
        let p = ChannelParams::new(170201250, 0x64, 0b010110100, 0x32);
        assert_eq!(p.base, 851_006_250);
        assert_eq!(p.spacing, 6_250);
        assert_eq!(p.offset, -45_000_000);
        assert_eq!(p.bandwidth, 12_500);
        assert_eq!(p.rx_freq(0b1001), 851_062_500);
    }

    #[test]
    fn test_encode_channel_params_update_round_trips_through_decode() {
        let buf = encode_channel_params_update(0b0110, 100, 0b1_01101010, 0x32, 170_201_250 * 5);
        let p = ChannelParamsUpdate::new(&buf);

        assert_eq!(p.id(), 0b0110);
        let params = p.params();
        assert_eq!(params.bandwidth, 100 * 125);
    }

    #[test]
    fn test_channel_build_round_trips() {
        let ch = Channel::build(0b1010, 0b0011_0101_1100);
        assert_eq!(ch.id(), 0b1010);
        assert_eq!(ch.number(), 0b0011_0101_1100);
        assert_eq!(Channel::new(&ch.to_bits().to_be_bytes()), ch);
    }

    #[test]
    fn test_talk_group_to_bits_round_trips() {
        assert_eq!(TalkGroup::Other(1234).to_bits(), 1234);
        assert_eq!(TalkGroup::from_bits(TalkGroup::Everbody.to_bits()), TalkGroup::Everbody);
    }

    #[test]
    fn test_encode_rfss_status_broadcast_round_trips_through_decode() {
        let channel = Channel::build(0b0011, 0b0000_1111_0000);
        let services = SystemServices::new(0b0011_0001);
        let buf = encode_rfss_status_broadcast(0x12, true, 0x345, 7, 9, channel, &services);
        let r = RfssStatusBroadcast::new(&buf);

        assert_eq!(r.area(), 0x12);
        assert!(r.networked());
        assert_eq!(r.system(), 0x345);
        assert_eq!(r.rfss(), 7);
        assert_eq!(r.site(), 9);
        assert_eq!(r.channel(), channel);
    }

    #[test]
    fn test_encode_network_status_broadcast_round_trips_through_decode() {
        let channel = Channel::build(0b0101, 0b0000_0000_0001);
        let services = SystemServices::new(0b0001_0000);
        let buf = encode_network_status_broadcast(0x44, 0xABCDE, 0x123, channel, &services);
        let n = NetworkStatusBroadcast::new(&buf);

        assert_eq!(n.area(), 0x44);
        assert_eq!(n.wacn(), 0xABCDE);
        assert_eq!(n.system(), 0x123);
        assert_eq!(n.channel(), channel);
    }

    #[test]
    fn test_encode_adjacent_site_round_trips_through_decode() {
        let opts = SiteOptions::new(0b1010);
        let channel = Channel::build(0b0001, 0b0000_0000_0010);
        let services = SystemServices::new(0b0100_0000);
        let buf = encode_adjacent_site(0x22, &opts, 0x0AB, 3, 4, channel, &services);
        let a = AdjacentSite::new(&buf);

        assert_eq!(a.area(), 0x22);
        assert!(a.opts().conventional());
        assert!(!a.opts().current());
        assert_eq!(a.system(), 0x0AB);
        assert_eq!(a.rfss(), 3);
        assert_eq!(a.site(), 4);
        assert_eq!(a.channel(), channel);
    }

    #[test]
    fn test_group_traffic_updates() {
        let buf = [
            0b10001000,
            0b01110111,
            0b11111111,
            0b11111111,
            0b10010001,
            0b00000001,
            0b10101010,
            0b10101010,
        ];

        let u = GroupTrafficUpdate(&buf[..]).updates();

        assert_eq!(u[0].0.id(), 0b1000);
        assert_eq!(u[0].0.number(), 0b100001110111);
        assert_eq!(u[0].1, TalkGroup::Everbody);
        assert_eq!(u[1].0.id(), 0b1001);
        assert_eq!(u[1].0.number(), 0b000100000001);
        assert_eq!(u[1].1, TalkGroup::Other(0b1010101010101010));
    }

    #[test]
    fn test_encode_group_traffic_update_round_trips_through_decode() {
        let first = (Channel::build(0b0001, 100), TalkGroup::Other(500));
        let second = (Channel::build(0b0010, 200), TalkGroup::Everbody);

        let buf = encode_group_traffic_update(first, second);
        let u = GroupTrafficUpdate::new(&buf).updates();

        assert_eq!(u[0], first);
        assert_eq!(u[1], second);
    }
}
