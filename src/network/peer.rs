//! Peer-network wire frame: the common header every outbound/inbound packet carries,
//! and the function/subfunction opcode catalog.

use bytes::{BufMut, BytesMut};
use rand::Rng;

use crate::error::NetworkError;
use crate::util::{slice_u24, slice_u32};

/// Size of the common frame prologue, in bytes.
pub const HEADER_LEN: usize = 24;

/// Function byte values.
pub mod func {
    pub const PROTOCOL: u8 = 0x00;
    pub const MASTER: u8 = 0x01;
    pub const RPTL: u8 = 0x60;
    pub const RPTK: u8 = 0x61;
    pub const RPTC: u8 = 0x62;
    pub const RPT_CLOSING: u8 = 0x70;
    pub const MST_CLOSING: u8 = 0x71;
    pub const PING: u8 = 0x74;
    pub const PONG: u8 = 0x75;
    pub const GRANT_REQ: u8 = 0x7A;
    pub const ACK: u8 = 0x7E;
    pub const NAK: u8 = 0x7F;
    pub const TRANSFER: u8 = 0x90;
    pub const ANNOUNCE: u8 = 0x91;
}

/// Subfunction byte values.
pub mod subfunc {
    pub const NOP: u8 = 0xFF;

    pub const PROTOCOL_DMR: u8 = 0x00;
    pub const PROTOCOL_P25: u8 = 0x01;
    pub const PROTOCOL_NXDN: u8 = 0x02;

    pub const MASTER_WHITELIST: u8 = 0x00;
    pub const MASTER_BLACKLIST: u8 = 0x01;
    pub const MASTER_ACTIVE_TGS: u8 = 0x02;
    pub const MASTER_DEACTIVE_TGS: u8 = 0x03;

    pub const TRANSFER_ACTIVITY: u8 = 0x01;
    pub const TRANSFER_DIAG: u8 = 0x02;
    pub const TRANSFER_STATUS: u8 = 0x03;

    pub const ANNOUNCE_GROUP_AFF: u8 = 0x00;
    pub const ANNOUNCE_UNIT_REG: u8 = 0x01;
    pub const ANNOUNCE_UNIT_DEREG: u8 = 0x02;
    pub const ANNOUNCE_AFFILS: u8 = 0x90;
    pub const ANNOUNCE_SITE_VC: u8 = 0x9A;
}

/// Reasons a peer's request may be NAK'd.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NakReason {
    GeneralFailure,
    ModeNotEnabled,
    IllegalPacket,
    Unauthorized,
    BadConnState,
    InvalidConfigData,
    PeerReset,
    PeerAcl,
    MaxConnections,
}

impl NakReason {
    pub fn to_bits(self) -> u16 {
        use NakReason::*;
        match self {
            GeneralFailure => 0,
            ModeNotEnabled => 1,
            IllegalPacket => 2,
            Unauthorized => 3,
            BadConnState => 4,
            InvalidConfigData => 5,
            PeerReset => 6,
            PeerAcl => 7,
            MaxConnections => 8,
        }
    }
}

/// The function/subfunction pair identifying a packet's purpose.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OpcodePair {
    pub func: u8,
    pub subfunc: u8,
}

impl OpcodePair {
    pub fn new(func: u8, subfunc: u8) -> Self {
        OpcodePair { func, subfunc }
    }
}

/// The 12-byte RTP header prepended to payload-carrying frames. The payload type is
/// fixed for this protocol; SSRC is always the sending peer's ID.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RtpHeader {
    pub payload_type: u8,
    pub sequence: u16,
    pub timestamp: u32,
    pub ssrc: u32,
}

const RTP_VERSION: u8 = 0x80;

impl RtpHeader {
    pub fn new(payload_type: u8, sequence: u16, timestamp: u32, ssrc: u32) -> Self {
        RtpHeader { payload_type, sequence, timestamp, ssrc }
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(RTP_VERSION);
        buf.put_u8(self.payload_type);
        buf.put_u16(self.sequence);
        buf.put_u32(self.timestamp);
        buf.put_u32(self.ssrc);
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, NetworkError> {
        if bytes.len() < 12 {
            return Err(NetworkError::ShortFrame);
        }

        Ok(RtpHeader {
            payload_type: bytes[1],
            sequence: ((bytes[2] as u16) << 8) | bytes[3] as u16,
            timestamp: slice_u32(&bytes[4..8]),
            ssrc: slice_u32(&bytes[8..12]),
        })
    }
}

/// Decoded common header of an inbound frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrameHeader {
    pub tag: [u8; 4],
    pub message_type: u32,
    pub src_id: u32,
    pub dst_id: u32,
    pub peer_id: u32,
    pub control: u8,
    pub stream_id: u32,
    pub lsd: u16,
    pub duid: u8,
    pub length: u8,
}

impl FrameHeader {
    pub fn decode(bytes: &[u8]) -> Result<Self, NetworkError> {
        if bytes.len() < HEADER_LEN {
            return Err(NetworkError::ShortFrame);
        }

        let mut tag = [0u8; 4];
        tag.copy_from_slice(&bytes[0..4]);

        Ok(FrameHeader {
            tag,
            message_type: slice_u24(&bytes[4..7]),
            src_id: slice_u24(&bytes[5..8]),
            dst_id: slice_u24(&bytes[8..11]),
            peer_id: slice_u32(&bytes[11..15]),
            control: bytes[15],
            stream_id: slice_u32(&bytes[16..20]),
            lsd: ((bytes[20] as u16) << 8) | bytes[21] as u16,
            duid: bytes[22],
            length: bytes[23],
        })
    }

    pub fn tag_str(&self) -> Result<&str, NetworkError> {
        std::str::from_utf8(&self.tag).map_err(|_| NetworkError::UnknownTag(self.tag.to_vec()))
    }
}

/// Builds an outbound frame: the 4-byte tag, common header fields, an optional RTP
/// header, and a payload.
pub struct FrameBuilder {
    buf: BytesMut,
}

impl FrameBuilder {
    pub fn new(tag: &[u8; 4]) -> Self {
        let mut buf = BytesMut::with_capacity(HEADER_LEN + 16);
        buf.put_slice(tag);
        FrameBuilder { buf }
    }

    pub fn stream_id(mut self, stream_id: u32) -> Self {
        self.buf.put_u32(stream_id);
        self
    }

    pub fn peer_id(mut self, peer_id: u32) -> Self {
        self.buf.put_u32(peer_id);
        self
    }

    pub fn rtp(mut self, rtp: &RtpHeader) -> Self {
        rtp.encode(&mut self.buf);
        self
    }

    pub fn payload(mut self, payload: &[u8]) -> Self {
        self.buf.put_slice(payload);
        self
    }

    pub fn build(self) -> BytesMut {
        self.buf
    }
}

/// Lowest stream ID ever minted; 0 is reserved as a sentinel for "no stream".
const STREAM_ID_MIN: u32 = 0x0000_0001;

/// Highest stream ID ever minted; 0xFFFFFFFF is reserved as a sentinel.
const STREAM_ID_MAX: u32 = 0xFFFF_FFFE;

/// Mints a new stream ID for a call or data transfer. Picked uniformly at random over
/// the full ID space once per stream, not incremented, so two peers independently
/// starting streams at the same moment don't collide.
pub fn create_stream_id() -> u32 {
    rand::thread_rng().gen_range(STREAM_ID_MIN..=STREAM_ID_MAX)
}

/// The RTP sequence number one past the last one a stream may use; a TDU closing a
/// call is sent at `END_OF_CALL_SEQ - 1` and the next stream starts back at 0.
pub const END_OF_CALL_SEQ: u16 = 65535;

/// Per-stream RTP sequence counter, wrapping back to 0 before it would reach
/// [`END_OF_CALL_SEQ`] rather than overflowing `u16`.
#[derive(Default)]
pub struct PacketSequencer {
    seq: u16,
}

impl PacketSequencer {
    pub fn new() -> Self {
        PacketSequencer { seq: 0 }
    }

    /// Resets the sequence back to 0, e.g. when a new stream begins.
    pub fn reset(&mut self) {
        self.seq = 0;
    }

    /// Returns the next sequence number to send and advances the counter.
    pub fn next(&mut self) -> u16 {
        let current = self.seq;
        self.seq = self.seq.wrapping_add(1);
        if self.seq > END_OF_CALL_SEQ - 1 {
            self.seq = 0;
        }
        current
    }
}
