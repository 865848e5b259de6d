//! The FNE peer-network protocol: wire framing, the login handshake, per-protocol
//! ring buffers feeding the worker pool, and the optional V.24 DFSI transport.

pub mod dfsi;
pub mod peer;
pub mod ring;
pub mod session;

pub use self::peer::{FrameBuilder, FrameHeader, NakReason, OpcodePair, RtpHeader};
pub use self::ring::{ProtocolRings, RingBuffer};
pub use self::session::{ConnState, PeerSession};
