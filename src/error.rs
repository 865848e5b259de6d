//! Layered error types for the framing, trunking control, network, and crypto
//! subsystems, aggregated into a single top-level [`Error`] via `thiserror`.

use thiserror::Error;

/// Errors from the low-level forward error correction codecs and frame decoders.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum CodingError {
    /// Too many errors were detected when attempting a Reed-Solomon decode.
    #[error("Reed-Solomon decode unrecoverable")]
    ReedSolomonUnrecoverable,
    /// Too many errors were detected when attempting a BCH decode.
    #[error("BCH decode unrecoverable")]
    BchUnrecoverable,
    /// Too many errors were detected when attempting a Golay decode.
    #[error("Golay decode unrecoverable")]
    GolayUnrecoverable,
    /// Too many errors were detected when attempting a Hamming decode.
    #[error("Hamming decode unrecoverable")]
    HammingUnrecoverable,
    /// Too many errors were detected when attempting a cyclic decode.
    #[error("cyclic decode unrecoverable")]
    CyclicUnrecoverable,
    /// An ambiguous symbol or too many errors were detected during trellis decode.
    #[error("trellis decode unrecoverable")]
    ViterbiUnrecoverable,
}

/// Errors from framing: sync detection and NID decode.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum FramingError {
    /// The sync pattern could not be located within the error tolerance.
    #[error("sync pattern not found")]
    SyncNotFound,
    /// The NID word failed BCH decode.
    #[error("NID decode failed: {0}")]
    InvalidNid(#[from] CodingError),
    /// The NID's BCH-decoded DUID field did not match any known data unit type.
    #[error("unrecognized data unit id {0:#03x}")]
    UnknownDataUnit(u8),
    /// Frame buffer was shorter than required for the operation.
    #[error("frame buffer too short")]
    ShortFrame,
}

/// Errors from trunking signaling (TSBK/AMBT/TDULC) decode and the control-channel
/// engine.
#[derive(Debug, Eq, PartialEq, Error)]
pub enum TrunkingError {
    /// TSBK CRC-CCITT check failed.
    #[error("TSBK CRC check failed")]
    BadCrc,
    /// Trellis 1/2 rate decode of the signaling block was unrecoverable.
    #[error("TSBK FEC decode failed: {0}")]
    Coding(#[from] CodingError),
    /// An opcode was encountered that this engine does not implement.
    #[error("unsupported opcode {0:#04x}")]
    UnsupportedOpcode(u8),
    /// No channel is available to grant the requested service.
    #[error("no channel available for grant")]
    NoChannelAvailable,
}

/// Errors from inbound data-packet reassembly.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum DataError {
    /// The reassembled payload failed its CRC32 check.
    #[error("data packet CRC32 check failed")]
    BadCrc,
    /// A block arrived referencing a sequence number outside the active window.
    #[error("block sequence {0} out of window")]
    SequenceOutOfWindow(u8),
    /// The fragment table overflowed its configured block budget.
    #[error("too many blocks for packet reassembly")]
    TooManyBlocks,
}

/// Errors from the FNE peer-network protocol.
#[derive(Debug, Eq, PartialEq, Error)]
pub enum NetworkError {
    /// A frame shorter than the fixed RTP/tag header was received.
    #[error("frame too short to contain a header")]
    ShortFrame,
    /// The frame's tag did not match any known FNE packet type.
    #[error("unrecognized frame tag {0:?}")]
    UnknownTag(Vec<u8>),
    /// A peer attempted an operation outside of its current session state.
    #[error("peer {0} is not authorized for this operation")]
    NotAuthorized(u32),
    /// Peer login challenge/response did not match.
    #[error("login authentication failed for peer {0}")]
    AuthenticationFailed(u32),
    /// The per-protocol ring buffer for this peer overflowed.
    #[error("ring buffer overflow for peer {0}")]
    RingOverflow(u32),
}

/// Errors from the cryptographic subsystem (LLA, keystream generation).
#[derive(Debug, Error)]
pub enum CryptoError {
    /// A key of the wrong length was supplied to a cipher.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes.
        expected: usize,
        /// Actual key length in bytes.
        actual: usize,
    },
    /// An unsupported or unknown crypto algorithm identifier was encountered.
    #[error("unsupported crypto algorithm {0:#04x}")]
    UnsupportedAlgorithm(u8),
}

/// Aggregated error type returned by the top-level engine API.
#[derive(Debug, Error)]
pub enum Error {
    /// A framing-layer error.
    #[error(transparent)]
    Framing(#[from] FramingError),
    /// A trunking-layer error.
    #[error(transparent)]
    Trunking(#[from] TrunkingError),
    /// A data-reassembly error.
    #[error(transparent)]
    Data(#[from] DataError),
    /// A network-layer error.
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// A cryptographic error.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    /// A coding-layer error that escaped to the top level without a more specific
    /// wrapper.
    #[error(transparent)]
    Coding(#[from] CodingError),
}

/// Result alias for the coding layer, kept separate from the top-level [`Error`] so the
/// FEC codecs stay usable without depending on the rest of the crate's error graph.
pub type Result<T> = std::result::Result<T, CodingError>;
