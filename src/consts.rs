//! Phase 1 frame-level constants shared across the framing, message, and trunking
//! layers.

/// Number of dibits in the 48-bit Phase 1 sync pattern.
pub const SYNC_SYMBOLS: usize = 24;

/// The Phase 1 sync pattern, as a 48-bit word.
pub const SYNC_WORD: u64 = 0x5575_F5FF_77FF;

/// Maximum number of bit errors tolerated in the sync pattern before a frame is
/// considered undecodable.
pub const SYNC_ERROR_TOLERANCE: u32 = 4;

/// Number of dibits in the NID word (NAC + DUID, BCH-encoded).
pub const NID_DIBITS: usize = 32;

/// Bit period at which a 2-bit status symbol is inserted into the outgoing dibit
/// stream (every 70 bits == 35 dibits).
pub const STATUS_BIT_PERIOD: usize = 70;

/// Stride (in bits) used by the idle/TSDU-triple busy-bit variant.
pub const STATUS_BIT_PERIOD_TSDU: usize = STATUS_BIT_PERIOD * 5;

/// Number of dibits in a single trellis-coded data/TSBK block, before deinterleaving and
/// half-rate decode.
pub const CODING_DIBITS: usize = 98;
