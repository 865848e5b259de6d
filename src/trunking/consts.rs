/// Number of dibits in an uncoded TSBK packet.
pub const TSBK_DIBITS: usize = 48;
/// Number of bytes in an uncoded TSBK packet.
pub const TSBK_BYTES: usize = TSBK_DIBITS / 4;
