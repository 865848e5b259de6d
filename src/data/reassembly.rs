//! Reassembly of confirmed and unconfirmed data PDUs from their constituent blocks.
//!
//! Each data packet is split across a header block plus a header-declared number of
//! data blocks. A reassembler accumulates blocks per logical link until the last one
//! arrives, then validates the whole payload against its trailing CRC-32 before
//! releasing it to the caller.

use std::collections::HashMap;

use crate::crc;
use crate::error::DataError;

/// Maximum number of blocks a single packet may be split across.
const MAX_BLOCKS: usize = 128;

/// Bytes of user data carried by a single data block.
const BLOCK_BYTES: usize = 12;

type Result<T> = std::result::Result<T, DataError>;

/// A fully reassembled, CRC-verified data packet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReassembledPacket {
    /// Logical link ID the packet was addressed to or from.
    pub logical_link: u32,
    /// Reassembled user-data payload, with the trailing CRC-32 stripped.
    pub payload: Vec<u8>,
}

/// In-progress reassembly state for a single logical link.
struct Pending {
    blocks: Vec<Option<[u8; BLOCK_BYTES]>>,
    received: usize,
}

impl Pending {
    fn new(block_count: usize) -> Self {
        Pending {
            blocks: vec![None; block_count],
            received: 0,
        }
    }

    fn is_complete(&self) -> bool {
        self.received == self.blocks.len()
    }

    fn bytes(&self) -> Vec<u8> {
        self.blocks.iter()
            .flat_map(|b| b.expect("reassembly completed with missing block"))
            .collect()
    }
}

/// Shared reassembly logic parameterized by confirmed/unconfirmed block framing, which
/// only differ in their header layout, not in their reassembly algorithm.
struct Reassembler {
    pending: HashMap<u32, Pending>,
}

impl Reassembler {
    fn new() -> Self {
        Reassembler { pending: HashMap::new() }
    }

    fn begin(&mut self, logical_link: u32, block_count: usize) -> Result<()> {
        if block_count == 0 || block_count > MAX_BLOCKS {
            return Err(DataError::TooManyBlocks);
        }

        self.pending.insert(logical_link, Pending::new(block_count));

        Ok(())
    }

    fn feed(&mut self, logical_link: u32, seq: u8, block: [u8; BLOCK_BYTES])
        -> Result<Option<ReassembledPacket>>
    {
        let pending = match self.pending.get_mut(&logical_link) {
            Some(p) => p,
            None => return Ok(None),
        };

        let idx = seq as usize;

        if idx >= pending.blocks.len() {
            return Err(DataError::SequenceOutOfWindow(seq));
        }

        if pending.blocks[idx].is_none() {
            pending.received += 1;
        }

        pending.blocks[idx] = Some(block);

        if !pending.is_complete() {
            return Ok(None);
        }

        let pending = self.pending.remove(&logical_link).unwrap();
        let bytes = pending.bytes();

        verify_crc(&bytes)?;

        let payload = bytes[..bytes.len() - 4].to_vec();

        Ok(Some(ReassembledPacket { logical_link, payload }))
    }

    fn cancel(&mut self, logical_link: u32) {
        self.pending.remove(&logical_link);
    }
}

fn verify_crc(bytes: &[u8]) -> Result<()> {
    if bytes.len() < 4 {
        return Err(DataError::BadCrc);
    }

    let (data, trailer) = bytes.split_at(bytes.len() - 4);
    let expected = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);

    let actual = crc::CRC32::new()
        .feed_bytes(data.iter().cloned())
        .finish();

    if actual as u32 != expected {
        return Err(DataError::BadCrc);
    }

    Ok(())
}

/// Reassembles confirmed data packets, which are acknowledged block-by-block by the
/// receiving unit.
pub struct ConfirmedReassembler(Reassembler);

impl ConfirmedReassembler {
    pub fn new() -> Self { ConfirmedReassembler(Reassembler::new()) }

    pub fn begin(&mut self, logical_link: u32, block_count: usize) -> Result<()> {
        self.0.begin(logical_link, block_count)
    }

    pub fn feed(&mut self, logical_link: u32, seq: u8, block: [u8; BLOCK_BYTES])
        -> Result<Option<ReassembledPacket>>
    {
        self.0.feed(logical_link, seq, block)
    }

    pub fn cancel(&mut self, logical_link: u32) { self.0.cancel(logical_link) }
}

/// Reassembles unconfirmed data packets, sent without per-block acknowledgement.
pub struct UnconfirmedReassembler(Reassembler);

impl UnconfirmedReassembler {
    pub fn new() -> Self { UnconfirmedReassembler(Reassembler::new()) }

    pub fn begin(&mut self, logical_link: u32, block_count: usize) -> Result<()> {
        self.0.begin(logical_link, block_count)
    }

    pub fn feed(&mut self, logical_link: u32, seq: u8, block: [u8; BLOCK_BYTES])
        -> Result<Option<ReassembledPacket>>
    {
        self.0.feed(logical_link, seq, block)
    }

    pub fn cancel(&mut self, logical_link: u32) { self.0.cancel(logical_link) }
}

#[cfg(test)]
mod test {
    use super::*;

    fn block(byte: u8) -> [u8; BLOCK_BYTES] { [byte; BLOCK_BYTES] }

    #[test]
    fn test_reassemble_unconfirmed() {
        let mut r = UnconfirmedReassembler::new();
        r.begin(0x1234, 2).unwrap();

        assert!(r.feed(0x1234, 0, block(0xAB)).unwrap().is_none());

        let mut data = vec![0xABu8; BLOCK_BYTES];
        data.extend_from_slice(&[0xCDu8; BLOCK_BYTES - 4]);

        let crc = crc::CRC32::new().feed_bytes(data.iter().cloned()).finish() as u32;
        let mut last = [0xCDu8; BLOCK_BYTES];
        last[BLOCK_BYTES - 4] = (crc >> 24) as u8;
        last[BLOCK_BYTES - 3] = (crc >> 16) as u8;
        last[BLOCK_BYTES - 2] = (crc >> 8) as u8;
        last[BLOCK_BYTES - 1] = crc as u8;

        let packet = r.feed(0x1234, 1, last).unwrap().unwrap();

        assert_eq!(packet.logical_link, 0x1234);
        assert_eq!(packet.payload, data);
    }

    #[test]
    fn test_reassemble_bad_crc() {
        let mut r = ConfirmedReassembler::new();
        r.begin(1, 1).unwrap();

        let err = r.feed(1, 0, block(0)).unwrap_err();
        assert_eq!(err, DataError::BadCrc);
    }

    #[test]
    fn test_sequence_out_of_window() {
        let mut r = ConfirmedReassembler::new();
        r.begin(1, 1).unwrap();

        let err = r.feed(1, 5, block(0)).unwrap_err();
        assert_eq!(err, DataError::SequenceOutOfWindow(5));
    }

    #[test]
    fn test_too_many_blocks() {
        let mut r = ConfirmedReassembler::new();
        let err = r.begin(1, MAX_BLOCKS + 1).unwrap_err();
        assert_eq!(err, DataError::TooManyBlocks);
    }
}
