//! Extraction of the nine per-LDU IMBE voice codeword slots from their fixed
//! DFSI-packed byte offsets, and silence/encrypted-null substitution for a missing
//! slot so codec continuity is preserved across a dropped frame.

/// Number of IMBE voice frames carried per LDU.
pub const FRAMES_PER_LDU: usize = 9;

/// Byte offset into the DFSI-packed LDU payload of each of the nine IMBE slots.
const OFFSETS: [usize; FRAMES_PER_LDU] = [24, 46, 60, 77, 94, 111, 128, 145, 162];

/// Size, in bytes, of each of the nine IMBE slots.
const SIZES: [usize; FRAMES_PER_LDU] = [22, 14, 17, 17, 17, 17, 17, 17, 16];

/// Maximum size of any one IMBE slot, used to size a fixed scratch buffer.
pub const MAX_FRAME_BYTES: usize = 22;

/// One extracted IMBE codeword, still padded out to [`MAX_FRAME_BYTES`] with its
/// actual length tracked separately -- the nine slots aren't uniformly sized.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ImbeFrame {
    pub bytes: [u8; MAX_FRAME_BYTES],
    pub len: usize,
}

impl ImbeFrame {
    fn zeroed(len: usize) -> Self {
        ImbeFrame { bytes: [0u8; MAX_FRAME_BYTES], len }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes[..self.len]
    }
}

/// Extracts the nine IMBE voice frames from a DFSI-packed LDU payload. `payload` must
/// be at least 162+16=178 bytes to cover every slot.
pub fn extract(payload: &[u8]) -> Option<[ImbeFrame; FRAMES_PER_LDU]> {
    let mut frames: [ImbeFrame; FRAMES_PER_LDU] = Default::default();

    for i in 0..FRAMES_PER_LDU {
        let (offset, size) = (OFFSETS[i], SIZES[i]);
        let slot = payload.get(offset..offset + size)?;

        let mut frame = ImbeFrame::zeroed(size);
        frame.as_mut_slice().copy_from_slice(slot);
        frames[i] = frame;
    }

    Some(frames)
}

impl Default for ImbeFrame {
    fn default() -> Self {
        ImbeFrame { bytes: [0u8; MAX_FRAME_BYTES], len: 0 }
    }
}

/// Substitutes silence (all-zero codeword) for a missing voice frame at `position`,
/// preserving the expected slot size so downstream XOR-with-keystream stays aligned.
pub fn silence(position: usize) -> ImbeFrame {
    ImbeFrame::zeroed(SIZES[position])
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_payload() -> Vec<u8> {
        (0..200u16).map(|b| b as u8).collect()
    }

    #[test]
    fn test_extract_recovers_every_slot_at_its_offset() {
        let payload = sample_payload();
        let frames = extract(&payload).unwrap();

        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.len, SIZES[i]);
            assert_eq!(frame.as_slice(), &payload[OFFSETS[i]..OFFSETS[i] + SIZES[i]]);
        }
    }

    #[test]
    fn test_extract_fails_on_short_payload() {
        assert!(extract(&[0u8; 50]).is_none());
    }

    #[test]
    fn test_silence_frame_is_zeroed_and_correctly_sized() {
        let frame = silence(2);
        assert_eq!(frame.len, SIZES[2]);
        assert!(frame.as_slice().iter().all(|&b| b == 0));
    }
}
