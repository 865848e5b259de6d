//! Voice keystream generation for AES-256 and ARC4, and the byte offsets into that
//! keystream that line up with each IMBE voice frame position within an LDU.

use aes::Aes256;
use cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};

/// Length of an AES-256 voice keystream, in bytes (15 AES blocks).
pub const AES_KEYSTREAM_LEN: usize = 240;
/// Length of an ARC4 voice keystream, in bytes.
pub const ARC4_KEYSTREAM_LEN: usize = 469;

/// Which half of a voice superframe a keystream offset applies to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Ldu {
    /// First logical data unit of the superframe.
    Ldu1,
    /// Second logical data unit of the superframe.
    Ldu2,
}

/// Length, in bytes, of one raw IMBE voice frame -- also the keystream stride between
/// consecutive voice frame positions.
const RAW_IMBE_LENGTH_BYTES: usize = 11;
/// Extra offset applied once the position has advanced past the 7th voice frame.
const LATE_POSITION_JUMP: usize = 2;

fn late_jump(position: usize) -> usize {
    if position > 7 { LATE_POSITION_JUMP } else { 0 }
}

/// Byte offset into an AES-256 voice keystream for the given LDU half and IMBE voice
/// frame position (0-8, one per voice frame in the frame group). The AES keystream
/// reserves its first `RAW_IMBE_LENGTH_BYTES` bytes ahead of the first voice frame, so
/// each position's offset is one full frame length further out than the equivalent ARC4
/// offset.
pub fn aes_imbe_offset(ldu: Ldu, position: usize) -> usize {
    let base = match ldu {
        Ldu::Ldu1 => 16,
        Ldu::Ldu2 => 16 + 101,
    };

    base + (position + 1) * RAW_IMBE_LENGTH_BYTES + late_jump(position)
}

/// Byte offset into an ARC4 voice keystream for the given LDU half and IMBE voice frame
/// position.
pub fn arc4_imbe_offset(ldu: Ldu, position: usize) -> usize {
    let base = match ldu {
        Ldu::Ldu1 => 267,
        Ldu::Ldu2 => 267 + 101,
    };

    base + position * RAW_IMBE_LENGTH_BYTES + late_jump(position)
}

/// Derive the 16-byte initial IV for AES-256 counter-feedback keystream generation from
/// the leading 8 bytes of the message indicator.
///
/// Runs a 64-cycle Galois LFSR (feedback polynomial `x^64 + x^62 + x^46 + x^38 + x^27 +
/// x^15 + 1`) over the MI; the upper 64 bits of the IV are the bits shifted out of the
/// register over those 64 cycles, and the lower 64 bits are the register's final state.
fn derive_iv(mi: &[u8; 9]) -> [u8; 16] {
    let mut word = u64::from_be_bytes(mi[..8].try_into().unwrap());
    let mut overflow = 0u64;

    for _ in 0..64 {
        let feedback = (word >> 63) ^ (word >> 61) ^ (word >> 45) ^ (word >> 37)
            ^ (word >> 26) ^ (word >> 14);
        let shifted_out = word >> 63;

        overflow = (overflow << 1) | (shifted_out & 1);
        word = (word << 1) | (feedback & 1);
    }

    let mut iv = [0u8; 16];
    iv[..8].copy_from_slice(&overflow.to_be_bytes());
    iv[8..].copy_from_slice(&word.to_be_bytes());

    iv
}

fn aes256_encrypt_block(key: &[u8; 32], block: &[u8; 16]) -> [u8; 16] {
    let cipher = Aes256::new(GenericArray::from_slice(key));
    let mut buf = GenericArray::clone_from_slice(block);
    cipher.encrypt_block(&mut buf);
    buf.into()
}

/// Generate a 240-byte AES-256 voice keystream by counter-feedback: the IV is derived
/// from `mi` and encrypted, each output block re-encrypted to produce the next, until
/// [`AES_KEYSTREAM_LEN`] bytes have been produced.
pub fn aes256_keystream(key: &[u8; 32], mi: &[u8; 9]) -> [u8; AES_KEYSTREAM_LEN] {
    let mut out = [0u8; AES_KEYSTREAM_LEN];
    let mut block = derive_iv(mi);

    for chunk in out.chunks_mut(16) {
        block = aes256_encrypt_block(key, &block);
        chunk.copy_from_slice(&block[..chunk.len()]);
    }

    out
}

/// ARC4 key-scheduling and pseudo-random generation, run over a 13-byte key assembled
/// from the traffic encryption key and message indicator.
///
/// There's no ecosystem RC4 crate in this repository's dependency stack with a byte-slice
/// (rather than fixed-width-type-parameterized) key API, so the classic KSA/PRGA
/// algorithm is implemented directly here instead of reaching for one.
struct Arc4 {
    state: [u8; 256],
    i: u8,
    j: u8,
}

impl Arc4 {
    fn new(key: &[u8]) -> Self {
        let mut state = [0u8; 256];
        for (idx, s) in state.iter_mut().enumerate() {
            *s = idx as u8;
        }

        let mut j = 0u8;
        for i in 0..256 {
            j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
            state.swap(i, j as usize);
        }

        Arc4 { state, i: 0, j: 0 }
    }

    fn keystream(&mut self, out: &mut [u8]) {
        for byte in out.iter_mut() {
            self.i = self.i.wrapping_add(1);
            self.j = self.j.wrapping_add(self.state[self.i as usize]);
            self.state.swap(self.i as usize, self.j as usize);

            let k = self.state[self.i as usize].wrapping_add(self.state[self.j as usize]);
            *byte = self.state[k as usize];
        }
    }
}

/// Generate a 469-byte ARC4 voice keystream from a 5-byte traffic encryption key and the
/// 8-byte leading portion of the message indicator.
pub fn arc4_keystream(tek: &[u8; 5], mi: &[u8; 9]) -> [u8; ARC4_KEYSTREAM_LEN] {
    let mut key = [0u8; 13];
    key[..5].copy_from_slice(tek);
    key[5..].copy_from_slice(&mi[..8]);

    let mut out = [0u8; ARC4_KEYSTREAM_LEN];
    Arc4::new(&key).keystream(&mut out);

    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_aes_imbe_offset_ldu1() {
        assert_eq!(aes_imbe_offset(Ldu::Ldu1, 0), 16 + 11);
        assert_eq!(aes_imbe_offset(Ldu::Ldu1, 7), 16 + 8 * 11);
        assert_eq!(aes_imbe_offset(Ldu::Ldu1, 8), 16 + 9 * 11 + 2);
    }

    #[test]
    fn test_aes_imbe_offset_ldu2() {
        assert_eq!(aes_imbe_offset(Ldu::Ldu2, 0), 16 + 101 + 11);
    }

    #[test]
    fn test_arc4_imbe_offset() {
        assert_eq!(arc4_imbe_offset(Ldu::Ldu1, 0), 267);
        assert_eq!(arc4_imbe_offset(Ldu::Ldu2, 0), 267 + 101);
    }

    #[test]
    fn test_aes256_keystream_is_deterministic() {
        let key = [0u8; 32];
        let mi = [1, 2, 3, 4, 5, 6, 7, 8, 9];

        assert_eq!(aes256_keystream(&key, &mi), aes256_keystream(&key, &mi));
    }

    #[test]
    fn test_arc4_keystream_is_deterministic() {
        let tek = [0xAAu8; 5];
        let mi = [1, 2, 3, 4, 5, 6, 7, 8, 9];

        assert_eq!(arc4_keystream(&tek, &mi), arc4_keystream(&tek, &mi));
    }

    #[test]
    fn test_different_mi_gives_different_keystream() {
        let key = [0u8; 32];
        let mi_a = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        let mi_b = [9, 8, 7, 6, 5, 4, 3, 2, 1];

        assert_ne!(aes256_keystream(&key, &mi_a), aes256_keystream(&key, &mi_b));
    }
}
