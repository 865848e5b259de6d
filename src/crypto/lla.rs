//! Link-layer authentication (LLA): the AM1-AM4 AES-128-ECB challenge/response steps
//! used to authenticate a subscriber unit to the RFSS.

use aes::Aes128;
use cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use subtle::ConstantTimeEq;

/// Length of the authentication key and keystream.
pub const KEY_LEN: usize = 16;
/// Length of the RSI challenge value before expansion.
pub const RS_LEN: usize = 10;
/// Length of a RAND challenge value before expansion.
pub const RAND_LEN: usize = 5;
/// Length of a RES response value.
pub const RES_LEN: usize = 4;

fn encrypt_block(key: &[u8; KEY_LEN], block: &[u8; KEY_LEN]) -> [u8; KEY_LEN] {
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut buf = GenericArray::clone_from_slice(block);
    cipher.encrypt_block(&mut buf);
    buf.into()
}

fn expand(short: &[u8], total: usize) -> Vec<u8> {
    let mut buf = short.to_vec();
    buf.resize(total, 0);
    buf
}

/// AM1: derive a keystream from the authentication key and a 10-byte RSI challenge.
pub fn am1(key: &[u8; KEY_LEN], rs: &[u8; RS_LEN]) -> [u8; KEY_LEN] {
    let expanded = expand(rs, KEY_LEN);
    let mut block = [0u8; KEY_LEN];
    block.copy_from_slice(&expanded);

    encrypt_block(key, &block)
}

/// AM2: derive a 4-byte response from an AM1/AM3 keystream and a 5-byte RAND challenge.
pub fn am2(keystream: &[u8; KEY_LEN], rand: &[u8; RAND_LEN]) -> [u8; RES_LEN] {
    let expanded = expand(rand, KEY_LEN);
    let mut block = [0u8; KEY_LEN];
    block.copy_from_slice(&expanded);

    let out = encrypt_block(keystream, &block);
    let mut res = [0u8; RES_LEN];
    res.copy_from_slice(&out[..RES_LEN]);

    res
}

/// AM3: same as [`am1`], but over the bitwise complement of the expanded RSI.
pub fn am3(key: &[u8; KEY_LEN], rs: &[u8; RS_LEN]) -> [u8; KEY_LEN] {
    let expanded = expand(rs, KEY_LEN);
    let mut block = [0u8; KEY_LEN];

    for (b, e) in block.iter_mut().zip(expanded.iter()) {
        *b = !e;
    }

    encrypt_block(key, &block)
}

/// AM4: same as [`am2`], applied to the AM3 keystream with a second RAND challenge.
pub fn am4(keystream: &[u8; KEY_LEN], rand: &[u8; RAND_LEN]) -> [u8; RES_LEN] {
    am2(keystream, rand)
}

/// Compare a subscriber unit's returned RES against the expected value in constant
/// time, so authentication failures can't be timed to narrow down the mismatching byte.
pub fn verify(expected: &[u8; RES_LEN], actual: &[u8; RES_LEN]) -> bool {
    expected.ct_eq(actual).into()
}

#[cfg(test)]
mod test {
    use super::*;

    const K: [u8; KEY_LEN] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
        0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
    ];
    const RS: [u8; RS_LEN] = [0x38, 0xAE, 0xC8, 0x29, 0x33, 0xB1, 0x7F, 0x80, 0x24, 0x9D];

    #[test]
    fn test_am1() {
        let ks = am1(&K, &RS);
        assert_eq!(ks, [
            0x05, 0x24, 0x30, 0xBD, 0xAF, 0x39, 0xE8, 0x2F,
            0xD0, 0xDD, 0xD6, 0x98, 0xC0, 0x2F, 0xB0, 0x36,
        ]);
    }

    #[test]
    fn test_am2() {
        let ks = am1(&K, &RS);
        let rand1 = [0x4D, 0x92, 0x5A, 0xF6, 0x08];

        let res1 = am2(&ks, &rand1);
        assert_eq!(res1, [0x3E, 0x00, 0xFA, 0xA8]);
    }

    #[test]
    fn test_am3() {
        let ks = am3(&K, &RS);
        assert_eq!(ks, [
            0x69, 0xD5, 0xDC, 0x08, 0x02, 0x3C, 0x46, 0x52,
            0xCC, 0x71, 0xD5, 0xCD, 0x1E, 0x74, 0xE1, 0x04,
        ]);
    }

    #[test]
    fn test_am4() {
        let ks = am3(&K, &RS);
        let rand2 = [0x6E, 0x78, 0x4F, 0x75, 0xBD];

        let res2 = am4(&ks, &rand2);
        assert_eq!(res2, [0xB3, 0xAD, 0x16, 0xE1]);
    }

    #[test]
    fn test_verify() {
        let res = [0x3E, 0x00, 0xFA, 0xA8];
        assert!(verify(&res, &res));
        assert!(!verify(&res, &[0, 0, 0, 0]));
    }
}
