// src/abi.rs
//! Just enough of the Solidity ABI for the staking contract: `uint256`,
//! `address` and `bool` words, a dynamic `uint256[]`, and static tuples.

use crate::error::{Result, StakingError};
use crate::wallet::Address;
use sha3::{Digest, Keccak256};

pub const WORD: usize = 32;

/// First four bytes of keccak256 of the canonical signature
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Uint(u128),
    Address(Address),
}

impl Token {
    fn to_word(self) -> [u8; WORD] {
        let mut word = [0u8; WORD];
        match self {
            Token::Uint(v) => word[16..].copy_from_slice(&v.to_be_bytes()),
            Token::Address(a) => word[12..].copy_from_slice(a.as_bytes()),
        }
        word
    }
}

/// Calldata for a function taking only static arguments
pub fn encode_call(signature: &str, args: &[Token]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + args.len() * WORD);
    data.extend_from_slice(&selector(signature));
    for arg in args {
        data.extend_from_slice(&arg.to_word());
    }
    data
}

/// Cursor over ABI-encoded return data
pub struct Decoder<'a> {
    data: &'a [u8],
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn word(&self, index: usize) -> Result<&'a [u8]> {
        let range = index
            .checked_mul(WORD)
            .and_then(|start| start.checked_add(WORD).map(|end| start..end));
        range.and_then(|r| self.data.get(r)).ok_or_else(|| {
            StakingError::Decode(format!(
                "return data too short: need word {} of {} bytes",
                index,
                self.data.len()
            ))
        })
    }

    /// `uint256` at word `index`, rejecting values above `u128::MAX`
    pub fn uint(&self, index: usize) -> Result<u128> {
        let word = self.word(index)?;
        if word[..16].iter().any(|b| *b != 0) {
            return Err(StakingError::Decode(format!("uint256 at word {} exceeds 128 bits", index)));
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&word[16..]);
        Ok(u128::from_be_bytes(low))
    }

    pub fn uint64(&self, index: usize) -> Result<u64> {
        let value = self.uint(index)?;
        u64::try_from(value)
            .map_err(|_| StakingError::Decode(format!("value at word {} exceeds 64 bits", index)))
    }

    /// `uint256` that must also fit a signed 64-bit value, e.g. a timestamp
    pub fn int64(&self, index: usize) -> Result<i64> {
        let value = self.uint(index)?;
        i64::try_from(value)
            .map_err(|_| StakingError::Decode(format!("value at word {} exceeds i64 range", index)))
    }

    pub fn address(&self, index: usize) -> Result<Address> {
        let word = self.word(index)?;
        if word[..12].iter().any(|b| *b != 0) {
            return Err(StakingError::Decode(format!("dirty address padding at word {}", index)));
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&word[12..]);
        Ok(Address(bytes))
    }

    pub fn boolean(&self, index: usize) -> Result<bool> {
        match self.uint(index)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(StakingError::Decode(format!("invalid bool {} at word {}", other, index))),
        }
    }

    /// A dynamic `uint256[]` whose head offset sits at word `index`
    pub fn uint_array(&self, index: usize) -> Result<Vec<u128>> {
        let offset = usize::try_from(self.uint(index)?)
            .map_err(|_| StakingError::Decode("array offset out of range".to_string()))?;
        if offset % WORD != 0 {
            return Err(StakingError::Decode(format!("misaligned array offset {}", offset)));
        }
        let base = offset / WORD;
        let len = usize::try_from(self.uint(base)?)
            .map_err(|_| StakingError::Decode("array length out of range".to_string()))?;
        if len > self.data.len() / WORD {
            return Err(StakingError::Decode(format!("array length {} exceeds return data", len)));
        }
        let first = base
            .checked_add(1)
            .ok_or_else(|| StakingError::Decode(format!("array offset {} out of range", offset)))?;
        (0..len)
            .map(|i| {
                let index = first
                    .checked_add(i)
                    .ok_or_else(|| StakingError::Decode("array index out of range".to_string()))?;
                self.uint(index)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_of(value: u128) -> Vec<u8> {
        Token::Uint(value).to_word().to_vec()
    }

    #[test]
    fn test_selector_matches_known_erc20_transfer() {
        assert_eq!(hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
    }

    #[test]
    fn test_encode_call_layout() {
        let address: Address = "0x00000000000000000000000000000000000000ff".parse().unwrap();
        let data = encode_call("f(address,uint256)", &[Token::Address(address), Token::Uint(7)]);
        assert_eq!(data.len(), 4 + 2 * WORD);
        assert_eq!(data[4 + 31], 0xff);
        assert_eq!(data[4 + WORD + 31], 7);
        assert!(data[4..4 + 31].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_decode_uint_array() {
        let mut data = word_of(0x20);
        data.extend(word_of(3));
        data.extend(word_of(5));
        data.extend(word_of(6));
        data.extend(word_of(9));
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.uint_array(0).unwrap(), vec![5, 6, 9]);
    }

    #[test]
    fn test_decode_empty_array() {
        let mut data = word_of(0x20);
        data.extend(word_of(0));
        assert!(Decoder::new(&data).uint_array(0).unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_truncated_and_oversized() {
        let mut data = word_of(0x20);
        data.extend(word_of(4));
        data.extend(word_of(1));
        assert!(Decoder::new(&data).uint_array(0).is_err());

        let mut big = vec![0u8; WORD];
        big[0] = 1;
        assert!(Decoder::new(&big).uint(0).is_err());
    }

    #[test]
    fn test_huge_array_offset_is_a_decode_error() {
        let data = word_of(0xffff_ffff_ffff_ffe0);
        let err = Decoder::new(&data).uint_array(0).unwrap_err();
        assert!(matches!(err, StakingError::Decode(_)));
    }

    #[test]
    fn test_word_index_past_usize_range() {
        let data = word_of(1);
        assert!(matches!(Decoder::new(&data).uint(usize::MAX), Err(StakingError::Decode(_))));
    }

    #[test]
    fn test_decode_bool() {
        let data = [word_of(1), word_of(0), word_of(2)].concat();
        let decoder = Decoder::new(&data);
        assert!(decoder.boolean(0).unwrap());
        assert!(!decoder.boolean(1).unwrap());
        assert!(decoder.boolean(2).is_err());
    }
}
