//! Minimal ABI codec for the voting contract.
//!
//! Covers exactly the shapes the contract surface needs: selector and event
//! topic hashing, call encoding for `(string,string)` and `(address)`
//! arguments, and decoding of the candidate tuple array returned by
//! `fetchCandidates()`. Vote counts and ids travel as 256-bit words on the
//! wire and are converted to plain `u64`s for display; a value that does not
//! fit is a decode error, never a silent truncation.

use crate::chain::contract::Candidate;
use sha3::{Digest, Keccak256};
use thiserror::Error;

pub const WORD: usize = 32;

#[derive(Debug, Error)]
pub enum AbiError {
    #[error("response data truncated at byte {0}")]
    Truncated(usize),

    #[error("offset at byte {0} points outside the response data")]
    BadOffset(usize),

    #[error("numeric field does not fit in 64 bits")]
    NumberTooLarge,

    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("string field is not valid UTF-8")]
    InvalidUtf8,
}

fn keccak(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// First four bytes of the Keccak-256 hash of the function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// topic0 of a log emitted for the given event signature.
pub fn event_topic(signature: &str) -> [u8; 32] {
    keccak(signature.as_bytes())
}

pub fn parse_address(s: &str) -> Result<[u8; 20], AbiError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(digits).map_err(|_| AbiError::InvalidAddress(s.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| AbiError::InvalidAddress(s.to_string()))
}

fn padded_len(n: usize) -> usize {
    n.div_ceil(WORD) * WORD
}

fn push_word_u64(out: &mut Vec<u8>, value: u64) {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    out.extend_from_slice(&word);
}

fn push_padded(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(bytes);
    out.resize(out.len() + padded_len(bytes.len()) - bytes.len(), 0);
}

/// Encode a call taking two dynamic strings: selector, two head offsets,
/// then each string's length-prefixed, word-padded tail.
pub fn encode_string_pair(signature: &str, a: &str, b: &str) -> Vec<u8> {
    let mut out = selector(signature).to_vec();
    let a_tail = WORD + padded_len(a.len());
    push_word_u64(&mut out, 2 * WORD as u64);
    push_word_u64(&mut out, (2 * WORD + a_tail) as u64);
    push_word_u64(&mut out, a.len() as u64);
    push_padded(&mut out, a.as_bytes());
    push_word_u64(&mut out, b.len() as u64);
    push_padded(&mut out, b.as_bytes());
    out
}

/// Encode a call taking a single address argument.
pub fn encode_address_arg(signature: &str, address: &str) -> Result<Vec<u8>, AbiError> {
    let addr = parse_address(address)?;
    let mut out = selector(signature).to_vec();
    out.extend_from_slice(&[0u8; WORD - 20]);
    out.extend_from_slice(&addr);
    Ok(out)
}

struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn word(&self, offset: usize) -> Result<&'a [u8], AbiError> {
        self.data
            .get(offset..offset + WORD)
            .ok_or(AbiError::Truncated(offset))
    }

    /// A word interpreted as a plain number. The upper 24 bytes must be
    /// zero: these are display values, not balances.
    fn u64_at(&self, offset: usize) -> Result<u64, AbiError> {
        let word = self.word(offset)?;
        if word[..WORD - 8].iter().any(|b| *b != 0) {
            return Err(AbiError::NumberTooLarge);
        }
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&word[WORD - 8..]);
        Ok(u64::from_be_bytes(buf))
    }

    fn offset_at(&self, offset: usize) -> Result<usize, AbiError> {
        let value = self.u64_at(offset).map_err(|_| AbiError::BadOffset(offset))?;
        usize::try_from(value).map_err(|_| AbiError::BadOffset(offset))
    }

    fn string_at(&self, offset: usize) -> Result<String, AbiError> {
        let len = self.offset_at(offset)?;
        let start = offset + WORD;
        let bytes = self
            .data
            .get(start..start + len)
            .ok_or(AbiError::Truncated(start))?;
        String::from_utf8(bytes.to_vec()).map_err(|_| AbiError::InvalidUtf8)
    }

    fn address_at(&self, offset: usize) -> Result<String, AbiError> {
        let word = self.word(offset)?;
        Ok(format!("0x{}", hex::encode(&word[WORD - 20..])))
    }
}

/// Decode the return data of `fetchCandidates()`: a dynamic array of
/// `(uint256 id, string name, uint256 totalVote, string imageHash,
/// address candidateAddress)` tuples, in contract order.
pub fn decode_candidates(data: &[u8]) -> Result<Vec<Candidate>, AbiError> {
    let r = Reader { data };
    let array_offset = r.offset_at(0)?;
    let len = r.offset_at(array_offset)?;
    let base = array_offset + WORD;

    let mut candidates = Vec::with_capacity(len);
    for i in 0..len {
        let elem = base + r.offset_at(base + i * WORD)?;
        let name_offset = elem + r.offset_at(elem + WORD)?;
        let image_offset = elem + r.offset_at(elem + 3 * WORD)?;
        candidates.push(Candidate {
            id: r.u64_at(elem)?,
            name: r.string_at(name_offset)?,
            total_vote: r.u64_at(elem + 2 * WORD)?,
            image_hash: r.string_at(image_offset)?,
            candidate_address: r.address_at(elem + 4 * WORD)?,
        });
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test-side encoder for the candidate tuple array, mirroring what the
    // node returns for fetchCandidates().
    fn encode_candidates(candidates: &[Candidate]) -> Vec<u8> {
        let mut elements: Vec<Vec<u8>> = Vec::new();
        for c in candidates {
            let mut elem = Vec::new();
            push_word_u64(&mut elem, c.id);
            let name_tail = WORD + padded_len(c.name.len());
            push_word_u64(&mut elem, 5 * WORD as u64);
            push_word_u64(&mut elem, c.total_vote);
            push_word_u64(&mut elem, (5 * WORD + name_tail) as u64);
            let addr = parse_address(&c.candidate_address).unwrap();
            elem.extend_from_slice(&[0u8; WORD - 20]);
            elem.extend_from_slice(&addr);
            push_word_u64(&mut elem, c.name.len() as u64);
            push_padded(&mut elem, c.name.as_bytes());
            push_word_u64(&mut elem, c.image_hash.len() as u64);
            push_padded(&mut elem, c.image_hash.as_bytes());
            elements.push(elem);
        }

        let mut out = Vec::new();
        push_word_u64(&mut out, WORD as u64);
        push_word_u64(&mut out, candidates.len() as u64);
        let mut running = candidates.len() * WORD;
        for elem in &elements {
            push_word_u64(&mut out, running as u64);
            running += elem.len();
        }
        for elem in elements {
            out.extend_from_slice(&elem);
        }
        out
    }

    fn alice() -> Candidate {
        Candidate {
            id: 1,
            name: "Alice".into(),
            total_vote: 0,
            image_hash: "Qm123".into(),
            candidate_address: "0x0000000000000000000000000000000000000abc".into(),
        }
    }

    #[test]
    fn selector_matches_known_value() {
        // Canonical ERC-20 transfer selector.
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn event_topic_is_full_hash() {
        let topic = event_topic("Voted(address,address)");
        assert_eq!(&topic[..4], &selector("Voted(address,address)"));
    }

    #[test]
    fn encode_address_arg_layout() {
        let addr = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
        let data = encode_address_arg("vote(address)", addr).unwrap();
        assert_eq!(data.len(), 4 + WORD);
        assert_eq!(&data[4..16], &[0u8; 12]);
        assert_eq!(hex::encode(&data[16..]), addr[2..].to_lowercase());
    }

    #[test]
    fn encode_address_arg_rejects_garbage() {
        assert!(encode_address_arg("vote(address)", "").is_err());
        assert!(encode_address_arg("vote(address)", "0x1234").is_err());
        assert!(encode_address_arg("vote(address)", "not-an-address").is_err());
    }

    #[test]
    fn encode_string_pair_layout() {
        let data = encode_string_pair("registerCandidate(string,string)", "Alice", "https://x/y");
        let args = &data[4..];
        let r = Reader { data: args };
        let a_off = r.offset_at(0).unwrap();
        let b_off = r.offset_at(WORD).unwrap();
        assert_eq!(a_off, 64);
        assert_eq!(r.string_at(a_off).unwrap(), "Alice");
        assert_eq!(r.string_at(b_off).unwrap(), "https://x/y");
    }

    #[test]
    fn decode_example_record() {
        let raw = encode_candidates(&[alice()]);
        let decoded = decode_candidates(&raw).unwrap();
        assert_eq!(decoded, vec![alice()]);
    }

    #[test]
    fn decode_preserves_order_and_count() {
        let mut bob = alice();
        bob.id = 2;
        bob.name = "Bob".into();
        bob.total_vote = 7;
        bob.candidate_address = "0x1111111111111111111111111111111111111111".into();
        let raw = encode_candidates(&[alice(), bob.clone()]);
        let decoded = decode_candidates(&raw).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].name, "Alice");
        assert_eq!(decoded[1], bob);
    }

    #[test]
    fn decode_empty_array() {
        let raw = encode_candidates(&[]);
        assert_eq!(decode_candidates(&raw).unwrap(), vec![]);
    }

    #[test]
    fn oversized_numeric_is_an_error() {
        let mut raw = encode_candidates(&[alice()]);
        // Poison the id word of the first element (offset word + length word
        // + one element offset word puts the element at byte 96).
        raw[96] = 0xff;
        assert!(matches!(
            decode_candidates(&raw),
            Err(AbiError::NumberTooLarge)
        ));
    }

    #[test]
    fn truncated_data_is_an_error() {
        let raw = encode_candidates(&[alice()]);
        assert!(decode_candidates(&raw[..raw.len() - 40]).is_err());
        assert!(decode_candidates(&[]).is_err());
    }
}
