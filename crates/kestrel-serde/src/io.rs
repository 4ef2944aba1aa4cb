use num_bigint::BigUint;

use crate::StateError;

pub trait StateEncode {
    fn encode_state(&self, out: &mut Vec<u8>);
}

pub trait StateDecode: Sized {
    fn decode_state(input: &mut &[u8]) -> Result<Self, StateError>;
}

/// Decode a full record, rejecting trailing bytes. Storage values are
/// written by `StateEncode` only, so leftovers always mean corruption.
pub fn decode_all<T: StateDecode>(bytes: &[u8]) -> Result<T, StateError> {
    let mut input = bytes;
    let value = T::decode_state(&mut input)?;
    if !input.is_empty() {
        return Err(StateError::TrailingBytes);
    }
    Ok(value)
}

// Primitive helpers. Fixed-width integers are little-endian; big integers
// are length-prefixed big-endian magnitudes with empty bytes meaning zero,
// matching the representation the host uses for consensus hashing.

pub fn put_u8(out: &mut Vec<u8>, v: u8) {
    out.push(v);
}

pub fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn put_u64(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn put_i64(out: &mut Vec<u8>, v: i64) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn put_bool(out: &mut Vec<u8>, v: bool) {
    out.push(v as u8);
}

pub fn put_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    let len = len_to_u16(bytes.len());
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(bytes);
}

pub fn put_big_uint(out: &mut Vec<u8>, v: &BigUint) {
    if *v == BigUint::default() {
        put_var_bytes(out, &[]);
    } else {
        put_var_bytes(out, &v.to_bytes_be());
    }
}

pub fn get_u8(input: &mut &[u8]) -> Result<u8, StateError> {
    if input.is_empty() {
        return Err(StateError::UnexpectedEof);
    }
    let (b, rest) = input.split_at(1);
    *input = rest;
    Ok(b[0])
}

pub fn get_u16(input: &mut &[u8]) -> Result<u16, StateError> {
    if input.len() < 2 {
        return Err(StateError::UnexpectedEof);
    }
    let (b, rest) = input.split_at(2);
    *input = rest;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

pub fn get_u32(input: &mut &[u8]) -> Result<u32, StateError> {
    if input.len() < 4 {
        return Err(StateError::UnexpectedEof);
    }
    let (b, rest) = input.split_at(4);
    *input = rest;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

pub fn get_u64(input: &mut &[u8]) -> Result<u64, StateError> {
    if input.len() < 8 {
        return Err(StateError::UnexpectedEof);
    }
    let (b, rest) = input.split_at(8);
    *input = rest;
    Ok(u64::from_le_bytes([
        b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
    ]))
}

pub fn get_i64(input: &mut &[u8]) -> Result<i64, StateError> {
    Ok(get_u64(input)? as i64)
}

pub fn get_bool(input: &mut &[u8]) -> Result<bool, StateError> {
    match get_u8(input)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(StateError::InvalidValue("boolean flag")),
    }
}

pub fn get_bytes<'a>(input: &mut &'a [u8], len: usize) -> Result<&'a [u8], StateError> {
    if input.len() < len {
        return Err(StateError::UnexpectedEof);
    }
    let (b, rest) = input.split_at(len);
    *input = rest;
    Ok(b)
}

pub fn get_var_bytes(input: &mut &[u8]) -> Result<Vec<u8>, StateError> {
    let len = get_u16(input)? as usize;
    Ok(get_bytes(input, len)?.to_vec())
}

pub fn get_big_uint(input: &mut &[u8]) -> Result<BigUint, StateError> {
    let bytes = get_var_bytes(input)?;
    Ok(BigUint::from_bytes_be(&bytes))
}

/// Convert a usize length to u16, panicking on overflow. Only used for
/// locally constructed state entries; overflow is a programming error.
pub fn len_to_u16(len: usize) -> u16 {
    assert!(
        len <= u16::MAX as usize,
        "state length {} exceeds u16::MAX; this is a programming error",
        len
    );
    len as u16
}
