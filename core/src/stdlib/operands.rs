//! Operand decoding shared by the standard handlers.
//!
//! Integers are big-endian two's complement of 1 to 8 bytes, sign-extended to
//! `i64`. Addresses, jump targets and counts are `u16` big-endian.

use crate::vm::HandlerError;

/// Decode a sign-extended big-endian integer.
pub fn int(params: &[u8]) -> Result<i64, HandlerError> {
    if params.is_empty() || params.len() > 8 {
        return Err(HandlerError::InvalidOperand {
            expected: "1 to 8 bytes",
            found: params.len(),
        });
    }
    let fill = if params[0] & 0x80 != 0 { 0xff } else { 0x00 };
    let mut bytes = [fill; 8];
    bytes[8 - params.len()..].copy_from_slice(params);
    Ok(i64::from_be_bytes(bytes))
}

/// Shortest big-endian encoding of `value` that [`int`] decodes back.
pub fn encode_int(value: i64) -> crate::Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < 7 {
        let (byte, next) = (bytes[start], bytes[start + 1]);
        let redundant = (byte == 0x00 && next & 0x80 == 0) || (byte == 0xff && next & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].into()
}

pub fn u16_at(params: &[u8], index: usize) -> Option<u16> {
    let bytes = params.get(index * 2..index * 2 + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Exactly `N` consecutive u16 values.
pub fn u16s<const N: usize>(params: &[u8]) -> Result<[u16; N], HandlerError> {
    if params.len() != N * 2 {
        return Err(HandlerError::InvalidOperand {
            expected: match N {
                1 => "2 bytes",
                2 => "4 bytes",
                _ => "6 bytes",
            },
            found: params.len(),
        });
    }
    let mut out = [0; N];
    for (index, slot) in out.iter_mut().enumerate() {
        *slot = u16_at(params, index).unwrap_or_default();
    }
    Ok(out)
}

pub fn address(params: &[u8]) -> Result<usize, HandlerError> {
    let [address] = u16s::<1>(params)?;
    Ok(address as usize)
}
