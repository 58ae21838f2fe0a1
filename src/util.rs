use bytes::{Buf, BufMut};
use std::convert::TryFrom;

pub(crate) fn peek_u8<B: Buf>(b: &B) -> Option<u8> {
    b.chunk().get(0).copied()
}

/// Reads a `string`, failing instead of panicking on short input.
pub(crate) fn get_ssh_string<B: Buf>(mut b: B) -> Result<Vec<u8>, crate::Error> {
    if b.remaining() < 4 {
        return Err(crate::Error::userauth("truncated string length"));
    }
    let len = b.get_u32() as usize;
    if b.remaining() < len {
        return Err(crate::Error::userauth("truncated string"));
    }
    let mut s = vec![0u8; len];
    b.copy_to_slice(&mut s[..]);
    Ok(s)
}

pub(crate) fn put_ssh_string<B: BufMut>(mut b: B, s: &[u8]) {
    let len = s.len() as u32;
    b.put_u32(len);
    b.put_slice(s);
}

/// Converts a payload size to the `uint32` announced to the transport.
pub(crate) fn payload_length(len: usize) -> Result<u32, crate::Error> {
    u32::try_from(len)
        .map_err(|_| crate::Error::userauth(format!("payload of {} bytes is too large", len)))
}

/// Writes an unsigned big-endian integer as `mpint`.
///
/// Leading zeros are stripped and a zero byte is prepended when the most
/// significant bit is set, so the value is never read back as negative.
pub(crate) fn put_ssh_mpint<B: BufMut>(mut b: B, data: &[u8]) {
    let i = data.iter().take_while(|&&b| b == 0).count();
    let data = &data[i..];
    let data_len = data.len() as u32;
    match data.get(0) {
        Some(byte) if byte & 0x80 != 0 => {
            b.put_u32(data_len + 1);
            b.put_u8(0);
            b.put_slice(data);
        }
        Some(..) => {
            b.put_u32(data_len);
            b.put_slice(data);
        }
        None => {
            b.put_u32(0);
        }
    }
}
