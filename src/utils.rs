/// Interprets up to 8 bytes as a big-endian integer.
pub(crate) fn bytes_to_u64(bytes: &[u8]) -> u64 {
    debug_assert!(bytes.len() <= 8);
    bytes
        .iter()
        .fold(0_u64, |acc, &byte| (acc << 8) | u64::from(byte))
}

/// Writes the low `out.len()` bytes of `value` in big-endian order.
pub(crate) fn u64_to_bytes_into(out: &mut [u8], value: u64) {
    debug_assert!(out.len() <= 8);
    let bytes = value.to_be_bytes();
    out.copy_from_slice(&bytes[8 - out.len()..]);
}

/// Keeps the low `bits` bits of `value`.
pub(crate) fn mask_low_bits(value: u64, bits: usize) -> u64 {
    match bits {
        0 => 0,
        b if b >= 64 => value,
        b => value & ((1_u64 << b) - 1),
    }
}

/// Copies `src` into `buf` at `*pos` and advances the position.
pub(crate) fn write_at(buf: &mut [u8], pos: &mut usize, src: &[u8]) {
    buf[*pos..*pos + src.len()].copy_from_slice(src);
    *pos += src.len();
}

/// Splits a byte slice into consecutive chunks of the given sizes.
///
/// Returns `None` unless the sizes add up exactly to the slice length.
pub(crate) fn split_exact<'a>(mut data: &'a [u8], sizes: &[usize]) -> Option<Vec<&'a [u8]>> {
    let mut parts = Vec::with_capacity(sizes.len());
    for &size in sizes {
        if data.len() < size {
            return None;
        }
        let (head, tail) = data.split_at(size);
        parts.push(head);
        data = tail;
    }
    data.is_empty().then_some(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_helpers() {
        assert_eq!(bytes_to_u64(&[]), 0);
        assert_eq!(bytes_to_u64(&[0x01, 0x02]), 0x0102);
        assert_eq!(bytes_to_u64(&[0xff; 8]), u64::MAX);

        let mut out = [0u8; 3];
        u64_to_bytes_into(&mut out, 0x0a0b0c0d);
        assert_eq!(out, [0x0b, 0x0c, 0x0d]);

        assert_eq!(mask_low_bits(u64::MAX, 0), 0);
        assert_eq!(mask_low_bits(u64::MAX, 3), 7);
        assert_eq!(mask_low_bits(u64::MAX, 64), u64::MAX);
    }

    #[test]
    fn test_split_exact() {
        let data = [1u8, 2, 3, 4, 5];
        let parts = split_exact(&data, &[1, 0, 4]).unwrap();
        assert_eq!(parts, vec![&[1u8][..], &[][..], &[2, 3, 4, 5][..]]);
        assert!(split_exact(&data, &[2, 2]).is_none());
        assert!(split_exact(&data, &[4, 2]).is_none());
    }
}
