use crc32fast::Hasher as Crc32FastHasher;

/// Computes the standard (IEEE 802.3) CRC32 of `data`.
///
/// This is the checksum MEG archives store for every entry name. `crc32fast`
/// picks a SIMD implementation (PCLMULQDQ on x86_64, CRC instructions on
/// aarch64) at runtime when one is available.
///
/// # Examples
/// ```
/// use meg_archive::digest::compute_crc32;
///
/// assert_eq!(compute_crc32(b"123456789"), 0xCBF4_3926);
/// ```
#[inline]
pub fn compute_crc32(data: &[u8]) -> u32 {
    let mut hasher = Crc32FastHasher::new();
    hasher.update(data);
    hasher.finalize()
}
