mod compute_crc32;
pub use compute_crc32::compute_crc32;
