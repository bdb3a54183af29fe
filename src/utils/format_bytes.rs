/// Renders a byte count for listings and archive summaries.
///
/// Sizes below 1 KB are printed as raw bytes; larger sizes use two decimals
/// in the largest fitting unit up to GB.
///
/// # Examples
/// ```
/// use meg_archive::utils::format_bytes;
///
/// assert_eq!(format_bytes(60), "60 bytes");
/// assert_eq!(format_bytes(2048), "2.00 KB");
/// assert_eq!(format_bytes(5_242_880), "5.00 MB");
/// assert_eq!(format_bytes(u32::MAX as u64), "4.00 GB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [(&str, u64); 3] = [("GB", 1 << 30), ("MB", 1 << 20), ("KB", 1 << 10)];

    UNITS
        .iter()
        .find(|(_, scale)| bytes >= *scale)
        .map(|(unit, scale)| format!("{:.2} {}", bytes as f64 / *scale as f64, unit))
        .unwrap_or_else(|| format!("{} bytes", bytes))
}
