/// Parses a copy buffer size such as `64k`, `1mb` or `4096`.
///
/// Used as a `clap` value parser, hence the `String` error. Zero is rejected
/// since a zero-sized buffer cannot make progress.
pub fn parse_buffer_size(size_str: &str) -> Result<usize, String> {
    let size_str = size_str.trim().to_lowercase();

    let num_end = size_str
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(size_str.len());

    let (num_part, unit_part) = size_str.split_at(num_end);

    let multiplier: usize = match unit_part.trim() {
        "" | "b" => 1,
        "k" | "kb" => 1 << 10,
        "m" | "mb" => 1 << 20,
        _ => return Err(format!("Invalid buffer size unit: {}", unit_part)),
    };

    let size = num_part
        .parse::<usize>()
        .map_err(|_| format!("Failed to parse buffer size: {}", size_str))?
        .checked_mul(multiplier)
        .ok_or_else(|| format!("Buffer size out of range: {}", size_str))?;

    if size == 0 {
        return Err("Buffer size must be greater than zero".to_string());
    }

    Ok(size)
}
