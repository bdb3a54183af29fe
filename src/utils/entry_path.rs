/// Canonical form of an archive entry path.
///
/// Trims surrounding whitespace, turns `/` into `\` and upper-cases ASCII
/// letters, which is how game tooling stores paths inside MEG archives.
pub fn normalize_entry_path(path: &str) -> String {
    path.trim()
        .chars()
        .map(|c| match c {
            '/' => '\\',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Replaces every non-ASCII character with `?`.
pub fn encode_ascii_lossy(path: &str) -> String {
    path.chars()
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_case() {
        assert_eq!(
            normalize_entry_path("  data/xml/gameobjects.xml "),
            "DATA\\XML\\GAMEOBJECTS.XML"
        );
        assert_eq!(normalize_entry_path("DATA\\ART"), "DATA\\ART");
    }

    #[test]
    fn replaces_non_ascii() {
        assert_eq!(encode_ascii_lossy("caf\u{e9}.txt"), "caf?.txt");
        assert_eq!(encode_ascii_lossy("plain"), "plain");
    }
}
