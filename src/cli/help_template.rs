use indoc::indoc;

// Help text template with placeholder
pub const HELP_TEMPLATE: &str = indoc! {r#"
    Examples:
      # Showing archive info
      %BINARY_NAME% data.meg info

      # Listing the entries of an archive
      %BINARY_NAME% data.meg list

      # Extracting one entry
      %BINARY_NAME% data.meg read "DATA\XML\GAMEOBJECTS.XML" > gameobjects.xml

      # Packing a directory into a new v2 archive
      %BINARY_NAME% patch.meg pack ./Data --format v2 --normalize

      # Merging archives; entries of later archives win
      %BINARY_NAME% merged.meg merge base.meg patch.meg --overwrite

    Set RUST_LOG=debug for diagnostic output.
"#};
