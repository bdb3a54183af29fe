use crate::archive_engine::MegVersion;
use crate::utils::parse_buffer_size;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the format version, entry count and size of the archive
    Info,

    /// List every entry with its checksum, offset and size
    List,

    /// Write the bytes of one entry to stdout
    Read {
        /// Path of the entry inside the archive
        entry: String,

        /// Buffer size for streaming the entry (default: 64KB)
        #[arg(short = 'b', long = "buffer-size", value_name = "SIZE", value_parser = parse_buffer_size)]
        buffer_size: Option<usize>,
    },

    /// Create the archive from files and directories
    Pack {
        /// Files or directories to pack; directories are added recursively
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Format version of the new archive
        #[arg(long = "format", value_name = "VERSION", default_value_t = MegVersion::V1)]
        version: MegVersion,

        /// Replace the archive if it already exists
        #[arg(long)]
        overwrite: bool,

        /// Store paths upper-cased with `\` separators
        #[arg(long)]
        normalize: bool,
    },

    /// Create the archive from the entries of other archives
    Merge {
        /// Source archives, lowest priority first
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Keep every entry instead of letting later archives override earlier ones
        #[arg(long = "keep-duplicates")]
        keep_duplicates: bool,

        /// Replace the archive if it already exists
        #[arg(long)]
        overwrite: bool,

        /// Format version of the new archive
        #[arg(long = "format", value_name = "VERSION", default_value_t = MegVersion::V1)]
        version: MegVersion,
    },
}
