//! Reader, writer and overlay composer for MEG archives.
//!
//! A MEG archive is a flat, offset-addressed container: a header, a table of ASCII
//! entry names, a file table sorted by the CRC32 of each name, and the entry bytes
//! laid out contiguously after the metadata.
//!
//! The crate is organised leaf to root:
//! - [`Crc32`] and the [`crc32_index`] utilities (stable sort, sortedness checks,
//!   checksum → index-range tables).
//! - The [`binary`] metadata model ([`MegFileMetadata`] and its tables).
//! - The [`VirtualMegArchive`] composer for overlaying several sources.
//! - [`MegFileService`], which loads archives and writes new ones.

pub mod archive_engine;
pub use archive_engine::*;

pub mod cli;

pub mod utils;
