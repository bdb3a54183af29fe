use crate::archive_engine::{
    HasCrc32, MegBuilder, MegError, MegFileService, Result, VirtualMegArchiveBuilder,
};
use crate::cli::{Cli, Commands};
use crate::utils::format_bytes;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Executes a parsed command line against the archive engine.
///
/// `info`, `list` and `read` load the archive named on the command line; `pack` and
/// `merge` create it. Errors are returned to `main`, which reports them and exits
/// with a non-zero status.
pub fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Info => {
            let service = MegFileService::new();
            let meg_file = service.load(&cli.archive)?;
            let archive = meg_file.archive();
            let file_size = std::fs::metadata(&cli.archive)?.len();

            println!("\n{:=^50}", " ARCHIVE INFO ");
            println!("{:<25} {:?}", "ARCHIVE FILE:", cli.archive);
            println!("{:-<50}", ""); // Separator

            println!("{:<25} {}", "FORMAT VERSION:", meg_file.version());
            println!("{:<25} {}", "ENCRYPTED:", meg_file.is_encrypted());
            println!("{:<25} {}", "ENTRIES:", archive.len());
            println!("{:<25} {}", "DATA SIZE:", format_bytes(archive.total_data_size()));
            println!("{:<25} {}", "TOTAL SIZE:", format_bytes(file_size));

            println!("{:=<50}", ""); // Footer
        }

        Commands::List => {
            let service = MegFileService::new();
            let meg_file = service.load(&cli.archive)?;

            let stdout = io::stdout();
            let mut out = stdout.lock();

            writeln!(out, "{:<12} {:>10} {:>10}  PATH", "CRC32", "OFFSET", "SIZE")?;
            for entry in meg_file.archive() {
                writeln!(
                    out,
                    "{:<12} {:>10} {:>10}  {}",
                    entry.crc32().to_string(),
                    entry.offset(),
                    entry.size(),
                    entry.path()
                )?;
            }
        }

        Commands::Read { entry, buffer_size } => {
            let service = MegFileService::new();
            let meg_file = service.load(&cli.archive)?;

            let data_entry = meg_file.archive().find_entry(entry).ok_or_else(|| {
                MegError::EntryNotFound {
                    archive_path: cli.archive.clone(),
                    entry_path: entry.clone(),
                }
            })?;

            let buffer_size = buffer_size.unwrap_or(service.write_buffer_size());
            let mut entry_stream = meg_file.open_entry_stream(data_entry)?;
            let mut buffer = vec![0u8; buffer_size];

            let stdout = io::stdout();
            let mut stdout_handle = stdout.lock();
            let is_terminal = stdout_handle.is_terminal();

            loop {
                let bytes_read = entry_stream.read(&mut buffer)?;
                if bytes_read == 0 {
                    break; // End of stream
                }
                stdout_handle.write_all(&buffer[..bytes_read])?;
            }

            // Ensure a newline at the end if it's a terminal
            if is_terminal {
                stdout_handle.write_all(b"\n")?;
            }
            stdout_handle.flush()?;
        }

        Commands::Pack {
            inputs,
            version,
            overwrite,
            normalize,
        } => {
            let mut builder = MegBuilder::new(*version).with_path_normalization(*normalize);

            for input in inputs {
                for (local_path, entry_path) in collect_input_files(input)? {
                    debug!("Packing {:?} as '{}'", local_path, entry_path);
                    builder.add_file(&local_path, &entry_path)?;
                }
            }

            builder.build(&MegFileService::new(), &cli.archive, *overwrite)?;
            println!("Packed {} entries into {:?}", builder.len(), cli.archive);
        }

        Commands::Merge {
            sources,
            keep_duplicates,
            overwrite,
            version,
        } => {
            let service = MegFileService::new();
            let meg_files = sources
                .iter()
                .map(|source| service.load(source).map(Arc::new))
                .collect::<Result<Vec<_>>>()?;

            let virtual_archive =
                VirtualMegArchiveBuilder::new().build_from_archives(&meg_files, !*keep_duplicates)?;
            info!(
                "Merging {} archives into {} entries",
                meg_files.len(),
                virtual_archive.len()
            );

            service.create_archive(
                &cli.archive,
                *version,
                None,
                &virtual_archive.to_builder_infos(),
                *overwrite,
            )?;
            println!(
                "Merged {} archives into {:?} ({} entries)",
                meg_files.len(),
                cli.archive,
                virtual_archive.len()
            );
        }
    }

    Ok(())
}

/// Files under `input` paired with the entry path they are stored under.
///
/// A file is stored under its file name. Files inside a directory are stored under
/// their path relative to that directory, joined with `\`.
fn collect_input_files(input: &Path) -> Result<Vec<(PathBuf, String)>> {
    if input.is_file() {
        let name = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                MegError::InvalidArgument(format!("'{}' has no file name", input.display()))
            })?;
        return Ok(vec![(input.to_path_buf(), name)]);
    }

    if !input.is_dir() {
        return Err(MegError::NotFound {
            path: input.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(input).sort_by_file_name() {
        let entry = entry.map_err(|err| MegError::Io(err.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(input).map_err(|_| {
            MegError::InvalidOperation(format!(
                "walked path {:?} lies outside {:?}",
                entry.path(),
                input
            ))
        })?;

        files.push((entry.path().to_path_buf(), to_entry_path(relative)));
    }

    Ok(files)
}

fn to_entry_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\\")
}
