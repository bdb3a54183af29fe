#[cfg(test)]
mod tests {
    use meg_archive::{
        HasCrc32, MegDataEntry, MegEncryptionData, MegError, MegFileDataEntryBuilderInfo,
        MegFileService, MegVersion,
    };
    use std::fs;
    use std::io::Read;
    use std::path::{Path, PathBuf};
    use tempfile::{TempDir, tempdir};

    fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("Failed to write source file");
        path
    }

    fn le(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|word| word.to_le_bytes()).collect()
    }

    /// Creates an archive from `(entry path, contents)` pairs.
    fn create_archive(version: MegVersion, files: &[(&str, &[u8])]) -> (TempDir, PathBuf) {
        let dir = tempdir().expect("Failed to create temp dir");
        let infos: Vec<_> = files
            .iter()
            .enumerate()
            .map(|(i, (entry_path, contents))| {
                let local = write_file(dir.path(), &format!("src_{}.bin", i), contents);
                MegFileDataEntryBuilderInfo::from_file(local, entry_path)
            })
            .collect();

        let archive = dir.path().join("test.meg");
        MegFileService::new()
            .create_archive(&archive, version, None, &infos, false)
            .expect("Failed to create archive");
        (dir, archive)
    }

    #[test]
    fn test_duplicate_paths_v1_layout() {
        let dir = tempdir().unwrap();
        let one = write_file(dir.path(), "1.txt", b"123");
        let two = write_file(dir.path(), "2.txt", b"456");
        let archive = dir.path().join("dup.meg");

        let infos = vec![
            MegFileDataEntryBuilderInfo::from_file(&one, "file"),
            MegFileDataEntryBuilderInfo::from_file(&two, "file"),
        ];
        MegFileService::new()
            .create_archive(&archive, MegVersion::V1, None, &infos, false)
            .unwrap();

        let crc = crc32fast::hash(b"file");
        let mut expected = le(&[2, 2]);
        for _ in 0..2 {
            expected.extend_from_slice(&[4, 0, b'f', b'i', b'l', b'e']);
        }
        expected.extend_from_slice(&le(&[crc, 0, 3, 60, 0]));
        expected.extend_from_slice(&le(&[crc, 1, 3, 63, 1]));
        expected.extend_from_slice(b"123456");

        assert_eq!(fs::read(&archive).unwrap(), expected);

        let meg_file = MegFileService::new().load(&archive).unwrap();
        let entries = meg_file.archive().find_all_entries("file");
        assert_eq!(entries.len(), 2);
        assert_eq!(meg_file.entry_handle(entries.first().unwrap()).unwrap(), b"123".to_vec());
    }

    #[test]
    fn test_round_trip_every_version() {
        let files: &[(&str, &[u8])] = &[
            ("DATA\\XML\\GAMEOBJECTS.XML", b"<xml/>"),
            ("DATA\\ART\\MODEL.ALO", b"\x00\x01\x02\x03"),
            ("EMPTY.TXT", b""),
        ];

        for version in [MegVersion::V1, MegVersion::V2, MegVersion::V3] {
            let (_dir, archive) = create_archive(version, files);
            let service = MegFileService::new();

            assert_eq!(service.get_version(&archive).unwrap(), (version, false));

            let meg_file = service.load(&archive).unwrap();
            assert_eq!(meg_file.version(), version);
            assert!(!meg_file.is_encrypted());
            assert_eq!(meg_file.archive().len(), files.len());

            let crcs: Vec<_> = meg_file.archive().iter().map(|entry| entry.crc32()).collect();
            let mut sorted = crcs.clone();
            sorted.sort();
            assert_eq!(crcs, sorted, "File table of {} is not sorted", version);

            for (path, contents) in files {
                let entry = meg_file.archive().find_entry(path).expect("Entry missing");
                assert_eq!(entry.size() as usize, contents.len());

                let mut stream = meg_file.open_entry_stream(entry).unwrap();
                let mut read_back = Vec::new();
                stream.read_to_end(&mut read_back).unwrap();
                assert_eq!(&read_back, contents);
            }
        }
    }

    #[test]
    fn test_empty_archive() {
        let (_dir, archive) = create_archive(MegVersion::V1, &[]);
        assert_eq!(fs::read(&archive).unwrap(), le(&[0, 0]));

        let meg_file = MegFileService::new().load(&archive).unwrap();
        assert!(meg_file.archive().is_empty());
    }

    #[test]
    fn test_declared_size_mismatch() {
        let dir = tempdir().unwrap();
        let local = write_file(dir.path(), "a.txt", b"abc");
        let infos = vec![MegFileDataEntryBuilderInfo::from_file(&local, "A.TXT").with_size(4)];

        let err = MegFileService::new()
            .create_archive(&dir.path().join("out.meg"), MegVersion::V1, None, &infos, false)
            .unwrap_err();
        assert!(matches!(
            err,
            MegError::SizeMismatch {
                declared: 4,
                actual: 3,
                ..
            }
        ));
        assert!(!dir.path().join("out.meg").exists());
    }

    #[test]
    fn test_missing_source_file() {
        let dir = tempdir().unwrap();
        let infos = vec![MegFileDataEntryBuilderInfo::from_file(
            dir.path().join("missing.txt"),
            "MISSING.TXT",
        )];

        let err = MegFileService::new()
            .create_archive(&dir.path().join("out.meg"), MegVersion::V1, None, &infos, false)
            .unwrap_err();
        assert!(matches!(err, MegError::NotFound { .. }));
    }

    #[test]
    fn test_invalid_entry_path() {
        let dir = tempdir().unwrap();
        let local = write_file(dir.path(), "a.txt", b"abc");
        let infos = vec![MegFileDataEntryBuilderInfo::from_file(&local, "  ")];

        let err = MegFileService::new()
            .create_archive(&dir.path().join("out.meg"), MegVersion::V1, None, &infos, false)
            .unwrap_err();
        assert!(matches!(err, MegError::InvalidArgument(_)));
    }

    #[test]
    fn test_encryption_is_unsupported_on_create() {
        let dir = tempdir().unwrap();
        let local = write_file(dir.path(), "a.txt", b"abc");
        let target = dir.path().join("out.meg");

        let infos = vec![MegFileDataEntryBuilderInfo::from_file(&local, "A.TXT")];
        let key = MegEncryptionData::new(&[0u8; 16], &[0u8; 16]);
        let err = MegFileService::new()
            .create_archive(&target, MegVersion::V3, Some(&key), &infos, false)
            .unwrap_err();
        assert!(matches!(err, MegError::Unsupported(_)));

        let infos = vec![MegFileDataEntryBuilderInfo::from_file(&local, "A.TXT").with_encryption(true)];
        let err = MegFileService::new()
            .create_archive(&target, MegVersion::V3, None, &infos, false)
            .unwrap_err();
        assert!(matches!(err, MegError::Unsupported(_)));
    }

    #[test]
    fn test_overwrite_flag() {
        let (dir, archive) = create_archive(MegVersion::V1, &[("A", b"first")]);
        let local = write_file(dir.path(), "second.txt", b"second");
        let infos = vec![MegFileDataEntryBuilderInfo::from_file(&local, "A")];
        let service = MegFileService::new();

        let err = service
            .create_archive(&archive, MegVersion::V1, None, &infos, false)
            .unwrap_err();
        match err {
            MegError::Io(io_err) => assert_eq!(io_err.kind(), std::io::ErrorKind::AlreadyExists),
            other => panic!("Unexpected error: {:?}", other),
        }

        service
            .create_archive(&archive, MegVersion::V1, None, &infos, true)
            .unwrap();
        let meg_file = service.load(&archive).unwrap();
        let entry = meg_file.archive().find_entry("A").unwrap();
        assert_eq!(meg_file.entry_handle(entry).unwrap().as_slice(), b"second");
    }

    #[test]
    fn test_creates_missing_destination_directory() {
        let dir = tempdir().unwrap();
        let local = write_file(dir.path(), "a.txt", b"abc");
        let target = dir.path().join("nested").join("deeper").join("out.meg");

        let infos = vec![MegFileDataEntryBuilderInfo::from_file(&local, "A.TXT")];
        MegFileService::new()
            .create_archive(&target, MegVersion::V2, None, &infos, false)
            .unwrap();

        assert!(target.is_file());
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "Temporary files left behind");
    }

    #[test]
    fn test_load_missing_archive() {
        let dir = tempdir().unwrap();
        let err = MegFileService::new()
            .load(&dir.path().join("nope.meg"))
            .unwrap_err();
        assert!(matches!(err, MegError::NotFound { .. }));
    }

    #[test]
    fn test_load_garbage_is_corrupted() {
        let dir = tempdir().unwrap();
        let service = MegFileService::new();

        let tiny = write_file(dir.path(), "tiny.meg", b"abc");
        assert!(matches!(
            service.load(&tiny),
            Err(MegError::ArchiveCorrupted { .. })
        ));

        let text = write_file(dir.path(), "text.meg", b"this is definitely not an archive");
        assert!(matches!(
            service.load(&text),
            Err(MegError::ArchiveCorrupted { .. })
        ));
    }

    #[test]
    fn test_load_truncated_and_padded_archives() {
        let (_dir, archive) = create_archive(MegVersion::V1, &[("A", b"abc"), ("B", b"defg")]);
        let bytes = fs::read(&archive).unwrap();
        let service = MegFileService::new();

        fs::write(&archive, &bytes[..bytes.len() - 1]).unwrap();
        assert!(matches!(
            service.load(&archive),
            Err(MegError::ArchiveCorrupted { .. })
        ));

        let mut padded = bytes.clone();
        padded.push(0);
        fs::write(&archive, &padded).unwrap();
        assert!(matches!(
            service.load(&archive),
            Err(MegError::ArchiveCorrupted { .. })
        ));
    }

    #[test]
    fn test_encrypted_archive_is_unsupported() {
        let dir = tempdir().unwrap();
        let mut bytes = le(&[0x8FFF_FFFF, 0x3F7D_70A4, 24, 0, 0, 0]);
        bytes.extend_from_slice(&[0u8; 16]);
        let path = write_file(dir.path(), "encrypted.meg", &bytes);
        let service = MegFileService::new();

        assert_eq!(service.get_version(&path).unwrap(), (MegVersion::V3, true));
        assert!(matches!(service.load(&path), Err(MegError::Unsupported(_))));

        let key = MegEncryptionData::new(&[1u8; 16], &[2u8; 16]);
        assert!(matches!(
            service.load_encrypted(&path, &key),
            Err(MegError::Unsupported(_))
        ));
    }

    #[test]
    fn test_load_encrypted_on_plain_archive() {
        let (_dir, archive) = create_archive(MegVersion::V3, &[("A", b"abc")]);
        let key = MegEncryptionData::new(&[1u8; 16], &[2u8; 16]);

        assert!(matches!(
            MegFileService::new().load_encrypted(&archive, &key),
            Err(MegError::Unsupported(_))
        ));
    }

    #[test]
    fn test_entry_handle_rejects_foreign_entry() {
        let (_dir, archive) = create_archive(MegVersion::V1, &[("A", b"abc")]);
        let meg_file = MegFileService::new().load(&archive).unwrap();

        let foreign = MegDataEntry::new("B", meg_archive::Crc32::from_path("B"), 0, 1, false);
        assert!(matches!(
            meg_file.entry_handle(&foreign),
            Err(MegError::EntryNotFound { .. })
        ));
    }

    #[test]
    fn test_copy_entries_between_archives() {
        let (dir, source) = create_archive(MegVersion::V1, &[("A", b"alpha"), ("B", b"beta")]);
        let service = MegFileService::new().with_write_buffer_size(3);
        let meg_file = std::sync::Arc::new(service.load(&source).unwrap());

        let infos: Vec<_> = meg_file
            .archive()
            .iter()
            .map(|entry| {
                MegFileDataEntryBuilderInfo::from_entry(
                    std::sync::Arc::clone(&meg_file),
                    entry.clone(),
                    Some(format!("COPY\\{}", entry.path())),
                )
            })
            .collect();

        let target = dir.path().join("copy.meg");
        service
            .create_archive(&target, MegVersion::V3, None, &infos, false)
            .unwrap();

        let copy = service.load(&target).unwrap();
        let entry = copy.archive().find_entry("COPY\\B").unwrap();
        assert_eq!(copy.entry_handle(entry).unwrap().as_slice(), b"beta");
    }

    #[test]
    fn test_create_rejects_archive_over_size_limit() {
        let dir = tempdir().unwrap();
        let huge = dir.path().join("huge.bin");
        fs::File::create(&huge)
            .unwrap()
            .set_len(u64::from(u32::MAX) - 4)
            .unwrap();

        let target = dir.path().join("huge.meg");
        let infos = vec![MegFileDataEntryBuilderInfo::from_file(huge, "HUGE.BIN")];
        let err = MegFileService::new()
            .create_archive(&target, MegVersion::V1, None, &infos, false)
            .unwrap_err();

        match err {
            MegError::SizeLimitExceeded { size, limit } => {
                assert_eq!(limit, u64::from(u32::MAX));
                assert!(size > limit, "Unexpected size: {}", size);
            }
            other => panic!("Unexpected error: {:?}", other),
        }
        assert!(!target.exists());
    }

    #[test]
    fn test_load_rejects_file_over_size_limit() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("padded.meg");
        let mut file = fs::File::create(&archive).unwrap();
        std::io::Write::write_all(&mut file, &le(&[0, 0])).unwrap();
        file.set_len(u64::from(u32::MAX) + 10).unwrap();

        let err = MegFileService::new().load(&archive).unwrap_err();
        match err {
            MegError::SizeLimitExceeded { size, limit } => {
                assert_eq!(size, u64::from(u32::MAX) + 10);
                assert_eq!(limit, u64::from(u32::MAX));
            }
            other => panic!("Unexpected error: {:?}", other),
        }
    }
}
