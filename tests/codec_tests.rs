#[cfg(test)]
mod tests {
    use meg_archive::codec::{binary_reader_for, identify_version, metadata_to_archive};
    use meg_archive::{MegError, MegVersion, SizedBinary};
    use std::io::{Cursor, Seek};

    fn le(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|word| word.to_le_bytes()).collect()
    }

    /// One-entry archive metadata (`"ab"`, 4 bytes of data) for `version`.
    fn single_entry_metadata(version: MegVersion) -> Vec<u8> {
        let crc = crc32fast::hash(b"ab");
        let name_table = vec![2, 0, b'a', b'b'];

        let (mut bytes, data_start) = match version {
            MegVersion::V1 => (le(&[1, 1]), 8 + 4 + 20),
            MegVersion::V2 => {
                let data_start = 20 + 4 + 20;
                (le(&[0xFFFF_FFFF, 0x3F7D_70A4, data_start, 1, 1]), data_start)
            }
            MegVersion::V3 => {
                let data_start = 24 + 4 + 20;
                (
                    le(&[0xFFFF_FFFF, 0x3F7D_70A4, data_start, 1, 1, 4]),
                    data_start,
                )
            }
        };

        bytes.extend_from_slice(&name_table);
        match version {
            MegVersion::V3 => {
                bytes.extend_from_slice(&0u16.to_le_bytes());
                bytes.extend_from_slice(&le(&[crc, 0, 4, data_start]));
                bytes.extend_from_slice(&0u16.to_le_bytes());
            }
            _ => bytes.extend_from_slice(&le(&[crc, 0, 4, data_start, 0])),
        }
        bytes
    }

    #[test]
    fn test_identify_each_version() {
        for version in [MegVersion::V1, MegVersion::V2, MegVersion::V3] {
            let mut cursor = Cursor::new(single_entry_metadata(version));
            let identified = identify_version(&mut cursor).unwrap();

            assert_eq!(identified, (version, false), "Wrong version for {}", version);
            assert_eq!(cursor.stream_position().unwrap(), 0, "Stream was not rewound");
        }
    }

    #[test]
    fn test_identify_encrypted_v3() {
        let mut bytes = le(&[0x8FFF_FFFF, 0x3F7D_70A4, 24, 0, 0, 0]);
        bytes.extend_from_slice(&[0u8; 16]);

        let identified = identify_version(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(identified, (MegVersion::V3, true));
    }

    #[test]
    fn test_identify_empty_extended_archives() {
        let v2 = le(&[0xFFFF_FFFF, 0x3F7D_70A4, 20, 0, 0]);
        assert_eq!(
            identify_version(&mut Cursor::new(v2)).unwrap(),
            (MegVersion::V2, false)
        );

        let v3 = le(&[0xFFFF_FFFF, 0x3F7D_70A4, 24, 0, 0, 0]);
        assert_eq!(
            identify_version(&mut Cursor::new(v3)).unwrap(),
            (MegVersion::V3, false)
        );
    }

    #[test]
    fn test_identify_short_stream_is_corrupted() {
        let err = identify_version(&mut Cursor::new(vec![1, 2, 3])).unwrap_err();
        assert!(matches!(err, MegError::ArchiveCorrupted { .. }));
    }

    #[test]
    fn test_decode_consumes_exactly_the_metadata() {
        for version in [MegVersion::V1, MegVersion::V2, MegVersion::V3] {
            let bytes = single_entry_metadata(version);
            let mut cursor = Cursor::new(bytes.clone());

            let metadata = binary_reader_for(version)
                .read_metadata(&mut cursor)
                .unwrap();

            assert_eq!(metadata.version(), version);
            assert_eq!(metadata.file_number(), 1);
            assert_eq!(cursor.position() as usize, bytes.len());
            assert_eq!(metadata.size(), bytes.len());
            assert_eq!(metadata.bytes(), &bytes[..], "Re-serialized {} differs", version);
        }
    }

    #[test]
    fn test_decode_rejects_count_mismatch() {
        let bytes = le(&[1, 2]);
        let err = binary_reader_for(MegVersion::V1)
            .read_metadata(&mut Cursor::new(bytes))
            .unwrap_err();
        assert!(matches!(err, MegError::ArchiveCorrupted { .. }));
    }

    #[test]
    fn test_decode_truncated_tables_fails() {
        let mut bytes = single_entry_metadata(MegVersion::V1);
        bytes.truncate(bytes.len() - 5);

        let err = binary_reader_for(MegVersion::V1)
            .read_metadata(&mut Cursor::new(bytes))
            .unwrap_err();
        assert!(matches!(err, MegError::Io(_)), "Unexpected error: {:?}", err);
    }

    #[test]
    fn test_v3_reader_rejects_encrypted_header() {
        let bytes = le(&[0x8FFF_FFFF, 0x3F7D_70A4, 24, 0, 0, 0]);
        let err = binary_reader_for(MegVersion::V3)
            .read_metadata(&mut Cursor::new(bytes))
            .unwrap_err();
        assert!(matches!(err, MegError::Unsupported(_)));
    }

    #[test]
    fn test_v2_reader_rejects_wrong_id() {
        let bytes = le(&[0xFFFF_FFFF, 0x1234_5678, 20, 0, 0]);
        let err = binary_reader_for(MegVersion::V2)
            .read_metadata(&mut Cursor::new(bytes))
            .unwrap_err();
        assert!(matches!(err, MegError::ArchiveCorrupted { .. }));
    }

    #[test]
    fn test_metadata_to_archive() {
        let bytes = single_entry_metadata(MegVersion::V2);
        let metadata = binary_reader_for(MegVersion::V2)
            .read_metadata(&mut Cursor::new(bytes))
            .unwrap();

        let archive = metadata_to_archive(&metadata).unwrap();
        let entry = archive.find_entry("ab").expect("Entry missing");

        assert_eq!(entry.offset(), 44);
        assert_eq!(entry.size(), 4);
        assert!(!entry.is_encrypted());
        assert!(archive.find_entry("AB").is_none());
    }
}
