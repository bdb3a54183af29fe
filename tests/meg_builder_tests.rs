#[cfg(test)]
mod tests {
    use meg_archive::{AddEntryResult, MegBuilder, MegError, MegFileService, MegVersion};
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::{TempDir, tempdir};

    fn sources() -> (TempDir, PathBuf, PathBuf) {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        fs::write(&first, "first").unwrap();
        fs::write(&second, "second").unwrap();
        (dir, first, second)
    }

    #[test]
    fn test_add_and_replace() {
        let (_dir, first, second) = sources();
        let mut builder = MegBuilder::new(MegVersion::V1);

        assert_eq!(builder.add_file(&first, "A.TXT").unwrap(), AddEntryResult::Added);
        assert_eq!(builder.add_file(&second, "A.TXT").unwrap(), AddEntryResult::Replaced);
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.entries()[0].file_path(), "A.TXT");
    }

    #[test]
    fn test_skip_when_not_replacing() {
        let (_dir, first, second) = sources();
        let mut builder = MegBuilder::new(MegVersion::V1).with_replace_existing(false);

        assert_eq!(builder.add_file(&first, "A.TXT").unwrap(), AddEntryResult::Added);
        assert_eq!(builder.add_file(&second, "A.TXT").unwrap(), AddEntryResult::Skipped);
        assert_eq!(builder.add_file(&second, "a.txt").unwrap(), AddEntryResult::Added);
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn test_path_normalization() {
        let (_dir, first, second) = sources();
        let mut builder = MegBuilder::new(MegVersion::V1).with_path_normalization(true);

        builder.add_file(&first, "data/xml/a.xml").unwrap();
        assert_eq!(builder.entries()[0].file_path(), "DATA\\XML\\A.XML");

        assert_eq!(
            builder.add_file(&second, "Data\\Xml\\A.xml").unwrap(),
            AddEntryResult::Replaced
        );

        assert!(builder.remove("data/xml/a.xml"));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_rejects_bad_input() {
        let (dir, first, _second) = sources();
        let mut builder = MegBuilder::new(MegVersion::V1);

        assert!(matches!(
            builder.add_file(dir.path().join("missing.txt"), "MISSING"),
            Err(MegError::NotFound { .. })
        ));
        assert!(matches!(
            builder.add_file(&first, "caf\u{e9}"),
            Err(MegError::InvalidArgument(_))
        ));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let (_dir, first, second) = sources();
        let mut builder = MegBuilder::new(MegVersion::V2);
        builder.add_file(&first, "A").unwrap();
        builder.add_file(&second, "B").unwrap();

        assert!(builder.remove("A"));
        assert!(!builder.remove("A"));
        assert_eq!(builder.len(), 1);

        builder.clear();
        assert!(builder.is_empty());
    }

    #[test]
    fn test_build_and_rebuild_from_entries() {
        let (dir, first, second) = sources();
        let service = MegFileService::new();
        let archive = dir.path().join("built.meg");

        let mut builder = MegBuilder::new(MegVersion::V3);
        builder.add_file(&first, "ONE").unwrap();
        builder.add_file(&second, "TWO").unwrap();
        builder.build(&service, &archive, false).unwrap();

        let meg_file = Arc::new(service.load(&archive).unwrap());
        assert_eq!(meg_file.version(), MegVersion::V3);

        let one = meg_file.archive().find_entry("ONE").unwrap().clone();
        let mut rebuilt = MegBuilder::new(MegVersion::V1);
        assert_eq!(
            rebuilt.add_entry(&meg_file, &one, Some("RENAMED")).unwrap(),
            AddEntryResult::Added
        );

        let rebuilt_path = dir.path().join("rebuilt.meg");
        rebuilt.build(&service, &rebuilt_path, false).unwrap();

        let reloaded = service.load(&rebuilt_path).unwrap();
        let entry = reloaded.archive().find_entry("RENAMED").unwrap();
        assert_eq!(reloaded.entry_handle(entry).unwrap().as_slice(), b"first");
    }

    #[test]
    fn test_add_entry_from_other_archive_fails() {
        let (dir, first, second) = sources();
        let service = MegFileService::new();

        let mut builder = MegBuilder::new(MegVersion::V1);
        builder.add_file(&first, "ONE").unwrap();
        builder.build(&service, &dir.path().join("one.meg"), false).unwrap();

        let mut builder = MegBuilder::new(MegVersion::V1);
        builder.add_file(&second, "TWO").unwrap();
        builder.build(&service, &dir.path().join("two.meg"), false).unwrap();

        let one = Arc::new(service.load(&dir.path().join("one.meg")).unwrap());
        let two = service.load(&dir.path().join("two.meg")).unwrap();
        let foreign = two.archive().find_entry("TWO").unwrap();

        let mut target = MegBuilder::new(MegVersion::V1);
        assert!(matches!(
            target.add_entry(&one, foreign, None),
            Err(MegError::EntryNotFound { .. })
        ));
    }
}
