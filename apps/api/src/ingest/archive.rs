use std::io::Cursor;

use zip::result::ZipResult;
use zip::ZipArchive;

use crate::ingest::extract::DocumentFormat;

/// Archives nested deeper than this are skipped.
pub const MAX_ARCHIVE_DEPTH: usize = 3;

/// Members larger than this (uncompressed) are skipped.
pub const MAX_MEMBER_BYTES: u64 = 25 * 1024 * 1024;

/// What an upload or archive member is, judged by its name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Archive,
    Document(DocumentFormat),
    Unsupported,
}

pub fn classify(path: &str) -> EntryKind {
    if is_archive(path) {
        EntryKind::Archive
    } else {
        DocumentFormat::from_name(path)
            .map(EntryKind::Document)
            .unwrap_or(EntryKind::Unsupported)
    }
}

pub fn is_archive(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".zip")
}

/// Entries written by desktop archivers that never hold candidate content.
pub fn is_os_metadata(path: &str) -> bool {
    if path.starts_with("__MACOSX/") || path.contains("/__MACOSX/") {
        return true;
    }
    let basename = path.rsplit('/').next().unwrap_or(path);
    basename.starts_with("._")
        || basename.eq_ignore_ascii_case(".DS_Store")
        || basename.eq_ignore_ascii_case("Thumbs.db")
        || basename.eq_ignore_ascii_case("desktop.ini")
}

pub fn open(bytes: &[u8]) -> ZipResult<ZipArchive<Cursor<&[u8]>>> {
    ZipArchive::new(Cursor::new(bytes))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    pub(crate) enum Entry<'a> {
        File(&'a str, &'a [u8]),
        Dir(&'a str),
    }

    pub(crate) fn zip_bytes(entries: &[Entry<'_>]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for entry in entries {
            match entry {
                Entry::File(name, body) => {
                    writer.start_file(*name, FileOptions::default()).unwrap();
                    writer.write_all(body).unwrap();
                }
                Entry::Dir(name) => {
                    writer.add_directory(*name, FileOptions::default()).unwrap();
                }
            }
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_macos_metadata_is_detected() {
        assert!(is_os_metadata("__MACOSX/._alice.pdf"));
        assert!(is_os_metadata("batch/__MACOSX/bob.pdf"));
        assert!(is_os_metadata("batch/._carol.docx"));
        assert!(is_os_metadata(".DS_Store"));
        assert!(is_os_metadata("cvs/Thumbs.db"));
        assert!(!is_os_metadata("cvs/alice.pdf"));
        assert!(!is_os_metadata("MACOSX_notes.txt"));
    }

    #[test]
    fn test_classify_by_suffix() {
        assert_eq!(classify("batch.ZIP"), EntryKind::Archive);
        assert_eq!(
            classify("cvs/alice.pdf"),
            EntryKind::Document(DocumentFormat::Pdf)
        );
        assert_eq!(classify("cvs/photo.jpg"), EntryKind::Unsupported);
    }

    #[test]
    fn test_open_rejects_non_archive() {
        assert!(open(b"plain text, not a zip").is_err());
    }

    #[test]
    fn test_open_lists_members() {
        let bytes = zip_bytes(&[Entry::Dir("cvs/"), Entry::File("cvs/a.txt", b"hello")]);
        let archive = open(&bytes).unwrap();
        assert_eq!(archive.len(), 2);
    }
}
