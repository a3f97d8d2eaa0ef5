//! Document ingestion: unpacks archive uploads and reduces every leaf
//! document to a bounded `CandidateDocument`.
//!
//! Failures stay local: an unreadable document becomes a document whose text
//! is a diagnostic, an unreadable archive yields nothing and is reported in
//! `IngestOutcome::skipped`. Nothing here aborts the batch.

pub mod archive;
pub mod extract;

use std::io::{Cursor, Read};

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::ingest::archive::{EntryKind, MAX_ARCHIVE_DEPTH, MAX_MEMBER_BYTES};
use crate::ingest::extract::{BuiltinExtractor, DocumentFormat, ExtractError, TextExtractor};
use crate::models::CandidateDocument;

/// A raw file as received from the caller.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// An upload or archive member that produced no document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub documents: Vec<CandidateDocument>,
    pub skipped: Vec<SkippedEntry>,
}

impl IngestOutcome {
    fn skip(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        let entry = SkippedEntry {
            name: name.into(),
            reason: reason.into(),
        };
        debug!("Skipping {}: {}", entry.name, entry.reason);
        self.skipped.push(entry);
    }
}

pub struct DocumentIngestor<E = BuiltinExtractor> {
    extractor: E,
}

impl Default for DocumentIngestor<BuiltinExtractor> {
    fn default() -> Self {
        Self::new(BuiltinExtractor)
    }
}

impl<E: TextExtractor> DocumentIngestor<E> {
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }

    /// One `CandidateDocument` per leaf document, in upload order and, within
    /// an archive, in member order.
    pub fn ingest(&self, uploads: &[Upload]) -> IngestOutcome {
        let mut outcome = IngestOutcome::default();
        for upload in uploads {
            match archive::classify(&upload.name) {
                EntryKind::Archive => {
                    self.ingest_archive(&upload.name, None, &upload.bytes, 1, &mut outcome)
                }
                _ => {
                    let format = DocumentFormat::for_upload(&upload.name);
                    outcome
                        .documents
                        .push(self.document(&upload.name, format, &upload.bytes));
                }
            }
        }
        debug!(
            "Ingested {} uploads into {} documents ({} skipped)",
            uploads.len(),
            outcome.documents.len(),
            outcome.skipped.len()
        );
        outcome
    }

    /// Extracts a standalone document, surfacing the failure to the caller.
    pub fn try_extract_text(&self, name: &str, bytes: &[u8]) -> Result<String, ExtractError> {
        self.extractor
            .extract(DocumentFormat::for_upload(name), bytes)
    }

    fn document(&self, name: &str, format: DocumentFormat, bytes: &[u8]) -> CandidateDocument {
        let text = match self.extractor.extract(format, bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!("Text extraction failed for {name}: {e}");
                diagnostic(&e)
            }
        };
        CandidateDocument::new(name, &text)
    }

    /// `prefix` is the member path of this archive inside its parent, if nested.
    fn ingest_archive(
        &self,
        archive_name: &str,
        prefix: Option<&str>,
        bytes: &[u8],
        depth: usize,
        outcome: &mut IngestOutcome,
    ) {
        let mut zip = match archive::open(bytes) {
            Ok(zip) => zip,
            Err(e) => {
                warn!("Could not open archive {archive_name}: {e}");
                outcome.skip(archive_name, format!("not a readable archive: {e}"));
                return;
            }
        };

        for index in 0..zip.len() {
            let Some((path, kind, member_bytes)) =
                read_member(&mut zip, index, archive_name, prefix, outcome)
            else {
                continue;
            };

            match (kind, member_bytes) {
                (EntryKind::Archive, Ok(inner)) => {
                    if depth >= MAX_ARCHIVE_DEPTH {
                        warn!("Archive nesting too deep at {path}");
                        outcome.skip(
                            path,
                            format!("archive nested deeper than {MAX_ARCHIVE_DEPTH} levels"),
                        );
                    } else {
                        self.ingest_archive(&path, Some(&path), &inner, depth + 1, outcome);
                    }
                }
                (EntryKind::Archive, Err(e)) => {
                    warn!("Could not read nested archive {path}: {e}");
                    outcome.skip(path, format!("not a readable archive: {e}"));
                }
                (EntryKind::Document(format), Ok(doc_bytes)) => {
                    outcome
                        .documents
                        .push(self.document(&path, format, &doc_bytes));
                }
                (EntryKind::Document(_), Err(e)) => {
                    warn!("Could not read archive member {path}: {e}");
                    outcome
                        .documents
                        .push(CandidateDocument::new(path, &diagnostic(&e)));
                }
                (EntryKind::Unsupported, _) => {}
            }
        }
    }
}

/// Reads one archive member. Returns `None` for entries that are skipped
/// outright (directories, OS metadata, unsupported or oversized files).
/// The member stream is fully consumed and released before returning.
fn read_member(
    zip: &mut ZipArchive<Cursor<&[u8]>>,
    index: usize,
    archive_name: &str,
    prefix: Option<&str>,
    outcome: &mut IngestOutcome,
) -> Option<(String, EntryKind, Result<Vec<u8>, ExtractError>)> {
    let mut file = match zip.by_index(index) {
        Ok(file) => file,
        Err(e) => {
            warn!("Unreadable entry #{index} in {archive_name}: {e}");
            outcome.skip(format!("{archive_name}#{index}"), e.to_string());
            return None;
        }
    };

    let member_path = file.name().to_string();
    if file.is_dir() || archive::is_os_metadata(&member_path) {
        return None;
    }

    let path = match prefix {
        Some(prefix) => format!("{prefix}/{member_path}"),
        None => member_path,
    };

    let kind = archive::classify(&path);
    if kind == EntryKind::Unsupported {
        outcome.skip(path, "unsupported document type");
        return None;
    }
    if file.size() > MAX_MEMBER_BYTES {
        outcome.skip(path, format!("larger than {MAX_MEMBER_BYTES} bytes"));
        return None;
    }

    // The declared size can understate the inflated stream; bound the read itself.
    let mut buf = Vec::with_capacity(file.size() as usize);
    if let Err(e) = (&mut file).take(MAX_MEMBER_BYTES + 1).read_to_end(&mut buf) {
        return Some((path, kind, Err(ExtractError::Io(e))));
    }
    if buf.len() as u64 > MAX_MEMBER_BYTES {
        warn!("Archive member {path} inflates past its declared size");
        outcome.skip(path, format!("larger than {MAX_MEMBER_BYTES} bytes"));
        return None;
    }
    Some((path, kind, Ok(buf)))
}

fn diagnostic(err: &ExtractError) -> String {
    format!("Error reading file: {err}")
}
