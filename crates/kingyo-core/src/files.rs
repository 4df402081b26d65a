//! In-memory attachment files queued for a multipart upload.

use std::path::Path;

use crate::errors::CoreError;

/// A file picked for upload: display name, optional MIME type, and contents.
///
/// Contents are held in memory so a request can be rebuilt verbatim when the
/// transport retries it.
#[derive(Clone, PartialEq, Eq)]
pub struct AttachmentFile {
    pub name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl AttachmentFile {
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = guess_mime(&name).map(String::from);
        Self { name, mime, bytes }
    }

    /// Read a file from disk, naming it after the final path component.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Io` if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let bytes = std::fs::read(path).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self::new(name, bytes))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for AttachmentFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachmentFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn guess_mime(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" | "log" => "text/plain",
        "json" => "application/json",
        "mp4" => "video/mp4",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_guesses_mime_from_extension() {
        let file = AttachmentFile::new("Screen.PNG", vec![1, 2, 3]);
        assert_eq!(file.mime.as_deref(), Some("image/png"));
        assert_eq!(file.len(), 3);
        assert!(AttachmentFile::new("notes", vec![]).mime.is_none());
    }

    #[test]
    fn from_path_reads_contents_and_name() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("console.log");
        std::fs::write(&path, "boom").expect("write");

        let file = AttachmentFile::from_path(&path).expect("read");
        assert_eq!(file.name, "console.log");
        assert_eq!(file.bytes, b"boom");
        assert_eq!(file.mime.as_deref(), Some("text/plain"));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = AttachmentFile::from_path(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }

    #[test]
    fn debug_hides_contents() {
        let file = AttachmentFile::new("a.txt", b"secret".to_vec());
        let rendered = format!("{file:?}");
        assert!(rendered.contains("len: 6"));
        assert!(!rendered.contains("secret"));
    }
}
