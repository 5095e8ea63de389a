use std::fmt;

use crate::models::candidate::CandidateFile;

/// 10 MiB. Files strictly larger than this are rejected.
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

pub const ALLOWED_MEDIA_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
    "application/rtf",
    "text/rtf",
];

pub const ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx", ".txt", ".rtf"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Missing,
    TooLarge { size: u64 },
    InvalidType,
}

impl Rejection {
    /// Short machine-facing reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::Missing => "no file selected",
            Rejection::TooLarge { .. } => "file too large",
            Rejection::InvalidType => "invalid file type",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Rejection::Missing => "No file selected.".to_string(),
            Rejection::TooLarge { .. } => "File is too large. Maximum size is 10MB.".to_string(),
            Rejection::InvalidType => format!(
                "Invalid file type. Please upload a {} file.",
                ALLOWED_EXTENSIONS.join(", ")
            ),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Checks a candidate file against the size bound and type allow-list.
///
/// Rules, first failure wins:
/// 1. absent file → `Missing`
/// 2. more than [`MAX_FILE_BYTES`] → `TooLarge`
/// 3. neither declared type nor extension allowed → `InvalidType`
///
/// Either the media type or the extension matching is enough, so a `.pdf`
/// with an empty declared type is accepted.
pub fn validate(file: Option<&CandidateFile>) -> Verdict {
    let Some(file) = file else {
        return Verdict::Rejected(Rejection::Missing);
    };

    if file.len() > MAX_FILE_BYTES {
        return Verdict::Rejected(Rejection::TooLarge { size: file.len() });
    }

    let media_type = file.media_type().to_lowercase();
    let type_allowed = ALLOWED_MEDIA_TYPES.contains(&media_type.as_str());
    let extension_allowed = extension_of(file.name())
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false);

    if !type_allowed && !extension_allowed {
        return Verdict::Rejected(Rejection::InvalidType);
    }

    Verdict::Accepted
}

/// Lowercase dot-extension of a file name (`"CV.Docx"` → `".docx"`).
/// Names without a dot, or ending in one, have no extension.
pub fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_lowercase()))
}

/// Media type a browser would report for an allowed extension. Anything else
/// gets the generic binary type.
pub fn guess_media_type(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some(".pdf") => "application/pdf",
        Some(".doc") => "application/msword",
        Some(".docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some(".txt") => "text/plain",
        Some(".rtf") => "application/rtf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, media_type: &str, size: usize) -> CandidateFile {
        CandidateFile::new(name, media_type, vec![0u8; size])
    }

    #[test]
    fn test_absent_file_rejected() {
        assert_eq!(validate(None), Verdict::Rejected(Rejection::Missing));
    }

    #[test]
    fn test_oversized_pdf_rejected_as_too_large() {
        let f = file("resume.pdf", "application/pdf", 12 * 1024 * 1024);
        match validate(Some(&f)) {
            Verdict::Rejected(r) => assert_eq!(r.reason(), "file too large"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_size_checked_before_type() {
        let f = file("photo.png", "image/png", MAX_FILE_BYTES as usize + 1);
        assert!(matches!(
            validate(Some(&f)),
            Verdict::Rejected(Rejection::TooLarge { .. })
        ));
    }

    #[test]
    fn test_exactly_max_size_accepted() {
        let f = file("resume.pdf", "application/pdf", MAX_FILE_BYTES as usize);
        assert!(validate(Some(&f)).is_accepted());
    }

    #[test]
    fn test_extension_alone_suffices() {
        let f = file("resume.pdf", "", 1024);
        assert!(validate(Some(&f)).is_accepted());
    }

    #[test]
    fn test_media_type_alone_suffices() {
        let f = file("resume", "application/msword", 1024);
        assert!(validate(Some(&f)).is_accepted());
    }

    #[test]
    fn test_uppercase_extension_accepted() {
        let f = file("RESUME.DOCX", "application/octet-stream", 1024);
        assert!(validate(Some(&f)).is_accepted());
    }

    #[test]
    fn test_uppercase_media_type_accepted() {
        let f = file("resume.bin", "Text/RTF", 1024);
        assert!(validate(Some(&f)).is_accepted());
    }

    #[test]
    fn test_both_outside_allow_list_rejected() {
        let f = file("photo.png", "image/png", 1024);
        let verdict = validate(Some(&f));
        assert_eq!(verdict, Verdict::Rejected(Rejection::InvalidType));
        if let Verdict::Rejected(r) = verdict {
            assert!(r.user_message().contains(".pdf, .doc, .docx, .txt, .rtf"));
        }
    }

    #[test]
    fn test_docx_two_mib_accepted() {
        let f = file(
            "cv.docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            2 * 1024 * 1024,
        );
        assert!(validate(Some(&f)).is_accepted());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("cv.PDF").as_deref(), Some(".pdf"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some(".gz"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn test_bare_extension_name_has_no_extension() {
        assert_eq!(extension_of("pdf"), None);
        assert_eq!(extension_of("docx"), None);

        let f = file("pdf", "application/octet-stream", 1024);
        assert_eq!(validate(Some(&f)), Verdict::Rejected(Rejection::InvalidType));
    }

    #[test]
    fn test_guess_media_type() {
        assert_eq!(guess_media_type("a.txt"), "text/plain");
        assert_eq!(guess_media_type("a.rtf"), "application/rtf");
        assert_eq!(guess_media_type("a.png"), "application/octet-stream");
    }
}
