//! Knowledge panel: files and URLs the agent should know about.

use std::path::Path;

use url::Url;
use uuid::Uuid;

use super::PanelError;

/// Document extensions the upload control accepts.
const ACCEPTED_EXTENSIONS: [&str; 5] = ["pdf", "doc", "docx", "txt", "csv"];

/// What the knowledge panel emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeEvent {
    FileAdded { name: String, size_bytes: u64 },
    UrlAdded { url: String },
    SourceRemoved { id: Uuid },
}

/// Validate an uploaded file.
pub fn add_file(name: &str, size_bytes: u64) -> Result<KnowledgeEvent, PanelError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PanelError::EmptyFileName);
    }
    let accepted = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|ok| ext.eq_ignore_ascii_case(ok))
        });
    if !accepted {
        return Err(PanelError::UnsupportedFileType(name.to_string()));
    }
    Ok(KnowledgeEvent::FileAdded {
        name: name.to_string(),
        size_bytes,
    })
}

/// Validate a URL. Surrounding whitespace is dropped; the rest is kept as typed.
pub fn add_url(input: &str) -> Result<KnowledgeEvent, PanelError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || Url::parse(trimmed).is_err() {
        return Err(PanelError::InvalidUrl(input.to_string()));
    }
    Ok(KnowledgeEvent::UrlAdded {
        url: trimmed.to_string(),
    })
}

pub fn remove(id: Uuid) -> KnowledgeEvent {
    KnowledgeEvent::SourceRemoved { id }
}

/// Human-readable size: base 1024, up to two decimals, trailing zeros dropped.
#[allow(clippy::cast_precision_loss)] // Display only.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_url_is_rejected() {
        let err = add_url("not a url").unwrap_err();
        assert_eq!(err, PanelError::InvalidUrl("not a url".into()));

        assert!(add_url("").is_err());
        assert!(add_url("example.com").is_err());
    }

    #[test]
    fn url_is_trimmed() {
        let event = add_url("  https://example.com/docs  ").unwrap();
        assert_eq!(
            event,
            KnowledgeEvent::UrlAdded {
                url: "https://example.com/docs".into()
            }
        );
    }

    #[test]
    fn accepted_file_types() {
        assert!(add_file("handbook.PDF", 10).is_ok());
        assert!(add_file("notes.txt", 10).is_ok());
        assert!(add_file("data.csv", 10).is_ok());

        assert_eq!(
            add_file("setup.exe", 10).unwrap_err(),
            PanelError::UnsupportedFileType("setup.exe".into())
        );
        assert!(matches!(
            add_file("README", 10),
            Err(PanelError::UnsupportedFileType(_))
        ));
        assert_eq!(add_file("  ", 10).unwrap_err(), PanelError::EmptyFileName);
    }

    #[test]
    fn bytes_are_formatted_like_the_upload_list() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(2 * 1024 * 1024), "2 MB");
        assert_eq!(format_bytes(1_234_567), "1.18 MB");
    }
}
