//! Content-signature based modality detection.
//!
//! Classification reads the leading bytes of the file, never the
//! extension, so spoofed extensions do not change the result. Any
//! read or detection failure degrades to [`Modality::Unknown`]; the
//! loader treats that as "no extractor available".

use std::fs::File;
use std::io::Read;
use std::path::Path;
use strata_core::types::Modality;
use tracing::{debug, warn};

/// Bytes read from the head of the file for signature matching.
const SNIFF_LEN: usize = 8192;

/// Detect the modality of a file from its content signature.
pub fn detect(path: &Path) -> Modality {
    let head = match read_head(path) {
        Ok(head) => head,
        Err(e) => {
            warn!("Failed to read {} for detection: {e}", path.display());
            return Modality::Unknown;
        }
    };

    if let Some(kind) = infer::get(&head) {
        let mime = kind.mime_type();
        debug!("Detected MIME type for {}: {mime}", path.display());
        return classify_mime(mime);
    }

    // No magic-number match. Structured text formats (plain text,
    // JSON, markdown) have no signature; a NUL-free UTF-8 head is the
    // closest content-based equivalent.
    if looks_like_text(&head) {
        debug!("No signature for {}; head decodes as text", path.display());
        return Modality::Text;
    }

    warn!("Unsupported content signature: {}", path.display());
    Modality::Unknown
}

fn classify_mime(mime: &str) -> Modality {
    if mime == "application/pdf" {
        Modality::Pdf
    } else if mime.starts_with("image/") {
        Modality::Image
    } else if mime.starts_with("audio/") {
        Modality::Audio
    } else if mime.starts_with("video/") {
        Modality::Video
    } else if mime.starts_with("text/") || mime == "application/json" {
        Modality::Text
    } else {
        Modality::Unknown
    }
}

fn read_head(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut buf = vec![0u8; SNIFF_LEN];
    let n = file.read(&mut buf)?;
    buf.truncate(n);
    Ok(buf)
}

fn looks_like_text(head: &[u8]) -> bool {
    if head.is_empty() || head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        // The sniff window may end mid-codepoint; only the tail may
        // be invalid for the head to still count as text.
        Err(e) => e.valid_up_to() + 4 >= head.len(),
    }
}
