use std::fs::File;
use std::io::Read;
use std::path::Path;

const SNIFF_BYTES: usize = 1024;
const NON_ASCII_BINARY_RATIO: f64 = 0.30;

/// Rough estimate: GPT-style token ≈ 4 chars (good enough for UI)
pub fn approx_tokens(s: &str) -> usize {
    s.chars().count() / 4
}

/// Extension-based MIME guess first, then a look at the first KiB: any NUL
/// byte or 30 % high bytes means binary. Unreadable files count as binary.
pub fn is_text_file(path: &Path) -> bool {
    if let Some(mime) = mime_guess::from_path(path).first() {
        if mime.type_().as_str() == "text" || mime.essence_str() == "application/xml" {
            return true;
        }
    }

    let mut buffer = [0u8; SNIFF_BYTES];
    let read = match File::open(path).and_then(|mut f| f.read(&mut buffer)) {
        Ok(n) => n,
        Err(_) => return false,
    };
    looks_like_text(&buffer[..read])
}

fn looks_like_text(chunk: &[u8]) -> bool {
    if chunk.is_empty() {
        return true;
    }
    if chunk.contains(&0) {
        return false;
    }
    let high = chunk.iter().filter(|&&b| b > 127).count();
    (high as f64 / chunk.len() as f64) < NON_ASCII_BINARY_RATIO
}

/// Whole file as UTF-8, replacing invalid sequences.
pub fn read_file_content(path: &Path) -> String {
    match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!(event = "output.read.failed", path = %path.display(), error = %e);
            "(Could not read file)".to_string()
        }
    }
}
