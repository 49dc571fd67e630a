//! File and console input helpers.
//!
//! This module provides helper functions for reading input used across CLI commands:
//! - Reading a line from stdin (interactive prompts)
//! - Reading pack files, with automatic .zst decompression
//!
//! ## Compressed File Support
//!
//! The `read_text_auto` function automatically detects and decompresses .zst
//! (Zstandard) compressed files based on the file extension.

use deckring_engine::pack::Pack;
use std::io::{self, BufRead};

/// Reads a line of input from a buffered reader, blocking until available.
///
/// Returns the trimmed line, or `None` on EOF or read errors.
///
/// # Example
///
/// ```rust,no_run
/// use std::io::{self, BufRead};
/// # use deckring_cli::io_utils::read_stdin_line;
///
/// let stdin = io::stdin();
/// let mut handle = stdin.lock();
/// if let Some(line) = read_stdin_line(&mut handle) {
///     println!("You entered: {}", line);
/// }
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => {
            let trimmed = line.trim();
            Some(trimmed.to_string())
        }
        Err(_) => None, // Read error
    }
}

/// Read text file with automatic .zst decompression detection.
///
/// UTF-8 BOM (Byte Order Mark) is stripped if present.
pub fn read_text_auto(path: &str) -> io::Result<String> {
    let mut content = if path.ends_with(".zst") {
        let comp = std::fs::read(path)?;
        let dec = zstd::decode_all(comp.as_slice())?;
        String::from_utf8(dec).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
    } else {
        std::fs::read_to_string(path)?
    };
    strip_utf8_bom(&mut content);
    Ok(content)
}

/// Read and parse a pack file (one card value per line).
pub fn load_pack(path: &str) -> Result<Pack, crate::CliError> {
    let text = read_text_auto(path)?;
    Ok(Pack::parse(&text)?)
}

/// Strip UTF-8 BOM (Byte Order Mark) from the beginning of a string if present.
fn strip_utf8_bom(s: &mut String) {
    const UTF8_BOM: &str = "\u{feff}";
    if s.starts_with(UTF8_BOM) {
        s.drain(..UTF8_BOM.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_stdin_line_valid_input() {
        let input = b"4\n";
        let mut cursor = Cursor::new(input);
        let result = read_stdin_line(&mut cursor);
        assert_eq!(result, Some("4".to_string()));
    }

    #[test]
    fn test_read_stdin_line_with_whitespace() {
        let input = b"  packs/four.txt  \n";
        let mut cursor = Cursor::new(input);
        let result = read_stdin_line(&mut cursor);
        assert_eq!(result, Some("packs/four.txt".to_string()));
    }

    #[test]
    fn test_read_stdin_line_eof() {
        let input = b"";
        let mut cursor = Cursor::new(input);
        let result = read_stdin_line(&mut cursor);
        assert_eq!(result, None);
    }

    #[test]
    fn test_strip_utf8_bom() {
        let mut s = "\u{feff}1\n2".to_string();
        strip_utf8_bom(&mut s);
        assert_eq!(s, "1\n2");
    }

    #[test]
    fn test_load_pack_plain_and_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let text = "1\n1\n1\n1\n2\n3\n4\n5\n";

        let plain = dir.path().join("one.txt");
        std::fs::write(&plain, text).unwrap();
        let compressed = dir.path().join("one.txt.zst");
        std::fs::write(&compressed, zstd::encode_all(text.as_bytes(), 3).unwrap()).unwrap();

        let a = load_pack(plain.to_str().unwrap()).unwrap();
        let b = load_pack(compressed.to_str().unwrap()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
    }

    #[test]
    fn test_load_pack_missing_file_is_io_error() {
        let err = load_pack("definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, crate::CliError::Io(_)));
    }
}
