// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Transport encoding and editability rules.
//!
//! File bytes travel base64-encoded (the API wraps the text every 60
//! characters); everything past this module handles plain UTF-8 text.

use std::collections::BTreeSet;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{NetworkError, PadResult};

/// Largest file the editor will open, in bytes.
pub const MAX_FILE_SIZE: u64 = 1_048_576;

/// Extensions treated as binary unless configured otherwise.
pub const DEFAULT_BINARY_EXTENSIONS: &[&str] = &[
    // images
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "tif", "tiff", "psd", "tga", "exr", "hdr",
    // audio / video
    "mp3", "wav", "ogg", "flac", "aac", "mp4", "mov", "avi", "mkv", "webm",
    // archives
    "zip", "gz", "tgz", "tar", "7z", "rar", "bz2", "xz",
    // executables and libraries
    "exe", "dll", "so", "dylib", "a", "lib", "o", "obj", "class", "jar", "wasm", "pdb",
    // documents and fonts
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "ttf", "otf", "woff", "woff2", "eot",
    // 3d assets
    "fbx", "blend", "3ds", "max", "glb", "unitypackage",
];

/// Decode API content into text.
///
/// # Errors
///
/// Returns `NetworkError::Decode` if the payload is not base64 or not UTF-8.
pub fn decode_content(encoded: &str) -> PadResult<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| NetworkError::Decode {
            what: "file content".to_string(),
            message: e.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|_| {
        NetworkError::Decode {
            what: "file content".to_string(),
            message: "not valid UTF-8 text".to_string(),
        }
        .into()
    })
}

/// Encode text for the API.
#[must_use]
pub fn encode_content(text: &str) -> String {
    BASE64.encode(text.as_bytes())
}

fn extension(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Binary check against the default extension list.
#[must_use]
pub fn is_binary(path: &str) -> bool {
    extension(path).is_some_and(|ext| DEFAULT_BINARY_EXTENSIONS.contains(&ext.as_str()))
}

/// Size check against [`MAX_FILE_SIZE`].
#[must_use]
pub const fn is_too_large(size: u64) -> bool {
    size > MAX_FILE_SIZE
}

/// Editability rules with configurable extensions and size limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileClassifier {
    binary_extensions: BTreeSet<String>,
    max_file_size: u64,
}

impl Default for FileClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY_EXTENSIONS.iter().copied(), MAX_FILE_SIZE)
    }
}

impl FileClassifier {
    pub fn new<I, S>(extensions: I, max_file_size: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            binary_extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            max_file_size,
        }
    }

    #[must_use]
    pub fn is_binary(&self, path: &str) -> bool {
        extension(path).is_some_and(|ext| self.binary_extensions.contains(&ext))
    }

    #[must_use]
    pub const fn is_too_large(&self, size: u64) -> bool {
        size > self.max_file_size
    }

    #[must_use]
    pub const fn max_file_size(&self) -> u64 {
        self.max_file_size
    }
}
