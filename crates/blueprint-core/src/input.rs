//! Input normalization.
//!
//! `InputPanel` holds whatever is staged for the active mode (a file, a URL or
//! free text) and turns it into a `UserInput`, or nothing when the staged
//! value is blank. Files carry a declared media type and can be previewed.

use std::fs;
use std::path::Path;

use base64::Engine;

/// Which kind of data source the user is providing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    File,
    Url,
    Text,
}

/// A selected file. Only the media type and raw bytes are forwarded to the
/// generation service; the name is kept for previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl FileInput {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring its media type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let media_type = media_type_for(path)
            .ok_or_else(|| InputError::UnsupportedFileType(path.display().to_string()))?;
        let bytes = fs::read(path).map_err(|source| InputError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, media_type, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    /// Images, PDFs and CSV files are the attachment kinds the service is asked
    /// to analyze.
    pub fn is_supported(&self) -> bool {
        self.is_image() || self.media_type == "application/pdf" || self.media_type == "text/csv"
    }

    pub fn preview(&self) -> Preview {
        if self.is_image() {
            let data = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
            Preview::Image {
                data_url: format!("data:{};base64,{}", self.media_type, data),
            }
        } else {
            Preview::Document {
                name: self.name.clone(),
                size_kb: (self.bytes.len() as u64 + 512) / 1024,
            }
        }
    }
}

fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "pdf" => "application/pdf",
        "csv" => "text/csv",
        _ => return None,
    };
    Some(media_type)
}

/// Displayable form of a staged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Image { data_url: String },
    Document { name: String, size_kb: u64 },
}

/// A data source ready to send. Exactly one variant is active; url and text
/// are trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    File(FileInput),
    Url(String),
    Text(String),
}

impl UserInput {
    pub fn url(raw: &str) -> Option<Self> {
        non_blank(raw).map(Self::Url)
    }

    pub fn text(raw: &str) -> Option<Self> {
        non_blank(raw).map(Self::Text)
    }

    pub fn mode(&self) -> InputMode {
        match self {
            Self::File(_) => InputMode::File,
            Self::Url(_) => InputMode::Url,
            Self::Text(_) => InputMode::Text,
        }
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file type: {0} (expected an image, PDF or CSV)")]
    UnsupportedFileType(String),
}

/// Input normalizer. Holds the raw value staged for the active mode and emits
/// the `UserInput` it currently represents.
#[derive(Debug, Default)]
pub struct InputPanel {
    mode: InputMode,
    file: Option<FileInput>,
    url: String,
    text: String,
}

impl InputPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change mode. Everything staged so far is discarded.
    pub fn switch_mode(&mut self, mode: InputMode) -> Option<UserInput> {
        self.mode = mode;
        self.file = None;
        self.url.clear();
        self.text.clear();
        None
    }

    pub fn select_file(&mut self, file: Option<FileInput>) -> Option<UserInput> {
        if self.mode != InputMode::File {
            return None;
        }
        self.file = file;
        self.current()
    }

    pub fn set_url(&mut self, raw: &str) -> Option<UserInput> {
        if self.mode != InputMode::Url {
            return None;
        }
        self.url = raw.to_string();
        self.current()
    }

    pub fn set_text(&mut self, raw: &str) -> Option<UserInput> {
        if self.mode != InputMode::Text {
            return None;
        }
        self.text = raw.to_string();
        self.current()
    }

    pub fn current(&self) -> Option<UserInput> {
        match self.mode {
            InputMode::File => self.file.clone().map(UserInput::File),
            InputMode::Url => UserInput::url(&self.url),
            InputMode::Text => UserInput::text(&self.text),
        }
    }

    pub fn preview(&self) -> Option<Preview> {
        self.file.as_ref().map(FileInput::preview)
    }
}
