use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Source code of one compilation unit.
///
/// The buffer is immutable once constructed. Positions and tokens share it
/// through an `Arc` and slice it lazily when they need their text.
#[derive(Debug, PartialEq, Eq)]
pub struct Source {
    /// Absolute path of the file, `<stdin>` or `<dummy>`.
    pub name: String,
    /// Raw bytes of the code.
    pub code: Vec<u8>,
    /// Whether the source exists on the filesystem.
    pub exists: bool,
}

impl Source {
    /// Read a whole file. The name of the source is the absolute path.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Arc<Self>> {
        let path = std::path::absolute(path.as_ref())?;
        let code = std::fs::read(&path)?;
        Ok(Arc::new(Self {
            name: path.to_string_lossy().into_owned(),
            code,
            exists: true,
        }))
    }

    /// Read source code from stdin until the end of stream.
    pub fn from_stdin() -> std::io::Result<Arc<Self>> {
        Self::from_reader("<stdin>", std::io::stdin().lock())
    }

    /// Read source code from an arbitrary reader. The source is treated as
    /// not existing on the filesystem.
    pub fn from_reader(name: impl Into<String>, mut reader: impl Read) -> std::io::Result<Arc<Self>> {
        let mut code = Vec::new();
        reader.read_to_end(&mut code)?;
        Ok(Arc::new(Self {
            name: name.into(),
            code,
            exists: false,
        }))
    }

    /// In-memory source used by tests.
    pub fn dummy(code: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: "<dummy>".to_string(),
            code: code.into().into_bytes(),
            exists: false,
        })
    }

    /// File name without directory and extension. `out` when the source does
    /// not exist on the filesystem.
    pub fn base_name(&self) -> String {
        if !self.exists {
            return "out".to_string();
        }
        Path::new(&self.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_string())
    }

    /// Text between two byte offsets. Invalid UTF-8 is replaced lossily.
    pub fn slice(&self, start: usize, end: usize) -> std::borrow::Cow<'_, str> {
        let end = end.min(self.code.len());
        let start = start.min(end);
        String::from_utf8_lossy(&self.code[start..end])
    }
}
