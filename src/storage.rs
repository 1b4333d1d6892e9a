use crate::error::StorageError;
use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Unix,    // \n (LF)
    Windows, // \r\n (CRLF)
    Mac,     // \r (CR)
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Unix => "\n",
            LineEnding::Windows => "\r\n",
            LineEnding::Mac => "\r",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LineEnding::Unix => "unix",
            LineEnding::Windows => "dos",
            LineEnding::Mac => "mac",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "unix" => Some(LineEnding::Unix),
            "dos" => Some(LineEnding::Windows),
            "mac" => Some(LineEnding::Mac),
            _ => None,
        }
    }

    pub fn system_default() -> Self {
        if cfg!(windows) {
            LineEnding::Windows
        } else {
            LineEnding::Unix
        }
    }

    pub fn detect(content: &str) -> Self {
        if content.contains("\r\n") {
            LineEnding::Windows
        } else if content.contains('\r') {
            LineEnding::Mac
        } else {
            LineEnding::Unix
        }
    }

    /// Convert any line endings in `content` to `\n`.
    pub fn normalize(content: &str) -> String {
        content.replace("\r\n", "\n").replace('\r', "\n")
    }

    /// Convert `\n` separated text to this ending.
    pub fn apply(&self, text: &str) -> String {
        match self {
            LineEnding::Unix => text.to_string(),
            other => text.replace('\n', other.as_str()),
        }
    }
}

/// Loads and saves the document text. The core never touches the
/// filesystem directly.
pub trait StorageBackend {
    /// Read `path`. The returned text always uses `\n` line breaks.
    fn load(&mut self, path: &Path) -> Result<String, StorageError>;

    /// Write `text` (with `\n` line breaks) to the current file. Returns
    /// the number of bytes written.
    fn save(&mut self, text: &str) -> Result<usize, StorageError>;

    /// The file the next save writes to.
    fn path(&self) -> Option<PathBuf>;

    /// Save to `path` from now on.
    fn set_path(&mut self, path: PathBuf);
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: Option<PathBuf>,
    line_ending: LineEnding,
    ending_forced: bool,
}

impl FileStorage {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            line_ending: LineEnding::system_default(),
            ending_forced: false,
        }
    }

    /// Always save with `line_ending`, ignoring what the loaded file used.
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self.ending_forced = true;
        self
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }
}

impl StorageBackend for FileStorage {
    fn load(&mut self, path: &Path) -> Result<String, StorageError> {
        self.path = Some(path.to_path_buf());
        let content = fs::read_to_string(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => StorageError::NotFound(path.to_path_buf()),
            _ => StorageError::Io(err),
        })?;

        if !self.ending_forced {
            self.line_ending = LineEnding::detect(&content);
        }
        log::info!(
            "loaded {} ({} bytes, {} line endings)",
            path.display(),
            content.len(),
            self.line_ending.name()
        );
        Ok(LineEnding::normalize(&content))
    }

    fn save(&mut self, text: &str) -> Result<usize, StorageError> {
        let path = self.path.as_ref().ok_or(StorageError::NoPath)?;
        let content = self.line_ending.apply(text);
        fs::write(path, &content)?;
        log::info!("saved {} ({} bytes)", path.display(), content.len());
        Ok(content.len())
    }

    fn path(&self) -> Option<PathBuf> {
        self.path.clone()
    }

    fn set_path(&mut self, path: PathBuf) {
        log::info!("saving as {}", path.display());
        self.path = Some(path);
    }
}

/// In-memory storage for tests. Clones share state. A new store saves to
/// `scratch.txt` until told otherwise.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    inner: Rc<RefCell<MemoryFiles>>,
}

#[derive(Debug, Default)]
struct MemoryFiles {
    files: Vec<(PathBuf, String)>,
    path: Option<PathBuf>,
    saved: Vec<String>,
    fail_saves: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        let files = MemoryFiles {
            path: Some(PathBuf::from("scratch.txt")),
            ..MemoryFiles::default()
        };
        Self {
            inner: Rc::new(RefCell::new(files)),
        }
    }

    /// A store with no file name yet, like starting without a FILE.
    pub fn without_path(self) -> Self {
        self.inner.borrow_mut().path = None;
        self
    }

    pub fn with_file(self, path: impl Into<PathBuf>, text: &str) -> Self {
        self.inner
            .borrow_mut()
            .files
            .push((path.into(), text.to_string()));
        self
    }

    pub fn fail_saves(&self, fail: bool) {
        self.inner.borrow_mut().fail_saves = fail;
    }

    /// Every successfully saved text, oldest first.
    pub fn saved(&self) -> Vec<String> {
        self.inner.borrow().saved.clone()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&mut self, path: &Path) -> Result<String, StorageError> {
        self.inner.borrow_mut().path = Some(path.to_path_buf());
        self.inner
            .borrow()
            .files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| StorageError::NotFound(path.to_path_buf()))
    }

    fn save(&mut self, text: &str) -> Result<usize, StorageError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_saves {
            return Err(StorageError::Io(std::io::Error::new(
                ErrorKind::PermissionDenied,
                "read-only storage",
            )));
        }
        if inner.path.is_none() {
            return Err(StorageError::NoPath);
        }
        inner.saved.push(text.to_string());
        Ok(text.len())
    }

    fn path(&self) -> Option<PathBuf> {
        self.inner.borrow().path.clone()
    }

    fn set_path(&mut self, path: PathBuf) {
        self.inner.borrow_mut().path = Some(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_line_endings() {
        assert_eq!(LineEnding::detect("a\r\nb"), LineEnding::Windows);
        assert_eq!(LineEnding::detect("a\rb"), LineEnding::Mac);
        assert_eq!(LineEnding::detect("a\nb"), LineEnding::Unix);
        assert_eq!(LineEnding::detect("ab"), LineEnding::Unix);
    }

    #[test]
    fn test_normalize_and_apply() {
        assert_eq!(LineEnding::normalize("a\r\nb\rc\n"), "a\nb\nc\n");
        assert_eq!(LineEnding::Windows.apply("a\nb"), "a\r\nb");
        assert_eq!(LineEnding::Unix.apply("a\nb"), "a\nb");
    }

    #[test]
    fn test_file_storage_round_trip_keeps_line_ending() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dos.txt");
        fs::write(&path, "one\r\ntwo").unwrap();

        let mut storage = FileStorage::new(None);
        let text = storage.load(&path).unwrap();
        assert_eq!(text, "one\ntwo");
        assert_eq!(storage.line_ending(), LineEnding::Windows);

        let bytes = storage.save("one\ntwo\nthree").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\r\ntwo\r\nthree");
        assert_eq!(bytes, 17);
    }

    #[test]
    fn test_file_storage_forced_line_ending() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.txt");
        fs::write(&path, "one\r\ntwo").unwrap();

        let mut storage = FileStorage::new(None).with_line_ending(LineEnding::Unix);
        storage.load(&path).unwrap();
        storage.save("one\ntwo").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo");
    }

    #[test]
    fn test_file_storage_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        let mut storage = FileStorage::new(None);

        assert!(matches!(storage.load(&path), Err(StorageError::NotFound(_))));
        // the path is remembered so the first save creates the file
        storage.save("fresh").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn test_file_storage_without_path() {
        let mut storage = FileStorage::new(None);
        assert!(matches!(storage.save("x"), Err(StorageError::NoPath)));
    }

    #[test]
    fn test_file_storage_set_path_then_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("named.txt");
        let mut storage = FileStorage::new(None).with_line_ending(LineEnding::Unix);

        storage.set_path(path.clone());

        assert_eq!(storage.path(), Some(path.clone()));
        assert_eq!(storage.save("a\nb").unwrap(), 3);
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb");
    }

    #[test]
    fn test_file_storage_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(Some(dir.path().join("no/such/dir/file.txt")));
        assert!(matches!(storage.save("x"), Err(StorageError::Io(_))));
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new().with_file("a.txt", "hello");
        let observer = storage.clone();

        assert_eq!(storage.load(Path::new("a.txt")).unwrap(), "hello");
        assert!(storage.load(Path::new("b.txt")).is_err());

        assert_eq!(observer.path(), Some(PathBuf::from("a.txt")));

        storage.save("one").unwrap();
        observer.fail_saves(true);
        assert!(storage.save("two").is_err());
        assert_eq!(observer.saved(), vec!["one".to_string()]);
    }

    #[test]
    fn test_memory_storage_without_path() {
        let mut storage = MemoryStorage::new().without_path();
        assert!(matches!(storage.save("x"), Err(StorageError::NoPath)));

        storage.set_path(PathBuf::from("later.txt"));
        storage.save("x").unwrap();
        assert_eq!(storage.saved(), vec!["x".to_string()]);
    }
}
