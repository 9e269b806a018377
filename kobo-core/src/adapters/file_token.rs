//! Token persisted in the data directory
//!
//! The file holds the bare token string. Reads and writes take an
//! advisory lock so two concurrent `kobo` processes never see a torn write.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use secrecy::SecretString;
use tracing::debug;

use crate::domain::result::Result;
use crate::ports::TokenStore;

pub const TOKEN_FILE_NAME: &str = "auth_token";

/// File-backed token store at `<kobo_dir>/auth_token`
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(kobo_dir: &Path) -> Self {
        Self {
            path: kobo_dir.join(TOKEN_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SecretString>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let mut contents = String::new();
        let read = file.read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let token = contents.trim();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(Some(SecretString::from(token.to_string())))
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut options = OpenOptions::new();
        options.create(true).write(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        file.lock_exclusive()?;
        let written = file
            .set_len(0)
            .and_then(|_| file.write_all(token.as_bytes()))
            .and_then(|_| file.sync_all());
        file.unlock()?;
        written?;

        debug!(path = %self.path.display(), "saved session token");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    #[test]
    fn test_save_load_clear() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path());

        assert!(store.load().unwrap().is_none());

        store.save("eyJhbGciOi.first").unwrap();
        store.save("tok").unwrap();
        let token = store.load().unwrap().unwrap();
        assert_eq!(token.expose_secret(), "tok");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_blank_file_means_no_session() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(TOKEN_FILE_NAME), "  \n").unwrap();
        let store = FileTokenStore::new(dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path());
        store.save("tok").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
