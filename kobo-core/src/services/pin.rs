//! Transaction PIN service
//!
//! The PIN never leaves the machine. `pin.json` holds an Argon2id hash of it
//! with a random salt; checking a PIN re-derives and compares.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use base64::Engine;
use rand::Rng;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::domain::money::now_ms;
use crate::domain::pin::PIN_HASH_LEN;
use crate::domain::transfer::{validate_new_pin, validate_pin};
use crate::domain::{PinCost, PinStatus, StoredPin};

pub const PIN_FILE_NAME: &str = "pin.json";

pub struct PinService {
    kobo_dir: PathBuf,
    cost: PinCost,
}

impl PinService {
    pub fn new(kobo_dir: PathBuf) -> Self {
        Self {
            kobo_dir,
            cost: PinCost::default(),
        }
    }

    /// Hash new PINs with `cost`; existing files keep the cost they were written with
    pub fn with_cost(mut self, cost: PinCost) -> Self {
        self.cost = cost;
        self
    }

    fn pin_file(&self) -> PathBuf {
        self.kobo_dir.join(PIN_FILE_NAME)
    }

    fn read_stored(&self) -> Result<Option<StoredPin>> {
        let path = self.pin_file();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let stored = serde_json::from_str(&content).context("Invalid PIN file")?;
        Ok(Some(stored))
    }

    pub fn status(&self) -> Result<PinStatus> {
        let stored = self.read_stored()?;
        Ok(PinStatus {
            configured: stored.is_some(),
            set_at: stored.map(|s| s.set_at),
        })
    }

    pub fn is_set(&self) -> Result<bool> {
        Ok(self.pin_file().exists())
    }

    /// Set (or replace) the PIN after checking the confirmation
    pub fn set(&self, pin: &str, confirm: &str) -> Result<()> {
        validate_new_pin(pin, confirm)?;

        let salt: [u8; 16] = rand::thread_rng().gen();
        let hash = derive(pin, &salt, self.cost)?;

        let engine = base64::engine::general_purpose::STANDARD;
        let stored = StoredPin {
            salt: engine.encode(salt),
            hash: engine.encode(hash),
            cost: self.cost,
            set_at: now_ms(),
        };

        fs::create_dir_all(&self.kobo_dir)?;
        write_private(&self.pin_file(), serde_json::to_string_pretty(&stored)?.as_bytes())?;
        debug!("transaction PIN updated");
        Ok(())
    }

    /// Whether `pin` matches the stored hash
    pub fn verify(&self, pin: &str) -> Result<bool> {
        let Some(stored) = self.read_stored()? else {
            bail!("No transaction PIN set. Run 'kobo pin set' first.");
        };
        if validate_pin(pin).is_err() {
            return Ok(false);
        }

        let engine = base64::engine::general_purpose::STANDARD;
        let salt = engine
            .decode(&stored.salt)
            .context("Invalid salt in PIN file")?;
        let expected = engine
            .decode(&stored.hash)
            .context("Invalid hash in PIN file")?;

        let actual = derive(pin, &salt, stored.cost)?;
        Ok(actual.as_slice().ct_eq(expected.as_slice()).into())
    }

    /// Fail unless `pin` is correct
    pub fn require(&self, pin: &str) -> Result<()> {
        if !self.verify(pin)? {
            bail!("Incorrect transaction PIN");
        }
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(self.pin_file()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn derive(pin: &str, salt: &[u8], cost: PinCost) -> Result<[u8; PIN_HASH_LEN]> {
    let params = argon2::Params::new(cost.memory_kib, cost.passes, cost.lanes, Some(PIN_HASH_LEN))
        .map_err(|e| anyhow!("Bad PIN hashing cost: {}", e))?;
    let mut out = [0u8; PIN_HASH_LEN];
    argon2::Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
        .hash_password_into(pin.as_bytes(), salt, &mut out)
        .map_err(|e| anyhow!("Failed to hash PIN: {}", e))?;
    Ok(out)
}

/// Write `contents` readable by the owner only (0600 on Unix)
fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.create(true).write(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)?;
    file.sync_all()?;
    Ok(())
}
