//! Checksummed on-disk storage for the best trained genome.

use crate::constants::{GENOME_FILE_NAME, GENOME_VERSION_MAGIC};
use crate::error::{FlapError, Result};
use chrono::Utc;
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const HEADER_LEN: usize = 8 + 4;
const CHECKSUM_LEN: usize = 32;

/// Platform data directory for flapper, created on demand.
pub fn data_dir() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "flapper").ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Could not determine data directory")
    })?;
    let dir = project_dirs.data_dir();
    fs::create_dir_all(dir)?;
    Ok(dir.to_path_buf())
}

/// A genome plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredGenome<G> {
    /// Unix timestamp of the save
    pub saved_at: i64,
    /// Generations trained before this genome was picked
    pub generations: u32,
    pub genome: G,
}

impl<G> StoredGenome<G> {
    pub fn new(genome: G, generations: u32) -> Self {
        Self {
            saved_at: Utc::now().timestamp(),
            generations,
            genome,
        }
    }
}

/// Reads and writes a single genome file.
pub struct GenomeStore {
    path: PathBuf,
}

impl GenomeStore {
    /// Store at the default location in the platform data directory.
    pub fn new() -> Result<Self> {
        Ok(Self::at(data_dir()?.join(GENOME_FILE_NAME)))
    }

    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the genome.
    ///
    /// File format:
    /// - Version magic (8 bytes, LE)
    /// - Data length (4 bytes, LE)
    /// - bincode payload (variable length)
    /// - SHA256 over everything above (32 bytes)
    pub fn save<G: Serialize>(&self, stored: &StoredGenome<G>) -> Result<()> {
        let data = bincode::serialize(stored)?;
        let data_len = u32::try_from(data.len()).map_err(|_| {
            FlapError::Serialization(format!("genome payload too large: {} bytes", data.len()))
        })?;

        let mut hasher = Sha256::new();
        hasher.update(GENOME_VERSION_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&self.path)?;
        file.write_all(&GENOME_VERSION_MAGIC.to_le_bytes())?;
        file.write_all(&data_len.to_le_bytes())?;
        file.write_all(&data)?;
        file.write_all(&checksum)?;

        info!(path = %self.path.display(), bytes = data.len(), "genome saved");
        Ok(())
    }

    /// Read and verify the genome. Fails with [`FlapError::CorruptGenome`]
    /// on a wrong magic, a truncated file or a checksum mismatch.
    pub fn load<G: DeserializeOwned>(&self) -> Result<StoredGenome<G>> {
        let bytes = fs::read(&self.path)?;
        if bytes.len() < HEADER_LEN + CHECKSUM_LEN {
            return Err(FlapError::CorruptGenome("file is truncated".to_string()));
        }

        let (version_bytes, rest) = bytes.split_at(8);
        let (length_bytes, rest) = rest.split_at(4);
        let mut magic = [0u8; 8];
        magic.copy_from_slice(version_bytes);
        let version = u64::from_le_bytes(magic);
        if version != GENOME_VERSION_MAGIC {
            return Err(FlapError::CorruptGenome(format!(
                "invalid version: expected 0x{:016X}, got 0x{:016X}",
                GENOME_VERSION_MAGIC, version
            )));
        }

        let mut length = [0u8; 4];
        length.copy_from_slice(length_bytes);
        let data_len = u32::from_le_bytes(length) as usize;
        if rest.len() != data_len + CHECKSUM_LEN {
            return Err(FlapError::CorruptGenome(format!(
                "length mismatch: header says {} bytes, found {}",
                data_len,
                rest.len().saturating_sub(CHECKSUM_LEN)
            )));
        }
        let (data, stored_checksum) = rest.split_at(data_len);

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(data);
        let computed_checksum = hasher.finalize();
        if stored_checksum != computed_checksum.as_slice() {
            return Err(FlapError::CorruptGenome(
                "checksum verification failed".to_string(),
            ));
        }

        Ok(bincode::deserialize(data)?)
    }
}
