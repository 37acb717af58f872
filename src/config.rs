//! TOML configuration for fetching, parsing and hydrogen-bond analysis
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::MosaicResult;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "protein-mosaic.toml";

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MosaicConfig {
    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub parse: ParseOptions,

    #[serde(default)]
    pub hbonds: HydrogenBondCriteria,
}

impl MosaicConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> MosaicResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> MosaicResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads `path` when given, else the default file if it exists, else defaults
    pub fn discover(path: Option<&Path>) -> MosaicResult<Self> {
        match path {
            Some(explicit_path) => Self::from_file(explicit_path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                log::debug!("Using {}", DEFAULT_CONFIG_FILE);
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Self::default()),
        }
    }
}

// =============================================================================
// Fetch
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Mirror downloaded structure files on disk
    #[serde(default = "default_disk_cache")]
    pub disk_cache: bool,

    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            disk_cache: default_disk_cache(),
            cache_dir: default_cache_dir(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_disk_cache() -> bool {
    true
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".cache")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("protein-mosaic/", env!("CARGO_PKG_VERSION")).to_string()
}

// =============================================================================
// Parse
// =============================================================================

/// Options applied when converting a parsed file into a [`crate::protein::Structure`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Treat water residues as hetero (they then show up as ligands)
    #[serde(default)]
    pub water_as_ligand: bool,
}

// =============================================================================
// Hydrogen bonds
// =============================================================================

/// Geometric criteria for hydrogen-bond detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydrogenBondCriteria {
    /// Maximum donor-hydrogen distance for the hydrogen to count as bonded (A)
    #[serde(default = "default_donor_hydrogen_cutoff")]
    pub donor_hydrogen_cutoff: f32,

    /// Maximum donor-acceptor distance (A)
    #[serde(default = "default_donor_acceptor_cutoff")]
    pub donor_acceptor_cutoff: f32,

    /// Minimum donor-hydrogen-acceptor angle (degrees)
    #[serde(default = "default_angle_cutoff_degrees")]
    pub angle_cutoff_degrees: f32,
}

impl Default for HydrogenBondCriteria {
    fn default() -> Self {
        Self {
            donor_hydrogen_cutoff: default_donor_hydrogen_cutoff(),
            donor_acceptor_cutoff: default_donor_acceptor_cutoff(),
            angle_cutoff_degrees: default_angle_cutoff_degrees(),
        }
    }
}

fn default_donor_hydrogen_cutoff() -> f32 {
    1.2
}

fn default_donor_acceptor_cutoff() -> f32 {
    3.5
}

fn default_angle_cutoff_degrees() -> f32 {
    150.0
}
