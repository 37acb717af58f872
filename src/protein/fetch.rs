//! Utilities for fetching protein data from remote and local sources
//!
//! This module handles downloading PDB/mmCIF files from RCSB, entry metadata
//! from the RCSB data API and compound records from PubChem, and reading
//! structure files from the local file system. Responses are kept in a
//! [`FetchCache`] owned by the [`RemoteClient`], so the caller decides how long
//! fetched records live.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::{MosaicError, MosaicResult};
use crate::protein::compound::CompoundSummary;

const RCSB_BASE_URL: &str = "https://files.rcsb.org/download";
const RCSB_ENTRY_URL: &str = "https://data.rcsb.org/rest/v1/core/entry";
const PUBCHEM_COMPOUND_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound";

/// Supported protein file formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Protein Data Bank format (.pdb)
    Pdb,
    /// Macromolecular Crystallographic Information File format (.cif)
    Cif,
}

impl FileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Pdb => "pdb",
            FileFormat::Cif => "cif",
        }
    }

    /// Determine format from a path's extension (.cif and .mmcif are CIF, everything else PDB)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some(extension)
                if extension.eq_ignore_ascii_case("cif") || extension.eq_ignore_ascii_case("mmcif") =>
            {
                FileFormat::Cif
            }
            _ => FileFormat::Pdb,
        }
    }
}

/// The result of a fetch or load operation
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The raw string content of the file
    pub content: String,
    /// The detected or specified format of the file
    pub format: FileFormat,
}

/// A remote resource family; together with an identifier it names one record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Structure file download from files.rcsb.org
    RcsbStructure(FileFormat),
    /// Entry metadata from the RCSB data API
    RcsbEntry,
    /// Compound record from PubChem PUG-REST
    PubChemCompound,
}

impl Endpoint {
    pub fn url(&self, identifier: &str) -> String {
        match self {
            Endpoint::RcsbStructure(format) => {
                format!("{}/{}.{}", RCSB_BASE_URL, identifier, format.extension())
            }
            Endpoint::RcsbEntry => format!("{}/{}", RCSB_ENTRY_URL, identifier),
            Endpoint::PubChemCompound => {
                let namespace = if identifier.chars().all(|c| c.is_ascii_digit()) {
                    "cid"
                } else {
                    "name"
                };
                format!("{}/{}/{}/JSON", PUBCHEM_COMPOUND_URL, namespace, identifier)
            }
        }
    }
}

/// Validates and normalises a PDB ID to the 4-character upper-case form RCSB uses
pub fn normalize_pdb_id(raw_identifier: &str) -> MosaicResult<String> {
    let trimmed_identifier = raw_identifier.trim();
    if trimmed_identifier.len() != 4 {
        return Err(MosaicError::invalid_identifier(format!(
            "'{}' - PDB IDs must be exactly 4 characters",
            trimmed_identifier
        )));
    }
    if !trimmed_identifier.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(MosaicError::invalid_identifier(format!(
            "'{}' - PDB IDs must contain only alphanumeric characters",
            trimmed_identifier
        )));
    }
    Ok(trimmed_identifier.to_uppercase())
}

fn normalize_compound_id(raw_identifier: &str) -> MosaicResult<String> {
    let trimmed_identifier = raw_identifier.trim();
    if trimmed_identifier.is_empty() {
        return Err(MosaicError::invalid_identifier("empty compound identifier"));
    }
    Ok(trimmed_identifier.to_string())
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    endpoint: Endpoint,
    identifier: String,
}

/// Response bodies keyed by (endpoint, identifier)
#[derive(Debug, Default)]
pub struct FetchCache {
    entries: HashMap<CacheKey, String>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, endpoint: Endpoint, identifier: &str) -> Option<&str> {
        let key = CacheKey {
            endpoint,
            identifier: identifier.to_string(),
        };
        self.entries.get(&key).map(String::as_str)
    }

    pub fn insert(&mut self, endpoint: Endpoint, identifier: &str, body: String) {
        let key = CacheKey {
            endpoint,
            identifier: identifier.to_string(),
        };
        self.entries.insert(key, body);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Blocking HTTP client for RCSB and PubChem with a per-client response cache
pub struct RemoteClient {
    http_client: reqwest::blocking::Client,
    cache: FetchCache,
    disk_cache_directory: Option<PathBuf>,
}

impl RemoteClient {
    pub fn new(fetch_config: &FetchConfig) -> MosaicResult<Self> {
        let http_client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(fetch_config.timeout_secs))
            .user_agent(fetch_config.user_agent.clone())
            .build()?;

        Ok(Self {
            http_client,
            cache: FetchCache::new(),
            disk_cache_directory: fetch_config
                .disk_cache
                .then(|| fetch_config.cache_dir.clone()),
        })
    }

    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut FetchCache {
        &mut self.cache
    }

    /// Returns the body for `identifier` at `endpoint`, from cache when possible
    pub fn get_text(&mut self, endpoint: Endpoint, identifier: &str) -> MosaicResult<String> {
        if let Some(cached_body) = self.cache.get(endpoint, identifier) {
            log::debug!("Cache hit for {:?} {}", endpoint, identifier);
            return Ok(cached_body.to_string());
        }

        if let Some(disk_path) = self.disk_cache_path(endpoint, identifier) {
            if disk_path.exists() {
                log::debug!("Reading {} from {}", identifier, disk_path.display());
                let body = std::fs::read_to_string(&disk_path)?;
                self.cache.insert(endpoint, identifier, body.clone());
                return Ok(body);
            }
        }

        let request_url = endpoint.url(identifier);
        log::info!("GET {}", request_url);
        let http_response = self.http_client.get(&request_url).send()?;
        if !http_response.status().is_success() {
            return Err(MosaicError::HttpStatus {
                url: request_url,
                status: http_response.status().as_u16(),
            });
        }
        let body = http_response.text()?;

        if let Some(disk_path) = self.disk_cache_path(endpoint, identifier) {
            if let Some(parent_directory) = disk_path.parent() {
                std::fs::create_dir_all(parent_directory)?;
            }
            std::fs::write(&disk_path, &body)?;
        }
        self.cache.insert(endpoint, identifier, body.clone());
        Ok(body)
    }

    /// Fetches a protein structure from RCSB by its PDB ID
    ///
    /// The PDB format is tried first, falling back to mmCIF for entries too
    /// large to have a legacy .pdb file.
    pub fn fetch_structure(&mut self, pdb_identifier_code: &str) -> MosaicResult<FetchResult> {
        let pdb_identifier_code = normalize_pdb_id(pdb_identifier_code)?;

        for format in [FileFormat::Pdb, FileFormat::Cif] {
            match self.get_text(Endpoint::RcsbStructure(format), &pdb_identifier_code) {
                Ok(content) => return Ok(FetchResult { content, format }),
                Err(MosaicError::HttpStatus { url, status }) => {
                    log::warn!("{} returned {}, trying next format", url, status);
                }
                Err(other_error) => return Err(other_error),
            }
        }

        Err(MosaicError::NotFound(format!(
            "Failed to fetch PDB code '{}' from RCSB",
            pdb_identifier_code
        )))
    }

    /// Fetches the RCSB entry metadata document for a PDB ID
    pub fn fetch_entry(&mut self, pdb_identifier_code: &str) -> MosaicResult<serde_json::Value> {
        let pdb_identifier_code = normalize_pdb_id(pdb_identifier_code)?;
        let body = self.get_text(Endpoint::RcsbEntry, &pdb_identifier_code)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetches a PubChem compound by CID or name and summarises it
    pub fn fetch_compound(&mut self, compound_identifier: &str) -> MosaicResult<CompoundSummary> {
        let compound_identifier = normalize_compound_id(compound_identifier)?;
        let body = match self.get_text(Endpoint::PubChemCompound, &compound_identifier) {
            Err(MosaicError::HttpStatus { status: 404, .. }) => {
                return Err(MosaicError::NotFound(format!(
                    "Ligand '{}' not found on PubChem",
                    compound_identifier
                )))
            }
            other_result => other_result?,
        };
        CompoundSummary::from_pug_json(&body)
    }

    fn disk_cache_path(&self, endpoint: Endpoint, identifier: &str) -> Option<PathBuf> {
        match (endpoint, &self.disk_cache_directory) {
            (Endpoint::RcsbStructure(format), Some(directory)) => {
                Some(directory.join(format!("{}.{}", identifier, format.extension())))
            }
            _ => None,
        }
    }
}

/// Loads a protein structure from the local file system
pub fn load_file(file_system_path: impl AsRef<Path>) -> MosaicResult<FetchResult> {
    let file_system_path = file_system_path.as_ref();
    let content = std::fs::read_to_string(file_system_path)?;
    Ok(FetchResult {
        content,
        format: FileFormat::from_path(file_system_path),
    })
}
