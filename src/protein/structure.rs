use glam::Vec3;
use pdbtbx::{Format, ReadOptions, PDB};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::fetch::{load_file, normalize_pdb_id, FileFormat, RemoteClient};
use crate::config::ParseOptions;
use crate::error::{MosaicError, MosaicResult};

/// Residue names treated as solvent rather than ligand
pub const WATER_RESIDUE_NAMES: [&str; 4] = ["HOH", "WAT", "DOD", "H2O"];

pub fn is_water(residue_name: &str) -> bool {
    WATER_RESIDUE_NAMES.contains(&residue_name.trim())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub serial_number: usize,
    pub name: String,
    pub element: Option<String>,
    pub position: Vec3,
}

impl Atom {
    pub fn new(name: &str, position: Vec3) -> Self {
        Self {
            serial_number: 0,
            name: name.to_string(),
            element: None,
            position,
        }
    }

    fn from_pdbtbx(atom: &pdbtbx::Atom) -> Self {
        let (x, y, z) = atom.pos();
        Self {
            serial_number: atom.serial_number(),
            name: atom.name().trim().to_string(),
            element: atom.element().map(|element| element.symbol().to_string()),
            position: Vec3::new(x as f32, y as f32, z as f32),
        }
    }
}

/// A named group of atoms: amino acid, ion or small-molecule ligand
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub name: String,
    pub chain_id: String,
    pub serial_number: isize,
    pub insertion_code: Option<String>,
    /// True for non-polymer residues (ions, cofactors, small molecules)
    pub hetero: bool,
    atoms: Vec<Atom>,
}

impl Residue {
    pub fn new(name: &str, chain_id: &str, serial_number: isize, hetero: bool) -> Self {
        Self {
            name: name.to_string(),
            chain_id: chain_id.to_string(),
            serial_number,
            insertion_code: None,
            hetero,
            atoms: Vec::new(),
        }
    }

    /// Appends an atom with a zero position; used when only names matter
    pub fn with_atom_named(self, atom_name: &str) -> Self {
        self.with_atom(Atom::new(atom_name, Vec3::ZERO))
    }

    pub fn with_atom(mut self, atom: Atom) -> Self {
        self.atoms.push(atom);
        self
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom_names(&self) -> impl Iterator<Item = &str> {
        self.atoms.iter().map(|atom| atom.name.as_str())
    }

    /// First atom with the given name (alternate conformers may repeat names)
    pub fn find_atom(&self, atom_name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|atom| atom.name == atom_name)
    }
}

/// The residues of one model, in chain-then-file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    pub name: String,
    residues: Vec<Residue>,
}

impl Structure {
    pub fn new(name: &str, residues: Vec<Residue>) -> Self {
        Self {
            name: name.to_string(),
            residues,
        }
    }

    /// Converts the first model of a pdbtbx structure
    pub fn from_pdbtbx(name: &str, pdb: &PDB, options: &ParseOptions) -> Self {
        let mut residues = Vec::new();

        for chain in pdb.chains() {
            for residue in chain.residues() {
                let residue_name = residue.name().unwrap_or("UNK").trim().to_string();
                let from_hetatm_records = residue.atoms().any(|atom| atom.hetero());
                let hetero = from_hetatm_records
                    && (options.water_as_ligand || !is_water(&residue_name));

                residues.push(Residue {
                    chain_id: chain.id().to_string(),
                    serial_number: residue.serial_number(),
                    insertion_code: residue.insertion_code().map(str::to_string),
                    hetero,
                    atoms: residue.atoms().map(Atom::from_pdbtbx).collect(),
                    name: residue_name,
                });
            }
        }

        Self::new(name, residues)
    }

    pub fn residues(&self) -> impl Iterator<Item = &Residue> {
        self.residues.iter()
    }

    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.residues.iter().flat_map(|residue| residue.atoms.iter())
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn atom_count(&self) -> usize {
        self.residues.iter().map(|residue| residue.atoms.len()).sum()
    }

    /// Unique chain identifiers in first-seen order
    pub fn chain_ids(&self) -> Vec<String> {
        let mut chain_identifiers: Vec<String> = Vec::new();
        for residue in &self.residues {
            if !chain_identifiers.contains(&residue.chain_id) {
                chain_identifiers.push(residue.chain_id.clone());
            }
        }
        chain_identifiers
    }

    /// Consecutive runs of residues sharing a chain identifier
    pub fn chains(&self) -> Vec<(&str, Vec<&Residue>)> {
        let mut chain_runs: Vec<(&str, Vec<&Residue>)> = Vec::new();
        for residue in &self.residues {
            match chain_runs.last_mut() {
                Some((chain_id, run)) if *chain_id == residue.chain_id => run.push(residue),
                _ => chain_runs.push((residue.chain_id.as_str(), vec![residue])),
            }
        }
        chain_runs
    }

    pub fn center_of_mass(&self) -> Vec3 {
        let mut sum = Vec3::ZERO;
        let mut count = 0;

        for atom in self.atoms() {
            sum += atom.position;
            count += 1;
        }

        if count > 0 {
            sum / count as f32
        } else {
            Vec3::ZERO
        }
    }

    /// Axis-aligned bounds; `None` for a structure without atoms
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let mut atoms = self.atoms();
        let first = atoms.next()?.position;
        Some(atoms.fold((first, first), |(min, max), atom| {
            (min.min(atom.position), max.max(atom.position))
        }))
    }
}

/// A parsed protein together with the name it was loaded under
#[derive(Debug, Clone)]
pub struct ProteinData {
    pub name: String,
    pub format: FileFormat,
    pub structure: Structure,
}

impl ProteinData {
    pub fn from_string(
        content: &str,
        name: &str,
        format: FileFormat,
        options: &ParseOptions,
    ) -> MosaicResult<Self> {
        let pdbtbx_format = match format {
            FileFormat::Pdb => Format::Pdb,
            FileFormat::Cif => Format::Mmcif,
        };

        let (pdb, warnings) = ReadOptions::default()
            .set_level(pdbtbx::StrictnessLevel::Loose)
            .set_format(pdbtbx_format)
            .read_raw(std::io::BufReader::new(std::io::Cursor::new(content.as_bytes())))
            .map_err(|errors| {
                MosaicError::parse(
                    errors
                        .iter()
                        .map(|error| error.to_string())
                        .collect::<Vec<_>>()
                        .join("; "),
                )
            })?;

        for warning in &warnings {
            log::warn!("While parsing {}: {}", name, warning);
        }

        Ok(Self {
            structure: Structure::from_pdbtbx(name, &pdb, options),
            name: name.to_string(),
            format,
        })
    }

    pub fn atom_count(&self) -> usize {
        self.structure.atom_count()
    }

    pub fn chain_ids(&self) -> Vec<String> {
        self.structure.chain_ids()
    }
}

/// Proteins loaded during a session, keyed by PDB ID or file stem
///
/// Entries live until the caller removes them or clears the store.
pub struct ProteinStore {
    proteins: HashMap<String, Arc<ProteinData>>,
    client: RemoteClient,
    parse_options: ParseOptions,
}

impl ProteinStore {
    pub fn new(client: RemoteClient, parse_options: ParseOptions) -> Self {
        Self {
            proteins: HashMap::new(),
            client,
            parse_options,
        }
    }

    pub fn client_mut(&mut self) -> &mut RemoteClient {
        &mut self.client
    }

    pub fn fetch(&mut self, code: &str) -> MosaicResult<Arc<ProteinData>> {
        let code = normalize_pdb_id(code)?;

        if let Some(existing) = self.proteins.get(&code) {
            return Ok(existing.clone());
        }

        let result = self.client.fetch_structure(&code)?;
        let protein = ProteinData::from_string(&result.content, &code, result.format, &self.parse_options)?;
        log::info!(
            "Loaded {} with {} atoms, {} chains",
            protein.name,
            protein.atom_count(),
            protein.chain_ids().len()
        );
        let shared = Arc::new(protein);
        self.proteins.insert(code, shared.clone());
        Ok(shared)
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> MosaicResult<Arc<ProteinData>> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("unknown")
            .to_string();

        if let Some(existing) = self.proteins.get(&name) {
            return Ok(existing.clone());
        }

        let result = load_file(path)?;
        let protein = ProteinData::from_string(&result.content, &name, result.format, &self.parse_options)?;
        log::info!(
            "Loaded {} from {} ({} atoms)",
            protein.name,
            path.display(),
            protein.atom_count()
        );
        let shared = Arc::new(protein);
        self.proteins.insert(name, shared.clone());
        Ok(shared)
    }

    pub fn get(&self, name: &str) -> Option<Arc<ProteinData>> {
        self.proteins.get(name).cloned()
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<ProteinData>> {
        self.proteins.remove(name)
    }

    pub fn clear(&mut self) {
        self.proteins.clear();
    }

    /// Names of all loaded proteins, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.proteins.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ProteinData>> {
        self.proteins.values()
    }
}
