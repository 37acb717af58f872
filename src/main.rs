use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, RwLock};

use protein_mosaic::analysis::export::{
    export_ligand_counts_to_csv, export_ramachandran_to_csv, export_report_to_json, AnnotationReport,
};
use protein_mosaic::analysis::ramachandran::calculate_ramachandran_angles;
use protein_mosaic::lua_api::{ScriptEngine, ScriptReloader};
use protein_mosaic::protein::RemoteClient;
use protein_mosaic::{MosaicConfig, MosaicError, MosaicResult, ProteinData, ProteinStore};

#[derive(Parser)]
#[command(name = "protein-mosaic")]
#[command(version)]
#[command(about = "Ligand and active-site annotation of protein structures", long_about = None)]
struct Cli {
    /// Config TOML file (defaults to protein-mosaic.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify ligands and list active-site candidates
    Annotate {
        #[command(flatten)]
        source: StructureSource,

        /// Write the full report as JSON
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,

        /// Write ligand counts as CSV
        #[arg(long, value_name = "PATH")]
        counts_csv: Option<PathBuf>,
    },
    /// Print RCSB entry metadata
    Entry {
        /// PDB ID
        id: String,
    },
    /// Print formula, weight and SMILES of a PubChem compound
    Compound {
        /// PubChem CID or compound name
        id: String,
    },
    /// Compute backbone phi/psi angles
    Ramachandran {
        #[command(flatten)]
        source: StructureSource,

        /// Write the angles as CSV
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },
    /// Run a Lua script against the pdb API
    Script {
        /// Lua script to execute
        path: PathBuf,

        /// Re-run scripts in the script's directory whenever they change
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct StructureSource {
    /// PDB ID to fetch from RCSB
    id: Option<String>,

    /// Local PDB or mmCIF file
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match run(cli) {
        Ok(exit_code) => exit_code,
        Err(error) => {
            log::error!("{}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> MosaicResult<ExitCode> {
    let config = MosaicConfig::discover(cli.config.as_deref())?;
    let client = RemoteClient::new(&config.fetch)?;
    let mut store = ProteinStore::new(client, config.parse);

    match cli.command {
        Commands::Annotate {
            source,
            json,
            counts_csv,
        } => {
            let protein = load_source(&mut store, &source)?;
            let report = AnnotationReport::build(&protein, &config.hbonds);
            print_report(&report);

            if let Some(json_path) = json {
                export_report_to_json(&report, &json_path)?;
                log::info!("Wrote {}", json_path.display());
            }
            if let Some(csv_path) = counts_csv {
                export_ligand_counts_to_csv(&report.ligands, &csv_path)?;
                log::info!("Wrote {}", csv_path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Entry { id } => {
            let entry = store.client_mut().fetch_entry(&id)?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Compound { id } => {
            let compound = store.client_mut().fetch_compound(&id)?;
            let display = |value: Option<String>| value.unwrap_or_else(|| "N/A".to_string());
            println!("CID: {}", display(compound.cid.map(|cid| cid.to_string())));
            println!("Molecular Formula: {}", display(compound.molecular_formula));
            println!(
                "Molecular Weight: {}",
                display(compound.molecular_weight.map(|weight| format!("{:.2}", weight)))
            );
            println!("SMILES: {}", display(compound.smiles));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Ramachandran { source, csv } => {
            let protein = load_source(&mut store, &source)?;
            let points = calculate_ramachandran_angles(&protein.structure);
            match csv {
                Some(csv_path) => {
                    export_ramachandran_to_csv(&points, &csv_path)?;
                    log::info!("Wrote {} points to {}", points.len(), csv_path.display());
                }
                None => {
                    for point in &points {
                        println!(
                            "{} {:>5} {:<3} {:>8.2} {:>8.2}",
                            point.chain_identifier,
                            point.residue_number,
                            point.residue_name,
                            point.phi_angle,
                            point.psi_angle
                        );
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Script { path, watch } => run_script(store, &config, &path, watch),
    }
}

fn load_source(store: &mut ProteinStore, source: &StructureSource) -> MosaicResult<Arc<ProteinData>> {
    match (&source.id, &source.file) {
        (_, Some(file_path)) => store.load(file_path),
        (Some(pdb_code), None) => store.fetch(pdb_code),
        (None, None) => Err(MosaicError::invalid_identifier("no PDB ID or --file given")),
    }
}

fn print_report(report: &AnnotationReport) {
    println!(
        "{}: {} atoms, {} residues, chains {}",
        report.protein_name,
        report.total_atom_count,
        report.total_residue_count,
        report.chain_identifiers.join(",")
    );

    println!("\nLigand counts:");
    for (classification, count) in report.ligands.counts() {
        println!("  {:<12} {}", classification, count);
    }

    if !report.ligands.ion.is_empty() {
        println!("\nIons: {}", report.ligands.ion.join(", "));
    }

    let ligand_records: Vec<_> = report
        .ligands
        .monodentate
        .iter()
        .chain(report.ligands.polydentate.iter())
        .collect();
    if !ligand_records.is_empty() {
        println!("\nLigands:");
        for record in ligand_records {
            println!(
                "  {:<4} {} {:>5}  {}",
                record.resname, record.chain, record.resnum, record.classification
            );
        }
    }

    println!("\nActive site candidates: {}", report.active_sites.len());
    for candidate in &report.active_sites {
        println!("  {:<4} {} {:>5}", candidate.resname, candidate.chain, candidate.resnum);
    }

    println!("\nHydrogen bonds: {}", report.hydrogen_bond_count);
}

fn run_script(store: ProteinStore, config: &MosaicConfig, script_path: &Path, watch: bool) -> MosaicResult<ExitCode> {
    let shared_store = Arc::new(RwLock::new(store));
    let script_engine =
        ScriptEngine::new(shared_store, config.hbonds).map_err(|error| MosaicError::Script(error.to_string()))?;

    let script_path_string = script_path.to_string_lossy().into_owned();
    let initial_run = script_engine.run_file(&script_path_string);
    if let Err(script_error) = &initial_run {
        log::error!("Script error: {}", script_error);
    }
    if !watch {
        return Ok(if initial_run.is_ok() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let watched_directory = match script_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let reloader = ScriptReloader::watch(&watched_directory)?;

    while let Some(changed_paths) = reloader.next_changed() {
        for changed_path in changed_paths {
            log::info!("Reloading: {}", changed_path.display());
            if let Err(script_error) = script_engine.run_file(&changed_path.to_string_lossy()) {
                log::error!("Script error: {}", script_error);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
