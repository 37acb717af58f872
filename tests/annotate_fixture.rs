//! End-to-end annotation of a small metal-site structure read from disk
//!
//! The fixture holds HIS-GLY-ALA on chain A followed by ZN, HEM, HIC and two
//! waters. GLY 2 carries an amide hydrogen aligned with the ALA 3 carbonyl
//! oxygen, giving exactly one backbone hydrogen bond.

use protein_mosaic::analysis::export::{write_ligand_counts_csv, AnnotationReport};
use protein_mosaic::analysis::hydrogen_bonds::detect_hydrogen_bonds;
use protein_mosaic::analysis::ramachandran::calculate_ramachandran_angles;
use protein_mosaic::config::{FetchConfig, HydrogenBondCriteria, ParseOptions};
use protein_mosaic::protein::RemoteClient;
use protein_mosaic::{annotate_structure, LigandClassification, ProteinData, ProteinStore};
use std::path::PathBuf;
use std::sync::Arc;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/metal_site.pdb")
}

fn load_fixture(parse_options: ParseOptions) -> Arc<ProteinData> {
    let _ = env_logger::builder().is_test(true).try_init();
    let fetch_config = FetchConfig {
        disk_cache: false,
        ..FetchConfig::default()
    };
    let client = RemoteClient::new(&fetch_config).expect("build offline client");
    let mut store = ProteinStore::new(client, parse_options);
    store.load(fixture_path()).expect("load fixture")
}

#[test]
fn fixture_parses_into_expected_residues() {
    let protein = load_fixture(ParseOptions::default());

    assert_eq!(protein.name, "metal_site");
    assert_eq!(protein.atom_count(), 24);
    assert_eq!(protein.structure.residue_count(), 8);
    assert_eq!(protein.chain_ids(), vec!["A".to_string()]);

    let hetero_names: Vec<&str> = protein
        .structure
        .residues()
        .filter(|residue| residue.hetero)
        .map(|residue| residue.name.as_str())
        .collect();
    assert_eq!(hetero_names, vec!["ZN", "HEM", "HIC"]);
}

#[test]
fn ligands_are_grouped_by_classification() {
    let protein = load_fixture(ParseOptions::default());
    let annotation = annotate_structure(&protein.structure);
    let ligands = &annotation.ligands;

    assert_eq!(ligands.ion, vec!["ZN".to_string()]);

    assert_eq!(ligands.monodentate.len(), 1);
    assert_eq!(ligands.monodentate[0].resname, "HEM");
    assert_eq!(ligands.monodentate[0].chain, "A");
    assert_eq!(ligands.monodentate[0].resnum, 102);

    assert_eq!(ligands.polydentate.len(), 1);
    assert_eq!(ligands.polydentate[0].resname, "HIC");
    assert_eq!(ligands.polydentate[0].resnum, 103);
    assert_eq!(
        ligands.polydentate[0].classification,
        LigandClassification::Polydentate
    );

    assert_eq!(ligands.total(), 3);
}

#[test]
fn only_polymer_catalytic_residues_are_candidates() {
    let protein = load_fixture(ParseOptions::default());
    let annotation = annotate_structure(&protein.structure);

    assert_eq!(annotation.active_sites.len(), 1);
    let histidine = &annotation.active_sites[0];
    assert_eq!(
        (histidine.resname.as_str(), histidine.chain.as_str(), histidine.resnum),
        ("HIS", "A", 1)
    );
}

#[test]
fn waters_join_monodentate_group_when_requested() {
    let protein = load_fixture(ParseOptions {
        water_as_ligand: true,
    });
    let ligands = annotate_structure(&protein.structure).ligands;

    let monodentate_names: Vec<&str> = ligands
        .monodentate
        .iter()
        .map(|record| record.resname.as_str())
        .collect();
    assert_eq!(monodentate_names, vec!["HEM", "HOH", "HOH"]);
    assert_eq!(ligands.ion.len(), 1);
}

#[test]
fn annotation_is_repeatable() {
    let protein = load_fixture(ParseOptions::default());
    assert_eq!(
        annotate_structure(&protein.structure),
        annotate_structure(&protein.structure)
    );
}

#[test]
fn single_backbone_hydrogen_bond_is_detected() {
    let protein = load_fixture(ParseOptions::default());
    let bonds = detect_hydrogen_bonds(&protein.structure, &HydrogenBondCriteria::default());

    assert_eq!(bonds.len(), 1);
    assert_eq!(bonds[0].donor_atom_index, 5);
    assert_eq!(bonds[0].hydrogen_atom_index, 6);
    assert_eq!(bonds[0].acceptor_atom_index, 13);
    assert!((bonds[0].donor_acceptor_distance - 2.9).abs() < 1e-3);
}

#[test]
fn interior_residue_gets_a_ramachandran_point() {
    let protein = load_fixture(ParseOptions::default());
    let points = calculate_ramachandran_angles(&protein.structure);

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].residue_name, "GLY");
    assert_eq!(points[0].residue_number, 2);
    assert!(points[0].phi_angle.abs() <= 180.0);
    assert!(points[0].psi_angle.abs() <= 180.0);
}

#[test]
fn report_summarises_the_fixture() {
    let protein = load_fixture(ParseOptions::default());
    let report = AnnotationReport::build(&protein, &HydrogenBondCriteria::default());

    assert_eq!(report.protein_name, "metal_site");
    assert_eq!(report.ligand_counts["ion"], 1);
    assert_eq!(report.ligand_counts["monodentate"], 1);
    assert_eq!(report.ligand_counts["polydentate"], 1);
    assert_eq!(report.hydrogen_bond_count, 1);

    let mut csv = Vec::new();
    write_ligand_counts_csv(&report.ligands, &mut csv).unwrap();
    assert_eq!(
        String::from_utf8(csv).unwrap(),
        "LigandType,Count\nion,1\nmonodentate,1\npolydentate,1\n"
    );
}
