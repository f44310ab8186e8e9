//! Plant assembly report
//!
//! Grows a tree grammar, dresses it with leaves and prints the parameter
//! tables, produced rules and assembly metrics.
//!
//! Usage:
//!     plant_report [OPTIONS]
//!
//! Options:
//!     -t, --tree <NAME>          Tree species (default: monopodial)
//!     -l, --leaf <NAME>          Leaf species (default: cordate)
//!     --seed <SEED>              Randomize every parameter within its range
//!     --overlap-seed <SEED>      Seed for overlap sampling (default: OS entropy)
//!     --params <FILE>            JSON parameter overrides keyed by species
//!     --config <FILE>            JSON assembly configuration
//!     --leaf-only                Assemble a single leaf without a tree
//!     --list                     List the known species and exit
//!     -h, --help                 Show this help message

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use pvtree::assembly::{Assembler, AssemblyConfig, MaterialSummary, Structure};
use pvtree::params::ParameterConfig;
use pvtree::species::{LeafSystem, Registry, TreeSystem};

fn print_help() {
    eprintln!("plant_report - Plant assembly report");
    eprintln!();
    eprintln!("Usage: plant_report [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("    -t, --tree <NAME>          Tree species (default: monopodial)");
    eprintln!("    -l, --leaf <NAME>          Leaf species (default: cordate)");
    eprintln!("    --seed <SEED>              Randomize every parameter within its range");
    eprintln!("    --overlap-seed <SEED>      Seed for overlap sampling (default: OS entropy)");
    eprintln!("    --params <FILE>            JSON parameter overrides keyed by species");
    eprintln!("    --config <FILE>            JSON assembly configuration");
    eprintln!("    --leaf-only                Assemble a single leaf without a tree");
    eprintln!("    --list                     List the known species and exit");
    eprintln!("    -h, --help                 Show this help message");
    eprintln!();
    eprintln!("Example:");
    eprintln!("    plant_report -t ternary -l simple --overlap-seed 7");
    eprintln!("    plant_report --leaf-only -l cordate");
}

#[derive(Debug)]
struct Args {
    tree: String,
    leaf: String,
    seed: Option<u64>,
    overlap_seed: Option<u64>,
    params: Option<PathBuf>,
    config: Option<PathBuf>,
    leaf_only: bool,
    list: bool,
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i).map(String::as_str).ok_or_else(|| format!("Missing value for {}", flag))
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut parsed = Args {
        tree: "monopodial".to_string(),
        leaf: "cordate".to_string(),
        seed: None,
        overlap_seed: None,
        params: None,
        config: None,
        leaf_only: false,
        list: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-t" | "--tree" => {
                i += 1;
                parsed.tree = value(&args, i, "--tree")?.to_lowercase();
            }
            "-l" | "--leaf" => {
                i += 1;
                parsed.leaf = value(&args, i, "--leaf")?.to_lowercase();
            }
            "--seed" => {
                i += 1;
                let raw = value(&args, i, "--seed")?;
                parsed.seed = Some(raw.parse().map_err(|_| format!("Invalid seed: {}", raw))?);
            }
            "--overlap-seed" => {
                i += 1;
                let raw = value(&args, i, "--overlap-seed")?;
                parsed.overlap_seed = Some(raw.parse().map_err(|_| format!("Invalid overlap seed: {}", raw))?);
            }
            "--params" => {
                i += 1;
                parsed.params = Some(PathBuf::from(value(&args, i, "--params")?));
            }
            "--config" => {
                i += 1;
                parsed.config = Some(PathBuf::from(value(&args, i, "--config")?));
            }
            "--leaf-only" => parsed.leaf_only = true,
            "--list" => parsed.list = true,
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    Ok(parsed)
}

fn print_metrics(structure: &Structure) {
    let metrics = &structure.metrics;
    println!("Leaves placed       : {}", metrics.leaf_count);
    println!("Leaves rejected     : {}", metrics.rejected_leaf_count);
    println!("Branch segments     : {}", metrics.branch_count);
    println!("Sensitive area (m2) : {:.6}", metrics.sensitive_area);
    println!(
        "Reach (m)           : x {:.3}, y {:.3}, z {:.3}",
        metrics.x_size, metrics.y_size, metrics.z_size
    );
    println!("World radius (m)    : {:.3}", metrics.world_radius);

    let mut summary = MaterialSummary::default();
    structure.emit(&mut summary);
    println!();
    println!("{:<16} {:>8} {:>14}", "Material", "Volumes", "Area (m2)");
    for (material, count) in &summary.volumes {
        let area = summary.surface_area.get(material).copied().unwrap_or_default();
        println!("{:<16} {:>8} {:>14.6}", material, count, area);
    }
    println!("Leaf facets: {}", summary.facets);
}

fn run(args: Args) -> pvtree::core::Result<()> {
    let trees = Registry::<TreeSystem>::trees();
    let leaves = Registry::<LeafSystem>::leaves();

    if args.list {
        println!("Trees : {}", trees.names().collect::<Vec<_>>().join(", "));
        println!("Leaves: {}", leaves.names().collect::<Vec<_>>().join(", "));
        return Ok(());
    }

    let overrides = match &args.params {
        Some(path) => ParameterConfig::load(path)?,
        None => ParameterConfig::new(),
    };
    let mut config = match &args.config {
        Some(path) => AssemblyConfig::load(path)?,
        None => AssemblyConfig::default(),
    };
    if args.overlap_seed.is_some() {
        config.overlap_seed = args.overlap_seed;
    }

    let mut leaf = leaves.create_configured(&args.leaf, &overrides)?;
    if let Some(seed) = args.seed {
        leaf.parameters_mut().randomize_parameters(seed);
    }
    let assembler = Assembler::new(config);
    let start = Instant::now();

    let structure = if args.leaf_only {
        print!("{}", leaf);
        assembler.build_leaf(&leaf)?
    } else {
        let mut tree = trees.create_configured(&args.tree, &overrides)?;
        if let Some(seed) = args.seed {
            tree.parameters_mut().randomize_parameters(seed);
        }
        print!("{}", tree);
        print!("{}", leaf);
        assembler.build(&tree, &leaf)?
    };

    println!();
    print_metrics(&structure);
    log::info!("Report finished in {:.2?}", start.elapsed());
    Ok(())
}

fn main() {
    pvtree::core::logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
