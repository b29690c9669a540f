use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{info, warn};
use symmetry_engine::groups::{ExpansionOptions, OperatorSet};
use symmetry_engine::interfaces::TranslationRange;
use symmetry_engine::operators::parse_xyz;
use symmetry_engine::settings::{lookup, BasisChange};

#[derive(Parser)]
#[command(name = "symmetry-engine")]
#[command(about = "Space-group operator generation, classification and setting transforms")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the operators of a catalog entry, Hall symbol or xyz generator list
    Generate {
        /// "14", "14:b2", "HM:P 1 21/c 1", "Hall:-P 2ybc" or "x,y,z;-x,-y,-z"
        key: String,

        /// Show translations in [-1/2, 1/2)
        #[arg(short, long)]
        symmetric: bool,

        /// Describe every operator geometrically
        #[arg(short, long)]
        classify: bool,
    },
    /// Classify a single operator given in xyz notation
    Classify {
        /// e.g. "-x,y+1/2,-z"
        operator: String,
    },
    /// Re-express a group in another setting and identify the result
    Transform {
        key: String,

        /// New basis and origin, e.g. "a-b,a+b,c;1/2,0,0"
        basis: String,
    },
    /// List the screw and glide images in neighbouring cells
    Expand {
        key: String,

        /// Lattice translations tried along each axis
        #[arg(short, long, default_value_t = 1)]
        range: i32,

        /// Keep elements that do not meet the unit cell
        #[arg(short, long)]
        all: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    info!("Starting symmetry-engine v{}", symmetry_engine::VERSION);

    match cli.command {
        Commands::Generate {
            key,
            symmetric,
            classify,
        } => generate(&key, symmetric, classify),
        Commands::Classify { operator } => classify(&operator),
        Commands::Transform { key, basis } => transform(&key, &basis),
        Commands::Expand { key, range, all } => expand(&key, range, all),
    }
}

fn generate(key: &str, symmetric: bool, classify: bool) -> Result<()> {
    let set = OperatorSet::from_key(key).with_context(|| format!("cannot resolve '{}'", key))?;
    print_header(&set);

    let range = if symmetric {
        TranslationRange::Symmetric
    } else {
        TranslationRange::Positive
    };
    for (i, op) in set.iter().enumerate() {
        if classify {
            match op.classify() {
                Ok(c) => println!("{:>4}  {:<28} {}", i + 1, op.xyz_in(range), c),
                Err(e) => {
                    warn!("{}", e);
                    println!("{:>4}  {}", i + 1, op.xyz_in(range));
                }
            }
        } else {
            println!("{:>4}  {}", i + 1, op.xyz_in(range));
        }
    }
    Ok(())
}

fn classify(operator: &str) -> Result<()> {
    let op = parse_xyz(operator)?;
    let classified = op.classify()?;
    println!("{}", op);
    println!("  {}", classified);
    println!("  order {}", classified.order);
    if let Some(fixed) = classified.fixed_point {
        println!("  fixed point ({:.4}, {:.4}, {:.4})", fixed.x, fixed.y, fixed.z);
    }
    if classified.irrelevant {
        println!("  (not a distinct element within one cell)");
    }
    Ok(())
}

fn transform(key: &str, basis: &str) -> Result<()> {
    let set = OperatorSet::from_key(key).with_context(|| format!("cannot resolve '{}'", key))?;
    let basis = BasisChange::parse(basis)?;
    let transformed = set.transformed(&basis)?;

    print_header(&transformed);
    print!("{}", transformed);
    Ok(())
}

fn expand(key: &str, range: i32, all: bool) -> Result<()> {
    let set = OperatorSet::from_key(key).with_context(|| format!("cannot resolve '{}'", key))?;
    let options = ExpansionOptions::default()
        .with_range(range)
        .with_within_cell(!all);
    let extra = set.expanded(&options);

    print_header(&set);
    println!("{} additional elements", extra.len());
    for op in &extra {
        match op.classify() {
            Ok(c) => println!("  {:<28} {}", op.xyz(), c),
            Err(_) => println!("  {}", op.xyz()),
        }
    }
    Ok(())
}

fn print_header(set: &OperatorSet) {
    let identified = set
        .table_id()
        .and_then(|id| lookup(id).ok())
        .map(|s| format!("{} ({})", s.id(), s.hm()))
        .unwrap_or_else(|| "setting not in catalog".to_string());
    let lattice = set
        .lattice()
        .map(|l| l.to_string())
        .unwrap_or_else(|| "non-conventional".to_string());
    println!("Space group: {}", identified);
    println!(
        "Lattice {}, {} operators, centrosymmetric: {}",
        lattice,
        set.len(),
        set.is_centrosymmetric()
    );
    if !set.setting_transform().is_identity() {
        println!("Setting: {}", set.setting_transform());
    }
}
