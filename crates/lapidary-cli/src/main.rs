//! lapidary CLI — carve stones from facet diagrams, mount them in
//! settings, and size ring bands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lapidary::export::stl::save_stl;
use lapidary::{
    carve_program, read_asc, CarveSettings, GemMaterial, Gemstone, RingParameters, RingProfile,
    SettingParameters, Transform,
};

#[derive(Parser)]
#[command(name = "lapidary")]
#[command(about = "Gemstone carving and jewelry geometry from facet diagrams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about a facet diagram
    Info {
        /// Path to the .asc facet diagram
        file: PathBuf,
        /// Emit machine-readable JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Carve a stone from a facet diagram and export it as STL
    Carve {
        /// Input .asc facet diagram
        input: PathBuf,
        /// Output STL file
        output: PathBuf,
        /// Edge length of the raw block in mm
        #[arg(short, long)]
        block_size: Option<f64>,
        /// Material for the weight report (diamond, ruby, quartz, ...)
        #[arg(short, long, default_value = "diamond")]
        material: GemMaterial,
        /// Rescale the stone to this many carats before export
        #[arg(short, long)]
        carats: Option<f64>,
    },
    /// Carve a stone and build the bezel setting that mounts it
    Setting {
        /// Input .asc facet diagram
        input: PathBuf,
        /// Output STL file for the setting
        output: PathBuf,
        /// Edge length of the raw block in mm
        #[arg(short, long)]
        block_size: Option<f64>,
        /// TOML file with setting parameters (defaults apply otherwise)
        #[arg(short, long)]
        params: Option<PathBuf>,
    },
    /// Generate a plain ring band
    Ring {
        /// Output STL file
        output: PathBuf,
        /// ISO 8653 ring size (inner circumference in mm)
        #[arg(short, long, default_value_t = 57.0)]
        size: f64,
        /// Axial width of the band in mm
        #[arg(short, long, default_value_t = 5.0)]
        width: f64,
        /// Radial thickness of the band in mm
        #[arg(short, long, default_value_t = 2.0)]
        thickness: f64,
        /// Section shape: elliptical or rectangular
        #[arg(short, long, default_value = "elliptical")]
        profile: RingProfile,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { file, json } => show_info(&file, json),
        Commands::Carve {
            input,
            output,
            block_size,
            material,
            carats,
        } => carve_stone(&input, &output, block_size, material, carats),
        Commands::Setting {
            input,
            output,
            block_size,
            params,
        } => build_setting(&input, &output, block_size, params.as_deref()),
        Commands::Ring {
            output,
            size,
            width,
            thickness,
            profile,
        } => build_band(&output, size, width, thickness, profile),
    }
}

fn show_info(file: &Path, json: bool) -> Result<()> {
    let program = read_asc(file).with_context(|| format!("reading {}", file.display()))?;
    let total: usize = program.facet_sets.iter().map(|s| s.indices.len()).sum();

    if json {
        let value = serde_json::json!({
            "gear": program.full_rotation,
            "facets": total,
            "facet_sets": program
                .facet_sets
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "angle": s.angle,
                        "radius": s.radius,
                        "indices": s.indices,
                    })
                })
                .collect::<Vec<_>>(),
            "header": program.header,
            "footer": program.footer,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if !program.header.is_empty() {
        println!("{}", program.header);
    }
    println!("gear: {}", program.full_rotation);
    println!("facet sets: {} ({total} facets)", program.facet_sets.len());
    for set in &program.facet_sets {
        println!(
            "  {:>7.2} deg at {:.4}  x{}",
            set.angle,
            set.radius,
            set.indices.len()
        );
    }
    if !program.footer.is_empty() {
        println!("{}", program.footer);
    }
    Ok(())
}

fn carve_stone(
    input: &Path,
    output: &Path,
    block_size: Option<f64>,
    material: GemMaterial,
    carats: Option<f64>,
) -> Result<()> {
    let mut gem = load_stone(input, block_size)?;
    if let Some(target) = carats {
        gem = gem
            .scaled_to_carats(target, material.density())
            .context("rescaling the stone")?;
    }
    println!(
        "{}: {:.3} mm3, {:.3} ct of {}",
        gem.name,
        gem.volume(),
        gem.carats(material.density()),
        material
    );
    save_stl(output, &gem.solid).with_context(|| format!("writing {}", output.display()))?;
    println!("Exported STL to {}", output.display());
    Ok(())
}

fn build_setting(
    input: &Path,
    output: &Path,
    block_size: Option<f64>,
    params_file: Option<&Path>,
) -> Result<()> {
    let params = match params_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SettingParameters::default(),
    };

    let gem = load_stone(input, block_size)?;
    let setting = lapidary::build_setting(&gem, &Transform::identity(), &params)
        .with_context(|| format!("building a setting for {}", gem.name))?;
    save_stl(output, &setting.solid).with_context(|| format!("writing {}", output.display()))?;
    println!("Exported STL to {}", output.display());
    Ok(())
}

fn build_band(
    output: &Path,
    size: f64,
    width: f64,
    thickness: f64,
    profile: RingProfile,
) -> Result<()> {
    let params = RingParameters {
        size,
        width,
        thickness,
        profile,
    };
    let band = lapidary::build_ring(&params)?;
    println!(
        "size {size}: US {:.2}, Swiss {:.1}, inner diameter {:.2} mm",
        params.north_american(),
        params.swiss(),
        params.diameter()
    );
    save_stl(output, &band).with_context(|| format!("writing {}", output.display()))?;
    println!("Exported STL to {}", output.display());
    Ok(())
}

fn load_stone(input: &Path, block_size: Option<f64>) -> Result<Gemstone> {
    let program = read_asc(input).with_context(|| format!("reading {}", input.display()))?;
    let settings = block_size
        .map(|block_size| CarveSettings { block_size })
        .unwrap_or_default();
    let mut gem = carve_program(&program, &settings)
        .with_context(|| format!("carving {}", input.display()))?;
    if let Some(stem) = input.file_stem().and_then(|s| s.to_str()) {
        gem.name = stem.to_string();
    }
    Ok(gem)
}
