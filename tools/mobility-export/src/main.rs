use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use urban_mobility::spatial::boundaries::DEFAULT_CODE_PROPERTY;
use urban_mobility::{City, CountryBoundaries, CsvDatasetLoader, MobilityLoader, SpatialFilter};

#[derive(Parser, Debug)]
#[command(
    name = "mobility-export",
    author,
    version,
    about = "Derive itineraries and a hex grid from urban mobility datasets, export GeoJSON layers",
    long_about = "Loads one city's transit, bike-share, and ridership datasets, \
                  reconstructs per-route itineraries, tiles the covered area with \
                  an H3 hex grid, and writes one GeoJSON FeatureCollection per layer.\n\n\
                  Geographic restriction is opt-in: --restrict-country admits only \
                  records inside the city's country boundary (requires --boundaries), \
                  and --radius-km admits only records near the city center."
)]
struct Args {
    /// City dataset to load (geneva, larnaca)
    #[arg(short, long, default_value = "geneva")]
    city: String,

    /// Directory holding the city's input files
    #[arg(short, long)]
    data_dir: PathBuf,

    /// Output directory for the GeoJSON layers
    #[arg(short, long)]
    output: PathBuf,

    /// H3 resolution for the hex grid (0-15)
    #[arg(short, long, default_value_t = 9)]
    resolution: u8,

    /// Admit only records inside the city's country boundary
    #[arg(long)]
    restrict_country: bool,

    /// Country boundaries GeoJSON file (required with --restrict-country)
    #[arg(long)]
    boundaries: Option<PathBuf>,

    /// Property carrying the alpha-3 code in the boundaries file
    #[arg(long, default_value = DEFAULT_CODE_PROPERTY)]
    country_property: String,

    /// Admit only records near the city center, at the city's default radius
    #[arg(long)]
    restrict_radius: bool,

    /// Override the admission radius around the city center (km)
    #[arg(long, value_name = "KM")]
    radius_km: Option<f64>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    log::info!("=== Urban Mobility Export ===");
    log::info!("City: {}", args.city);
    log::info!("Data: {}", args.data_dir.display());
    log::info!("Output: {}", args.output.display());

    let city: City = args
        .city
        .parse()
        .map_err(|message: String| anyhow::anyhow!(message))?;
    let Some(config) = city.config(&args.data_dir) else {
        bail!("no dataset wiring for {city} yet");
    };

    if !args.data_dir.exists() {
        bail!("data directory does not exist: {}", args.data_dir.display());
    }

    // Build the admission filter, if any restriction was requested
    let mut filter = SpatialFilter::unrestricted();
    let mut restricted = false;
    if args.restrict_country {
        let Some(boundaries_path) = &args.boundaries else {
            bail!("--restrict-country requires --boundaries <geojson>");
        };
        let boundaries =
            CountryBoundaries::from_geojson_file(boundaries_path, &args.country_property)
                .context("Failed to read country boundaries")?;
        filter = filter
            .with_country(&boundaries, &config.country_alpha3)
            .context("Failed to configure country restriction")?;
        restricted = true;
        log::info!("Restricting to country {}", config.country_alpha3);
    }
    if args.restrict_radius || args.radius_km.is_some() {
        let radius_km = args.radius_km.unwrap_or(config.default_radius_km);
        if radius_km <= 0.0 || !radius_km.is_finite() {
            bail!("--radius-km must be a positive number, got {radius_km}");
        }
        filter = filter.with_radius_km(config.center, radius_km);
        restricted = true;
        log::info!("Restricting to {radius_km} km around the city center");
    }

    let mut loader = CsvDatasetLoader::new(config);
    if restricted {
        loader = loader.with_filter(filter);
    }

    // Phase 1: Load
    log::info!("");
    log::info!("Phase 1: Loading datasets...");
    let mut system = loader.load_all(None).context("Failed to load datasets")?;

    // Phase 2: Derive
    log::info!("");
    log::info!("Phase 2: Deriving artifacts...");
    let itineraries = system.build_itineraries().len();
    log::info!("  {} itineraries", itineraries);

    if system.grid_points().is_empty() {
        log::warn!("  No positioned records loaded; skipping the hex grid");
    } else {
        let grid = system
            .build_hex_grid(args.resolution)
            .context("Failed to build the hex grid")?;
        log::info!("  {} hex cells", grid.cells.len());
    }

    // Phase 3: Export
    log::info!("");
    log::info!("Phase 3: Writing GeoJSON layers...");
    system
        .save_geojson(&args.output)
        .context("Failed to write GeoJSON layers")?;

    log::info!("");
    log::info!("Output written to: {}", args.output.display());
    log::info!("Done!");

    Ok(())
}
