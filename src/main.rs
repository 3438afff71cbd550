use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};

use garden_stylizer::{
    config::Config,
    palette::{render_kawaii_svg, svg_data_url, thematic_portrait, KawaiiPalette},
    source::ImageLoader,
    DominantColorExtractor, ImageKind, ImageSource, PodImageStore, StylizationEngine,
};

#[derive(Parser)]
#[command(
    name = "garden-stylizer",
    version,
    about = "Cartoonize hydroponic plant photos",
    long_about = "garden-stylizer turns plant pod photos into cartoon-styled images and builds kawaii plant portraits from a photo's dominant colors."
)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Stylize a single photo into a PNG
    Stylize {
        /// Photo path, http(s) URL or data URL
        #[arg(short, long)]
        input: String,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Style preset (kawaii, sketch, watercolor or one from the config)
        #[arg(short, long)]
        style: Option<String>,

        /// Also keep the original and the cartoon in the pod image store
        #[arg(long)]
        pod: Option<String>,
    },

    /// Stylize every PNG/JPEG in a directory
    Batch {
        /// Directory of photos
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Directory for the stylized PNGs
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Style preset
        #[arg(short, long)]
        style: Option<String>,
    },

    /// Print the dominant colors of a photo
    Palette {
        /// Photo path, http(s) URL or data URL
        #[arg(short, long)]
        input: String,
    },

    /// Render a kawaii plant portrait colored after a photo
    Portrait {
        /// Photo to take colors from; omit for the default palette
        #[arg(short, long)]
        input: Option<String>,

        /// Output SVG path; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print a data URL instead of raw SVG
        #[arg(long)]
        data_url: bool,
    },

    /// List available style presets
    Styles,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting garden-stylizer v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };
    config.validate()?;

    match cli.command {
        Command::Stylize { input, output, style, pod } => {
            stylize_one(&config, &input, &output, style.as_deref(), pod.as_deref()).await
        }
        Command::Batch { input_dir, output_dir, style } => {
            stylize_dir(&config, &input_dir, &output_dir, style.as_deref()).await
        }
        Command::Palette { input } => {
            let extractor = DominantColorExtractor::new(config.palette.clone());
            let colors = extractor.extract(&ImageSource::parse(&input)).await?;
            if colors.is_empty() {
                warn!("No opaque pixels found in {}", input);
            }
            for color in colors {
                println!("{}  {}", color.to_hex(), color);
            }
            Ok(())
        }
        Command::Portrait { input, output, data_url } => {
            let svg = match input {
                Some(input) => {
                    let extractor = DominantColorExtractor::new(config.palette.clone());
                    thematic_portrait(&extractor, &ImageSource::parse(&input)).await
                }
                None => render_kawaii_svg(&KawaiiPalette::default()),
            };
            let rendered = if data_url { svg_data_url(&svg) } else { svg };

            match output {
                Some(path) => {
                    tokio::fs::write(&path, rendered).await?;
                    info!("Portrait saved to {:?}", path);
                }
                None => println!("{}", rendered),
            }
            Ok(())
        }
        Command::Styles => {
            let registry = config.style_registry()?;
            for name in registry.available_styles() {
                if let Some(preset) = registry.get_style(&name) {
                    let marker = if name == registry.default_style() { "*" } else { " " };
                    println!(
                        "{} {:<12} saturation={} contrast={} brightness={} blur={} levels={} edges={}",
                        marker, name, preset.saturation, preset.contrast, preset.brightness,
                        preset.blur_radius, preset.posterize_levels, preset.edge_strength
                    );
                }
            }
            Ok(())
        }
    }
}

async fn stylize_one(
    config: &Config,
    input: &str,
    output: &Path,
    style: Option<&str>,
    pod: Option<&str>,
) -> Result<()> {
    let engine = StylizationEngine::new(config)?;
    let source = ImageSource::parse(input);

    // Read once: the original bytes also go to the pod store
    let original = ImageLoader::new().load_bytes(&source).await.map_err(|e| {
        warn!("{}", e.user_message());
        e
    })?;
    let image = ImageLoader::decode(&original, &source.describe())?;

    let cartoon = engine.stylize_decoded(image, style).await.map_err(|e| {
        warn!("{}", e.user_message());
        e
    })?;
    cartoon.save(output).await?;
    info!("Cartoon saved to {:?}", output);

    if let Some(pod_id) = pod {
        let store = PodImageStore::from_config(&config.store);
        store.save(pod_id, ImageKind::Original, &original).await?;
        store.save(pod_id, ImageKind::Cartoon, &cartoon.bytes).await?;
        info!("Stored pod {} in {:?}", pod_id, store.root());
    }

    Ok(())
}

async fn stylize_dir(
    config: &Config,
    input_dir: &Path,
    output_dir: &Path,
    style: Option<&str>,
) -> Result<()> {
    let mut paths = Vec::new();
    let mut entries = tokio::fs::read_dir(input_dir)
        .await
        .with_context(|| format!("reading {:?}", input_dir))?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"))
            .unwrap_or(false);
        if supported {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        warn!("No PNG or JPEG photos found in {:?}", input_dir);
        return Ok(());
    }

    tokio::fs::create_dir_all(output_dir).await?;

    let engine = StylizationEngine::new(config)?;
    let sources: Vec<ImageSource> = paths.iter().map(|path| path.as_path().into()).collect();
    let results = engine.stylize_batch(&sources, style).await?;

    let mut saved = 0;
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(cartoon) => {
                let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("photo");
                cartoon.save(output_dir.join(format!("{}-cartoon.png", stem))).await?;
                saved += 1;
            }
            Err(e) => warn!("Skipping {:?}: {}", path, e),
        }
    }

    info!("Stylized {} of {} photos into {:?}", saved, paths.len(), output_dir);
    Ok(())
}
