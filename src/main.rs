use clap::{Args, Parser, Subcommand};
use image_degrader::imaging::{CropBox, NoiseMode};
use image_degrader::logging::{self, TracingReporter};
use image_degrader::{config, output, pipeline};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "image-degrader")]
#[command(about = "Apply visual degradations to images")]
#[command(long_about = "\
Apply visual degradations to images

Every transform is off unless a flag or the config file turns it on. Enabled
transforms always run in this order:

  saturation → brightness → contrast → sharpness
  → simple noise → complex noise
  → remove black borders → blur → edge detection
  → crop → rotate → resize → scale

Settings are layered: stock defaults, then --config FILE, then flags.
Output files are named {prefix}{stem}{suffix}.{format} inside the output
directory, which is created if missing.

Run 'image-degrader gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// TOML config file layered over the stock defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (per-transform steps and timings)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs to stderr as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Degrade a single image
    Degrade {
        /// Input image
        image: PathBuf,
        #[command(flatten)]
        options: DegradeArgs,
    },
    /// Degrade every .jpg, .jpeg and .png directly inside a directory
    Batch {
        /// Input directory (not searched recursively)
        dir: PathBuf,
        #[command(flatten)]
        options: DegradeArgs,
        /// Also write the batch report as JSON to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

/// Transform and output flags shared by `degrade` and `batch`.
#[derive(Args, Clone, Default)]
struct DegradeArgs {
    /// Saturation factor (1.0 = unchanged, 0.0 = grayscale)
    #[arg(long)]
    saturation: Option<f32>,
    /// Brightness factor (1.0 = unchanged, 0.0 = black)
    #[arg(long)]
    brightness: Option<f32>,
    /// Contrast factor (1.0 = unchanged, 0.0 = flat gray)
    #[arg(long)]
    contrast: Option<f32>,
    /// Sharpness factor (1.0 = unchanged, < 1 softens)
    #[arg(long)]
    sharpness: Option<f32>,
    /// Uniform integer noise amplitude
    #[arg(long)]
    simple_noise: Option<f32>,
    /// Layered noise strength (sigma = value / 1000)
    #[arg(long)]
    complex_noise: Option<f32>,
    /// Distribution for layered noise: gaussian or uniform
    #[arg(long)]
    complex_noise_mode: Option<NoiseMode>,
    /// Crop away surrounding black rows and columns
    #[arg(long)]
    remove_black_borders: bool,
    /// Gaussian blur sigma
    #[arg(long)]
    blur: Option<f32>,
    /// Replace the image by an edge map, after this contrast factor
    #[arg(long)]
    edge_detection: Option<f32>,
    /// Crop box; right and bottom are exclusive
    #[arg(long, value_name = "L,T,R,B", value_parser = config::parse_crop_box)]
    crop: Option<CropBox>,
    /// Counter-clockwise rotation in degrees
    #[arg(long, allow_negative_numbers = true)]
    rotate: Option<f32>,
    /// Grow the canvas to fit the rotated image
    #[arg(long)]
    expand: bool,
    /// Exact output size
    #[arg(long, value_name = "WxH", value_parser = config::parse_dimensions)]
    resize: Option<[u32; 2]>,
    /// Uniform scale factor
    #[arg(long)]
    scale: Option<f64>,
    /// Fixed RNG seed for repeatable noise
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    seed: Option<i64>,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// Output format: jpeg/jpg, png, tiff/tif, webp, bmp, avif
    #[arg(short, long)]
    format: Option<String>,
    /// JPEG/AVIF quality (0-100)
    #[arg(short, long)]
    quality: Option<u32>,
    /// Text prepended to each output file stem
    #[arg(long)]
    prefix: Option<String>,
    /// Text appended to each output file stem
    #[arg(long)]
    suffix: Option<String>,
}

fn put(root: &mut toml::Table, section: Option<&str>, key: &str, value: toml::Value) {
    let target = match section {
        None => root,
        Some(name) => match root
            .entry(name)
            .or_insert_with(|| toml::Value::Table(toml::Table::new()))
        {
            toml::Value::Table(table) => table,
            _ => unreachable!("sections are only ever inserted as tables"),
        },
    };
    target.insert(key.to_string(), value);
}

fn float(v: impl Into<f64>) -> toml::Value {
    toml::Value::Float(v.into())
}

fn ints(values: &[u32]) -> toml::Value {
    toml::Value::Array(
        values
            .iter()
            .map(|&v| toml::Value::Integer(v as i64))
            .collect(),
    )
}

impl DegradeArgs {
    /// The flags that were given, as a TOML layer shaped like the config file.
    fn to_overlay(&self) -> toml::Value {
        let mut root = toml::Table::new();
        let adjust = Some("adjust");
        let noise = Some("noise");
        let filters = Some("filters");
        let geometry = Some("geometry");

        let floats = [
            (adjust, "saturation", self.saturation),
            (adjust, "brightness", self.brightness),
            (adjust, "contrast", self.contrast),
            (adjust, "sharpness", self.sharpness),
            (noise, "simple", self.simple_noise),
            (noise, "complex", self.complex_noise),
            (filters, "blur", self.blur),
            (filters, "edge_detection", self.edge_detection),
            (geometry, "rotate", self.rotate),
        ];
        for (section, key, value) in floats {
            if let Some(v) = value {
                put(&mut root, section, key, float(v));
            }
        }

        if let Some(mode) = self.complex_noise_mode {
            put(&mut root, noise, "complex_mode", mode.to_string().into());
        }
        if self.remove_black_borders {
            put(&mut root, filters, "remove_black_borders", true.into());
        }
        if let Some(b) = self.crop {
            put(&mut root, geometry, "crop", ints(&[b.left, b.top, b.right, b.bottom]));
        }
        if self.expand {
            put(&mut root, geometry, "expand", true.into());
        }
        if let Some([w, h]) = self.resize {
            put(&mut root, geometry, "resize", ints(&[w, h]));
        }
        if let Some(factor) = self.scale {
            put(&mut root, geometry, "scale", float(factor));
        }
        if let Some(seed) = self.seed {
            put(&mut root, None, "seed", toml::Value::Integer(seed));
        }

        if let Some(dir) = &self.output_dir {
            let dir = toml::Value::String(dir.to_string_lossy().into_owned());
            put(&mut root, None, "output_dir", dir);
        }
        if let Some(format) = &self.format {
            put(&mut root, None, "output_format", format.as_str().into());
        }
        if let Some(quality) = self.quality {
            put(&mut root, None, "quality", toml::Value::Integer(quality as i64));
        }
        if let Some(prefix) = &self.prefix {
            put(&mut root, None, "prefix", prefix.as_str().into());
        }
        if let Some(suffix) = &self.suffix {
            put(&mut root, None, "suffix", suffix.as_str().into());
        }
        toml::Value::Table(root)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Degrade { image, options } => {
            logging::init(cli.verbose, cli.json_logs);
            let config = config::load_layered(cli.config.as_deref(), Some(options.to_overlay()))?;
            let written = pipeline::degrade_image(&image, &config, &TracingReporter)?;
            println!("{}", written.display());
        }
        Command::Batch {
            dir,
            options,
            report,
        } => {
            logging::init(cli.verbose, cli.json_logs);
            let config = config::load_layered(cli.config.as_deref(), Some(options.to_overlay()))?;
            let result = pipeline::batch_degrade(&dir, &config, &TracingReporter)?;
            output::print_batch_summary(&result);
            if let Some(path) = report {
                let json = serde_json::to_string_pretty(&result)?;
                std::fs::write(&path, json)?;
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
