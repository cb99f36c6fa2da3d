//! Render segmentation overlays to PNG files, either from a saved
//! `/segment` response or by sending a FLAIR/T1CE pair to the backend.

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{ArgGroup, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use xccurate_client::{Client, ClientConfig, Upload};
use xccurate_overlay::{
    Dimensions, OverlayConfig, ProbabilityScale, ScaleFilter, SegmentationResult, SliceResult,
    VisualizationMode,
};

/// Render segmentation overlays to PNG files.
///
/// Writes one `slice-<index>-<mode>.png` per slice and mode into the
/// output directory.
#[derive(Parser, Debug)]
#[command(version)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "flair"])))]
struct Args {
    /// Saved `/segment` JSON response to render.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// FLAIR volume to segment through the backend.
    #[arg(long, value_name = "FILE", requires = "t1ce")]
    flair: Option<PathBuf>,

    /// T1CE volume to segment through the backend.
    #[arg(long, value_name = "FILE", requires = "flair")]
    t1ce: Option<PathBuf>,

    /// Backend base URL, used with --flair/--t1ce.
    #[arg(long, value_name = "URL", default_value = ClientConfig::DEFAULT_BASE_URL)]
    backend: String,

    /// Output directory. Created if missing.
    #[arg(short, long, value_name = "DIR")]
    output: PathBuf,

    /// Render only the slice with this `slice_index`.
    #[arg(long, value_name = "N")]
    slice: Option<u32>,

    /// Visualization modes to render (comma-separated). Defaults to all.
    #[arg(short, long, value_enum, value_delimiter = ',')]
    mode: Vec<ModeArg>,

    /// Full overlay configuration as JSON. Individual flags below
    /// override its fields.
    #[arg(long, value_name = "JSON")]
    config_json: Option<String>,

    /// Square output surface edge length in pixels.
    #[arg(long, value_name = "PX")]
    size: Option<u32>,

    /// Value domain of the probability rasters.
    #[arg(long, value_enum)]
    probability_scale: Option<ScaleArg>,

    /// Resampling filter used to stretch rasters to the surface.
    #[arg(long, value_enum)]
    filter: Option<FilterArg>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Combined,
    Core,
    Edema,
    Enhancing,
}

impl From<ModeArg> for VisualizationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Combined => Self::Combined,
            ModeArg::Core => Self::Core,
            ModeArg::Edema => Self::Edema,
            ModeArg::Enhancing => Self::Enhancing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScaleArg {
    /// Pixel values are percentages in 0..=100.
    Percent,
    /// Pixel values span 0..=255.
    Full,
}

impl From<ScaleArg> for ProbabilityScale {
    fn from(scale: ScaleArg) -> Self {
        match scale {
            ScaleArg::Percent => Self::Percent,
            ScaleArg::Full => Self::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FilterArg {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<FilterArg> for ScaleFilter {
    fn from(filter: FilterArg) -> Self {
        match filter {
            FilterArg::Nearest => Self::Nearest,
            FilterArg::Triangle => Self::Triangle,
            FilterArg::CatmullRom => Self::CatmullRom,
            FilterArg::Gaussian => Self::Gaussian,
            FilterArg::Lanczos3 => Self::Lanczos3,
        }
    }
}

impl Args {
    /// `--config-json` (or the default), with the individual flags applied
    /// on top.
    fn overlay_config(&self) -> anyhow::Result<OverlayConfig> {
        let mut config = match &self.config_json {
            Some(json) => serde_json::from_str(json).context("--config-json is not valid")?,
            None => OverlayConfig::default(),
        };
        if let Some(size) = self.size {
            config.surface = Dimensions::new(size, size);
        }
        if let Some(scale) = self.probability_scale {
            config.probability_scale = scale.into();
        }
        if let Some(filter) = self.filter {
            config.scale_filter = filter.into();
        }
        config.validate()?;
        Ok(config)
    }

    fn modes(&self) -> Vec<VisualizationMode> {
        if self.mode.is_empty() {
            VisualizationMode::ALL.to_vec()
        } else {
            self.mode.iter().copied().map(Into::into).collect()
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "xccurate=debug" } else { "xccurate=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_upload(path: &Path) -> anyhow::Result<Upload> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    Ok(Upload::new(file_name, bytes))
}

fn load_saved(path: &Path) -> anyhow::Result<SegmentationResult> {
    let json = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let slices: Vec<SliceResult> = serde_json::from_slice(&json)
        .with_context(|| format!("{} is not a segmentation response", path.display()))?;
    Ok(SegmentationResult::from_slices(slices)?)
}

fn segment_remote(backend: &str, flair: &Path, t1ce: &Path) -> anyhow::Result<SegmentationResult> {
    let flair = read_upload(flair)?;
    let t1ce = read_upload(t1ce)?;
    let client = Client::new(&ClientConfig::with_base_url(backend));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    tracing::info!(backend = client.base_url(), "segmenting");
    Ok(runtime.block_on(client.segment(flair, t1ce))?)
}

fn run(args: &Args) -> anyhow::Result<usize> {
    let config = args.overlay_config()?;
    let modes = args.modes();

    let result = match (&args.input, &args.flair, &args.t1ce) {
        (Some(input), _, _) => load_saved(input)?,
        (None, Some(flair), Some(t1ce)) => segment_remote(&args.backend, flair, t1ce)?,
        _ => bail!("pass --input, or both --flair and --t1ce"),
    };
    tracing::info!(slices = result.len(), "loaded segmentation result");

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    render::render_all(&result, args.slice, &modes, &config, &args.output)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(written) => {
            tracing::info!(written, output = %args.output.display(), "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("xccurate-render").chain(args.iter().copied()))
    }

    #[test]
    fn requires_a_source() {
        assert!(parse(&["--output", "out"]).is_err());
    }

    #[test]
    fn flair_requires_t1ce() {
        assert!(parse(&["--flair", "a.nii", "--output", "out"]).is_err());
        assert!(parse(&["--flair", "a.nii", "--t1ce", "b.nii", "--output", "out"]).is_ok());
    }

    #[test]
    fn input_and_volumes_conflict() {
        let args = ["--input", "r.json", "--flair", "a.nii", "--t1ce", "b.nii", "-o", "out"];
        assert!(parse(&args).is_err());
    }

    #[test]
    fn all_modes_by_default() {
        let args = parse(&["--input", "r.json", "-o", "out"]).unwrap();
        assert_eq!(args.modes(), VisualizationMode::ALL.to_vec());
        assert_eq!(args.backend, ClientConfig::DEFAULT_BASE_URL);
    }

    #[test]
    fn modes_are_comma_separated() {
        let args = parse(&["--input", "r.json", "-o", "out", "--mode", "core,edema"]).unwrap();
        assert_eq!(
            args.modes(),
            vec![VisualizationMode::Core, VisualizationMode::Edema]
        );
    }

    #[test]
    fn flags_override_config_json() {
        let json = r#"{"surface":{"width":64,"height":32},"probability_scale":"full"}"#;
        let args = parse(&[
            "--input",
            "r.json",
            "-o",
            "out",
            "--config-json",
            json,
            "--filter",
            "nearest",
        ])
        .unwrap();
        let config = args.overlay_config().unwrap();
        assert_eq!(config.surface, Dimensions::new(64, 32));
        assert_eq!(config.probability_scale, ProbabilityScale::Full);
        assert_eq!(config.scale_filter, ScaleFilter::Nearest);

        let args = parse(&["--input", "r.json", "-o", "out", "--size", "128"]).unwrap();
        let config = args.overlay_config().unwrap();
        assert_eq!(config.surface, Dimensions::new(128, 128));
        assert_eq!(config.probability_scale, ProbabilityScale::Percent);
    }

    #[test]
    fn zero_size_is_rejected() {
        let args = parse(&["--input", "r.json", "-o", "out", "--size", "0"]).unwrap();
        assert!(args.overlay_config().is_err());
    }

    #[test]
    fn malformed_config_json_is_rejected() {
        let args = parse(&["--input", "r.json", "-o", "out", "--config-json", "{"]).unwrap();
        assert!(args.overlay_config().is_err());
    }
}
