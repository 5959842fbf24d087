use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use scrollcut::{CutMode, PaginateError, PaginationConfig, PaperSize, RenderMode};
use std::path::{Path, PathBuf};

const PREVIEW_MAX_HEIGHT: u32 = 4000;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    A4,
    A3,
    B5,
    /// Use --page-height-mm
    Custom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Pdf,
    Png,
}

#[derive(Parser)]
#[command(name = "scrollcut", about = "Cut tall images into pages without slicing through text")]
struct Cli {
    /// Input images (PNG, JPEG, BMP, ...)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output PDF file or PNG directory (single input only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Paper format [default: a4, or the preset's paper with --config]
    #[arg(short = 'f', long, value_enum)]
    format: Option<Format>,

    /// Page height in mm for --format custom
    #[arg(long)]
    page_height_mm: Option<f64>,

    /// Print resolution
    #[arg(short = 'd', long, default_value = "300")]
    dpi: u32,

    /// Allowed page-height deviation as a fraction of the target
    #[arg(long)]
    window_frac: Option<f64>,

    /// Shortest blank run (rows) treated as a gap
    #[arg(long)]
    min_gap: Option<usize>,

    /// Boxcar radius for the smoothed profile (0 = off)
    #[arg(long)]
    smoothing_radius: Option<usize>,

    /// Band height for bridge candidates
    #[arg(long)]
    band_size: Option<usize>,

    /// Cut placement strategy
    #[arg(long, value_enum)]
    cut_mode: Option<CutMode>,

    /// Snap search radius for fixed-height-snap mode
    #[arg(long)]
    snap_px: Option<usize>,

    /// How short pages are emitted
    #[arg(long = "render", value_enum)]
    render_mode: Option<RenderMode>,

    /// Output container
    #[arg(long, value_enum, default_value = "pdf")]
    output_format: OutputFormat,

    /// JSON preset; command-line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write cut diagnostics next to the output as <stem>_cuts.json
    #[arg(long)]
    debug_json: bool,

    /// Write <stem>_preview.png with the cut rows marked
    #[arg(long)]
    preview: bool,
}

impl Cli {
    fn build_config(&self) -> Result<PaginationConfig, PaginateError> {
        let mut config = match &self.config {
            Some(path) => PaginationConfig::from_json_file(path)?,
            None => PaginationConfig::default(),
        };

        let paper = match self.format {
            Some(Format::A4) => Some(PaperSize::A4),
            Some(Format::A3) => Some(PaperSize::A3),
            Some(Format::B5) => Some(PaperSize::B5),
            Some(Format::Custom) => {
                let height_mm = self.page_height_mm.ok_or_else(|| {
                    PaginateError::InvalidConfig(
                        "--format custom requires --page-height-mm".into(),
                    )
                })?;
                // Pages keep the source width; only the height is used.
                Some(PaperSize::Custom { width_mm: 210.0, height_mm })
            }
            None => None,
        };
        if let Some(paper) = paper {
            config.page.paper = paper;
        }
        config.page.dpi = self.dpi;
        config.cuts.target_height = config.page.paper.target_height_px(self.dpi);

        let c = &mut config.cuts;
        if let Some(v) = self.window_frac {
            c.window_frac = v;
        }
        if let Some(v) = self.min_gap {
            c.min_gap_rows = v;
        }
        if let Some(v) = self.smoothing_radius {
            c.smoothing_radius = v;
        }
        if let Some(v) = self.band_size {
            c.band_size = v;
        }
        if let Some(v) = self.cut_mode {
            c.cut_mode = v;
        }
        if let Some(v) = self.snap_px {
            c.snap_px = v;
        }
        if let Some(v) = self.render_mode {
            config.page.render_mode = v;
        }
        config.cuts.return_debug_info = self.debug_json;

        config.validate()?;
        Ok(config)
    }

    fn output_for(&self, input: &Path) -> PathBuf {
        if let Some(out) = &self.output {
            return out.clone();
        }
        let stem = file_stem(input);
        let dir = input.parent().unwrap_or_else(|| Path::new("."));
        match self.output_format {
            OutputFormat::Pdf => dir.join(format!("{}_paginated.pdf", stem)),
            OutputFormat::Png => dir.join(format!("{}_pages", stem)),
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

/// Paginate one input and write every requested artifact.
fn run_one(cli: &Cli, input: &Path, config: &PaginationConfig) -> Result<PathBuf, PaginateError> {
    let img = scrollcut::load_image(input)?;
    let result = scrollcut::paginate_image(&img, config)?;
    let output = cli.output_for(input);
    let stem = file_stem(input);
    let side_dir = match cli.output_format {
        OutputFormat::Pdf => output.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
        OutputFormat::Png => output.clone(),
    };

    match cli.output_format {
        OutputFormat::Pdf => {
            scrollcut::render::write_pdf(&result.pages, &output, config.page.dpi)?;
        }
        OutputFormat::Png => {
            scrollcut::render::write_png_pages(&result.pages, &output, &stem)?;
        }
    }

    if let Some(diag) = &result.plan.diagnostics {
        log::info!("Debug       {}", diag);
        std::fs::create_dir_all(&side_dir)?;
        std::fs::write(side_dir.join(format!("{}_cuts.json", stem)), diag.to_json_pretty()?)?;
    }
    if cli.preview {
        std::fs::create_dir_all(&side_dir)?;
        scrollcut::render::render_preview(
            &img,
            &result.plan.cuts,
            result.plan.used_fallback(),
            &side_dir.join(format!("{}_preview.png", stem)),
            PREVIEW_MAX_HEIGHT,
        )?;
    }

    Ok(output)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.output.is_some() && cli.inputs.len() > 1 {
        return Err("--output can only be used with a single input".into());
    }
    let config = cli.build_config()?;

    eprintln!();
    eprintln!(
        "  scrollcut \u{00b7} {} input{} \u{00b7} target {} px @ {} dpi",
        cli.inputs.len(),
        if cli.inputs.len() == 1 { "" } else { "s" },
        config.cuts.target_height,
        config.page.dpi,
    );
    eprintln!();

    let results: Vec<(PathBuf, Result<PathBuf, String>)> = cli
        .inputs
        .par_iter()
        .map(|input| {
            let outcome = run_one(&cli, input, &config).map_err(|e| e.to_string());
            (input.clone(), outcome)
        })
        .collect();

    let mut failed = 0usize;
    eprintln!();
    for (input, outcome) in &results {
        match outcome {
            Ok(out) => eprintln!("  \u{2713} {}", out.display()),
            Err(e) => {
                failed += 1;
                eprintln!("  \u{2717} {}: {}", input.display(), e);
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} inputs failed", failed, results.len()).into());
    }
    Ok(())
}
