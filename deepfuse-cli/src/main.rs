use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;

use deepfuse::{Options, PipelineOpts};

#[derive(Parser, Debug)]
#[command(name = "deepfuse", version, about = "Deep image compositor")]
struct Cli {
    /// Input layers followed by the output prefix. With --mod-offset the
    /// positional tokens alternate `path offset path offset ...`.
    #[arg(required = true, allow_negative_numbers = true)]
    inputs: Vec<String>,

    /// Write the merged deep layer (<prefix>_merged.json).
    #[arg(long)]
    deep_output: bool,

    /// Write the flattened EXR (<prefix>_flat.exr). On by default.
    #[arg(long, overrides_with = "no_flat_output")]
    flat_output: bool,

    /// Skip the flattened EXR.
    #[arg(long)]
    no_flat_output: bool,

    /// Write the PNG preview (<prefix>.png). On by default.
    #[arg(long, overrides_with = "no_png_output")]
    png_output: bool,

    /// Skip the PNG preview.
    #[arg(long)]
    no_png_output: bool,

    /// Read per-layer Z offsets from the positional list.
    #[arg(long)]
    mod_offset: bool,

    /// Depth epsilon for merging near-coincident samples.
    #[arg(long, default_value_t = 0.001)]
    merge_threshold: f32,

    /// Detailed logging.
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = build_options(&cli)?;
    if let Some(parent) = Path::new(&options.output_prefix).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let report = deepfuse::composite(&options, &PipelineOpts::default())?;
    for path in &report.written {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "deepfuse=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Split the positional token list into layer paths, optional per-layer Z
/// offsets and the trailing output prefix.
fn build_options(cli: &Cli) -> anyhow::Result<Options> {
    let mut files: Vec<PathBuf> = Vec::new();
    let mut offsets: Vec<f32> = Vec::new();

    for token in &cli.inputs {
        if cli.mod_offset
            && files.len() == offsets.len() + 1
            && let Ok(offset) = token.parse::<f32>()
        {
            offsets.push(offset);
            continue;
        }
        if cli.mod_offset && files.len() == offsets.len() + 1 {
            // The previous layer never got an offset token.
            offsets.push(0.0);
        }
        files.push(PathBuf::from(token));
    }

    let Some(prefix) = files.pop() else {
        anyhow::bail!("need at least one input layer and an output prefix");
    };
    if cli.mod_offset {
        offsets.truncate(files.len());
        offsets.resize(files.len(), 0.0);
    }

    Ok(Options {
        input_files: files,
        input_z_offsets: offsets,
        merge_threshold: cli.merge_threshold,
        deep_output: cli.deep_output,
        flat_output: !cli.no_flat_output,
        png_output: !cli.no_png_output,
        output_prefix: prefix.to_string_lossy().into_owned(),
        verbose: cli.verbose,
    })
}
