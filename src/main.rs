// this_file: src/main.rs
//! Framekit CLI - host for the batch frame compositor

use anyhow::{bail, Context, Result};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use framekit::{
    logging, BatchJob, EngineOptions, LocalSource, Request, Response, Worker,
};
use log::{info, warn};
use std::io::{self, Read, Write};

/// Framekit - crop photos under a shared frame and pack them into a ZIP
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Set log level (error, warn, info, debug, trace); debug builds default to debug
    #[arg(short = 'l', long, global = true, default_value = logging::default_level())]
    log_level: String,

    /// Enable quiet mode (only errors)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a start request and print protocol responses as JSON lines
    Process {
        #[command(flatten)]
        job: JobArgs,
    },

    /// Run a start request and save the archive to a file
    Export {
        #[command(flatten)]
        job: JobArgs,

        /// Archive path to write
        #[arg(short, long)]
        output: Utf8PathBuf,
    },

    /// Validate a start request without rendering
    Validate {
        /// Input file (uses stdin if not specified)
        #[arg(short, long)]
        input: Option<Utf8PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct JobArgs {
    /// Input file (uses stdin if not specified)
    #[arg(short, long)]
    input: Option<Utf8PathBuf>,

    /// Resolve relative references against this directory and refuse paths outside it
    #[arg(short, long)]
    base_dir: Option<Utf8PathBuf>,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = framekit::config::DEFAULT_JPEG_QUALITY)]
    quality: u8,

    /// Canvas background color (#rrggbb)
    #[arg(long, default_value = "#ffffff")]
    background: String,

    /// Resize filter (nearest, triangle, catmull-rom, lanczos3)
    #[arg(long, default_value = "triangle")]
    filter: String,
}

impl JobArgs {
    fn options(&self) -> Result<EngineOptions> {
        let options = EngineOptions::default()
            .with_jpeg_quality(self.quality)
            .with_background(self.background.parse()?)
            .with_filter(self.filter.parse()?);
        options.validate()?;
        Ok(options)
    }

    fn source(&self) -> LocalSource {
        match &self.base_dir {
            Some(dir) => LocalSource::with_base_dir(dir.clone()),
            None => LocalSource::new(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.quiet, true);

    match cli.command {
        Commands::Process { job } => process(&job),
        Commands::Export { job, output } => export(&job, &output),
        Commands::Validate { input } => validate(input.as_ref()),
        Commands::Version => {
            println!("framekit version {}", framekit::VERSION);
            println!("Batch frame compositor");
            Ok(())
        }
    }
}

/// Read a start request (or a bare job) from a file or stdin
fn read_job(input: Option<&Utf8PathBuf>) -> Result<BatchJob> {
    let json = match input {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    match Request::from_json(&json) {
        Ok(request) => Ok(request.into_job()),
        Err(request_err) => BatchJob::from_json(&json).with_context(|| {
            format!("input is neither a start request ({}) nor a job", request_err)
        }),
    }
}

fn spawn_worker(args: &JobArgs) -> Result<Worker> {
    let job = read_job(args.input.as_ref())?;
    info!("Processing {} photos", job.photos.len());

    let mut worker = Worker::spawn(args.source(), args.options()?)?;
    worker.start(job)?;
    Ok(worker)
}

/// Print every response as a JSON line on stdout
fn process(args: &JobArgs) -> Result<()> {
    let worker = spawn_worker(args)?;
    let stdout = io::stdout();
    let mut failure = None;

    for response in worker.responses() {
        let line = response.to_json_line()?;
        let mut out = stdout.lock();
        writeln!(out, "{}", line)?;
        out.flush()?;

        if let Response::Error { message } = response {
            failure = Some(message);
        }
    }
    worker.join()?;

    if let Some(message) = failure {
        bail!("job failed: {}", message);
    }
    Ok(())
}

/// Act as the host: log progress and write the archive
fn export(args: &JobArgs, output: &Utf8PathBuf) -> Result<()> {
    let worker = spawn_worker(args)?;
    let mut saved = false;

    for response in worker.responses() {
        match response {
            Response::Progress { current, total } => {
                info!("Rendering photo {}/{}", current, total);
            }
            Response::Complete { archive } => {
                std::fs::write(output, &archive)
                    .with_context(|| format!("writing archive to {}", output))?;
                info!("Wrote {} ({} bytes)", output, archive.len());
                saved = true;
            }
            Response::Error { message } => {
                bail!("job failed: {}", message);
            }
        }
    }
    worker.join()?;

    if !saved {
        warn!("Worker exited without a result");
        bail!("worker exited without a result");
    }
    Ok(())
}

/// Validate a start request
fn validate(input: Option<&Utf8PathBuf>) -> Result<()> {
    let job = read_job(input)?;
    match job.validate() {
        Ok(()) => {
            println!("✓ Valid job specification");
            println!("  Frame: {}", job.frame);
            println!("  Photos: {}", job.photos.len());
            Ok(())
        }
        Err(e) => {
            println!("✗ Invalid job specification: {}", e);
            Err(e.into())
        }
    }
}
