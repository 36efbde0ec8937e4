use std::fs;
use std::path::{Path, PathBuf};

use apngkit::logger::Logger;
use apngkit::{assemble_files, Apng, ApngInfo, AssemblerOptions, Player};
use clap::{Parser, Subcommand};
use glob::glob;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[clap(name = "apngkit", about = "Inspect, build and render animated PNG files")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the chunks of a PNG or APNG file
    Info { path: PathBuf },

    /// Assemble an animation from still images matching a glob pattern
    Build {
        pattern: String,

        #[arg(short, long, help = "Output file")]
        output: PathBuf,

        #[arg(long, help = "Store every frame at full size")]
        no_optimize: bool,
    },

    /// Render every composited frame as a separate PNG
    Frames {
        path: PathBuf,

        #[arg(short = 'o', long = "output-dir", help = "Output directory for rendered frames")]
        output_dir: PathBuf,
    },

    /// Load a file and write it back in canonical chunk order
    Rewrite { input: PathBuf, output: PathBuf },
}

fn get_files(pattern: &str) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let absolute_pattern = if Path::new(pattern).is_relative() {
        base_dir.join(pattern).to_string_lossy().into_owned()
    } else {
        pattern.to_string()
    };

    let mut files = Vec::new();
    for entry in glob(&absolute_pattern)? {
        match entry {
            Ok(path) => {
                if !path.is_file() {
                    continue;
                }

                files.push(path);
            }
            Err(e) => log::warn!("{}", e),
        }
    }

    files.sort();

    Ok(files)
}

fn render_frames(path: &Path, output_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let apng = Apng::open(path)?;
    let stem = path
        .file_stem()
        .ok_or("Invalid file name")?
        .to_string_lossy()
        .into_owned();

    if !output_dir.exists() {
        fs::create_dir_all(output_dir)?;
    }

    for (index, frame) in Player::new(&apng).enumerate() {
        let frame = frame?;
        let output_path = output_dir.join(format!("{}_frame_{}.png", stem, index));

        frame.image.save(&output_path)?;
        log::info!("Wrote {} ({} ms)", output_path.display(), frame.delay_ms);
    }

    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Info { path } => {
            let apng = Apng::open(&path)?;
            println!("File: {}", path.display());
            print!("{}", ApngInfo(&apng));
        }
        Command::Build { pattern, output, no_optimize } => {
            let files = get_files(&pattern)?;
            log::info!("Found {} input images", files.len());

            let options = AssemblerOptions { optimize: !no_optimize };
            match assemble_files(&files, options)? {
                Some(apng) => {
                    apng.save(&output)?;
                    log::info!("Wrote {} frames to {}", apng.frame_count(), output.display());
                }
                None => return Err(format!("No files match {}", pattern).into()),
            }
        }
        Command::Frames { path, output_dir } => render_frames(&path, &output_dir)?,
        Command::Rewrite { input, output } => {
            let apng = Apng::open(&input)?;
            apng.save(&output)?;
            log::info!("Wrote {}", output.display());
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    if let Err(e) = Logger::init(level) {
        eprintln!("Failed to install logger: {}", e);
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
