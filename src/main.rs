use clap::Parser;
use derdiedas::{
    app_dirs::{AppDirs, CONFIG_FILE, DEFAULT_WORDS_FILE, STATS_FILE},
    catalog::Catalog,
    config::{Config, ConfigStore, FileConfigStore},
    controller::App,
    display::{DisplayOptions, Screen},
    runtime::{ChannelInputSource, ExitReason},
    stats::FileStatsStore,
};
use rand::{rngs::StdRng, SeedableRng};
use std::{error::Error, io, path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

/// der/die/das article quiz with lifetime statistics
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Practice German noun genders from a JSON word list. Tracks lifetime accuracy and the words you miss most, and offers a practice mode that drills those words."
)]
pub struct Cli {
    /// word list to quiz from; retried under the data directory when missing
    #[clap(short = 'w', long, default_value = DEFAULT_WORDS_FILE)]
    words: PathBuf,

    /// directory holding stats.json and config.json
    #[clap(short = 'd', long)]
    data_dir: Option<PathBuf>,

    /// disable colored output
    #[clap(long)]
    no_color: bool,

    /// seed for question shuffling, for reproducible runs
    #[clap(long)]
    seed: Option<u64>,

    /// write the effective configuration to config.json and exit
    #[clap(long)]
    init_config: bool,
}

impl Cli {
    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(AppDirs::data_dir)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing();

    let data_dir = cli.data_dir();
    let config_store = FileConfigStore::with_path(data_dir.join(CONFIG_FILE));
    let config: Config = config_store.load();

    if cli.init_config {
        config_store.save(&config)?;
        println!("Wrote {}", config_store.path().display());
        return Ok(ExitCode::SUCCESS);
    }

    let options = DisplayOptions::detect(config.color && !cli.no_color);

    let catalog = match Catalog::load(&cli.words, Some(&data_dir)) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error loading words: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };
    tracing::debug!(words = catalog.len(), version = catalog.version(), "word list loaded");

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut app = App::new(
        catalog,
        FileStatsStore::with_path(data_dir.join(STATS_FILE)),
        config,
        ChannelInputSource::spawn(),
        Screen::new(io::stdout(), options),
        rng,
    );

    let reason = match app.run() {
        Ok(reason) => reason,
        Err(e) => {
            tracing::error!("terminal output failed: {e}");
            ExitReason::InputClosed
        }
    };

    if let Err(e) = app.finalize(reason) {
        tracing::error!("could not save stats: {e}");
    }

    Ok(ExitCode::SUCCESS)
}
