//! hexgrid - Entry Point

use clap::{Parser, ValueEnum};
use hexgrid::config::ResolvedConfig;
use hexgrid::model::{AppError, ByteBuffer};
use hexgrid::session::ViewerSession;
use hexgrid::source::{self, PayloadEncoding};
use hexgrid::state::{layout, LayoutMetrics, LayoutState, Location, QueryMode, ViewerState};
use hexgrid::storage::FileStorage;
use hexgrid::view::{ColorConfig, StartupOptions};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Query mode accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Hex digit pairs
    Hex,
    /// Literal text
    Text,
    /// Byte offset
    Offset,
}

impl From<ModeArg> for QueryMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Hex => QueryMode::Hex,
            ModeArg::Text => QueryMode::Text,
            ModeArg::Offset => QueryMode::Offset,
        }
    }
}

/// hexgrid - terminal byte viewer with search, selection and folding
#[derive(Parser, Debug)]
#[command(name = "hexgrid")]
#[command(version)]
#[command(about = "Terminal byte viewer with incremental hex/text search, selection and folding")]
pub struct Args {
    /// File to view (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Treat the input as hex-encoded text instead of raw bytes
    #[arg(long)]
    pub hex_input: bool,

    /// Query mode to start in
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Start with search query active
    #[arg(short, long)]
    pub search: Option<String>,

    /// Shared location to open, e.g. "cursor=16&selectStart=4&selectEnd=9"
    #[arg(short, long)]
    pub location: Option<String>,

    /// Fixed number of byte columns (disables automatic columns)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub columns: Option<u16>,

    /// Base of offset labels and offset queries
    #[arg(long, value_parser = clap::value_parser!(u32).range(2..=36))]
    pub offset_base: Option<u32>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    fn encoding(&self) -> PayloadEncoding {
        if self.hex_input {
            PayloadEncoding::Hex
        } else {
            PayloadEncoding::Raw
        }
    }

    fn startup_options(&self) -> StartupOptions {
        StartupOptions {
            columns: self.columns.map(usize::from),
            location: self.location.as_deref().map(Location::parse),
            mode: self.mode.map(QueryMode::from),
            search: self.search.clone(),
        }
    }
}

/// Read the payload named on the command line.
fn load_payload(args: &Args) -> Result<ByteBuffer, AppError> {
    let input_source = source::detect_input_source(args.file.clone())?;
    Ok(source::load_buffer(&input_source, args.encoding())?)
}

/// First snapshot, laid out for terminal cells with the configured defaults.
fn initial_state(buffer: ByteBuffer, config: &ResolvedConfig) -> ViewerState {
    let mut metrics = LayoutMetrics::cells();
    if let Some(breakpoints) = &config.column_breakpoints {
        metrics = metrics.with_breakpoints(breakpoints.clone());
    }
    let layout = layout::set_offset_base(
        LayoutState::with_metrics(metrics),
        config.offset_base,
        buffer.len(),
    );
    let mut state = ViewerState::new(buffer, layout);
    state.history.max_size = config.history_max_size;
    state.history.show_last_value = config.show_history_last_value;
    state
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = hexgrid::config::load_config_with_precedence(args.config.clone())?;
        let merged = hexgrid::config::merge_config(config_file);
        let with_env = hexgrid::config::apply_env_overrides(merged);
        hexgrid::config::apply_cli_overrides(with_env, args.offset_base)
    };

    hexgrid::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let buffer = load_payload(&args)?;
    info!(len = buffer.len(), "Payload loaded");

    let state = initial_state(buffer, &config);
    let storage = FileStorage::new(config.storage_dir.clone());
    let mut session = ViewerSession::new(state, storage, config.search_debounce());
    session.start(Instant::now());

    hexgrid::view::run_with_session(
        session,
        config.glyphs,
        ColorConfig::from_env_and_args(args.no_color),
        args.startup_options(),
    )?;

    Ok(())
}
