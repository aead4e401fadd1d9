//! Linerun - a modal terminal scratchpad that runs your code line by line.
//!
//! # Usage
//!
//! ```bash
//! linerun
//! linerun notes.py
//! linerun --lang js scratch.js
//! ```

use clap::Parser;

use anyhow::{Context, Result};

use linerun::app::App;
use linerun::config::{
    ConfigFlags, clear_config_flags, default_notes_dir, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use linerun::exec::{Language, ProcessRunner};
use linerun::storage::DirStore;

/// A modal terminal scratchpad that runs your code line by line
#[derive(Parser, Debug)]
#[command(name = "linerun", version, about, long_about = None)]
struct Cli {
    /// Buffer to open
    #[arg(value_name = "NAME", default_value = "scratch.py")]
    buffer: String,

    /// Directory where buffers are saved
    #[arg(long, value_name = "DIR")]
    notes_dir: Option<std::path::PathBuf>,

    /// Force the execution language (py or js), bypassing detection
    #[arg(long, value_name = "LANG")]
    lang: Option<Language>,

    /// Spaces inserted per Tab press
    #[arg(long, value_name = "N")]
    tab_width: Option<u8>,

    /// Save current command-line flags as defaults in .linerunrc
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in .linerunrc
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let notes_dir = effective.notes_dir.unwrap_or_else(default_notes_dir);
    let store = DirStore::new(notes_dir);

    // Run the application
    let mut app = App::new(cli.buffer, Box::new(store))
        .with_runner(Box::new(ProcessRunner::new(Language::Python)))
        .with_runner(Box::new(ProcessRunner::new(Language::JavaScript)))
        .with_lang(effective.lang)
        .with_tab_width(effective.tab_width.unwrap_or(4));

    app.run().context("Application error")
}
