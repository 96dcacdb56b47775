// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Reads lines until end of input (`Ctrl+D` on an empty line) and echoes each one back.
//!
//! ```sh
//! cargo run --bin line_editor_demo -- --history-db /tmp/line_editor_history -l
//! ```

use clap::Parser;
use line_editor::{DEFAULT_LOG_FILE, Editor, EditorConfig, LineRead, TracingConfig};
use tracing_core::LevelFilter;

use crate::clap_config::CLIArgs;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli_args = CLIArgs::parse();

    let mut config = match &cli_args.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    if let Some(path) = cli_args.history_db {
        config.history_store_path = Some(path);
    }
    if let Some(log_file) = cli_args.log_file {
        config.log_file = Some(log_file);
    }

    // The terminal belongs to the editor, so logs only ever go to a file.
    if cli_args.enable_logging || config.log_file.is_some() {
        let level_filter = config.level_filter_or(LevelFilter::DEBUG)?;
        let log_file = config
            .log_file
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
        TracingConfig::new_file(Some(log_file), level_filter).install_global()?;
    }

    let mut editor = Editor::builder()
        .with_config(&config)?
        .with_rprompt(Box::new(current_dir_for_rprompt))
        .build()?;

    let mut count = 0_usize;
    loop {
        match editor.read_line().await {
            LineRead::Line(line) => {
                count += 1;
                println!("[{count}] {line}");
            }
            LineRead::Eof => break,
            LineRead::Err(err) => {
                eprintln!("{:?}", miette::Report::new(err));
                break;
            }
        }
    }

    tracing::info!(message = "demo done", lines_read = count);
    Ok(())
}

fn current_dir_for_rprompt() -> String {
    std::env::current_dir()
        .map(|it| it.display().to_string())
        .unwrap_or_default()
}

mod clap_config {
    use clap::Parser;
    use std::path::PathBuf;

    /// More info: <https://docs.rs/clap/latest/clap/_derive/_tutorial/chapter_2/index.html>
    #[derive(Debug, Parser)]
    #[command(bin_name = "line_editor_demo")]
    #[command(about = "Type lines, get them echoed back. Ctrl+D on an empty line quits.")]
    #[command(version)]
    #[command(next_line_help = true)]
    #[command(arg_required_else_help(false))]
    pub struct CLIArgs {
        #[arg(long, short = 'c', help = "JSON config file with history, log and key binding settings.")]
        pub config: Option<PathBuf>,

        #[arg(long, help = "Folder of the persistent history store. Overrides the config file.")]
        pub history_db: Option<PathBuf>,

        #[arg(long, help = "Log to this file. Overrides the config file.")]
        pub log_file: Option<String>,

        #[arg(
            long,
            short = 'l',
            help = "Log to a file (the one named in the config, or `line_editor_log.txt`) for debugging."
        )]
        pub enable_logging: bool,
    }
}
