//! genrecat CLI - Group audio files by genre and build playlists

mod cli;
mod commands;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use cli::{ Args, Commands };
use genrecat_core::{ DirectoryScanner, GenreExtractor, ScanOptions };


/// Sets up logging on stderr so stdout only carries command output.
fn init_logging( args: &Args ) {
    let level = if args.quiet {
        Level::ERROR
    } else {
        match args.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level( level )
        .with_writer( io::stderr )
        .with_target( false )
        .without_time()
        .init();
}


fn main() -> Result<()> {
    let args = Args::parse();
    init_logging( &args );

    let scanner = DirectoryScanner::with_options( ScanOptions {
        ignore_case: args.ignore_case,
        ..ScanOptions::default()
    });
    let extractor = GenreExtractor::new();
    let mut stdout = io::stdout().lock();

    match &args.command {
        Commands::Scan { directory } => {
            commands::scan( directory, &scanner, &extractor, &mut stdout )?;
        }
        Commands::CreatePlaylist( cmd ) => {
            commands::create_playlist(
                &cmd.directory,
                &cmd.genre,
                &cmd.playlist_name,
                &scanner,
                &extractor,
                &mut stdout,
            )?;
        }
    }

    Ok(())
}
