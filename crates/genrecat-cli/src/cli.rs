//! Command-line argument parsing for genrecat.

use std::path::PathBuf;

use clap::{ Args as ClapArgs, Parser, Subcommand };


/// Playlist file written when `--playlist-name` is not given.
pub const DEFAULT_PLAYLIST_NAME: &str = "playlist.m3u";


/// genrecat - Song categorization and playlist creation.
#[derive( Parser, Debug )]
#[command( name = "genrecat" )]
#[command( version, about, long_about = None )]
pub struct Args {
    /// Increase log output (-v for info, -vv for debug).
    #[arg( short, long, action = clap::ArgAction::Count, global = true )]
    pub verbose: u8,

    /// Only log errors; hides per-file read diagnostics.
    #[arg( short, long, global = true, conflicts_with = "verbose" )]
    pub quiet: bool,

    /// Match audio extensions regardless of case (e.g. `.MP3`).
    #[arg( long, global = true )]
    pub ignore_case: bool,

    #[command( subcommand )]
    pub command: Commands,
}


/// Available subcommands.
#[derive( Subcommand, Debug )]
pub enum Commands {
    /// Scan a directory for audio files.
    Scan {
        /// Directory to scan recursively.
        directory: PathBuf,
    },

    /// Create a playlist based on a genre.
    CreatePlaylist( CreatePlaylistArgs ),
}


/// Arguments for `create-playlist`.
#[derive( ClapArgs, Debug )]
pub struct CreatePlaylistArgs {
    /// Directory to scan recursively.
    pub directory: PathBuf,

    /// Genre to collect, matched exactly.
    pub genre: String,

    /// Name of the playlist file.
    #[arg( long, default_value = DEFAULT_PLAYLIST_NAME )]
    pub playlist_name: PathBuf,
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_parse_scan() {
        let args = Args::try_parse_from([ "genrecat", "scan", "/music" ]).unwrap();
        assert!( matches!( args.command, Commands::Scan { directory } if directory == PathBuf::from( "/music" ) ) );
        assert_eq!( args.verbose, 0 );
        assert!( !args.ignore_case );
    }


    #[test]
    fn test_parse_create_playlist_default_name() {
        let args = Args::try_parse_from([ "genrecat", "create-playlist", "/music", "Rock" ]).unwrap();
        let Commands::CreatePlaylist( cmd ) = args.command else {
            panic!( "expected create-playlist" );
        };
        assert_eq!( cmd.directory, PathBuf::from( "/music" ) );
        assert_eq!( cmd.genre, "Rock" );
        assert_eq!( cmd.playlist_name, PathBuf::from( "playlist.m3u" ) );
    }


    #[test]
    fn test_parse_create_playlist_custom_name() {
        let args = Args::try_parse_from([
            "genrecat", "-vv", "create-playlist", "/music", "Hip Hop", "--playlist-name", "hh.m3u", "--ignore-case",
        ]).unwrap();
        assert_eq!( args.verbose, 2 );
        assert!( args.ignore_case );
        let Commands::CreatePlaylist( cmd ) = args.command else {
            panic!( "expected create-playlist" );
        };
        assert_eq!( cmd.genre, "Hip Hop" );
        assert_eq!( cmd.playlist_name, PathBuf::from( "hh.m3u" ) );
    }


    #[test]
    fn test_parse_missing_genre() {
        assert!( Args::try_parse_from([ "genrecat", "create-playlist", "/music" ]).is_err() );
    }


    #[test]
    fn test_parse_quiet_conflicts_with_verbose() {
        assert!( Args::try_parse_from([ "genrecat", "-q", "-v", "scan", "." ]).is_err() );
    }
}
