//! Command handlers.
//!
//! Each handler runs the full scan and categorize pipeline from scratch
//! and prints its report to `out`.

use std::io::Write;
use std::path::Path;

use anyhow::{ Context, Result };

use genrecat_core::{
    build_catalog, write_playlist, DirectoryScanner, GenreExtractor, PlaylistOutcome, TagReader,
};


/// Prints the number of songs per genre found under `directory`.
pub fn scan<R: TagReader>(
    directory: &Path,
    scanner: &DirectoryScanner,
    extractor: &GenreExtractor<R>,
    out: &mut impl Write,
) -> Result<()> {
    let catalog = build_catalog( directory, scanner, extractor )
        .with_context( || format!( "Failed to scan {}", directory.display() ) )?;

    for ( genre, songs ) in catalog.iter() {
        writeln!( out, "{}: {} songs found.", genre, songs.len() )?;
    }

    Ok(())
}


/// Writes the songs of `genre` under `directory` to `playlist_name`.
pub fn create_playlist<R: TagReader>(
    directory: &Path,
    genre: &str,
    playlist_name: &Path,
    scanner: &DirectoryScanner,
    extractor: &GenreExtractor<R>,
    out: &mut impl Write,
) -> Result<()> {
    let catalog = build_catalog( directory, scanner, extractor )
        .with_context( || format!( "Failed to scan {}", directory.display() ) )?;

    let outcome = write_playlist( genre, &catalog, playlist_name )
        .with_context( || format!( "Failed to write playlist {}", playlist_name.display() ) )?;

    match outcome {
        PlaylistOutcome::Written( count ) => {
            writeln!( out, "Playlist '{}' created with {} songs.", playlist_name.display(), count )?;
        }
        PlaylistOutcome::NoSongs => {
            writeln!( out, "No songs found for genre '{}'.", genre )?;
        }
    }

    Ok(())
}


#[cfg( test )]
mod tests {
    use super::*;

    use std::fs;

    use genrecat_core::{ Tag, TagError };


    /// Genres keyed by file name, standing in for real ID3/Vorbis tags.
    struct NamedReader;


    impl TagReader for NamedReader {
        fn read_tag( &self, path: &Path ) -> Result<Tag, TagError> {
            let genre = match path.file_name().and_then( |n| n.to_str() ) {
                Some( "a.mp3" ) | Some( "b.flac" ) => Some( "Rock".to_string() ),
                Some( "broken.mp3" ) => return Err( TagError::UnsupportedFormat( "no sync word".into() ) ),
                _ => None,
            };
            Ok( Tag { genre } )
        }
    }


    /// `a.mp3` and `b.flac` tagged Rock, `c.wav` untagged, `d.txt` ignored.
    fn library() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in [ "a.mp3", "b.flac", "c.wav", "d.txt" ] {
            fs::write( dir.path().join( name ), b"" ).unwrap();
        }
        dir
    }


    fn run_scan( dir: &Path ) -> Result<String> {
        let mut out = Vec::new();
        scan( dir, &DirectoryScanner::new(), &GenreExtractor::with_reader( NamedReader ), &mut out )?;
        Ok( String::from_utf8( out )? )
    }


    fn run_create( dir: &Path, genre: &str, playlist: &Path ) -> Result<String> {
        let mut out = Vec::new();
        create_playlist(
            dir,
            genre,
            playlist,
            &DirectoryScanner::new(),
            &GenreExtractor::with_reader( NamedReader ),
            &mut out,
        )?;
        Ok( String::from_utf8( out )? )
    }


    #[test]
    fn test_scan_reports_counts() {
        let dir = library();
        let output = run_scan( dir.path() ).unwrap();

        let mut lines: Vec<&str> = output.lines().collect();
        lines.sort();
        assert_eq!( lines, vec![ "Rock: 2 songs found.", "Unknown: 1 songs found." ] );
    }


    #[test]
    fn test_scan_unreadable_file_counts_as_unknown() {
        let dir = library();
        fs::write( dir.path().join( "broken.mp3" ), b"" ).unwrap();

        let output = run_scan( dir.path() ).unwrap();
        assert!( output.lines().any( |l| l == "Unknown: 2 songs found." ) );
    }


    #[test]
    fn test_scan_empty_directory_prints_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!( run_scan( dir.path() ).unwrap(), "" );
    }


    #[test]
    fn test_scan_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_scan( &dir.path().join( "nowhere" ) ).unwrap_err();
        assert!( err.to_string().starts_with( "Failed to scan" ) );
    }


    #[test]
    fn test_create_playlist_writes_genre() {
        let dir = library();
        let out_dir = tempfile::tempdir().unwrap();
        let playlist = out_dir.path().join( "playlist.m3u" );

        let output = run_create( dir.path(), "Rock", &playlist ).unwrap();

        assert_eq!( output, format!( "Playlist '{}' created with 2 songs.\n", playlist.display() ) );
        let contents = fs::read_to_string( &playlist ).unwrap();
        let mut lines: Vec<String> = contents.lines().map( String::from ).collect();
        lines.sort();
        assert_eq!( lines, vec![
            dir.path().join( "a.mp3" ).display().to_string(),
            dir.path().join( "b.flac" ).display().to_string(),
        ]);
    }


    #[test]
    fn test_create_playlist_unknown_genre_writes_nothing() {
        let dir = library();
        let out_dir = tempfile::tempdir().unwrap();
        let playlist = out_dir.path().join( "playlist.m3u" );

        let output = run_create( dir.path(), "Jazz", &playlist ).unwrap();

        assert_eq!( output, "No songs found for genre 'Jazz'.\n" );
        assert!( !playlist.exists() );
    }


    #[test]
    fn test_create_playlist_unwritable_output_fails() {
        let dir = library();
        let playlist = dir.path().join( "no-such-dir" ).join( "rock.m3u" );

        let err = run_create( dir.path(), "Rock", &playlist ).unwrap_err();
        assert!( err.to_string().starts_with( "Failed to write playlist" ) );
    }
}
