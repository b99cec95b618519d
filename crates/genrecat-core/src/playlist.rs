//! Playlist writing
//!
//! Writes one genre's files to a plain M3U file: one path per line, no
//! header and no extended directives.

use std::fs::File;
use std::io::{ BufWriter, Write };
use std::path::Path;

use thiserror::Error;

use crate::catalog::Catalog;


/// Errors that can occur with playlist operations.
#[derive( Debug, Error )]
pub enum PlaylistError {
    #[error( "IO error: {0}" )]
    Io( #[from] std::io::Error ),
}


/// Result of a playlist write.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum PlaylistOutcome {
    /// The playlist was written with this many entries.
    Written( usize ),

    /// The genre was not in the catalog; nothing was written.
    NoSongs,
}


/// Writes the files of `genre` to `path`, replacing any existing file.
///
/// Each entry is written as the path's raw OS bytes, so names that are not
/// valid UTF-8 survive unchanged. If the catalog has no such genre, `path`
/// is left untouched.
pub fn write_playlist(
    genre: &str,
    catalog: &Catalog,
    path: &Path,
) -> Result<PlaylistOutcome, PlaylistError> {
    let Some( tracks ) = catalog.get( genre ) else {
        tracing::debug!( "Genre {:?} not in catalog, skipping {:?}", genre, path );
        return Ok( PlaylistOutcome::NoSongs );
    };

    let mut writer = BufWriter::new( File::create( path )? );

    for track in tracks {
        // Write path as-is (relative paths stay relative)
        writer.write_all( track.as_os_str().as_encoded_bytes() )?;
        writer.write_all( b"\n" )?;
    }

    writer.flush()?;

    tracing::info!( "Wrote {} tracks to {:?}", tracks.len(), path );
    Ok( PlaylistOutcome::Written( tracks.len() ) )
}


#[cfg( test )]
mod tests {
    use super::*;

    use std::fs;
    use std::path::PathBuf;


    fn rock_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert( "Rock", PathBuf::from( "music/a.mp3" ) );
        catalog.insert( "Unknown", PathBuf::from( "music/c.wav" ) );
        catalog.insert( "Rock", PathBuf::from( "music/sub/b.flac" ) );
        catalog
    }


    #[test]
    fn test_write_playlist_lines_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join( "rock.m3u" );

        let outcome = write_playlist( "Rock", &rock_catalog(), &out ).unwrap();

        assert_eq!( outcome, PlaylistOutcome::Written( 2 ) );
        assert_eq!( fs::read_to_string( &out ).unwrap(), "music/a.mp3\nmusic/sub/b.flac\n" );
    }


    #[test]
    fn test_write_playlist_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join( "playlist.m3u" );
        fs::write( &out, "old line 1\nold line 2\nold line 3\nold line 4\n" ).unwrap();

        write_playlist( "Unknown", &rock_catalog(), &out ).unwrap();

        assert_eq!( fs::read_to_string( &out ).unwrap(), "music/c.wav\n" );
    }


    #[test]
    fn test_write_playlist_missing_genre_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join( "jazz.m3u" );

        let outcome = write_playlist( "Jazz", &rock_catalog(), &out ).unwrap();

        assert_eq!( outcome, PlaylistOutcome::NoSongs );
        assert!( !out.exists() );
    }


    #[test]
    fn test_write_playlist_missing_genre_keeps_existing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join( "keep.m3u" );
        fs::write( &out, "keep me\n" ).unwrap();

        let outcome = write_playlist( "rock", &rock_catalog(), &out ).unwrap();

        assert_eq!( outcome, PlaylistOutcome::NoSongs );
        assert_eq!( fs::read_to_string( &out ).unwrap(), "keep me\n" );
    }


    #[cfg( target_os = "linux" )]
    #[test]
    fn test_write_playlist_keeps_non_utf8_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join( "raw.m3u" );
        let mut catalog = Catalog::new();
        catalog.insert( "Chanson", PathBuf::from( OsStr::from_bytes( b"music/caf\xe9.mp3" ) ) );

        write_playlist( "Chanson", &catalog, &out ).unwrap();

        assert_eq!( fs::read( &out ).unwrap(), b"music/caf\xe9.mp3\n" );
    }


    #[test]
    fn test_write_playlist_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join( "missing-dir" ).join( "rock.m3u" );

        let result = write_playlist( "Rock", &rock_catalog(), &out );
        assert!( matches!( result, Err( PlaylistError::Io( _ ) ) ) );
    }
}
