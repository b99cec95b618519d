//! Directory scanning
//!
//! Walks a directory tree and collects every file whose name ends with a
//! recognized audio extension.

use std::path::{ Path, PathBuf };

use thiserror::Error;


/// Audio file extensions recognized by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &[ "mp3", "wav", "flac" ];


/// Errors that can occur while scanning a directory.
#[derive( Debug, Error )]
pub enum ScanError {
    #[error( "IO error: {0}" )]
    Io( #[from] std::io::Error ),

    #[error( "Path not found: {0}" )]
    NotFound( PathBuf ),
}


/// Options controlling which files the scanner picks up.
#[derive( Debug, Clone )]
pub struct ScanOptions {
    /// Extensions without the leading dot.
    pub extensions: Vec<String>,

    /// Match extensions regardless of case (`.MP3` matches `mp3`).
    pub ignore_case: bool,
}


impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map( |e| e.to_string() ).collect(),
            ignore_case: false,
        }
    }
}


/// Recursive scanner for audio files.
#[derive( Debug, Clone, Default )]
pub struct DirectoryScanner {
    options: ScanOptions,
}


impl DirectoryScanner {
    /// Creates a scanner with the default extension set.
    pub fn new() -> Self {
        Self::default()
    }


    /// Creates a scanner with custom options.
    pub fn with_options( options: ScanOptions ) -> Self {
        Self { options }
    }


    /// Scans `dir` recursively and returns the audio files found.
    ///
    /// Paths are returned in the order the filesystem yields them.
    /// Fails if `dir` itself is missing or unreadable.
    pub fn scan( &self, dir: &Path ) -> Result<Vec<PathBuf>, ScanError> {
        tracing::info!( "Scanning: {:?}", dir );

        let entries = match std::fs::read_dir( dir ) {
            Ok( e ) => e,
            Err( e ) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err( ScanError::NotFound( dir.to_path_buf() ) );
            }
            Err( e ) => return Err( ScanError::Io( e ) ),
        };

        let mut files = Vec::new();
        self.collect( entries, &mut files )?;

        tracing::info!( "Found {} audio files", files.len() );
        Ok( files )
    }


    fn scan_recursive( &self, dir: &Path, files: &mut Vec<PathBuf> ) -> Result<(), ScanError> {
        let entries = match std::fs::read_dir( dir ) {
            Ok( e ) => e,
            Err( e ) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                tracing::warn!( "Access denied: {:?}", dir );
                return Ok(()); // Skip inaccessible subdirectories
            }
            Err( e ) => return Err( ScanError::Io( e ) ),
        };

        self.collect( entries, files )
    }


    fn collect( &self, entries: std::fs::ReadDir, files: &mut Vec<PathBuf> ) -> Result<(), ScanError> {
        for entry in entries {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let path = entry.path();

            if file_type.is_dir() {
                self.scan_recursive( &path, files )?;
            } else if file_type.is_symlink() && path.is_dir() {
                // Symlinked directories are listed but never descended into
                tracing::debug!( "Not following directory link: {:?}", path );
            } else if self.is_audio_file( &path ) {
                tracing::debug!( "Found audio file: {:?}", path );
                files.push( path );
            }
        }

        Ok(())
    }


    /// Checks whether the file name ends with one of the configured extensions.
    ///
    /// Matches on the raw name bytes, so names that are not valid UTF-8
    /// are still recognized.
    pub fn is_audio_file( &self, path: &Path ) -> bool {
        let Some( name ) = path.file_name() else {
            return false;
        };
        let name = name.as_encoded_bytes();

        self.options.extensions.iter().any( |ext| {
            let suffix = format!( ".{}", ext );
            let suffix = suffix.as_bytes();
            if name.len() < suffix.len() {
                return false;
            }

            let tail = &name[name.len() - suffix.len()..];
            if self.options.ignore_case {
                tail.eq_ignore_ascii_case( suffix )
            } else {
                tail == suffix
            }
        })
    }
}


/// Scans `dir` with the default options.
pub fn scan_directory( dir: &Path ) -> Result<Vec<PathBuf>, ScanError> {
    DirectoryScanner::new().scan( dir )
}


#[cfg( test )]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::fs;


    fn touch( path: &Path ) {
        if let Some( parent ) = path.parent() {
            fs::create_dir_all( parent ).unwrap();
        }
        fs::write( path, b"" ).unwrap();
    }


    #[test]
    fn test_scan_finds_audio_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch( &root.join( "a.mp3" ) );
        touch( &root.join( "b.flac" ) );
        touch( &root.join( "nested/deeper/c.wav" ) );
        touch( &root.join( "nested/d.txt" ) );
        touch( &root.join( "cover.jpg" ) );

        let found: HashSet<PathBuf> = scan_directory( root ).unwrap().into_iter().collect();
        let expected: HashSet<PathBuf> = [
            root.join( "a.mp3" ),
            root.join( "b.flac" ),
            root.join( "nested/deeper/c.wav" ),
        ].into_iter().collect();

        assert_eq!( found, expected );
    }


    #[test]
    fn test_scan_is_case_sensitive_by_default() {
        let dir = tempfile::tempdir().unwrap();
        touch( &dir.path().join( "LOUD.MP3" ) );
        touch( &dir.path().join( "quiet.mp3" ) );

        let found = scan_directory( dir.path() ).unwrap();
        assert_eq!( found, vec![ dir.path().join( "quiet.mp3" ) ] );
    }


    #[test]
    fn test_scan_ignore_case() {
        let dir = tempfile::tempdir().unwrap();
        touch( &dir.path().join( "LOUD.MP3" ) );

        let scanner = DirectoryScanner::with_options( ScanOptions {
            ignore_case: true,
            ..ScanOptions::default()
        });
        let found = scanner.scan( dir.path() ).unwrap();
        assert_eq!( found, vec![ dir.path().join( "LOUD.MP3" ) ] );
    }


    #[test]
    fn test_scan_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!( scan_directory( dir.path() ).unwrap().is_empty() );
    }


    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join( "nope" );

        let result = scan_directory( &missing );
        assert!( matches!( result, Err( ScanError::NotFound( p ) ) if p == missing ) );
    }


    #[test]
    fn test_scan_file_instead_of_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join( "song.mp3" );
        touch( &file );

        assert!( scan_directory( &file ).is_err() );
    }


    #[cfg( target_os = "linux" )]
    #[test]
    fn test_scan_keeps_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join( OsStr::from_bytes( b"caf\xe9.mp3" ) );
        touch( &file );

        assert_eq!( scan_directory( dir.path() ).unwrap(), vec![ file ] );
    }


    #[cfg( unix )]
    #[test]
    fn test_scan_does_not_follow_directory_links() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch( &root.join( "sub/a.mp3" ) );
        symlink( "..", root.join( "sub/loop" ) ).unwrap();
        symlink( "sub/a.mp3", root.join( "alias.mp3" ) ).unwrap();

        let mut found = scan_directory( root ).unwrap();
        found.sort();
        assert_eq!( found, vec![ root.join( "alias.mp3" ), root.join( "sub/a.mp3" ) ] );
    }


    #[test]
    fn test_is_audio_file_requires_dot_suffix() {
        let scanner = DirectoryScanner::new();
        assert!( scanner.is_audio_file( Path::new( "/music/track.flac" ) ) );
        assert!( !scanner.is_audio_file( Path::new( "/music/trackmp3" ) ) );
        assert!( !scanner.is_audio_file( Path::new( "/music/track.mp3.bak" ) ) );
        assert!( !scanner.is_audio_file( Path::new( "mp3" ) ) );
    }
}
