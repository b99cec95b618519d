//! Scan-then-categorize pipeline shared by every command.

use std::path::Path;

use crate::catalog::{ categorize, Catalog };
use crate::scanner::{ DirectoryScanner, ScanError };
use crate::tags::{ GenreExtractor, TagReader };


/// Scans `dir` and groups every audio file found by genre.
///
/// Only directory errors fail the pipeline; unreadable files end up
/// under the unknown genre.
pub fn build_catalog<R: TagReader>(
    dir: &Path,
    scanner: &DirectoryScanner,
    extractor: &GenreExtractor<R>,
) -> Result<Catalog, ScanError> {
    let files = scanner.scan( dir )?;
    Ok( categorize( &files, extractor ) )
}


#[cfg( test )]
mod tests {
    use super::*;

    use std::fs;
    use std::path::PathBuf;

    use crate::catalog::UNKNOWN_GENRE;
    use crate::tags::{ Tag, TagError };


    /// Treats file contents as the genre tag; `!` marks an unreadable file.
    struct ContentsReader;


    impl TagReader for ContentsReader {
        fn read_tag( &self, path: &Path ) -> Result<Tag, TagError> {
            let contents = fs::read_to_string( path )?;
            match contents.as_str() {
                "!" => Err( TagError::Read( "bad header".into() ) ),
                "" => Ok( Tag::default() ),
                genre => Ok( Tag { genre: Some( genre.to_string() ) } ),
            }
        }
    }


    #[test]
    fn test_build_catalog_counts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write( dir.path().join( "a.mp3" ), "Rock" ).unwrap();
        fs::write( dir.path().join( "b.flac" ), "Rock" ).unwrap();
        fs::write( dir.path().join( "c.wav" ), "" ).unwrap();
        fs::write( dir.path().join( "d.txt" ), "Rock" ).unwrap();
        fs::create_dir( dir.path().join( "sub" ) ).unwrap();
        fs::write( dir.path().join( "sub/e.mp3" ), "!" ).unwrap();

        let catalog = build_catalog(
            dir.path(),
            &DirectoryScanner::new(),
            &GenreExtractor::with_reader( ContentsReader ),
        ).unwrap();

        assert_eq!( catalog.len(), 2 );
        assert_eq!( catalog.get( "Rock" ).unwrap().len(), 2 );

        let mut unknown: Vec<PathBuf> = catalog.get( UNKNOWN_GENRE ).unwrap().to_vec();
        unknown.sort();
        assert_eq!( unknown, vec![ dir.path().join( "c.wav" ), dir.path().join( "sub/e.mp3" ) ] );
    }


    #[test]
    fn test_build_catalog_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = build_catalog(
            &dir.path().join( "absent" ),
            &DirectoryScanner::new(),
            &GenreExtractor::with_reader( ContentsReader ),
        );
        assert!( matches!( result, Err( ScanError::NotFound( _ ) ) ) );
    }
}
