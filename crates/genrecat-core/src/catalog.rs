//! Genre catalog
//!
//! Groups scanned audio files by genre, preserving the order in which
//! genres and files were first seen.

use std::collections::HashMap;
use std::path::{ Path, PathBuf };

use crate::tags::{ GenreExtractor, TagReader };


/// Genre assigned to files with no readable genre tag.
pub const UNKNOWN_GENRE: &str = "Unknown";


/// Mapping from genre name to the files tagged with it.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct Catalog {
    entries: Vec<( String, Vec<PathBuf> )>,
    index: HashMap<String, usize>,
}


impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }


    /// Appends a file to a genre, creating the genre if needed.
    pub fn insert( &mut self, genre: &str, path: PathBuf ) {
        let pos = match self.index.get( genre ) {
            Some( &pos ) => pos,
            None => {
                self.entries.push(( genre.to_string(), Vec::new() ));
                self.index.insert( genre.to_string(), self.entries.len() - 1 );
                self.entries.len() - 1
            }
        };

        self.entries[pos].1.push( path );
    }


    /// Gets the files for a genre, in discovery order.
    pub fn get( &self, genre: &str ) -> Option<&[PathBuf]> {
        self.index.get( genre ).map( |&pos| self.entries[pos].1.as_slice() )
    }


    /// Returns true if at least one file has this genre.
    pub fn contains( &self, genre: &str ) -> bool {
        self.index.contains_key( genre )
    }


    /// Iterates genres in first-seen order.
    pub fn iter( &self ) -> impl Iterator<Item = ( &str, &[PathBuf] )> {
        self.entries.iter().map( |( genre, files )| ( genre.as_str(), files.as_slice() ) )
    }


    /// Gets the number of genres.
    pub fn len( &self ) -> usize {
        self.entries.len()
    }


    /// Returns true if the catalog holds no genres.
    pub fn is_empty( &self ) -> bool {
        self.entries.is_empty()
    }


    /// Gets the number of files across all genres.
    pub fn total_tracks( &self ) -> usize {
        self.entries.iter().map( |( _, files )| files.len() ).sum()
    }
}


/// Groups `files` by genre, filing untagged or unreadable ones under [`UNKNOWN_GENRE`].
pub fn categorize<R, I, P>( files: I, extractor: &GenreExtractor<R> ) -> Catalog
where
    R: TagReader,
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut catalog = Catalog::new();

    for file in files {
        let path = file.as_ref();
        let genre = extractor.extract_genre( path );
        catalog.insert( genre.as_deref().unwrap_or( UNKNOWN_GENRE ), path.to_path_buf() );
    }

    tracing::info!(
        "Categorized {} files into {} genres",
        catalog.total_tracks(),
        catalog.len()
    );
    catalog
}


#[cfg( test )]
mod tests {
    use super::*;

    use crate::tags::{ Tag, TagError };


    /// Reads the genre from the file stem: `rock__a.mp3` is "rock",
    /// `bad__x.mp3` fails, anything else has no genre.
    struct StemReader;


    impl TagReader for StemReader {
        fn read_tag( &self, path: &Path ) -> Result<Tag, TagError> {
            let stem = path.file_stem().and_then( |s| s.to_str() ).unwrap_or( "" );
            match stem.split_once( "__" ) {
                Some(( "bad", _ )) => Err( TagError::Read( "corrupt".into() ) ),
                Some(( genre, _ )) => Ok( Tag { genre: Some( genre.to_string() ) } ),
                None => Ok( Tag::default() ),
            }
        }
    }


    fn paths( names: &[&str] ) -> Vec<PathBuf> {
        names.iter().map( PathBuf::from ).collect()
    }


    #[test]
    fn test_categorize_groups_in_order() {
        let files = paths( &[ "Rock__a.mp3", "Pop__b.wav", "Rock__c.flac" ] );
        let catalog = categorize( &files, &GenreExtractor::with_reader( StemReader ) );

        let genres: Vec<&str> = catalog.iter().map( |( g, _ )| g ).collect();
        assert_eq!( genres, vec![ "Rock", "Pop" ] );
        assert_eq!( catalog.get( "Rock" ).unwrap(), &paths( &[ "Rock__a.mp3", "Rock__c.flac" ] )[..] );
        assert_eq!( catalog.get( "Pop" ).unwrap(), &paths( &[ "Pop__b.wav" ] )[..] );
    }


    #[test]
    fn test_categorize_unknown_for_missing_and_failed() {
        let files = paths( &[ "plain.mp3", "bad__x.mp3", "Jazz__y.flac" ] );
        let catalog = categorize( &files, &GenreExtractor::with_reader( StemReader ) );

        assert_eq!( catalog.get( UNKNOWN_GENRE ).unwrap(), &paths( &[ "plain.mp3", "bad__x.mp3" ] )[..] );
        assert_eq!( catalog.get( "Jazz" ).unwrap().len(), 1 );
    }


    #[test]
    fn test_categorize_no_unknown_when_all_tagged() {
        let files = paths( &[ "Rock__a.mp3" ] );
        let catalog = categorize( &files, &GenreExtractor::with_reader( StemReader ) );
        assert!( !catalog.contains( UNKNOWN_GENRE ) );
    }


    #[test]
    fn test_categorize_partitions_every_file() {
        let files = paths( &[
            "Rock__1.mp3", "rock__2.mp3", "bad__3.wav", "4.flac",
            "Rock__5.flac", "Blues__6.wav", "7.mp3", "Rock__1.mp3",
        ]);
        let catalog = categorize( &files, &GenreExtractor::with_reader( StemReader ) );

        assert_eq!( catalog.total_tracks(), files.len() );
        for file in &files {
            let hits: usize = catalog.iter()
                .map( |( _, list )| list.iter().filter( |p| *p == file ).count() )
                .sum();
            let expected = files.iter().filter( |f| *f == file ).count();
            assert_eq!( hits, expected, "{:?}", file );
        }
        // Case is preserved, so "Rock" and "rock" stay apart
        assert!( catalog.contains( "Rock" ) && catalog.contains( "rock" ) );
    }


    #[test]
    fn test_categorize_empty() {
        let files: Vec<PathBuf> = Vec::new();
        let catalog = categorize( &files, &GenreExtractor::with_reader( StemReader ) );
        assert!( catalog.is_empty() );
        assert_eq!( catalog.total_tracks(), 0 );
    }


    #[test]
    fn test_insert_and_get() {
        let mut catalog = Catalog::new();
        catalog.insert( "Ambient", PathBuf::from( "x.flac" ) );
        catalog.insert( "Ambient", PathBuf::from( "y.flac" ) );

        assert_eq!( catalog.len(), 1 );
        assert_eq!( catalog.get( "Ambient" ).unwrap().len(), 2 );
        assert!( catalog.get( "ambient" ).is_none() );
    }
}
