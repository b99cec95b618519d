//! Genre tag extraction
//!
//! Reads the genre tag from audio file metadata. The metadata reader sits
//! behind the [`TagReader`] trait; [`SymphoniaTagReader`] is the default.

use std::fs::File;
use std::path::Path;

use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{ MediaSourceStream, MediaSourceStreamOptions };
use symphonia::core::meta::{ MetadataOptions, StandardTagKey };
use symphonia::core::probe::Hint;
use symphonia_metadata::id3v1::util::genre_name;
use thiserror::Error;


/// Errors that can occur while reading a file's tags.
#[derive( Debug, Error )]
pub enum TagError {
    #[error( "Failed to open file: {0}" )]
    Io( #[from] std::io::Error ),

    #[error( "Unsupported format: {0}" )]
    UnsupportedFormat( String ),

    #[error( "Failed to read tags: {0}" )]
    Read( String ),
}


/// The subset of a file's tag block this crate cares about.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct Tag {
    pub genre: Option<String>,
}


/// Loads the tag block of an audio file.
pub trait TagReader {
    fn read_tag( &self, path: &Path ) -> Result<Tag, TagError>;
}


impl<R: TagReader + ?Sized> TagReader for &R {
    fn read_tag( &self, path: &Path ) -> Result<Tag, TagError> {
        ( **self ).read_tag( path )
    }
}


/// Tag reader backed by Symphonia's format probe.
#[derive( Debug, Clone, Copy, Default )]
pub struct SymphoniaTagReader;


impl TagReader for SymphoniaTagReader {
    fn read_tag( &self, path: &Path ) -> Result<Tag, TagError> {
        let file = File::open( path )?;
        let mss = MediaSourceStream::new( Box::new( file ), MediaSourceStreamOptions::default() );

        let mut hint = Hint::new();
        if let Some( ext ) = path.extension().and_then( |e| e.to_str() ) {
            hint.with_extension( ext );
        }

        let mut probed = symphonia::default::get_probe()
            .format( &hint, mss, &FormatOptions::default(), &MetadataOptions::default() )
            .map_err( map_symphonia_error )?;

        // Probe-level tags (ID3v2 ahead of an MP3 stream) take precedence
        // over container tags (Vorbis comments, RIFF INFO).
        let mut genre = probed.metadata
            .get()
            .and_then( |log| log.current().and_then( |rev| genre_from_tags( rev.tags() ) ) );

        if genre.is_none() {
            genre = probed.format
                .metadata()
                .current()
                .and_then( |rev| genre_from_tags( rev.tags() ) );
        }

        Ok( Tag { genre } )
    }
}


fn genre_from_tags( tags: &[symphonia::core::meta::Tag] ) -> Option<String> {
    let tag = tags.iter().find( |t| t.std_key == Some( StandardTagKey::Genre ) )?;
    let value = tag.value.to_string();
    // RIFF INFO values keep their NUL terminator
    let value = value.trim_end_matches( '\0' );

    if matches!( tag.key.as_str(), "TCON" | "TCO" ) {
        Some( resolve_id3_genre( value ) )
    } else {
        Some( value.to_string() )
    }
}


/// Resolves ID3 content-type references (`(17)`, `17`) to the ID3v1 genre name.
///
/// A refinement after the reference (`(17)Rock & Roll`) wins over the
/// numbered name. Anything that is not a valid reference is returned as-is.
fn resolve_id3_genre( value: &str ) -> String {
    let trimmed = value.trim();
    let ( index, refinement ) = match trimmed.strip_prefix( '(' ).and_then( |s| s.split_once( ')' ) ) {
        Some( parts ) => parts,
        None => ( trimmed, "" ),
    };

    let Ok( index ) = index.parse::<u8>() else {
        return value.to_string();
    };

    if !refinement.is_empty() {
        return refinement.to_string();
    }

    genre_name( index )
        .map( |name| name.to_string() )
        .unwrap_or_else( || value.to_string() )
}


fn map_symphonia_error( err: SymphoniaError ) -> TagError {
    match err {
        SymphoniaError::IoError( e ) => TagError::Io( e ),
        SymphoniaError::Unsupported( what ) => TagError::UnsupportedFormat( what.to_string() ),
        other => TagError::Read( other.to_string() ),
    }
}


/// Resolves a file's genre, turning every failure into "no genre".
#[derive( Debug, Clone, Default )]
pub struct GenreExtractor<R = SymphoniaTagReader> {
    reader: R,
}


impl GenreExtractor {
    /// Creates an extractor using Symphonia.
    pub fn new() -> Self {
        Self::default()
    }
}


impl<R: TagReader> GenreExtractor<R> {
    /// Creates an extractor around a custom tag reader.
    pub fn with_reader( reader: R ) -> Self {
        Self { reader }
    }


    /// Returns the genre of `path`, or `None` if it has none or cannot be read.
    ///
    /// Read failures are logged with the file path and never propagated,
    /// so one bad file cannot abort a scan.
    pub fn extract_genre( &self, path: &Path ) -> Option<String> {
        match self.reader.read_tag( path ) {
            Ok( tag ) => tag.genre.filter( |g| !g.is_empty() ),
            Err( e ) => {
                tracing::warn!( "Error reading {}: {}", path.display(), e );
                None
            }
        }
    }
}


#[cfg( test )]
mod tests {
    use super::*;

    use std::fs;


    struct FixedReader( Result<Option<&'static str>, &'static str> );


    impl TagReader for FixedReader {
        fn read_tag( &self, _path: &Path ) -> Result<Tag, TagError> {
            match self.0 {
                Ok( genre ) => Ok( Tag { genre: genre.map( String::from ) } ),
                Err( msg ) => Err( TagError::Read( msg.to_string() ) ),
            }
        }
    }


    /// Builds a minimal 16-bit mono PCM WAV file with no tags.
    fn silent_wav() -> Vec<u8> {
        wav_with_info( None )
    }


    /// Builds a minimal WAV file, optionally with a `LIST/INFO/IGNR` genre.
    fn wav_with_info( genre: Option<&[u8]> ) -> Vec<u8> {
        let samples: &[u8] = &[ 0, 0, 0, 0, 0, 0, 0, 0 ];

        let mut list = Vec::new();
        if let Some( genre ) = genre {
            list.extend_from_slice( b"LIST" );
            list.extend_from_slice( &( 12 + genre.len() as u32 ).to_le_bytes() );
            list.extend_from_slice( b"INFO" );
            list.extend_from_slice( b"IGNR" );
            list.extend_from_slice( &( genre.len() as u32 ).to_le_bytes() );
            list.extend_from_slice( genre );
        }

        let mut buf = Vec::new();
        buf.extend_from_slice( b"RIFF" );
        buf.extend_from_slice( &( 36 + list.len() as u32 + samples.len() as u32 ).to_le_bytes() );
        buf.extend_from_slice( b"WAVE" );
        buf.extend_from_slice( b"fmt " );
        buf.extend_from_slice( &16u32.to_le_bytes() );
        buf.extend_from_slice( &1u16.to_le_bytes() );      // PCM
        buf.extend_from_slice( &1u16.to_le_bytes() );      // channels
        buf.extend_from_slice( &8000u32.to_le_bytes() );   // sample rate
        buf.extend_from_slice( &16000u32.to_le_bytes() );  // byte rate
        buf.extend_from_slice( &2u16.to_le_bytes() );      // block align
        buf.extend_from_slice( &16u16.to_le_bytes() );     // bits per sample
        buf.extend_from_slice( &list );
        buf.extend_from_slice( b"data" );
        buf.extend_from_slice( &( samples.len() as u32 ).to_le_bytes() );
        buf.extend_from_slice( samples );
        buf
    }


    /// Builds an ID3v2.3 tag with a single TCON frame, followed by a few
    /// silent MPEG-1 Layer III frames (128 kbps, 44.1 kHz).
    fn mp3_with_tcon( genre: &str ) -> Vec<u8> {
        let mut frame = vec![ 0u8 ];                        // ISO-8859-1
        frame.extend_from_slice( genre.as_bytes() );

        let mut buf = Vec::new();
        buf.extend_from_slice( b"ID3" );
        buf.extend_from_slice( &[ 3, 0, 0 ] );
        // Sync-safe size; fits in the low byte for short genres
        buf.extend_from_slice( &( 10 + frame.len() as u32 ).to_be_bytes() );
        buf.extend_from_slice( b"TCON" );
        buf.extend_from_slice( &( frame.len() as u32 ).to_be_bytes() );
        buf.extend_from_slice( &[ 0, 0 ] );
        buf.extend_from_slice( &frame );

        for _ in 0..4 {
            buf.extend_from_slice( &[ 0xFF, 0xFB, 0x90, 0x64 ] );
            buf.extend_from_slice( &[ 0u8; 413 ] );
        }
        buf
    }


    fn read_genre( name: &str, contents: &[u8] ) -> Option<String> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( name );
        fs::write( &path, contents ).unwrap();
        SymphoniaTagReader.read_tag( &path ).unwrap().genre
    }


    #[test]
    fn test_extract_genre_present() {
        let extractor = GenreExtractor::with_reader( FixedReader( Ok( Some( "Rock" ) ) ) );
        assert_eq!( extractor.extract_genre( Path::new( "a.mp3" ) ), Some( "Rock".to_string() ) );
    }


    #[test]
    fn test_extract_genre_preserves_case() {
        let extractor = GenreExtractor::with_reader( FixedReader( Ok( Some( "rock " ) ) ) );
        assert_eq!( extractor.extract_genre( Path::new( "a.mp3" ) ), Some( "rock ".to_string() ) );
    }


    #[test]
    fn test_extract_genre_missing() {
        let extractor = GenreExtractor::with_reader( FixedReader( Ok( None ) ) );
        assert_eq!( extractor.extract_genre( Path::new( "a.mp3" ) ), None );
    }


    #[test]
    fn test_extract_genre_empty_is_none() {
        let extractor = GenreExtractor::with_reader( FixedReader( Ok( Some( "" ) ) ) );
        assert_eq!( extractor.extract_genre( Path::new( "a.mp3" ) ), None );
    }


    #[test]
    fn test_extract_genre_error_is_swallowed() {
        let extractor = GenreExtractor::with_reader( FixedReader( Err( "corrupt frame" ) ) );
        assert_eq!( extractor.extract_genre( Path::new( "a.mp3" ) ), None );
    }


    #[test]
    fn test_symphonia_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = SymphoniaTagReader.read_tag( &dir.path().join( "gone.mp3" ) );
        assert!( matches!( result, Err( TagError::Io( _ ) ) ) );
    }


    #[test]
    fn test_symphonia_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "noise.flac" );
        fs::write( &path, b"definitely not an audio stream" ).unwrap();

        assert!( SymphoniaTagReader.read_tag( &path ).is_err() );
        assert_eq!( GenreExtractor::new().extract_genre( &path ), None );
    }


    #[test]
    fn test_symphonia_untagged_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "silence.wav" );
        fs::write( &path, silent_wav() ).unwrap();

        let tag = SymphoniaTagReader.read_tag( &path ).unwrap();
        assert_eq!( tag.genre, None );
    }


    #[test]
    fn test_symphonia_wav_info_genre() {
        assert_eq!( read_genre( "jazz.wav", &wav_with_info( Some( &b"Jazz"[..] ) ) ), Some( "Jazz".to_string() ) );
    }


    #[test]
    fn test_symphonia_wav_info_genre_nul_terminated() {
        assert_eq!( read_genre( "blues.wav", &wav_with_info( Some( &b"Blues\0"[..] ) ) ), Some( "Blues".to_string() ) );
    }


    #[test]
    fn test_symphonia_id3_genre() {
        assert_eq!( read_genre( "a.mp3", &mp3_with_tcon( "Rock" ) ), Some( "Rock".to_string() ) );
    }


    #[test]
    fn test_symphonia_id3_numeric_genre() {
        assert_eq!( read_genre( "a.mp3", &mp3_with_tcon( "(17)" ) ), Some( "Rock".to_string() ) );
        assert_eq!( read_genre( "b.mp3", &mp3_with_tcon( "17" ) ), Some( "Rock".to_string() ) );
    }


    #[test]
    fn test_resolve_id3_genre() {
        assert_eq!( resolve_id3_genre( "(0)" ), "Blues" );
        assert_eq!( resolve_id3_genre( "8" ), "Jazz" );
        assert_eq!( resolve_id3_genre( "(17)Rock & Roll" ), "Rock & Roll" );
        assert_eq!( resolve_id3_genre( "(RX)" ), "(RX)" );
        assert_eq!( resolve_id3_genre( "Synthwave" ), "Synthwave" );
        assert_eq!( resolve_id3_genre( "(255)" ), "(255)" );
        assert_eq!( resolve_id3_genre( "2 Tone" ), "2 Tone" );
    }
}
