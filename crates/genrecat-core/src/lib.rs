//! genrecat core - Audio library categorization by genre
//!
//! This crate scans directories for audio files, reads their genre tags,
//! groups them into a catalog, and writes per-genre playlists.

pub mod catalog;
pub mod pipeline;
pub mod playlist;
pub mod scanner;
pub mod tags;

pub use catalog::{ categorize, Catalog, UNKNOWN_GENRE };
pub use pipeline::build_catalog;
pub use playlist::{ write_playlist, PlaylistError, PlaylistOutcome };
pub use scanner::{ scan_directory, DirectoryScanner, ScanError, ScanOptions };
pub use tags::{ GenreExtractor, SymphoniaTagReader, Tag, TagError, TagReader };
