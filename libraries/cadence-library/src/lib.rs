//! Cadence Library
//!
//! Everything the player knows about the music on disk.
//!
//! This crate provides:
//! - [`Library`]: an in-memory catalog implementing [`cadence_core::TrackCatalog`],
//!   with the browse views (songs, albums, artists, search, recently added,
//!   calendar of additions)
//! - [`LibraryScanner`]: directory walking and tag reading via lofty
//! - [`TagEditor`]: writing edited tags back to files
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_library::{Library, LibraryScanner, ScanConfig, SearchFilter};
//! use std::path::PathBuf;
//!
//! let scanner = LibraryScanner::new(ScanConfig::default());
//! let report = scanner.scan(&[PathBuf::from("/music")]);
//!
//! let library = Library::new(report.tracks);
//! let hits = library.search("beat", SearchFilter::All);
//! println!("{} songs match", hits.songs.len());
//! ```

mod calendar;
mod catalog;
mod editor;
mod error;
mod scanner;
mod search;

pub use calendar::{DayEntry, MonthEntry};
pub use catalog::{split_artists, Library, DEFAULT_UNSPLITTABLE_ARTISTS};
pub use editor::{TagEdit, TagEditor};
pub use error::{LibraryError, Result};
pub use scanner::{LibraryScanner, ScanConfig, ScanReport, UNKNOWN_ARTIST};
pub use search::{SearchFilter, SearchResults};
