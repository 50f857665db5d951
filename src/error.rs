use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
#[error("Error writing file '{}'", .0.display())]
pub struct ErrorWritingFile(pub PathBuf, #[source] pub io::Error);

#[derive(Error, Debug)]
#[error("Error reading file '{}'", .0.display())]
pub struct ErrorReadingFile(pub PathBuf, #[source] pub io::Error);

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("No song matching '{0}'")]
    UnknownSong(String),

    #[error("Song '{song}' has no section matching '{section}'")]
    UnknownSection { song: String, section: String },

    #[error("No setlist matching '{0}'")]
    UnknownSetlist(String),

    #[error("Setlist '{setlist}' has no item number {index}")]
    ItemOutOfRange { setlist: String, index: usize },
}
