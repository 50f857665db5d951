use std::fs::File;
use std::io::{BufWriter, Write};

use serde::{Deserialize, Serialize};

use crate::book::{Library, Song};
use crate::error::{ErrorWritingFile, LookupError};
use crate::music::Transposition;
use crate::prelude::*;
use crate::project::{Format, Output, Project};
use crate::util::sort_lexical_by;
use crate::{ProgramMeta, PROGRAM_META};

pub mod json;
pub mod txt;

pub use self::json::RJson;
pub use self::txt::RTxt;

/// Which parts of a song get rendered.
#[derive(
    Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::EnumString, strum::Display, Debug,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ViewKind {
    Mixed,
    Chords,
    Lyrics,
}

impl Default for ViewKind {
    fn default() -> Self {
        Self::Mixed
    }
}

impl ViewKind {
    fn chords(self) -> bool {
        self != ViewKind::Lyrics
    }

    fn lyrics(self) -> bool {
        self != ViewKind::Chords
    }
}

/// Transposes the leading note of a key such as `Eb` or `A minor`, the rest is kept.
fn transpose_key(key: &str, transposition: Transposition) -> String {
    let key = key.trim();
    let (note, rest) = key.split_at(key.find(char::is_whitespace).unwrap_or(key.len()));
    format!("{}{}", transposition.apply_token(note), rest)
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.is_empty())
}

#[derive(Serialize, Debug)]
pub struct RenderedLine<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<&'a str>,
}

#[derive(Serialize, Debug)]
pub struct RenderedSection<'a> {
    pub name: &'a str,
    pub lines: Vec<RenderedLine<'a>>,
}

/// A song with its chords transposed and filtered down to one view.
#[derive(Serialize, Debug)]
pub struct RenderedSong<'a> {
    pub id: &'a str,
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<&'a str>,
    pub key: String,
    pub original_key: &'a str,
    pub transposition: Transposition,
    pub sections: Vec<RenderedSection<'a>>,
}

impl<'a> RenderedSong<'a> {
    pub fn new(song: &'a Song, transposition: Transposition, view: ViewKind) -> Self {
        let sections = song
            .sections
            .iter()
            .map(|section| {
                let lines = section
                    .lines
                    .iter()
                    .filter_map(|line| {
                        let chords = non_empty(line.chords.as_deref())
                            .filter(|_| view.chords())
                            .map(|chords| transposition.apply_text(chords));
                        let lyrics = non_empty(line.lyrics.as_deref()).filter(|_| view.lyrics());

                        if chords.is_none() && lyrics.is_none() {
                            None
                        } else {
                            Some(RenderedLine { chords, lyrics })
                        }
                    })
                    .collect();

                RenderedSection {
                    name: &section.name,
                    lines,
                }
            })
            .collect();

        Self {
            id: &song.id,
            title: &song.title,
            artist: non_empty(song.artist.as_deref()),
            key: transpose_key(&song.key, transposition),
            original_key: song.key.trim(),
            transposition,
            sections,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct RenderContext<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setlist: Option<&'a str>,
    pub songs: Vec<RenderedSong<'a>>,
    pub program: &'static ProgramMeta,

    /// Setlist items left out because their song is gone.
    #[serde(skip)]
    pub skipped: usize,
}

impl<'a> RenderContext<'a> {
    /// Every song of the library in its written key, sorted by title.
    pub fn book(title: &'a str, library: &'a Library, view: ViewKind) -> Self {
        let global = library.accidentals();
        let mut songs: Vec<_> = library.songs.iter().collect();
        sort_lexical_by(&mut songs, |song| song.title.as_str());

        let songs = songs
            .into_iter()
            .map(|song| RenderedSong::new(song, Transposition::new(0, song.accidentals(global)), view))
            .collect();

        Self {
            title,
            setlist: None,
            songs,
            program: &PROGRAM_META,
            skipped: 0,
        }
    }

    /// Songs of a setlist in order, each transposed by its item's offset.
    pub fn setlist(
        title: &'a str,
        library: &'a Library,
        reference: &str,
        view: ViewKind,
    ) -> Result<Self, LookupError> {
        let setlist = library
            .find_setlist(reference)
            .ok_or_else(|| LookupError::UnknownSetlist(reference.to_owned()))?;
        let global = library.accidentals();

        let songs: Vec<_> = library
            .setlist_songs(setlist)
            .map(|(item, song)| {
                let transposition = Transposition::new(item.transpose, song.accidentals(global));
                RenderedSong::new(song, transposition, view)
            })
            .collect();

        Ok(Self {
            title,
            setlist: Some(&setlist.name),
            skipped: setlist.items.len() - songs.len(),
            songs,
            program: &PROGRAM_META,
        })
    }

    /// A single song, eg. for printing to the terminal.
    pub fn single(title: &'a str, song: &'a Song, transposition: Transposition, view: ViewKind) -> Self {
        Self {
            title,
            setlist: None,
            songs: vec![RenderedSong::new(song, transposition, view)],
            program: &PROGRAM_META,
            skipped: 0,
        }
    }

    pub fn for_output(project: &'a Project, output: &Output) -> Result<Self> {
        let title = project.settings.title.as_str();
        let library = &project.library;

        match output.setlist.as_deref() {
            Some(reference) => Ok(Self::setlist(title, library, reference, output.view)?),
            None => Ok(Self::book(title, library, output.view)),
        }
    }
}

pub trait Render {
    fn render(&self, out: &mut dyn Write, context: &RenderContext) -> Result<()>;
}

pub struct Renderer<'a> {
    output: &'a Output,
    render: Box<dyn Render>,
}

impl<'a> Renderer<'a> {
    pub fn new(output: &'a Output) -> Self {
        let render: Box<dyn Render> = match output.format() {
            Format::Json => Box::new(RJson),
            Format::Txt | Format::Auto => Box::new(RTxt),
        };

        Self { output, render }
    }

    pub fn render(&self, context: &RenderContext) -> Result<()> {
        let path = &self.output.file;
        let write_err = |err| ErrorWritingFile(path.to_owned(), err);

        let mut file = File::create(path).map(BufWriter::new).map_err(write_err)?;
        self.render.render(&mut file, context)?;
        file.flush().map_err(write_err)?;
        Ok(())
    }
}

/// Renders `context` as plain text into a `String`.
pub fn to_text(context: &RenderContext) -> Result<String> {
    let mut buffer = vec![];
    RTxt.render(&mut buffer, context)?;
    String::from_utf8(buffer).context("Rendered text is not valid UTF-8")
}
