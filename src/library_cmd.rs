use crate::app::App;
use crate::book::{Direction, LineKind, Library, Setlist, Song};
use crate::error::LookupError;
use crate::music::Accidentals;
use crate::prelude::*;
use crate::project::{read_json, write_json, Project};
use crate::render::{to_text, RenderContext, ViewKind};

#[derive(clap::Parser)]
pub enum SongCmd {
    #[command(about = "Add a new song at the top of the library")]
    New {
        #[arg(help = "Song title")]
        title: String,
        #[arg(long, help = "Artist or author")]
        artist: Option<String>,
        #[arg(long, help = "Written key, C by default")]
        key: Option<String>,
    },
    #[command(about = "Remove a song from the library")]
    Remove {
        #[arg(help = "Song id or title")]
        song: String,
    },
    #[command(about = "Change a song's title, artist, key or accidentals")]
    Edit {
        #[arg(help = "Song id or title")]
        song: String,
        #[arg(long, help = "New title")]
        title: Option<String>,
        #[arg(long, help = "New artist, an empty string removes it")]
        artist: Option<String>,
        #[arg(long, help = "New written key")]
        key: Option<String>,
        #[arg(short, long, help = "Spell this song with sharps or flats")]
        accidentals: Option<Accidentals>,
        #[arg(
            long,
            conflicts_with = "accidentals",
            help = "Follow the global accidentals preference"
        )]
        global_accidentals: bool,
    },
    #[command(about = "Write a single song to a JSON file")]
    Export {
        #[arg(help = "Song id or title")]
        song: String,
        #[arg(help = "Destination file")]
        file: PathBuf,
    },
    #[command(about = "Replace a song with one read from a JSON file")]
    Import {
        #[arg(help = "Song id or title")]
        song: String,
        #[arg(help = "Source file, as written by song export")]
        file: PathBuf,
    },
    #[command(subcommand, about = "Add, remove or reorder a song's sections")]
    Section(SectionCmd),
}

#[derive(clap::Parser)]
pub enum SectionCmd {
    #[command(about = "Append a section with a default chord line")]
    Add {
        #[arg(help = "Song id or title")]
        song: String,
        #[arg(help = "Section name")]
        name: String,
    },
    #[command(about = "Remove a section")]
    Remove {
        #[arg(help = "Song id or title")]
        song: String,
        #[arg(help = "Section number (starting at 1) or name")]
        section: String,
    },
    #[command(about = "Move a section one place up or down")]
    Move {
        #[arg(help = "Song id or title")]
        song: String,
        #[arg(help = "Section number (starting at 1) or name")]
        section: String,
        #[arg(help = "up or down")]
        direction: Direction,
    },
    #[command(about = "Append a line to a section")]
    Line {
        #[arg(help = "Song id or title")]
        song: String,
        #[arg(help = "Section number (starting at 1) or name")]
        section: String,
        #[arg(help = "chords, lyrics or mixed")]
        kind: LineKind,
        #[arg(long, help = "Chord text instead of the default")]
        chords: Option<String>,
        #[arg(long, help = "Lyrics text")]
        lyrics: Option<String>,
    },
}

fn song_mut<'a>(library: &'a mut Library, reference: &str) -> Result<&'a mut Song> {
    library
        .find_song_mut(reference)
        .ok_or_else(|| LookupError::UnknownSong(reference.to_owned()).into())
}

fn section_id(song: &Song, reference: &str) -> Result<String, LookupError> {
    song.find_section(reference)
        .map(|section| section.id.clone())
        .ok_or_else(|| LookupError::UnknownSection {
            song: song.title.clone(),
            section: reference.to_owned(),
        })
}

impl SectionCmd {
    fn run(self, app: &App, library: &mut Library) -> Result<()> {
        use SectionCmd::*;

        match self {
            Add { song, name } => {
                let song = song_mut(library, &song)?;
                let section = song.add_section(name);
                app.status("Added", format!("section '{}'", section.name));
            }
            Remove { song, section } => {
                let song = song_mut(library, &song)?;
                let id = section_id(song, &section)?;
                if let Some(removed) = song.remove_section(&id) {
                    app.status("Removed", format!("section '{}'", removed.name));
                }
            }
            Move {
                song,
                section,
                direction,
            } => {
                let song = song_mut(library, &song)?;
                let id = section_id(song, &section)?;
                if song.move_section(&id, direction) {
                    app.status("Moved", format!("section '{}' {}", section, direction));
                } else {
                    app.warning(format!("Section '{}' can't move {}", section, direction));
                }
            }
            Line {
                song,
                section,
                kind,
                chords,
                lyrics,
            } => {
                let song = song_mut(library, &song)?;
                let id = section_id(song, &section)?;
                let section = song
                    .section_mut(&id)
                    .ok_or_else(|| anyhow!("Section '{}' vanished", id))?;
                let line = section.add_line(kind);
                if chords.is_some() {
                    line.chords = chords;
                }
                if lyrics.is_some() {
                    line.lyrics = lyrics;
                }
                app.status(
                    "Added",
                    format!("{} line to '{}', line #{}", kind, section.name, section.lines.len()),
                );
            }
        }

        Ok(())
    }
}

impl SongCmd {
    /// Whether the command changes the library and it needs to be saved.
    pub fn modifies(&self) -> bool {
        !matches!(self, SongCmd::Export { .. })
    }

    pub fn run(self, app: &App, project: &mut Project) -> Result<()> {
        use SongCmd::*;

        let library = &mut project.library;
        match self {
            New { title, artist, key } => {
                let song = library.new_song(title);
                song.artist = artist.filter(|a| !a.trim().is_empty());
                if let Some(key) = key {
                    song.key = key;
                }
                app.status("Created", format!("song '{}'", song.title));
                app.detail("", format!("id {}", song.id));
            }
            Remove { song } => {
                let id = library
                    .find_song(&song)
                    .map(|s| s.id.clone())
                    .ok_or(LookupError::UnknownSong(song))?;
                if let Some(removed) = library.remove_song(&id) {
                    app.status("Removed", format!("song '{}'", removed.title));
                }

                let dangling = library
                    .setlists
                    .iter()
                    .filter(|setlist| setlist.items.iter().any(|item| item.song_id == id))
                    .count();
                if dangling > 0 {
                    app.warning(format!(
                        "The song is still referenced by {} setlist(s), it will be skipped there",
                        dangling
                    ));
                }
            }
            Edit {
                song,
                title,
                artist,
                key,
                accidentals,
                global_accidentals,
            } => {
                let song = song_mut(library, &song)?;
                if let Some(title) = title {
                    song.title = title;
                }
                if let Some(artist) = artist {
                    song.artist = Some(artist).filter(|a| !a.trim().is_empty());
                }
                if let Some(key) = key {
                    song.key = key;
                }
                if let Some(accidentals) = accidentals {
                    song.prefer_sharps = Some(accidentals.prefer_sharps());
                } else if global_accidentals {
                    song.prefer_sharps = None;
                }
                app.status("Updated", format!("song '{}'", song.title));
            }
            Export { song, file } => {
                let song = library
                    .find_song(&song)
                    .ok_or(LookupError::UnknownSong(song))?;
                app.status("Exporting", format!("'{}' to {}", song.title, file.display()));
                write_json(song, &file).context("Could not export song")?;
            }
            Import { song, file } => {
                app.status("Importing", file.display());
                let imported: Song = read_json(&file).context("Could not import song")?;
                let song = song_mut(library, &song)?;
                song.replace_with(imported);
                app.status("Replaced", format!("song '{}'", song.title));
            }
            Section(cmd) => cmd.run(app, library)?,
        }

        Ok(())
    }
}

#[derive(clap::Parser)]
pub enum SetlistCmd {
    #[command(about = "List setlists")]
    List,
    #[command(about = "Create a new setlist")]
    New {
        #[arg(help = "Setlist name")]
        name: String,
    },
    #[command(about = "Delete a setlist, the songs stay in the library")]
    Delete {
        #[arg(help = "Setlist id or name")]
        setlist: String,
    },
    #[command(about = "Append a song to a setlist")]
    Add {
        #[arg(help = "Setlist id or name")]
        setlist: String,
        #[arg(help = "Song id or title")]
        song: String,
    },
    #[command(about = "Remove an item from a setlist")]
    Remove {
        #[arg(help = "Setlist id or name")]
        setlist: String,
        #[arg(help = "Item number, starting at 1")]
        index: usize,
    },
    #[command(about = "Move an item one place up or down")]
    Move {
        #[arg(help = "Setlist id or name")]
        setlist: String,
        #[arg(help = "Item number, starting at 1")]
        index: usize,
        #[arg(help = "up or down")]
        direction: Direction,
    },
    #[command(about = "Shift an item's transposition by a number of semitones")]
    Transpose {
        #[arg(help = "Setlist id or name")]
        setlist: String,
        #[arg(help = "Item number, starting at 1")]
        index: usize,
        #[arg(allow_hyphen_values = true, help = "Semitones to add, may be negative")]
        delta: i32,
    },
    #[command(about = "Write a single setlist to a JSON file")]
    Export {
        #[arg(help = "Setlist id or name")]
        setlist: String,
        #[arg(help = "Destination file")]
        file: PathBuf,
    },
    #[command(about = "Replace a setlist with one read from a JSON file")]
    Import {
        #[arg(help = "Setlist id or name")]
        setlist: String,
        #[arg(help = "Source file, as written by setlist export")]
        file: PathBuf,
    },
    #[command(about = "Print a setlist's charts, transposed")]
    Show {
        #[arg(help = "Setlist id or name")]
        setlist: String,
        #[arg(long, default_value_t, help = "mixed, chords or lyrics")]
        view: ViewKind,
    },
}

/// Converts a 1-based item number into an index of `setlist.items`.
fn item_index(setlist: &Setlist, number: usize) -> Result<usize, LookupError> {
    number
        .checked_sub(1)
        .filter(|&i| i < setlist.items.len())
        .ok_or_else(|| LookupError::ItemOutOfRange {
            setlist: setlist.name.clone(),
            index: number,
        })
}

fn setlist_mut<'a>(library: &'a mut Library, reference: &str) -> Result<&'a mut Setlist> {
    library
        .find_setlist_mut(reference)
        .ok_or_else(|| LookupError::UnknownSetlist(reference.to_owned()).into())
}

pub fn setlist_list(library: &Library) -> String {
    library
        .setlists
        .iter()
        .map(|setlist| {
            let missing = setlist.items.len() - library.setlist_songs(setlist).count();
            let mut line = format!("{} ({} songs)", setlist.name, setlist.items.len());
            if missing > 0 {
                line.push_str(&format!(", {} missing", missing));
            }
            line.push('\n');
            line
        })
        .collect()
}

impl SetlistCmd {
    /// Whether the command changes the library and it needs to be saved.
    pub fn modifies(&self) -> bool {
        !matches!(
            self,
            SetlistCmd::List | SetlistCmd::Show { .. } | SetlistCmd::Export { .. }
        )
    }

    /// Runs the command, returns text to be printed on stdout.
    pub fn run(self, app: &App, project: &mut Project) -> Result<String> {
        use SetlistCmd::*;

        let library = &mut project.library;
        match self {
            List => return Ok(setlist_list(library)),
            New { name } => {
                let setlist = library.new_setlist(name);
                app.status("Created", format!("setlist '{}'", setlist.name));
            }
            Delete { setlist } => {
                let id = setlist_mut(library, &setlist)?.id.clone();
                if let Some(removed) = library.remove_setlist(&id) {
                    app.status("Deleted", format!("setlist '{}'", removed.name));
                }
            }
            Add { setlist, song } => {
                let song = library
                    .find_song(&song)
                    .map(|s| (s.id.clone(), s.title.clone()))
                    .ok_or(LookupError::UnknownSong(song))?;
                let setlist = setlist_mut(library, &setlist)?;
                setlist.add_song(song.0);
                app.status(
                    "Added",
                    format!("'{}' to '{}' as #{}", song.1, setlist.name, setlist.items.len()),
                );
            }
            Remove { setlist, index } => {
                let setlist = setlist_mut(library, &setlist)?;
                let i = item_index(setlist, index)?;
                setlist.remove_item(i);
                app.status("Removed", format!("item #{} from '{}'", index, setlist.name));
            }
            Move {
                setlist,
                index,
                direction,
            } => {
                let setlist = setlist_mut(library, &setlist)?;
                let i = item_index(setlist, index)?;
                if setlist.move_item(i, direction) {
                    app.status("Moved", format!("item #{} {}", index, direction));
                } else {
                    app.warning(format!("Item #{} can't move {}", index, direction));
                }
            }
            Transpose {
                setlist,
                index,
                delta,
            } => {
                let setlist = setlist_mut(library, &setlist)?;
                let i = item_index(setlist, index)?;
                if let Some(offset) = setlist.shift_transpose(i, delta) {
                    app.status("Transposed", format!("item #{} to {:+}", index, offset));
                }
            }
            Export { setlist, file } => {
                let setlist = library
                    .find_setlist(&setlist)
                    .ok_or(LookupError::UnknownSetlist(setlist))?;
                app.status("Exporting", format!("'{}' to {}", setlist.name, file.display()));
                write_json(setlist, &file).context("Could not export setlist")?;
            }
            Import { setlist, file } => {
                app.status("Importing", file.display());
                let imported: Setlist = read_json(&file).context("Could not import setlist")?;
                let setlist = setlist_mut(library, &setlist)?;
                setlist.replace_with(imported);
                app.status("Replaced", format!("setlist '{}'", setlist.name));

                let setlist = setlist.clone();
                let missing = setlist.items.len() - library.setlist_songs(&setlist).count();
                if missing > 0 {
                    app.warning(format!("{} item(s) refer to songs not in the library", missing));
                }
            }
            Show { setlist, view } => {
                let title = project.settings.title.as_str();
                let context = RenderContext::setlist(title, &project.library, &setlist, view)?;
                if context.skipped > 0 {
                    app.warning(format!(
                        "{} item(s) refer to songs that no longer exist",
                        context.skipped
                    ));
                }
                return to_text(&context);
            }
        }

        Ok(String::new())
    }
}
