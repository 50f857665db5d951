//! Songs, sections and setlists of a chart book.
//!
//! The JSON layout (camelCase keys) is the same one used for export and import.

use serde::{Deserialize, Serialize};

use crate::music::Accidentals;
use crate::util::uid;

pub type Id = String;

const DEFAULT_CHORDS: &str = "| C - G - Am - F |";
const DEFAULT_MIXED_CHORDS: &str = "| C - G |";
const NEW_SONG_CHORDS: &str = "| C - F - G - C |";

#[derive(Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display, Debug)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Index of the neighbour in this direction, if it's within `0..len`.
    fn neighbour(self, index: usize, len: usize) -> Option<usize> {
        let j = match self {
            Direction::Up => index.checked_sub(1)?,
            Direction::Down => index + 1,
        };
        if index < len && j < len {
            Some(j)
        } else {
            None
        }
    }
}

/// Swaps `slice[index]` with its neighbour, returns whether anything moved.
fn move_in<T>(slice: &mut [T], index: usize, dir: Direction) -> bool {
    match dir.neighbour(index, slice.len()) {
        Some(j) => {
            slice.swap(index, j);
            true
        }
        None => false,
    }
}

#[derive(
    Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::EnumString, strum::Display, Debug,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LineKind {
    Chords,
    Lyrics,
    Mixed,
}

impl Default for LineKind {
    fn default() -> LineKind {
        LineKind::Chords
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Default, Debug)]
pub struct SectionLine {
    #[serde(default)]
    pub kind: LineKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
}

impl SectionLine {
    pub fn chords(chords: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Chords,
            chords: Some(chords.into()),
            lyrics: None,
        }
    }

    pub fn lyrics(lyrics: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Lyrics,
            chords: None,
            lyrics: Some(lyrics.into()),
        }
    }

    pub fn mixed(chords: impl Into<String>, lyrics: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Mixed,
            chords: Some(chords.into()),
            lyrics: Some(lyrics.into()),
        }
    }

    /// A fresh line of the given kind, prefilled the way a new line in the editor is.
    pub fn default_of(kind: LineKind) -> Self {
        match kind {
            LineKind::Chords => Self::chords(DEFAULT_CHORDS),
            LineKind::Lyrics => Self::lyrics(""),
            LineKind::Mixed => Self::mixed(DEFAULT_MIXED_CHORDS, ""),
        }
    }

    fn matches(&self, query: &str) -> bool {
        let contains = |text: &Option<String>| {
            text.as_deref()
                .map_or(false, |t| t.to_lowercase().contains(query))
        };
        contains(&self.chords) || contains(&self.lyrics)
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Section {
    #[serde(default = "uid")]
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub lines: Vec<SectionLine>,
}

impl Section {
    pub fn new(name: impl Into<String>, lines: Vec<SectionLine>) -> Self {
        Self {
            id: uid(),
            name: name.into(),
            lines,
        }
    }

    pub fn add_line(&mut self, kind: LineKind) -> &mut SectionLine {
        self.lines.push(SectionLine::default_of(kind));
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    #[serde(default)]
    pub id: Id,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefer_sharps: Option<bool>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Song {
    pub fn new(title: impl Into<String>, prefer_sharps: bool) -> Self {
        Self {
            id: uid(),
            title: title.into(),
            artist: None,
            key: "C".into(),
            prefer_sharps: Some(prefer_sharps),
            sections: vec![Section::new(
                "Intro",
                vec![SectionLine::chords(NEW_SONG_CHORDS)],
            )],
        }
    }

    /// The song's own preference, or `global` if it has none.
    pub fn accidentals(&self, global: Accidentals) -> Accidentals {
        self.prefer_sharps.map_or(global, Accidentals::from)
    }

    pub fn artist(&self) -> &str {
        self.artist.as_deref().unwrap_or("")
    }

    /// Looks up a section by 1-based number, id, or case-insensitive name.
    pub fn find_section(&self, reference: &str) -> Option<&Section> {
        if let Ok(number) = reference.trim().parse::<usize>() {
            return number.checked_sub(1).and_then(|i| self.sections.get(i));
        }

        find_by(&self.sections, reference, |s| s.id.as_str(), |s| s.name.as_str())
            .map(|i| &self.sections[i])
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    pub fn add_section(&mut self, name: impl Into<String>) -> &mut Section {
        self.sections.push(Section::new(
            name,
            vec![SectionLine::default_of(LineKind::Chords)],
        ));
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    pub fn remove_section(&mut self, id: &str) -> Option<Section> {
        let pos = self.sections.iter().position(|s| s.id == id)?;
        Some(self.sections.remove(pos))
    }

    pub fn move_section(&mut self, id: &str, dir: Direction) -> bool {
        match self.sections.iter().position(|s| s.id == id) {
            Some(pos) => move_in(&mut self.sections, pos, dir),
            None => false,
        }
    }

    /// Replaces the song with an imported one, keeping the current id if the import has none.
    pub fn replace_with(&mut self, mut imported: Song) {
        if imported.id.is_empty() {
            imported.id = std::mem::take(&mut self.id);
        }
        *self = imported;
    }

    /// Case-insensitive match against title, artist, chords and lyrics.
    /// `query` is expected to be lowercase already.
    fn matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(query)
            || self.artist().to_lowercase().contains(query)
            || self
                .sections
                .iter()
                .flat_map(|s| s.lines.iter())
                .any(|l| l.matches(query))
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SetlistItem {
    pub song_id: Id,
    #[serde(default)]
    pub transpose: i32,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Setlist {
    #[serde(default)]
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub items: Vec<SetlistItem>,
}

impl Setlist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uid(),
            name: name.into(),
            items: vec![],
        }
    }

    pub fn add_song(&mut self, song_id: impl Into<Id>) {
        self.items.push(SetlistItem {
            song_id: song_id.into(),
            transpose: 0,
        });
    }

    pub fn remove_item(&mut self, index: usize) -> Option<SetlistItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn move_item(&mut self, index: usize, dir: Direction) -> bool {
        move_in(&mut self.items, index, dir)
    }

    /// Replaces the setlist with an imported one, keeping the current id if the import has none.
    pub fn replace_with(&mut self, mut imported: Setlist) {
        if imported.id.is_empty() {
            imported.id = std::mem::take(&mut self.id);
        }
        *self = imported;
    }

    /// Adjusts an item's transpose offset by `delta`, returns the new offset.
    pub fn shift_transpose(&mut self, index: usize, delta: i32) -> Option<i32> {
        let item = self.items.get_mut(index)?;
        item.transpose = item.transpose.saturating_add(delta);
        Some(item.transpose)
    }
}

#[derive(
    Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::EnumString, strum::Display, Debug,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl Default for Theme {
    fn default() -> Theme {
        Theme::System
    }
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub prefer_sharps_global: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            prefer_sharps_global: true,
        }
    }
}

impl Preferences {
    pub fn accidentals(&self) -> Accidentals {
        self.prefer_sharps_global.into()
    }
}

/// Parts of a library read from an import file, anything missing is left alone.
#[derive(Deserialize, Default, Debug)]
pub struct ImportBundle {
    pub songs: Option<Vec<Song>>,
    pub setlists: Option<Vec<Setlist>>,
    pub settings: Option<Preferences>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Default, Debug)]
pub struct Library {
    #[serde(default)]
    pub songs: Vec<Song>,
    #[serde(default)]
    pub setlists: Vec<Setlist>,
    #[serde(default)]
    pub settings: Preferences,
}

/// Looks up by id first, then by case-insensitive name.
fn find_by<T>(
    items: &[T],
    reference: &str,
    id: impl Fn(&T) -> &str,
    name: impl Fn(&T) -> &str,
) -> Option<usize> {
    items.iter().position(|x| id(x) == reference).or_else(|| {
        let reference = reference.trim().to_lowercase();
        items
            .iter()
            .position(|x| name(x).trim().to_lowercase() == reference)
    })
}

impl Library {
    pub fn accidentals(&self) -> Accidentals {
        self.settings.accidentals()
    }

    /// Creates a new song at the top of the list.
    pub fn new_song(&mut self, title: impl Into<String>) -> &mut Song {
        let song = Song::new(title, self.settings.prefer_sharps_global);
        self.add_song(song)
    }

    pub fn add_song(&mut self, mut song: Song) -> &mut Song {
        if song.id.is_empty() {
            song.id = uid();
        }
        self.songs.insert(0, song);
        &mut self.songs[0]
    }

    pub fn remove_song(&mut self, id: &str) -> Option<Song> {
        let pos = self.songs.iter().position(|s| s.id == id)?;
        Some(self.songs.remove(pos))
    }

    pub fn song(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == id)
    }

    pub fn find_song(&self, reference: &str) -> Option<&Song> {
        find_by(&self.songs, reference, |s| s.id.as_str(), |s| s.title.as_str()).map(|i| &self.songs[i])
    }

    pub fn find_song_mut(&mut self, reference: &str) -> Option<&mut Song> {
        find_by(&self.songs, reference, |s| s.id.as_str(), |s| s.title.as_str()).map(move |i| &mut self.songs[i])
    }

    /// Songs matching `query` in library order, all of them if the query is blank.
    pub fn search(&self, query: &str) -> Vec<&Song> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.songs.iter().collect();
        }

        self.songs.iter().filter(|s| s.matches(&query)).collect()
    }

    pub fn new_setlist(&mut self, name: impl Into<String>) -> &mut Setlist {
        self.setlists.insert(0, Setlist::new(name));
        &mut self.setlists[0]
    }

    pub fn remove_setlist(&mut self, id: &str) -> Option<Setlist> {
        let pos = self.setlists.iter().position(|s| s.id == id)?;
        Some(self.setlists.remove(pos))
    }

    pub fn find_setlist(&self, reference: &str) -> Option<&Setlist> {
        find_by(&self.setlists, reference, |s| s.id.as_str(), |s| s.name.as_str()).map(|i| &self.setlists[i])
    }

    pub fn find_setlist_mut(&mut self, reference: &str) -> Option<&mut Setlist> {
        find_by(&self.setlists, reference, |s| s.id.as_str(), |s| s.name.as_str())
            .map(move |i| &mut self.setlists[i])
    }

    /// Resolves setlist items to songs, skipping items whose song no longer exists.
    pub fn setlist_songs<'a>(
        &'a self,
        setlist: &'a Setlist,
    ) -> impl Iterator<Item = (&'a SetlistItem, &'a Song)> + 'a {
        setlist
            .items
            .iter()
            .filter_map(move |item| self.song(&item.song_id).map(|song| (item, song)))
    }

    /// Replaces whatever parts `bundle` carries.
    pub fn import(&mut self, bundle: ImportBundle) {
        if let Some(songs) = bundle.songs {
            self.songs = songs;
        }
        if let Some(setlists) = bundle.setlists {
            self.setlists = setlists;
        }
        if let Some(settings) = bundle.settings {
            self.settings = settings;
        }
        self.fill_ids();
    }

    /// Gives a fresh id to every song and setlist that has none.
    pub fn fill_ids(&mut self) {
        let songs = self.songs.iter_mut().map(|s| &mut s.id);
        let setlists = self.setlists.iter_mut().map(|s| &mut s.id);
        songs
            .chain(setlists)
            .filter(|id| id.is_empty())
            .for_each(|id| *id = uid());
    }
}

/// The song every new project starts with.
pub fn demo_song() -> Song {
    let verse_lyrics = [
        "Amazing grace, how sweet the sound",
        "That saved a wretch like me",
        "I once was lost, but now am found",
        "Was blind, but now I see",
    ];
    let chorus_lyrics = [
        "My chains are gone, I've been set free",
        "My God, my Savior has ransomed me",
    ];

    Song {
        id: uid(),
        title: "Amazing Grace (Demo)".into(),
        artist: Some("Traditional".into()),
        key: "G".into(),
        prefer_sharps: Some(true),
        sections: vec![
            Section::new("Intro", vec![SectionLine::chords("| G - Em - D - C |")]),
            Section::new(
                "Verse",
                vec![
                    SectionLine::chords("| G - D/F# - Em - D - C - Am - D |"),
                    SectionLine::lyrics(verse_lyrics.join("\n")),
                ],
            ),
            Section::new(
                "Chorus",
                vec![
                    SectionLine::chords("| G - Em - Am - C |"),
                    SectionLine::lyrics(chorus_lyrics.join("\n")),
                ],
            ),
        ],
    }
}
