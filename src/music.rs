//! Pitch classes, chord tokens and transposition.
//!
//! Everything in here is a pure function of its inputs. Malformed input
//! is never an error: tokens that don't look like chords are passed through.

use std::borrow::Cow;
use std::fmt;
use std::ops;

use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::EnumString, strum::Display, Debug,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
/// Which accidental to use when spelling a black key.
pub enum Accidentals {
    #[serde(alias = "sharp")]
    #[strum(to_string = "sharps", serialize = "sharp", serialize = "#")]
    Sharps,
    #[serde(alias = "flat")]
    #[strum(to_string = "flats", serialize = "flat", serialize = "b")]
    Flats,
}

impl Default for Accidentals {
    fn default() -> Accidentals {
        Accidentals::Sharps
    }
}

impl From<bool> for Accidentals {
    /// `true` means sharps are preferred.
    fn from(prefer_sharps: bool) -> Accidentals {
        if prefer_sharps {
            Accidentals::Sharps
        } else {
            Accidentals::Flats
        }
    }
}

impl Accidentals {
    pub fn prefer_sharps(self) -> bool {
        self == Accidentals::Sharps
    }
}

pub const SHARP_SPELLINGS: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
pub const FLAT_SPELLINGS: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Every accepted note spelling with its pitch class.
pub const NOTE_SPELLINGS: [(&str, u8); 21] = [
    ("C", 0),
    ("B#", 0),
    ("C#", 1),
    ("Db", 1),
    ("D", 2),
    ("D#", 3),
    ("Eb", 3),
    ("E", 4),
    ("Fb", 4),
    ("F", 5),
    ("E#", 5),
    ("F#", 6),
    ("Gb", 6),
    ("G", 7),
    ("G#", 8),
    ("Ab", 8),
    ("A", 9),
    ("A#", 10),
    ("Bb", 10),
    ("B", 11),
    ("Cb", 11),
];

/// Returns `true` if `s` is one of the accepted note spellings, eg. `"Db"` or `"E#"`.
pub fn is_note_spelling(s: &str) -> bool {
    PitchClass::from_spelling(s).is_some()
}

/// Represents a half-tone in a 12-tone chromatic scale in equal temperament
/// tuning, starting from C (ie. C = 0, C# = 1, ...)
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct PitchClass(u8);

impl From<i32> for PitchClass {
    fn from(i: i32) -> PitchClass {
        PitchClass(i.rem_euclid(12) as u8)
    }
}

impl ops::Add for PitchClass {
    type Output = PitchClass;
    fn add(self, other: PitchClass) -> PitchClass {
        PitchClass((self.0 + other.0) % 12)
    }
}

impl PitchClass {
    /// Reduces any integer into `0..12` using true modulo, so `-1` becomes `11`.
    pub fn new(i: i32) -> PitchClass {
        i.into()
    }

    pub fn num(&self) -> u8 {
        self.0
    }

    pub fn from_spelling(spelling: &str) -> Option<PitchClass> {
        NOTE_SPELLINGS
            .iter()
            .find(|(name, _)| *name == spelling)
            .map(|&(_, pc)| PitchClass(pc))
    }

    pub fn spelling(&self, accidentals: Accidentals) -> &'static str {
        let i = self.0 as usize;
        match accidentals {
            Accidentals::Sharps => SHARP_SPELLINGS[i],
            Accidentals::Flats => FLAT_SPELLINGS[i],
        }
    }

    pub fn transposed<C>(self, by: C) -> PitchClass
    where
        C: Into<PitchClass>,
    {
        self + by.into()
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.spelling(Accidentals::Sharps))
    }
}

/// A pitched chord split into its parts, borrowing from the source token.
///
/// `extension` is whatever sits between the root and the optional `/bass`
/// and is never interpreted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ParsedChord<'s> {
    pub root: &'s str,
    pub extension: &'s str,
    pub bass: Option<&'s str>,
}

/// A single whitespace-delimited token that looks like a chord.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ChordToken<'s> {
    /// `N.C.` or `NC`, never transposed.
    NoChord(&'s str),
    Chord(ParsedChord<'s>),
}

const NO_CHORD_MARKERS: &[&str] = &["N.C.", "NC"];

fn is_extension_char(c: char) -> bool {
    !(c.is_whitespace() || c == '/' || c == '|')
}

/// Parses a note name (`A`-`G` plus an optional single `#` or `b`) at the start
/// of `src`. Returns the note and the size of it in bytes.
fn parse_note_span(src: &str) -> Option<(&str, usize)> {
    let mut chars = src.chars();
    match chars.next() {
        Some('A'..='G') => {}
        _ => return None,
    }

    let size = match chars.next() {
        Some('#') | Some('b') => 2,
        _ => 1,
    };

    Some((&src[..size], size))
}

impl<'s> ParsedChord<'s> {
    fn parse(src: &'s str) -> Option<Self> {
        let (root, root_size) = parse_note_span(src)?;
        let rest = &src[root_size..];

        let ext_size = rest.find(|c| !is_extension_char(c)).unwrap_or(rest.len());
        let (extension, rest) = rest.split_at(ext_size);

        let bass = if rest.is_empty() {
            None
        } else {
            // Only a slash followed by exactly one note may follow the extension.
            let bass_src = rest.strip_prefix('/')?;
            let (bass, bass_size) = parse_note_span(bass_src)?;
            if bass_size != bass_src.len() {
                return None;
            }
            Some(bass)
        };

        Some(Self {
            root,
            extension,
            bass,
        })
    }
}

impl<'s> ChordToken<'s> {
    /// Classifies a token. On failure, the original token is returned as the error
    /// so that it can be passed through.
    pub fn parse(src: &'s str) -> Result<Self, &'s str> {
        if NO_CHORD_MARKERS.contains(&src) {
            return Ok(ChordToken::NoChord(src));
        }

        ParsedChord::parse(src).map(ChordToken::Chord).ok_or(src)
    }
}

/// Classifies a token without transposing it, eg. for syntax highlighting.
pub fn parse_chord(token: &str) -> Option<ChordToken<'_>> {
    ChordToken::parse(token).ok()
}

/// Shifts a single note spelling, `None` if the spelling isn't known.
fn transpose_note(note: &str, by: PitchClass, accidentals: Accidentals) -> Option<&'static str> {
    PitchClass::from_spelling(note).map(|pc| pc.transposed(by).spelling(accidentals))
}

/// Transposes one token by `steps` half-tones.
///
/// Anything that isn't a pitched chord comes back unchanged. Chords are always
/// respelled, even with `steps == 0`, so `Db` becomes `C#` with sharps.
pub fn transpose_token(token: &str, steps: i32, accidentals: Accidentals) -> Cow<'_, str> {
    let chord = match ChordToken::parse(token) {
        Ok(ChordToken::Chord(chord)) => chord,
        Ok(ChordToken::NoChord(_)) | Err(_) => return Cow::Borrowed(token),
    };

    let by = PitchClass::new(steps);
    let root = match transpose_note(chord.root, by, accidentals) {
        Some(root) => root,
        None => return Cow::Borrowed(token),
    };
    let bass = chord
        .bass
        .map(|bass| transpose_note(bass, by, accidentals).unwrap_or(bass));

    let bass_len = bass.map_or(0, |b| b.len() + 1);
    let mut res = String::with_capacity(root.len() + chord.extension.len() + bass_len);
    res.push_str(root);
    res.push_str(chord.extension);
    if let Some(bass) = bass {
        res.push('/');
        res.push_str(bass);
    }

    Cow::Owned(res)
}

/// Splits a line into alternating runs of whitespace and non-whitespace.
#[derive(Debug)]
struct Segments<'s> {
    rest: &'s str,
}

impl<'s> Iterator for Segments<'s> {
    /// The segment and whether it is whitespace.
    type Item = (&'s str, bool);

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let space = first.is_whitespace();
        let split = self
            .rest
            .find(|c: char| c.is_whitespace() != space)
            .unwrap_or(self.rest.len());

        let (segment, rest) = self.rest.split_at(split);
        self.rest = rest;
        Some((segment, space))
    }
}

/// Transposes every chord token in `line`. Whitespace between tokens is kept as is.
pub fn transpose_line(line: &str, steps: i32, accidentals: Accidentals) -> String {
    Segments { rest: line }.fold(String::with_capacity(line.len()), |mut res, (seg, space)| {
        if space {
            res.push_str(seg);
        } else {
            res.push_str(&transpose_token(seg, steps, accidentals));
        }
        res
    })
}

/// Transposes a block of chord lines, each line on its own.
pub fn transpose_text(text: &str, steps: i32, accidentals: Accidentals) -> String {
    text.split('\n')
        .map(|line| transpose_line(line, steps, accidentals))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Step count and accidental preference bundled together.
#[derive(Clone, Copy, PartialEq, Eq, Default, Serialize, Debug)]
pub struct Transposition {
    pub steps: i32,
    pub accidentals: Accidentals,
}

impl Transposition {
    pub fn new(steps: i32, accidentals: Accidentals) -> Self {
        Self { steps, accidentals }
    }

    pub fn apply_token<'s>(&self, token: &'s str) -> Cow<'s, str> {
        transpose_token(token, self.steps, self.accidentals)
    }

    pub fn apply_line(&self, line: &str) -> String {
        transpose_line(line, self.steps, self.accidentals)
    }

    pub fn apply_text(&self, text: &str) -> String {
        transpose_text(text, self.steps, self.accidentals)
    }
}
