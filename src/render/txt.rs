use std::io::{self, Write};

use super::{Render, RenderContext, RenderedSong};
use crate::prelude::*;

/// Plain text chart book, chords above lyrics.
pub struct RTxt;

impl RTxt {
    fn underline(out: &mut dyn Write, text: &str, c: char) -> io::Result<()> {
        let line: String = text.chars().map(|_| c).collect();
        writeln!(out, "{}\n{}", text, line)
    }

    fn write_song(out: &mut dyn Write, num: Option<usize>, song: &RenderedSong) -> io::Result<()> {
        let mut heading = match num {
            Some(num) => format!("{}. {}", num, song.title),
            None => song.title.to_string(),
        };
        if let Some(artist) = song.artist {
            heading.push_str(&format!(" ({})", artist));
        }
        Self::underline(out, &heading, '-')?;

        if !song.key.is_empty() {
            write!(out, "Key: {}", song.key)?;
            let steps = song.transposition.steps;
            if steps != 0 {
                write!(out, " (written in {}, {:+})", song.original_key, steps)?;
            }
            writeln!(out)?;
        }

        for section in song.sections.iter() {
            writeln!(out)?;
            writeln!(out, "{}", section.name.to_uppercase())?;
            for line in section.lines.iter() {
                if let Some(chords) = line.chords.as_deref() {
                    writeln!(out, "{}", chords)?;
                }
                if let Some(lyrics) = line.lyrics {
                    writeln!(out, "{}", lyrics)?;
                }
            }
        }

        Ok(())
    }
}

impl Render for RTxt {
    fn render(&self, out: &mut dyn Write, context: &RenderContext) -> Result<()> {
        match context.setlist {
            Some(setlist) => Self::underline(out, &format!("{}: {}", context.title, setlist), '=')?,
            None => Self::underline(out, context.title, '=')?,
        }

        for (i, song) in context.songs.iter().enumerate() {
            writeln!(out)?;
            let num = context.setlist.map(|_| i + 1);
            Self::write_song(out, num, song)?;
        }

        Ok(())
    }
}
