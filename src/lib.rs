//! `chartbook`, a chord chart book with transposable setlists.
//!
//! #### **This is not a public API.**
//! This library is an implementation detail of the `chartbook` CLI tool,
//! with the exception of the [`music`] module, which has no dependencies
//! on the rest of the crate and may be used on its own.

use std::env;
use std::ffi::OsString;
use std::io::{self, BufRead, Write};

use clap::Parser as _;
use serde::Serialize;

pub mod app;
pub mod book;
pub mod default_project;
pub mod error;
pub mod library_cmd;
pub mod music;
pub mod prelude;
pub mod project;
pub mod render;
pub mod util;

use crate::app::{App, StdioOpts};
use crate::book::Theme;
use crate::error::LookupError;
use crate::library_cmd::{SetlistCmd, SongCmd};
use crate::music::{transpose_line, transpose_text, Accidentals, Transposition};
use crate::prelude::*;
use crate::project::Project;
use crate::render::{to_text, RenderContext, ViewKind};

#[derive(Serialize, Clone, Debug)]
pub struct ProgramMeta {
    name: &'static str,
    version: &'static str,
    description: &'static str,
    homepage: &'static str,
    authors: &'static str,
}

pub const PROGRAM_META: ProgramMeta = ProgramMeta {
    name: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
    description: env!("CARGO_PKG_DESCRIPTION"),
    homepage: env!("CARGO_PKG_HOMEPAGE"),
    authors: env!("CARGO_PKG_AUTHORS"),
};

#[derive(clap::Parser)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = "chartbook: Chord charts, setlists and transposition",
)]
struct Cli {
    #[clap(flatten)]
    stdio: StdioOpts,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(clap::Parser)]
enum Cmd {
    #[command(about = "Initialize a new chartbook project skeleton in this directory")]
    Init,
    #[command(about = "Render all outputs of the current project")]
    Make,
    #[command(about = "Transpose chord text given as arguments, or stdin line by line")]
    Transpose {
        #[arg(
            short,
            long,
            allow_hyphen_values = true,
            help = "Semitones to transpose by, may be negative"
        )]
        steps: i32,
        #[arg(short, long, help = "Spell accidentals as sharps or flats [default: sharps]")]
        accidentals: Option<Accidentals>,
        #[arg(help = "Chord text, read from stdin if not given")]
        text: Vec<String>,
    },
    #[command(about = "List songs, optionally filtered by a search query")]
    Songs {
        #[arg(help = "Matched against titles, artists, chords and lyrics")]
        query: Option<String>,
    },
    #[command(about = "Print a song's chart")]
    Show {
        #[arg(help = "Song id or title")]
        song: String,
        #[arg(
            short,
            long,
            default_value_t = 0,
            allow_hyphen_values = true,
            help = "Semitones to transpose by"
        )]
        steps: i32,
        #[arg(short, long, help = "sharps or flats, the song's preference by default")]
        accidentals: Option<Accidentals>,
        #[arg(long, default_value_t, help = "mixed, chords or lyrics")]
        view: ViewKind,
    },
    #[command(subcommand, about = "Add, edit, remove, export or import songs")]
    Song(SongCmd),
    #[command(subcommand, about = "Manage setlists")]
    Setlist(SetlistCmd),
    #[command(about = "Show or change preferences")]
    Prefs {
        #[arg(long, help = "Global accidental preference, sharps or flats")]
        accidentals: Option<Accidentals>,
        #[arg(long, help = "light, dark or system")]
        theme: Option<Theme>,
    },
    #[command(about = "Write songs, setlists and preferences to a JSON file")]
    Export {
        #[arg(help = "Destination file")]
        file: PathBuf,
    },
    #[command(about = "Replace library contents with those of a JSON file")]
    Import {
        #[arg(help = "Source file, as written by export")]
        file: PathBuf,
    },
}

fn print(text: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
        .context("Could not write to stdout")
}

impl Cmd {
    fn run(self, app: &App) -> Result<()> {
        use Cmd::*;

        match self {
            Init => chartbook_init(app),
            Make => chartbook_make(app),
            Transpose {
                steps,
                accidentals,
                text,
            } => {
                let accidentals = accidentals.unwrap_or_default();
                if text.is_empty() {
                    chartbook_transpose_stdin(steps, accidentals)
                } else {
                    print(&chartbook_transpose(&text, steps, accidentals))
                }
            }
            Songs { query } => {
                let cwd = get_cwd()?;
                print(&chartbook_songs_at(app, &cwd, query.as_deref().unwrap_or(""))?)
            }
            Show {
                song,
                steps,
                accidentals,
                view,
            } => {
                let cwd = get_cwd()?;
                print(&chartbook_show_at(app, &cwd, &song, steps, accidentals, view)?)
            }
            Song(cmd) => {
                let cwd = get_cwd()?;
                chartbook_song_at(app, &cwd, cmd)
            }
            Setlist(cmd) => {
                let cwd = get_cwd()?;
                print(&chartbook_setlist_at(app, &cwd, cmd)?)
            }
            Prefs { accidentals, theme } => {
                let cwd = get_cwd()?;
                print(&chartbook_prefs_at(app, &cwd, accidentals, theme)?)
            }
            Export { file } => {
                let cwd = get_cwd()?;
                chartbook_export_at(app, &cwd, &file)
            }
            Import { file } => {
                let cwd = get_cwd()?;
                chartbook_import_at(app, &cwd, &file)
            }
        }
    }
}

fn get_cwd() -> Result<PathBuf> {
    env::current_dir().context("Could not read current directory")
}

pub fn chartbook_init_at<P: AsRef<Path>>(app: &App, path: P) -> Result<()> {
    let path = path.as_ref();

    app.status("Initialize", format!("new project at {}", path.display()));
    Project::init(path).context("Could not initialize a new project")?;
    app.success("Done!");
    Ok(())
}

pub fn chartbook_init(app: &App) -> Result<()> {
    let cwd = get_cwd()?;
    chartbook_init_at(app, &cwd)
}

pub fn chartbook_make_at<P: AsRef<Path>>(app: &App, path: P) -> Result<Project> {
    Project::new(app, path.as_ref())
        .and_then(|project| {
            project.render(app)?;
            Ok(project)
        })
        .context("Could not make project")
}

pub fn chartbook_make(app: &App) -> Result<()> {
    let cwd = get_cwd()?;

    chartbook_make_at(app, &cwd)?;
    app.success("Done!");
    Ok(())
}

/// Transposes each of `texts`, output has one text per line.
pub fn chartbook_transpose(texts: &[String], steps: i32, accidentals: Accidentals) -> String {
    texts
        .iter()
        .map(|text| {
            let mut line = transpose_text(text, steps, accidentals);
            line.push('\n');
            line
        })
        .collect()
}

fn chartbook_transpose_stdin(steps: i32, accidentals: Accidentals) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line.context("Could not read from stdin")?;
        writeln!(stdout, "{}", transpose_line(&line, steps, accidentals))
            .context("Could not write to stdout")?;
    }

    Ok(())
}

pub fn chartbook_songs_at<P: AsRef<Path>>(app: &App, path: P, query: &str) -> Result<String> {
    let project = Project::new(app, path.as_ref())?;
    let songs = project.library.search(query);
    if songs.is_empty() {
        app.warning(format!("No songs matching '{}'", query.trim()));
    }

    let list = songs
        .iter()
        .map(|song| {
            let mut line = song.title.clone();
            if !song.artist().is_empty() {
                line.push_str(&format!(" - {}", song.artist()));
            }
            if !song.key.is_empty() {
                line.push_str(&format!(" [{}]", song.key));
            }
            line.push('\n');
            line
        })
        .collect();
    Ok(list)
}

pub fn chartbook_show_at<P: AsRef<Path>>(
    app: &App,
    path: P,
    song: &str,
    steps: i32,
    accidentals: Option<Accidentals>,
    view: ViewKind,
) -> Result<String> {
    let project = Project::new(app, path.as_ref())?;
    let library = &project.library;
    let song = library
        .find_song(song)
        .ok_or_else(|| LookupError::UnknownSong(song.to_owned()))?;

    let accidentals = accidentals.unwrap_or_else(|| song.accidentals(library.accidentals()));
    let transposition = Transposition::new(steps, accidentals);
    let context = RenderContext::single(&project.settings.title, song, transposition, view);
    to_text(&context)
}

pub fn chartbook_song_at<P: AsRef<Path>>(app: &App, path: P, cmd: SongCmd) -> Result<()> {
    let mut project = Project::new(app, path.as_ref())?;
    let modifies = cmd.modifies();
    cmd.run(app, &mut project)?;
    if modifies {
        project.save(app)?;
    }
    Ok(())
}

pub fn chartbook_setlist_at<P: AsRef<Path>>(app: &App, path: P, cmd: SetlistCmd) -> Result<String> {
    let mut project = Project::new(app, path.as_ref())?;
    let modifies = cmd.modifies();
    let output = cmd.run(app, &mut project)?;
    if modifies {
        project.save(app)?;
    }
    Ok(output)
}

pub fn chartbook_prefs_at<P: AsRef<Path>>(
    app: &App,
    path: P,
    accidentals: Option<Accidentals>,
    theme: Option<Theme>,
) -> Result<String> {
    let mut project = Project::new(app, path.as_ref())?;
    let settings = &mut project.library.settings;

    if let Some(accidentals) = accidentals {
        settings.prefer_sharps_global = accidentals.prefer_sharps();
    }
    if let Some(theme) = theme {
        settings.theme = theme;
    }

    let shown = format!(
        "accidentals = {}\ntheme = {}\n",
        settings.accidentals(),
        settings.theme
    );
    if accidentals.is_some() || theme.is_some() {
        project.save(app)?;
    }
    Ok(shown)
}

pub fn chartbook_export_at<P: AsRef<Path>>(app: &App, path: P, file: &Path) -> Result<()> {
    let project = Project::new(app, path.as_ref())?;
    project.export(app, file).context("Could not export library")?;
    app.success("Done!");
    Ok(())
}

pub fn chartbook_import_at<P: AsRef<Path>>(app: &App, path: P, file: &Path) -> Result<()> {
    let mut project = Project::new(app, path.as_ref())?;
    project.import(app, file).context("Could not import library")?;
    project.save(app)?;
    app.success("Done!");
    Ok(())
}

/// Runs the command line given by `args`, returns the process exit code.
pub fn chartbook(args: &[OsString]) -> i32 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { 2 } else { 0 };
        }
    };

    let app = App::new(&cli.stdio);
    match cli.cmd.run(&app) {
        Ok(()) => 0,
        Err(err) => {
            app.error(err);
            1
        }
    }
}
