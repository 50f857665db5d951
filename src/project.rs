use std::fs::{self, File};
use std::io::{BufWriter, Write};

use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::book::{ImportBundle, Library};
use crate::default_project::DEFAULT_PROJECT;
use crate::error::{ErrorReadingFile, ErrorWritingFile};
use crate::prelude::*;
use crate::render::{RenderContext, Renderer};

mod output;
pub use output::{Format, Output};

pub const PROJECT_FILE: &str = "chartbook.toml";

fn library_file() -> PathBuf {
    "library.json".into()
}

fn dir_output() -> PathBuf {
    "output".into()
}

fn default_title() -> String {
    "Chart Book".into()
}

#[derive(Deserialize, Debug)]
pub struct Settings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "library_file")]
    library: PathBuf,
    #[serde(default = "dir_output")]
    dir_output: PathBuf,

    #[serde(default)]
    pub output: Vec<Output>,
}

impl Settings {
    pub fn from_file(path: &Path, project_dir: &Path) -> Result<Settings> {
        let contents = fs::read_to_string(path)
            .map_err(|err| ErrorReadingFile(path.to_owned(), err))
            .context("Failed to read project file")?;

        let mut settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Could not parse project file '{}'", path.display()))?;

        settings.resolve(project_dir)?;
        Ok(settings)
    }

    pub fn dir_output(&self) -> &Path {
        self.dir_output.as_ref()
    }

    pub fn library_path(&self) -> &Path {
        self.library.as_ref()
    }

    fn resolve(&mut self, project_dir: &Path) -> Result<()> {
        self.library.resolve(project_dir);
        self.dir_output.resolve(project_dir);

        for output in self.output.iter_mut() {
            output.resolve(&self.dir_output)?;
        }

        Ok(())
    }
}

pub fn read_json<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let contents =
        fs::read_to_string(path).map_err(|err| ErrorReadingFile(path.to_owned(), err))?;
    let value = serde_json::from_str(&contents)
        .with_context(|| format!("Could not parse JSON file '{}'", path.display()))?;
    Ok(value)
}

/// Writes `value` as pretty JSON, the format of the library, exports and imports.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let write_err = |err| ErrorWritingFile(path.to_owned(), err);

    let mut file = File::create(path).map(BufWriter::new).map_err(write_err)?;
    serde_json::to_writer_pretty(&mut file, value).map_err(|err| write_err(err.into()))?;
    writeln!(file).map_err(write_err)?;
    file.flush().map_err(write_err)?;
    Ok(())
}

#[derive(Debug)]
pub struct Project {
    pub project_dir: PathBuf,
    pub settings: Settings,
    pub library: Library,
}

impl Project {
    pub fn new<P: AsRef<Path>>(app: &App, cwd: P) -> Result<Project> {
        let cwd = cwd.as_ref();
        let (project_file, project_dir) = Self::find_in_parents(cwd).ok_or_else(|| {
            anyhow!(
                "Could not find {} file in current or parent directories\nCurrent directory: '{}'",
                PROJECT_FILE,
                cwd.display()
            )
        })?;

        app.status("Loading", format!("project at {}", project_dir.display()));

        let settings = Settings::from_file(&project_file, &project_dir)?;
        let mut library: Library =
            read_json(settings.library_path()).context("Could not load library")?;
        library.fill_ids();

        let project = Project {
            project_dir,
            settings,
            library,
        };
        app.detail(
            "Loaded",
            format!(
                "{} songs, {} setlists",
                project.library.songs.len(),
                project.library.setlists.len()
            ),
        );

        Ok(project)
    }

    fn find_in_parents(start_dir: &Path) -> Option<(PathBuf, PathBuf)> {
        let mut parent = start_dir;
        loop {
            let project_file = parent.join(PROJECT_FILE);
            if project_file.exists() {
                return Some((project_file, parent.into()));
            }

            parent = parent.parent()?;
        }
    }

    pub fn init<P: AsRef<Path>>(project_dir: P) -> Result<()> {
        DEFAULT_PROJECT.resolve(project_dir.as_ref()).create()
    }

    pub fn save(&self, app: &App) -> Result<()> {
        let path = self.settings.library_path();
        app.detail("Saving", path.display());
        write_json(&self.library, path).context("Could not save library")
    }

    pub fn export(&self, app: &App, path: &Path) -> Result<()> {
        app.status("Exporting", path.display());
        write_json(&self.library, path)
    }

    /// Replaces library parts present in the file at `path`, the caller saves.
    pub fn import(&mut self, app: &App, path: &Path) -> Result<()> {
        app.status("Importing", path.display());
        let bundle: ImportBundle = read_json(path)?;
        self.library.import(bundle);
        Ok(())
    }

    pub fn render(&self, app: &App) -> Result<()> {
        fs::create_dir_all(self.settings.dir_output()).with_context(|| {
            format!(
                "Could not create output directory '{}'",
                self.settings.dir_output().display()
            )
        })?;

        self.settings.output.iter().try_for_each(|output| {
            app.status("Rendering", output.output_filename());
            let context = || format!("Could not render output file '{}'", output.output_filename());

            let renderer = Renderer::new(output);
            let render_context = RenderContext::for_output(self, output).with_context(context)?;
            if render_context.skipped > 0 {
                app.warning(format!(
                    "{}: {} setlist item(s) refer to songs that no longer exist",
                    output.output_filename(),
                    render_context.skipped
                ));
            }

            renderer.render(&render_context).with_context(context)
        })
    }

    pub fn output_paths(&self) -> impl Iterator<Item = &Path> {
        self.settings.output.iter().map(|o| o.file.as_path())
    }
}
