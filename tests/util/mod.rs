#![allow(dead_code)]

use std::fs;

use chartbook::app::App;
use chartbook::prelude::*;
use chartbook::project::Project;

pub use indoc::indoc;

const INT_DIR: &str = "int-test-workdirs";

pub fn assert_file_contains<P: AsRef<Path>>(path: P, what: &str) {
    let path = path.as_ref();
    let content = fs::read_to_string(path).unwrap();
    assert!(
        content.contains(what),
        "String `{}` not found in file: `{}`\nFile contents:\n{}",
        what,
        path.display(),
        content
    );
}

pub fn int_dir() -> PathBuf {
    // Old cargos don't set CARGO_TARGET_TMPDIR
    option_env!("CARGO_TARGET_TMPDIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            [env!("CARGO_MANIFEST_DIR"), "target", INT_DIR]
                .iter()
                .collect()
        })
}

#[derive(Debug)]
pub struct Builder {
    pub project: Project,
    pub dir: PathBuf,
    pub app: App,
}

impl Builder {
    pub fn app() -> App {
        App::with_test_mode()
    }

    pub fn work_dir(name: &str, rm: bool) -> Result<PathBuf> {
        let path = int_dir().join(name);

        if rm && path.exists() {
            fs::remove_dir_all(&path).with_context(|| {
                format!("Couldn't remove previous test run data: `{}`", path.display())
            })?;
        }

        Ok(path)
    }

    /// Creates a default project in a fresh work dir and makes it.
    pub fn init_and_build(name: &str) -> Result<Self> {
        let app = Self::app();
        let work_dir = Self::work_dir(name, true)?;
        fs::create_dir_all(&work_dir)
            .with_context(|| format!("Could create directory: `{}`", work_dir.display()))?;

        chartbook::chartbook_init_at(&app, &work_dir).context("Failed to initialize")?;
        let project = chartbook::chartbook_make_at(&app, &work_dir)?;

        Ok(Self {
            project,
            dir: work_dir,
            app,
        })
    }

    /// Re-reads the project from disk and makes it again.
    pub fn rebuild(self) -> Result<Self> {
        let project = chartbook::chartbook_make_at(&self.app, &self.dir)?;
        Ok(Self { project, ..self })
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.project.settings.dir_output().join(name)
    }

    pub fn read_output(&self, name: &str) -> String {
        fs::read_to_string(self.output(name)).unwrap()
    }
}
