use std::fs;

use once_cell::sync::Lazy;

use crate::book::{demo_song, Library, Setlist};
use crate::prelude::*;
use crate::project::{write_json, PROJECT_FILE};

/// A filesystem node of a new project.
#[derive(Debug)]
enum Node {
    File {
        path: PathBuf,
        content: &'static [u8],
    },
    Library {
        path: PathBuf,
        library: Library,
    },
    Dir {
        path: PathBuf,
    },
}

impl Node {
    fn file(path: impl Into<PathBuf>, content: &'static str) -> Self {
        Self::File {
            path: path.into(),
            content: content.as_bytes(),
        }
    }

    fn library(path: impl Into<PathBuf>, library: Library) -> Self {
        Self::Library {
            path: path.into(),
            library,
        }
    }

    fn dir(path: impl Into<PathBuf>) -> Self {
        Self::Dir { path: path.into() }
    }

    fn path(&self) -> &Path {
        match self {
            Self::File { path, .. } => path,
            Self::Library { path, .. } => path,
            Self::Dir { path } => path,
        }
    }

    fn is_dir(&self) -> bool {
        matches!(self, Self::Dir { .. })
    }

    fn exists(&self) -> bool {
        self.path().exists()
    }

    fn resolved(&self, base: &Path) -> Self {
        match self {
            Self::File { path, content } => Self::File {
                path: path.clone().resolved(base),
                content: *content,
            },
            Self::Library { path, library } => Self::Library {
                path: path.clone().resolved(base),
                library: library.clone(),
            },
            Self::Dir { path } => Self::Dir {
                path: path.clone().resolved(base),
            },
        }
    }

    fn create(&self) -> Result<()> {
        let dir_path = if self.is_dir() {
            Some(self.path())
        } else {
            self.path().parent()
        };
        if let Some(dir_path) = dir_path {
            fs::create_dir_all(dir_path)
                .with_context(|| format!("Could not create directory `{}`", dir_path.display()))?;
        }

        match self {
            Self::File { path, content } => fs::write(path, content)
                .with_context(|| format!("Could not initialize file `{}`", path.display())),
            Self::Library { path, library } => write_json(library, path)
                .with_context(|| format!("Could not initialize file `{}`", path.display())),
            Self::Dir { .. } => Ok(()),
        }
    }
}

/// Library of a new project: the demo song and a setlist playing it a whole tone up.
pub fn demo_library() -> Library {
    let mut library = Library::default();
    let song_id = library.add_song(demo_song()).id.clone();

    let mut setlist = Setlist::new("Demo");
    setlist.add_song(song_id);
    setlist.shift_transpose(0, 2);
    library.setlists.push(setlist);

    library
}

#[derive(Debug)]
pub struct DefaultProject {
    nodes: Vec<Node>,
}

impl DefaultProject {
    fn new() -> Self {
        let nodes = vec![
            // Project file:
            Node::file(PROJECT_FILE, include_str!("../default/chartbook.toml")),
            // Songs and setlists:
            Node::library("library.json", demo_library()),
            // Output dir:
            Node::dir("output"),
        ];

        Self { nodes }
    }

    pub fn resolve(&self, project_dir: &Path) -> DefaultProjectResolved {
        let nodes = self
            .nodes
            .iter()
            .map(|f| f.resolved(project_dir))
            .collect();

        DefaultProjectResolved(Self { nodes })
    }

    fn any_exists(&self) -> Option<&Node> {
        self.nodes.iter().find(|&f| f.exists())
    }
}

pub struct DefaultProjectResolved(DefaultProject);

impl DefaultProjectResolved {
    pub fn create(self) -> Result<()> {
        let project = self.0;

        if let Some(existing) = project.any_exists() {
            bail!("File already exists: '{}'", existing.path().display());
        }

        for node in &project.nodes[..] {
            node.create()?;
        }

        Ok(())
    }

    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.0
            .nodes
            .iter()
            .filter(|node| !node.is_dir())
            .map(Node::path)
    }

    pub fn dirs(&self) -> impl Iterator<Item = &Path> {
        self.0.nodes.iter().filter(|node| node.is_dir()).map(Node::path)
    }
}

pub static DEFAULT_PROJECT: Lazy<DefaultProject> = Lazy::new(DefaultProject::new);
