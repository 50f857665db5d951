use serde::Deserialize;

use crate::prelude::*;
use crate::render::ViewKind;

#[derive(Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Auto,
    Txt,
    Json,
}

impl Default for Format {
    fn default() -> Self {
        Self::Auto
    }
}

#[derive(Deserialize, Debug)]
pub struct Output {
    pub file: PathBuf,

    #[serde(default)]
    pub format: Format,
    #[serde(default)]
    pub view: ViewKind,
    /// Name or id of the setlist to render, the whole book if unset.
    pub setlist: Option<String>,
}

impl Output {
    pub fn resolve(&mut self, dir_output: &Path) -> Result<()> {
        self.file.resolve(dir_output);

        if self.format != Format::Auto {
            return Ok(());
        }

        let ext = self
            .file
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        self.format = match ext.as_deref() {
            Some("txt") | Some("text") => Format::Txt,
            Some("json") => Format::Json,
            _ => bail!(
                "Unknown or unsupported format of output file: {}\nHint: Specify format with  \
                 'format = ...'",
                self.file.display()
            ),
        };

        Ok(())
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn output_filename(&self) -> String {
        self.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(toml_src: &str) -> Output {
        toml::from_str(toml_src).unwrap()
    }

    #[test]
    fn format_from_extension() {
        let dir = Path::new("/book/output");

        let mut out = output(r#"file = "book.TXT""#);
        out.resolve(dir).unwrap();
        assert_eq!(out.format(), Format::Txt);
        assert_eq!(out.file, Path::new("/book/output/book.TXT"));
        assert_eq!(out.output_filename(), "book.TXT");

        let mut out = output(r#"file = "book.json""#);
        out.resolve(dir).unwrap();
        assert_eq!(out.format(), Format::Json);

        let mut out = output(r#"file = "book.pdf""#);
        let err = out.resolve(dir).unwrap_err();
        assert!(err.to_string().contains("book.pdf"));
    }

    #[test]
    fn explicit_format() {
        let mut out = output(
            r#"
            file = "book.out"
            format = "json"
            view = "lyrics"
            setlist = "Sunday"
            "#,
        );
        out.resolve(Path::new("/tmp")).unwrap();
        assert_eq!(out.format(), Format::Json);
        assert_eq!(out.view, ViewKind::Lyrics);
        assert_eq!(out.setlist.as_deref(), Some("Sunday"));
    }
}
