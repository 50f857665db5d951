use std::io::Write;

use super::{Render, RenderContext};
use crate::prelude::*;

pub struct RJson;

impl Render for RJson {
    fn render(&self, out: &mut dyn Write, context: &RenderContext) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, context)?;
        writeln!(out)?;
        Ok(())
    }
}
