use std::iter;

use lexical_sort::lexical_cmp;

use crate::prelude::*;

/// PathBuf extension
pub trait PathBufExt {
    /// If the path is relative, resolve it as absolute wrt. `base_dir`
    fn resolve(&mut self, base_dir: &Path);
    fn resolved(self, base_dir: &Path) -> Self;
}

impl PathBufExt for PathBuf {
    fn resolve(&mut self, base_dir: &Path) {
        if self.is_relative() {
            *self = base_dir.join(&self);
        }
    }

    fn resolved(mut self, base_dir: &Path) -> Self {
        self.resolve(base_dir);
        self
    }
}

// Lexical sorting
// Basically forwards to the lexical-sort crate

pub fn sort_lexical<S>(slice: &mut [S])
where
    S: AsRef<str>,
{
    sort_lexical_by(slice, AsRef::as_ref)
}

pub fn sort_lexical_by<T, F>(slice: &mut [T], mut key_fn: F)
where
    F: FnMut(&T) -> &str,
{
    slice.sort_by(|lhs, rhs| lexical_cmp(key_fn(lhs), key_fn(rhs)));
}

// Ids

/// Generates a random identifier shaped like a version 4 UUID.
pub fn uid() -> String {
    let mut hex = iter::repeat_with(|| fastrand::u8(..16));
    let mut digits = |n: usize| -> String {
        hex.by_ref()
            .take(n)
            .map(|d| char::from_digit(d as u32, 16).unwrap_or('0'))
            .collect()
    };

    let variant = char::from_digit(8 + fastrand::u32(..4), 16).unwrap_or('8');
    format!(
        "{}-{}-4{}-{}{}-{}",
        digits(8),
        digits(4),
        digits(3),
        variant,
        digits(3),
        digits(12)
    )
}

#[cfg(test)]
mod tests;
