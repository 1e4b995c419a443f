//! Plain text output.
//!
//! Each group is printed as one path per line. Groups are separated by a
//! single blank line. Nothing is printed when there are no groups, so the
//! output can be piped straight into line-oriented tools.

use std::io::{self, Write};

use crate::duplicates::DuplicateSet;

/// Plain text formatter.
pub struct TextOutput<'a> {
    sets: &'a [DuplicateSet],
}

impl<'a> TextOutput<'a> {
    /// Create a new text formatter.
    #[must_use]
    pub fn new(sets: &'a [DuplicateSet]) -> Self {
        Self { sets }
    }

    /// Write all groups to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (i, set) in self.sets.iter().enumerate() {
            if i > 0 {
                writeln!(writer)?;
            }
            for file in &set.files {
                writeln!(writer, "{}", file)?;
            }
        }
        Ok(())
    }
}
