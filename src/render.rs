//! Terminal rendering of a counter set.
//!
//! [`Renderer`] formats a [`Progress`] snapshot as two aligned columns and
//! writes the result to any [`io::Write`] sink in a single call. It supports
//! two modes:
//!
//! - **in-place**: the output is preceded by a clear-to-end-of-screen
//!   sequence and followed by a cursor-up sequence, so the next render
//!   overwrites the same terminal region instead of appending lines;
//! - **static**: no control sequences at all, suitable as a final report or
//!   for non-terminal sinks.
//!
//! Example output:
//!
//! ```text
//!
//! Progress:
//!   done       15
//!   errors      3
//!   skipped     7
//!
//! ```
//!
//! The renderer owns a scratch buffer that is reused across calls, so
//! repeated rendering does not allocate once the buffer has warmed up. A
//! `Renderer` is `&mut self` per render and must not be shared across
//! threads; independent renderers over the same `Progress` are fine.

use std::io::{self, Write};
use std::sync::Arc;

use thiserror::Error;

use crate::progress::Progress;

/// Error produced by a render.
///
/// The only failure mode is the sink refusing the write; the renderer never
/// retries internally.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The sink failed to accept the rendered buffer.
    #[error("write error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;

// Clear from the cursor to the end of the screen.
const CLEAR_TO_END: &[u8] = b"\x1b[J";

/// Renders a [`Progress`] as an aligned two-column report.
///
/// # Examples
///
/// ```rust
/// use progresso::{Progress, Renderer};
///
/// let progress = Progress::new();
/// progress.set("bar", 20);
/// progress.set("foo", -100);
/// progress.set("grault", 0);
///
/// let mut out = Vec::new();
/// Renderer::new().render(&progress, &mut out, "Progress:", false).unwrap();
///
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "\nProgress:\n  bar       20\n  foo     -100\n  grault     0\n\n",
/// );
/// ```
#[derive(Debug, Default)]
pub struct Renderer {
    buf: Vec<u8>,
    entries: Vec<(Arc<str>, i64)>,
}

impl Renderer {
    /// Creates a renderer with an empty scratch buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Formats the current counters and writes them to `out` in one call.
    ///
    /// Column widths are recomputed from the current snapshot on every
    /// render: names are left-padded to the widest name, values are
    /// right-aligned (space-padded) to the widest formatted value. When
    /// `in_place` is true the report is wrapped in the ANSI clear and
    /// cursor-up sequences so the next render overwrites it.
    ///
    /// The store is never mutated; entries appear in ascending
    /// lexicographic key order.
    pub fn render<W>(
        &mut self,
        progress: &Progress,
        out: &mut W,
        title: &str,
        in_place: bool,
    ) -> Result<()>
    where
        W: Write + ?Sized,
    {
        self.buf.clear();
        self.entries.clear();

        let mut key_width = 0;
        let mut value_width = 0;
        for (key, value) in progress.iter() {
            key_width = key_width.max(key.len());
            value_width = value_width.max(decimal_width(value));
            self.entries.push((key, value));
        }

        if in_place {
            self.buf.extend_from_slice(CLEAR_TO_END);
        }

        self.buf.push(b'\n');
        self.buf.extend_from_slice(title.as_bytes());
        self.buf.push(b'\n');

        for (key, value) in &self.entries {
            self.buf.extend_from_slice(b"  ");
            self.buf.extend_from_slice(key.as_bytes());
            pad_spaces(&mut self.buf, key_width - key.len());
            self.buf.extend_from_slice(b"  ");
            pad_spaces(&mut self.buf, value_width - decimal_width(*value));
            write!(self.buf, "{value}")?;
            self.buf.push(b'\n');
        }

        self.buf.push(b'\n');

        if in_place {
            // Move the cursor back up to the start of the report: counter
            // lines plus the two blank lines and the title. More reliable
            // than save/restore of the cursor position.
            write!(self.buf, "\x1b[{}A", self.entries.len() + 3)?;
        }

        out.write_all(&self.buf)?;
        Ok(())
    }
}

impl Progress {
    /// Writes a one-shot static report of the current counters to `out`.
    ///
    /// Equivalent to a non-in-place [`Renderer::render`] with a fresh
    /// renderer. For periodic in-place reporting use
    /// [`Reporter`](crate::Reporter).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progresso::Progress;
    ///
    /// let progress = Progress::new();
    /// progress.inc("done", 42);
    /// progress.pretty_print(&mut std::io::stdout(), "Final progress:").unwrap();
    /// ```
    pub fn pretty_print<W>(&self, out: &mut W, title: &str) -> Result<()>
    where
        W: Write + ?Sized,
    {
        Renderer::new().render(self, out, title, false)
    }
}

fn pad_spaces(buf: &mut Vec<u8>, n: usize) {
    buf.extend(std::iter::repeat(b' ').take(n));
}

/// Width of `value` formatted in decimal: digit count, plus one for the
/// minus sign when negative. Zero has width 1.
fn decimal_width(value: i64) -> usize {
    let digits = match value.unsigned_abs() {
        0 => 1,
        n => n.ilog10() as usize + 1,
    };
    digits + usize::from(value < 0)
}
