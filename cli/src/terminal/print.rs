use std::io::{self, BufWriter, Write};

use anyhow::Context;

/// Writes each entry on its own stdout line.
pub fn lines<T: AsRef<str>>(entries: &[T]) -> anyhow::Result<()> {
    let stdout = io::stdout();
    write_lines(&mut BufWriter::new(stdout.lock()), entries).context("writing results to stdout")
}

fn write_lines<W: Write, T: AsRef<str>>(out: &mut W, entries: &[T]) -> io::Result<()> {
    for entry in entries {
        writeln!(out, "{}", entry.as_ref())?;
    }
    out.flush()
}
