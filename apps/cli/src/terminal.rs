//! Terminal rendition of the results surface: results and totals on one
//! stream, alerts on another.

use std::{
    io::{self, Stderr, Stdout, Write},
    sync::Mutex,
};

use client_core::{RenderedResults, ResultsSurface};
use tracing::warn;

pub struct TerminalSurface<O: Write, E: Write> {
    out: Mutex<O>,
    err: Mutex<E>,
}

impl TerminalSurface<Stdout, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> TerminalSurface<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> (O, E) {
        let out = self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        let err = self.err.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        (out, err)
    }

    fn write_lines(stream: &Mutex<O>, lines: &[String]) -> io::Result<()> {
        let mut guard = stream.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for line in lines {
            writeln!(guard, "{line}")?;
        }
        guard.flush()
    }
}

impl<O: Write, E: Write> ResultsSurface for TerminalSurface<O, E> {
    fn render(&self, results: &RenderedResults) {
        if let Err(err) = Self::write_lines(&self.out, &results.lines()) {
            warn!(error = %err, "failed to write results");
        }
    }

    fn set_total(&self, total: u64) {
        if let Err(err) = Self::write_lines(&self.out, &[format!("Total combinations: {total}")]) {
            warn!(error = %err, "failed to write total");
        }
    }

    fn alert(&self, message: &str) {
        let mut guard = self.err.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(err) = writeln!(guard, "{message}").and_then(|_| guard.flush()) {
            warn!(error = %err, "failed to write alert");
        }
    }
}
