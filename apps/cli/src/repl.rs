//! Line-oriented session where form fields persist between actions, the
//! way inputs on a page do.

use std::io::Write;

use anyhow::Result;
use client_core::{Field, FilterService, FormState, RequestCoordinator, ResultsSurface};
use shared::domain::FilterKind;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Set { field: Field, value: String },
    Unset(Field),
    Fields,
    Generate,
    Filter(String),
    Current,
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplParseError {
    #[error("unknown command '{0}', type 'help' for a list")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    UnknownField(#[from] client_core::form::UnknownField),
}

pub fn parse_line(line: &str) -> Result<ReplCommand, ReplParseError> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command.to_ascii_lowercase().as_str() {
        "" => Ok(ReplCommand::Empty),
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .ok_or(ReplParseError::Usage("set <field> <value>"))?;
            Ok(ReplCommand::Set {
                field: field.parse()?,
                value: value.trim().to_string(),
            })
        }
        "unset" if !rest.is_empty() => Ok(ReplCommand::Unset(rest.parse()?)),
        "unset" => Err(ReplParseError::Usage("unset <field>")),
        "fields" => Ok(ReplCommand::Fields),
        "generate" => Ok(ReplCommand::Generate),
        "filter" if !rest.is_empty() => Ok(ReplCommand::Filter(rest.to_string())),
        "filter" => Err(ReplParseError::Usage("filter <kind>")),
        "current" => Ok(ReplCommand::Current),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" => Ok(ReplCommand::Quit),
        other => Err(ReplParseError::UnknownCommand(other.to_string())),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Default)]
pub struct ReplSession {
    form: FormState,
}

impl ReplSession {
    pub fn new(form: FormState) -> Self {
        Self { form }
    }

    #[cfg(test)]
    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Action failures were already alerted on `surface`, so they do not end
    /// the session; only I/O errors on `out` do.
    pub async fn execute<S, U, W>(
        &mut self,
        command: ReplCommand,
        coordinator: &RequestCoordinator<S>,
        surface: &U,
        out: &mut W,
    ) -> Result<Flow>
    where
        S: FilterService,
        U: ResultsSurface + ?Sized,
        W: Write,
    {
        match command {
            ReplCommand::Empty => {}
            ReplCommand::Set { field, value } => self.form.set(field, value),
            ReplCommand::Unset(field) => {
                self.form.clear(field);
            }
            ReplCommand::Fields => {
                for (field, value) in self.form.iter() {
                    writeln!(out, "{field} = {value}")?;
                }
            }
            ReplCommand::Generate => {
                let _ = coordinator.generate(&self.form, surface).await;
            }
            ReplCommand::Filter(kind) => {
                let _ = coordinator.apply_filter(&kind, &self.form, surface).await;
            }
            ReplCommand::Current => {
                let current = coordinator.current_combinations().await;
                writeln!(out, "{} combinations held", current.len())?;
                let limit = coordinator.render_options().preview_limit;
                for combo in current.iter().take(limit) {
                    writeln!(out, "{combo}")?;
                }
            }
            ReplCommand::Help => write_help(out)?,
            ReplCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    pub async fn run<S, U, R, W>(
        &mut self,
        coordinator: &RequestCoordinator<S>,
        surface: &U,
        input: R,
        out: &mut W,
    ) -> Result<()>
    where
        S: FilterService,
        U: ResultsSurface + ?Sized,
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let command = match parse_line(&line) {
                Ok(command) => command,
                Err(err) => {
                    surface.alert(&err.to_string());
                    continue;
                }
            };
            debug!(?command, "repl command");
            if self.execute(command, coordinator, surface, out).await? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }
}

fn write_help<W: Write>(out: &mut W) -> std::io::Result<()> {
    let fields: Vec<&str> = Field::ALL.iter().map(|f| f.as_str()).collect();
    let kinds: Vec<&str> = FilterKind::ALL.iter().map(|k| k.as_str()).collect();
    writeln!(out, "commands:")?;
    writeln!(out, "  set <field> <value>   set a form field")?;
    writeln!(out, "  unset <field>         clear a form field")?;
    writeln!(out, "  fields                show the form")?;
    writeln!(out, "  generate              request all combinations")?;
    writeln!(out, "  filter <kind>         request filtered combinations")?;
    writeln!(out, "  current               show the last received combinations")?;
    writeln!(out, "  quit                  leave")?;
    writeln!(out, "fields: {}", fields.join(", "))?;
    writeln!(out, "kinds: {}", kinds.join(", "))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/repl_tests.rs"]
mod tests;
