// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::{Parser, Subcommand};

use crate::{backend::Backend, error::Result, panel::Panel, password};

pub(crate) mod edit;
pub(crate) mod session;
pub(crate) mod show;
pub(crate) mod sync;

/// What a command may use while it runs.
pub(crate) struct Context<'ctx, B: Backend> {
    pub(crate) panel: &'ctx Panel<B>,
    pub(crate) prompt: &'ctx dyn password::Prompt,
    pub(crate) default_username: Option<&'ctx str>,
}

#[async_trait]
pub(crate) trait Command {
    async fn execute<B: Backend>(self, ctx: &Context<'_, B>) -> Result<()>;
}

/// One line typed at the shell.
#[derive(Debug, Parser)]
#[command(multicall = true)]
pub(crate) struct Line {
    #[command(subcommand)]
    pub(crate) command: Shell,
}

impl Line {
    /// Parses a line typed at the shell. Arguments are split on whitespace,
    /// except that a district name keeps its spacing.
    pub(crate) fn parse_line(line: &str) -> Result<Self, clap::Error> {
        let mut parsed = Self::try_parse_from(line.split_whitespace())?;
        if let Shell::SetName(ref mut cmd) = parsed.command {
            cmd.raw = Some(after_tokens(line, 2).to_owned());
        }
        Ok(parsed)
    }
}

/// Returns the rest of `line` after `count` whitespace-separated tokens and
/// the one separator character that follows them.
fn after_tokens(line: &str, count: usize) -> &str {
    let mut rest = line;
    for _ in 0..count {
        rest = rest.trim_start();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = rest.get(end..).unwrap_or_default();
    }

    let mut chars = rest.chars();
    _ = chars.next();
    chars.as_str()
}

#[derive(Debug, Subcommand)]
pub(crate) enum Shell {
    Login(session::Login),
    Logout(session::Logout),
    Show(show::Show),
    Fetch(sync::Fetch),
    Save(sync::Save),
    SetBase(edit::SetBase),
    SetName(edit::SetName),
    SetCost(edit::SetCost),
    AddDistrict(edit::AddDistrict),
    RemoveDistrict(edit::RemoveDistrict),
    /// Leave the shell. Unsaved changes are lost.
    #[command(alias = "exit")]
    Quit,
}

impl Shell {
    /// Only logging in is possible without a session, and logging in again is
    /// not possible with one.
    pub(crate) const fn is_available(&self, authenticated: bool) -> bool {
        match *self {
            Self::Login(_) => !authenticated,
            Self::Quit => true,
            Self::Logout(_)
            | Self::Show(_)
            | Self::Fetch(_)
            | Self::Save(_)
            | Self::SetBase(_)
            | Self::SetName(_)
            | Self::SetCost(_)
            | Self::AddDistrict(_)
            | Self::RemoveDistrict(_) => authenticated,
        }
    }
}

#[async_trait]
impl Command for Shell {
    async fn execute<B: Backend>(self, ctx: &Context<'_, B>) -> Result<()> {
        match self {
            Self::Login(cmd) => cmd.execute(ctx).await,
            Self::Logout(cmd) => cmd.execute(ctx).await,
            Self::Show(cmd) => cmd.execute(ctx).await,
            Self::Fetch(cmd) => cmd.execute(ctx).await,
            Self::Save(cmd) => cmd.execute(ctx).await,
            Self::SetBase(cmd) => cmd.execute(ctx).await,
            Self::SetName(cmd) => cmd.execute(ctx).await,
            Self::SetCost(cmd) => cmd.execute(ctx).await,
            Self::AddDistrict(cmd) => cmd.execute(ctx).await,
            Self::RemoveDistrict(cmd) => cmd.execute(ctx).await,
            Self::Quit => Ok(()),
        }
    }
}
