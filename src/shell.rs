// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write as _;

use log::{debug, error};
use tokio::io::{self, AsyncBufReadExt as _, BufReader};

use crate::{
    backend::Backend,
    command::{self, Command as _},
    error::Result,
    feedback,
};

async fn print_feedback(mut rx: feedback::Receiver) {
    while let Ok(change) = rx.changed().await {
        if let Some(message) = change {
            println!("{message}");
        }
    }
}

async fn print_prompt<B: Backend>(ctx: &command::Context<'_, B>) -> Result<()> {
    let session = ctx.panel.session().await;
    let prompt = match session.username() {
        Some(username) if session.is_authenticated() => format!("{username}> "),
        _ => "giriş> ".to_owned(),
    };

    let mut stdout = std::io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;
    Ok(())
}

/// Reads commands from standard input until it closes or the operator quits.
/// Failed commands never end the loop.
pub(crate) async fn run<B: Backend>(ctx: &command::Context<'_, B>) -> Result<()> {
    let printer = tokio::spawn(print_feedback(ctx.panel.feedback().subscribe()));
    let mut lines = BufReader::new(io::stdin()).lines();

    println!("Type `help` for a list of commands.");
    print_prompt(ctx).await?;
    while let Some(line) = lines.next_line().await? {
        if !line.trim().is_empty() {
            match command::Line::parse_line(&line) {
                Ok(command::Line {
                    command: command::Shell::Quit,
                }) => break,
                Ok(command::Line { command: cmd }) => {
                    if !cmd.is_available(ctx.panel.is_authenticated().await) {
                        error!("That command is not available right now");
                    } else if ctx.panel.is_busy() {
                        error!("Please wait for the current request to finish");
                    } else if let Err(e) = cmd.execute(ctx).await {
                        debug!("Command failed: {}", e);
                    }
                }
                Err(e) => e.print()?,
            }
        }
        print_prompt(ctx).await?;
    }

    printer.abort();
    Ok(())
}
