// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod backend;
mod busy;
mod command;
mod error;
mod feedback;
mod metadata;
mod panel;
mod password;
mod prices;
mod session;
mod shell;
mod sync;

use std::{path::PathBuf, process, time::Duration};

use clap::Parser;
use error::Result;
use log::error;
use url::Url;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The base URL of the price list API.
    #[arg(long, env = "PRICE_ADMIN_URL", default_value = metadata::DEFAULT_URL, value_parser = Url::parse)]
    url: Url,

    /// The username `login` uses when none is given.
    #[arg(long, env = "PRICE_ADMIN_USERNAME")]
    username: Option<String>,

    /// How many seconds status messages stay on screen.
    #[arg(long, env = "PRICE_ADMIN_FEEDBACK_LIFETIME", default_value_t = feedback::DEFAULT_LIFETIME.as_secs())]
    feedback_lifetime: u64,

    /// The path to the Pinentry program to use when asking for the password.
    #[arg(long, value_hint = clap::ValueHint::ExecutablePath)]
    pinentry_program: Option<PathBuf>,
}

async fn run(args: Args) -> Result<()> {
    let prompt: Vec<Box<dyn password::Prompt>> = vec![
        Box::new(args.pinentry_program.clone().map_or_else(
            password::PinentryPrompt::new,
            password::PinentryPrompt::new_with_executable,
        )),
        Box::new(password::RpasswordPrompt),
    ];

    let panel = panel::Panel::new(
        backend::Http::new(args.url)?,
        feedback::Channel::new(Duration::from_secs(args.feedback_lifetime)),
    );
    let ctx = command::Context {
        panel: &panel,
        prompt: &prompt,
        default_username: args.username.as_deref(),
    };

    shell::run(&ctx).await
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("PRICE_ADMIN_LOG", "warn")
        .write_style("PRICE_ADMIN_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}
