use std::process::ExitCode;

use client::{Client, Router, Session, View};
use notify::{Notice, NoticeLevel};

use crate::error::{AppError, Result};

mod commands;
mod config;
mod error;
mod notify;
mod report;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let (config, command) = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expense_tracker={level},client={level},engine={level}",
            level = config.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let session = Session::load_or_empty(&config.state_path);
    let client = Client::new(&config.base_url, session)?;
    let router = Router::new(View::Login);
    let mut events = client.subscribe();

    let result = commands::run(&client, &router, command).await;

    if router.handle_pending(&mut events).await {
        notify::info("Session expired, please log in again.");
    }

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            report_failure(&err);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn report_failure(err: &AppError) {
    match err {
        AppError::Failed { source, .. } => tracing::error!("{err}: {source}"),
        other => tracing::error!("{other}"),
    }
    Notice::new(NoticeLevel::Error, err.to_string())
        .with_detail(err.detail())
        .show();
}
