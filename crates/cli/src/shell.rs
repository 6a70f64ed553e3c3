//! Interactive shell.
//!
//! Plain lines are search input: each one replaces the pending search, and
//! only the last line of a burst is rendered once typing pauses. Lines
//! starting with `:` are looked up in the command table and run at once.
//! A background task prints the cart badge whenever the cart changes.

use std::ops::ControlFlow;
use std::time::Duration;

use domain_shop_core::cart::KeyValueStore;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::commands::{self, Input};
use crate::debounce::Debouncer;
use crate::render;
use crate::session::{Reply, Session};

/// Run the shell on stdin until EOF or `:quit`.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub async fn run<S: KeyValueStore>(
    session: &mut Session<S>,
    debounce: Duration,
) -> std::io::Result<()> {
    run_with(session, BufReader::new(tokio::io::stdin()), debounce).await
}

/// Run the shell over any line source.
///
/// # Errors
///
/// Returns an error if `input` cannot be read.
pub async fn run_with<S, R>(
    session: &mut Session<S>,
    input: R,
    debounce: Duration,
) -> std::io::Result<()>
where
    S: KeyValueStore,
    R: AsyncBufRead + Unpin,
{
    let mut changes = session.subscribe();
    let observer = tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            let badge = render::badge(&changes.borrow_and_update());
            render::emit(&badge);
        }
    });

    render::emit(&render::help());

    let mut debouncer = Debouncer::new(debounce);
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if handle_line(session, &mut debouncer, &line).await.is_break() {
            break;
        }
    }

    debouncer.cancel();
    observer.abort();
    Ok(())
}

async fn handle_line<S: KeyValueStore>(
    session: &mut Session<S>,
    debouncer: &mut Debouncer,
    line: &str,
) -> ControlFlow<()> {
    match commands::parse(line) {
        Input::Empty => {}
        Input::Query(query) => {
            let engine = session.search_engine().clone();
            let query = query.to_string();
            debouncer.schedule(move || {
                render::emit(&render::results(&query, engine.search(&query).as_ref()));
            });
        }
        Input::Unknown(name) => {
            render::emit(&format!("Unknown command :{name} (try :help)"));
        }
        Input::Command(command, args) => {
            // A command supersedes whatever search was still being typed
            debouncer.cancel();
            // Another process may have written the cart file since the last command
            if let Err(err) = session.cart().reload() {
                tracing::warn!(error = %err, "Failed to reload cart");
            }
            match session.execute(command.action, args).await {
                Ok(Reply::Text(text)) => render::emit(&text),
                Ok(Reply::Redirect(url)) => render::emit(&format!("Continue to payment: {url}")),
                Ok(Reply::Quit) => return ControlFlow::Break(()),
                Err(err) => {
                    tracing::debug!(error = %err, command = command.name, "Command failed");
                    render::emit(&format!("Error: {}", err.user_message()));
                }
            }
        }
    }
    ControlFlow::Continue(())
}
