//! Inspect or clear the saved conversation without opening the TUI.

use std::error::Error;
use std::io::{BufRead, Write};

use crate::api::ChatApi;
use crate::cli::say::format_message;
use crate::core::session::{SessionAction, SessionRuntime, Status};
use crate::core::store::Store;

pub async fn run_history<S, A, W>(
    runtime: &mut SessionRuntime<S, A>,
    out: &mut W,
) -> Result<(), Box<dyn Error>>
where
    S: Store,
    A: ChatApi + 'static,
    W: Write,
{
    runtime.restore().await;
    let transcript = runtime.session().transcript();
    if transcript.is_empty() {
        writeln!(out, "No saved conversation.")?;
        return Ok(());
    }
    for message in transcript {
        writeln!(out, "{}", format_message(message))?;
    }
    Ok(())
}

fn confirmed<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<bool, Box<dyn Error>> {
    write!(out, "Clear the whole conversation? [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Clear the saved conversation after confirmation. `assume_yes` skips the
/// prompt.
pub async fn run_clear<S, A, R, W>(
    runtime: &mut SessionRuntime<S, A>,
    assume_yes: bool,
    input: &mut R,
    out: &mut W,
) -> Result<(), Box<dyn Error>>
where
    S: Store,
    A: ChatApi + 'static,
    R: BufRead,
    W: Write,
{
    runtime.restore().await;
    runtime.dispatch(SessionAction::RequestClear).await;

    if !assume_yes && !confirmed(input, out)? {
        runtime.dispatch(SessionAction::CancelClear).await;
        writeln!(out, "Kept the conversation.")?;
        return Ok(());
    }

    runtime.dispatch(SessionAction::ConfirmClear).await;
    match runtime.session().status() {
        Status::HistoryCleared => {
            writeln!(out, "✅ Conversation cleared")?;
            Ok(())
        }
        Status::StorageError(err) => Err(format!("could not clear conversation: {err}").into()),
        other => Err(format!("unexpected state after clear: {other}").into()),
    }
}
