use std::error::Error;
use std::io::Write;

use crate::api::ChatApi;
use crate::core::mode::Mode;
use crate::core::session::{SessionAction, SessionRuntime, Status};
use crate::core::store::Store;

/// Show the persisted mode, or persist a new one.
pub async fn run_mode<S, A, W>(
    runtime: &mut SessionRuntime<S, A>,
    mode: Option<Mode>,
    out: &mut W,
) -> Result<(), Box<dyn Error>>
where
    S: Store,
    A: ChatApi + 'static,
    W: Write,
{
    runtime.restore().await;

    let Some(mode) = mode else {
        writeln!(out, "{}", runtime.session().mode())?;
        return Ok(());
    };

    runtime.dispatch(SessionAction::SetMode { mode }).await;
    if let Status::StorageError(err) = runtime.session().status() {
        return Err(format!("could not save mode: {err}").into());
    }
    writeln!(out, "✅ Mode set to {mode}")?;
    Ok(())
}
