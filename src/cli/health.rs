use std::error::Error;
use std::io::Write;

use crate::api::{ChatApi, HealthStatus};

/// Probe the chat service once. An unhealthy service is reported as an
/// error so scripts can check the exit status.
pub async fn run_health<A, W>(api: &A, base_url: &str, out: &mut W) -> Result<(), Box<dyn Error>>
where
    A: ChatApi + ?Sized,
    W: Write,
{
    let health = api.check_health().await;
    writeln!(out, "{base_url}: {health}")?;
    match health {
        HealthStatus::Connected => Ok(()),
        HealthStatus::Degraded(_) | HealthStatus::Unreachable => {
            Err(format!("chat service is {health}").into())
        }
    }
}
