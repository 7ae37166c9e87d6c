use crate::{api, cli::actions::Action};
use anyhow::Result;

/// Handle the server action
/// # Errors
/// Return error if the server fails to start
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server { port, dsn } => {
            api::new(port, dsn).await?;
        }
    }

    Ok(())
}
