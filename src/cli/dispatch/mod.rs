use crate::cli::actions::Action;
use anyhow::Result;

/// Map parsed arguments to an [`Action`]
/// # Errors
/// Return error if a required argument is missing
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        dsn: matches
            .get_one("dsn")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --dsn"))?,
    })
}
