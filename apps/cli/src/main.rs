//! vetdischarge CLI: turn a veterinary consultation record into a
//! plain-language discharge note for the pet owner.

mod commands;

use color_eyre::eyre::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    // Existing environment variables take precedence over `.env`.
    let dotenv = dotenvy::dotenv();
    let cli = commands::parse_args();
    commands::init_tracing(&cli);
    if let Ok(path) = &dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
    commands::run(cli).await
}
