use anyhow::Result;

use experts15_admin::utils::logging;
use experts15_admin::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = Config::from_env();

    App::initialize(config)?.run().await?;

    Ok(())
}
