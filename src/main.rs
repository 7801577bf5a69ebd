#![windows_subsystem = "windows"]

use anyhow::Result;
use paymygas::{config::WalletEnv, gui, user_settings::ShowcaseSettings};
use tracing_subscriber;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let env = WalletEnv::from_env();
    let settings = ShowcaseSettings::load();
    gui::launch(env, settings)?;

    Ok(())
}
