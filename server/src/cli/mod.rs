use crate::cli_error::CliError;
use crate::data_store::{get_store_from_env, TrioStore};
use log::info;

pub mod database_migration;

/// Remove all drinks from the coffee shop menu and restore the initial sample drink.
pub fn reset_drinks() -> Result<(), CliError> {
    let data_store_pool = get_store_from_env()?;
    let mut data_store = data_store_pool.get_facade()?;
    data_store.reset_drinks()?;
    info!("Drinks table has been reset.");
    Ok(())
}
