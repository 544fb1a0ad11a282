mod run;

use anyhow::Result;
use std::rc::Rc;

use vfxbudget::config;
use vfxbudget::store::{KeyValueStore, MemoryStore, SqliteStore};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let config = config::load_config();
    let store = open_store();
    run::as_cli(&args, store, &config)
}

/// The on-disk store, or an in-memory one when it cannot be opened so the
/// session still works.
fn open_store() -> Rc<dyn KeyValueStore> {
    let opened = config::data_file_path().and_then(|path| SqliteStore::open(&path));
    match opened {
        Ok(store) => Rc::new(store),
        Err(e) => {
            log::warn!("{e:#}. Changes will not be saved.");
            Rc::new(MemoryStore::new())
        }
    }
}
