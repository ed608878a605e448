use limner_core::GameConfig;
use limner_serve::ServeConfig;
use limner_store::LimnerPaths;

pub fn execute(paths: &LimnerPaths, bind: &str, port: u16) -> anyhow::Result<()> {
    let game = GameConfig::load(&paths.config_json)?;
    let config = ServeConfig {
        bind: bind.to_string(),
        port,
    };
    tokio::runtime::Runtime::new()?.block_on(limner_serve::serve(&paths.catalog_db, game, config))
}
