use clap::Subcommand;
use limner_core::GameConfig;
use limner_store::LimnerPaths;
use std::path::Path;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (e.g. max_attempts)
        key: String,
        /// Config value (true/false/number/string)
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values, defaults included
    List,
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, paths: &LimnerPaths) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Set { key, value } => set(paths, &key, &value),
        ConfigCmd::Get { key } => get(paths, &key),
        ConfigCmd::List => list(paths),
    }
}

// ── Command Implementations ──

type ConfigMap = serde_json::Map<String, serde_json::Value>;

/// Read `config.json` as a raw map. Empty if the file doesn't exist.
fn read_config(path: &Path) -> anyhow::Result<ConfigMap> {
    if !path.exists() {
        return Ok(ConfigMap::new());
    }
    let content = std::fs::read_to_string(path)?;
    match serde_json::from_str::<serde_json::Value>(&content)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Ok(ConfigMap::new()),
    }
}

fn write_config(path: &Path, config: &ConfigMap) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    limner_store::write_atomic(path, json.as_bytes())
}

/// Parse a string value into an appropriate JSON value (bool/number/string).
fn parse_value(s: &str) -> serde_json::Value {
    match s {
        "true" => serde_json::Value::Bool(true),
        "false" => serde_json::Value::Bool(false),
        _ => {
            if let Ok(n) = s.parse::<i64>() {
                serde_json::Value::Number(n.into())
            } else if let Ok(f) = s.parse::<f64>() {
                serde_json::json!(f)
            } else {
                serde_json::Value::String(s.to_string())
            }
        }
    }
}

/// Known keys, taken from the serialized defaults.
fn known_keys() -> anyhow::Result<ConfigMap> {
    match serde_json::to_value(GameConfig::default())? {
        serde_json::Value::Object(map) => Ok(map),
        _ => anyhow::bail!("game config did not serialize to an object"),
    }
}

/// `limner config set <key> <value>`
pub fn set(paths: &LimnerPaths, key: &str, value: &str) -> anyhow::Result<()> {
    if !known_keys()?.contains_key(key) {
        anyhow::bail!("unknown config key '{key}' (see `limner config list`)");
    }
    let mut config = read_config(&paths.config_json)?;
    config.insert(key.to_string(), parse_value(value));

    // Refuse writes that would leave an unloadable or invalid file behind.
    GameConfig::from_json_str(&serde_json::to_string(&config)?)?;

    write_config(&paths.config_json, &config)?;
    println!("{key} = {value}");
    Ok(())
}

/// `limner config get <key>`
pub fn get(paths: &LimnerPaths, key: &str) -> anyhow::Result<()> {
    let config = read_config(&paths.config_json)?;
    match config.get(key) {
        Some(val) => println!("{val}"),
        None => match known_keys()?.get(key) {
            Some(default) => println!("{default} (default)"),
            None => println!("(not set)"),
        },
    }
    Ok(())
}

/// `limner config list`
pub fn list(paths: &LimnerPaths) -> anyhow::Result<()> {
    let config = read_config(&paths.config_json)?;
    for (k, default) in known_keys()? {
        match config.get(&k) {
            Some(v) => println!("{k} = {v}"),
            None => println!("{k} = {default} (default)"),
        }
    }
    Ok(())
}
