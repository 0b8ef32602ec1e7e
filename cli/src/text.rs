use std::{fs, path::Path};

use anyhow::Context;
use encoding_rs::Encoding;
use forest_engine::{Catalog, GameConfig};

/// Reads a text file, honoring a UTF-8/UTF-16 BOM when present.
pub fn read_text_auto(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<GameConfig> {
    match path {
        Some(path) => GameConfig::parse(&read_text_auto(path)?, path),
        None => Ok(GameConfig::default()),
    }
}

pub fn load_catalog(path: Option<&Path>, locale: &str) -> anyhow::Result<Catalog> {
    match path {
        Some(path) => {
            let text = read_text_auto(path)?;
            Catalog::from_json_str(&text)
                .with_context(|| format!("failed to load catalog: {}", path.display()))
        }
        None => Catalog::builtin_locale(locale)
            .with_context(|| format!("failed to load built-in catalog '{locale}'")),
    }
}

pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
