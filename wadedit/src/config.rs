//! Where the thing type table comes from.

use std::path::{Path, PathBuf};

use dirs::config_dir;
use level::log::{info, warn};
use level::{ConfigError, ThingTypes};

use crate::BASE_DIR;

const LOG_TAG: &str = "Config";
const THINGS_FILE: &str = "things.json";

fn default_things_file() -> Option<PathBuf> {
    let mut dir = config_dir()?;
    dir.push(BASE_DIR);
    dir.push(THINGS_FILE);
    Some(dir)
}

/// Load from `path` if given, which must then exist. Otherwise try the user
/// config dir and fall back to an empty table.
pub fn load_thing_types(path: Option<&str>) -> Result<ThingTypes, ConfigError> {
    if let Some(path) = path {
        return ThingTypes::load(Path::new(path));
    }
    match default_things_file() {
        Some(path) if path.exists() => ThingTypes::load(&path),
        Some(path) => {
            info!(target: LOG_TAG, "No thing types at {:?}", path);
            Ok(ThingTypes::default())
        }
        None => {
            warn!(target: LOG_TAG, "Couldn't find the user config dir");
            Ok(ThingTypes::default())
        }
    }
}
