use argh::FromArgs;
use level::log;

/// Inspect the maps in a WAD and write it back out
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug
    #[argh(option)]
    pub verbose: Option<log::LevelFilter>,
    /// thing type table (JSON). Defaults to wadedit/things.json in the user
    /// config dir
    #[argh(option)]
    pub things: Option<String>,
    /// show details for one map, e.g. E1M1 or MAP01
    #[argh(option)]
    pub level: Option<String>,
    /// rebuild every map from its graph and write the archive here
    #[argh(option)]
    pub save: Option<String>,
    /// write the saved archive as a PWAD
    #[argh(switch)]
    pub pwad: bool,
    /// path to the WAD to open
    #[argh(positional)]
    pub wad: String,
}
