//! Command line front end for the map editor core.
//!
//! Lists the maps in a WAD, prints what one of them holds, and can write the
//! archive back out after rebuilding every map from its editable form.

mod cli;
mod config;

use std::collections::BTreeMap;
use std::error::Error;

use cli::CLIOptions;
use level::log::{self, info};
use level::{Level, LevelSlot, ThingTypes, scan};
use simplelog::TermLogger;
use wad::{Archive, WadKind};

const BASE_DIR: &str = "wadedit/";

fn main() -> Result<(), Box<dyn Error>> {
    let options: CLIOptions = argh::from_env();

    TermLogger::init(
        options.verbose.unwrap_or(log::LevelFilter::Warn),
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let bytes = std::fs::read(&options.wad)?;
    let mut archive = Archive::parse(&bytes)?;
    info!("Opened {} ({} lumps)", options.wad, archive.len());

    let types = config::load_thing_types(options.things.as_deref())?;
    let levels = scan(&archive);

    println!("{}: {:?}, {} lumps", options.wad, archive.kind(), archive.len());
    println!("{}", level_list(&levels));

    if let Some(name) = &options.level {
        let slot = levels
            .iter()
            .find(|l| l.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| format!("no map named {} in {}", name, options.wad))?;
        let level = slot.level(&archive)?;
        println!("{}", describe(level, &types));
    }

    if let Some(path) = &options.save {
        for slot in &levels {
            slot.level(&archive)?;
        }
        for slot in &levels {
            slot.write_back(&mut archive)?;
        }
        if options.pwad {
            archive.set_kind(WadKind::PWad);
        }
        std::fs::write(path, archive.serialize())?;
        println!("Saved {} maps to {}", levels.len(), path);
    }
    Ok(())
}

fn level_list(levels: &[LevelSlot]) -> String {
    if levels.is_empty() {
        return "No maps found".to_string();
    }
    let names: Vec<&str> = levels.iter().map(|l| l.name()).collect();
    format!("{} maps: {}", levels.len(), names.join(" "))
}

/// Stats, extents and a per category count of the map's things
fn describe(level: &Level, types: &ThingTypes) -> String {
    let mut out = format!("{}\n{}", level.name(), level.stats());
    if let Some(ext) = level.extents() {
        out += &format!(
            "\n  extents:    ({}, {}) to ({}, {}), {}x{}",
            ext.min.x,
            ext.min.y,
            ext.max.x,
            ext.max.y,
            ext.width(),
            ext.height()
        );
    }

    let mut by_category: BTreeMap<&str, usize> = BTreeMap::new();
    let mut unknown: BTreeMap<i16, usize> = BTreeMap::new();
    for (_, thing) in level.things() {
        if types.is_known(thing.kind) {
            *by_category.entry(thing.info(types).category.as_str()).or_default() += 1;
        } else {
            *unknown.entry(thing.kind).or_default() += 1;
        }
    }
    for (category, count) in &by_category {
        out += &format!("\n  {:<11} {}", format!("{}:", category), count);
    }
    if !unknown.is_empty() {
        let kinds: Vec<String> = unknown.iter().map(|(k, n)| format!("{}x{}", n, k)).collect();
        out += &format!("\n  unknown:    {}", kinds.join(", "));
    }
    out
}
