//! Doomednum lookup: what a thing's `kind` means to the editor.
//!
//! The table is loaded once from a JSON document and queried read-only by
//! anything that needs a thing's name, size or colour. A document that is not
//! valid JSON is rejected as a whole, but an entry that is incomplete or has a
//! field of the wrong type is skipped with a warning so one bad line in a
//! user's config does not hide every other thing type.
//!
//! ```json
//! { "categories": [
//!     { "name": "Monsters", "color": [255, 0, 0],
//!       "things": [ { "id": 3004, "name": "Former Human", "radius": 20 } ] } ] }
//! ```

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::path::Path;
use std::str::Chars;

use log::{info, warn};
use nanoserde::{DeJson, DeJsonErr, DeJsonState, DeJsonTok};

const LOG_TAG: &str = "ThingTypes";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// `[r, g, b]` with each channel in 0..=255
    fn from_value(value: &JsonValue) -> Option<Self> {
        let channel = |v: &JsonValue| u8::try_from(v.as_int()?).ok();
        match value {
            JsonValue::List(c) => match c.as_slice() {
                [r, g, b] => Some(Rgb::new(channel(r)?, channel(g)?, channel(b)?)),
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThingInfo {
    pub category: String,
    pub name: String,
    pub radius: i16,
    pub color: Rgb,
}

impl ThingInfo {
    fn unknown() -> Self {
        ThingInfo {
            category: "Unknown".to_string(),
            name: "Unknown".to_string(),
            radius: 16,
            color: Rgb::new(255, 0, 255),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(DeJsonErr),
}

impl Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "{}: could not read config: {}", LOG_TAG, e),
            ConfigError::Json(e) => write!(f, "{}: could not parse config: {}", LOG_TAG, e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<DeJsonErr> for ConfigError {
    fn from(e: DeJsonErr) -> Self {
        ConfigError::Json(e)
    }
}

#[derive(Debug, DeJson)]
struct ConfigFile {
    #[nserde(default)]
    categories: Vec<CategoryEntry>,
}

#[derive(Debug, DeJson)]
struct CategoryEntry {
    #[nserde(default)]
    name: JsonValue,
    #[nserde(default)]
    color: JsonValue,
    #[nserde(default)]
    things: JsonValue,
}

/// Any JSON value. Categories and their things are read into this before
/// being checked, so a field of the wrong type only costs its own entry.
#[derive(Debug, Default, Clone, PartialEq)]
enum JsonValue {
    #[default]
    Null,
    Bool,
    Int(i64),
    /// Not usable for any field, only kept to be reported
    Float,
    Text(String),
    List(Vec<JsonValue>),
    Object(Vec<(String, JsonValue)>),
}

impl JsonValue {
    fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    fn as_int(&self) -> Option<i64> {
        match self {
            JsonValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl DeJson for JsonValue {
    fn de_json(s: &mut DeJsonState, i: &mut Chars) -> Result<Self, DeJsonErr> {
        let value = match s.tok {
            DeJsonTok::CurlyOpen => {
                s.curly_open(i)?;
                let mut fields = Vec::new();
                while s.tok != DeJsonTok::CurlyClose {
                    let key = s.as_string()?;
                    s.next_colon(i)?;
                    fields.push((key, JsonValue::de_json(s, i)?));
                    s.eat_comma_curly(i)?;
                }
                s.curly_close(i)?;
                return Ok(JsonValue::Object(fields));
            }
            DeJsonTok::BlockOpen => {
                return Vec::<JsonValue>::de_json(s, i).map(JsonValue::List);
            }
            DeJsonTok::Null => JsonValue::Null,
            DeJsonTok::Bool(_) => JsonValue::Bool,
            DeJsonTok::I64(v) => JsonValue::Int(v),
            DeJsonTok::U64(v) => i64::try_from(v).map_or(JsonValue::Float, JsonValue::Int),
            DeJsonTok::F64(_) => JsonValue::Float,
            DeJsonTok::Str => JsonValue::Text(s.as_string()?),
            _ => return Err(s.err_token("value")),
        };
        s.next_tok(i)?;
        Ok(value)
    }
}

/// Doomednum to `ThingInfo`. Unknown numbers resolve to a fallback entry.
#[derive(Debug, Clone)]
pub struct ThingTypes {
    entries: HashMap<i16, ThingInfo>,
    categories: Vec<String>,
    fallback: ThingInfo,
}

impl Default for ThingTypes {
    fn default() -> Self {
        ThingTypes {
            entries: HashMap::new(),
            categories: Vec::new(),
            fallback: ThingInfo::unknown(),
        }
    }
}

impl ThingTypes {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let types = Self::from_json(&text)?;
        info!(
            target: LOG_TAG,
            "Loaded {} thing types from {:?}",
            types.len(),
            path
        );
        Ok(types)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let file = ConfigFile::deserialize_json(text)?;
        let mut types = ThingTypes::default();

        for category in file.categories {
            let Some(cat_name) = category.name.as_str().map(str::to_string) else {
                warn!(target: LOG_TAG, "Skipping category without a name");
                continue;
            };
            let cat_color = match &category.color {
                JsonValue::Null => Rgb::default(),
                c => Rgb::from_value(c).unwrap_or_else(|| {
                    warn!(target: LOG_TAG, "{}: bad colour {:?}", cat_name, c);
                    Rgb::default()
                }),
            };
            let things = match &category.things {
                JsonValue::List(things) => things.as_slice(),
                JsonValue::Null => &[],
                other => {
                    warn!(target: LOG_TAG, "{}: things is not a list: {:?}", cat_name, other);
                    &[]
                }
            };

            for entry in things {
                match Self::parse_entry(&cat_name, cat_color, entry) {
                    Some((id, thing)) => {
                        if types.entries.insert(id, thing).is_some() {
                            warn!(target: LOG_TAG, "Thing type {} defined twice", id);
                        }
                    }
                    None => warn!(target: LOG_TAG, "{}: skipping {:?}", cat_name, entry),
                }
            }
            types.categories.push(cat_name);
        }
        Ok(types)
    }

    fn parse_entry(category: &str, cat_color: Rgb, entry: &JsonValue) -> Option<(i16, ThingInfo)> {
        let id = i16::try_from(entry.get("id")?.as_int()?).ok()?;
        let name = entry.get("name")?.as_str()?.to_string();
        let radius = i16::try_from(entry.get("radius")?.as_int()?)
            .ok()
            .filter(|r| *r >= 0)?;
        let color = match entry.get("color") {
            None | Some(JsonValue::Null) => cat_color,
            Some(c) => Rgb::from_value(c)?,
        };
        Some((
            id,
            ThingInfo {
                category: category.to_string(),
                name,
                radius,
                color,
            },
        ))
    }

    /// Replace the table in place from a new document. On failure the
    /// current table is kept.
    pub fn reload(&mut self, text: &str) -> Result<(), ConfigError> {
        *self = Self::from_json(text)?;
        info!(target: LOG_TAG, "Reloaded {} thing types", self.len());
        Ok(())
    }

    pub fn lookup(&self, doomednum: i16) -> &ThingInfo {
        self.entries.get(&doomednum).unwrap_or(&self.fallback)
    }

    pub fn is_known(&self, doomednum: i16) -> bool {
        self.entries.contains_key(&doomednum)
    }

    pub fn fallback(&self) -> &ThingInfo {
        &self.fallback
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Rgb, ThingTypes};

    const CONFIG: &str = r#"{
        "categories": [
            { "name": "Players", "color": [0, 255, 0],
              "things": [
                { "id": 1, "name": "Player 1 start", "radius": 16 },
                { "id": 2, "name": "Player 2 start", "radius": 16, "color": [0, 0, 255] }
              ] },
            { "name": "Monsters", "color": [255, 0, 0],
              "things": [
                { "id": 3004, "name": "Former Human", "radius": 20 },
                { "name": "No id", "radius": 20 },
                { "id": 3001, "radius": 20 },
                { "id": 3002, "name": "Demon", "radius": -1 },
                { "id": 9, "name": "Bad colour", "radius": 20, "color": [1, 2] },
                { "id": 70000, "name": "Too big", "radius": 20 }
              ] },
            { "color": [1, 1, 1], "things": [ { "id": 5, "name": "Orphan", "radius": 1 } ] }
        ]
    }"#;

    #[test]
    fn load_skips_malformed_entries() {
        let types = ThingTypes::from_json(CONFIG).unwrap();
        assert_eq!(types.len(), 3);
        assert_eq!(types.categories(), &["Players".to_string(), "Monsters".to_string()]);

        let p1 = types.lookup(1);
        assert_eq!(p1.name, "Player 1 start");
        assert_eq!(p1.category, "Players");
        assert_eq!(p1.color, Rgb::new(0, 255, 0));
        assert_eq!(types.lookup(2).color, Rgb::new(0, 0, 255));
        assert_eq!(types.lookup(3004).radius, 20);
        assert!(!types.is_known(3001));
        assert!(!types.is_known(5));
    }

    #[test]
    fn wrong_field_type_skips_only_that_entry() {
        let types = ThingTypes::from_json(
            r#"{ "categories": [ { "name": "Monsters", "color": [255, 0, 0], "things": [
                { "id": 3004, "name": "Former Human", "radius": 20 },
                { "id": "3001", "name": "Imp", "radius": 20 },
                { "id": 3002, "name": "Demon", "radius": 20.5 },
                { "id": 58, "name": ["Spectre"], "radius": 30 },
                { "id": 9, "name": "Former Sergeant", "radius": 20, "color": "red" },
                { "id": 65, "name": "Heavy Weapon Dude", "radius": 20, "color": null,
                  "notes": { "added": [2, true, null] } },
                "not an object",
                42
            ] } ] }"#,
        )
        .unwrap();

        assert_eq!(types.len(), 2);
        assert_eq!(types.lookup(3004).name, "Former Human");
        assert_eq!(types.lookup(65).color, Rgb::new(255, 0, 0));
        for skipped in [3001, 3002, 58, 9] {
            assert!(!types.is_known(skipped), "{} should be skipped", skipped);
        }
    }

    #[test]
    fn wrong_category_types_skip_the_category() {
        let types = ThingTypes::from_json(
            r#"{ "categories": [
                { "name": 7, "things": [ { "id": 1, "name": "Player 1 start", "radius": 16 } ] },
                { "name": "Keys", "color": "blue",
                  "things": [ { "id": 5, "name": "Blue keycard", "radius": 20 } ] },
                { "name": "Broken", "things": { "id": 6 } }
            ] }"#,
        )
        .unwrap();

        assert_eq!(types.categories(), &["Keys".to_string(), "Broken".to_string()]);
        assert!(!types.is_known(1));
        assert_eq!(types.lookup(5).color, Rgb::default());
        assert_eq!(types.len(), 1);
    }

    #[test]
    fn unknown_type_falls_back() {
        let types = ThingTypes::from_json(CONFIG).unwrap();
        let info = types.lookup(-123);
        assert_eq!(info, types.fallback());
        assert_eq!(info.name, "Unknown");
    }

    #[test]
    fn reload_keeps_table_on_error() {
        let mut types = ThingTypes::from_json(CONFIG).unwrap();
        assert!(types.reload("{ not json").is_err());
        assert_eq!(types.len(), 3);

        types
            .reload(r#"{ "categories": [ { "name": "Keys", "things": [ { "id": 5, "name": "Blue keycard", "radius": 20 } ] } ] }"#)
            .unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types.lookup(5).name, "Blue keycard");
        assert_eq!(types.lookup(1).name, "Unknown");
    }

    #[test]
    fn empty_document() {
        let types = ThingTypes::from_json("{}").unwrap();
        assert!(types.is_empty());
    }
}
