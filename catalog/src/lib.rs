#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turret template catalog loaded from the flat `turrets.dat` resource.
//!
//! The resource is line oriented: the first line is a header and is
//! discarded, every following line holds eight whitespace separated fields
//! in the order `id level upgrade_cost sprite_index purchase_cost fire_rate
//! damage radius`. Loading is all or nothing.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use turret_defence_core::{TurretKind, TurretLevel, TurretStats};

/// Names of the columns in the order they appear on a catalog line.
pub const FIELD_NAMES: [&str; 8] = [
    "id",
    "level",
    "upgrade_cost",
    "sprite_index",
    "purchase_cost",
    "fire_rate",
    "damage",
    "radius",
];

/// Errors raised while loading a turret catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read turret catalog at {}", .path.display())]
    Io {
        /// Location of the catalog that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The resource did not even contain the header line.
    #[error("turret catalog is empty; expected a header line")]
    MissingHeader,
    /// A line did not split into the expected number of fields.
    #[error("line {line}: expected {} fields, found {found}", FIELD_NAMES.len())]
    FieldCount {
        /// One-based line number inside the resource.
        line: usize,
        /// Number of fields present on the line.
        found: usize,
    },
    /// A field could not be interpreted.
    #[error("line {line}: invalid {field} `{value}`")]
    InvalidField {
        /// One-based line number inside the resource.
        line: usize,
        /// Name of the offending column.
        field: &'static str,
        /// Raw text found in the column.
        value: String,
    },
    /// Two lines describe the same kind and level.
    #[error("line {line}: duplicate template for kind {kind} level {level}")]
    DuplicateRecord {
        /// One-based line number of the second occurrence.
        line: usize,
        /// Kind listed twice.
        kind: TurretKind,
        /// Level listed twice.
        level: TurretLevel,
    },
    /// A kind skips a level, so its upgrade chain is broken.
    #[error("kind {kind} has no template for level {level}")]
    MissingLevel {
        /// Kind with the gap.
        kind: TurretKind,
        /// First level absent from the chain.
        level: TurretLevel,
    },
}

/// Ordered, immutable collection of turret templates keyed by kind and level.
#[derive(Clone, Debug, Default)]
pub struct TurretCatalog {
    records: Vec<TurretStats>,
    index: BTreeMap<(TurretKind, TurretLevel), usize>,
}

impl TurretCatalog {
    /// Reads and parses the catalog stored at the provided path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(&contents)?;
        log::info!(
            "loaded {} turret templates from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parses catalog text, skipping the header line.
    pub fn parse(contents: &str) -> Result<Self, CatalogError> {
        let mut lines = contents.lines();
        let _header = lines.next().ok_or(CatalogError::MissingHeader)?;

        let mut catalog = Self::default();
        for (offset, line) in lines.enumerate() {
            // The header occupies line 1.
            let line_number = offset + 2;
            let record = parse_record(line_number, line)?;
            let key = (record.kind, record.level);
            if catalog.index.contains_key(&key) {
                return Err(CatalogError::DuplicateRecord {
                    line: line_number,
                    kind: record.kind,
                    level: record.level,
                });
            }
            let _ = catalog.index.insert(key, catalog.records.len());
            catalog.records.push(record);
        }

        catalog.verify_level_chains()?;
        Ok(catalog)
    }

    /// Returns the base-level template for the provided kind.
    #[must_use]
    pub fn find_base(&self, kind: TurretKind) -> Option<&TurretStats> {
        self.find(kind, TurretLevel::BASE)
    }

    /// Returns the template describing `kind` at `level`, if one exists.
    #[must_use]
    pub fn find(&self, kind: TurretKind, level: TurretLevel) -> Option<&TurretStats> {
        self.index
            .get(&(kind, level))
            .and_then(|position| self.records.get(*position))
    }

    /// Highest level defined for the provided kind.
    #[must_use]
    pub fn max_level(&self, kind: TurretKind) -> Option<TurretLevel> {
        self.index
            .range((kind, TurretLevel::BASE)..=(kind, TurretLevel::new(u32::MAX)))
            .next_back()
            .map(|((_, level), _)| *level)
    }

    /// Distinct turret kinds in ascending order.
    #[must_use]
    pub fn kinds(&self) -> Vec<TurretKind> {
        let mut kinds: Vec<TurretKind> = self.index.keys().map(|(kind, _)| *kind).collect();
        kinds.dedup();
        kinds
    }

    /// Iterator over the templates in the order they were listed.
    pub fn iter(&self) -> impl Iterator<Item = &TurretStats> {
        self.records.iter()
    }

    /// Number of templates held by the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Reports whether the catalog holds no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn verify_level_chains(&self) -> Result<(), CatalogError> {
        let mut expected: Option<(TurretKind, u32)> = None;
        for (kind, level) in self.index.keys() {
            let wanted = match expected {
                Some((current, next)) if current == *kind => next,
                _ => 0,
            };
            if level.get() != wanted {
                return Err(CatalogError::MissingLevel {
                    kind: *kind,
                    level: TurretLevel::new(wanted),
                });
            }
            expected = Some((*kind, wanted.saturating_add(1)));
        }
        Ok(())
    }
}

fn parse_record(line: usize, text: &str) -> Result<TurretStats, CatalogError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != FIELD_NAMES.len() {
        return Err(CatalogError::FieldCount {
            line,
            found: fields.len(),
        });
    }

    let integer = |position: usize| -> Result<u32, CatalogError> {
        fields[position]
            .parse::<u32>()
            .map_err(|_| invalid(line, position, fields[position]))
    };

    let fire_rate = fields[5]
        .parse::<f32>()
        .ok()
        .filter(|rate| rate.is_finite() && *rate >= 0.0)
        .ok_or_else(|| invalid(line, 5, fields[5]))?;

    Ok(TurretStats {
        kind: TurretKind::new(integer(0)?),
        level: TurretLevel::new(integer(1)?),
        upgrade_cost: integer(2)?,
        sprite_index: integer(3)?,
        purchase_cost: integer(4)?,
        fire_rate,
        damage: integer(6)?,
        radius: integer(7)?,
    })
}

fn invalid(line: usize, position: usize, value: &str) -> CatalogError {
    CatalogError::InvalidField {
        line,
        field: FIELD_NAMES[position],
        value: value.to_owned(),
    }
}
