//! # Manufacturer Spacing Tables
//!
//! Tabulated max post spacing, one CSV file per design wind speed
//! (`<ws>mph.csv`) in a configured directory.
//!
//! ## File format
//!
//! ```text
//! group,post,6,8,10,12
//! IC_PIPE,2 3/8",9.5,8.0,6.5,5.5
//! IC_PIPE,2 7/8",11.0,9.5,8.0,7.0
//! ```
//!
//! The header's numeric columns are fence heights (ft); cells are spacing
//! (ft). Blank cells are "not tabulated". Rows match records through
//! `PostRecord::table_label`.
//!
//! ## Lookup rule
//!
//! The smallest tabulated wind speed ≥ V is used (largest when V exceeds
//! every table), then the smallest tabulated height ≥ H (tallest when H
//! exceeds every column).
//!
//! ## Caching
//!
//! Parsed tables are memoized per wind speed in a bounded map behind an
//! `RwLock`. Files are parsed outside the lock; if two callers race on the
//! same key both parse and the first insert wins.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::{PostGroup, PostRecord};
use crate::errors::{CalcError, CalcResult};

/// Upper bound on cached wind-speed tables
pub const TABLE_CACHE_CAPACITY: usize = 32;

/// Parsed contents of one `<ws>mph.csv`: group → row label → (height, spacing)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpacingTables {
    rows: HashMap<PostGroup, HashMap<String, Vec<(f64, f64)>>>,
}

impl SpacingTables {
    /// Parse CSV text. `source` names the file in error messages.
    ///
    /// Fields are split on every comma, so a quoted field cannot contain a
    /// comma. Post labels in manufacturer tables never do.
    pub fn parse(text: &str, source: &str) -> CalcResult<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'));

        let header_line = lines
            .next()
            .ok_or_else(|| CalcError::file_error("read", source, "CSV file is empty"))?;
        let headers: Vec<String> = header_line.split(',').map(unquote).collect();

        let col_index = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let group_idx =
            col_index("group").ok_or_else(|| CalcError::file_error("parse", source, "Missing 'group' column"))?;
        let post_idx =
            col_index("post").ok_or_else(|| CalcError::file_error("parse", source, "Missing 'post' column"))?;

        let height_cols: Vec<(usize, f64)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != group_idx && *i != post_idx)
            .filter_map(|(i, h)| parse_optional_f64(h).map(|height| (i, height)))
            .collect();
        if height_cols.is_empty() {
            return Err(CalcError::file_error("parse", source, "No height columns in header"));
        }

        let mut tables = SpacingTables::default();
        for line in lines {
            let fields: Vec<String> = line.split(',').map(unquote).collect();

            let Some(group) = fields.get(group_idx).and_then(|g| g.parse::<PostGroup>().ok()) else {
                continue; // Skip rows for groups we do not model
            };
            let label = fields.get(post_idx).cloned().unwrap_or_default();
            if label.is_empty() {
                continue;
            }

            let mut row: Vec<(f64, f64)> = height_cols
                .iter()
                .filter_map(|&(i, height)| {
                    fields
                        .get(i)
                        .and_then(|v| parse_optional_f64(v))
                        .map(|spacing| (height, spacing))
                })
                .collect();
            if row.is_empty() {
                continue;
            }
            row.sort_by(|a, b| a.0.total_cmp(&b.0));

            tables.rows.entry(group).or_default().insert(label, row);
        }

        Ok(tables)
    }

    /// Tabulated spacing for a row at the first height ≥ `height_ft`.
    pub fn spacing_for(&self, group: PostGroup, table_label: &str, height_ft: f64) -> Option<f64> {
        let row = self.rows.get(&group)?.get(table_label)?;
        row.iter()
            .find(|(h, _)| *h >= height_ft)
            .or_else(|| row.last())
            .map(|(_, spacing)| *spacing)
    }

    /// Number of tabulated rows across all groups
    pub fn row_count(&self) -> usize {
        self.rows.values().map(HashMap::len).sum()
    }
}

/// A table spacing hit and where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSpacing {
    pub spacing_ft: f64,
    pub table_wind_speed_mph: u32,
}

/// Lazily populated, size-bounded cache of spacing tables.
#[derive(Debug, Default)]
pub struct SpacingTableCache {
    dir: Option<PathBuf>,

    /// Wind speeds with a `<ws>mph.csv` present, ascending
    available: Vec<u32>,

    cache: RwLock<HashMap<u32, Arc<SpacingTables>>>,
}

impl SpacingTableCache {
    /// A cache that never finds a table.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Scan `dir` for `<ws>mph.csv` files. A missing directory yields an
    /// empty (disabled) cache.
    pub fn new(dir: Option<PathBuf>) -> Self {
        let available = dir.as_deref().map(scan_available).unwrap_or_default();
        tracing::debug!(dir = ?dir, tables = available.len(), "spacing table directory scanned");
        SpacingTableCache {
            dir,
            available,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Wind speeds with tables on disk
    pub fn available_wind_speeds(&self) -> &[u32] {
        &self.available
    }

    /// Number of tables currently memoized
    pub fn cached_len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    /// Conservative table choice for `wind_speed_mph`.
    pub fn select_wind_speed(&self, wind_speed_mph: f64) -> Option<u32> {
        self.available
            .iter()
            .copied()
            .find(|&ws| f64::from(ws) >= wind_speed_mph)
            .or_else(|| self.available.last().copied())
    }

    /// Tabulated max spacing for `record`, or None when no table covers it.
    pub fn lookup(&self, record: &PostRecord, wind_speed_mph: f64, height_ft: f64) -> Option<TableSpacing> {
        let table_label = record.table_label.as_deref()?;
        let ws = self.select_wind_speed(wind_speed_mph)?;
        let tables = self.tables_for(ws)?;
        let spacing_ft = tables.spacing_for(record.group, table_label, height_ft)?;
        Some(TableSpacing {
            spacing_ft,
            table_wind_speed_mph: ws,
        })
    }

    /// Parsed tables for one wind speed, memoized on first use.
    pub fn tables_for(&self, ws_mph: u32) -> Option<Arc<SpacingTables>> {
        if let Ok(cache) = self.cache.read() {
            if let Some(tables) = cache.get(&ws_mph) {
                return Some(Arc::clone(tables));
            }
        }

        let dir = self.dir.as_deref()?;
        let parsed = match load_table_file(&dir.join(format!("{}mph.csv", ws_mph))) {
            Ok(tables) => tables,
            Err(e) => {
                tracing::warn!(ws_mph, error = %e, "spacing table unreadable; using formula spacing");
                SpacingTables::default()
            }
        };
        let parsed = Arc::new(parsed);

        let Ok(mut cache) = self.cache.write() else {
            return Some(parsed);
        };
        if let Some(existing) = cache.get(&ws_mph) {
            return Some(Arc::clone(existing));
        }
        if cache.len() >= TABLE_CACHE_CAPACITY {
            if let Some(evict) = cache.keys().copied().min() {
                cache.remove(&evict);
            }
        }
        tracing::debug!(ws_mph, rows = parsed.row_count(), "spacing table cached");
        cache.insert(ws_mph, Arc::clone(&parsed));
        Some(parsed)
    }
}

fn load_table_file(path: &Path) -> CalcResult<SpacingTables> {
    let display = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| CalcError::file_error("read", &display, e.to_string()))?;
    SpacingTables::parse(&text, &display)
}

fn scan_available(dir: &Path) -> Vec<u32> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut speeds: Vec<u32> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            name.strip_suffix("mph.csv")?.parse::<u32>().ok()
        })
        .collect();
    speeds.sort_unstable();
    speeds.dedup();
    speeds
}

/// Strip surrounding quotes; doubled quotes inside become one.
fn unquote(field: &str) -> String {
    let field = field.trim();
    if field.len() >= 2 && field.starts_with('"') && field.ends_with('"') {
        field[1..field.len() - 1].replace("\"\"", "\"")
    } else {
        field.to_string()
    }
}

fn parse_optional_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "–" {
        None
    } else {
        trimmed.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::PostCatalog;

    const SAMPLE: &str = "\u{feff}group,post,6,8,10,12\n\
        IC_PIPE,2 3/8\",9.5,8.0,6.5,5.5\n\
        IC_PIPE,\"2 7/8\"\"\",11.0,9.5,,7.0\n\
        # comment\n\
        IB_UNKNOWN,2 3/8\",1,1,1,1\n";

    #[test]
    fn test_parse_sample() {
        let tables = SpacingTables::parse(SAMPLE, "120mph.csv").unwrap();
        assert_eq!(tables.row_count(), 2);
        assert_eq!(tables.spacing_for(PostGroup::IcPipe, "2 3/8\"", 8.0), Some(8.0));
        assert_eq!(tables.spacing_for(PostGroup::IcPipe, "2 3/8\"", 7.0), Some(8.0));
        assert_eq!(tables.spacing_for(PostGroup::IcPipe, "2 3/8\"", 14.0), Some(5.5));
    }

    #[test]
    fn test_blank_cells_and_quoted_labels() {
        let tables = SpacingTables::parse(SAMPLE, "120mph.csv").unwrap();
        // 10 ft is blank, so 9 ft resolves to the 12 ft column
        assert_eq!(tables.spacing_for(PostGroup::IcPipe, "2 7/8\"", 9.0), Some(7.0));
        assert_eq!(tables.spacing_for(PostGroup::IaHigh, "2 7/8\"", 9.0), None);
    }

    #[test]
    fn test_comma_inside_quotes_splits_the_field() {
        let text = "group,post,6,8\nIC_PIPE,\"Pipe, 2 3/8\",9.5,8.0\n";
        let tables = SpacingTables::parse(text, "comma.csv").unwrap();
        assert_eq!(tables.spacing_for(PostGroup::IcPipe, "Pipe, 2 3/8", 6.0), None);
    }

    #[test]
    fn test_missing_columns() {
        let err = SpacingTables::parse("post,6,8\n", "x.csv").unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert!(SpacingTables::parse("", "x.csv").is_err());
    }

    #[test]
    fn test_disabled_cache_never_hits() {
        let cache = SpacingTableCache::disabled();
        let catalog = PostCatalog::builtin();
        let post = catalog.lookup("2_3_8_SS40").unwrap();
        assert!(cache.lookup(post, 120.0, 8.0).is_none());
        assert_eq!(cache.cached_len(), 0);
    }

    #[test]
    fn test_directory_lookup_and_memoization() {
        let dir = std::env::temp_dir().join(format!("windcalc-tables-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("110mph.csv"), "group,post,6,8\nIC_PIPE,2 3/8\",10.0,9.0\n").unwrap();
        fs::write(dir.join("130mph.csv"), "group,post,6,8\nIC_PIPE,2 3/8\",7.0,6.0\n").unwrap();

        let cache = SpacingTableCache::new(Some(dir.clone()));
        assert_eq!(cache.available_wind_speeds(), &[110, 130]);
        assert_eq!(cache.select_wind_speed(115.0), Some(130));
        assert_eq!(cache.select_wind_speed(150.0), Some(130));
        assert_eq!(cache.select_wind_speed(100.0), Some(110));

        let catalog = PostCatalog::builtin();
        let post = catalog.lookup("2_3_8_SS40").unwrap();
        let hit = cache.lookup(post, 120.0, 8.0).unwrap();
        assert_eq!(hit.spacing_ft, 6.0);
        assert_eq!(hit.table_wind_speed_mph, 130);

        let first = cache.tables_for(130).unwrap();
        let second = cache.tables_for(130).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.cached_len(), 1);

        fs::remove_dir_all(&dir).ok();
    }
}
