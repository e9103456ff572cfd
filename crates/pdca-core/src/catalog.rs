//! Reference catalog of continuous-improvement tools.
//!
//! The catalog is a CSV table describing each tool under one PDCA phase.
//! Several header spellings have been used over time; they are mapped to
//! canonical columns through a fixed alias table before any row is read, and
//! every row becomes a typed [`ToolRecord`].

use crate::error::{Result, ToolboxError};
use crate::phase::Phase;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

/// One row of the reference table.
///
/// Identity is `(name, phase)`: the same tool may appear under several
/// phases with a different description each time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolRecord {
    pub name: String,
    pub description: String,
    pub phase: Phase,
    /// External "more info" link.
    pub info_url: Option<String>,
    /// Up to three video links, by position.
    pub video_links: [Option<String>; 3],
}

impl ToolRecord {
    /// Creates a record without links.
    pub fn new(phase: Phase, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            phase,
            info_url: None,
            video_links: [None, None, None],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Description,
    Category,
    MoreInfo,
    Video(usize),
}

/// Header spellings accepted for each canonical column.
const HEADER_ALIASES: &[(&str, Column)] = &[
    ("Tool Name", Column::Name),
    ("Tool", Column::Name),
    ("Tool Description", Column::Description),
    ("Description", Column::Description),
    ("PDCA Category", Column::Category),
    ("More Info", Column::MoreInfo),
    ("Info", Column::MoreInfo),
    ("Link", Column::MoreInfo),
    ("Unnamed: 3", Column::MoreInfo),
    ("Video1", Column::Video(0)),
    ("Video 1", Column::Video(0)),
    ("Unnamed: 4", Column::Video(0)),
    ("Video2", Column::Video(1)),
    ("Video 2", Column::Video(1)),
    ("Unnamed: 5", Column::Video(1)),
    ("Video3", Column::Video(2)),
    ("Video 3", Column::Video(2)),
    ("Unnamed: 6", Column::Video(2)),
];

/// Blank headers are looked up by their positional name, `Unnamed: <index>`.
fn canonical_column(index: usize, header: &str) -> Option<Column> {
    let header = header.trim_start_matches('\u{feff}').trim();
    let positional;
    let header = if header.is_empty() {
        positional = format!("Unnamed: {index}");
        positional.as_str()
    } else {
        header
    };
    HEADER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == header)
        .map(|(_, column)| *column)
}

/// Field positions resolved from the header row.
#[derive(Debug, Default)]
struct ColumnLayout {
    name: Option<usize>,
    description: Option<usize>,
    category: Option<usize>,
    more_info: Option<usize>,
    videos: [Option<usize>; 3],
}

impl ColumnLayout {
    fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut layout = ColumnLayout::default();
        for (index, header) in headers.into_iter().enumerate() {
            let slot = match canonical_column(index, header) {
                Some(Column::Name) => &mut layout.name,
                Some(Column::Description) => &mut layout.description,
                Some(Column::Category) => &mut layout.category,
                Some(Column::MoreInfo) => &mut layout.more_info,
                Some(Column::Video(n)) => &mut layout.videos[n],
                None => continue,
            };
            // First header mapping to a column wins.
            slot.get_or_insert(index);
        }

        if layout.name.is_none() {
            return Err(ToolboxError::MissingColumn("Tool Name"));
        }
        if layout.description.is_none() {
            return Err(ToolboxError::MissingColumn("Tool Description"));
        }
        if layout.category.is_none() {
            return Err(ToolboxError::MissingColumn("PDCA Category"));
        }
        Ok(layout)
    }
}

fn cell(fields: &[String], index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| fields.get(i))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Immutable, typed view of the reference table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceCatalog {
    records: Vec<ToolRecord>,
}

impl ReferenceCatalog {
    /// Builds a catalog from records already in memory.
    pub fn from_records(records: Vec<ToolRecord>) -> Self {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert((record.phase, record.name.as_str())) {
                tracing::debug!(
                    tool = %record.name,
                    phase = %record.phase,
                    "duplicate catalog row, first occurrence is used"
                );
            }
        }
        Self { records }
    }

    /// Parses a CSV reference table.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::MissingColumn`] if a required column is absent
    /// after header normalization, or [`ToolboxError::CatalogParse`] if the
    /// CSV itself is malformed.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .byte_headers()
            .map_err(|e| ToolboxError::CatalogParse(e.to_string()))?
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();
        let layout = ColumnLayout::from_headers(headers.iter().map(String::as_str))?;

        let mut records = Vec::new();
        for (row, result) in rdr.byte_records().enumerate() {
            let raw = result.map_err(|e| ToolboxError::CatalogParse(e.to_string()))?;
            let fields: Vec<String> = raw
                .iter()
                .map(|f| String::from_utf8_lossy(f).into_owned())
                .collect();

            let Some(name) = cell(&fields, layout.name) else {
                tracing::warn!(row = row + 2, "skipping catalog row without a tool name");
                continue;
            };
            let category = cell(&fields, layout.category).unwrap_or_default();
            let phase = match category.parse::<Phase>() {
                Ok(phase) => phase,
                Err(_) => {
                    tracing::warn!(
                        row = row + 2,
                        tool = %name,
                        category = %category,
                        "skipping catalog row with unknown PDCA category"
                    );
                    continue;
                }
            };

            records.push(ToolRecord {
                name,
                description: cell(&fields, layout.description).unwrap_or_default(),
                phase,
                info_url: cell(&fields, layout.more_info),
                video_links: [
                    cell(&fields, layout.videos[0]),
                    cell(&fields, layout.videos[1]),
                    cell(&fields, layout.videos[2]),
                ],
            });
        }

        Ok(Self::from_records(records))
    }

    /// Loads the first usable table among `candidates`, tried in order.
    ///
    /// A candidate that is missing, unreadable or unparsable is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::DataUnavailable`] naming every candidate when
    /// none of them yields a catalog.
    #[tracing::instrument(skip_all, fields(candidates = candidates.len()))]
    pub fn load(candidates: &[PathBuf]) -> Result<Self> {
        for path in candidates {
            let file = match std::fs::File::open(path) {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "reference table not present");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cannot open reference table");
                    continue;
                }
            };

            match Self::from_reader(std::io::BufReader::new(file)) {
                Ok(catalog) => {
                    tracing::info!(
                        path = %path.display(),
                        tools = catalog.len(),
                        "loaded reference catalog"
                    );
                    return Ok(catalog);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "unusable reference table");
                }
            }
        }

        Err(ToolboxError::DataUnavailable {
            tried: candidates.to_vec(),
        })
    }

    /// Returns the process-wide catalog, loading it on first use.
    ///
    /// `candidates` only matters for the call that performs the load; later
    /// calls share the same catalog.
    pub fn shared(candidates: &[PathBuf]) -> Result<Arc<Self>> {
        SHARED_CATALOG.get_or_load(candidates)
    }

    /// Looks up a tool by exact, case-sensitive `(phase, name)`.
    pub fn find(&self, phase: Phase, name: &str) -> Option<&ToolRecord> {
        self.records
            .iter()
            .find(|r| r.phase == phase && r.name == name)
    }

    /// Tools listed under `phase`, in table order.
    pub fn tools_for_phase(&self, phase: Phase) -> impl Iterator<Item = &ToolRecord> {
        self.records.iter().filter(move |r| r.phase == phase)
    }

    pub fn records(&self) -> &[ToolRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

static SHARED_CATALOG: CatalogCache = CatalogCache::new();

/// Load-once holder for a catalog shared read-only after the first load.
#[derive(Debug, Default)]
pub struct CatalogCache {
    cell: OnceCell<Arc<ReferenceCatalog>>,
}

impl CatalogCache {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Returns the cached catalog or loads it from `candidates`.
    ///
    /// A failed load is not cached; the next call tries again.
    pub fn get_or_load(&self, candidates: &[PathBuf]) -> Result<Arc<ReferenceCatalog>> {
        self.cell
            .get_or_try_init(|| ReferenceCatalog::load(candidates).map(Arc::new))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
Tool Name,Tool Description,PDCA Category,More Info,Video1,Video2,Video3
5 Whys,Root cause analysis,Plan,https://example.org/5whys,https://v.example/1,,
Kaizen,Continuous small changes,Do,,,,
Gemba Walk,Go and see,Plan,,,,
Gemba Walk,Confirm the change on the floor,Check,,,,
";

    #[test]
    fn test_should_parse_typed_records() {
        let catalog = ReferenceCatalog::from_reader(TABLE.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 4);

        let whys = catalog.find(Phase::Plan, "5 Whys").unwrap();
        assert_eq!(whys.description, "Root cause analysis");
        assert_eq!(whys.info_url.as_deref(), Some("https://example.org/5whys"));
        assert_eq!(
            whys.video_links,
            [Some("https://v.example/1".to_string()), None, None]
        );
    }

    #[test]
    fn test_should_filter_on_phase_and_name() {
        let catalog = ReferenceCatalog::from_reader(TABLE.as_bytes()).unwrap();
        assert_eq!(
            catalog.find(Phase::Check, "Gemba Walk").unwrap().description,
            "Confirm the change on the floor"
        );
        assert_eq!(
            catalog.find(Phase::Plan, "Gemba Walk").unwrap().description,
            "Go and see"
        );
        assert!(catalog.find(Phase::Act, "Gemba Walk").is_none());
        assert!(catalog.find(Phase::Plan, "5 whys").is_none());
    }

    #[test]
    fn test_should_normalize_legacy_headers() {
        let table = "\u{feff}Tool,Description,PDCA Category,Unnamed: 3,Unnamed: 4,Unnamed: 5,Unnamed: 6\n\
                     Pareto,80/20 ranking,Check,https://info,v1,v2,v3\n";
        let catalog = ReferenceCatalog::from_reader(table.as_bytes()).unwrap();
        let pareto = catalog.find(Phase::Check, "Pareto").unwrap();
        assert_eq!(pareto.description, "80/20 ranking");
        assert_eq!(pareto.info_url.as_deref(), Some("https://info"));
        assert_eq!(pareto.video_links[2].as_deref(), Some("v3"));
    }

    #[test]
    fn test_should_map_blank_headers_by_position() {
        let table = "Tool Name,Tool Description,PDCA Category,,,,\n\
                     5 Whys,Root cause,Plan,https://info,https://v1,https://v2,https://v3\n";
        let catalog = ReferenceCatalog::from_reader(table.as_bytes()).unwrap();
        let whys = catalog.find(Phase::Plan, "5 Whys").unwrap();
        assert_eq!(whys.info_url.as_deref(), Some("https://info"));
        assert_eq!(
            whys.video_links,
            [
                Some("https://v1".to_string()),
                Some("https://v2".to_string()),
                Some("https://v3".to_string()),
            ]
        );
    }

    #[test]
    fn test_should_ignore_blank_headers_outside_legacy_positions() {
        let table = ",Tool Name,Tool Description,PDCA Category\n\
                     x,Kaizen,Small changes,Do\n";
        let catalog = ReferenceCatalog::from_reader(table.as_bytes()).unwrap();
        let kaizen = catalog.find(Phase::Do, "Kaizen").unwrap();
        assert_eq!(kaizen.info_url, None);
        assert_eq!(kaizen.video_links, [None, None, None]);
    }

    #[test]
    fn test_should_fail_fast_on_missing_required_column() {
        let table = "Tool Name,PDCA Category\n5 Whys,Plan\n";
        let result = ReferenceCatalog::from_reader(table.as_bytes());
        assert!(matches!(
            result,
            Err(ToolboxError::MissingColumn("Tool Description"))
        ));
    }

    #[test]
    fn test_should_skip_rows_with_unknown_category() {
        let table = "Tool Name,Tool Description,PDCA Category\n\
                     Kaizen,Small changes,Do\n\
                     Mystery,???,Review\n\
                     ,orphan description,Act\n";
        let catalog = ReferenceCatalog::from_reader(table.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records()[0].name, "Kaizen");
    }

    #[test]
    fn test_should_return_first_duplicate() {
        let catalog = ReferenceCatalog::from_records(vec![
            ToolRecord::new(Phase::Do, "5S", "first"),
            ToolRecord::new(Phase::Do, "5S", "second"),
        ]);
        assert_eq!(catalog.find(Phase::Do, "5S").unwrap().description, "first");
    }

    #[test]
    fn test_should_list_tools_for_phase_in_table_order() {
        let catalog = ReferenceCatalog::from_reader(TABLE.as_bytes()).unwrap();
        let names: Vec<_> = catalog
            .tools_for_phase(Phase::Plan)
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, ["5 Whys", "Gemba Walk"]);
    }

    #[test]
    fn test_cache_retries_failed_load_then_keeps_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Tools_description.csv");
        let candidates = [path.clone()];
        let cache = CatalogCache::new();

        assert!(matches!(
            cache.get_or_load(&candidates),
            Err(ToolboxError::DataUnavailable { .. })
        ));

        std::fs::write(&path, TABLE).unwrap();
        let first = cache.get_or_load(&candidates).unwrap();
        std::fs::remove_file(&path).unwrap();
        let second = cache.get_or_load(&candidates).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 4);
    }
}
