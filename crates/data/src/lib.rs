//! Dataset source — reads the student table from CSV.
//!
//! The header must name a `grade` and a `region` column; every other column
//! is carried through as text. A missing file is not an error: the panel
//! keeps running on an empty dataset and reports a warning.

use scopedesk_core::dataset::{Dataset, Grade, Row, GRADE_COLUMN, REGION_COLUMN};
use scopedesk_core::error::DataError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Non-fatal conditions noticed while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataWarning {
    /// The source file does not exist; the dataset is empty.
    MissingDataset { path: PathBuf },
}

impl std::fmt::Display for DataWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDataset { path } => {
                write!(f, "Dataset file {} not found, continuing with no data", path.display())
            }
        }
    }
}

/// A loaded dataset plus anything worth telling the operator.
#[derive(Debug, Clone, Default)]
pub struct Loaded {
    pub dataset: Dataset,
    pub warnings: Vec<DataWarning>,
}

/// Load the dataset at `path`.
pub fn load_dataset(path: &Path) -> Result<Loaded, DataError> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Dataset file not found, using empty dataset");
            return Ok(Loaded {
                dataset: Dataset::empty(),
                warnings: vec![DataWarning::MissingDataset {
                    path: path.to_path_buf(),
                }],
            });
        }
        Err(e) => {
            return Err(DataError::Read {
                path: path.display().to_string(),
                reason: e.to_string(),
            });
        }
    };

    let dataset = read_dataset(file)?;
    debug!(path = %path.display(), rows = dataset.len(), "Dataset loaded");
    Ok(Loaded {
        dataset,
        warnings: Vec::new(),
    })
}

/// Parse CSV with a header row from any reader.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::Csv(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    // An empty file has no header at all; treat it as an empty table.
    if headers.is_empty() {
        return Ok(Dataset::empty());
    }

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    };
    let grade_idx = column(GRADE_COLUMN)?;
    let region_idx = column(REGION_COLUMN)?;

    let extra_idx: Vec<usize> = (0..headers.len())
        .filter(|&i| i != grade_idx && i != region_idx)
        .collect();
    let extra_columns: Vec<String> = extra_idx.iter().map(|&i| headers[i].clone()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DataError::Csv(e.to_string()))?;
        let cell = |i: usize| record.get(i).unwrap_or_default();
        let row = Row::with_grade(Grade::parse(cell(grade_idx)), cell(region_idx))
            .with_extra(extra_idx.iter().map(|&i| cell(i).to_string()).collect());
        rows.push(row);
    }

    Ok(Dataset::new(extra_columns, rows))
}
