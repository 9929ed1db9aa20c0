use super::subject::Subject;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum SubjectImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for SubjectImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectImportError::Io(err) => write!(f, "failed to read subject export: {}", err),
            SubjectImportError::Csv(err) => write!(f, "invalid subject CSV data: {}", err),
        }
    }
}

impl std::error::Error for SubjectImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubjectImportError::Io(err) => Some(err),
            SubjectImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SubjectImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SubjectImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads subject lists from `name,mark` CSV exports. Levels are always derived from marks.
pub struct SubjectImporter;

impl SubjectImporter {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<Subject>, SubjectImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Subject>, SubjectImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut subjects = Vec::new();

        for record in csv_reader.deserialize::<SubjectRow>() {
            let row = record?;
            subjects.push(Subject::new(row.name, row.mark));
        }

        Ok(subjects)
    }
}

#[derive(Debug, Deserialize)]
struct SubjectRow {
    #[serde(alias = "Name", alias = "Subject", alias = "subject")]
    name: String,
    #[serde(alias = "Mark", alias = "Percentage", alias = "percentage")]
    mark: f64,
}
