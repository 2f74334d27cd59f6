use std::io;
use std::result;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid address <{0}>")]
    InvalidAddress(String),

    #[error("invalid network <{0}>")]
    InvalidNetwork(String),

    #[error("invalid AS number <{0}>")]
    InvalidAsn(String),

    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("range {first}-{last} overlaps or precedes the previous range")]
    OutOfOrder { first: String, last: String },
}

impl Error {
    pub fn io(path: &str, source: io::Error) -> Error {
        Error::Io { path: path.to_owned(), source }
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Row counts gathered while reading one of the text inputs. Rows that
/// fail to parse are skipped and counted rather than aborting the load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows: usize,
    pub skipped: usize,
}

impl LoadStats {
    pub fn accepted(&self) -> usize {
        self.rows - self.skipped
    }
}
