pub mod download;
pub mod lookup;

pub use download::{DownloadSequencesError, DownloadSequencesQuery};
pub use lookup::{
    LookupSequencesError, LookupSequencesQuery, LookupSequencesResponse, SequenceEntry,
};
