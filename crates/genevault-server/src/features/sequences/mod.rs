pub mod queries;
pub mod routes;

pub use queries::{
    DownloadSequencesError, DownloadSequencesQuery, LookupSequencesError, LookupSequencesQuery,
    LookupSequencesResponse, SequenceEntry,
};

pub use routes::sequences_routes;
