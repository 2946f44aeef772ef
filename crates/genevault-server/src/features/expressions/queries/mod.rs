pub mod download;
pub mod lookup;

pub use download::{DownloadExpressionsError, DownloadExpressionsQuery};
pub use lookup::{
    ExpressionRow, LookupExpressionsError, LookupExpressionsQuery, LookupExpressionsResponse,
};
