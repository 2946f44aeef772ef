pub mod queries;
pub mod routes;

pub use queries::{
    DownloadExpressionsError, DownloadExpressionsQuery, ExpressionRow, LookupExpressionsError,
    LookupExpressionsQuery, LookupExpressionsResponse,
};

pub use routes::expressions_routes;
