pub mod config;
pub mod http;
pub mod query;
pub mod util;

pub use http::{ClientError, FetchError, HttpClient, RequestOptions, fetch_json};
pub use query::{QueryParameters, extract_query_parameters, parse_query_parameters};
pub use util::{InvalidTimestamp, format_date_time, format_timestamp, format_timestamp_in};
