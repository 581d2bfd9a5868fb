pub mod ingest;
pub mod metric;
pub mod record;
pub mod runs;
pub mod schema;
pub mod session;
pub mod stats;
