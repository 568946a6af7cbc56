pub mod args;
pub mod codec;
pub mod columns;
pub mod date;
pub mod domain;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod record;
pub mod stats;
pub mod utils;

pub use args::{resolve_invocation, Cli, Command};
pub use columns::ColumnLayout;
pub use date::{format_instant, parse_bound, parse_instant};
pub use error::TrackError;
pub use pipeline::{run_aggregate, run_filter, RunSummary};
pub use record::{Field, Record};
pub use stats::{AggregationRow, SiteTotals, SortKey};
