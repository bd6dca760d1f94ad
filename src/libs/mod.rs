//! Domain logic of brainclock.
//!
//! - **Ingestion**: `table` reads CSV/XLSX, `headers` maps column names,
//!   `ingest` runs the validation gates and produces `metrics` samples
//! - **Analysis**: `prompt` renders the request, `llm` talks to the model,
//!   `extract` recovers JSON from the answer, `analysis` ties them together
//! - **Scheduling**: `period`, `scheduler`, `clock`, `notify` and the
//!   `daemon` behind `brainclock watch`
//! - **Infrastructure**: `config`, `data_storage`, `messages`, `export`,
//!   `view`, `session`, `user`
//!
//! ```rust
//! use brainclock::libs::headers::{canonical_key, ColumnKey};
//! use brainclock::libs::metrics::MetricKey;
//!
//! assert_eq!(canonical_key("Cognitive Score"), ColumnKey::Metric(MetricKey::CognitiveScore));
//! ```

pub mod analysis;
pub mod clock;
pub mod config;
pub mod daemon;
pub mod data_storage;
pub mod export;
pub mod extract;
pub mod headers;
pub mod ingest;
pub mod llm;
pub mod messages;
pub mod metrics;
pub mod notify;
pub mod period;
pub mod prompt;
pub mod scheduler;
pub mod session;
pub mod table;
pub mod user;
pub mod view;
