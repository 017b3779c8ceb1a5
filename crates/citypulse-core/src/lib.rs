//! # citypulse core
//!
//! Streaming statistics over newline-delimited JSON people records.
//!
//! Each input line describes one person:
//!
//! ```json
//! {"age":78,"name":"Eli","city":"Austin","friends":[{"name":"Robert","hobbies":["Travel"]}]}
//! ```
//!
//! The core reads lines one at a time, extracts the fields it needs, and folds
//! every valid record into running aggregates. Invalid lines are counted and
//! logged, never fatal.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`extract`] | Per-field extraction from one parsed line |
//! | [`store`] | Per-city, per-name and per-hobby aggregates |
//! | [`processor`] | Line-by-line ingestion into a store |
//! | [`report`] | Section-filtered JSON report |
//! | [`fetch`] | Endpoint retrieval with retry |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`retry`] | Retry and backoff policy |
//! | [`error`] | Error types |
//!
//! ## Quick Start
//!
//! ```rust
//! use citypulse_core::{ingest_str, render_report, AggregationStore, ReportSection, ReportSections};
//!
//! let mut store = AggregationStore::new();
//! let summary = ingest_str(
//!     &mut store,
//!     "{\"age\":\"78\",\"name\":\"Eli\",\"city\":\"Austin\",\"friends\":[]}\nnot json\n",
//! );
//! assert_eq!((summary.valid, summary.invalid), (1, 1));
//!
//! let sections = ReportSections::only(ReportSection::MostCommonName);
//! let json = render_report(&store, &sections, false).unwrap();
//! assert_eq!(json, r#"{"most_common_name":{"name":"Eli","count":1}}"#);
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! endpoint ──fetch──▶ body ──LineProcessor──▶ AggregationStore ──Report──▶ JSON
//!                              │
//!                              └─ extract::Record per line
//! ```

pub mod error;
pub mod extract;
pub mod fetch;
pub mod http_client;
pub mod processor;
pub mod report;
pub mod retry;
pub mod store;

pub use error::{FetchError, FieldFault, LineError, MalformedField, ReportError};
pub use extract::{Friends, Record};
pub use fetch::{fetch_body, FetchConfig};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use processor::{ingest_str, LineOutcome, LineProcessor, ParseSummary};
pub use report::{render_report, Report, ReportSection, ReportSections};
pub use retry::{Backoff, RetryConfig};
pub use store::{AggregationStore, CityStats};
