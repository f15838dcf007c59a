//! nKPI dashboard shell.
//!
//! - **catalog**: the page list and each page's panels
//! - **source**: table sources keyed by query or spreadsheet range
//! - **cache**: memoized fetches owned by the shell
//! - **render**: turning a page into chart-ready panel outputs
//!
//! Charts themselves are drawn elsewhere; this crate stops at
//! [`ChartRequest`](nkpi_model::ChartRequest).

pub mod cache;
pub mod catalog;
pub mod error;
pub mod render;
pub mod source;

pub use cache::FetchCache;
pub use catalog::{COMING_SOON_URL, Catalog, MetricSpec, Page, Panel, PanelContent};
pub use error::{DashboardError, Result};
pub use render::{PanelOutput, RenderedPanel, render_page};
pub use source::{InMemorySource, SheetSource, SourceRequest, TableSource};
