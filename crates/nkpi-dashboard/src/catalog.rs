//! Dashboard pages and their panels.
//!
//! [`Catalog::nkpi`] is the built-in page set. A catalog can also be read
//! from TOML, which is how live [`PanelContent::Metric`] panels are wired to
//! their data:
//!
//! ```toml
//! [[pages]]
//! label = "Teams"
//!
//! [[pages.panels]]
//! title = "Team Growth"
//! kind = "metric"
//! source = { kind = "query", sql = "SELECT created_at, deleted FROM teams" }
//! metric = { metric = "entities", created_column = "created_at", deleted_column = "deleted" }
//! ```

use std::path::Path;

use nkpi_transform::{ChartSpec, TransformSpec};

use crate::error::{DashboardError, Result};
use crate::source::SourceRequest;

const ASSETS: &str = "https://plabs-assets.s3.us-west-1.amazonaws.com";

pub const COMING_SOON_URL: &str = "https://plabs-assets.s3.us-west-1.amazonaws.com/Coming+Soon.png";

/// How a live panel turns its source table into a chart.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "metric", rename_all = "snake_case")]
pub enum MetricSpec {
    /// The general normalize, reshape and filter pipeline.
    Transform(TransformSpec),
    /// Average session duration from session id and timestamp columns.
    Sessions {
        session_column: String,
        timestamp_column: String,
        #[serde(default)]
        chart: ChartSpec,
    },
    /// New, existing and total counts from creation timestamps.
    Entities {
        created_column: String,
        #[serde(default)]
        deleted_column: Option<String>,
        #[serde(default)]
        chart: ChartSpec,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelContent {
    /// A pre-rendered chart image.
    Image { url: String },
    ComingSoon,
    Metric {
        source: SourceRequest,
        metric: MetricSpec,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Panel {
    pub title: String,
    #[serde(flatten)]
    pub content: PanelContent,
}

impl Panel {
    pub fn image(title: impl Into<String>, asset: &str) -> Self {
        Self {
            title: title.into(),
            content: PanelContent::Image {
                url: format!("{ASSETS}/{asset}"),
            },
        }
    }

    pub fn coming_soon(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: PanelContent::ComingSoon,
        }
    }

    pub fn metric(title: impl Into<String>, source: SourceRequest, metric: MetricSpec) -> Self {
        Self {
            title: title.into(),
            content: PanelContent::Metric { source, metric },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Page {
    pub label: String,
    #[serde(default)]
    pub panels: Vec<Panel>,
}

impl Page {
    pub fn new(label: impl Into<String>, panels: Vec<Panel>) -> Self {
        Self {
            label: label.into(),
            panels,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Catalog {
    pub pages: Vec<Page>,
}

impl Catalog {
    /// The nKPI page set.
    pub fn nkpi() -> Self {
        let pages = vec![
            Page::new(
                "Capital",
                vec![
                    Panel::image(
                        "Capital Raised by PL Portfolio Venture Startups",
                        "Capital+Raised+PL(nKPI).png",
                    ),
                    Panel::image(
                        "Capital Raised by All Organizations in the Network",
                        "Capital+Raised+by+Org(nKPI).png",
                    ),
                    Panel::image(
                        "Angel Investors of Network Teams",
                        "Angel+Investors+of+Network(nKPI).png",
                    ),
                    Panel::image(
                        "VC Investors of Network Teams",
                        "VC+Investors+of+Teams(nKPI).png",
                    ),
                ],
            ),
            Page::new(
                "Teams",
                vec![
                    Panel::image(
                        "Shut down, Same stage and Moved up",
                        "Shut+down%2C+moved+team(nKPI).png",
                    ),
                    Panel::image("Teams by Membership Tier", "Teams+by+Membership(nKPI).png"),
                    Panel::image("Teams by Impact Tier", "Teams+by+Impact+Tier(nKPI).png"),
                    Panel::coming_soon(
                        "% of Top Teams in each focus area that are engaged with Protocol Labs",
                    ),
                ],
            ),
            Page::new(
                "Brand",
                vec![
                    Panel::image("Share of Voice", "share+of+voice(nKPI).png"),
                    Panel::image("Audience Growth", "Audience+Growth(nKPI).png"),
                    Panel::image("Engagement Rate", "Engagement+Rate(nKPI).png"),
                    Panel::image("Email Subscribers", "Email+Subscribers(nKPI).png"),
                ],
            ),
            Page::new(
                "Network Tooling",
                vec![
                    Panel::coming_soon("Monthly Active Users"),
                    Panel::coming_soon("Avg Session Duration"),
                    Panel::coming_soon("Team Growth"),
                    Panel::coming_soon("Member Growth"),
                    Panel::coming_soon("Project Growth"),
                    Panel::coming_soon("NPS Feedback"),
                ],
            ),
            Page::new(
                "Knowledge",
                vec![
                    Panel::coming_soon("Office Hours Held (By Type)"),
                    Panel::image("% Network Density", "Network+Density(nKPI).png"),
                    Panel::coming_soon("Monthly Active Users by Contribution Type - Events"),
                    Panel::coming_soon("Monthly Active Teams by Contribution Type - Events"),
                ],
            ),
            Page::new(
                "People/Talent",
                vec![Panel::image(
                    "# of Active Users in the Network",
                    "No.+Of+Avtive+Users+in+Network(nKPI).png",
                )],
            ),
            Page::new("User/Customers", Vec::new()),
            Page::new(
                "Programs",
                vec![Panel::image(
                    "Number of teams participating in programs, new vs. repeat",
                    "No+of+team+new+and+repeat(nKPI).png",
                )],
            ),
            Page::new(
                "Projects",
                vec![Panel::image(
                    "Project Contributors by Month",
                    "Project+Cintributors(nKPI).png",
                )],
            ),
            Page::new("Service Providers", Vec::new()),
            Page::new("Other Networks", Vec::new()),
        ];
        Self { pages }
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| DashboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|p| p.label.as_str())
    }

    /// Case-insensitive page lookup.
    pub fn page(&self, label: &str) -> Result<&Page> {
        let wanted = label.trim();
        self.pages
            .iter()
            .find(|p| p.label.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DashboardError::UnknownPage {
                label: label.to_string(),
            })
    }

    /// Pages from `other` replace same-named pages here; new ones are
    /// appended.
    pub fn merge(&mut self, other: Catalog) {
        for page in other.pages {
            match self
                .pages
                .iter_mut()
                .find(|p| p.label.eq_ignore_ascii_case(&page.label))
            {
                Some(existing) => *existing = page,
                None => self.pages.push(page),
            }
        }
    }
}
