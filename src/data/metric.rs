//! The fixed set of measurement columns that can be plotted and summarised.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named numeric measurement column in the stability CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "HGO")]
    Hgo,
    #[serde(rename = "LGO")]
    Lgo,
    #[serde(rename = "LTC")]
    Ltc,
    #[serde(rename = "RAW")]
    Raw,
    #[serde(rename = "VMain")]
    VMain,
}

impl Metric {
    pub const COUNT: usize = 5;

    /// All metrics in display order.
    pub const ALL: [Metric; Metric::COUNT] =
        [Metric::Hgo, Metric::Lgo, Metric::Ltc, Metric::Raw, Metric::VMain];

    /// CSV column name holding this metric.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Hgo => "HGO",
            Metric::Lgo => "LGO",
            Metric::Ltc => "LTC",
            Metric::Raw => "RAW",
            Metric::VMain => "VMain",
        }
    }

    /// Position inside [`Metric::ALL`], used to index per-record value arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl Default for Metric {
    fn default() -> Self {
        Metric::Raw
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}
