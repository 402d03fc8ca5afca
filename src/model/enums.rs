use std::fmt;

// ---------------------------------------------------------------------------
// Response ordering (how overlapping detail requests are reconciled)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResponseOrdering {
    /// Only the response to the most recently issued request renders.
    #[default]
    LatestOnly,
    /// Every successful response renders, in the order responses arrive.
    ArrivalOrder,
}

impl ResponseOrdering {
    pub fn next(self) -> Self {
        match self {
            Self::LatestOnly => Self::ArrivalOrder,
            Self::ArrivalOrder => Self::LatestOnly,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LatestOnly => "Latest",
            Self::ArrivalOrder => "Arrival",
        }
    }

    /// Parse an ordering name leniently: `"latest"`, `"latest-only"`,
    /// `"newest"` pick [`LatestOnly`](Self::LatestOnly); `"arrival"`,
    /// `"arrival-order"`, `"parity"` pick [`ArrivalOrder`](Self::ArrivalOrder).
    /// Anything else falls back to the default.
    pub fn from_str_loose(s: &str) -> Self {
        let lower = s.to_ascii_lowercase();
        match lower.trim() {
            "arrival" | "arrival_order" | "arrival-order" | "parity" => Self::ArrivalOrder,
            _ => Self::LatestOnly, // latest, latest_only, newest, ...
        }
    }
}

impl fmt::Display for ResponseOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Output format for rendered regions (headless host)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Html,
    Text,
}

impl OutputFormat {
    pub fn from_str_loose(s: &str) -> Self {
        let lower = s.to_ascii_lowercase();
        match lower.trim() {
            "text" | "txt" | "plain" => Self::Text,
            _ => Self::Html,
        }
    }
}
