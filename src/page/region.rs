//! Display regions and the fragments appended to them.

use std::fmt::Write as _;

/// One rendered piece of content inside a region.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// A review line, e.g. `Rating: 5: Great`.
    ReviewLine { rating: String, text: String },
    /// An image reference shown at a fixed display height.
    Image { src: String, height: u32 },
}

impl Fragment {
    /// Plain-text form, as a reader sees it on the page.
    pub fn to_text(&self) -> String {
        match self {
            Self::ReviewLine { rating, text } => format!("Rating: {rating}: {text}"),
            Self::Image { src, height } => format!("[image {src} @ {height}px]"),
        }
    }

    /// Markup form, as injected into the page.
    pub fn to_html(&self) -> String {
        match self {
            Self::ReviewLine { rating, text } => format!(
                "Rating: {}: {}<br><br>",
                escape_html(rating),
                escape_html(text)
            ),
            Self::Image { src, height } => {
                format!("<img src=\"{}\" height=\"{height}\">", escape_html(src))
            }
        }
    }
}

/// A named container whose content is replaced wholesale.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Region {
    name: String,
    fragments: Vec<Fragment>,
}

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fragments: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remove all content.
    pub fn empty(&mut self) {
        self.fragments.clear();
    }

    pub fn append(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn to_html(&self) -> String {
        self.fragments.iter().fold(String::new(), |mut out, f| {
            let _ = write!(out, "{}", f.to_html());
            out
        })
    }

    pub fn text_lines(&self) -> Vec<String> {
        self.fragments.iter().map(Fragment::to_text).collect()
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
