//! Output paths as segment lists

use std::fmt;

/// Segment stepping up one folder
const PARENT: &str = "..";

/// A `/`-separated output path relative to the output root or to another
/// page; the last segment names the file
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativePath {
    segments: Vec<String>,
}

impl RelativePath {
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Parse a `/`-separated path, ignoring empty segments
    #[must_use]
    pub fn parse(path: &str) -> Self {
        Self::new(
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Final segment, naming the file
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The folder holding the file: every segment but the last
    #[must_use]
    pub fn folder(&self) -> &[String] {
        self.segments
            .split_last()
            .map_or(&[][..], |(_, folder)| folder)
    }

    /// This path's folder followed by `segments`
    #[must_use]
    pub fn sibling(&self, segments: &[String]) -> Self {
        let mut result = self.folder().to_vec();
        result.extend_from_slice(segments);
        Self::new(result)
    }

    /// The shortest path reaching `to` from the page at `self`
    ///
    /// Both paths must be relative to the same root. Only the folders of the
    /// two paths take part in the common prefix, so the result always ends
    /// with at least the file segment of `to`.
    #[must_use]
    pub fn relative(&self, to: &Self) -> Self {
        let common = self
            .folder()
            .iter()
            .zip(to.folder())
            .take_while(|(a, b)| a == b)
            .count();
        let ups = self.len().saturating_sub(common + 1);

        let mut segments = vec![PARENT.to_string(); ups];
        segments.extend_from_slice(&to.segments[common..]);
        Self::new(segments)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
