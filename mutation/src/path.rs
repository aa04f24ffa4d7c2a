//! Nested input paths used to locate errors.

use std::fmt;

/// Location of a value inside the caller's nested input, e.g. `input.posts.create[1]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NestedPath {
    segments: Vec<String>,
}

impl NestedPath {
    /// The path of the root input object.
    pub fn root() -> Self {
        Self {
            segments: vec!["input".to_string()],
        }
    }

    /// Path of a named field below this one.
    pub fn field(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// Path of a list element below this one.
    pub fn index(&self, i: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", i));
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl Default for NestedPath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for NestedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && !segment.starts_with('[') {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}
