use std::hash::{Hash, Hasher};

use super::{
    segment::PathSegment,
    value::{Matches, Value},
};
use crate::{io::ConfigError, Result};

/// A compiled route template such as `/items/{id:int}` or `/ui/{rest:path}`.
///
/// Identity and hashing follow the original template text.
#[derive(Debug, Clone)]
pub struct PathDefinition {
    template: String,
    segments: Vec<PathSegment>,
    trailing_slash: bool,
}

impl PathDefinition {
    pub fn parse(template: &str) -> Result<Self> {
        let rest = template
            .strip_prefix('/')
            .ok_or_else(|| ConfigError::RelativeTemplate(template.to_string()))?;
        let (rest, trailing_slash) = match rest.strip_suffix('/') {
            Some(rest) => (rest, true),
            None => (rest, false),
        };
        let segments = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/')
                .map(PathSegment::parse)
                .collect::<Result<Vec<_>>>()?
        };
        if let Some(i) = segments.iter().position(PathSegment::is_path) {
            if i + 1 != segments.len() {
                return Err(ConfigError::PathNotLast(template.to_string()).into());
            }
        }
        Ok(Self {
            template: template.to_string(),
            segments,
            trailing_slash,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    fn ends_with_path(&self) -> bool {
        self.segments.last().is_some_and(PathSegment::is_path)
    }

    /// Matches an absolute request path; `Ok(None)` is a routing miss.
    pub fn matches(&self, path: &str) -> Result<Option<Matches>> {
        let rest = path
            .strip_prefix('/')
            .ok_or_else(|| ConfigError::RelativePath(path.to_string()))?;
        let greedy = self.ends_with_path();
        let rest = match rest.strip_suffix('/') {
            Some(stripped) if !greedy => {
                if !self.trailing_slash {
                    return Ok(None);
                }
                stripped
            }
            Some(_) => rest,
            None if self.trailing_slash => return Ok(None),
            None => rest,
        };
        let mut parts = if rest.is_empty() && !greedy {
            Vec::new()
        } else {
            rest.split('/').collect::<Vec<_>>()
        };
        if parts.len() < self.segments.len() {
            return Ok(None);
        }
        let mut matches = Matches::new();
        let mut segments = self.segments.as_slice();
        if greedy {
            let last = segments.len() - 1;
            let remainder = parts.split_off(last).join("/");
            if let Some(name) = segments[last].name() {
                matches.insert(name, Value::Path(remainder));
            }
            segments = &segments[..last];
        } else if parts.len() > segments.len() {
            return Ok(None);
        }
        for (segment, part) in segments.iter().zip(parts) {
            match segment.matches(part) {
                Some(Some(value)) => {
                    if let Some(name) = segment.name() {
                        matches.insert(name, value);
                    }
                }
                Some(None) => {}
                None => return Ok(None),
            }
        }
        Ok(Some(matches))
    }
}

impl PartialEq for PathDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template
    }
}

impl Eq for PathDefinition {}

impl Hash for PathDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.template.hash(state);
    }
}
