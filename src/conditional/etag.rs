//! Entity-tags (RFC 7232, section 2.3).

use std::fmt;

use serde::Deserialize;

/// How two entity-tags are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Both tags must be strong and their opaque tags identical.
    Strong,
    /// Opaque tags must be identical; weakness is ignored.
    #[default]
    Weak,
}

/// An entity-tag: an opaque validator plus a weakness flag.
///
/// The opaque tag is stored without the surrounding double quotes and must
/// not contain any itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityTag {
    tag: String,
    weak: bool,
}

impl EntityTag {
    /// `tag` is the opaque part without the surrounding quotes. It should not
    /// contain `"` itself; [`EntityTag::parse`] does not check the interior, so
    /// a tag parsed from `"a"b"` keeps its inner quote and prints back verbatim.
    pub fn new(tag: impl Into<String>, weak: bool) -> Self {
        Self {
            tag: tag.into(),
            weak,
        }
    }

    pub fn strong(tag: impl Into<String>) -> Self {
        Self::new(tag, false)
    }

    pub fn weak(tag: impl Into<String>) -> Self {
        Self::new(tag, true)
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_weak(&self) -> bool {
        self.weak
    }

    /// Parses a header value such as `"xyzzy"` or `W/"xyzzy"`.
    ///
    /// Only the framing is checked: an optional `W/` prefix followed by a
    /// double-quoted string. Whatever sits between the quotes is taken as the
    /// opaque tag.
    ///
    /// ```
    /// # use revalidate::conditional::EntityTag;
    /// assert_eq!(EntityTag::parse("W/\"v1\""), Some(EntityTag::weak("v1")));
    /// assert_eq!(EntityTag::parse("v1"), None);
    /// ```
    pub fn parse(s: &str) -> Option<EntityTag> {
        let (weak, quoted) = match s.strip_prefix("W/") {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let tag = quoted.strip_prefix('"')?.strip_suffix('"')?;
        Some(EntityTag::new(tag, weak))
    }

    /// Compares two tags with the given comparison function.
    pub fn equal(&self, other: &EntityTag, comparison: Comparison) -> bool {
        if comparison == Comparison::Strong && (self.weak || other.weak) {
            return false;
        }
        self.tag == other.tag
    }

    pub fn strong_eq(&self, other: &EntityTag) -> bool {
        self.equal(other, Comparison::Strong)
    }

    pub fn weak_eq(&self, other: &EntityTag) -> bool {
        self.equal(other, Comparison::Weak)
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.weak {
            f.write_str("W/")?;
        }
        write!(f, "\"{}\"", self.tag)
    }
}
