//! Rule qualifiers.

use std::fmt::{self, Display};

/// How strongly a relation rule binds its two object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    /// No instance of the first kind stands in the relation.
    None,
    /// At least one instance of the first kind stands in the relation.
    ///
    /// Checkable, but too weak to drive a fill: it prunes almost nothing
    /// and the fill algorithms reject it.
    AtLeastOne,
    /// Every instance of the first kind stands in the relation.
    Every,
}

impl Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "no",
            Self::AtLeastOne => "at least one",
            Self::Every => "every",
        };
        f.write_str(s)
    }
}

/// Whether a band rule pins the band size exactly or only bounds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    /// The smallest band containing the objects is exactly the stated
    /// size.
    Strict,
    /// The objects fit in a band of at most the stated size.
    Within,
}

impl Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Strict => "exactly",
            Self::Within => "within",
        };
        f.write_str(s)
    }
}
