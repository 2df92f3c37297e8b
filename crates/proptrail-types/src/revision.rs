use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A revision number in a repository's numbering scheme.
///
/// Revisions are non-negative and totally ordered. Revision 0 is the empty
/// root every repository starts from; committed revisions number from 1.
/// There is no in-band "invalid revision" sentinel: absence of a revision
/// is expressed with `Option` at the API that needs it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Revnum(u64);

impl Revnum {
    /// The empty root revision.
    pub const ZERO: Revnum = Revnum(0);

    /// Wrap a raw revision number.
    pub const fn new(revnum: u64) -> Self {
        Revnum(revnum)
    }

    /// The raw revision number.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns `true` for the empty root revision.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// The revision immediately before this one, or `None` at the root.
    pub fn previous(self) -> Option<Revnum> {
        self.0.checked_sub(1).map(Revnum)
    }

    /// The revision immediately after this one.
    pub fn next(self) -> Revnum {
        Revnum(self.0 + 1)
    }
}

impl From<u64> for Revnum {
    fn from(revnum: u64) -> Self {
        Revnum(revnum)
    }
}

impl From<Revnum> for u64 {
    fn from(revnum: Revnum) -> Self {
        revnum.0
    }
}

impl fmt::Display for Revnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Revnum {
    type Err = TypeError;

    /// Parse `"42"` or the conventional log form `"r42"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('r').unwrap_or(s);
        digits
            .parse::<u64>()
            .map(Revnum)
            .map_err(|_| TypeError::InvalidRevnum(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_the_number() {
        assert!(Revnum::new(1) < Revnum::new(2));
        assert!(Revnum::ZERO < Revnum::new(1));
        assert_eq!(Revnum::new(7), Revnum::new(7));
    }

    #[test]
    fn previous_stops_at_the_root() {
        assert_eq!(Revnum::new(2).previous(), Some(Revnum::new(1)));
        assert_eq!(Revnum::new(1).previous(), Some(Revnum::ZERO));
        assert_eq!(Revnum::ZERO.previous(), None);
    }

    #[test]
    fn next_increments() {
        assert_eq!(Revnum::ZERO.next(), Revnum::new(1));
        assert_eq!(Revnum::new(41).next(), Revnum::new(42));
    }

    #[test]
    fn display_is_the_bare_number() {
        assert_eq!(format!("{}", Revnum::new(42)), "42");
    }

    #[test]
    fn parses_bare_and_prefixed_forms() {
        assert_eq!("42".parse::<Revnum>().unwrap(), Revnum::new(42));
        assert_eq!("r42".parse::<Revnum>().unwrap(), Revnum::new(42));
        assert_eq!("0".parse::<Revnum>().unwrap(), Revnum::ZERO);
    }

    #[test]
    fn rejects_non_numeric_forms() {
        assert!("".parse::<Revnum>().is_err());
        assert!("r".parse::<Revnum>().is_err());
        assert!("-1".parse::<Revnum>().is_err());
        assert!("HEAD".parse::<Revnum>().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let revnum = Revnum::new(1234);
        let json = serde_json::to_string(&revnum).unwrap();
        assert_eq!(json, "1234");
        let parsed: Revnum = serde_json::from_str(&json).unwrap();
        assert_eq!(revnum, parsed);
    }
}
