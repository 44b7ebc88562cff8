use std::{fmt, str::FromStr};

use crate::Error;

/// Which report to produce. Parsed from the `/reports/{kind}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
  Objects,
  Relations,
  Hierarchies,
  Full,
}

impl ReportKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Objects => "objects",
      Self::Relations => "relations",
      Self::Hierarchies => "hierarchies",
      Self::Full => "full",
    }
  }

  /// Document title shown on the first line of the report.
  pub fn title(self) -> &'static str {
    match self {
      Self::Objects => "Object Design System - Objects Report",
      Self::Relations => "Object Design System - Relations Report",
      Self::Hierarchies => "Object Design System - Hierarchies Report",
      Self::Full => "Object Design System - Complete Report",
    }
  }
}

impl fmt::Display for ReportKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ReportKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "objects" => Ok(Self::Objects),
      "relations" => Ok(Self::Relations),
      "hierarchies" => Ok(Self::Hierarchies),
      "full" => Ok(Self::Full),
      other => Err(Error::UnknownKind(other.to_owned())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_known_kinds_only() {
    for kind in [
      ReportKind::Objects,
      ReportKind::Relations,
      ReportKind::Hierarchies,
      ReportKind::Full,
    ] {
      assert_eq!(kind.as_str().parse::<ReportKind>().unwrap(), kind);
    }
    assert!(matches!("summary".parse::<ReportKind>(), Err(Error::UnknownKind(s)) if s == "summary"));
    assert!("Objects".parse::<ReportKind>().is_err());
  }
}
