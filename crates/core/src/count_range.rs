use std::{fmt, ops::RangeInclusive, str::FromStr};

use anyhow::{anyhow, bail};
use querysim_shared::MAX_GROUPS;

/// A single count (`"5"`) or an inclusive range of counts (`"1-20"`), each
/// in `1..=MAX_GROUPS` so that it names a valid `"{n}_queries"` group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRange {
  start: u32,
  end: u32,
}

impl CountRange {
  #[must_use]
  pub const fn single(n: u32) -> Self {
    Self { start: n, end: n }
  }

  #[must_use]
  pub fn counts(&self) -> RangeInclusive<u32> {
    self.start..=self.end
  }
}

impl FromStr for CountRange {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let parse = |part: &str| -> anyhow::Result<u32> {
      let n: u32 = part
        .trim()
        .parse()
        .map_err(|_| anyhow!("`{part}` is not a positive integer"))?;
      if !(1..=MAX_GROUPS).contains(&n) {
        bail!("count {n} is outside 1..={MAX_GROUPS}");
      }
      Ok(n)
    };

    let (start, end) = match s.split_once('-') {
      Some((start, end)) => (parse(start)?, parse(end)?),
      None => {
        let n = parse(s)?;
        (n, n)
      }
    };
    if end < start {
      bail!("invalid range `{s}`: end is below start (use a format like `1-20`)");
    }

    Ok(Self { start, end })
  }
}

impl fmt::Display for CountRange {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.start == self.end {
      write!(f, "{}", self.start)
    } else {
      write!(f, "{}-{}", self.start, self.end)
    }
  }
}
