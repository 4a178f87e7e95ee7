use std::fmt::{self, Display};

use querysim_shared::stats::MeanStd;

use crate::Analysis;

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
  pub label: String,
  pub reference: MeanStd,
  /// `None` when the group has a single member.
  pub within_group: Option<MeanStd>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
  pub groups: Vec<GroupSummary>,
}

/// Groups with no reference similarities (empty groups) are left out.
#[must_use]
pub fn summarize(analysis: &Analysis) -> Summary {
  let groups = analysis
    .groups
    .iter()
    .filter_map(|group| {
      Some(GroupSummary {
        label: group.label(),
        reference: MeanStd::of(&group.reference_similarities)?,
        within_group: MeanStd::of(&group.within_group_similarities),
      })
    })
    .collect();

  Summary { groups }
}

impl Display for Summary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Summary Statistics:")?;
    writeln!(f, "{}", "=".repeat(50))?;

    for group in &self.groups {
      writeln!(f, "{}:", group.label)?;
      writeln!(
        f,
        "  Original vs Group: mean={:.4}, std={:.4}",
        group.reference.mean, group.reference.std
      )?;
      match group.within_group {
        Some(within) => writeln!(
          f,
          "  Within Group: mean={:.4}, std={:.4}",
          within.mean, within.std
        )?,
        None => writeln!(f, "  Within Group: N/A (single query)")?,
      }
      writeln!(f)?;
    }

    Ok(())
  }
}

pub fn print_summary(analysis: &Analysis) {
  println!();
  print!("{}", summarize(analysis));
}
