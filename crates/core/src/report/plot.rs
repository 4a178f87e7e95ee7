use std::path::Path;

use anyhow::Context;
use plotters::{
  coord::Shift,
  prelude::*,
  style::{
    FontTransform,
    text_anchor::{HPos, Pos, VPos},
  },
};
use querysim_shared::AppError;

use crate::Analysis;

/// 15 x 6 inches at 150 DPI.
const FIGURE_SIZE: (u32, u32) = (2250, 900);

const FONT: &str = "sans-serif";
const TITLE_FONT_SIZE: u32 = 34;
const LABEL_FONT_SIZE: u32 = 22;
const DESC_FONT_SIZE: u32 = 26;
/// Box and cap half-widths in x-axis units; boxes sit one unit apart.
const BOX_HALF_WIDTH: f64 = 0.25;
const CAP_HALF_WIDTH: f64 = 0.125;
const FLIER_RADIUS: u32 = 4;

const REFERENCE_TITLE: &str = "Original Query vs Group Queries Similarity";
const WITHIN_GROUP_TITLE: &str = "Within Group Queries Similarity";
const X_DESC: &str = "Query Groups";
const Y_DESC: &str = "Cosine Similarity";
const PLACEHOLDER: [&str; 2] = [
  "No within-group similarities",
  "(requires groups with >1 query)",
];

/// A labelled sample drawn as one box.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelBox {
  pub label: String,
  pub values: Vec<f64>,
}

/// One subplot: boxes sit at x = 1, 2, ... in the order given.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
  pub title: &'static str,
  pub boxes: Vec<PanelBox>,
}

impl Panel {
  /// Reference-vs-member distributions for every non-empty group.
  #[must_use]
  pub fn reference(analysis: &Analysis) -> Self {
    let boxes = analysis
      .groups
      .iter()
      .filter(|g| !g.reference_similarities.is_empty())
      .map(|g| PanelBox {
        label: g.label(),
        values: g.reference_similarities.clone(),
      })
      .collect();

    Self {
      title: REFERENCE_TITLE,
      boxes,
    }
  }

  /// Within-group distributions; groups without pairs are left out.
  #[must_use]
  pub fn within_group(analysis: &Analysis) -> Self {
    let boxes = analysis
      .groups
      .iter()
      .filter(|g| !g.within_group_similarities.is_empty())
      .map(|g| PanelBox {
        label: g.label(),
        values: g.within_group_similarities.clone(),
      })
      .collect();

    Self {
      title: WITHIN_GROUP_TITLE,
      boxes,
    }
  }

  fn label_at(&self, position: f64) -> String {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 || rounded < 1.0 {
      return String::new();
    }
    self
      .boxes
      .get(rounded as usize - 1)
      .map(|b| b.label.clone())
      .unwrap_or_default()
  }

  /// Vertical range covering every finite value, padded by 5%.
  fn value_range(&self) -> std::ops::Range<f64> {
    let (lo, hi) = self
      .boxes
      .iter()
      .flat_map(|b| finite(&b.values))
      .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
      });

    if lo > hi {
      return -1.0..1.0;
    }
    let pad = ((hi - lo) * 0.05).max(0.01);
    (lo - pad)..(hi + pad)
  }
}

/// Undefined similarities have no place on the value axis.
fn finite(values: &[f64]) -> Vec<f64> {
  values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Tukey box statistics.
///
/// Quartiles interpolate linearly between order statistics. Whiskers end at
/// the most extreme data points within 1.5 IQR of the box; anything beyond
/// is a flier.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
  pub q1: f64,
  pub median: f64,
  pub q3: f64,
  pub whisker_low: f64,
  pub whisker_high: f64,
  pub fliers: Vec<f64>,
}

impl BoxStats {
  /// `None` when no finite value is left.
  #[must_use]
  pub fn of(values: &[f64]) -> Option<Self> {
    let mut sorted = finite(values);
    if sorted.is_empty() {
      return None;
    }
    sorted.sort_by(f64::total_cmp);

    let q1 = percentile(&sorted, 0.25);
    let median = percentile(&sorted, 0.5);
    let q3 = percentile(&sorted, 0.75);
    let iqr = q3 - q1;
    let (low_fence, high_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let whisker_low = sorted
      .iter()
      .copied()
      .find(|&v| v >= low_fence)
      .unwrap_or(q1);
    let whisker_high = sorted
      .iter()
      .rev()
      .copied()
      .find(|&v| v <= high_fence)
      .unwrap_or(q3);
    let fliers = sorted
      .into_iter()
      .filter(|&v| v < low_fence || v > high_fence)
      .collect();

    Some(Self {
      q1,
      median,
      q3,
      whisker_low,
      whisker_high,
      fliers,
    })
  }
}

/// `sorted` must be non-empty and ascending.
fn percentile(sorted: &[f64], p: f64) -> f64 {
  let rank = p * (sorted.len() - 1) as f64;
  let (lo, hi) = (rank.floor() as usize, rank.ceil() as usize);
  sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

/// Render the two-panel boxplot figure and write it as PNG to `path`.
pub fn render_boxplots(analysis: &Analysis, path: &Path) -> Result<(), AppError> {
  let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
  root.fill(&WHITE)?;

  let panels = [Panel::reference(analysis), Panel::within_group(analysis)];
  for (area, panel) in root.split_evenly((1, 2)).iter().zip(&panels) {
    draw_panel(area, panel).with_context(|| format!("failed to draw `{}`", panel.title))?;
  }

  root
    .present()
    .with_context(|| format!("failed to write {}", path.display()))?;

  tracing::info!(path = %path.display(), "Plot saved");
  Ok(())
}

fn draw_panel(area: &DrawingArea<BitMapBackend<'_>, Shift>, panel: &Panel) -> anyhow::Result<()> {
  if panel.boxes.is_empty() {
    return draw_placeholder(area, panel.title);
  }

  let count = panel.boxes.len();
  let positions: Vec<f64> = (1..=count).map(|p| p as f64).collect();
  let label_style = (FONT, LABEL_FONT_SIZE)
    .into_font()
    .transform(FontTransform::Rotate90);

  let mut chart = ChartBuilder::on(area)
    .caption(panel.title, (FONT, TITLE_FONT_SIZE))
    .margin(24)
    .x_label_area_size(170)
    .y_label_area_size(90)
    .build_cartesian_2d(
      // `PartialAxis` over the full range is an identity wrapper whose
      // `DefaultFormatting` lets `WithKeyPoints` satisfy `ValueFormatter`.
      (0.0..count as f64 + 1.0)
        .partial_axis(0.0..count as f64 + 1.0)
        .with_key_points(positions.clone()),
      panel.value_range(),
    )?;

  chart
    .configure_mesh()
    .x_labels(count + 2)
    .x_label_formatter(&|x| panel.label_at(*x))
    .x_label_style(label_style)
    .y_label_style((FONT, LABEL_FONT_SIZE))
    .x_desc(X_DESC)
    .y_desc(Y_DESC)
    .axis_desc_style((FONT, DESC_FONT_SIZE))
    .disable_x_mesh()
    .bold_line_style(BLACK.mix(0.3).stroke_width(1))
    .light_line_style(BLACK.mix(0.08).stroke_width(1))
    .draw()?;

  let stats: Vec<(f64, BoxStats)> = positions
    .iter()
    .zip(&panel.boxes)
    .filter_map(|(&x, b)| Some((x, BoxStats::of(&b.values)?)))
    .collect();

  let box_style = BLUE.stroke_width(2);
  let median_style = RED.stroke_width(2);

  chart.draw_series(stats.iter().map(|(x, s)| {
    Rectangle::new(
      [(x - BOX_HALF_WIDTH, s.q3), (x + BOX_HALF_WIDTH, s.q1)],
      box_style,
    )
  }))?;
  chart.draw_series(stats.iter().map(|(x, s)| {
    PathElement::new(
      vec![(x - BOX_HALF_WIDTH, s.median), (x + BOX_HALF_WIDTH, s.median)],
      median_style,
    )
  }))?;
  chart.draw_series(stats.iter().flat_map(|(x, s)| {
    let x = *x;
    [(s.q1, s.whisker_low), (s.q3, s.whisker_high)]
      .into_iter()
      .flat_map(move |(edge, end)| {
        [
          PathElement::new(vec![(x, edge), (x, end)], box_style),
          PathElement::new(
            vec![(x - CAP_HALF_WIDTH, end), (x + CAP_HALF_WIDTH, end)],
            box_style,
          ),
        ]
      })
  }))?;
  chart.draw_series(stats.iter().flat_map(|(x, s)| {
    s.fliers
      .iter()
      .map(move |&v| Circle::new((*x, v), FLIER_RADIUS, box_style))
  }))?;

  Ok(())
}

fn draw_placeholder(
  area: &DrawingArea<BitMapBackend<'_>, Shift>,
  title: &str,
) -> anyhow::Result<()> {
  let area = area.titled(title, (FONT, TITLE_FONT_SIZE))?;
  let (width, height) = area.dim_in_pixel();
  let style = TextStyle::from((FONT, DESC_FONT_SIZE).into_font())
    .pos(Pos::new(HPos::Center, VPos::Center));

  let line_height = DESC_FONT_SIZE as i32 + 8;
  let center_x = width as i32 / 2;
  let first_y = height as i32 / 2 - line_height / 2;
  for (line, y) in PLACEHOLDER.iter().zip((0..).map(|i| first_y + i * line_height)) {
    area.draw(&Text::new(*line, (center_x, y), style.clone()))?;
  }

  Ok(())
}

/// Open the saved figure in the platform's default image viewer.
pub fn show_figure(path: &Path) {
  if let Err(err) = open::that(path) {
    tracing::warn!(path = %path.display(), error = %err, "Could not open plot viewer");
  }
}
