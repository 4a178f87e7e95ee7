mod plot;
pub use plot::{BoxStats, Panel, PanelBox, render_boxplots, show_figure};

mod summary;
pub use summary::{GroupSummary, Summary, print_summary, summarize};
