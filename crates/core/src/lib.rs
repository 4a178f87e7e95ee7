mod analysis;
pub use analysis::{Analysis, GroupAnalysis, analyze, pairwise_similarities};

mod count_range;
pub use count_range::CountRange;

mod dataset;
pub use dataset::{Dataset, QueryGroup, load_dataset};

pub mod embedding;
pub use embedding::embed_query_texts;

pub mod generation;
pub use generation::{generate_queries, generate_query_groups};

mod json_file;
pub use json_file::{read_json, write_json};

mod query_texts;
pub use query_texts::{QueryTexts, load_query_texts};

pub mod report;
pub use report::{print_summary, render_boxplots, show_figure, summarize};

pub mod selection;
pub use selection::{SelectionRun, lazy_greedy_select, select_groups};
