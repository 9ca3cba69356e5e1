//! Presentation of ranked results

pub mod formatter;
pub mod report;

pub use formatter::{render_html_fragment, save_report_to_file, suggest_filename, ReportGenerator};
pub use report::{format_score, RankedTable};
