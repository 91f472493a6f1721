//! Self-contained HTML pages with the data embedded as JSON.

pub mod html;

pub use html::{render_report_html, render_timeline_html};
