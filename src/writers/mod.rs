pub mod report_writer;

pub use report_writer::{format_report, Report, ReportFormat, ReportWriter};
