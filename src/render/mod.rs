// Render module
// Table rendering for the sync report

pub mod report;

pub use report::{
    buffer_lines, format_time, print_report_inline, render_to_buffers, report_lines, report_rows,
    report_table, table_size, ReportRow, MAX_TABLE_ROWS, REPORT_TITLE,
};
