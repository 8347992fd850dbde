// Sync report rendering
// Stateless projection of sync operations into the analysis table

use chrono::{DateTime, Local};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    text::Line,
    widgets::{Block, BorderType, Cell, Row, Table, Widget},
    Terminal, TerminalOptions, Viewport,
};
use std::io;

use crate::operations::{CopyOperation, CopyReason, SyncOperation};
use crate::ui::Styles;

pub const REPORT_TITLE: &str = "Sync Analysis Report";

const HEADERS: [&str; 3] = ["Action", "Relative Path", "Reason"];

/// One display row of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub action: String,
    pub relative_path: String,
    pub reason: String,
}

/// Project operations into rows, preserving their order
pub fn report_rows(operations: &[SyncOperation]) -> Vec<ReportRow> {
    operations
        .iter()
        .map(|operation| match operation {
            SyncOperation::Copy(copy) => ReportRow {
                action: format!("{} {}", operation.action(), copy.direction.label()),
                relative_path: copy.relative_path.clone(),
                reason: describe_reason(copy),
            },
        })
        .collect()
}

fn describe_reason(copy: &CopyOperation) -> String {
    let side = copy.direction.source_side();
    match (copy.reason, copy.destination_mod_time) {
        (CopyReason::NewerInSource, Some(other)) => format!(
            "Newer in {side} ({} > {})",
            format_time(copy.source_mod_time),
            format_time(other)
        ),
        (CopyReason::NewerInSource, None) => format!("Newer in {side}"),
        (CopyReason::OnlyInSource, _) => format!("Only in {side}"),
    }
}

/// Format epoch seconds as local `YYYY-MM-DD HH:MM:SS`
pub fn format_time(secs: f64) -> String {
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1_000_000_000.0) as u32;

    match DateTime::from_timestamp(whole as i64, nanos.min(999_999_999)) {
        Some(utc) => utc.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format!("{secs:.3}s"),
    }
}

fn text_width(text: &str) -> u16 {
    u16::try_from(Line::from(text).width()).unwrap_or(u16::MAX)
}

fn column_widths(rows: &[ReportRow]) -> [u16; 3] {
    let mut widths = HEADERS.map(text_width);
    for row in rows {
        for (width, text) in widths
            .iter_mut()
            .zip([&row.action, &row.relative_path, &row.reason])
        {
            *width = (*width).max(text_width(text));
        }
    }
    widths
}

/// Most body rows one table can hold: its height, borders and header included, is a `u16`
pub const MAX_TABLE_ROWS: usize = (u16::MAX - 3) as usize;

fn size_for(widths: [u16; 3], row_count: usize) -> (u16, u16) {
    // Two border columns plus one space between each column
    let width = widths
        .iter()
        .fold(4u16, |total, w| total.saturating_add(*w))
        .max(text_width(REPORT_TITLE).saturating_add(2));
    // Borders and header
    let height = u16::try_from(row_count).unwrap_or(u16::MAX).saturating_add(3);
    (width, height)
}

/// Width and height one table of `rows` needs to render without truncation.
///
/// The height saturates past [`MAX_TABLE_ROWS`]; [`render_to_buffers`] splits
/// longer reports.
pub fn table_size(rows: &[ReportRow]) -> (u16, u16) {
    size_for(column_widths(rows), rows.len())
}

fn build_table(rows: &[ReportRow], widths: [u16; 3]) -> Table<'_> {
    let header = Row::new(HEADERS).style(Styles::table_header());

    let body = rows.iter().map(|row| {
        Row::new([
            Cell::from(row.action.as_str()).style(Styles::action()),
            Cell::from(row.relative_path.as_str()).style(Styles::path()),
            Cell::from(row.reason.as_str()).style(Styles::reason()),
        ])
    });

    Table::new(body, widths.map(Constraint::Length))
        .header(header)
        .column_spacing(1)
        .block(
            Block::bordered()
                .border_type(BorderType::Thick)
                .border_style(Styles::border())
                .title(Line::styled(REPORT_TITLE, Styles::title()))
                .title_alignment(Alignment::Center),
        )
}

/// Build the ratatui table for the given rows
pub fn report_table(rows: &[ReportRow]) -> Table<'_> {
    build_table(rows, column_widths(rows))
}

/// Render the report off-screen, one buffer per [`MAX_TABLE_ROWS`] rows.
///
/// Every chunk shares the column widths of the whole report.
pub fn render_to_buffers(rows: &[ReportRow]) -> Vec<Buffer> {
    let widths = column_widths(rows);
    if rows.is_empty() {
        return vec![render_chunk(rows, widths)];
    }
    rows.chunks(MAX_TABLE_ROWS)
        .map(|chunk| render_chunk(chunk, widths))
        .collect()
}

fn render_chunk(rows: &[ReportRow], widths: [u16; 3]) -> Buffer {
    let (width, height) = size_for(widths, rows.len());
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    build_table(rows, widths).render(area, &mut buffer);
    buffer
}

/// Flatten a rendered buffer into plain text lines
pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            let mut line = String::new();
            let mut skip = 0usize;
            for x in area.left()..area.right() {
                if skip > 0 {
                    skip -= 1;
                    continue;
                }
                let symbol = buffer[(x, y)].symbol();
                skip = Line::from(symbol).width().saturating_sub(1);
                line.push_str(symbol);
            }
            line.trim_end().to_string()
        })
        .collect()
}

/// Plain text lines of the whole report, rendering one chunk at a time
pub fn report_lines(rows: &[ReportRow]) -> Vec<String> {
    let widths = column_widths(rows);
    if rows.is_empty() {
        return buffer_lines(&render_chunk(rows, widths));
    }
    rows.chunks(MAX_TABLE_ROWS)
        .flat_map(|chunk| buffer_lines(&render_chunk(chunk, widths)))
        .collect()
}

/// Draw the report into the terminal scrollback above the cursor
pub fn print_report_inline(rows: &[ReportRow]) -> io::Result<()> {
    let widths = column_widths(rows);
    let mut terminal = Terminal::with_options(
        CrosstermBackend::new(io::stdout()),
        TerminalOptions {
            viewport: Viewport::Inline(1),
        },
    )?;

    for chunk in rows.chunks(MAX_TABLE_ROWS) {
        let (width, height) = size_for(widths, chunk.len());
        let table = build_table(chunk, widths);
        terminal.insert_before(height, |buffer| {
            let area = Rect {
                width: width.min(buffer.area.width),
                ..buffer.area
            };
            table.render(area, buffer);
        })?;
    }

    Ok(())
}
