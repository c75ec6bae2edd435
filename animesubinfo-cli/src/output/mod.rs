//! CLI output formatting and display helpers.

use animesubinfo::Subtitles;

const HEADERS: [&str; 7] = ["ID", "Episode", "Title", "Format", "Author", "Date", "Downloads"];
const TITLE_COLUMN: usize = 2;
const MIN_TITLE_WIDTH: usize = 10;
const COLUMN_GAP: &str = "  ";

/// Returns terminal width from COLUMNS, or 80 if unset/invalid.
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 20)
        .unwrap_or(80)
}

/// Truncates text to at most `width` chars, appending ellipsis if truncated.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let text_len = text.chars().count();
    if text_len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    if width == 1 {
        return "…".to_string();
    }

    let mut output: String = text.chars().take(width - 1).collect();
    output.push('…');
    output
}

fn row_cells(subtitles: &Subtitles) -> [String; 7] {
    [
        subtitles.id.to_string(),
        subtitles.episode_label(),
        subtitles.original_title.clone(),
        subtitles.format.clone(),
        subtitles.author.clone(),
        subtitles.date.format("%Y-%m-%d").to_string(),
        subtitles.downloaded_times.to_string(),
    ]
}

/// Renders subtitles as an aligned table: header, rule, one line per entry.
///
/// The title column absorbs whatever `width` leaves after the other columns
/// and is truncated to fit.
pub fn render_subtitles_table(subtitles: &[Subtitles], width: usize) -> Vec<String> {
    let rows: Vec<[String; 7]> = subtitles.iter().map(row_cells).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (column, cell) in row.iter().enumerate() {
            widths[column] = widths[column].max(cell.chars().count());
        }
    }
    let fixed: usize = widths
        .iter()
        .enumerate()
        .filter(|(column, _)| *column != TITLE_COLUMN)
        .map(|(_, w)| *w)
        .sum::<usize>()
        + COLUMN_GAP.len() * (HEADERS.len() - 1);
    widths[TITLE_COLUMN] = widths[TITLE_COLUMN]
        .min(width.saturating_sub(fixed))
        .max(MIN_TITLE_WIDTH);

    let render = |cells: &[String]| {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{:<w$}", truncate_to_width(cell, w)))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        line.trim_end().to_string()
    };

    let header: Vec<String> = HEADERS.iter().map(ToString::to_string).collect();
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render(&header));
    lines.push("-".repeat(widths.iter().sum::<usize>() + COLUMN_GAP.len() * (HEADERS.len() - 1)));
    lines.extend(rows.iter().map(|row| render(row)));
    lines
}

/// Prints the table to stdout sized to the terminal.
pub fn print_subtitles_table(subtitles: &[Subtitles]) {
    for line in render_subtitles_table(subtitles, terminal_width()) {
        println!("{line}");
    }
}
