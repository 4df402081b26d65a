const MIN_COLUMN: usize = 4;
const GAP: &str = "  ";

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render an aligned table. Numeric cells are right-aligned and, with
/// `color`, result and status words are highlighted.
#[must_use]
pub fn render_entity_table(
    headers: &[&str],
    rows: &[Vec<String>],
    options: TableOptions,
) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain([header.chars().count(), MIN_COLUMN])
                .max()
                .unwrap_or(MIN_COLUMN)
        })
        .collect();

    if let Some(max_width) = options.max_width {
        shrink_to(&mut widths, headers, max_width);
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&truncate(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join(GAP);

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line.trim_end().to_string());
    lines.push("-".repeat(header_line.chars().count()));

    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let text = truncate(row.get(index).map_or("-", String::as_str), *width);
                let padded = pad(&text, *width, is_numeric(&text));
                if options.color {
                    highlight(&text, padded)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join(GAP);
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

/// Narrow the widest shrinkable column one character at a time until the
/// table fits or every column is at its floor.
fn shrink_to(widths: &mut [usize], headers: &[&str], max_width: usize) {
    let gaps = widths.len().saturating_sub(1) * GAP.len();
    let floor = |index: usize| headers[index].chars().count().max(MIN_COLUMN);

    while widths.iter().sum::<usize>() + gaps > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(index, width)| **width > floor(*index))
            .max_by_key(|(_, width)| **width)
            .map(|(index, _)| index);
        match widest {
            Some(index) => widths[index] -= 1,
            None => break,
        }
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{value:>width$}")
    } else {
        format!("{value:<width$}")
    }
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit())
}

/// Wrap `padded` in an ANSI color chosen from the bare cell `text`.
fn highlight(text: &str, padded: String) -> String {
    let code = match text {
        "pass" | "completed" | "ready" | "authenticated" => "32",
        "in_progress" | "not_started" | "design" | "skip" => "33",
        "fail" | "closed" | "anonymous" => "31",
        _ => return padded,
    };
    format!("\u{1b}[{code}m{padded}\u{1b}[0m")
}
