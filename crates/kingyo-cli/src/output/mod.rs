use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// One page of a list command, with enough context to page further.
#[derive(Debug, Serialize)]
pub struct PageView<T> {
    pub page: u32,
    pub pages: u64,
    pub count: u64,
    pub rows: Vec<T>,
}

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    match serde_json::to_value(value)? {
        Value::Array(items) => Ok(render_rows(&items)),
        Value::Object(map) if is_page_view(&map) => Ok(render_page(&map)),
        Value::Object(map) => {
            let mut rows = map
                .into_iter()
                .map(|(key, value)| vec![key, value_to_cell(&value)])
                .collect::<Vec<_>>();
            rows.sort_by(|a, b| a[0].cmp(&b[0]));
            Ok(table::render_entity_table(&["key", "value"], &rows, options()))
        }
        scalar => Ok(table::render_entity_table(
            &["value"],
            &[vec![value_to_cell(&scalar)]],
            options(),
        )),
    }
}

fn is_page_view(map: &Map<String, Value>) -> bool {
    map.get("rows").is_some_and(Value::is_array) && map.contains_key("pages")
}

fn render_page(map: &Map<String, Value>) -> String {
    let rows = map
        .get("rows")
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice);
    let number = |key: &str| map.get(key).and_then(Value::as_u64).unwrap_or(0);
    format!(
        "{}\npage {} of {} ({} total)",
        render_rows(rows),
        number("page"),
        number("pages"),
        number("count")
    )
}

fn render_rows(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_entity_table(&["value"], &rows, options());
    }

    let headers = column_order(items);
    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), value_to_cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_entity_table(&header_refs, &rows, options())
}

/// Union of keys across rows, `id` first and the rest alphabetical.
fn column_order(items: &[Value]) -> Vec<String> {
    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    headers.sort_by(|a, b| (a != "id", a).cmp(&(b != "id", b)));
    headers
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;
    use serde_json::json;

    use super::{PageView, column_order, render};
    use crate::cli::OutputFormat;

    #[derive(Serialize, Clone)]
    struct Plan {
        id: u64,
        title: &'static str,
        status: &'static str,
    }

    fn plan(id: u64, title: &'static str) -> Plan {
        Plan {
            id,
            title,
            status: "in_progress",
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&plan(3, "Release"), OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], 3);
        assert_eq!(parsed["title"], "Release");
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&plan(3, "Release"), OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn table_render_for_object_is_key_value() {
        let out = render(&plan(3, "Release"), OutputFormat::Table).expect("table render should work");
        assert!(out.lines().next().is_some_and(|line| line.contains("key")));
        assert!(out.contains("Release"));
    }

    #[test]
    fn id_column_comes_first() {
        let rows = vec![json!({"title": "a", "id": 1, "status": "x"})];
        assert_eq!(column_order(&rows), vec!["id", "status", "title"]);
    }

    #[test]
    fn page_view_renders_rows_and_footer() {
        let view = PageView {
            page: 2,
            pages: 2,
            count: 12,
            rows: vec![plan(11, "Hotfix"), plan(12, "Audit")],
        };
        let out = render(&view, OutputFormat::Table).expect("table render should work");
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].starts_with("id"));
        assert!(lines[2].contains("Hotfix"));
        assert_eq!(lines.last().copied(), Some("page 2 of 2 (12 total)"));
    }

    #[test]
    fn empty_page_says_so() {
        let view: PageView<Plan> = PageView {
            page: 1,
            pages: 1,
            count: 0,
            rows: Vec::new(),
        };
        let out = render(&view, OutputFormat::Table).expect("table render should work");
        assert_eq!(out, "(no rows)\npage 1 of 1 (0 total)");
    }
}
