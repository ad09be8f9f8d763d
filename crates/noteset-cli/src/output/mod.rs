use std::io::IsTerminal;
use std::sync::OnceLock;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::{ColorMode, GlobalFlags, OutputFormat};

pub mod table;

static TABLE_OPTIONS: OnceLock<table::TableOptions> = OnceLock::new();

/// Fix table styling for the rest of the process from the global flags,
/// the terminal, `NO_COLOR` and `COLUMNS`.
pub fn init(flags: &GlobalFlags) {
    let columns = std::env::var("COLUMNS").ok();
    let options = resolve_table_options(
        flags,
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
        columns.as_deref(),
    );
    let _ = TABLE_OPTIONS.set(options);
}

fn resolve_table_options(
    flags: &GlobalFlags,
    stdout_is_terminal: bool,
    no_color: bool,
    columns: Option<&str>,
) -> table::TableOptions {
    let tabular = flags.format == OutputFormat::Table;
    let color = match flags.color {
        ColorMode::Always => tabular,
        ColorMode::Never => false,
        ColorMode::Auto => tabular && stdout_is_terminal && !flags.quiet && !no_color,
    };
    // Widths under 40 are treated as unset.
    let max_width = columns
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|width| *width >= 40);
    table::TableOptions { max_width, color }
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

fn table_options() -> table::TableOptions {
    TABLE_OPTIONS.get().copied().unwrap_or_default()
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    match value {
        Value::Array(items) => Ok(render_array_table(&items)),
        Value::Object(map) => Ok(match sole_array(&map) {
            // `{"notes": [...]}` and `{"outcomes": [...]}` read best as rows.
            Some(items) => render_array_table(items),
            None => render_key_value_table(map),
        }),
        scalar => {
            let headers = ["value"];
            let rows = vec![vec![value_to_cell(&scalar)]];
            Ok(table::render_entity_table(&headers, &rows, table_options()))
        }
    }
}

fn sole_array(map: &Map<String, Value>) -> Option<&[Value]> {
    if map.len() != 1 {
        return None;
    }
    map.values().next().and_then(Value::as_array).map(Vec::as_slice)
}

fn render_key_value_table(map: Map<String, Value>) -> String {
    let headers = ["key", "value"];
    let mut entries = map.into_iter().collect::<Vec<_>>();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    let rows = entries
        .into_iter()
        .map(|(key, value)| vec![key, value_to_cell(&value)])
        .collect::<Vec<_>>();
    table::render_entity_table(&headers, &rows, table_options())
}

fn render_array_table(items: &[Value]) -> String {
    let options = table_options();

    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let headers = ["value"];
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_entity_table(&headers, &rows, options);
    }

    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    if headers.is_empty() {
        return String::from("(no columns)");
    }

    // `id` leads; the rest keep first-appearance order.
    headers.sort_by_key(|header| header != "id");

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

    table::render_entity_table(&header_refs, &rows, options)
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
    use noteset_core::entities::Note;
    use noteset_core::enums::RowOp;
    use noteset_core::responses::{ApplyReport, NotesPage, RowOutcome, RowStatus};

    use super::{render, resolve_table_options, table::render_entity_table, table::TableOptions};
    use crate::cli::{ColorMode, GlobalFlags, OutputFormat};

    fn flags(format: OutputFormat, color: ColorMode) -> GlobalFlags {
        GlobalFlags {
            format,
            color,
            quiet: false,
            verbose: false,
            project: None,
        }
    }

    fn page() -> NotesPage {
        NotesPage {
            notes: vec![Note::new(1, "alpha"), Note::new(12, "beta")],
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&page(), OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["notes"][1]["id"], 12);
        assert_eq!(parsed["notes"][1]["content"], "beta");
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&page(), OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
        let parsed: NotesPage = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed, page());
    }

    #[test]
    fn notes_page_renders_one_row_per_note() {
        let out = render(&page(), OutputFormat::Table).expect("table render should work");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("id"));
        assert!(lines[0].contains("content"));
        assert!(lines[3].contains("beta"));
    }

    #[test]
    fn empty_page_says_so() {
        let out = render(&NotesPage::default(), OutputFormat::Table).expect("table render should work");
        assert_eq!(out, "(no rows)");
    }

    #[test]
    fn report_rows_carry_status_and_message() {
        let mut report = ApplyReport::default();
        report.push(RowOutcome::new(RowOp::Delete, Some(3), RowStatus::Applied));
        report.push(RowOutcome::new(
            RowOp::Upsert,
            Some(4),
            RowStatus::Failed {
                message: "locked".into(),
            },
        ));

        let out = render(&report, OutputFormat::Table).expect("table render should work");
        assert!(out.lines().next().is_some_and(|line| line.contains("status")));
        assert!(out.contains("applied"));
        assert!(out.contains("locked"));
        // The applied row has no message column value.
        assert!(out.lines().nth(2).is_some_and(|line| line.trim_end().ends_with('-')));
    }

    #[test]
    fn table_alignment_handles_mixed_widths() {
        let headers = ["id", "op", "status"];
        let rows = vec![
            vec!["1".to_string(), "delete".to_string(), "applied".to_string()],
            vec!["200".to_string(), "upsert".to_string(), "inserted".to_string()],
        ];

        let table = render_entity_table(
            &headers,
            &rows,
            TableOptions {
                max_width: None,
                color: false,
            },
        );
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2].len(), lines[3].len());
    }

    #[test]
    fn auto_color_needs_a_terminal_and_no_no_color() {
        let table = flags(OutputFormat::Table, ColorMode::Auto);
        assert!(resolve_table_options(&table, true, false, None).color);
        assert!(!resolve_table_options(&table, false, false, None).color);
        assert!(!resolve_table_options(&table, true, true, None).color);

        let quiet = GlobalFlags { quiet: true, ..table };
        assert!(!resolve_table_options(&quiet, true, false, None).color);
    }

    #[test]
    fn forced_color_only_applies_to_tables() {
        let always_json = flags(OutputFormat::Json, ColorMode::Always);
        assert!(!resolve_table_options(&always_json, true, false, None).color);

        let always_table = flags(OutputFormat::Table, ColorMode::Always);
        assert!(resolve_table_options(&always_table, false, true, None).color);

        let never = flags(OutputFormat::Table, ColorMode::Never);
        assert!(!resolve_table_options(&never, true, false, None).color);
    }

    #[test]
    fn columns_below_forty_are_ignored() {
        let table = flags(OutputFormat::Table, ColorMode::Never);
        assert_eq!(
            resolve_table_options(&table, false, false, Some("120")),
            TableOptions {
                max_width: Some(120),
                color: false,
            }
        );
        assert_eq!(resolve_table_options(&table, false, false, Some("12")).max_width, None);
        assert_eq!(resolve_table_options(&table, false, false, Some("wide")).max_width, None);
    }
}
