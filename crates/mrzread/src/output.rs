use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use mrzread::icao::{DateField, Document};
use mrzread::ReadOutcome;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeOutput<'a> {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<&'a Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    check_digits_ok: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    lines: &'a [String],
    timestamp: String,
}

/// Print one outcome. `lines` are the capture's records as text, kept by
/// the caller because a decoded document no longer carries them.
pub fn print_outcome(outcome: &ReadOutcome, lines: &[String], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = outcome_output(outcome, lines);
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => println!("{}", outcome_table(outcome, lines)),
        OutputFormat::Pretty => println!("{}", pretty_line(outcome, lines)),
        OutputFormat::Raw => {
            let mut text = lines.join("\n");
            text.push('\n');
            print_raw(text.as_bytes());
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn outcome_output<'a>(outcome: &'a ReadOutcome, lines: &'a [String]) -> OutcomeOutput<'a> {
    OutcomeOutput {
        kind: outcome_kind(outcome),
        layout: outcome.layout().map(|l| l.name()),
        document: outcome.document(),
        check_digits_ok: outcome.document().map(Document::check_digits_ok),
        error: match outcome {
            ReadOutcome::Unrecognized { error, .. } => Some(error.to_string()),
            _ => None,
        },
        lines,
        timestamp: now_unix_seconds(),
    }
}

fn outcome_kind(outcome: &ReadOutcome) -> &'static str {
    match outcome {
        ReadOutcome::Document { .. } => "document",
        ReadOutcome::MagStripe(_) => "magstripe",
        ReadOutcome::Unrecognized { .. } => "unrecognized",
    }
}

fn outcome_table(outcome: &ReadOutcome, lines: &[String]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    match outcome {
        ReadOutcome::Document { document, layout } => {
            table.set_header(vec!["FIELD", "VALUE", "CHECK"]);
            for (field, value, check) in document_rows(document) {
                table.add_row(vec![field.to_string(), value, check.to_string()]);
            }
            table.add_row(vec!["layout".to_string(), layout.name().to_string(), String::new()]);
        }
        ReadOutcome::MagStripe(_) => {
            table.set_header(vec!["TRACK", "DATA"]);
            for (i, line) in lines.iter().enumerate() {
                table.add_row(vec![(i + 1).to_string(), line.clone()]);
            }
        }
        ReadOutcome::Unrecognized { error, .. } => {
            table.set_header(vec!["ERROR", "LINES"]);
            table.add_row(vec![error.to_string(), lines.join("\n")]);
        }
    }
    table
}

fn document_rows(document: &Document) -> Vec<(&'static str, String, &'static str)> {
    let sex = document.sex.map(|s| s.as_str()).unwrap_or("");
    vec![
        ("type", document.doc_type.clone(), ""),
        ("subtype", document.doc_subtype.clone(), ""),
        ("country", document.country.clone(), ""),
        (
            "number",
            document.number.clone(),
            check_label(&document.number_check_digit, document.number_check_digit_ok),
        ),
        ("surname", document.surname.clone(), ""),
        ("given name", document.given_name.clone(), ""),
        ("national id", document.national_id.clone(), ""),
        ("sex", sex.to_string(), ""),
        ("nationality", document.nationality.clone(), ""),
        ("birth", date_value(&document.birth), date_check(&document.birth)),
        ("expiry", date_value(&document.expiry), date_check(&document.expiry)),
    ]
}

fn pretty_line(outcome: &ReadOutcome, lines: &[String]) -> String {
    match outcome {
        ReadOutcome::Document { document: d, .. } => format!(
            "{} {} number={} [{}] name={}, {} sex={} nationality={} birth={} [{}] expiry={} [{}]",
            d.doc_type,
            d.country,
            d.number,
            check_label(&d.number_check_digit, d.number_check_digit_ok),
            d.surname,
            d.given_name,
            d.sex.map(|s| s.as_str()).unwrap_or("-"),
            d.nationality,
            date_value(&d.birth),
            date_check(&d.birth),
            date_value(&d.expiry),
            date_check(&d.expiry),
        ),
        ReadOutcome::MagStripe(_) => format!("magstripe tracks={}", lines.join(" | ")),
        ReadOutcome::Unrecognized { error, .. } => {
            format!("unrecognized error=\"{error}\" lines={}", lines.join(" | "))
        }
    }
}

fn date_value(date: &DateField) -> String {
    if date.is_empty() {
        String::new()
    } else {
        date.to_string()
    }
}

fn date_check(date: &DateField) -> &'static str {
    check_label(&date.check_digit, date.check_digit_ok)
}

fn check_label(digit: &str, ok: bool) -> &'static str {
    match (digit.is_empty(), ok) {
        (true, _) => "-",
        (false, true) => "ok",
        (false, false) => "bad",
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
