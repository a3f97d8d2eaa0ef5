//! Flattens a ranked report into a single-sheet `.xlsx` workbook.
//!
//! The column set is fixed and covers every result field, so the layout does
//! not depend on which optional fields a given run happened to populate.

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::models::evaluation::MAX_KIT_ENTRIES;
use crate::models::{EvaluationResult, EvaluationStatus};
use crate::ranking::RankedReport;

pub const SHEET_NAME: &str = "Ranking";

pub const COLUMNS: [&str; 21] = [
    "Rank",
    "Score",
    "Name",
    "Status",
    "Summary",
    "Strengths",
    "Red Flags",
    "Verification Q1",
    "Expected A1",
    "Verification Q2",
    "Expected A2",
    "Verification Q3",
    "Expected A3",
    "Behavioral Questions",
    "Email",
    "Phone",
    "LinkedIn",
    "Location",
    "Manager Blurb",
    "Outreach Email",
    "Blind Summary",
];

const NARROW: f64 = 8.0;
const MEDIUM: f64 = 24.0;
const WIDE: f64 = 60.0;

enum Cell {
    Number(f64),
    Text(String),
}

pub fn render_workbook(report: &RankedReport) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let wrapped = Format::new().set_text_wrap();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, &header)?;
        sheet.set_column_width(col, column_width(title))?;
    }
    sheet.set_freeze_panes(1, 0)?;

    for (idx, result) in report.results().iter().enumerate() {
        let row = idx as u32 + 1;
        for (col, cell) in row_cells(idx + 1, result).into_iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Number(n) => {
                    sheet.write_number(row, col, n)?;
                }
                Cell::Text(s) if s.is_empty() => {}
                Cell::Text(s) => {
                    sheet.write_string_with_format(row, col, s, &wrapped)?;
                }
            }
        }
    }

    workbook.save_to_buffer()
}

fn column_width(title: &str) -> f64 {
    match title {
        "Rank" | "Score" | "Status" => NARROW,
        "Summary" | "Manager Blurb" | "Outreach Email" | "Blind Summary"
        | "Behavioral Questions" => WIDE,
        _ => MEDIUM,
    }
}

/// One cell per entry of `COLUMNS`, in order.
fn row_cells(rank: usize, r: &EvaluationResult) -> Vec<Cell> {
    let mut cells = vec![
        Cell::Number(rank as f64),
        Cell::Number(r.score as f64),
        Cell::Text(r.name.clone()),
        Cell::Text(status_label(&r.status).to_string()),
        Cell::Text(r.summary.clone()),
        Cell::Text(r.strengths.clone()),
        Cell::Text(r.red_flags.clone()),
    ];
    for i in 0..MAX_KIT_ENTRIES {
        let item = r.verification_kit.get(i);
        cells.push(Cell::Text(
            item.map(|k| k.question.clone()).unwrap_or_default(),
        ));
        cells.push(Cell::Text(
            item.map(|k| k.expected_answer.clone()).unwrap_or_default(),
        ));
    }
    cells.extend([
        Cell::Text(r.behavioral_questions.join("\n")),
        Cell::Text(r.contact.email.clone()),
        Cell::Text(r.contact.phone.clone()),
        Cell::Text(r.contact.linkedin.clone()),
        Cell::Text(r.contact.location.clone()),
        Cell::Text(r.manager_blurb.clone()),
        Cell::Text(r.outreach_email.clone()),
        Cell::Text(r.blind_summary.clone()),
    ]);
    cells
}

fn status_label(status: &EvaluationStatus) -> &'static str {
    match status {
        EvaluationStatus::Scored => "scored",
        EvaluationStatus::Failed { .. } => "failed",
    }
}
