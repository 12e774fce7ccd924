//! CSV rendering of the top relevant leads per company

use shared::{CsvExport, RankedLead, RunResults};

pub const DEFAULT_TOP_N: usize = 3;

const CSV_HEADER: [&str; 12] = [
    "Rank",
    "Company",
    "First Name",
    "Last Name",
    "Job Title",
    "Relevance Score",
    "Department Fit",
    "Seniority Fit",
    "Reasoning",
    "Domain",
    "Employee Range",
    "Industry",
];

pub fn export_filename(top_n: usize) -> String {
    format!("top_{top_n}_leads_per_company.csv")
}

/// Render up to `top_n` relevant leads per company.
///
/// Expects `results` grouped the way the controller returns them: ranked
/// entries first, then the rest by descending score.
pub fn render_csv(results: &RunResults, top_n: usize) -> CsvExport {
    let mut lines = vec![CSV_HEADER.join(",")];

    for company in &results.companies {
        let top = company
            .results
            .iter()
            .filter(|entry| entry.result.is_relevant())
            .take(top_n);

        for entry in top {
            lines.push(csv_row(entry));
        }
    }

    CsvExport {
        filename: export_filename(top_n),
        content: lines.join("\n"),
    }
}

fn csv_row(entry: &RankedLead) -> String {
    let result = &entry.result;
    let judgement = &result.judgement;
    let lead = entry.lead.as_ref();
    let lead_field = |field: fn(&shared::Lead) -> &str| lead.map(field).unwrap_or("");

    let fields = [
        result.rank.map(|rank| rank.to_string()).unwrap_or_default(),
        escape_field(lead_field(|l| l.company())),
        escape_field(lead_field(|l| l.lead_first_name.as_str())),
        escape_field(lead_field(|l| l.lead_last_name.as_str())),
        escape_field(lead_field(|l| l.lead_job_title.as_str())),
        judgement.relevance_score.to_string(),
        judgement.department_fit.to_string(),
        judgement.seniority_fit.to_string(),
        escape_field(&judgement.reasoning),
        escape_field(lead_field(|l| l.account_domain.as_str())),
        escape_field(lead_field(|l| l.account_employee_range.as_str())),
        escape_field(lead_field(|l| l.account_industry.as_str())),
    ];

    fields.join(",")
}

/// Quote a field when it contains a separator, quote or line break
fn escape_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
