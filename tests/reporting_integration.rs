use std::fs;

use crawdad::models::{AuditSummary, Credentials, Outcome, ParameterRow, RejectedRow, RequestDescriptor};
use crawdad::reporting::{export_csv, export_json, export_markdown, render, render_summary};

fn outcome(line: usize, query: &str, creds: Option<(&str, &str)>, succeeded: bool) -> Outcome {
    Outcome {
        row: ParameterRow::from_pairs(line, vec![("q", query)]),
        request: RequestDescriptor {
            query_string: query.to_string(),
            credentials: creds.map(|(u, p)| Credentials {
                username: u.to_string(),
                password: p.to_string(),
            }),
        },
        succeeded,
        status: Some(if succeeded { 200 } else { 401 }),
        error: None,
    }
}

#[test]
fn render_empty_is_no_success() {
    assert_eq!(render(&Vec::<Outcome>::new()), "No success.");
    // Failed outcomes alone still mean no success
    assert_eq!(render(&[outcome(2, "a=1", None, false)]), "No success.");
}

#[test]
fn render_lists_each_success() {
    let outcomes = vec![
        outcome(2, "user=alice", None, true),
        outcome(3, "user=bob", None, false),
        outcome(4, "", Some(("carol", "letmein")), true),
    ];

    assert_eq!(
        render(&outcomes),
        "Found 2 successes:\n  - Line 2 with query string user=alice\n  - Line 4 with query string <blank> (credentials carol/letmein)"
    );
}

#[test]
fn render_summary_notes_interruption() {
    let summary = AuditSummary {
        outcomes: vec![outcome(2, "a=1", None, true)],
        rejected: vec![RejectedRow { line_number: 3, reason: "no user".to_string() }],
        cancelled: true,
    };

    let text = render_summary(&summary);
    assert!(text.starts_with("Audited 2 parameter sets (1 rejected).\n"));
    assert!(text.contains("interrupted"));
    assert!(text.ends_with("Found 1 success:\n  - Line 2 with query string a=1"));
}

#[test]
fn reporting_exports_create_files() {
    let dir = tempfile::tempdir().unwrap();
    let outcomes = vec![
        outcome(2, "user=alice&pass=secret", None, true),
        outcome(3, "", Some(("bob", "hunter2")), false),
    ];

    let csv_path = export_csv(&outcomes, dir.path()).expect("CSV export should succeed");
    let md_path = export_markdown(&outcomes, dir.path()).expect("Markdown export should succeed");
    let json_path = export_json(&outcomes, dir.path()).expect("JSON export should succeed");

    for path in [&csv_path, &md_path, &json_path] {
        assert!(path.exists(), "report should exist: {}", path.display());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("crawdad_report_"));
    }

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("line,query_string,username,password,status,succeeded,error\n"));
    assert!(csv.contains("2,user=alice&pass=secret,,,200,true,"));
    assert!(csv.contains("3,,bob,hunter2,401,false,"));

    let md = fs::read_to_string(&md_path).unwrap();
    assert!(md.contains("1 of 2 parameter sets succeeded."));
    assert!(md.contains("| 3 | `<blank>` | bob/hunter2 | 401 | failure |"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["line"], 2);
    assert_eq!(json[0]["succeeded"], true);
    assert_eq!(json[1]["username"], "bob");
    assert!(json[0]["username"].is_null());
}

#[test]
fn csv_export_escapes_formula_cells() {
    let dir = tempfile::tempdir().unwrap();
    let outcomes = vec![outcome(2, "=HYPERLINK(\"http://evil.com\")", Some(("@admin", "-1")), true)];

    let csv_path = export_csv(&outcomes, dir.path()).unwrap();
    let content = fs::read_to_string(&csv_path).unwrap();

    assert!(content.contains("\"'=HYPERLINK(\"\"http://evil.com\"\")\""));
    assert!(content.contains(",'@admin,'-1,"));
}
