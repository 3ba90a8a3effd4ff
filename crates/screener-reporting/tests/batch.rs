use std::io::{Cursor, Write};

use screener_core::{JobLevel, ProfileSchema, Remark, RequirementsProfile, UNKNOWN_EDUCATION};
use screener_ingest::Upload;
use screener_reporting::{ExportFormat, build_report, export_results, read_report};
use zip::write::SimpleFileOptions;

const QA_PROFILE: &str = r#"{
    "must_have": ["Selenium", "API Testing"],
    "good_to_have": ["Cypress", "JMeter"],
    "must_not_have": ["terminated for cause"],
    "preferred_tools": ["Jira", "Postman"],
    "certifications": ["ISTQB"],
    "domain_keywords": ["banking"],
    "min_education_keywords": ["master", "bachelor"],
    "min_years_experience": 3,
    "education_level": "bachelor",
    "min_total_score": 60
}"#;

fn profile() -> RequirementsProfile {
    RequirementsProfile::from_json_str(QA_PROFILE, ProfileSchema::Strict).unwrap()
}

fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!("<w:document><w:body>{body}</w:body></w:document>");
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

#[test]
fn mixed_batch_is_scored_row_by_row() {
    let uploads = vec![
        Upload::new(
            "senior.TXT",
            b"5 years of experience in Selenium and API Testing, java certified".to_vec(),
        ),
        Upload::new(
            "flagged.txt",
            b"Selenium, API testing, Cypress, ISTQB. Terminated for cause in 2021.".to_vec(),
        ),
        Upload::new("empty.txt", Vec::new()),
        Upload::new("broken.pdf", b"%PDF-1.7 not really".to_vec()),
        Upload::new(
            "writer.docx",
            docx(&["Master of Science", "Twenty three years of experience", "Jira"]),
        ),
        Upload::new("photo.png", b"\x89PNG".to_vec()),
    ];

    let rows = build_report(&uploads, &profile(), |_| {}).unwrap();
    assert_eq!(rows.len(), uploads.len());

    // Two of six senior must-haves: 20, plus +3 experience and +2 senior.
    let senior = &rows[0];
    assert_eq!(senior.candidate, "senior.TXT");
    assert_eq!(senior.job_level, JobLevel::Senior);
    assert_eq!(senior.experience_years, 5.0);
    assert!(senior.missing_must_have.is_empty());
    assert_eq!(senior.score, 25.0);
    assert_eq!(senior.remark, Remark::Weak);

    let flagged = &rows[1];
    assert_eq!(flagged.red_flags, ["terminated for cause"]);
    assert_eq!(flagged.score, 0.0);
    assert_eq!(flagged.remark, Remark::Disqualified);

    for empty in [&rows[2], &rows[3], &rows[5]] {
        assert_eq!(empty.score, 0.0, "{}", empty.candidate);
        assert_eq!(empty.remark, Remark::Weak);
        assert_eq!(empty.experience_years, 0.0);
        assert_eq!(empty.education, UNKNOWN_EDUCATION);
        assert_eq!(empty.missing_must_have, ["selenium", "api testing"]);
    }

    let writer = &rows[4];
    assert_eq!(writer.experience_years, 23.0);
    assert_eq!(writer.job_level, JobLevel::Senior);
    assert_eq!(writer.education, "master");
    assert_eq!(writer.preferred_tools, ["jira"]);
}

#[test]
fn exported_csv_reads_back_to_the_same_rows() {
    let uploads = vec![
        Upload::new(
            "alice.txt",
            b"Bachelor. 2 years with Selenium, Postman, Jira, banking; led QA, strong communication"
                .to_vec(),
        ),
        Upload::new("bob, jr.txt", b"cypress and jmeter".to_vec()),
    ];
    let rows = build_report(&uploads, &profile(), |_| {}).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output").join("cv_matching_report.csv");
    export_results(&rows, ExportFormat::Csv, &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("Candidate,Job Level,Match %,Remarks,"));
    assert!(content.contains(",Bachelor,"));

    let reread = read_report(&path).unwrap();
    assert_eq!(reread, rows);
}

#[test]
fn runaway_number_words_do_not_sink_the_batch() {
    let runaway = format!("{} years of experience in selenium", vec!["hundred"; 10].join("-"));
    let uploads = vec![
        Upload::new("good.txt", b"4 years of experience, selenium, api testing".to_vec()),
        Upload::new("odd.txt", runaway.into_bytes()),
    ];

    let rows = build_report(&uploads, &profile(), |_| {}).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].candidate, "good.txt");
    assert_eq!(rows[0].experience_years, 4.0);
    assert_eq!(rows[1].candidate, "odd.txt");
    assert_eq!(rows[1].experience_years, 0.0);
    assert_eq!(rows[1].job_level, JobLevel::Associate);
    assert_eq!(rows[1].missing_must_have, ["api testing"]);
}
