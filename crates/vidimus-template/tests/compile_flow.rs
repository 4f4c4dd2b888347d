//! End-to-end compile flows against real xlsx packages built in-test.

use std::io::{Cursor, Write};

use vidimus_template::annotation::FieldType;
use vidimus_template::{compile_upload, ArtifactStore, Error, TemplateDescriptor, UploadRequest};
use zip::write::SimpleFileOptions;

/// Assemble an xlsx package from `(part name, content)` pairs.
fn build_package(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in parts {
        zip.start_file(*name, options).expect("start part");
        zip.write_all(content.as_bytes()).expect("write part");
    }
    zip.finish().expect("finish package").into_inner()
}

fn annotated_workbook() -> Vec<u8> {
    build_package(&[
        (
            "xl/workbook.xml",
            r#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
                <sheets>
                    <sheet name="Main" sheetId="1" r:id="rId1"/>
                    <sheet name="EB_META" sheetId="2" r:id="rId2"/>
                </sheets>
            </workbook>"#,
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<Relationships>
                <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
                <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
            </Relationships>"#,
        ),
        (
            "xl/sharedStrings.xml",
            r#"<sst>
                <si><t>Expense Claim</t></si>
                <si><t>TitleCell</t></si>
                <si><t>A1</t></si>
            </sst>"#,
        ),
        (
            "xl/worksheets/sheet1.xml",
            r#"<worksheet>
                <sheetData>
                    <row r="1"><c r="A1" t="s"><v>0</v></c></row>
                    <row r="3"><c r="B3"><v>0</v></c></row>
                </sheetData>
                <mergeCells count="1"><mergeCell ref="F1:F3"/></mergeCells>
                <dataValidations count="1">
                    <dataValidation type="date" sqref="C3"/>
                </dataValidations>
            </worksheet>"#,
        ),
        (
            "xl/worksheets/sheet2.xml",
            r#"<worksheet>
                <sheetData>
                    <row r="1">
                        <c r="A1" t="s"><v>1</v></c>
                        <c r="B1" t="s"><v>2</v></c>
                    </row>
                </sheetData>
            </worksheet>"#,
        ),
        (
            "xl/worksheets/_rels/sheet1.xml.rels",
            r#"<Relationships>
                <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments" Target="../comments1.xml"/>
            </Relationships>"#,
        ),
        (
            "xl/comments1.xml",
            "<comments><commentList>
                <comment ref=\"B3\" authorId=\"0\"><text><t xml:space=\"preserve\">Field=amount\nType=number</t></text></comment>
                <comment ref=\"C3\" authorId=\"0\"><text><t>Field=due</t></text></comment>
                <comment ref=\"F1\" authorId=\"0\"><text><t>ApprovalKey=A2_Sign</t></text></comment>
            </commentList></comments>",
        ),
    ])
}

fn request(bytes: Vec<u8>) -> UploadRequest {
    UploadRequest {
        file_name: "claim.xlsx".to_string(),
        bytes,
        company_code: "ACME".to_string(),
        department: "Finance".to_string(),
        doc_kind: "expense".to_string(),
        doc_name: "Expense Claim".to_string(),
    }
}

#[test]
fn test_end_to_end_compile() {
    let descriptor = compile_upload(&request(annotated_workbook())).expect("compiles");

    // Title came from the EB_META TitleCell entry pointing at Main!A1.
    assert_eq!(descriptor.title, "Expense Claim");

    assert_eq!(descriptor.fields.len(), 2);
    assert_eq!(descriptor.fields[0].key, "amount");
    assert_eq!(descriptor.fields[0].ty, FieldType::Num);
    assert_eq!(descriptor.fields[0].cell.address, "B3");
    // Type inferred from the date validation rule.
    assert_eq!(descriptor.fields[1].key, "due");
    assert_eq!(descriptor.fields[1].ty, FieldType::Date);

    // The approval cell sits in a merged region; the whole region is captured.
    assert_eq!(descriptor.approvals.len(), 1);
    assert_eq!(descriptor.approvals[0].slot, 2);
    assert_eq!(descriptor.approvals[0].part, "Sign");
    assert_eq!(descriptor.approvals[0].cell.address, "F1:F3");
    assert_eq!(descriptor.approvals[0].cell.row_span, 3);

    // No ApprovalCount override: the maximum observed slot wins.
    assert_eq!(descriptor.approval_count, 2);
}

#[test]
fn test_non_spreadsheet_rejected_before_any_parsing() {
    let result = compile_upload(&request(b"%PDF-1.7 definitely not a workbook".to_vec()));
    assert!(matches!(result, Err(Error::NotASpreadsheet)));
}

#[test]
fn test_plain_workbook_compiles_to_empty_descriptor() {
    // No EB_META, no comments anywhere.
    let bytes = build_package(&[
        (
            "xl/workbook.xml",
            r#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
                <sheets><sheet name="Main" sheetId="1" r:id="rId1"/></sheets>
            </workbook>"#,
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<Relationships>
                <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
            </Relationships>"#,
        ),
        (
            "xl/worksheets/sheet1.xml",
            r#"<worksheet><sheetData>
                <row r="1"><c r="A1" t="inlineStr"><is><t>hello</t></is></c></row>
            </sheetData></worksheet>"#,
        ),
    ]);
    let descriptor = compile_upload(&request(bytes)).expect("compiles");
    assert_eq!(descriptor.approval_count, 0);
    assert!(descriptor.fields.is_empty());
    assert!(descriptor.approvals.is_empty());
    assert_eq!(descriptor.title, "");
}

#[test]
fn test_artifacts_persisted_alongside() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = ArtifactStore::new(dir.path());
    let request = request(annotated_workbook());
    let descriptor = compile_upload(&request).expect("compiles");

    let stored = store.store(&request, &descriptor).expect("stores");
    let copied = std::fs::read(&stored.workbook_path).expect("workbook copy");
    assert_eq!(copied, request.bytes);

    let json = std::fs::read_to_string(&stored.descriptor_path).expect("descriptor json");
    let back = TemplateDescriptor::from_json(&json).expect("parses back");
    assert_eq!(back, descriptor);

    let file_name = stored
        .descriptor_path
        .file_name()
        .and_then(|n| n.to_str())
        .expect("file name");
    assert!(file_name.starts_with("ACME_ExpenseClaim_"));
    assert!(file_name.ends_with(".json"));
}
