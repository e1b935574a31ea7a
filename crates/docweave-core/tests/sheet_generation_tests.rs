//! End-to-end generation of spreadsheets

use docweave_core::document::{CellValue, Document, SheetCell, SheetRow, Workbook};
use docweave_core::{ReflectionResolver, Template};
use docweave_testkit::{picard, sheet_template, temp_dir_in_workspace, write_template};
use std::sync::Arc;
use std::time::Duration;

fn generate(template: &Template) -> Workbook {
    let handle = template.start_generation(Arc::new(ReflectionResolver::new(picard())));
    handle.block_until_completion(Duration::from_secs(30)).unwrap();
    assert!(handle.completed(), "generation failed: {:?}", handle.failure());
    match handle.document() {
        Some(Document::Sheet(workbook)) => workbook,
        other => panic!("expected a workbook, got {:?}", other),
    }
}

fn rows(workbook: &Workbook) -> Vec<(u32, Vec<String>)> {
    workbook.sheets[0]
        .rows
        .iter()
        .map(|r| (r.index, r.texts()))
        .collect()
}

fn strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

#[test]
fn test_crew_roster() {
    let dir = temp_dir_in_workspace();
    let template_doc = sheet_template(
        "Roster",
        &[
            (0, &["Ship", "{{ship.name}}"]),
            (2, &["{{ship.crew}}{{rank}}", "{{name}}{{/ship.crew}}"]),
            (4, &["Captain", "{{name}}"]),
            (5, &["{{ship.services}}{{this}}{{/ship.services}}"]),
            (7, &["Launched", "{{ship.launched}}"]),
        ],
    );
    let path = write_template(dir.path(), "roster.xlsx.json", &template_doc);
    let template = Template::from_file(path)
        .with_output_dir(dir.path())
        .with_window_size(2);

    let workbook = generate(&template);

    assert_eq!(
        rows(&workbook),
        vec![
            (0, strings(&["Ship", "USS Enterprise"])),
            (2, strings(&["COMMANDER", "Riker"])),
            (3, strings(&["LIEUTENANT_COMMANDER", "Data"])),
            (4, strings(&["LIEUTENANT", "Worf"])),
            (6, strings(&["Captain", "Jean-Luc Picard"])),
            (7, strings(&["Exploration"])),
            (8, strings(&["Diplomacy"])),
            (10, strings(&["Launched", "04.10.2363"])),
        ]
    );
}

#[test]
fn test_multi_row_region_with_totals() {
    let dir = temp_dir_in_workspace();
    let mut template_doc = sheet_template(
        "Planets",
        &[
            (0, &["{{ship.visited}}Planet", "{{name}}"]),
            (1, &["Water", "{{water}}{{/ship.visited}}"]),
            (2, &["Missing", "{{ship.nowhere}}x{{/ship.nowhere}}"]),
        ],
    );
    template_doc.sheets[0].rows.push(SheetRow::new(
        3,
        vec![
            SheetCell::text(0, "Visited"),
            SheetCell::new(1, CellValue::Formula("COUNTA(B1:B4)".to_string())),
        ],
    ));
    let path = write_template(dir.path(), "planets.xlsx.json", &template_doc);
    let template = Template::from_file(path).with_output_dir(dir.path());

    let workbook = generate(&template);

    let sheet = &workbook.sheets[0];
    let indices: Vec<u32> = sheet.rows.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    assert_eq!(sheet.rows[0].texts(), strings(&["Planet", "Earth"]));
    assert_eq!(sheet.rows[1].texts(), strings(&["Water", "71%"]));
    assert_eq!(sheet.rows[2].texts(), strings(&["Planet", "Vulcan"]));
    assert_eq!(sheet.rows[3].texts(), strings(&["Water", "5%"]));
    assert_eq!(
        sheet.rows[4].cell(1).unwrap().value,
        CellValue::Formula("COUNTA(B1:B4)".to_string())
    );
    assert!(workbook.force_formula_recalculation);
}

#[test]
fn test_inspect_sheet_tokens() {
    let dir = temp_dir_in_workspace();
    let path = write_template(
        dir.path(),
        "inspect.xlsx.json",
        &sheet_template("Roster", &[(2, &["", "{{ship.crew}}{{name}}{{/ship.crew}}"])]),
    );

    let tokens = Template::from_file(path).inspect().unwrap();

    let described: Vec<(&str, String, String)> = tokens
        .iter()
        .map(|t| (t.kind_name(), t.subject(), t.location.clone()))
        .collect();
    assert_eq!(
        described,
        vec![
            ("placeholder", "ship.crew".to_string(), "Roster!B3".to_string()),
            ("placeholder", "name".to_string(), "Roster!B3".to_string()),
            ("block-end", "ship.crew".to_string(), "Roster!B3".to_string()),
        ]
    );
}
