//! End-to-end generation of word documents

use chrono::Local;
use docweave_core::document::{BodyElement, Document, Paragraph, WordDocument, WORD_MIME};
use docweave_core::error::{DocweaveError, Result};
use docweave_core::placeholder::{
    CustomPlaceholderRegistryImpl, DirectiveSchema, JsonBean, PlaceholderData,
    PlaceholderResolver, Property, ReflectionResolver,
};
use docweave_core::post::PostProcessor;
use docweave_core::{Locale, Template};
use docweave_testkit::{
    picard, png_bytes, temp_dir_in_workspace, word_table, word_template, write_template, Unreadable,
};
use serde_json::json;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(30);

fn generate(template: &Template, resolver: impl PlaceholderResolver + 'static) -> WordDocument {
    let handle = template.start_generation(Arc::new(resolver));
    handle.block_until_completion(WAIT).unwrap();
    assert!(handle.completed(), "generation failed: {:?}", handle.failure());
    match handle.document() {
        Some(Document::Word(doc)) => doc,
        other => panic!("expected a word document, got {:?}", other),
    }
}

fn lines(doc: &WordDocument) -> Vec<String> {
    doc.text().lines().map(str::to_string).collect()
}

#[test]
fn test_captain_letter() {
    let dir = temp_dir_in_workspace();
    let path = write_template(
        dir.path(),
        "letter.docx.json",
        &word_template(&[
            "Captain {{name}} ({{rank}}), age {{age}}",
            "Born {{birthdate}}",
            "Ship: {{ship.name}} {{ship.registry}}, cost {{ship.cost}}",
            "{{ship.crew}}",
            "- {{rank}} {{name}}",
            "{{/ship.crew}}",
            "{{ship.visited}}{{name}}: {{water}} water, {{population}} people{{/ship.visited}}",
            "Nickname: {{nickname}}",
        ]),
    );
    let template = Template::from_file(path).with_output_dir(dir.path());

    let captain = picard();
    let age = captain.age_on(Local::now().date_naive());

    let doc = generate(&template, ReflectionResolver::new(captain));

    let first = format!("Captain Jean-Luc Picard (CAPTAIN), age {}", age);
    assert_eq!(
        lines(&doc),
        vec![
            first.as_str(),
            "Born 23.09.1948",
            "Ship: USS Enterprise NCC-1701-D, cost $1,250.50",
            "- COMMANDER Riker",
            "- LIEUTENANT_COMMANDER Data",
            "- LIEUTENANT Worf",
            "Earth: 71% water, 9,000,000,000 people",
            "Vulcan: 5% water, 6,000,000,000 people",
            "Nickname: {{nickname}}",
        ]
    );
}

#[test]
fn test_locale_changes_formatting() {
    let dir = temp_dir_in_workspace();
    let template = Template::from_bytes(
        "letter",
        serde_json::to_vec(&word_template(&["{{ship.cost}}", "{{ship.launched}}"])).unwrap(),
        WORD_MIME,
    )
    .with_locale(Locale::parse("de-DE").unwrap())
    .with_output_dir(dir.path());

    let doc = generate(&template, ReflectionResolver::new(picard()));

    assert_eq!(lines(&doc), vec!["1.250,50\u{a0}$", "04.10.2363"]);
}

#[test]
fn test_artifact_is_written_as_json() {
    let dir = temp_dir_in_workspace();
    let path = write_template(dir.path(), "hello.docx.json", &word_template(&["Hello {{name}}"]));
    let template = Template::from_file(path).with_output_dir(dir.path());

    let handle = template.start_generation(Arc::new(ReflectionResolver::new(picard())));
    handle.block_until_completion(WAIT).unwrap();

    let artifact = handle.artifact_location().unwrap();
    assert!(artifact.starts_with(dir.path()));
    assert!(artifact.to_string_lossy().ends_with(".docx.json"));
    let written: WordDocument = serde_json::from_slice(&std::fs::read(&artifact).unwrap()).unwrap();
    assert_eq!(written.text(), "Hello Jean-Luc Picard");
}

#[test]
fn test_tables_repeat_rows() {
    let dir = temp_dir_in_workspace();
    let template_doc = WordDocument::new(vec![
        BodyElement::Paragraph(Paragraph::new("Crew of {{ship.name}}")),
        word_table(&[
            &["Rank", "Name"],
            &["{{ship.crew}}{{rank}}", "{{name}}{{/ship.crew}}"],
        ]),
    ]);
    let path = write_template(dir.path(), "crew.docx.json", &template_doc);
    let template = Template::from_file(path).with_output_dir(dir.path());

    let doc = generate(&template, ReflectionResolver::new(picard()));

    let rows: Vec<String> = doc.tables()[0].rows.iter().map(|r| r.text()).collect();
    assert_eq!(
        rows,
        vec![
            "RankName",
            "COMMANDERRiker",
            "LIEUTENANT_COMMANDERData",
            "LIEUTENANTWorf"
        ]
    );
}

#[test]
fn test_portrait_and_table_of_contents() {
    let dir = temp_dir_in_workspace();
    let portrait = dir.path().join("picard.png");
    std::fs::write(&portrait, png_bytes(200, 100)).unwrap();
    let mut captain = picard();
    captain.portrait = Some(portrait);

    let path = write_template(
        dir.path(),
        "dossier.docx.json",
        &word_template(&["{{toc}}", "{{portrait}}", "{{name}}"]),
    );
    let template = Template::from_file(path).with_output_dir(dir.path());
    let resolver = ReflectionResolver::with_registry(
        Property::object(captain),
        Arc::new(CustomPlaceholderRegistryImpl::with_builtins()),
    );

    let doc = generate(&template, resolver);

    assert!(doc.parts.update_fields_on_open);
    assert!(doc.body[0].as_paragraph().unwrap().field.is_some());
    let picture = doc.body[1].as_paragraph().unwrap().runs[0]
        .picture
        .clone()
        .unwrap();
    assert_eq!((picture.width, picture.height), (100, 50));
    assert_eq!(doc.parts.media.len(), 1);
    assert_eq!(doc.body[2].text(), "Jean-Luc Picard");
}

#[test]
fn test_json_data_with_schema() {
    let schema = DirectiveSchema::from_toml_str(
        r#"
type_name = "Captain"

[fields]
officerSince = { kind = "date_time", pattern = "dd.MM.yyyy" }

[children.ships.fields]
cost = { kind = "money", currency_code = "EUR" }
"#,
    )
    .unwrap();
    let bean = JsonBean::new(
        json!({
            "name": "Jean-Luc Picard",
            "officerSince": "1948-09-23",
            "ships": [
                { "name": "Stargazer", "cost": 10 },
                { "name": "Enterprise", "cost": 1250.5 }
            ]
        }),
        schema,
    );
    let dir = temp_dir_in_workspace();
    let path = write_template(
        dir.path(),
        "json.docx.json",
        &word_template(&["{{name}} {{officerSince}}", "{{ships}}", "{{name}} {{cost}}", "{{/ships}}"]),
    );
    let template = Template::from_file(path).with_output_dir(dir.path());

    let doc = generate(&template, ReflectionResolver::new(bean));

    assert_eq!(
        lines(&doc),
        vec![
            "Jean-Luc Picard 23.09.1948",
            "Stargazer €10.00",
            "Enterprise €1,250.50"
        ]
    );
}

#[test]
fn test_access_fault_fails_the_generation() {
    let dir = temp_dir_in_workspace();
    let path = write_template(dir.path(), "secret.docx.json", &word_template(&["{{secret}}"]));
    let template = Template::from_file(path).with_output_dir(dir.path());

    let handle = template.start_generation(Arc::new(ReflectionResolver::new(Unreadable)));
    handle.block_until_completion(WAIT).unwrap();

    assert!(handle.failed());
    assert!(!handle.completed());
    assert!(handle.failure().unwrap().starts_with("ACCESS_FAULT"));
    assert!(matches!(
        handle.artifact_location(),
        Err(DocweaveError::GenerationFailed(_))
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_unsupported_kind() {
    let template = Template::from_file("slides.pptx");
    let handle = template.start_generation(Arc::new(ReflectionResolver::new(picard())));

    assert!(handle.failed());
    assert!(handle.failure().unwrap().starts_with("UNSUPPORTED_KIND"));
}

/// Resolves every path to `value` after a delay
struct SlowResolver {
    delay: Duration,
}

impl PlaceholderResolver for SlowResolver {
    fn resolve(&self, _path: &str, _locale: &Locale) -> Result<Option<PlaceholderData>> {
        thread::sleep(self.delay);
        Ok(Some(PlaceholderData::scalar("value")))
    }
}

#[test]
fn test_wait_times_out_without_stopping_generation() {
    let dir = temp_dir_in_workspace();
    let path = write_template(dir.path(), "slow.docx.json", &word_template(&["{{a}}"]));
    let template = Template::from_file(path).with_output_dir(dir.path());

    let handle = template.start_generation(Arc::new(SlowResolver {
        delay: Duration::from_millis(300),
    }));

    let err = handle
        .block_until_completion(Duration::from_millis(10))
        .unwrap_err();
    assert!(matches!(err, DocweaveError::Timeout { .. }));
    assert!(!handle.completed());

    handle.block_until_completion(WAIT).unwrap();
    assert!(handle.completed());
}

#[test]
fn test_many_observers() {
    let dir = temp_dir_in_workspace();
    let path = write_template(dir.path(), "observed.docx.json", &word_template(&["{{a}}"]));
    let template = Template::from_file(path).with_output_dir(dir.path());
    let handle = template.start_generation(Arc::new(SlowResolver {
        delay: Duration::from_millis(50),
    }));

    let observers: Vec<_> = (0..8)
        .map(|_| {
            let handle = handle.clone();
            thread::spawn(move || {
                while !handle.completed() {
                    thread::sleep(Duration::from_millis(1));
                }
                handle.artifact_location().unwrap()
            })
        })
        .collect();

    let locations: Vec<_> = observers.into_iter().map(|o| o.join().unwrap()).collect();
    assert!(locations.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_concurrent_generations_are_independent() {
    let dir = temp_dir_in_workspace();
    let path = write_template(dir.path(), "name.docx.json", &word_template(&["{{name}}"]));
    let template = Template::from_file(path).with_output_dir(dir.path());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let mut captain = picard();
            captain.name = format!("Captain {}", i);
            template.start_generation(Arc::new(ReflectionResolver::new(captain)))
        })
        .collect();

    for (i, handle) in handles.iter().enumerate() {
        handle.block_until_completion(WAIT).unwrap();
        let doc = handle.document().unwrap();
        assert_eq!(doc.as_word().unwrap().text(), format!("Captain {}", i));
    }
}

struct BrokenHook;

impl PostProcessor<WordDocument> for BrokenHook {
    fn name(&self) -> &str {
        "broken"
    }

    fn document_generation_finished(
        &self,
        _document: &mut WordDocument,
        _resolver: &dyn PlaceholderResolver,
    ) -> Result<()> {
        Err(DocweaveError::Generic("hook exploded".to_string()))
    }
}

struct Signature;

impl PostProcessor<WordDocument> for Signature {
    fn name(&self) -> &str {
        "signature"
    }

    fn document_generation_finished(
        &self,
        document: &mut WordDocument,
        resolver: &dyn PlaceholderResolver,
    ) -> Result<()> {
        let name = resolver
            .resolve("name", &Locale::en_us())?
            .and_then(|data| data.as_scalar().map(str::to_string))
            .unwrap_or_default();
        document
            .body
            .push(Paragraph::new(&format!("Signed, {}", name)).into());
        Ok(())
    }
}

#[test]
fn test_post_processing_faults_are_not_fatal() {
    let dir = temp_dir_in_workspace();
    let path = write_template(dir.path(), "hooks.docx.json", &word_template(&["Dear {{name}}"]));
    let mut template = Template::from_file(path).with_output_dir(dir.path());
    template
        .add_word_hook(Arc::new(BrokenHook))
        .add_word_hook(Arc::new(Signature));

    let doc = generate(&template, ReflectionResolver::new(picard()));

    assert_eq!(
        lines(&doc),
        vec!["Dear Jean-Luc Picard", "Signed, Jean-Luc Picard"]
    );
}
