//! End-to-end mapping behavior over the public API.

use rowdex::{
    Cell, CellRef, FieldDefinition, MapperRegistry, Record, RecordMapper, Value, ValueSource,
};

fn definition(name: &str, expression: &str, type_name: &str) -> FieldDefinition {
    FieldDefinition::new(
        name.into(),
        expression.into(),
        ValueSource::CellValue,
        type_name.into(),
    )
}

fn article_mapper() -> RecordMapper {
    let definitions = vec![
        definition("title", "content:title", "string"),
        definition("tags", "meta:*", "string"),
    ];
    RecordMapper::new(&definitions, &MapperRegistry::builtin()).unwrap()
}

fn article_record() -> Record {
    let mut record = Record::new("row-1");
    record.insert("content", "title", "Hello");
    record.insert("meta", "tag1", "a");
    record.insert("meta", "tag2", "b");
    record
}

#[test]
fn parse_collects_single_and_multi_valued_fields() {
    let mapper = article_mapper();
    let parsed = mapper.parse(&article_record());

    assert_eq!(
        parsed.values("title"),
        Some(&[Value::String("Hello".into())][..])
    );
    let mut tags: Vec<_> = parsed.values("tags").unwrap().to_vec();
    tags.sort_by_key(|value| match value {
        Value::String(s) => s.clone(),
        other => panic!("unexpected tag value {other:?}"),
    });
    assert_eq!(
        tags,
        vec![Value::String("a".into()), Value::String("b".into())]
    );
    assert_eq!(parsed.len(), 2);

    let field_names: Vec<_> = parsed.iter().map(|(field, _)| field).collect();
    assert_eq!(field_names, vec!["tags", "title"]);
}

#[test]
fn map_flattens_each_value_into_one_field_occurrence() {
    let mapper = article_mapper();
    let document = mapper.map(&article_record());

    assert_eq!(document.len(), 3);
    let titles: Vec<_> = document
        .fields()
        .iter()
        .filter(|(name, _)| name == "title")
        .collect();
    assert_eq!(titles.len(), 1);
    let tag_count = document
        .fields()
        .iter()
        .filter(|(name, _)| name == "tags")
        .count();
    assert_eq!(tag_count, 2);
}

#[test]
fn unmatched_fields_have_no_entry() {
    let mapper = article_mapper();
    let mut record = Record::new("row-2");
    record.insert("meta", "tag1", "a");

    let parsed = mapper.parse(&record);
    assert!(parsed.values("title").is_none());
    assert_eq!(parsed.len(), 1);

    let empty = mapper.parse(&Record::new("row-3"));
    assert!(empty.is_empty());
    assert!(mapper.map(&Record::new("row-3")).is_empty());
}

#[test]
fn relevance_follows_the_configured_addresses() {
    let mapper = article_mapper();

    let mutated = Cell::new("meta", "tag3", "c");
    assert!(mapper.is_relevant(mutated.as_ref()));
    assert!(mapper.is_relevant(CellRef {
        family: b"content",
        qualifier: b"title",
        value: b"x",
    }));
    assert!(!mapper.is_relevant(CellRef {
        family: b"content",
        qualifier: b"body",
        value: b"x",
    }));
    assert!(!mapper.is_relevant(CellRef {
        family: b"other",
        qualifier: b"x",
        value: b"y",
    }));
}

#[test]
fn one_malformed_value_leaves_every_other_field_intact() {
    let definitions = vec![
        definition("title", "content:title", "string"),
        definition("views", "stats:views", "long"),
        definition("tags", "meta:*", "string"),
    ];
    let mapper = RecordMapper::new(&definitions, &MapperRegistry::builtin()).unwrap();

    let mut record = Record::new("row-1");
    record.insert("content", "title", "Hello");
    // Three bytes cannot decode as a long.
    record.insert("stats", "views", vec![1u8, 2, 3]);
    record.insert("meta", "tag1", "a");

    let parsed = mapper.parse(&record);
    assert_eq!(
        parsed.values("title"),
        Some(&[Value::String("Hello".into())][..])
    );
    assert!(parsed.values("views").is_none());
    assert_eq!(parsed.values("tags"), Some(&[Value::String("a".into())][..]));
}

#[test]
fn typed_fields_decode_storage_byte_layouts() {
    let definitions = vec![
        definition("views", "stats:views", "long"),
        definition("rank", "stats:rank", "integer"),
        definition("score", "stats:score", "double"),
        definition("active", "stats:active", "boolean"),
        definition("published", "stats:published", "date"),
        definition("raw", "stats:raw", "binary"),
    ];
    let mapper = RecordMapper::new(&definitions, &MapperRegistry::builtin()).unwrap();

    let mut record = Record::new("row-1");
    record.insert("stats", "views", 123_456i64.to_be_bytes());
    record.insert("stats", "rank", 17i32.to_be_bytes());
    record.insert("stats", "score", 0.75f64.to_be_bytes());
    record.insert("stats", "active", [1u8]);
    record.insert("stats", "published", 1_700_000_000_000i64.to_be_bytes());
    record.insert("stats", "raw", [0xde, 0xad]);

    let parsed = mapper.parse(&record);
    assert_eq!(parsed.values("views"), Some(&[Value::Int64(123_456)][..]));
    assert_eq!(parsed.values("rank"), Some(&[Value::Int32(17)][..]));
    assert_eq!(parsed.values("score"), Some(&[Value::Float64(0.75)][..]));
    assert_eq!(parsed.values("active"), Some(&[Value::Boolean(true)][..]));
    assert_eq!(
        parsed.values("published"),
        Some(&[Value::Date64(1_700_000_000_000)][..])
    );
    assert_eq!(
        parsed.values("raw"),
        Some(&[Value::Binary(vec![0xde, 0xad])][..])
    );
}

#[test]
fn qualifier_source_indexes_qualifier_names() {
    let definitions = vec![FieldDefinition::new(
        "tag_names".into(),
        "meta:*".into(),
        ValueSource::Qualifier,
        "string".into(),
    )];
    let mapper = RecordMapper::new(&definitions, &MapperRegistry::builtin()).unwrap();

    let mut record = Record::new("row-1");
    record.insert("meta", "tag1", "ignored");
    record.insert("meta", "tag2", "ignored");

    let parsed = mapper.parse(&record);
    assert_eq!(
        parsed.values("tag_names"),
        Some(
            &[
                Value::String("tag1".into()),
                Value::String("tag2".into()),
            ][..]
        )
    );
}

#[test]
fn prefix_fields_match_and_extract_by_prefix() {
    let definitions = vec![definition("tags", "meta:tag_*", "string")];
    let mapper = RecordMapper::new(&definitions, &MapperRegistry::builtin()).unwrap();

    let mut record = Record::new("row-1");
    record.insert("meta", "tag_a", "a");
    record.insert("meta", "tag_b", "b");
    record.insert("meta", "note", "n");

    let parsed = mapper.parse(&record);
    assert_eq!(
        parsed.values("tags"),
        Some(&[Value::String("a".into()), Value::String("b".into())][..])
    );

    assert!(mapper.is_relevant(CellRef {
        family: b"meta",
        qualifier: b"tag_z",
        value: b"",
    }));
    assert!(!mapper.is_relevant(CellRef {
        family: b"meta",
        qualifier: b"note",
        value: b"",
    }));
}

#[test]
fn mapper_is_shareable_across_threads() {
    let mapper = std::sync::Arc::new(article_mapper());
    let record = article_record();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let mapper = std::sync::Arc::clone(&mapper);
            let record = record.clone();
            std::thread::spawn(move || mapper.map(&record).len())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 3);
    }
}
