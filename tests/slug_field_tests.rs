/// Integration tests for slug fields
///
/// Every scenario saves through `InMemoryDB::save`, so the pre-save hook,
/// the uniqueness probing and the table constraints run together.
/// Run with: cargo test --test slug_field_tests

use chrono::NaiveDate;
use memoslug::slugs::default_slugify;
use memoslug::{
    Column, ConfigurationError, DataType, DbError, InMemoryDB, Lookup, Model, ModelBuilder,
    QuerySet, Record, SlugField, Slugifier, Value,
};

fn text(name: &str) -> Column {
    Column::new(name, DataType::Text).max_length(200)
}

fn date(y: i32, m: u32, d: u32) -> Value {
    Value::from(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn register(db: &InMemoryDB, builder: ModelBuilder) {
    db.register(builder.build().unwrap()).unwrap();
}

fn slug(record: &Record) -> Option<&str> {
    record.text("slug").unwrap()
}

fn simple_model(db: &InMemoryDB) {
    register(
        db,
        Model::builder("simple_model")
            .column(text("name"))
            .slug(SlugField::new("slug")),
    );
}

fn unique_by_name(db: &InMemoryDB, table: &str) {
    register(
        db,
        Model::builder(table)
            .column(text("name"))
            .slug(SlugField::new("slug").populate_from("name").unique()),
    );
}

fn dated(db: &InMemoryDB, table: &str, lookup: &str) {
    register(
        db,
        Model::builder(table)
            .column(Column::new("date", DataType::Date).not_null())
            .slug(SlugField::new("slug").unique_with(lookup)),
    );
}

#[test]
fn test_simple_model_falls_back_to_model_name() {
    let db = InMemoryDB::new();
    simple_model(&db);

    let a = db.create("simple_model", [("name", Value::from("test"))]).unwrap();
    assert_eq!(slug(&a), Some("simple-model"));
}

#[test]
fn test_model_name_fallback_is_lowercased() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("SimpleModel")
            .column(text("name"))
            .slug(SlugField::new("slug")),
    );

    let a = db.create("SimpleModel", [("name", Value::from("test"))]).unwrap();
    let b = db.create("SimpleModel", [("name", Value::from("test"))]).unwrap();
    assert_eq!(slug(&a), Some("simplemodel"));
    assert_eq!(slug(&b), Some("simplemodel-2"));
}

#[test]
fn test_max_length_without_room_is_rejected() {
    let err = Model::builder("tiny")
        .column(text("name"))
        .slug(SlugField::new("slug").populate_from("name").max_length(0))
        .build()
        .unwrap_err();
    assert!(matches!(
        err.configuration_kind(),
        Some(ConfigurationError::Length { max_length: 0, .. })
    ));

    let err = Model::builder("tiny")
        .column(text("name"))
        .slug(SlugField::new("slug").populate_from("name").max_length(3).separator("___"))
        .build()
        .unwrap_err();
    assert!(matches!(
        err.configuration_kind(),
        Some(ConfigurationError::Length { max_length: 3, .. })
    ));
}

#[test]
fn test_smallest_usable_max_length() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("tiny")
            .column(text("name"))
            .slug(SlugField::new("slug").populate_from("name").max_length(3)),
    );

    let slugs: Vec<String> = (0..3)
        .map(|_| {
            let r = db.create("tiny", [("name", Value::from("Hello"))]).unwrap();
            slug(&r).unwrap().to_string()
        })
        .collect();
    assert_eq!(slugs, ["hel", "h-2", "h-3"]);
}

#[test]
fn test_unique_slug() {
    let db = InMemoryDB::new();
    unique_by_name(&db, "article");

    let greeting = Value::from("Hello world!");
    let a = db.create("article", [("name", greeting.clone())]).unwrap();
    assert_eq!(slug(&a), Some("hello-world"));
    let b = db.create("article", [("name", greeting)]).unwrap();
    assert_eq!(slug(&b), Some("hello-world-2"));
}

#[test]
fn test_collisions_have_no_gaps() {
    let db = InMemoryDB::new();
    unique_by_name(&db, "article");

    let slugs: Vec<String> = (0..5)
        .map(|_| {
            let r = db.create("article", [("name", Value::from("Same"))]).unwrap();
            slug(&r).unwrap().to_string()
        })
        .collect();
    assert_eq!(slugs, ["same", "same-2", "same-3", "same-4", "same-5"]);
}

#[test]
fn test_resave_keeps_slug() {
    let db = InMemoryDB::new();
    unique_by_name(&db, "article");

    db.create("article", [("name", Value::from("Twin"))]).unwrap();
    let mut b = db.create("article", [("name", Value::from("Twin"))]).unwrap();
    assert_eq!(slug(&b), Some("twin-2"));

    db.save(&mut b).unwrap();
    assert_eq!(slug(&b), Some("twin-2"));
    assert_eq!(db.all("article").unwrap().len(), 2);
}

#[test]
fn test_unique_slug_fk() {
    let db = InMemoryDB::new();
    simple_model(&db);
    register(
        &db,
        Model::builder("fk_child")
            .column(text("name"))
            .column(Column::foreign_key("simple_model", "simple_model"))
            .slug(
                SlugField::new("slug")
                    .populate_from("name")
                    .unique_with("simple_model__name"),
            ),
    );

    let sm1 = db.create("simple_model", [("name", Value::from("test"))]).unwrap();
    let sm2 = db.create("simple_model", [("name", Value::from("test"))]).unwrap();
    let mut sm3 = db.create("simple_model", [("name", Value::from("test2"))]).unwrap();

    let child = |parent: &Record| {
        db.create(
            "fk_child",
            [
                ("name", Value::from("Hello world!")),
                ("simple_model", Value::from(parent.id().unwrap())),
            ],
        )
        .unwrap()
    };

    let a = child(&sm1);
    assert_eq!(slug(&a), Some("hello-world"));
    let b = child(&sm2);
    assert_eq!(slug(&b), Some("hello-world-2"));
    let mut c = child(&sm3);
    assert_eq!(slug(&c), Some("hello-world"));
    let d = child(&sm1);
    assert_eq!(slug(&d), Some("hello-world-3"));

    sm3.set("name", "test").unwrap();
    db.save(&mut sm3).unwrap();
    assert_eq!(slug(&c), Some("hello-world"));
    db.save(&mut c).unwrap();
    assert_eq!(slug(&c), Some("hello-world-4"));
}

#[test]
fn test_unique_slug_fk_null() {
    let db = InMemoryDB::new();
    simple_model(&db);
    register(
        &db,
        Model::builder("fk_null_child")
            .column(text("name"))
            .column(
                Column::foreign_key("simple_model", "simple_model")
                    .nullable()
                    .blank(),
            )
            .slug(
                SlugField::new("slug")
                    .populate_from("name")
                    .unique_with("simple_model"),
            ),
    );

    let sm1 = db.create("simple_model", [("name", Value::from("test"))]).unwrap();
    let parent = Value::from(sm1.id().unwrap());

    let a = db
        .create("fk_null_child", [("name", "test".into()), ("simple_model", parent.clone())])
        .unwrap();
    assert_eq!(slug(&a), Some("test"));
    let b = db.create("fk_null_child", [("name", Value::from("test"))]).unwrap();
    assert_eq!(slug(&b), Some("test"));
    let c = db
        .create("fk_null_child", [("name", "test".into()), ("simple_model", parent)])
        .unwrap();
    assert_eq!(slug(&c), Some("test-2"));

    // records without a parent share the NULL scope with each other
    let d = db.create("fk_null_child", [("name", Value::from("test"))]).unwrap();
    assert_eq!(slug(&d), Some("test-2"));
}

#[test]
fn test_relation_lookup_through_null_reference() {
    let db = InMemoryDB::new();
    simple_model(&db);
    register(
        &db,
        Model::builder("orphan")
            .column(text("name"))
            .column(
                Column::foreign_key("simple_model", "simple_model")
                    .nullable()
                    .blank(),
            )
            .slug(
                SlugField::new("slug")
                    .populate_from("name")
                    .unique_with("simple_model__name"),
            ),
    );

    let a = db.create("orphan", [("name", Value::from("x"))]).unwrap();
    let b = db.create("orphan", [("name", Value::from("x"))]).unwrap();
    assert_eq!(slug(&a), Some("x"));
    assert_eq!(slug(&b), Some("x-2"));
}

fn save_dated(db: &InMemoryDB, table: &str, dates: [Value; 3]) -> Vec<String> {
    dates
        .into_iter()
        .map(|d| {
            let r = db.create(table, [("slug", Value::from("test")), ("date", d)]).unwrap();
            slug(&r).unwrap().to_string()
        })
        .collect()
}

#[test]
fn test_unique_slug_date() {
    let db = InMemoryDB::new();
    dated(&db, "entry", "date");
    let slugs = save_dated(&db, "entry", [date(2009, 9, 9), date(2009, 9, 9), date(2009, 9, 10)]);
    assert_eq!(slugs, ["test", "test-2", "test"]);
}

#[test]
fn test_unique_slug_day() {
    let db = InMemoryDB::new();
    dated(&db, "entry", "date__day");
    let slugs = save_dated(&db, "entry", [date(2009, 9, 9), date(2009, 9, 9), date(2009, 9, 10)]);
    assert_eq!(slugs, ["test", "test-2", "test"]);
}

#[test]
fn test_unique_slug_day_ignores_other_months() {
    let db = InMemoryDB::new();
    dated(&db, "entry", "date__day");
    // same day of month, different month: independent scopes
    let slugs = save_dated(&db, "entry", [date(2009, 9, 9), date(2009, 10, 9), date(2010, 9, 9)]);
    assert_eq!(slugs, ["test", "test", "test"]);
}

#[test]
fn test_unique_slug_month() {
    let db = InMemoryDB::new();
    dated(&db, "entry", "date__month");
    let slugs = save_dated(&db, "entry", [date(2009, 9, 9), date(2009, 9, 10), date(2009, 10, 9)]);
    assert_eq!(slugs, ["test", "test-2", "test"]);
}

#[test]
fn test_unique_slug_year() {
    let db = InMemoryDB::new();
    dated(&db, "entry", "date__year");
    let slugs = save_dated(&db, "entry", [date(2009, 9, 9), date(2009, 10, 9), date(2010, 9, 9)]);
    assert_eq!(slugs, ["test", "test-2", "test"]);
}

#[test]
fn test_long_name() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("long_name")
            .column(text("name").max_length(300))
            .slug(SlugField::new("slug").populate_from("name")),
    );

    let a = db.create("long_name", [("name", Value::from("x".repeat(250)))]).unwrap();
    assert_eq!(slug(&a).unwrap().len(), 50);
}

#[test]
fn test_long_name_unique() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("long_name")
            .column(text("name").max_length(300))
            .slug(SlugField::new("slug").populate_from("name").unique()),
    );

    let long_name = Value::from("x".repeat(250));
    let a = db.create("long_name", [("name", long_name.clone())]).unwrap();
    assert_eq!(slug(&a).unwrap().len(), 50);
    let b = db.create("long_name", [("name", long_name)]).unwrap();
    let b_slug = slug(&b).unwrap();
    assert!(b_slug.ends_with("x-2"));
    assert_eq!(b_slug.len(), 50);
}

#[test]
fn test_nullable() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("nullable")
            .column(text("name").blank())
            .slug(SlugField::new("slug").populate_from("name").blank().nullable()),
    );

    let a = db.create("nullable", [("name", Value::Null)]).unwrap();
    assert_eq!(a.get("slug").unwrap(), &Value::Null);
    let b = db.create("nullable", [("name", Value::Null)]).unwrap();
    assert_eq!(b.get("slug").unwrap(), &Value::Null);
}

#[test]
fn test_blank() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("blank")
            .column(text("name").blank())
            .slug(SlugField::new("slug").populate_from("name").blank()),
    );

    let a = db.create("blank", [("name", Value::Null)]).unwrap();
    assert_eq!(slug(&a), Some(""));
    // empty values are not disambiguated
    let b = db.create("blank", [("name", Value::Null)]).unwrap();
    assert_eq!(slug(&b), Some(""));
}

#[test]
fn test_unslugifiable_value_is_rejected() {
    let db = InMemoryDB::new();
    unique_by_name(&db, "article");

    let err = db.create("article", [("name", Value::from("!!!"))]).unwrap_err();
    assert!(matches!(err, DbError::ConstraintViolation(_)));
    assert!(db.all("article").unwrap().is_empty());
}

#[test]
fn test_callable() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("callable").column(text("name")).slug(
            SlugField::new("slug").populate_with(|r| {
                Ok(Value::from(format!("the {}", r.text("name")?.unwrap_or_default())))
            }),
        ),
    );

    let a = db.create("callable", [("name", Value::from("larch"))]).unwrap();
    assert_eq!(slug(&a), Some("the-larch"));
}

#[test]
fn test_callable_error_propagates() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("failing").column(text("name")).slug(
            SlugField::new("slug")
                .populate_with(|_| Err(DbError::ExecutionError("source unavailable".into()))),
        ),
    );

    let mut record = db.new_record("failing").unwrap();
    record.set("name", "x").unwrap();
    match db.save(&mut record) {
        Err(DbError::ExecutionError(msg)) => assert_eq!(msg, "source unavailable"),
        other => panic!("Expected ExecutionError, got {:?}", other),
    }
    assert_eq!(record.id(), None);
}

#[test]
fn test_callable_attr() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("callable_attr")
            .column(text("name"))
            .method("get_name", |r| {
                Ok(Value::from(format!(
                    "spam, {} and spam",
                    r.text("name")?.unwrap_or_default()
                )))
            })
            .slug(SlugField::new("slug").populate_from("get_name")),
    );

    let a = db.create("callable_attr", [("name", Value::from("albatross"))]).unwrap();
    assert_eq!(slug(&a), Some("spam-albatross-and-spam"));
}

#[test]
fn test_custom_primary_key() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("custom_pk")
            .column(Column::new("custom_primary_key", DataType::Text).primary_key().max_length(1))
            .column(text("name"))
            .slug(SlugField::new("slug").populate_from("name").unique()),
    );

    let a = db
        .create("custom_pk", [("custom_primary_key", "a".into()), ("name", "name used in slug".into())])
        .unwrap();
    let b = db
        .create("custom_pk", [("custom_primary_key", "b".into()), ("name", "name used in slug".into())])
        .unwrap();
    assert_eq!(slug(&a), Some("name-used-in-slug"));
    assert_eq!(slug(&b), Some("name-used-in-slug-2"));
}

#[test]
fn test_custom_slugifier() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("custom_slugifier").slug(
            SlugField::new("slug")
                .unique()
                .slugify(Slugifier::new(|s| default_slugify(s).replace('-', "_"))),
        ),
    );

    db.create("custom_slugifier", [("slug", Value::from("hello world!"))]).unwrap();
    let b = db.create("custom_slugifier", [("slug", Value::from("hello world!"))]).unwrap();
    assert_eq!(slug(&b), Some("hello_world-2"));
}

#[test]
fn test_custom_separator() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("custom_separator").slug(SlugField::new("slug").unique().separator("_")),
    );

    db.create("custom_separator", [("slug", Value::from("hello world!"))]).unwrap();
    let b = db.create("custom_separator", [("slug", Value::from("hello world!"))]).unwrap();
    assert_eq!(slug(&b), Some("hello-world_2"));
}

fn config_error(db: &InMemoryDB, table: &str, values: Vec<(&str, Value)>) -> ConfigurationError {
    let err = db.create(table, values).unwrap_err();
    match err {
        DbError::Configuration { model, field, kind } => {
            assert_eq!(model, table);
            assert_eq!(field, "slug");
            kind
        }
        other => panic!("Expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_self_reference() {
    let db = InMemoryDB::new();
    register(&db, Model::builder("self_ref").slug(SlugField::new("slug").unique_with("slug")));

    let kind = config_error(&db, "self_ref", vec![("slug", "test".into())]);
    assert_eq!(kind, ConfigurationError::SelfReference);
}

#[test]
fn test_wrong_referenced_field() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("wrong_field").slug(SlugField::new("slug").unique_with("wrong_field")),
    );

    let kind = config_error(&db, "wrong_field", vec![("slug", "test".into())]);
    assert_eq!(kind, ConfigurationError::UnknownField("wrong_field".into()));
}

#[test]
fn test_wrong_lookup_in_unique_with() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("wrong_lookup")
            .column(Column::new("name", DataType::Text).max_length(10))
            .slug(SlugField::new("slug").unique_with("name__foo")),
    );

    let kind = config_error(
        &db,
        "wrong_lookup",
        vec![("name", "test".into()), ("slug", "test".into())],
    );
    assert_eq!(kind, ConfigurationError::UnresolvedLookup("name__foo".into()));
}

#[test]
fn test_wrong_date_part() {
    let db = InMemoryDB::new();
    dated(&db, "entry", "date__week");

    let kind = config_error(&db, "entry", vec![("slug", "test".into()), ("date", date(2009, 9, 9))]);
    assert_eq!(kind, ConfigurationError::UnresolvedLookup("date__week".into()));
}

#[test]
fn test_wrong_relation_lookup() {
    let db = InMemoryDB::new();
    simple_model(&db);
    register(
        &db,
        Model::builder("bad_child")
            .column(Column::foreign_key("simple_model", "simple_model"))
            .slug(SlugField::new("slug").unique_with("simple_model__title")),
    );

    let parent = db.create("simple_model", [("name", Value::from("p"))]).unwrap();
    let kind = config_error(
        &db,
        "bad_child",
        vec![("simple_model", Value::from(parent.id().unwrap())), ("slug", "x".into())],
    );
    assert_eq!(kind, ConfigurationError::UnresolvedLookup("simple_model__title".into()));
}

#[test]
fn test_wrong_field_order() {
    let db = InMemoryDB::new();
    // declaring the model is fine; the first save is what fails
    register(
        &db,
        Model::builder("wrong_order")
            .slug(SlugField::new("slug").unique_with("date"))
            .column(Column::new("date", DataType::Date).not_null()),
    );

    let kind = config_error(&db, "wrong_order", vec![("slug", "test".into()), ("date", date(2009, 9, 9))]);
    assert_eq!(kind, ConfigurationError::FieldOrder("date".into()));
}

#[test]
fn test_required_dependency_empty() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("needs_date")
            .column(Column::new("date", DataType::Date))
            .slug(SlugField::new("slug").unique_with("date")),
    );

    let err = db.create("needs_date", [("slug", Value::from("hello"))]).unwrap_err();
    match err {
        DbError::DependencyEmpty { model, field, dependency } => {
            assert_eq!((model.as_str(), field.as_str(), dependency.as_str()), ("needs_date", "slug", "date"));
        }
        other => panic!("Expected DependencyEmpty, got {:?}", other),
    }
}

#[test]
fn test_acceptable_empty_dependency() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("empty_dep")
            .column(Column::new("date", DataType::Date).blank())
            .slug(SlugField::new("slug").unique_with("date")),
    );

    for _ in 0..2 {
        db.create("empty_dep", [("slug", Value::from("hello"))]).unwrap();
    }
    let slugs: Vec<String> = db
        .all("empty_dep")
        .unwrap()
        .iter()
        .map(|r| slug(r).unwrap().to_string())
        .collect();
    assert_eq!(slugs, ["hello", "hello-2"]);
}

#[test]
fn test_auto_update_enabled() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("auto_update")
            .column(text("name"))
            .slug(SlugField::new("slug").populate_from("name").always_update()),
    );

    let mut a = db.create("auto_update", [("name", Value::from("My name"))]).unwrap();
    assert_eq!(slug(&a), Some("my-name"));
    a.set("name", "My new name").unwrap();
    db.save(&mut a).unwrap();
    assert_eq!(slug(&a), Some("my-new-name"));
}

#[test]
fn test_without_auto_update_slug_is_kept() {
    let db = InMemoryDB::new();
    unique_by_name(&db, "article");

    let mut a = db.create("article", [("name", Value::from("My name"))]).unwrap();
    a.set("name", "My new name").unwrap();
    db.save(&mut a).unwrap();
    assert_eq!(slug(&a), Some("my-name"));
}

#[test]
fn test_rescoping_can_lower_disambiguator() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("post")
            .column(text("name"))
            .column(Column::new("date", DataType::Date).not_null())
            .slug(
                SlugField::new("slug")
                    .populate_from("name")
                    .unique_with("date")
                    .always_update(),
            ),
    );

    db.create("post", [("name", "Hello world!".into()), ("date", date(2009, 9, 9))]).unwrap();
    let mut b = db
        .create("post", [("name", "Hello world!".into()), ("date", date(2009, 9, 9))])
        .unwrap();
    assert_eq!(slug(&b), Some("hello-world-2"));

    b.set("date", date(2010, 1, 1)).unwrap();
    db.save(&mut b).unwrap();
    assert_eq!(slug(&b), Some("hello-world"));
}

#[test]
fn test_slug_space_shared_integrity_error() {
    let db = InMemoryDB::new();
    unique_by_name(&db, "archive");
    // probing only sees the archive, the unique index sees the real table
    register(
        &db,
        Model::builder("live")
            .column(text("name"))
            .slug(
                SlugField::new("slug")
                    .populate_from("name")
                    .unique()
                    .query_provider(QuerySet::shared(["archive"])),
            ),
    );

    db.create("live", [("name", Value::from("My name"))]).unwrap();
    let mut b = db.new_record("live").unwrap();
    b.set("name", "My name").unwrap();
    let err = db.save(&mut b).unwrap_err();
    assert!(matches!(err, DbError::IntegrityConflict(_)), "got {:?}", err);
    assert_eq!(b.id(), None);
    assert_eq!(b.get("slug").unwrap(), &Value::Null);
}

#[test]
fn test_shared_slug_space() {
    let db = InMemoryDB::new();
    for table in ["shared_slug_space", "model_with_slug_space_shared"] {
        register(
            &db,
            Model::builder(table).column(text("name")).slug(
                SlugField::new("slug")
                    .populate_from("name")
                    .unique()
                    .query_provider(QuerySet::shared([
                        "shared_slug_space",
                        "model_with_slug_space_shared",
                    ])),
            ),
        );
    }

    let a = db.create("shared_slug_space", [("name", Value::from("My name"))]).unwrap();
    assert_eq!(slug(&a), Some("my-name"));
    let b = db
        .create("model_with_slug_space_shared", [("name", Value::from("My name"))])
        .unwrap();
    assert_eq!(slug(&b), Some("my-name-2"));
}

#[test]
fn test_restricted_query_set() {
    let db = InMemoryDB::new();
    register(
        &db,
        Model::builder("page")
            .column(text("name"))
            .column(Column::new("published", DataType::Boolean).not_null())
            .slug(
                SlugField::new("slug")
                    .populate_from("name")
                    .query_provider(QuerySet::own().filter(Lookup::column("published"), true)),
            ),
    );

    let draft = db
        .create("page", [("name", "About".into()), ("published", false.into())])
        .unwrap();
    let live = db
        .create("page", [("name", "About".into()), ("published", true.into())])
        .unwrap();
    let second = db
        .create("page", [("name", "About".into()), ("published", true.into())])
        .unwrap();

    assert_eq!(slug(&draft), Some("about"));
    assert_eq!(slug(&live), Some("about"));
    assert_eq!(slug(&second), Some("about-2"));
}

#[test]
fn test_assign_without_saving() {
    let db = InMemoryDB::new();
    unique_by_name(&db, "article");
    db.create("article", [("name", Value::from("Draft"))]).unwrap();

    let model = db.model("article").unwrap();
    let field = model.slug_field("slug").unwrap();
    let mut record = db.new_record("article").unwrap();
    record.set("name", "Draft").unwrap();

    assert_eq!(field.assign(&db, &mut record).unwrap(), Value::from("draft-2"));
    assert_eq!(record.id(), None);
    assert_eq!(db.all("article").unwrap().len(), 1);
}
