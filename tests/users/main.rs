//! Integration tests for derived models, queries, scopes, finders and the
//! save/update/destroy lifecycle.

mod models;

use mini_record::{record, Condition, Model, OrmError, Persistence, Value};
use models::{names, seeded, BlogPost, LineItem, User};

#[test]
fn derive_declares_schema() {
    assert_eq!(User::NAME, "User");
    assert_eq!(User::TABLE, "USERS");
    assert_eq!(User::ATTRIBUTES, &["id", "name", "age"]);

    assert_eq!(BlogPost::TABLE, "journal_entries");
    assert_eq!(BlogPost::ATTRIBUTES, &["id", "title", "published"]);

    assert_eq!(LineItem::TABLE, "LINE_ITEMS");
    assert_eq!(LineItem::ID_ATTRIBUTE, "number");
    assert_eq!(User::ID_ATTRIBUTE, "id");
}

#[test]
fn marked_identifier_drives_persistence() {
    let db = mini_record::Database::new();
    db.create_table(
        LineItem::TABLE,
        vec![record! { "number" => 3, "product" => "Pen", "quantity" => 2 }],
    )
    .unwrap();
    let items = db.models::<LineItem>();

    let mut ink = items
        .create(record! { "product" => "Ink", "quantity" => 1 })
        .unwrap();
    assert_eq!(ink.id(), Some(4));
    assert_eq!(ink.number(), Some(4));
    assert_eq!(items.find(4).unwrap().unwrap(), ink);

    ink.update(&db, record! { "quantity" => 5 }).unwrap();
    let row = db.store().get(LineItem::TABLE, "number", 4).unwrap().unwrap();
    assert_eq!(row, record! { "number" => 4, "product" => "Ink", "quantity" => 5 });

    ink.destroy(&db).unwrap();
    assert_eq!(names_of(&items.all().unwrap()), vec!["Pen"]);
}

fn names_of(items: &[LineItem]) -> Vec<String> {
    items.iter().filter_map(LineItem::product).collect()
}

#[test]
fn generated_accessors() {
    let mut user = User::blank();
    assert_eq!(user.name(), None);

    user.set_name("Zoe");
    user.set_age(41);
    assert_eq!(user.name().as_deref(), Some("Zoe"));
    assert_eq!(user.age(), Some(41));
    assert_eq!(user.read_attribute("age"), Some(Value::Int(41)));
    assert_eq!(user.attributes(), record! { "name" => "Zoe", "age" => 41 });
}

#[test]
fn write_attribute_rejects_unknown_and_mistyped() {
    let mut user = User::blank();
    let err = user.write_attribute("email", "z@example.com".into()).unwrap_err();
    assert!(matches!(err, OrmError::UnknownAttribute { model: "User", .. }));

    let err = user.write_attribute("age", "forty".into()).unwrap_err();
    assert!(matches!(err, OrmError::TypeMismatch { expected: "integer", .. }));
}

#[test]
fn display_lists_set_attributes() {
    let user = User::build(record! { "id" => 1, "name" => "Alice", "age" => 30 }).unwrap();
    assert_eq!(user.to_string(), r#"<User id: 1, name: "Alice", age: 30>"#);

    let mut post = BlogPost::blank();
    post.set_published(false);
    assert_eq!(post.to_string(), "<BlogPost published: false>");
}

#[test]
fn new_instance_without_id_is_new_until_saved() {
    let db = seeded();
    let mut user = User::build(record! { "name" => "Frank", "age" => 33 }).unwrap();
    assert!(user.is_new_record());
    assert!(!user.is_persisted());

    assert!(user.save(&db));
    assert!(!user.is_new_record());
    assert!(user.is_persisted());
}

#[test]
fn build_round_trips_record() {
    let record = record! { "id" => 7, "name" => "Grace", "age" => 52 };
    let user = User::build(record.clone()).unwrap();
    assert_eq!(user.attributes(), record);
    for (field, value) in &record {
        assert_eq!(user.read_attribute(field).as_ref(), Some(value));
    }
}

#[test]
fn chained_where_equals_merged_where() {
    let db = seeded();
    let users = db.models::<User>();

    let chained = users.where_([("age", 25..=35)]).where_([("name", "Charlie")]);
    let merged = users.where_([
        ("age", Condition::from(25..=35)),
        ("name", Condition::from("Charlie")),
    ]);
    assert_eq!(chained.all().unwrap(), merged.all().unwrap());

    let overridden = users.where_([("name", "Alice")]).where_([("name", "Bob")]);
    assert_eq!(names(&overridden.all().unwrap()), vec!["Bob"]);
}

#[test]
fn all_is_repeatable() {
    let db = seeded();
    let query = db.models::<User>().where_([("age", 26..=40)]);
    assert_eq!(query.all().unwrap(), query.all().unwrap());
}

#[test]
fn range_includes_bounds() {
    let db = seeded();
    let users = db.models::<User>();
    for (id, age) in [(1, 24), (2, 25), (3, 30), (4, 31)] {
        users
            .find(id)
            .unwrap()
            .unwrap()
            .update(&db, record! { "age" => age })
            .unwrap();
    }

    let in_range = users.where_([("age", 25..=30)]).all().unwrap();
    assert_eq!(names(&in_range), vec!["Bob", "Charlie", "Eve"]);
}

#[test]
fn predicate_selects_thirty_and_over() {
    let db = seeded();
    let users = db
        .models::<User>()
        .where_([("age", Condition::predicate(|v| v.as_int().is_some_and(|a| a >= 30)))])
        .all()
        .unwrap();
    assert_eq!(names(&users), vec!["Alice", "Charlie", "David"]);
    assert_eq!(
        users.iter().filter_map(User::age).collect::<Vec<_>>(),
        vec![30, 35, 40]
    );
}

#[test]
fn dynamic_finder_by_name() {
    let db = seeded();
    let users = db.models::<User>();

    let charlie = users.invoke("find_by_name", &["Charlie".into()]).unwrap().unwrap();
    assert_eq!(charlie.id(), Some(3));
    assert!(users.invoke("find_by_name", &["Nobody".into()]).unwrap().is_none());

    assert!(users.responds_to("find_by_age"));
    assert!(!users.responds_to("explode"));
    assert!(!users.responds_to("find_by_"));
    assert!(matches!(
        users.invoke("explode", &[]),
        Err(OrmError::NoMethod { .. })
    ));
}

#[test]
fn create_appends_with_next_id() {
    let db = seeded();
    let users = db.models::<User>();
    let before = users.count().unwrap();
    let max_id = users.all().unwrap().iter().filter_map(User::id).max().unwrap();

    let mut frank = users.build(record! { "name" => "Frank", "age" => 33 }).unwrap();
    frank.save_strict(&db).unwrap();

    assert_eq!(users.count().unwrap(), before + 1);
    assert_eq!(frank.id(), Some(max_id + 1));
    assert!(!frank.is_new_record());
    assert_eq!(users.last().unwrap().unwrap(), frank);
}

#[test]
fn create_on_empty_table_starts_at_one() {
    let db = seeded();
    db.create_table(BlogPost::TABLE, vec![]).unwrap();

    let post = db
        .models::<BlogPost>()
        .create(record! { "title" => "Hello", "published" => true })
        .unwrap();
    assert_eq!(post.id(), Some(1));
    assert_eq!(post.published(), Some(true));
}

#[test]
fn update_changes_only_given_field() {
    let db = seeded();
    let users = db.models::<User>();
    let mut david = users.find_by("name", "David").unwrap().unwrap();

    david.update(&db, record! { "age" => 99 }).unwrap();

    let row = db.store().get(User::TABLE, "id", 4).unwrap().unwrap();
    assert_eq!(row, record! { "id" => 4, "name" => "David", "age" => 99 });
    assert_eq!(users.count().unwrap(), 5);
}

#[test]
fn destroy_removes_record() {
    let db = seeded();
    let users = db.models::<User>();
    let mut eve = users.find(5).unwrap().unwrap();

    eve.destroy(&db).unwrap();

    assert!(eve.is_destroyed());
    assert_eq!(users.count().unwrap(), 4);
    assert!(users.find(5).unwrap().is_none());
}

#[test]
fn create_past_max_id_leaves_table_unchanged() {
    let db = mini_record::Database::new();
    db.create_table(
        User::TABLE,
        vec![
            record! { "id" => i64::MAX - 1, "name" => "Penultimate" },
            record! { "id" => 1, "name" => "Alice" },
        ],
    )
    .unwrap();
    let users = db.models::<User>();

    let last = users.create(record! { "name" => "Last" }).unwrap();
    assert_eq!(last.id(), Some(i64::MAX));

    let mut extra = users.build(record! { "name" => "Extra" }).unwrap();
    assert!(!extra.save(&db));
    assert!(!extra.save(&db));
    assert!(extra.is_new_record());
    assert_eq!(extra.id(), None);
    assert_eq!(users.count().unwrap(), 3);

    let err = extra.save_strict(&db).unwrap_err();
    assert!(matches!(err, OrmError::RecordNotSaved { model: "User" }));
    assert_eq!(users.count().unwrap(), 3);
}

#[test]
fn strict_save_names_model() {
    let db = seeded();
    let mut ghost = User::build(record! { "id" => 77, "name" => "Ghost" }).unwrap();
    let err = ghost.save_strict(&db).unwrap_err();
    assert!(matches!(err, OrmError::RecordNotSaved { model: "User" }));
    assert_eq!(err.to_string(), "Failed to save User");
}

#[test]
fn unseeded_table_is_not_found() {
    let db = seeded();
    let err = db.models::<BlogPost>().all().unwrap_err();
    assert!(matches!(err, OrmError::TableNotFound { ref table } if table == "journal_entries"));
}

#[test]
fn scopes_registered_per_model() {
    let db = seeded();
    db.register::<User>(|scopes| {
        scopes
            .define("adults", |users, _| {
                Ok(users.where_([("age", Condition::predicate(|v| v.as_int().is_some_and(|a| a >= 30)))]))
            })
            .define("named", |users, args| match args {
                [name] => Ok(users.where_([("name", name.clone())])),
                _ => Err(OrmError::WrongArity {
                    method: "named".into(),
                    expected: 1,
                    given: args.len(),
                }),
            });
    })
    .unwrap();

    let users = db.models::<User>();
    let adults = users.scope("adults", &[]).unwrap();
    assert_eq!(names(&adults.all().unwrap()), vec!["Alice", "Charlie", "David"]);
    assert_eq!(
        names(&adults.where_([("name", "David")]).all().unwrap()),
        vec!["David"]
    );

    let bob = users.scope("named", &["Bob".into()]).unwrap().first().unwrap();
    assert_eq!(bob.and_then(|u| u.age()), Some(25));
    assert!(users.scope("named", &[]).is_err());

    // scopes are per model
    assert!(db.models::<BlogPost>().scope("adults", &[]).is_err());
    assert!(db.has_scope::<User>("adults"));
    assert!(!db.has_scope::<BlogPost>("adults"));
}

#[test]
fn seed_from_json() {
    let db = mini_record::Database::new();
    db.seed_json(
        BlogPost::TABLE,
        r#"[
            {"id": 1, "title": "First", "published": true},
            {"id": 2, "title": "Draft", "published": false}
        ]"#,
    )
    .unwrap();

    let published = db
        .models::<BlogPost>()
        .where_([("published", true)])
        .all()
        .unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].title().as_deref(), Some("First"));

    let err = db.seed_json("BROKEN", r#"[{"id": 1.5}]"#).unwrap_err();
    assert!(matches!(err, OrmError::Seed(_)));
}
