use mini_record::{record, Condition, Database, Lifecycle, Model, OrmError, Persistence};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Model)]
struct User {
    id: Option<i64>,
    name: Option<String>,
    age: Option<i64>,
    lifecycle: Lifecycle,
}

fn at_least(min: i64) -> Condition {
    Condition::predicate(move |v| v.as_int().is_some_and(|a| a >= min))
}

fn print_all(label: &str, users: &[User]) {
    println!("{}:", label);
    for user in users {
        println!("  {}", user);
    }
}

fn main() -> Result<(), OrmError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let db = Database::new();
    db.create_table(
        User::TABLE,
        vec![
            record! { "id" => 1, "name" => "Alice", "age" => 30 },
            record! { "id" => 2, "name" => "Bob", "age" => 25 },
            record! { "id" => 3, "name" => "Charlie", "age" => 35 },
            record! { "id" => 4, "name" => "David", "age" => 40 },
            record! { "id" => 5, "name" => "Eve", "age" => 28 },
        ],
    )?;

    db.register::<User>(|scopes| {
        scopes
            .define("adults", |users, _| Ok(users.where_([("age", at_least(30))])))
            .define("aged", |users, args| {
                let age = args.first().cloned().ok_or(OrmError::WrongArity {
                    method: "aged".into(),
                    expected: 1,
                    given: 0,
                })?;
                Ok(users.where_([("age", age)]))
            });
    })?;

    let users = db.models::<User>();

    // Querying
    print_all("All users", &users.all()?);
    print_all("Aged 25 to 30", &users.where_([("age", 25..=30)]).all()?);
    print_all("30 and over", &users.where_([("age", at_least(30))]).all()?);
    if let Some(first) = users.first()? {
        println!("First: {}", first);
    }

    // Scopes
    print_all("Adults", &users.scope("adults", &[])?.all()?);
    print_all(
        "Adults named David",
        &users.scope("adults", &[])?.where_([("name", "David")]).all()?,
    );
    print_all("Aged 25", &users.scope("aged", &[25.into()])?.all()?);

    // Dynamic finders
    for method in ["find_by_name", "find_by_age", "delete_everything"] {
        println!("responds_to({}) = {}", method, users.responds_to(method));
    }
    match users.invoke("find_by_name", &["Charlie".into()])? {
        Some(charlie) => println!("find_by_name(Charlie): {}", charlie),
        None => println!("find_by_name(Charlie): not found"),
    }
    if let Err(err) = users.invoke("delete_everything", &[]) {
        println!("delete_everything: {}", err);
    }

    // Lifecycle
    let mut frank = users.build(record! { "name" => "Frank", "age" => 33 })?;
    println!("Frank new? {}", frank.is_new_record());
    frank.save_strict(&db)?;
    println!("Saved: {} (persisted? {})", frank, frank.is_persisted());

    frank.update(&db, record! { "age" => 34 })?;
    println!("Updated: {}", frank);

    frank.destroy(&db)?;
    println!(
        "Destroyed? {}; remaining users: {}",
        frank.is_destroyed(),
        users.count()?
    );

    let mut ghost = users.build(record! { "id" => 99, "name" => "Ghost" })?;
    if !ghost.save(&db) {
        println!("Could not save {}", ghost);
    }

    Ok(())
}
