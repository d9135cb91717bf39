//! Models and seed data for the user table.

use mini_record::{record, Database, Lifecycle, Model};

#[derive(Clone, Debug, PartialEq, Model)]
pub struct User {
    id: Option<i64>,
    name: Option<String>,
    age: Option<i64>,
    lifecycle: Lifecycle,
}

/// A model with an explicit table name and a differently named lifecycle field.
#[derive(Clone, Debug, Model)]
#[model(table = "journal_entries")]
pub struct BlogPost {
    id: Option<i64>,
    title: Option<String>,
    published: Option<bool>,
    #[model(lifecycle)]
    state: Lifecycle,
}

/// A multi-word model on the default table name, keyed by `number`.
#[derive(Clone, Debug, PartialEq, Model)]
pub struct LineItem {
    #[model(id)]
    number: Option<i64>,
    product: Option<String>,
    quantity: Option<i64>,
    lifecycle: Lifecycle,
}

/// Five users with ages [30, 25, 35, 40, 28].
pub fn seeded() -> Database {
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
    )
    .unwrap();
    db
}

pub fn names(users: &[User]) -> Vec<String> {
    users.iter().filter_map(User::name).collect()
}
