//! The fixed set of expenditure categories.
//!
//! Categories are not user editable. They live in the `category` table so
//! that expenditures and budgets can reference them with foreign keys, and
//! in code as the closed [Category] enum.

use std::fmt::Display;

use rusqlite::{
    Connection, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// One of the six ways an expenditure can be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Category {
    /// Anything bought online and shipped.
    OnlinePurchase = 1,
    /// Flights, fuel, accommodation and so on.
    Travel = 2,
    /// Eating out.
    Food = 3,
    /// Food bought to cook at home.
    Groceries = 4,
    /// Clothes and shoes.
    Clothing = 5,
    /// Movies, concerts, games.
    Entertainment = 6,
}

impl Category {
    /// Every category in ID order.
    pub const ALL: [Category; 6] = [
        Category::OnlinePurchase,
        Category::Travel,
        Category::Food,
        Category::Groceries,
        Category::Clothing,
        Category::Entertainment,
    ];

    /// The category's ID in the database.
    pub fn id(self) -> i64 {
        self as i64
    }

    /// The display name of the category.
    pub fn name(self) -> &'static str {
        match self {
            Category::OnlinePurchase => "Online Purchase",
            Category::Travel => "Travel",
            Category::Food => "Food",
            Category::Groceries => "Groceries",
            Category::Clothing => "Clothing",
            Category::Entertainment => "Entertainment",
        }
    }

    /// Get the category with the database ID `id`.
    ///
    /// # Errors
    /// Returns [Error::InvalidCategory] if `id` is not between 1 and 6.
    pub fn from_id(id: i64) -> Result<Self, Error> {
        Category::ALL
            .into_iter()
            .find(|category| category.id() == id)
            .ok_or(Error::InvalidCategory(id))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i64> for Category {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Category::from_id(value)
    }
}

impl From<Category> for i64 {
    fn from(value: Category) -> Self {
        value.id()
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.id()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let id = value.as_i64()?;

        Category::from_id(id).map_err(|_| FromSqlError::OutOfRange(id))
    }
}

/// Create the category table and insert the fixed categories.
///
/// Safe to call on a database that already has the categories.
///
/// # Errors
/// This function will return an error if the SQL query failed.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
                )",
        (),
    )?;

    let mut statement =
        connection.prepare("INSERT OR IGNORE INTO category (id, name) VALUES (?1, ?2)")?;

    for category in Category::ALL {
        statement.execute((category.id(), category.name()))?;
    }

    Ok(())
}
