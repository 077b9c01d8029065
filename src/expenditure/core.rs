use rusqlite::{Connection, Row};
use time::Date;

use crate::{Error, category::Category, database_id::ExpenditureId, user::UserID};

/// Something a user bought.
#[derive(Debug, Clone, PartialEq)]
pub struct Expenditure {
    /// The expenditure's ID in the database.
    pub id: ExpenditureId,
    /// The user that recorded the expenditure.
    pub user_id: UserID,
    /// What kind of purchase it was.
    pub category: Category,
    /// How much was spent, in dollars.
    pub price: f64,
    /// When the purchase was made.
    pub date: Date,
    /// The name of the shop or website.
    pub where_bought: String,
    /// What was bought.
    pub description: String,
    /// The shipment tracking number for online purchases.
    pub tracking_num: Option<String>,
    /// The carrier code used by the tracking API, e.g. "usps".
    pub tracking_num_carrier: Option<String>,
}

/// The data needed to record a new [Expenditure].
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpenditure {
    /// The user recording the expenditure.
    pub user_id: UserID,
    /// What kind of purchase it was.
    pub category: Category,
    /// How much was spent, in dollars.
    pub price: f64,
    /// When the purchase was made.
    pub date: Date,
    /// The name of the shop or website.
    pub where_bought: String,
    /// What was bought.
    pub description: String,
    /// The shipment tracking number, if any.
    pub tracking_num: Option<String>,
    /// The carrier code used by the tracking API, if any.
    pub tracking_num_carrier: Option<String>,
}

const EXPENDITURE_COLUMNS: &str = "id, user_id, category_id, price, date, where_bought, \
    description, tracking_num, tracking_num_carrier";

pub fn create_expenditure_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expenditure (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            price REAL NOT NULL,
            date TEXT NOT NULL,
            where_bought TEXT NOT NULL,
            description TEXT NOT NULL,
            tracking_num TEXT,
            tracking_num_carrier TEXT,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE RESTRICT,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
        )",
        (),
    )?;

    // Improves performance of the windowed per-user queries used by the dashboard.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenditure_user_date ON expenditure(user_id, date)",
        (),
    )?;

    Ok(())
}

pub fn map_expenditure_row(row: &Row) -> Result<Expenditure, rusqlite::Error> {
    Ok(Expenditure {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category: row.get(2)?,
        price: row.get(3)?,
        date: row.get(4)?,
        where_bought: row.get(5)?,
        description: row.get(6)?,
        tracking_num: row.get(7)?,
        tracking_num_carrier: row.get(8)?,
    })
}

/// Insert a new expenditure into the database.
///
/// # Errors
/// Returns [Error::SqlError] if the user does not exist or some other SQL error occurred.
pub fn create_expenditure(
    expenditure: NewExpenditure,
    connection: &Connection,
) -> Result<Expenditure, Error> {
    let query = format!(
        "INSERT INTO expenditure (user_id, category_id, price, date, where_bought, description, \
        tracking_num, tracking_num_carrier) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
        RETURNING {EXPENDITURE_COLUMNS}"
    );

    connection
        .prepare(&query)?
        .query_row(
            (
                expenditure.user_id.as_i64(),
                expenditure.category,
                expenditure.price,
                expenditure.date,
                &expenditure.where_bought,
                &expenditure.description,
                &expenditure.tracking_num,
                &expenditure.tracking_num_carrier,
            ),
            map_expenditure_row,
        )
        .map_err(Error::from)
}

/// Get the expenditure with `id`, whoever owns it.
///
/// # Errors
/// Returns [Error::NotFound] if there is no expenditure with `id`.
pub fn get_expenditure(id: ExpenditureId, connection: &Connection) -> Result<Expenditure, Error> {
    let query = format!("SELECT {EXPENDITURE_COLUMNS} FROM expenditure WHERE id = :id");

    connection
        .prepare(&query)?
        .query_row(&[(":id", &id)], map_expenditure_row)
        .map_err(Error::from)
}

/// Get all of a user's expenditures, newest first.
pub fn get_expenditures_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Expenditure>, Error> {
    let query = format!(
        "SELECT {EXPENDITURE_COLUMNS} FROM expenditure WHERE user_id = :user_id \
        ORDER BY date DESC, id DESC"
    );

    connection
        .prepare(&query)?
        .query_map(&[(":user_id", &user_id.as_i64())], map_expenditure_row)?
        .map(|maybe_expenditure| maybe_expenditure.map_err(Error::from))
        .collect()
}

/// Get the user's expenditure with the shipment tracking number `tracking_num`.
///
/// Other users' expenditures are never returned, even if they have the same
/// tracking number.
///
/// # Errors
/// Returns [Error::NotFound] if the user has no expenditure with the tracking number.
pub fn get_expenditure_by_tracking_number(
    user_id: UserID,
    tracking_num: &str,
    connection: &Connection,
) -> Result<Expenditure, Error> {
    let query = format!(
        "SELECT {EXPENDITURE_COLUMNS} FROM expenditure \
        WHERE user_id = :user_id AND tracking_num = :tracking_num \
        ORDER BY id DESC LIMIT 1"
    );

    connection
        .prepare(&query)?
        .query_row(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":tracking_num": tracking_num,
            },
            map_expenditure_row,
        )
        .map_err(Error::from)
}

/// Delete the expenditure with `id` if it belongs to `user_id`.
///
/// # Errors
/// Returns a:
/// - [Error::NotFound] if there is no expenditure with `id`,
/// - [Error::Forbidden] if the expenditure belongs to another user, in which case it is kept,
/// - [Error::SqlError] if some other SQL error occurred.
pub fn delete_expenditure(
    id: ExpenditureId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let expenditure = get_expenditure(id, connection)?;

    if expenditure.user_id != user_id {
        tracing::warn!(
            "User {user_id} tried to delete expenditure {id} owned by user {}",
            expenditure.user_id
        );
        return Err(Error::Forbidden);
    }

    connection.execute(
        "DELETE FROM expenditure WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    Ok(())
}
