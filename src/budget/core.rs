use rusqlite::{Connection, OptionalExtension, Row};
use time::Date;

use crate::{Error, category::Category, database_id::BudgetId, user::UserID};

/// How much a user plans to spend in a category between two dates (inclusive).
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    /// The budget's ID in the database.
    pub id: BudgetId,
    /// The user that set the budget.
    pub user_id: UserID,
    /// The category the budget applies to.
    pub category: Category,
    /// The amount in dollars.
    pub amount: f64,
    /// The first day the budget covers.
    pub start_date: Date,
    /// The last day the budget covers.
    pub end_date: Date,
}

/// The data needed to set a [Budget].
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    /// The user setting the budget.
    pub user_id: UserID,
    /// The category the budget applies to.
    pub category: Category,
    /// The amount in dollars.
    pub amount: f64,
    /// The first day the budget covers.
    pub start_date: Date,
    /// The last day the budget covers, must not be before `start_date`.
    pub end_date: Date,
}

const BUDGET_COLUMNS: &str = "id, user_id, category_id, amount, start_date, end_date";

/// Create the budget table.
///
/// A user has at most one budget per category.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            amount REAL NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE RESTRICT,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
        )",
        (),
    )?;

    connection.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_budget_user_category \
        ON budget(user_id, category_id)",
        (),
    )?;

    Ok(())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category: row.get(2)?,
        amount: row.get(3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
    })
}

/// Set the budget for the user and category in `budget`, replacing any
/// existing budget for that pair.
///
/// The old budget is removed and the new one inserted in a single
/// transaction, so there is never a moment with zero or two budgets.
///
/// # Errors
/// Returns a:
/// - [Error::InvalidDateRange] if the start date is after the end date,
/// - [Error::SqlError] if the user does not exist or some other SQL error occurred.
pub fn replace_budget(budget: NewBudget, connection: &Connection) -> Result<Budget, Error> {
    if budget.start_date > budget.end_date {
        return Err(Error::InvalidDateRange(budget.start_date, budget.end_date));
    }

    let transaction = connection.unchecked_transaction()?;

    transaction.execute(
        "DELETE FROM budget WHERE user_id = ?1 AND category_id = ?2",
        (budget.user_id.as_i64(), budget.category),
    )?;

    let query = format!(
        "INSERT INTO budget (user_id, category_id, amount, start_date, end_date) \
        VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {BUDGET_COLUMNS}"
    );
    let inserted = transaction.prepare(&query)?.query_row(
        (
            budget.user_id.as_i64(),
            budget.category,
            budget.amount,
            budget.start_date,
            budget.end_date,
        ),
        map_budget_row,
    )?;

    transaction.commit()?;

    Ok(inserted)
}

/// Get the budget with `id`, whoever owns it.
///
/// # Errors
/// Returns [Error::NotFound] if there is no budget with `id`.
pub fn get_budget(id: BudgetId, connection: &Connection) -> Result<Budget, Error> {
    let query = format!("SELECT {BUDGET_COLUMNS} FROM budget WHERE id = :id");

    connection
        .prepare(&query)?
        .query_row(&[(":id", &id)], map_budget_row)
        .map_err(Error::from)
}

/// Get the user's budget for `category`, or `None` if they have not set one.
pub fn get_budget_for_category(
    user_id: UserID,
    category: Category,
    connection: &Connection,
) -> Result<Option<Budget>, Error> {
    let query = format!(
        "SELECT {BUDGET_COLUMNS} FROM budget WHERE user_id = ?1 AND category_id = ?2"
    );

    connection
        .prepare(&query)?
        .query_row((user_id.as_i64(), category), map_budget_row)
        .optional()
        .map_err(Error::from)
}

/// Get all of the user's budgets in category order.
pub fn get_budgets_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    let query = format!(
        "SELECT {BUDGET_COLUMNS} FROM budget WHERE user_id = :user_id ORDER BY category_id"
    );

    connection
        .prepare(&query)?
        .query_map(&[(":user_id", &user_id.as_i64())], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(Error::from))
        .collect()
}

/// Delete the budget with `id` if it belongs to `user_id`.
///
/// # Errors
/// Returns a:
/// - [Error::NotFound] if there is no budget with `id`,
/// - [Error::Forbidden] if the budget belongs to another user, in which case it is kept,
/// - [Error::SqlError] if some other SQL error occurred.
pub fn delete_budget(id: BudgetId, user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let budget = get_budget(id, connection)?;

    if budget.user_id != user_id {
        tracing::warn!(
            "User {user_id} tried to delete budget {id} owned by user {}",
            budget.user_id
        );
        return Err(Error::Forbidden);
    }

    connection.execute(
        "DELETE FROM budget WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    Ok(())
}

#[cfg(test)]
mod budget_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::Category,
        test_utils::{create_test_user, get_test_connection},
        user::UserID,
    };

    use super::{
        NewBudget, delete_budget, get_budget, get_budget_for_category, get_budgets_for_user,
        replace_budget,
    };

    fn get_connection_with_users() -> (Connection, UserID, UserID) {
        let connection = get_test_connection();
        let alice = create_test_user("alice@example.com", &connection);
        let bob = create_test_user("bob@example.com", &connection);

        (connection, alice.id, bob.id)
    }

    fn new_budget(user_id: UserID, category: Category, amount: f64) -> NewBudget {
        NewBudget {
            user_id,
            category,
            amount,
            start_date: date!(2024 - 01 - 01),
            end_date: date!(2024 - 01 - 31),
        }
    }

    fn count_budgets(user_id: UserID, category: Category, connection: &Connection) -> i64 {
        connection
            .query_row(
                "SELECT COUNT(id) FROM budget WHERE user_id = ?1 AND category_id = ?2",
                (user_id.as_i64(), category),
                |row| row.get(0),
            )
            .unwrap()
    }

    #[test]
    fn replacing_leaves_exactly_one_budget_with_latest_amount() {
        let (connection, alice, _) = get_connection_with_users();

        replace_budget(new_budget(alice, Category::Travel, 100.0), &connection).unwrap();
        let second =
            replace_budget(new_budget(alice, Category::Travel, 150.0), &connection).unwrap();

        assert_eq!(count_budgets(alice, Category::Travel, &connection), 1);
        let got = get_budget_for_category(alice, Category::Travel, &connection)
            .unwrap()
            .unwrap();
        assert_eq!(got, second);
        assert_eq!(got.amount, 150.0);
    }

    #[test]
    fn replacing_does_not_touch_other_categories_or_users() {
        let (connection, alice, bob) = get_connection_with_users();
        let food = replace_budget(new_budget(alice, Category::Food, 50.0), &connection).unwrap();
        let bobs = replace_budget(new_budget(bob, Category::Travel, 70.0), &connection).unwrap();

        replace_budget(new_budget(alice, Category::Travel, 100.0), &connection).unwrap();

        assert_eq!(get_budget(food.id, &connection), Ok(food));
        assert_eq!(get_budget(bobs.id, &connection), Ok(bobs));
    }

    #[test]
    fn start_after_end_is_rejected() {
        let (connection, alice, _) = get_connection_with_users();
        let mut budget = new_budget(alice, Category::Food, 50.0);
        budget.start_date = date!(2024 - 02 - 01);

        let result = replace_budget(budget, &connection);

        assert_eq!(
            result,
            Err(Error::InvalidDateRange(
                date!(2024 - 02 - 01),
                date!(2024 - 01 - 31)
            ))
        );
        assert_eq!(count_budgets(alice, Category::Food, &connection), 0);
    }

    #[test]
    fn failed_insert_keeps_existing_budget() {
        let (connection, alice, _) = get_connection_with_users();
        let existing =
            replace_budget(new_budget(alice, Category::Food, 50.0), &connection).unwrap();
        // Deleting the user's row makes the insert fail on the foreign key,
        // after the old budget has been deleted inside the transaction.
        connection
            .execute("PRAGMA foreign_keys = OFF", ())
            .unwrap();
        connection
            .execute("DELETE FROM user WHERE id = ?1", [alice.as_i64()])
            .unwrap();
        connection.execute("PRAGMA foreign_keys = ON", ()).unwrap();

        let result = replace_budget(new_budget(alice, Category::Food, 80.0), &connection);

        assert!(result.is_err());
        assert_eq!(get_budget(existing.id, &connection), Ok(existing));
    }

    #[test]
    fn missing_budget_is_none() {
        let (connection, alice, _) = get_connection_with_users();

        assert_eq!(
            get_budget_for_category(alice, Category::Clothing, &connection),
            Ok(None)
        );
    }

    #[test]
    fn get_for_user_returns_own_budgets_in_category_order() {
        let (connection, alice, bob) = get_connection_with_users();
        let food = replace_budget(new_budget(alice, Category::Food, 50.0), &connection).unwrap();
        let travel =
            replace_budget(new_budget(alice, Category::Travel, 10.0), &connection).unwrap();
        replace_budget(new_budget(bob, Category::Food, 20.0), &connection).unwrap();

        let got = get_budgets_for_user(alice, &connection).unwrap();

        assert_eq!(got, vec![travel, food]);
    }

    #[test]
    fn delete_by_other_user_is_forbidden_and_keeps_row() {
        let (connection, alice, bob) = get_connection_with_users();
        let budget = replace_budget(new_budget(alice, Category::Food, 50.0), &connection).unwrap();

        assert_eq!(
            delete_budget(budget.id, bob, &connection),
            Err(Error::Forbidden)
        );
        assert_eq!(get_budget(budget.id, &connection), Ok(budget));
    }

    #[test]
    fn owner_can_delete() {
        let (connection, alice, _) = get_connection_with_users();
        let budget = replace_budget(new_budget(alice, Category::Food, 50.0), &connection).unwrap();

        delete_budget(budget.id, alice, &connection).unwrap();

        assert_eq!(get_budget(budget.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let (connection, alice, _) = get_connection_with_users();

        assert_eq!(delete_budget(999, alice, &connection), Err(Error::NotFound));
    }
}
