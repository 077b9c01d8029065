use rusqlite::Connection;

use crate::{
    PasswordHash,
    db::initialize,
    user::{NewUser, User, create_user},
};

/// An in-memory database with all of the application's tables.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Insert a user with `email` whose password hash is not a real hash.
pub(crate) fn create_test_user(email: &str, connection: &Connection) -> User {
    create_user(
        NewUser {
            name: email.split('@').next().unwrap_or(email).to_owned(),
            email: email.to_owned(),
            password_hash: PasswordHash::new_unchecked("hunter2"),
        },
        connection,
    )
    .expect("Could not create test user")
}
