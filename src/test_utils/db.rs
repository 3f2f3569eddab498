use rusqlite::Connection;

use crate::{AppState, initialize_db};

pub(crate) fn must_create_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("could not create in-memory SQLite database");
    initialize_db(&connection).expect("could not initialize test DB");

    connection
}

pub(crate) fn must_create_test_state() -> AppState {
    AppState::new(must_create_test_connection(), "Etc/UTC").expect("could not create app state")
}
