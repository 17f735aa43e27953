use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Build an r2d2 pool for `database_url`. The demo workflow is sequential,
/// so a handful of connections is plenty.
pub fn create_pool(database_url: &str) -> DbPool {
    Pool::builder()
        .max_size(4)
        .build(ConnectionManager::<PgConnection>::new(database_url))
        .expect("Failed to create database connection pool")
}
