use sqlx::postgres::PgPool;

/// Postgres-backed implementation of the repository traits. Handlers only
/// see the traits, so tests can swap in a mock.
pub struct PostgresRepository {
    pub(crate) pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
