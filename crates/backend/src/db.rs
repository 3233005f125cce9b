use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::{
    pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager, ManagerConfig},
    AsyncPgConnection, RunQueryDsl,
};

use crate::models::{NewUser, UserRow};
use crate::repository::{Account, StoreError, UserStore};

pub type DbPool = Pool<AsyncPgConnection>;

async fn establish_tls_connection(config: String) -> diesel::ConnectionResult<AsyncPgConnection> {
    // Set up rustls TLS configuration
    let root_store =
        rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);

    let (client, connection) = tokio_postgres::connect(&config, tls)
        .await
        .map_err(|e| diesel::ConnectionError::BadConnection(e.to_string()))?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("Connection error: {}", e);
        }
    });

    AsyncPgConnection::try_from(client).await
}

/// Build the connection pool. Connections are opened lazily; call
/// [`check_connection`] to fail fast at startup.
pub fn establish_connection_pool(database_url: &str, tls: bool) -> anyhow::Result<DbPool> {
    let config = if tls {
        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup =
            Box::new(|url| Box::pin(establish_tls_connection(url.to_string())));

        AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_config(
            database_url,
            manager_config,
        )
    } else {
        AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url)
    };

    let pool = Pool::builder(config).build()?;

    Ok(pool)
}

/// Check out one connection so a bad `DATABASE_URL` is reported at startup.
pub async fn check_connection(pool: &DbPool) -> Result<(), StoreError> {
    pool.get().await?;
    Ok(())
}

/// [`UserStore`] backed by the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<Account, StoreError> {
        use crate::schema::users;

        let mut conn = self.pool.get().await?;

        let row = diesel::insert_into(users::table)
            .values(NewUser {
                email,
                password_hash,
            })
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .map_err(map_insert_error)?;

        Ok(row.into())
    }

    async fn find_by_email(&self, email_val: &str) -> Result<Option<Account>, StoreError> {
        use crate::schema::users::dsl::*;

        let mut conn = self.pool.get().await?;

        let row = users
            .filter(email.eq(email_val))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()?;

        Ok(row.map(Into::into))
    }
}

fn map_insert_error(err: DieselError) -> StoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => StoreError::Conflict,
        other => StoreError::Database(other),
    }
}
