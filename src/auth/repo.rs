use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::error::AuthError;
use crate::auth::password::verify_password;
pub use crate::auth::repo_types::User;

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Insert a new user.
    ///
    /// The unique index on `email` is the only duplicate check; two
    /// concurrent registrations race on the constraint, not on a lookup.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        name: Option<&str>,
    ) -> Result<User, AuthError> {
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, name, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .fetch_one(db)
        .await;

        match inserted {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AuthError::RegistrationFailed)
            }
            Err(e) => Err(AuthError::Internal(e.into())),
        }
    }

    /// Check a login attempt against the stored credential.
    ///
    /// Unknown email and wrong password both come back as `None`.
    pub async fn login_check(
        db: &PgPool,
        email: &str,
        password: &str,
    ) -> anyhow::Result<Option<Uuid>> {
        let Some(user) = User::find_by_email(db, email).await? else {
            return Ok(None);
        };
        if verify_password(password, &user.password_hash)? {
            Ok(Some(user.id))
        } else {
            Ok(None)
        }
    }
}
