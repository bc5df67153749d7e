//! User repository: sign-in records and authorization flags.

use chrono::Utc;

use av_core::entities::User;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, get_opt_string, opt_value, optional_text, parse_datetime, require_text};
use crate::service::AvService;

const SELECT_COLS: &str =
    "id, email, display_name, photo_url, is_admin, is_authorized, last_login_at, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        display_name: get_opt_string(row, 2)?,
        photo_url: get_opt_string(row, 3)?,
        is_admin: get_bool(row, 4)?,
        is_authorized: get_bool(row, 5)?,
        last_login_at: parse_datetime(&row.get::<String>(6)?)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl AvService {
    /// Record a sign-in. New users start unauthorized and non-admin; existing
    /// users get their profile and `last_login_at` refreshed. Authorization
    /// flags are never changed here.
    pub async fn login(
        &self,
        uid: &str,
        email: &str,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<User, DatabaseError> {
        let uid = require_text("User id", uid)?;
        let email = require_text("Email", email)?;
        let now = Utc::now().to_rfc3339();
        let display_name = optional_text(display_name);
        let photo_url = optional_text(photo_url);

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO users ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, 0, 0, ?5, ?5)
                     ON CONFLICT(id) DO UPDATE SET
                         email = excluded.email,
                         display_name = COALESCE(excluded.display_name, users.display_name),
                         photo_url = COALESCE(excluded.photo_url, users.photo_url),
                         last_login_at = excluded.last_login_at"
                ),
                libsql::params![
                    uid.as_str(),
                    email.as_str(),
                    opt_value(display_name.as_deref()),
                    opt_value(photo_url.as_deref()),
                    now
                ],
            )
            .await?;

        tracing::debug!(%uid, "user signed in");
        self.get_user(&uid).await
    }

    pub async fn find_user(&self, uid: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"), [uid])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_user(&self, uid: &str) -> Result<User, DatabaseError> {
        self.find_user(uid)
            .await?
            .ok_or_else(|| DatabaseError::not_found("User", uid))
    }

    /// All users, newest first.
    pub async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users ORDER BY created_at DESC, id"),
                (),
            )
            .await?;
        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }

    pub async fn authorize_user(&self, uid: &str) -> Result<User, DatabaseError> {
        self.set_user_flag(uid, "is_authorized", true).await
    }

    pub async fn revoke_user(&self, uid: &str) -> Result<User, DatabaseError> {
        self.set_user_flag(uid, "is_authorized", false).await
    }

    pub async fn set_admin(&self, uid: &str, is_admin: bool) -> Result<User, DatabaseError> {
        self.set_user_flag(uid, "is_admin", is_admin).await
    }

    pub async fn delete_user(&self, uid: &str) -> Result<(), DatabaseError> {
        self.get_user(uid).await?;
        self.db()
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", [uid])
            .await?;
        tracing::info!(%uid, "user deleted");
        Ok(())
    }

    /// Register `uid` and make it an authorized admin.
    pub async fn bootstrap_admin(
        &self,
        uid: &str,
        email: &str,
        display_name: Option<&str>,
    ) -> Result<User, DatabaseError> {
        self.login(uid, email, display_name, None).await?;
        self.db()
            .conn()
            .execute(
                "UPDATE users SET is_authorized = 1, is_admin = 1 WHERE id = ?1",
                [uid],
            )
            .await?;
        tracing::info!(%uid, "bootstrap admin registered");
        self.get_user(uid).await
    }

    async fn set_user_flag(&self, uid: &str, column: &str, value: bool) -> Result<User, DatabaseError> {
        self.get_user(uid).await?;
        self.db()
            .conn()
            .execute(
                &format!("UPDATE users SET {column} = ?1 WHERE id = ?2"),
                libsql::params![i64::from(value), uid],
            )
            .await?;
        tracing::info!(%uid, column, value, "user flag changed");
        self.get_user(uid).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn new_users_are_unauthorized() {
        let svc = test_service().await;
        let user = svc
            .login("u-1", "a@example.edu", Some("A"), None)
            .await
            .unwrap();
        assert!(!user.is_authorized);
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn login_never_touches_authorization() {
        let svc = test_service().await;
        svc.login("u-1", "a@example.edu", None, None).await.unwrap();
        svc.authorize_user("u-1").await.unwrap();

        let again = svc
            .login("u-1", "new@example.edu", Some("Renamed"), None)
            .await
            .unwrap();
        assert!(again.is_authorized);
        assert_eq!(again.email, "new@example.edu");
        assert_eq!(again.display_name.as_deref(), Some("Renamed"));
    }

    #[tokio::test]
    async fn flags_and_delete() {
        let svc = test_service().await;
        svc.login("u-1", "a@example.edu", None, None).await.unwrap();
        assert!(svc.set_admin("u-1", true).await.unwrap().is_admin);
        assert!(!svc.revoke_user("u-1").await.unwrap().is_authorized);
        svc.delete_user("u-1").await.unwrap();
        assert!(svc.find_user("u-1").await.unwrap().is_none());
        assert!(matches!(
            svc.authorize_user("u-1").await,
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn bootstrap_creates_authorized_admin() {
        let svc = test_service().await;
        let admin = svc
            .bootstrap_admin("u-admin", "admin@example.edu", None)
            .await
            .unwrap();
        assert!(admin.is_admin && admin.is_authorized);
        assert_eq!(svc.list_users().await.unwrap().len(), 1);
    }
}
