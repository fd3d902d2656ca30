use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{CreateNotification, Notification};
use crate::error::{AppError, AppResult};

/// Recipient scope for the bulk read-tracking queries. The three cases carry
/// different match semantics, kept as an explicit rule set:
/// - `Exact`: that scope OR fully-global records
/// - `TypeOnly`: any record of that type OR records with no type
/// - `All`: every notification (admin view)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadScope {
    Exact {
        recipient_type: String,
        recipient_id: String,
    },
    TypeOnly {
        recipient_type: String,
    },
    All,
}

impl ReadScope {
    pub fn from_parts(recipient_type: Option<String>, recipient_id: Option<String>) -> Self {
        match (recipient_type, recipient_id) {
            (Some(t), Some(i)) => ReadScope::Exact {
                recipient_type: t,
                recipient_id: i,
            },
            (Some(t), None) => ReadScope::TypeOnly { recipient_type: t },
            _ => ReadScope::All,
        }
    }
}

pub struct NotificationRepository;

impl NotificationRepository {
    pub async fn create(pool: &SqlitePool, input: CreateNotification) -> AppResult<Notification> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (
                id, notification_type, title, message, data,
                recipient_type, recipient_id, read, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.notification_type)
        .bind(input.title)
        .bind(input.message)
        .bind(Json(input.data))
        .bind(input.recipient_type)
        .bind(input.recipient_id)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Page of notifications visible to the given scope, newest first, plus
    /// the total count for pagination. `None` scope is the admin view: no
    /// filter at all, scoped records included.
    pub async fn list(
        pool: &SqlitePool,
        page: i64,
        limit: i64,
        scope: Option<(&str, &str)>,
    ) -> AppResult<(Vec<Notification>, i64)> {
        let offset = (page - 1) * limit;

        let (items, total) = match scope {
            Some((recipient_type, recipient_id)) => {
                let items = sqlx::query_as::<_, Notification>(
                    r#"
                    SELECT * FROM notifications
                    WHERE (recipient_type = ? AND recipient_id = ?)
                       OR (recipient_type IS NULL AND recipient_id IS NULL)
                    ORDER BY created_at DESC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(recipient_type)
                .bind(recipient_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?;

                let total = sqlx::query_scalar::<_, i64>(
                    r#"
                    SELECT COUNT(*) FROM notifications
                    WHERE (recipient_type = ? AND recipient_id = ?)
                       OR (recipient_type IS NULL AND recipient_id IS NULL)
                    "#,
                )
                .bind(recipient_type)
                .bind(recipient_id)
                .fetch_one(pool)
                .await?;

                (items, total)
            }
            None => {
                let items = sqlx::query_as::<_, Notification>(
                    "SELECT * FROM notifications ORDER BY created_at DESC LIMIT ? OFFSET ?",
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?;

                let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications")
                    .fetch_one(pool)
                    .await?;

                (items, total)
            }
        };

        Ok((items, total))
    }

    /// Set `read = true` on one record. Returns the updated row, or `None`
    /// if the id does not exist.
    pub async fn mark_as_read(pool: &SqlitePool, id: &str) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET read = 1 WHERE id = ? RETURNING *",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Bulk mark-read for a scope. Returns the number of rows updated.
    pub async fn mark_all_as_read(pool: &SqlitePool, scope: &ReadScope) -> AppResult<u64> {
        let result = match scope {
            ReadScope::Exact {
                recipient_type,
                recipient_id,
            } => {
                sqlx::query(
                    r#"
                    UPDATE notifications SET read = 1
                    WHERE (recipient_type = ? AND recipient_id = ?)
                       OR (recipient_type IS NULL AND recipient_id IS NULL)
                    "#,
                )
                .bind(recipient_type)
                .bind(recipient_id)
                .execute(pool)
                .await?
            }
            ReadScope::TypeOnly { recipient_type } => {
                sqlx::query(
                    "UPDATE notifications SET read = 1 WHERE recipient_type = ? OR recipient_type IS NULL",
                )
                .bind(recipient_type)
                .execute(pool)
                .await?
            }
            ReadScope::All => {
                sqlx::query("UPDATE notifications SET read = 1")
                    .execute(pool)
                    .await?
            }
        };

        Ok(result.rows_affected())
    }

    /// Unread count for a scope, with the same match semantics as
    /// `mark_all_as_read`.
    pub async fn count_unread(pool: &SqlitePool, scope: &ReadScope) -> AppResult<i64> {
        let count = match scope {
            ReadScope::Exact {
                recipient_type,
                recipient_id,
            } => {
                sqlx::query_scalar::<_, i64>(
                    r#"
                    SELECT COUNT(*) FROM notifications
                    WHERE read = 0
                      AND ((recipient_type = ? AND recipient_id = ?)
                        OR (recipient_type IS NULL AND recipient_id IS NULL))
                    "#,
                )
                .bind(recipient_type)
                .bind(recipient_id)
                .fetch_one(pool)
                .await?
            }
            ReadScope::TypeOnly { recipient_type } => {
                sqlx::query_scalar::<_, i64>(
                    r#"
                    SELECT COUNT(*) FROM notifications
                    WHERE read = 0 AND (recipient_type = ? OR recipient_type IS NULL)
                    "#,
                )
                .bind(recipient_type)
                .fetch_one(pool)
                .await?
            }
            ReadScope::All => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE read = 0")
                    .fetch_one(pool)
                    .await?
            }
        };

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    fn input(scope: Option<(&str, &str)>) -> CreateNotification {
        CreateNotification {
            notification_type: "payment".to_string(),
            title: Some("Paid".to_string()),
            message: Some("Rent paid".to_string()),
            data: serde_json::json!({}),
            recipient_type: scope.map(|(t, _)| t.to_string()),
            recipient_id: scope.map(|(_, i)| i.to_string()),
        }
    }

    #[tokio::test]
    async fn global_notifications_visible_to_every_scope() {
        let pool = test_pool().await;
        let note = NotificationRepository::create(&pool, input(None)).await.unwrap();

        let (unscoped, _) = NotificationRepository::list(&pool, 1, 100, None).await.unwrap();
        assert!(unscoped.iter().any(|n| n.id == note.id));

        let (driver_view, _) = NotificationRepository::list(&pool, 1, 100, Some(("driver", "D1")))
            .await
            .unwrap();
        assert!(driver_view.iter().any(|n| n.id == note.id));

        let (investor_view, _) =
            NotificationRepository::list(&pool, 1, 100, Some(("investor", "I9")))
                .await
                .unwrap();
        assert!(investor_view.iter().any(|n| n.id == note.id));
    }

    #[tokio::test]
    async fn scoped_notifications_isolated_between_scopes() {
        let pool = test_pool().await;
        let note = NotificationRepository::create(&pool, input(Some(("driver", "D1"))))
            .await
            .unwrap();

        let (own, _) = NotificationRepository::list(&pool, 1, 100, Some(("driver", "D1")))
            .await
            .unwrap();
        assert!(own.iter().any(|n| n.id == note.id));

        let (other_driver, _) = NotificationRepository::list(&pool, 1, 100, Some(("driver", "D2")))
            .await
            .unwrap();
        assert!(!other_driver.iter().any(|n| n.id == note.id));

        let (investor, _) = NotificationRepository::list(&pool, 1, 100, Some(("investor", "D1")))
            .await
            .unwrap();
        assert!(!investor.iter().any(|n| n.id == note.id));

        // Admin view still sees everything
        let (admin, total) = NotificationRepository::list(&pool, 1, 100, None).await.unwrap();
        assert_eq!(total, 1);
        assert!(admin.iter().any(|n| n.id == note.id));
    }

    #[tokio::test]
    async fn pagination_splits_pages_and_counts_totals() {
        let pool = test_pool().await;
        for _ in 0..25 {
            NotificationRepository::create(&pool, input(None)).await.unwrap();
        }

        let (page1, total) = NotificationRepository::list(&pool, 1, 20, None).await.unwrap();
        assert_eq!(page1.len(), 20);
        assert_eq!(total, 25);
        assert_eq!((total as f64 / 20.0).ceil() as i64, 2);

        let (page2, _) = NotificationRepository::list(&pool, 2, 20, None).await.unwrap();
        assert_eq!(page2.len(), 5);
    }

    #[tokio::test]
    async fn mark_as_read_unknown_id_is_not_found() {
        let pool = test_pool().await;
        let note = NotificationRepository::create(&pool, input(None)).await.unwrap();

        let missing = NotificationRepository::mark_as_read(&pool, "nonexistent-id")
            .await
            .unwrap();
        assert!(missing.is_none());

        // The existing record was not touched
        let scope = ReadScope::All;
        assert_eq!(
            NotificationRepository::count_unread(&pool, &scope).await.unwrap(),
            1
        );

        let updated = NotificationRepository::mark_as_read(&pool, &note.id)
            .await
            .unwrap()
            .unwrap();
        assert!(updated.read);
    }

    #[tokio::test]
    async fn mark_all_as_read_clears_unread_for_scope() {
        let pool = test_pool().await;
        NotificationRepository::create(&pool, input(Some(("driver", "5")))).await.unwrap();
        NotificationRepository::create(&pool, input(None)).await.unwrap();
        NotificationRepository::create(&pool, input(Some(("investor", "7")))).await.unwrap();

        let scope = ReadScope::Exact {
            recipient_type: "driver".to_string(),
            recipient_id: "5".to_string(),
        };
        // Scoped record plus the global one
        let updated = NotificationRepository::mark_all_as_read(&pool, &scope).await.unwrap();
        assert_eq!(updated, 2);
        assert_eq!(
            NotificationRepository::count_unread(&pool, &scope).await.unwrap(),
            0
        );

        // The investor-scoped record is still unread
        let investor_scope = ReadScope::Exact {
            recipient_type: "investor".to_string(),
            recipient_id: "7".to_string(),
        };
        assert_eq!(
            NotificationRepository::count_unread(&pool, &investor_scope)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn count_unread_matches_visible_unread_records() {
        let pool = test_pool().await;
        NotificationRepository::create(&pool, input(Some(("driver", "D1")))).await.unwrap();
        NotificationRepository::create(&pool, input(Some(("driver", "D2")))).await.unwrap();
        let global = NotificationRepository::create(&pool, input(None)).await.unwrap();

        let scope = ReadScope::Exact {
            recipient_type: "driver".to_string(),
            recipient_id: "D1".to_string(),
        };
        assert_eq!(
            NotificationRepository::count_unread(&pool, &scope).await.unwrap(),
            2
        );

        NotificationRepository::mark_as_read(&pool, &global.id).await.unwrap();
        assert_eq!(
            NotificationRepository::count_unread(&pool, &scope).await.unwrap(),
            1
        );

        // Type-only scope matches the type plus records with no type
        let type_scope = ReadScope::TypeOnly {
            recipient_type: "driver".to_string(),
        };
        assert_eq!(
            NotificationRepository::count_unread(&pool, &type_scope)
                .await
                .unwrap(),
            2
        );
    }

    #[test]
    fn read_scope_from_parts_precedence() {
        assert_eq!(
            ReadScope::from_parts(Some("driver".into()), Some("5".into())),
            ReadScope::Exact {
                recipient_type: "driver".to_string(),
                recipient_id: "5".to_string()
            }
        );
        assert_eq!(
            ReadScope::from_parts(Some("driver".into()), None),
            ReadScope::TypeOnly {
                recipient_type: "driver".to_string()
            }
        );
        assert_eq!(ReadScope::from_parts(None, Some("5".into())), ReadScope::All);
        assert_eq!(ReadScope::from_parts(None, None), ReadScope::All);
    }
}
