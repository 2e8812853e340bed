//! Notification HTTP handlers.
//!
//! ```text
//! GET    /api/v1/notifications
//! GET    /api/v1/notifications/unread-count
//! POST   /api/v1/notifications/{notification_id}/read
//! DELETE /api/v1/notifications/{notification_id}
//! ```

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DomainError, Notification, NotificationId};
use crate::inbound::http::auth::TelegramAuth;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{parse_uuid, ApiResult};

/// Default page size, matching the original client.
const DEFAULT_LIMIT: i64 = 50;

/// A stored notification.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    /// `success`, `warning`, `info`, or `error`.
    pub kind: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            kind: notification.kind.as_str().to_owned(),
            title: notification.title,
            message: notification.message,
            is_read: notification.is_read,
            action_url: notification.action_url,
            created_at: notification.created_at.to_rfc3339(),
        }
    }
}

/// Unread counter payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread: u64,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct NotificationPath {
    notification_id: String,
}

fn parse_notification_id(path: NotificationPath) -> Result<NotificationId, DomainError> {
    parse_uuid(&path.notification_id, "notificationId").map(NotificationId::from_uuid)
}

/// The caller's notifications, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "Notifications", body = [NotificationResponse])
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<NotificationResponse>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 200);
    let notifications = state.notifications.list(auth.user(), limit).await?;
    Ok(web::Json(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}

/// Count of unread notifications.
#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread-count",
    responses(
        (status = 200, description = "Unread count", body = UnreadCountResponse)
    ),
    tags = ["notifications"],
    operation_id = "unreadCount"
)]
#[get("/notifications/unread-count")]
pub async fn unread_count(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<UnreadCountResponse>> {
    let unread = state.notifications.unread_count(auth.user()).await?;
    Ok(web::Json(UnreadCountResponse { unread }))
}

/// Mark one notification read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{notification_id}/read",
    responses(
        (status = 204, description = "Marked read"),
        (status = 404, description = "Unknown notification", body = DomainError)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[post("/notifications/{notification_id}/read")]
pub async fn mark_read(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
    path: web::Path<NotificationPath>,
) -> ApiResult<HttpResponse> {
    let id = parse_notification_id(path.into_inner())?;
    state.notifications.mark_read(auth.user(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Soft-delete one notification.
#[utoipa::path(
    delete,
    path = "/api/v1/notifications/{notification_id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown notification", body = DomainError)
    ),
    tags = ["notifications"],
    operation_id = "deleteNotification"
)]
#[delete("/notifications/{notification_id}")]
pub async fn delete_notification(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
    path: web::Path<NotificationPath>,
) -> ApiResult<HttpResponse> {
    let id = parse_notification_id(path.into_inner())?;
    state.notifications.soft_delete(auth.user(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
