//! Notification operations.
//!
//! Fan-out happens at the gateway; this layer reads a user's notification
//! rows, flips read flags, and registers push devices. Mark-read writes are
//! idempotent against the gateway: marking an already-read notification is
//! an update matching zero or more rows and succeeds either way, so
//! concurrent mark-read calls need no coordination here.

use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use harvestly_core::{DevicePlatform, Notification, NotificationId, UnreadCount};

use crate::error::{AppError, Result};
use crate::gateway::{TableQuery, TableWrite};

use super::validate::{require_limit, require_max_len, require_non_empty};
use super::{Ack, AuthTier, OpContext, OperationDef, ValidateInput, decode_rows, decode_value};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;
const MAX_TOKEN_LEN: usize = 512;

pub(super) fn operations() -> Vec<OperationDef> {
    vec![
        OperationDef::query("notifications.list", AuthTier::Protected, list),
        OperationDef::query(
            "notifications.getUnreadCount",
            AuthTier::Protected,
            get_unread_count,
        ),
        OperationDef::mutation("notifications.markRead", AuthTier::Protected, mark_read),
        OperationDef::mutation(
            "notifications.markAllRead",
            AuthTier::Protected,
            mark_all_read,
        ),
        OperationDef::mutation(
            "notifications.registerDevice",
            AuthTier::Protected,
            register_device,
        ),
    ]
}

// =============================================================================
// notifications.list
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListNotificationsInput {
    pub unread_only: bool,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ValidateInput for ListNotificationsInput {
    fn validate(&self) -> Result<()> {
        require_limit("limit", self.limit, MAX_PAGE_SIZE)
    }
}

#[instrument(skip(ctx))]
async fn list(ctx: OpContext, input: ListNotificationsInput) -> Result<Vec<Notification>> {
    let user_id = ctx.user_id()?;

    let mut query = TableQuery::new()
        .eq("user_id", user_id)
        .order("created_at.desc")
        .limit(input.limit.unwrap_or(DEFAULT_PAGE_SIZE))
        .offset(input.offset.unwrap_or(0));
    if input.unread_only {
        query = query.eq("read", "false");
    }

    let rows = ctx
        .gateway
        .query_table("notifications", query)
        .await
        .map_err(|e| AppError::gateway("failed to load notifications", e))?;

    decode_rows(rows, "notifications")
}

// =============================================================================
// notifications.getUnreadCount (soft read)
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct GetUnreadCountInput {}

impl ValidateInput for GetUnreadCountInput {}

/// Badge count for the tab bar. Defaults to zero on failure - a missing
/// badge is preferable to a broken screen.
#[instrument(skip(ctx, _input))]
async fn get_unread_count(ctx: OpContext, _input: GetUnreadCountInput) -> Result<UnreadCount> {
    let user_id = ctx.user_id()?;

    let result = ctx
        .gateway
        .call_procedure("get_unread_count", json!({ "user_id": user_id }))
        .await;

    match result {
        Ok(value) => match decode_value::<UnreadCount>(value, "get_unread_count") {
            Ok(count) => Ok(count),
            Err(e) => {
                tracing::warn!(error = %e, "Unread count unreadable; returning zero");
                Ok(UnreadCount::default())
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "Unread count read failed; returning zero");
            Ok(UnreadCount::default())
        }
    }
}

// =============================================================================
// notifications.markRead
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadInput {
    pub notification_id: NotificationId,
}

impl ValidateInput for MarkReadInput {}

#[instrument(skip(ctx), fields(notification_id = %input.notification_id))]
async fn mark_read(ctx: OpContext, input: MarkReadInput) -> Result<Ack> {
    let user_id = ctx.user_id()?;

    ctx.gateway
        .write_table(
            "notifications",
            TableWrite::Update {
                payload: json!({ "read": true }),
                filters: vec![
                    ("id".to_string(), format!("eq.{}", input.notification_id)),
                    ("user_id".to_string(), format!("eq.{user_id}")),
                ],
            },
        )
        .await
        .map_err(|e| AppError::gateway("failed to mark notification read", e))?;

    Ok(Ack::OK)
}

// =============================================================================
// notifications.markAllRead
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct MarkAllReadInput {}

impl ValidateInput for MarkAllReadInput {}

#[instrument(skip(ctx, _input))]
async fn mark_all_read(ctx: OpContext, _input: MarkAllReadInput) -> Result<Ack> {
    let user_id = ctx.user_id()?;

    ctx.gateway
        .write_table(
            "notifications",
            TableWrite::Update {
                payload: json!({ "read": true }),
                filters: vec![
                    ("user_id".to_string(), format!("eq.{user_id}")),
                    ("read".to_string(), "eq.false".to_string()),
                ],
            },
        )
        .await
        .map_err(|e| AppError::gateway("failed to mark notifications read", e))?;

    Ok(Ack::OK)
}

// =============================================================================
// notifications.registerDevice
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceInput {
    pub token: String,
    pub platform: DevicePlatform,
}

impl ValidateInput for RegisterDeviceInput {
    fn validate(&self) -> Result<()> {
        require_non_empty("token", &self.token)?;
        require_max_len("token", &self.token, MAX_TOKEN_LEN)
    }
}

/// Register a push token. Upserts on the token so re-registration after an
/// app reinstall moves the token to the current user.
#[instrument(skip(ctx, input), fields(platform = ?input.platform))]
async fn register_device(ctx: OpContext, input: RegisterDeviceInput) -> Result<Ack> {
    let user_id = ctx.user_id()?;

    ctx.gateway
        .write_table(
            "device_tokens",
            TableWrite::Upsert {
                payload: json!({
                    "user_id": user_id,
                    "token": input.token,
                    "platform": input.platform,
                }),
                on_conflict: "token".to_string(),
            },
        )
        .await
        .map_err(|e| AppError::gateway("failed to register device", e))?;

    Ok(Ack::OK)
}
