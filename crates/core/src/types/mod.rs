//! Core types for Harvestly.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod display_id;
pub mod farm;
pub mod id;
pub mod loyalty;
pub mod notification;
pub mod product;
pub mod wallet;
pub mod wishlist;

pub use farm::{AnalyticsPeriod, Farm, FarmAnalytics};
pub use id::*;
pub use loyalty::{Badge, Challenge, ChallengeProgress, LoyaltyStatus};
pub use notification::{DevicePlatform, Notification, NotificationKind, UnreadCount};
pub use product::{Product, ProductCategory, ProductCounters};
pub use wallet::{TransactionKind, Wallet, WalletTransaction};
pub use wishlist::WishlistItem;
