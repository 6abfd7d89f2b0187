//! Per-resource services and their models.
//!
//! Each service borrows a `TelnyxClient` and exposes, per operation, a pure
//! `build_*` step plus an executing method. Models shared by several
//! resources live in `shared`.

pub mod calls;
pub mod messages;
pub mod number_orders;
pub mod phone_numbers;
pub mod shared;
pub mod webhooks;
