// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod engagement;
pub mod user;

pub use engagement::{AnswerRow, PostRow, TargetKind};
pub use user::{Role, User};
