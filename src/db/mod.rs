// SPDX-License-Identifier: MIT

//! Database layer (PostgreSQL via sqlx).

pub mod postgres;

pub use postgres::Database;
