// SPDX-License-Identifier: MIT

//! User model shared by the mentor and mentee tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two user kinds. Stored in disjoint tables with the same core shape;
/// every query selects its table by matching on this enum rather than by
/// splicing a string into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Mentor,
    Mentee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Mentor => "mentor",
            Role::Mentee => "mentee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mentor" => Ok(Role::Mentor),
            "mentee" => Ok(Role::Mentee),
            _ => Err(()),
        }
    }
}

/// A user row from either role table.
///
/// The two tables share the identity and common profile columns; the
/// role-specific columns only exist on their own table and default to `None`
/// when the row comes from the other one.
///
/// The password column holds an Argon2 PHC string. For OAuth-provisioned
/// users it is `hash(provider subject id)` — an identity-binding artifact,
/// not a credential anyone types.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub category: Option<String>,
    pub profile_image: Option<String>,

    // Mentor-only columns
    #[sqlx(default)]
    pub skill: Option<String>,
    #[sqlx(default)]
    pub experience: Option<String>,

    // Mentee-only columns
    #[sqlx(default)]
    pub occupation: Option<String>,
    #[sqlx(default)]
    pub institution: Option<String>,
    #[sqlx(default)]
    pub age: Option<i32>,
    #[sqlx(default)]
    pub phone: Option<String>,
    #[sqlx(default)]
    pub student_level: Option<String>,
}

impl User {
    /// Profile-completeness invariant: incomplete users may authenticate but
    /// only receive a short-lived restricted access token (HTTP 206).
    pub fn is_profile_complete(&self, role: Role) -> bool {
        if self.first_name.is_none() || self.category.is_none() {
            return false;
        }
        match role {
            Role::Mentor => self.skill.is_some(),
            Role::Mentee => self.occupation.is_some(),
        }
    }
}
