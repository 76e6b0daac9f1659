//! User domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account category.
///
/// Wire/storage values: `IS_EMPLOYEE_USER`, `IS_CUSTOMER_USER`, `unknown`.
/// `Unknown` is the column default but is not one of the selectable choices;
/// see [`UserType::is_choice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "IS_EMPLOYEE_USER")]
    Employee,
    #[serde(rename = "IS_CUSTOMER_USER")]
    Customer,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

/// The selectable choices, with their display labels.
pub const USER_TYPE_CHOICES: [(UserType, &str); 2] = [
    (UserType::Employee, "Сотрудник"),
    (UserType::Customer, "Представитель клиента"),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown user type: {0}")]
pub struct ParseUserTypeError(pub String);

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "IS_EMPLOYEE_USER",
            Self::Customer => "IS_CUSTOMER_USER",
            Self::Unknown => "unknown",
        }
    }

    /// `false` for the `Unknown` default, which is outside the choice set.
    pub fn is_choice(self) -> bool {
        USER_TYPE_CHOICES.iter().any(|(choice, _)| *choice == self)
    }

    pub fn label(self) -> Option<&'static str> {
        USER_TYPE_CHOICES
            .iter()
            .find(|(choice, _)| *choice == self)
            .map(|(_, label)| *label)
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = ParseUserTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IS_EMPLOYEE_USER" => Ok(Self::Employee),
            "IS_CUSTOMER_USER" => Ok(Self::Customer),
            "unknown" => Ok(Self::Unknown),
            other => Err(ParseUserTypeError(other.to_owned())),
        }
    }
}
