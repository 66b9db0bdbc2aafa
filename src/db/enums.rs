use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{AsExpression, FromSqlRow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Role of a team member. Labels are part of the API contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum MemberRole {
    Owner,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Owner => "Owner",
            MemberRole::Member => "Member",
        }
    }
}

impl FromStr for MemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Owner" => Ok(MemberRole::Owner),
            "Member" => Ok(MemberRole::Member),
            other => Err(format!("Invalid role '{}'. Must be Owner or Member", other)),
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Retro board column. Equality on these labels is part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum CardColumn {
    #[serde(rename = "Went Well")]
    WentWell,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    #[serde(rename = "Kudos")]
    Kudos,
}

impl CardColumn {
    pub const ALL: [CardColumn; 3] = [
        CardColumn::WentWell,
        CardColumn::NeedsImprovement,
        CardColumn::Kudos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardColumn::WentWell => "Went Well",
            CardColumn::NeedsImprovement => "Needs Improvement",
            CardColumn::Kudos => "Kudos",
        }
    }
}

impl FromStr for CardColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Went Well" => Ok(CardColumn::WentWell),
            "Needs Improvement" => Ok(CardColumn::NeedsImprovement),
            "Kudos" => Ok(CardColumn::Kudos),
            _ => Err(
                "Invalid column. Must be one of: Went Well, Needs Improvement, Kudos".to_string(),
            ),
        }
    }
}

impl fmt::Display for CardColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum ActionItemStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl ActionItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionItemStatus::Open => "Open",
            ActionItemStatus::InProgress => "In Progress",
            ActionItemStatus::Done => "Done",
        }
    }
}

impl FromStr for ActionItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(ActionItemStatus::Open),
            "In Progress" => Ok(ActionItemStatus::InProgress),
            "Done" => Ok(ActionItemStatus::Done),
            _ => Err("Invalid status. Must be one of: Open, In Progress, Done".to_string()),
        }
    }
}

impl fmt::Display for ActionItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// All three enums are stored as their contract label in a TEXT column.
macro_rules! text_enum_sql {
    ($ty:ty) => {
        impl FromSql<Text, Pg> for $ty {
            fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
                let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
                s.parse::<$ty>().map_err(|e| e.into())
            }
        }

        impl ToSql<Text, Pg> for $ty {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
                out.write_all(self.as_str().as_bytes())?;
                Ok(IsNull::No)
            }
        }
    };
}

text_enum_sql!(MemberRole);
text_enum_sql!(CardColumn);
text_enum_sql!(ActionItemStatus);
