use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Academic stage shared by students (level of study) and courses.
///
/// Variants are declared in ascending order, so the derived `Ord` follows the
/// curriculum: preparatory years, bachelor, advanced, master, doctorate.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(3))")]
pub enum Level {
    #[sea_orm(string_value = "P1")]
    P1,
    #[sea_orm(string_value = "P2")]
    P2,
    #[sea_orm(string_value = "P3")]
    P3,
    #[sea_orm(string_value = "B1")]
    B1,
    #[sea_orm(string_value = "B2")]
    B2,
    #[sea_orm(string_value = "B3")]
    B3,
    #[sea_orm(string_value = "A1")]
    A1,
    #[sea_orm(string_value = "A2")]
    A2,
    #[sea_orm(string_value = "A3")]
    A3,
    #[sea_orm(string_value = "MS")]
    MS,
    #[sea_orm(string_value = "PhD")]
    PhD,
}

impl Level {
    /// Every level, in curriculum order.
    pub const ALL: [Level; 11] = [
        Level::P1,
        Level::P2,
        Level::P3,
        Level::B1,
        Level::B2,
        Level::B3,
        Level::A1,
        Level::A2,
        Level::A3,
        Level::MS,
        Level::PhD,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::P1 => "P1",
            Level::P2 => "P2",
            Level::P3 => "P3",
            Level::B1 => "B1",
            Level::B2 => "B2",
            Level::B3 => "B3",
            Level::A1 => "A1",
            Level::A2 => "A2",
            Level::A3 => "A3",
            Level::MS => "MS",
            Level::PhD => "PhD",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown level '{}'", s))
    }
}
