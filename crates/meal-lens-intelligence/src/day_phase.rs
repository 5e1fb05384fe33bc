// ABOUTME: Clock-hour buckets used to refresh meal suggestions as the day progresses
// ABOUTME: Maps local hours to day phases and day phases to the next meal type to suggest
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, TimeZone, Timelike};
use meal_lens_core::models::MealType;
use serde::{Deserialize, Serialize};

/// Part of the day, by local clock hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayPhase {
    /// 04:00 to 10:59
    Morning,
    /// 11:00 to 13:59
    Lunch,
    /// 14:00 to 16:59
    Afternoon,
    /// 17:00 to 20:59
    Evening,
    /// 21:00 to 03:59
    Late,
    /// Hour outside 0..=23
    Unknown,
}

impl DayPhase {
    /// Bucket a clock hour
    #[must_use]
    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            4..=10 => Self::Morning,
            11..=13 => Self::Lunch,
            14..=16 => Self::Afternoon,
            17..=20 => Self::Evening,
            0..=3 | 21..=23 => Self::Late,
            _ => Self::Unknown,
        }
    }

    /// Phase of a timestamp in its own offset
    #[must_use]
    pub fn of<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        Self::from_hour(time.hour())
    }

    /// Meal the suggestion should target during this phase
    #[must_use]
    pub const fn suggested_meal_type(&self) -> MealType {
        match self {
            Self::Morning => MealType::Breakfast,
            Self::Lunch => MealType::Lunch,
            Self::Afternoon | Self::Evening | Self::Late | Self::Unknown => MealType::Dinner,
        }
    }

    /// Upper-case name for logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "MORNING",
            Self::Lunch => "LUNCH",
            Self::Afternoon => "AFTERNOON",
            Self::Evening => "EVENING",
            Self::Late => "LATE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl Display for DayPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
