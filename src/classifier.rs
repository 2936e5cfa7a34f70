// BMI Classifier - weight/height to (bmi, category)
//
// bmi = weight_kg / height_m^2, rounded to 2 decimals (half away from zero).
// The category is decided on the unrounded value; only the reported bmi is rounded.

use crate::error::{BmiError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CATEGORY
// ============================================================================

pub const UNDERWEIGHT_BELOW: f64 = 18.5;
pub const OVERWEIGHT_FROM: f64 = 25.0;
pub const OBESE_FROM: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Underweight,
        Category::Normal,
        Category::Overweight,
        Category::Obese,
    ];

    /// Thresholds evaluated in order, first match wins
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < UNDERWEIGHT_BELOW {
            Category::Underweight
        } else if bmi < OVERWEIGHT_FROM {
            Category::Normal
        } else if bmi < OBESE_FROM {
            Category::Overweight
        } else {
            Category::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Underweight => "Underweight",
            Category::Normal => "Normal",
            Category::Overweight => "Overweight",
            Category::Obese => "Obese",
        }
    }

    /// Colour name the result label uses for this category
    pub fn color_hint(&self) -> &'static str {
        match self {
            Category::Underweight => "blue",
            Category::Normal => "green",
            Category::Overweight => "orange",
            Category::Obese => "red",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown BMI category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub bmi: f64,
    pub category: Category,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BMI: {:.2} ({})", self.bmi, self.category)
    }
}

/// Round to 2 decimal places, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn classify(weight_kg: f64, height_m: f64) -> Result<Classification> {
    check_positive("weight", weight_kg)?;
    check_positive("height", height_m)?;

    let raw = weight_kg / (height_m * height_m);
    if !raw.is_finite() {
        return Err(BmiError::measurement("height", "too small to compute a BMI"));
    }

    Ok(Classification {
        bmi: round2(raw),
        category: Category::from_bmi(raw),
    })
}

pub(crate) fn check_positive(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(BmiError::measurement(field, "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(BmiError::measurement(field, format!("must be positive, got {}", value)));
    }
    Ok(())
}
