//! Leaning classes and prediction results

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ClassifierError;

/// Number of output classes of every served model
pub const NUM_CLASSES: usize = 3;

/// Political leaning class, in model output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leaning {
    Left,
    Center,
    Right,
}

impl Leaning {
    pub const ALL: [Leaning; NUM_CLASSES] = [Self::Left, Self::Center, Self::Right];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Center => 1,
            Self::Right => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Center => "Center",
            Self::Right => "Right",
        }
    }
}

impl fmt::Display for Leaning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one text
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub leaning: Leaning,
    /// Probability of `leaning`
    pub confidence: f32,
    /// Probabilities in `[Left, Center, Right]` order
    pub probabilities: [f32; NUM_CLASSES],
}

impl Prediction {
    /// Build from a softmax output row. Ties resolve to the lower class index.
    pub fn from_probabilities(row: &[f32]) -> Result<Self, ClassifierError> {
        let probabilities: [f32; NUM_CLASSES] = row.try_into().map_err(|_| {
            ClassifierError::prediction(format!(
                "expected {} class probabilities, got {}",
                NUM_CLASSES,
                row.len()
            ))
        })?;

        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(ClassifierError::prediction("non-finite class probability"));
        }

        let (index, confidence) = probabilities
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::MIN), |best, (i, p)| if p > best.1 { (i, p) } else { best });

        let leaning = Leaning::from_index(index)
            .ok_or_else(|| ClassifierError::prediction(format!("class index {} out of range", index)))?;

        Ok(Self {
            leaning,
            confidence,
            probabilities,
        })
    }
}
