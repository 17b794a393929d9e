//! Ranking & Scoring System
//!
//! Combines per-field distances into one document distance with configurable
//! field weights, and turns that distance into the higher-is-better score
//! callers see.

use serde::{Deserialize, Serialize};

use super::document::Field;
use crate::error::{Result, SearchError};

/// Scoring weight for each recognised field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub name: f64,
    pub content: f64,
    pub path: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 0.5,
            content: 0.5,
            path: 0.0,
        }
    }
}

impl FieldWeights {
    /// Weight only the given field
    pub fn only(field: Field) -> Self {
        Self {
            name: 0.0,
            content: 0.0,
            path: 0.0,
        }
        .with(field, 1.0)
    }

    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Name => self.name,
            Field::Content => self.content,
            Field::Path => self.path,
        }
    }

    pub fn with(mut self, field: Field, weight: f64) -> Self {
        match field {
            Field::Name => self.name = weight,
            Field::Content => self.content = weight,
            Field::Path => self.path = weight,
        }
        self
    }

    /// Reject negative or non-finite weights and an all-zero set
    pub fn validate(&self) -> Result<()> {
        for field in Field::ALL {
            let weight = self.get(field);
            if !weight.is_finite() || weight < 0.0 {
                return Err(SearchError::InvalidWeight { field, weight });
            }
        }

        if self.total() <= 0.0 {
            return Err(SearchError::NoWeightedField);
        }

        Ok(())
    }

    /// Fields that take part in scoring, in declaration order
    pub fn weighted_fields(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        Field::ALL
            .into_iter()
            .map(|field| (field, self.get(field)))
            .filter(|(_, weight)| *weight > 0.0)
    }

    pub fn total(&self) -> f64 {
        Field::ALL.into_iter().map(|field| self.get(field)).sum()
    }
}

/// Distance of the query to one field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldScore {
    pub field: Field,
    /// Normalized edit distance, 0.0 is an exact contained match
    pub distance: f64,
    /// Whether the field counts as a match under the threshold
    pub matched: bool,
}

/// Complete match score with all components
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchScore {
    /// Weighted document distance in [0, 1], lower is better
    pub distance: f64,
    /// Per-field breakdown
    pub fields: Vec<FieldScore>,
}

impl MatchScore {
    /// Combine field distances into a document score.
    ///
    /// A field matches when its distance is below 1.0 and within the
    /// threshold; non-matching fields count as fully dissimilar. Returns None
    /// when no field matches or the weighted distance exceeds the threshold.
    pub fn combine(
        field_distances: &[(Field, f64)],
        weights: &FieldWeights,
        threshold: f64,
    ) -> Option<Self> {
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        let mut fields = Vec::with_capacity(field_distances.len());

        for &(field, distance) in field_distances {
            let weight = weights.get(field);
            if weight <= 0.0 {
                continue;
            }

            let matched = distance < 1.0 && distance <= threshold;
            let effective = if matched { distance } else { 1.0 };

            weighted_sum += weight * effective;
            weight_total += weight;
            fields.push(FieldScore {
                field,
                distance,
                matched,
            });
        }

        if weight_total <= 0.0 || !fields.iter().any(|f| f.matched) {
            return None;
        }

        let distance = weighted_sum / weight_total;
        if distance > threshold {
            return None;
        }

        Some(Self { distance, fields })
    }

    /// User-facing score, higher is better
    pub fn display_score(&self) -> f64 {
        (1.0 - self.distance).clamp(0.0, 1.0)
    }
}
