// GestureWatch - Nearest-Prototype Classifier
//
// Each gesture class is represented by one centroid in feature space. A window
// is assigned the label of the closest centroid by squared Euclidean distance.
//
// The table is built and validated once at startup. Entries are kept in
// lexicographic label order, which is also the tie-break order: on an exact
// distance tie the earlier label wins.

use crate::config::FEATURE_COUNT;
use crate::error::ClassifierError;
use crate::features::FeatureVector;

#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub label: String,
    pub features: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrototypeTable {
    entries: Vec<Prototype>,
}

/// Result of a single classification pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult<'t> {
    pub label: &'t str,
    /// Squared distance to the winning prototype.
    pub distance: f32,
}

impl PrototypeTable {
    /// Collect entries and sort them by label. Vector lengths are not checked
    /// here; call [`validate`](Self::validate) before the table is used.
    pub fn from_entries<'a, L, I>(entries: I) -> Result<Self, ClassifierError>
    where
        L: Into<String>,
        I: IntoIterator<Item = (L, &'a [f32])>,
    {
        let mut entries: Vec<Prototype> = entries
            .into_iter()
            .map(|(label, features)| Prototype {
                label: label.into(),
                features: features.to_vec(),
            })
            .collect();
        entries.sort_by(|a, b| a.label.cmp(&b.label));

        if let Some(dup) = entries.windows(2).find(|w| w[0].label == w[1].label) {
            return Err(ClassifierError::DuplicateLabel(dup[0].label.clone()));
        }
        Ok(Self { entries })
    }

    /// Build the startup table from generated model parameters: every label in
    /// `labels` must have a centroid. The result is validated.
    pub fn load(labels: &[&str], centroids: &[(&str, &[f32])]) -> Result<Self, ClassifierError> {
        for (label, _) in centroids {
            if !labels.contains(label) {
                log::warn!("Centroid '{}' is not in the label list - ignored", label);
            }
        }

        let selected = labels
            .iter()
            .map(|&label| {
                centroids
                    .iter()
                    .find(|(name, _)| *name == label)
                    .map(|&(name, features)| (name, features))
                    .ok_or_else(|| ClassifierError::MissingPrototype(label.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let table = Self::from_entries(selected)?;
        table.validate()?;
        log::info!("Loaded {} prototypes: {:?}", table.len(), table.labels());
        Ok(table)
    }

    /// Startup check: non-empty, and every vector matches the feature contract.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.entries.is_empty() {
            return Err(ClassifierError::EmptyPrototypeTable);
        }
        for p in &self.entries {
            check_dimension(p)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prototype> {
        self.entries.iter()
    }
}

fn check_dimension(p: &Prototype) -> Result<(), ClassifierError> {
    if p.features.len() != FEATURE_COUNT {
        return Err(ClassifierError::FeatureDimensionMismatch {
            label: p.label.clone(),
            expected: FEATURE_COUNT,
            actual: p.features.len(),
        });
    }
    Ok(())
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Assign `features` to its nearest prototype.
pub fn classify<'t>(
    features: &FeatureVector,
    table: &'t PrototypeTable,
) -> Result<ClassificationResult<'t>, ClassifierError> {
    let mut best: Option<ClassificationResult<'t>> = None;

    for p in table.iter() {
        check_dimension(p)?;
        let distance = squared_distance(features.as_slice(), &p.features);
        // Strict comparison: the first label reached keeps a tie.
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(ClassificationResult {
                label: &p.label,
                distance,
            });
        }
    }

    best.ok_or(ClassifierError::EmptyPrototypeTable)
}

/// Every prototype with its distance, nearest first. Ties keep table order,
/// so the head always agrees with [`classify`].
pub fn rank<'t>(
    features: &FeatureVector,
    table: &'t PrototypeTable,
) -> Result<Vec<ClassificationResult<'t>>, ClassifierError> {
    let mut ranked = table
        .iter()
        .map(|p| {
            check_dimension(p)?;
            Ok(ClassificationResult {
                label: p.label.as_str(),
                distance: squared_distance(features.as_slice(), &p.features),
            })
        })
        .collect::<Result<Vec<_>, ClassifierError>>()?;
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    Ok(ranked)
}
