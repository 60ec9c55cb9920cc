//! Fitted classifiers exported as JSON: linear models and tree ensembles.

use serde::{Deserialize, Serialize};

use crate::ports::{Classifier, ModelError};

/// Exported classifier, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Linear(LinearModel),
    Forest(ForestModel),
}

/// Multinomial linear model: `argmax(W·x + b)`.
///
/// A single coefficient row is a binary model (`w·x + b > 0` → class 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

/// Ensemble of decision trees voting with normalized leaf distributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    pub n_features: usize,
    pub n_classes: usize,
    pub trees: Vec<DecisionTree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

/// Flat tree node. Leaves have no children; `x[feature] <= threshold` goes left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub feature: Option<usize>,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub left: Option<usize>,
    #[serde(default)]
    pub right: Option<usize>,
    #[serde(default)]
    pub value: Vec<f64>,
}

impl TreeNode {
    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, s) in scores.iter().enumerate().skip(1) {
        if *s > scores[best] {
            best = i;
        }
    }
    best
}

impl LinearModel {
    fn validate(&self) -> Result<(), String> {
        let width = self
            .coefficients
            .first()
            .map(Vec::len)
            .ok_or("coefficients is empty")?;
        if width == 0 {
            return Err("coefficient rows are empty".into());
        }
        if self.coefficients.iter().any(|row| row.len() != width) {
            return Err("coefficient rows have different lengths".into());
        }
        if self.intercepts.len() != self.coefficients.len() {
            return Err(format!(
                "{} intercepts for {} coefficient rows",
                self.intercepts.len(),
                self.coefficients.len()
            ));
        }
        let finite = self
            .coefficients
            .iter()
            .flatten()
            .chain(self.intercepts.iter())
            .all(|v| v.is_finite());
        if !finite {
            return Err("non-finite coefficient".into());
        }
        Ok(())
    }

    fn scores(&self, x: &[f64]) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| row.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + b)
            .collect()
    }

    fn predict(&self, x: &[f64]) -> usize {
        let scores = self.scores(x);
        if scores.len() == 1 {
            usize::from(scores[0] > 0.0)
        } else {
            argmax(&scores)
        }
    }
}

impl ForestModel {
    fn validate(&self) -> Result<(), String> {
        if self.n_features == 0 || self.n_classes < 2 {
            return Err("forest needs at least one feature and two classes".into());
        }
        if self.trees.is_empty() {
            return Err("forest has no trees".into());
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(format!("tree {t} has no nodes"));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                if node.is_leaf() {
                    if node.value.len() != self.n_classes {
                        return Err(format!(
                            "tree {t} leaf {i} has {} class weights, expected {}",
                            node.value.len(),
                            self.n_classes
                        ));
                    }
                    continue;
                }
                let (Some(feature), Some(left), Some(right)) = (node.feature, node.left, node.right)
                else {
                    return Err(format!("tree {t} node {i} is missing a split field"));
                };
                if feature >= self.n_features {
                    return Err(format!("tree {t} node {i} splits on unknown feature {feature}"));
                }
                // Children must come later in the array; this also rules out cycles.
                if left <= i || right <= i || left >= tree.nodes.len() || right >= tree.nodes.len() {
                    return Err(format!("tree {t} node {i} has invalid children"));
                }
            }
        }
        Ok(())
    }

    fn predict(&self, x: &[f64]) -> Result<usize, ModelError> {
        let mut votes = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let leaf = tree.leaf(x)?;
            let total: f64 = leaf.value.iter().sum();
            if total > 0.0 {
                for (v, w) in votes.iter_mut().zip(&leaf.value) {
                    *v += w / total;
                }
            }
        }
        Ok(argmax(&votes))
    }
}

impl DecisionTree {
    /// Walk from the root to a leaf.
    ///
    /// Children must sit after their parent, so the walk always ends.
    fn leaf(&self, x: &[f64]) -> Result<&TreeNode, ModelError> {
        let broken = |i: usize| ModelError::Malformed(format!("tree node {i} cannot be followed"));

        let mut index = 0;
        let mut node = self.nodes.first().ok_or_else(|| broken(0))?;
        while let (Some(feature), Some(left), Some(right)) = (node.feature, node.left, node.right) {
            let value = x.get(feature).ok_or_else(|| broken(index))?;
            let next = if *value <= node.threshold { left } else { right };
            if next <= index {
                return Err(broken(index));
            }
            node = self.nodes.get(next).ok_or_else(|| broken(index))?;
            index = next;
        }
        Ok(node)
    }
}

impl ClassifierArtifact {
    /// Structural checks run once at load time.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Linear(m) => m.validate(),
            Self::Forest(m) => m.validate(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linear(_) => "linear",
            Self::Forest(_) => "forest",
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn n_features(&self) -> usize {
        match self {
            Self::Linear(m) => m.coefficients.first().map_or(0, Vec::len),
            Self::Forest(m) => m.n_features,
        }
    }

    fn n_classes(&self) -> usize {
        match self {
            Self::Linear(m) if m.coefficients.len() == 1 => 2,
            Self::Linear(m) => m.coefficients.len(),
            Self::Forest(m) => m.n_classes,
        }
    }

    fn predict(&self, scaled: &[f64]) -> Result<usize, ModelError> {
        let expected = self.n_features();
        if scaled.len() != expected {
            return Err(ModelError::ShapeMismatch {
                expected,
                got: scaled.len(),
            });
        }
        if let Some(i) = scaled.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite(i));
        }

        match self {
            Self::Linear(m) => Ok(m.predict(scaled)),
            Self::Forest(m) => m.predict(scaled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(value: Vec<f64>) -> TreeNode {
        TreeNode {
            feature: None,
            threshold: 0.0,
            left: None,
            right: None,
            value,
        }
    }

    fn split(feature: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
        TreeNode {
            feature: Some(feature),
            threshold,
            left: Some(left),
            right: Some(right),
            value: vec![],
        }
    }

    fn stump(feature: usize, threshold: f64, below: usize, above: usize) -> DecisionTree {
        let mut lo = vec![0.0; 3];
        lo[below] = 10.0;
        let mut hi = vec![0.0; 3];
        hi[above] = 10.0;
        DecisionTree {
            nodes: vec![split(feature, threshold, 1, 2), leaf(lo), leaf(hi)],
        }
    }

    #[test]
    fn test_linear_argmax() {
        let model = ClassifierArtifact::Linear(LinearModel {
            coefficients: vec![vec![-1.0, 0.0], vec![0.0, 0.0], vec![1.0, 0.0]],
            intercepts: vec![0.0, 0.5, 0.0],
        });
        assert!(model.validate().is_ok());
        assert_eq!(model.n_classes(), 3);
        assert_eq!(model.predict(&[-2.0, 0.0]).unwrap(), 0);
        assert_eq!(model.predict(&[0.0, 0.0]).unwrap(), 1);
        assert_eq!(model.predict(&[2.0, 0.0]).unwrap(), 2);
    }

    #[test]
    fn test_linear_ties_pick_lowest_index() {
        let model = ClassifierArtifact::Linear(LinearModel {
            coefficients: vec![vec![0.0], vec![0.0]],
            intercepts: vec![1.0, 1.0],
        });
        assert_eq!(model.predict(&[3.0]).unwrap(), 0);
    }

    #[test]
    fn test_binary_linear() {
        let model = ClassifierArtifact::Linear(LinearModel {
            coefficients: vec![vec![2.0]],
            intercepts: vec![-1.0],
        });
        assert_eq!(model.n_classes(), 2);
        assert_eq!(model.predict(&[1.0]).unwrap(), 1);
        assert_eq!(model.predict(&[0.0]).unwrap(), 0);
    }

    #[test]
    fn test_forest_majority() {
        let model = ClassifierArtifact::Forest(ForestModel {
            n_features: 2,
            n_classes: 3,
            trees: vec![stump(0, 0.0, 0, 2), stump(0, 0.5, 0, 2), stump(1, 0.0, 1, 1)],
        });
        assert!(model.validate().is_ok());
        // x0 = 1.0: two trees vote 2, one votes 1
        assert_eq!(model.predict(&[1.0, 0.0]).unwrap(), 2);
        // x0 = -1.0: two trees vote 0
        assert_eq!(model.predict(&[-1.0, 0.0]).unwrap(), 0);
    }

    #[test]
    fn test_forest_rejects_backward_children() {
        let model = ClassifierArtifact::Forest(ForestModel {
            n_features: 1,
            n_classes: 3,
            trees: vec![DecisionTree {
                nodes: vec![split(0, 0.0, 0, 1), leaf(vec![1.0, 0.0, 0.0])],
            }],
        });
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_unvalidated_forest_errors_instead_of_panicking() {
        // Splits on a feature outside the input and points at a missing node.
        let model = ClassifierArtifact::Forest(ForestModel {
            n_features: 2,
            n_classes: 3,
            trees: vec![DecisionTree {
                nodes: vec![split(7, 0.0, 1, 2), leaf(vec![1.0, 0.0, 0.0])],
            }],
        });
        assert!(model.validate().is_err());
        assert!(matches!(model.predict(&[0.0, 0.0]), Err(ModelError::Malformed(_))));

        let dangling = ClassifierArtifact::Forest(ForestModel {
            n_features: 1,
            n_classes: 3,
            trees: vec![DecisionTree {
                nodes: vec![split(0, 0.0, 1, 9), leaf(vec![1.0, 0.0, 0.0])],
            }],
        });
        assert!(matches!(dangling.predict(&[5.0]), Err(ModelError::Malformed(_))));
        assert_eq!(dangling.predict(&[-5.0]).unwrap(), 0);

        let empty = ClassifierArtifact::Forest(ForestModel {
            n_features: 1,
            n_classes: 3,
            trees: vec![DecisionTree { nodes: vec![] }],
        });
        assert!(matches!(empty.predict(&[0.0]), Err(ModelError::Malformed(_))));
    }

    #[test]
    fn test_shape_checked() {
        let model = ClassifierArtifact::Linear(LinearModel {
            coefficients: vec![vec![1.0, 1.0], vec![0.0, 0.0]],
            intercepts: vec![0.0, 0.0],
        });
        assert!(matches!(
            model.predict(&[1.0]),
            Err(ModelError::ShapeMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(
            model.predict(&[1.0, f64::NAN]),
            Err(ModelError::NonFinite(1))
        ));
    }

    #[test]
    fn test_deserialize_tagged() {
        let json = r#"{"kind":"linear","coefficients":[[1.0],[-1.0]],"intercepts":[0.0,0.0]}"#;
        let model: ClassifierArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(model.kind(), "linear");
        assert_eq!(model.predict(&[-1.0]).unwrap(), 1);
    }
}
