use serde::{Deserialize, Serialize};

/// How named features are turned into a vector.
///
/// Defaults to a sparse vector with a bias of `1.0`. A dense encoding
/// either uses a fixed `dimension` or grows to the dictionary's current size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureOptions {
    pub sparse: bool,
    pub dimension: Option<usize>,
    pub bias: f64,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            sparse: true,
            dimension: None,
            bias: 1.0,
        }
    }
}

impl FeatureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sparse(mut self, sparse: bool) -> Self {
        self.sparse = sparse;
        self
    }

    /// Fixed length for dense encodings. Ignored for sparse ones.
    pub fn dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Value written at the reserved bias index.
    pub fn bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let opts = FeatureOptions::new().sparse(false).dimension(8).bias(0.5);
        assert!(!opts.sparse);
        assert_eq!(opts.dimension, Some(8));
        assert_eq!(opts.bias, 0.5);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let opts: FeatureOptions = serde_json::from_str(r#"{"sparse": false}"#).unwrap();
        assert_eq!(opts, FeatureOptions::new().sparse(false));

        let opts: FeatureOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, FeatureOptions::default());
    }
}
