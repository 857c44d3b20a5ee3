use std::collections::BTreeMap;

use super::{FeatureOptions, encode_with};
use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::vector::Vector;

/// One observation: named feature values, plus their encoded vector once
/// [`encode_features`](Instance::encode_features) has run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Instance {
    pub named_features: BTreeMap<String, f64>,
    pub features: Option<Vector>,
    pub label: Option<f64>,
    pub name: Option<String>,
}

impl Instance {
    pub fn new(named_features: BTreeMap<String, f64>) -> Self {
        Self {
            named_features,
            ..Self::default()
        }
    }

    pub fn label(mut self, label: f64) -> Self {
        self.label = Some(label);
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn is_encoded(&self) -> bool {
        self.features.is_some()
    }

    /// Encodes the named features as a sparse vector.
    ///
    /// Returns `Ok(false)` and leaves everything untouched when the instance
    /// is already encoded.
    pub fn encode_features(&mut self, dict: &mut Dictionary) -> Result<bool> {
        self.encode_features_with(dict, &FeatureOptions::default())
    }

    /// Like [`encode_features`](Instance::encode_features) with explicit options.
    pub fn encode_features_with(&mut self, dict: &mut Dictionary, opts: &FeatureOptions) -> Result<bool> {
        if self.is_encoded() {
            return Ok(false);
        }
        self.features = Some(encode_with(&self.named_features, dict, opts)?);
        Ok(true)
    }
}
