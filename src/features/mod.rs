//! Turning named feature observations into numeric vectors.
//!
//! This module provides:
//! - `encode`: named values to a sparse `Vector`, growing a `Dictionary`
//! - `encode_with`: the same, configured by `FeatureOptions`
//! - `Instance`: an observation that is encoded at most once
//!
//! Index [`BIAS_INDEX`] is reserved for the intercept term and always holds
//! the bias value, so the encoder only accepts dictionaries whose ids start
//! above it.
//!
//! # Examples
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use sparsefeat::{Dictionary, FeatureOptions, encode, encode_with};
//!
//! let mut dict = Dictionary::with_min_id(1);
//! let named = BTreeMap::from([("height".to_string(), 1.8), ("weight".to_string(), 72.0)]);
//!
//! let sparse = encode(&named, &mut dict).unwrap();
//! assert_eq!(sparse.get(0).unwrap(), 1.0);
//! assert_eq!(sparse.get(dict.id_from_name("weight").unwrap()).unwrap(), 72.0);
//!
//! let dense = encode_with(&named, &mut dict, &FeatureOptions::new().sparse(false)).unwrap();
//! assert_eq!(dense.dimension(), Some(3));
//! ```

mod instance;
mod options;

pub use instance::Instance;
pub use options::FeatureOptions;

use std::collections::BTreeMap;

use crate::dictionary::Dictionary;
use crate::error::{MathError, Result};
use crate::vector::Vector;

/// Index holding the bias (intercept) term of every encoded vector.
pub const BIAS_INDEX: usize = 0;

/// Encodes `named` as a sparse vector with `1.0` at [`BIAS_INDEX`].
///
/// Unseen names are added to `dict`.
pub fn encode(named: &BTreeMap<String, f64>, dict: &mut Dictionary) -> Result<Vector> {
    encode_with(named, dict, &FeatureOptions::default())
}

/// Encodes `named` according to `opts`.
///
/// Fails with `ReservedId` when `dict` can hand out [`BIAS_INDEX`], and a
/// dense encoding fails with `IllegalIndex` when a feature id does not fit
/// the configured dimension. On failure `dict` is left unchanged.
pub fn encode_with(
    named: &BTreeMap<String, f64>,
    dict: &mut Dictionary,
    opts: &FeatureOptions,
) -> Result<Vector> {
    if dict.min_id() <= BIAS_INDEX {
        return Err(MathError::ReservedId {
            min_id: dict.min_id(),
            bias: BIAS_INDEX,
        });
    }

    let (ids, next_id) = planned_ids(named, dict);
    let mut features = if opts.sparse {
        Vector::sparse()
    } else {
        let dimension = opts.dimension.unwrap_or(next_id);
        if let Some(id) = ids.iter().map(|&(id, _)| id).filter(|&id| id >= dimension).max() {
            return Err(MathError::illegal_1d(id, dimension));
        }
        if BIAS_INDEX >= dimension {
            return Err(MathError::illegal_1d(BIAS_INDEX, dimension));
        }
        Vector::dense(dimension)
    };

    for name in named.keys() {
        dict.add_name(name);
    }
    for (id, value) in ids {
        features.set(id, value)?;
    }
    features.set(BIAS_INDEX, opts.bias)?;
    log::debug!(
        "encoded {} named features ({})",
        named.len(),
        if opts.sparse { "sparse" } else { "dense" }
    );
    Ok(features)
}

/// Ids `dict` will give each named value, without allocating any, and the
/// dictionary's next id once they are added.
fn planned_ids(named: &BTreeMap<String, f64>, dict: &Dictionary) -> (Vec<(usize, f64)>, usize) {
    let mut next_id = dict.next_id();
    let ids = named
        .iter()
        .map(|(name, &value)| {
            let id = dict.id_from_name(name).unwrap_or_else(|| {
                next_id += 1;
                next_id - 1
            });
            (id, value)
        })
        .collect();
    (ids, next_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_encode_sets_bias_and_ids() {
        let mut dict = Dictionary::with_min_id(1);
        let v = encode(&named(&[("a", 2.0), ("b", 3.0)]), &mut dict).unwrap();

        assert!(v.is_sparse());
        assert_eq!(v.get(BIAS_INDEX).unwrap(), 1.0);
        assert_eq!(v.get(dict.id_from_name("a").unwrap()).unwrap(), 2.0);
        assert_eq!(v.get(dict.id_from_name("b").unwrap()).unwrap(), 3.0);
        assert_eq!(v.nnz(), 3);
    }

    #[test]
    fn test_encode_reuses_ids() {
        let mut dict = Dictionary::with_min_id(1);
        encode(&named(&[("a", 1.0)]), &mut dict).unwrap();
        let v = encode(&named(&[("a", 5.0), ("c", 6.0)]), &mut dict).unwrap();

        assert_eq!(dict.id_from_name("a"), Some(1));
        assert_eq!(dict.id_from_name("c"), Some(2));
        assert_eq!(v.get(1).unwrap(), 5.0);
        assert_eq!(v.get(2).unwrap(), 6.0);
    }

    #[test]
    fn test_zero_valued_features_are_registered_not_stored() {
        let mut dict = Dictionary::with_min_id(1);
        let v = encode(&named(&[("z", 0.0)]), &mut dict).unwrap();
        assert_eq!(dict.id_from_name("z"), Some(1));
        assert_eq!(v.indexes(), vec![BIAS_INDEX]);
    }

    #[test]
    fn test_dictionary_overlapping_bias_is_rejected() {
        let mut dict = Dictionary::with_min_id(BIAS_INDEX);
        let err = encode(&named(&[("a", 2.0), ("b", 3.0)]), &mut dict).unwrap_err();
        assert_eq!(err, MathError::ReservedId { min_id: 0, bias: BIAS_INDEX });
        assert!(dict.is_empty());

        let opts = FeatureOptions::new().sparse(false);
        assert!(encode_with(&named(&[("a", 2.0)]), &mut dict, &opts).is_err());
        assert!(dict.is_empty());
    }

    #[test]
    fn test_encode_with_dense_grows_to_dictionary() {
        let mut dict = Dictionary::with_min_id(1);
        let opts = FeatureOptions::new().sparse(false).bias(-1.0);
        let v = encode_with(&named(&[("x", 4.0), ("y", 5.0)]), &mut dict, &opts).unwrap();

        assert_eq!(v, Vector::from(vec![-1.0, 4.0, 5.0]));
    }

    #[test]
    fn test_encode_with_dense_fixed_dimension() {
        let mut dict = Dictionary::with_min_id(1);
        let opts = FeatureOptions::new().sparse(false).dimension(5);
        let v = encode_with(&named(&[("x", 4.0)]), &mut dict, &opts).unwrap();
        assert_eq!(v, Vector::from(vec![1.0, 4.0, 0.0, 0.0, 0.0]));

        let tight = FeatureOptions::new().sparse(false).dimension(2);
        let before = dict.clone();
        let err = encode_with(&named(&[("y", 1.0), ("w", 2.0)]), &mut dict, &tight).unwrap_err();
        assert_eq!(err, MathError::illegal_1d(3, 2));
        assert_eq!(dict, before);
        assert_eq!(dict.id_from_name("w"), None);

        let empty = FeatureOptions::new().sparse(false).dimension(0);
        assert!(encode_with(&BTreeMap::new(), &mut dict, &empty).is_err());
        assert_eq!(dict, before);

        let v = encode_with(&named(&[("x", 1.0), ("y", 7.0)]), &mut dict, &opts).unwrap();
        assert_eq!(dict.id_from_name("y"), Some(2));
        assert_eq!(v.get(2).unwrap(), 7.0);
    }

    #[test]
    fn test_encode_with_sparse_matches_encode() {
        let obs = named(&[("p", 0.25), ("q", -1.5)]);
        let mut d1 = Dictionary::with_min_id(1);
        let mut d2 = Dictionary::with_min_id(1);
        assert_eq!(
            encode_with(&obs, &mut d1, &FeatureOptions::default()).unwrap(),
            encode(&obs, &mut d2).unwrap()
        );
    }
}
