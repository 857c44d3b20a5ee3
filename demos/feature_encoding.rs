use std::collections::BTreeMap;

use sparsefeat::{Dictionary, FeatureOptions, Instance, MathError, Vector};

fn main() -> Result<(), MathError> {
    println!("=== Feature Encoding Example ===\n");

    let mut dict = Dictionary::with_min_id(1);
    let rows = [
        vec![("age", 34.0), ("income", 52.0)],
        vec![("age", 51.0), ("owns_home", 1.0)],
        vec![("income", 18.5), ("student", 1.0)],
    ];

    let mut instances: Vec<Instance> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let named: BTreeMap<String, f64> =
                row.iter().map(|&(k, v)| (k.to_string(), v)).collect();
            Instance::new(named).label((i % 2) as f64)
        })
        .collect();

    for inst in instances.iter_mut() {
        inst.encode_features(&mut dict)?;
    }

    println!("Dictionary:");
    for (id, name) in dict.iter() {
        println!("  {:>2} -> {}", id, name);
    }

    println!("\nEncoded instances:");
    for inst in &instances {
        if let Some(features) = &inst.features {
            let entries: Vec<String> = features
                .iter()
                .map(|(i, v)| format!("{}:{}", i, v))
                .collect();
            println!("  label={:?} [{}]", inst.label, entries.join(" "));
        }
    }

    // Accumulate a simple weight vector from the labelled instances
    let mut weights = Vector::sparse();
    for inst in &instances {
        if let (Some(features), Some(label)) = (&inst.features, inst.label) {
            weights.increment(features, 2.0 * label - 1.0)?;
        }
    }
    println!("\nWeight norm: {:.4}", weights.norm());

    let opts = FeatureOptions::new().sparse(false).dimension(dict.next_id());
    let dense = sparsefeat::encode_with(&instances[0].named_features, &mut dict, &opts)?;
    let values: Vec<f64> = dense.iter().map(|(_, v)| v).collect();
    println!("Dense encoding of the first instance: {:?}", values);

    Ok(())
}
