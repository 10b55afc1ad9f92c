//! Test dataset fixtures.
//!
//! Builders for the small frequency and sampling-site tables used across the
//! integration tests, plus writers for the on-disk formats the loader reads.

use std::path::{Path, PathBuf};

use frqviz::{TabularDataset, Value};

/// Variant frequencies for three cohorts, indexed by `label`.
pub fn variant_frequencies() -> TabularDataset {
    TabularDataset::new(
        vec![
            "label".into(),
            "gene".into(),
            "frq_gh_2017".into(),
            "frq_bf_2012".into(),
            "frq_ml_2014".into(),
            "max_af".into(),
        ],
        vec![
            vec![
                "V402L".into(),
                "Vgsc".into(),
                0.12.into(),
                0.5.into(),
                Value::Null,
                0.5.into(),
            ],
            vec![
                "L995F".into(),
                "Vgsc".into(),
                0.91.into(),
                0.85.into(),
                0.4.into(),
                0.91.into(),
            ],
            vec![
                "N1570Y".into(),
                "Vgsc".into(),
                0.0.into(),
                0.2.into(),
                0.05.into(),
                0.2.into(),
            ],
        ],
    )
    .expect("valid fixture")
    .with_index(&["label"])
    .expect("label column exists")
    .with_title("Vgsc SNP frequencies")
}

/// Frequencies with `n` rows, each labelled `v<i>`.
pub fn many_variants(n: usize) -> TabularDataset {
    let rows = (0..n)
        .map(|i| vec![Value::from(format!("v{}", i)), Value::from(0.5)])
        .collect();
    TabularDataset::new(vec!["label".into(), "frq_a".into()], rows)
        .expect("valid fixture")
        .with_index(&["label"])
        .expect("label column exists")
}

/// Sampling sites with two taxon counts, indexed by country and location.
pub fn sampling_sites() -> TabularDataset {
    TabularDataset::new(
        vec![
            "country".into(),
            "location".into(),
            "latitude".into(),
            "longitude".into(),
            "taxon_A".into(),
            "taxon_B".into(),
        ],
        vec![
            vec![
                "Kenya".into(),
                "Kilifi".into(),
                (-3.5).into(),
                39.85.into(),
                12.into(),
                4.into(),
            ],
            vec![
                "Burkina Faso".into(),
                "Bana".into(),
                11.233.into(),
                (-4.472).into(),
                Value::Null,
                30.into(),
            ],
        ],
    )
    .expect("valid fixture")
    .with_index(&["country", "location"])
    .expect("index columns exist")
}

/// Write `content` to `name` inside `dir`
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

/// The variant frequencies as CSV, without index or title
pub fn variant_frequencies_csv() -> &'static str {
    "label,gene,frq_gh_2017,frq_bf_2012,frq_ml_2014,max_af\n\
     V402L,Vgsc,0.12,0.5,,0.5\n\
     L995F,Vgsc,0.91,0.85,0.4,0.91\n\
     N1570Y,Vgsc,0.0,0.2,0.05,0.2\n"
}

/// The sampling sites as a split-layout JSON document
pub fn sampling_sites_json() -> &'static str {
    r#"{
  "index": ["country", "location"],
  "columns": ["country", "location", "latitude", "longitude", "taxon_A", "taxon_B"],
  "data": [
    ["Kenya", "Kilifi", -3.5, 39.85, 12, 4],
    ["Burkina Faso", "Bana", 11.233, -4.472, null, 30]
  ]
}"#
}
