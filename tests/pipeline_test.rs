//! End-to-end pipeline scenarios against an in-memory source and a tempdir
//! registry.

use asegurar::config::{PipelineConfig, PipelineSpec, Schema, ValidationPolicy};
use asegurar::data::{InMemorySource, Table};
use asegurar::model::{
    extract_labels, BundleMetadata, ForestParams, ModelBundle, Preprocessor, RandomForest,
};
use asegurar::pipeline::{IngestionError, TrainerError};
use asegurar::registry::{InMemoryRegistry, ModelRegistry, RegistryError};
use asegurar::{Error, Response, ResponsePredictor, TrainingPipeline};
use tempfile::TempDir;

const KEY: &str = "model-registry/model.json";

const HEADERS: [&str; 12] = [
    "id",
    "Gender",
    "Age",
    "Driving_License",
    "Region_Code",
    "Previously_Insured",
    "Vehicle_Age",
    "Vehicle_Damage",
    "Annual_Premium",
    "Policy_Sales_Channel",
    "Vintage",
    "Response",
];

fn schema() -> Schema {
    Schema::from_yaml(
        r#"
target_column: Response
columns:
  - name: id
    dtype: integer
  - name: Gender
    dtype: categorical
    allowed: [Male, Female]
  - name: Age
    dtype: integer
    min: 18
    max: 110
  - name: Driving_License
    dtype: integer
    min: 0
    max: 1
  - name: Region_Code
    dtype: float
    min: 0
  - name: Previously_Insured
    dtype: integer
    min: 0
    max: 1
  - name: Vehicle_Age
    dtype: categorical
    allowed: ["< 1 Year", "1-2 Year", "> 2 Years"]
  - name: Vehicle_Damage
    dtype: categorical
    allowed: ["Yes", "No"]
  - name: Annual_Premium
    dtype: float
    min: 0
  - name: Policy_Sales_Channel
    dtype: float
    min: 0
  - name: Vintage
    dtype: integer
    min: 0
  - name: Response
    dtype: integer
    min: 0
    max: 1
standard_scale_columns: [Age, Annual_Premium]
minmax_scale_columns: [Vintage]
drop_columns: [id]
"#,
    )
    .unwrap()
}

/// A synthetic feed with a learnable rule:
/// respond iff the vehicle is damaged and the customer is not already insured.
fn feed_rows(n: usize) -> Vec<Vec<String>> {
    (0..n)
        .map(|i| {
            let damage = i % 2 == 0;
            let insured = i % 3 == 0;
            let response = damage && !insured;
            vec![
                (i + 1).to_string(),
                if i % 2 == 0 { "Male" } else { "Female" }.to_string(),
                (20 + (i * 7) % 40).to_string(),
                "1".to_string(),
                ((i * 3) % 50).to_string(),
                u8::from(insured).to_string(),
                ["< 1 Year", "1-2 Year", "> 2 Years"][i % 3].to_string(),
                if damage { "Yes" } else { "No" }.to_string(),
                (20000 + (i * 997) % 20000).to_string(),
                ((i * 13) % 160).to_string(),
                (10 + (i * 11) % 280).to_string(),
                u8::from(response).to_string(),
            ]
        })
        .collect()
}

fn feed(n: usize) -> InMemorySource {
    let headers = HEADERS.iter().map(|&h| h.to_string()).collect();
    InMemorySource::new("vehicle-insurance-data", Table::new(headers, feed_rows(n)))
}

fn test_spec(tmp: &TempDir) -> PipelineSpec {
    PipelineSpec {
        artifact_root: tmp.path().join("artifact"),
        registry_root: tmp.path().join("model_registry"),
        forest: ForestParams {
            n_estimators: 30,
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 1,
            ..ForestParams::default()
        },
        ..PipelineSpec::default()
    }
}

fn pipeline_with(
    tmp: &TempDir,
    run_id: &str,
    source: InMemorySource,
    registry: InMemoryRegistry,
    spec: &PipelineSpec,
) -> TrainingPipeline<InMemorySource, InMemoryRegistry> {
    let config = PipelineConfig::for_run(spec, run_id).unwrap();
    TrainingPipeline::new(source, registry, schema(), config)
}

// Scenario A: empty source collection aborts before validation.
#[test]
fn test_empty_source_aborts_before_validation() {
    let tmp = TempDir::new().unwrap();
    let spec = test_spec(&tmp);
    let mut pipeline = pipeline_with(&tmp, "run-a", feed(0), InMemoryRegistry::new(), &spec);

    let err = pipeline.run_pipeline().unwrap_err();
    assert!(matches!(
        err,
        Error::Ingestion(IngestionError::EmptySource(_))
    ));
    // validation never ran, so no validation report exists anywhere
    assert!(!tmp
        .path()
        .join("artifact/run-a/data_validation/report.yaml")
        .exists());
}

// Scenario B: a non-numeric Age value fails validation, naming the column.
#[test]
fn test_schema_violation_aborts_under_default_policy() {
    let tmp = TempDir::new().unwrap();
    let spec = test_spec(&tmp);

    let mut rows = feed_rows(80);
    rows[5][2] = "forty".to_string(); // Age column
    let headers = HEADERS.iter().map(|&h| h.to_string()).collect();
    let source = InMemorySource::new("vehicle-insurance-data", Table::new(headers, rows));

    let mut pipeline = pipeline_with(&tmp, "run-b", source, InMemoryRegistry::new(), &spec);
    let err = pipeline.run_pipeline().unwrap_err();

    match err {
        Error::SchemaViolation { violations } => {
            assert!(
                violations.iter().any(|v| v.contains("Age")),
                "violations should name Age: {violations:?}"
            );
        }
        other => panic!("expected SchemaViolation, got {other}"),
    }
    // the violation was still recorded in the validation report
    assert!(tmp
        .path()
        .join("artifact/run-b/data_validation/report.yaml")
        .exists());
    // and nothing reached the registry
    let registry = pipeline.registry();
    assert!(matches!(
        registry.get_latest(KEY),
        Err(RegistryError::NotFound(_))
    ));
}

// Scenario C: first-ever run with an empty registry promotes unconditionally.
#[test]
fn test_first_run_promotes_and_serves() {
    let tmp = TempDir::new().unwrap();
    let spec = test_spec(&tmp);
    let mut pipeline = pipeline_with(&tmp, "run-c", feed(160), InMemoryRegistry::new(), &spec);

    let pushed = pipeline.run_pipeline().unwrap();
    assert!(pushed.pushed);
    let version = pushed.version.unwrap();
    assert_eq!(version.version, 1);
    assert!(version.is_latest);

    // registry round-trip: the stored bundle deserializes and serves
    let bytes = pipeline.registry().get_latest(KEY).unwrap();
    let bundle = ModelBundle::from_bytes(&bytes).unwrap();
    assert!(bundle.metadata.score >= 0.6);

    let predictor = ResponsePredictor::from_bundle(bundle);
    let mut damaged = asegurar::data::InsuranceRecord {
        gender: asegurar::data::Gender::Male,
        age: 30,
        driving_license: true,
        region_code: 10.0,
        previously_insured: false,
        vehicle_age: asegurar::data::VehicleAge::OneToTwoYears,
        vehicle_damage: true,
        annual_premium: 25000.0,
        policy_sales_channel: 26.0,
        vintage: 100,
        response: None,
    };
    assert_eq!(predictor.predict(&damaged), Response::Yes);
    damaged.vehicle_damage = false;
    assert_eq!(predictor.predict(&damaged), Response::No);

    // run report written alongside the artifacts
    assert!(tmp.path().join("artifact/run-c/report.yaml").exists());
}

// Scenario D: a challenger that does not beat production by the threshold is
// not pushed and the registry is unchanged.
#[test]
fn test_equal_challenger_not_promoted() {
    let tmp = TempDir::new().unwrap();
    let spec = test_spec(&tmp);

    let mut first = pipeline_with(&tmp, "run-d1", feed(160), InMemoryRegistry::new(), &spec);
    let pushed = first.run_pipeline().unwrap();
    assert!(pushed.pushed);
    let baseline = first.registry().latest_version(KEY).unwrap();

    // Same data, same seed: the challenger scores exactly what production
    // scores, so the delta is zero and the gate must hold it back.
    let mut second = pipeline_with(&tmp, "run-d2", feed(160), first.into_registry(), &spec);
    let pushed = second.run_pipeline().unwrap();
    assert!(!pushed.pushed);
    assert!(pushed.version.is_none());

    let latest = second.registry().latest_version(KEY).unwrap();
    assert_eq!(latest.version, baseline.version);
    assert_eq!(latest.digest, baseline.digest);
}

// Scenario E: a clearly better challenger replaces production; the old
// version loses its latest flag but remains stored.
#[test]
fn test_better_challenger_replaces_production() {
    let tmp = TempDir::new().unwrap();
    let spec = test_spec(&tmp);

    // Seed the registry with a useless production bundle that answers No to
    // everything (F1 = 0 on any test split with positives).
    let mut registry = InMemoryRegistry::new();
    registry.put(KEY, &useless_bundle().to_bytes().unwrap()).unwrap();

    let mut pipeline = pipeline_with(&tmp, "run-e", feed(160), registry, &spec);
    let pushed = pipeline.run_pipeline().unwrap();

    assert!(pushed.pushed);
    assert_eq!(pushed.version.as_ref().unwrap().version, 2);

    let versions = pipeline.registry().list_versions(KEY).unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0].version, 2);
    assert!(versions[0].is_latest);
    assert!(!versions[1].is_latest);
}

// A model below the acceptance floor must never reach the pusher.
#[test]
fn test_below_floor_model_never_reaches_registry() {
    let tmp = TempDir::new().unwrap();
    let mut spec = test_spec(&tmp);
    spec.expected_score = 0.99;

    // Contradictory feed: identical feature rows carry both labels, so a
    // perfect test score is unreachable.
    let mut rows = Vec::new();
    for i in 0..120 {
        let mut row = feed_rows(1).remove(0);
        row[0] = (i + 1).to_string();
        row[11] = (i % 2).to_string();
        rows.push(row);
    }
    let headers = HEADERS.iter().map(|&h| h.to_string()).collect();
    let source = InMemorySource::new("vehicle-insurance-data", Table::new(headers, rows));

    let mut pipeline = pipeline_with(&tmp, "run-floor", source, InMemoryRegistry::new(), &spec);
    let err = pipeline.run_pipeline().unwrap_err();

    assert!(matches!(
        err,
        Error::Trainer(TrainerError::BelowThreshold { .. })
    ));
    assert!(matches!(
        pipeline.registry().get_latest(KEY),
        Err(RegistryError::NotFound(_))
    ));
}

// A registry outage during evaluation aborts the run instead of being
// mistaken for a cold start.
#[test]
fn test_registry_outage_aborts_run() {
    struct OutageRegistry;
    impl ModelRegistry for OutageRegistry {
        fn put(&mut self, _: &str, _: &[u8]) -> asegurar::registry::Result<asegurar::registry::ModelVersion> {
            Err(io_outage())
        }
        fn get_latest(&self, _: &str) -> asegurar::registry::Result<Vec<u8>> {
            Err(io_outage())
        }
        fn latest_version(&self, _: &str) -> asegurar::registry::Result<asegurar::registry::ModelVersion> {
            Err(io_outage())
        }
        fn list_versions(&self, _: &str) -> asegurar::registry::Result<Vec<asegurar::registry::ModelVersion>> {
            Err(io_outage())
        }
    }
    fn io_outage() -> RegistryError {
        RegistryError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "registry unreachable",
        ))
    }

    let tmp = TempDir::new().unwrap();
    let spec = test_spec(&tmp);
    let config = PipelineConfig::for_run(&spec, "run-outage").unwrap();
    let mut pipeline = TrainingPipeline::new(feed(160), OutageRegistry, schema(), config);

    let err = pipeline.run_pipeline().unwrap_err();
    assert!(matches!(err, Error::Evaluation(_)));
}

// Under the continue policy, recorded violations do not stop the chain.
#[test]
fn test_continue_policy_trains_past_violations() {
    let tmp = TempDir::new().unwrap();
    let mut spec = test_spec(&tmp);
    spec.validation_policy = ValidationPolicy::Continue;

    // One Age value outside the declared domain but still parseable
    let mut rows = feed_rows(160);
    rows[3][2] = "150".to_string();
    let headers = HEADERS.iter().map(|&h| h.to_string()).collect();
    let source = InMemorySource::new("vehicle-insurance-data", Table::new(headers, rows));

    let mut pipeline = pipeline_with(&tmp, "run-cont", source, InMemoryRegistry::new(), &spec);
    let pushed = pipeline.run_pipeline().unwrap();
    assert!(pushed.pushed);
}

/// A production bundle that predicts No for every record
fn useless_bundle() -> ModelBundle {
    let schema = schema();
    // All-negative labels collapse the forest to constant-No leaves
    let table = {
        let mut rows = feed_rows(30);
        for row in &mut rows {
            row[11] = "0".to_string();
        }
        let headers = HEADERS.iter().map(|&h| h.to_string()).collect();
        Table::new(headers, rows)
    };
    let records = asegurar::data::InsuranceRecord::from_table(&table).unwrap();
    let preprocessor = Preprocessor::fit(&records, &schema).unwrap();
    let x = preprocessor.transform(&records);
    let y = extract_labels(&records).unwrap();
    let forest = RandomForest::fit(
        &x,
        &y,
        &ForestParams {
            n_estimators: 3,
            max_depth: 2,
            min_samples_split: 2,
            min_samples_leaf: 1,
            ..ForestParams::default()
        },
    )
    .unwrap();
    ModelBundle {
        metadata: BundleMetadata {
            name: "vehicle-insurance-response".into(),
            schema_digest: schema.digest(),
            trained_at: chrono::Utc::now(),
            score: 0.0,
        },
        preprocessor,
        forest,
    }
}
