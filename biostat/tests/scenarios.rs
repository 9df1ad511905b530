//! End-to-end analysis scenarios

use biostat::{
    AnalysisContext, AnalysisOptions, Biostat, Characteristic, HypothesisTests, NanPolicy, Record, TestOutcome,
    Workbook, GLOBAL,
};
use biostat_core::{record, StatsError};
use biostat_plugin::{CharacteristicRegistry, TestMethod, TestSettings};
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    OneSample(Vec<f64>),
    TwoSample(Vec<f64>, Vec<f64>),
    Anova(Vec<f64>, Vec<String>),
    ChiSquared(Vec<Vec<u64>>),
}

/// Records every primitive call and answers with a fixed outcome
#[derive(Default)]
struct RecordingTests {
    calls: Mutex<Vec<Call>>,
    fail_chi_squared: bool,
}

impl RecordingTests {
    fn failing_chi_squared() -> Self {
        Self {
            fail_chi_squared: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call, method: TestMethod, settings: TestSettings) -> TestOutcome {
        self.calls.lock().unwrap().push(call);
        TestOutcome::new(method, 1.0, 0.5, 1.0, settings.alpha)
    }
}

impl HypothesisTests for RecordingTests {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn one_sample_t(&self, values: &[f64], settings: TestSettings) -> Result<TestOutcome, StatsError> {
        Ok(self.record(Call::OneSample(values.to_vec()), TestMethod::OneSampleT, settings))
    }

    fn two_sample_t(&self, a: &[f64], b: &[f64], settings: TestSettings) -> Result<TestOutcome, StatsError> {
        Ok(self.record(Call::TwoSample(a.to_vec(), b.to_vec()), TestMethod::TwoSampleT, settings))
    }

    fn one_way_anova(
        &self,
        values: &[f64],
        labels: &[String],
        settings: TestSettings,
    ) -> Result<TestOutcome, StatsError> {
        Ok(self.record(Call::Anova(values.to_vec(), labels.to_vec()), TestMethod::OneWayAnova, settings))
    }

    fn chi_squared(&self, table: &[Vec<u64>], settings: TestSettings) -> Result<TestOutcome, StatsError> {
        if self.fail_chi_squared {
            return Err(StatsError::Domain("singular table".to_string()));
        }
        Ok(self.record(Call::ChiSquared(table.to_vec()), TestMethod::ChiSquared, settings))
    }
}

fn biostat_with(tests: Arc<RecordingTests>) -> Biostat {
    Biostat::new(AnalysisContext::new(Arc::new(CharacteristicRegistry::standard()), tests))
}

fn patients() -> Vec<Record> {
    vec![
        record! { "Sexe" => "Homme", "Age" => 45 },
        record! { "Sexe" => "Femme", "Age" => 30 },
        record! { "Sexe" => "Homme", "Age" => 50 },
    ]
}

#[test]
fn test_two_groups_call_two_sample_once() {
    init_tracing();
    let tests = Arc::new(RecordingTests::default());
    let biostat = biostat_with(tests.clone());

    let result = biostat.analyze_sheet("S1", &patients(), "Sexe", &["Age"]).unwrap();

    assert_eq!(tests.calls(), vec![Call::TwoSample(vec![45.0, 50.0], vec![30.0])]);
    assert!(result.sub_analyses[0].statistical_result.is_some());
}

#[test]
fn test_single_value_domain_calls_one_sample() {
    init_tracing();
    let tests = Arc::new(RecordingTests::default());
    let registry = CharacteristicRegistry::standard()
        .with_characteristic(Characteristic::qualitative("Suivi").with_domain(["oui"]));
    let biostat = Biostat::new(AnalysisContext::new(Arc::new(registry), tests.clone()));
    let records = vec![
        record! { "Suivi" => "oui", "Consultations1" => 3 },
        record! { "Suivi" => "non", "Consultations1" => 4 },
        record! { "Suivi" => "oui", "Consultations1" => 5 },
    ];

    let result = biostat
        .analyze_sheet("S1", &records, "Suivi", &["Consultations1"])
        .unwrap();

    assert_eq!(result.group_labels(), vec!["oui"]);
    assert_eq!(tests.calls(), vec![Call::OneSample(vec![3.0, 5.0])]);
}

#[test]
fn test_single_sheet_calls_one_sample() {
    init_tracing();
    let tests = Arc::new(RecordingTests::default());
    let biostat = biostat_with(tests.clone());
    let mut wb = Workbook::new();
    wb.insert_sheet("S1", patients());

    let result = biostat.analyze_across_sheets(&["S1"], &wb, "Consultations1", &["Age"]).unwrap();

    assert_eq!(tests.calls(), vec![Call::OneSample(vec![45.0, 30.0, 50.0])]);
    assert_eq!(result.sub_analyses.len(), 2);
}

#[test]
fn test_three_groups_call_anova_in_long_format() {
    init_tracing();
    let tests = Arc::new(RecordingTests::default());
    let biostat = biostat_with(tests.clone());
    let records = vec![
        record! { "Complementaire" => "C2S", "Consultations1" => 3 },
        record! { "Complementaire" => "AME", "Consultations1" => 5 },
        record! { "Complementaire" => "", "Consultations1" => 1 },
        record! { "Complementaire" => "C2S", "Consultations1" => 4 },
    ];

    biostat
        .analyze_sheet("S1", &records, "Complementaire", &["Consultations1"])
        .unwrap();

    let labels: Vec<String> = ["C2S", "C2S", "AME", ""].iter().map(|s| s.to_string()).collect();
    assert_eq!(tests.calls(), vec![Call::Anova(vec![3.0, 4.0, 5.0, 1.0], labels)]);
}

#[test]
fn test_chi_squared_receives_compacted_table() {
    init_tracing();
    let tests = Arc::new(RecordingTests::default());
    let biostat = biostat_with(tests.clone());
    let records = vec![
        record! { "Age" => 10, "ALD" => true },
        record! { "Age" => 15, "ALD" => false },
        record! { "Age" => 45, "ALD" => true },
    ];

    let result = biostat.analyze_sheet("S1", &records, "Catégories d'âge", &["ALD"]).unwrap();

    // Eight band rows reported, only the two populated ones tested
    let table = result.sub_analyses[0].contingency_matrix.as_ref().unwrap();
    assert_eq!(table.rows(), 8);
    assert_eq!(tests.calls(), vec![Call::ChiSquared(vec![vec![1, 1], vec![0, 1]])]);
}

#[test]
fn test_end_to_end_sexe_age() {
    init_tracing();
    let biostat = Biostat::with_standard_library();
    let result = biostat.analyze_sheet("Patients", &patients(), "Sexe", &["Age"]).unwrap();

    assert_eq!(result.group_labels(), vec!["Homme", "Femme"]);
    assert_eq!(result.groups[0].records.len(), 2);
    assert_eq!(result.groups[1].records.len(), 1);

    let age = &result.sub_analyses[0];
    assert_eq!(age.raw_grouped_data, vec![vec![45.0, 50.0], vec![30.0]]);
    let stats = age.descriptive_stats_by_group.as_ref().unwrap();
    assert_eq!((stats[0].q1, stats[0].median, stats[0].q3), (46.25, 47.5, 48.75));
    assert_eq!(stats[1].median, 30.0);
    assert_eq!(stats[1].std, 0.0);

    let outcome = age.statistical_result.as_ref().unwrap();
    assert_eq!(outcome.method, TestMethod::TwoSampleT);
    // A single observation leaves the variance, and so the test, undefined
    assert!(outcome.p_value.is_nan());
}

#[test]
fn test_age_band_partition() {
    init_tracing();
    let records = vec![record! { "Age" => 10 }, record! { "Age" => 25 }, record! { "Age" => 85 }];
    let result = Biostat::default()
        .analyze_sheet("S1", &records, "Catégories d'âge", &Vec::<String>::new())
        .unwrap();

    let sizes: Vec<usize> = result.groups.iter().map(|g| g.records.len()).collect();
    assert_eq!(sizes, vec![1, 1, 0, 0, 0, 0, 0, 1]);
    assert_eq!(result.groups[0].records[0], records[0]);
    assert_eq!(result.groups[1].records[0], records[1]);
    assert_eq!(result.groups[7].records[0], records[2]);
}

#[test]
fn test_nan_policy_controls_primitive_input() {
    init_tracing();
    let records = vec![
        record! { "Sexe" => "Homme", "Age" => 45 },
        record! { "Sexe" => "Homme", "Age" => "n/a" },
        record! { "Sexe" => "Femme", "Age" => 30 },
    ];

    let tests = Arc::new(RecordingTests::default());
    biostat_with(tests.clone())
        .analyze_sheet("S1", &records, "Sexe", &["Age"])
        .unwrap();
    assert_eq!(tests.calls(), vec![Call::TwoSample(vec![45.0], vec![30.0])]);

    let tests = Arc::new(RecordingTests::default());
    let result = biostat_with(tests.clone())
        .with_options(AnalysisOptions::default().with_nan_policy(NanPolicy::Propagate))
        .analyze_sheet("S1", &records, "Sexe", &["Age"])
        .unwrap();
    match &tests.calls()[..] {
        [Call::TwoSample(a, b)] => {
            assert_eq!(a.len(), 2);
            assert!(a[1].is_nan());
            assert_eq!(b, &vec![30.0]);
        }
        other => panic!("unexpected calls: {:?}", other),
    }
    // Raw data keep NaN under both policies
    assert!(result.sub_analyses[0].raw_grouped_data[0][1].is_nan());
}

#[test]
fn test_run_survives_failing_primitive() {
    init_tracing();
    let tests = Arc::new(RecordingTests::failing_chi_squared());
    let mut wb = Workbook::new();
    wb.insert_sheet("S1", patients());
    wb.insert_sheet(
        "S2",
        vec![record! { "Sexe" => "Femme", "Age" => 62 }, record! { "Sexe" => "Femme", "Age" => 41 }],
    );

    let run = biostat_with(tests).run(&wb, &["S1", "S2"], "Sexe", &["Age"]);

    // Per-sheet analyses only need t-tests; the global one hits chi-squared on Sexe
    assert!(run["S1"].is_ok());
    assert!(run["S2"].is_ok());
    let err = run[GLOBAL].as_ref().unwrap_err();
    assert_eq!(err.code, biostat_core::codes::DOMAIN_ERROR);
    let context = err.context.as_ref().unwrap();
    assert_eq!(context.sheet.as_deref(), Some(GLOBAL));
    assert_eq!(context.characteristic.as_deref(), Some("Sexe"));
}

#[test]
fn test_workbook_from_json_run() {
    init_tracing();
    let json = r#"{
        "2023": [
            {"Sexe": "Homme", "Age": 45, "ALD": true},
            {"Sexe": "Femme", "Age": 30, "ALD": false}
        ],
        "2024": [
            {"Sexe": "Femme", "Age": "52", "ALD": null}
        ]
    }"#;
    let wb = Workbook::from_json(json).unwrap();
    let names = wb.sheet_names();
    assert_eq!(names, vec!["2023", "2024"]);

    let run = Biostat::default().run(&wb, &names, "Sexe", &["Age", "ALD"]);
    let global = run[GLOBAL].as_ref().unwrap();
    let age = global.sub_analysis("Age").unwrap();
    assert_eq!(age.raw_grouped_data, vec![vec![45.0, 30.0], vec![52.0]]);

    let ald = global.sub_analysis("ALD").unwrap();
    let table = ald.contingency_matrix.as_ref().unwrap();
    assert_eq!(table.col_labels, vec!["Non renseigné", "false", "true"]);
    assert_eq!(table.matrix, vec![vec![0, 1, 1], vec![1, 0, 0]]);

    let serialized = serde_json::to_value(global).unwrap();
    assert_eq!(serialized["name"], GLOBAL);
    assert_eq!(serialized["sub_analyses"][0]["characteristic"]["name"], "Sexe");
}
