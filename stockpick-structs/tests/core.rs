use stockpick_structs::{
    config::{Algorithm, Settings},
    core::{Action, OutputData, Selection},
};
use stockpick_utils::jsonify;

#[test]
fn test_action_profit() {
    let action = Action::new("A", 100.0, 10.0);
    assert_eq!(action.profit(), 10.0);
    assert!(action.is_candidate());
    assert!(!Action::new("Z", 0.0, 10.0).is_candidate());
    assert!(!Action::new("N", -5.0, 10.0).is_candidate());
}

#[test]
fn test_selection_from_indices() {
    let actions = vec![
        Action::new("A", 100.0, 10.0),
        Action::new("B", 200.0, 15.0),
        Action::new("C", 300.0, 5.0),
    ];
    let selection = Selection::from_indices(&actions, &[0, 1]);
    assert_eq!(selection.indices(), vec![0, 1]);
    assert_eq!(selection.total_cost, 300.0);
    assert_eq!(selection.total_profit, 40.0);
    assert_eq!(selection.actions[1].name, "B");
    assert_eq!(selection.actions[1].profit, 30.0);
}

#[test]
fn test_empty_selection() {
    let selection = Selection::empty();
    assert!(selection.is_empty());
    assert_eq!(selection.total_cost, 0.0);
    assert_eq!(selection.total_profit, 0.0);
}

#[test]
fn test_settings_defaults() {
    let settings = Settings::from_json("{}").unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.budget, 500.0);
    assert_eq!(settings.scale, 100);
    assert_eq!(settings.algorithm, Algorithm::Dynamic);
}

#[test]
fn test_settings_partial_json() {
    let settings = Settings::from_json(r#"{"budget": 300, "algorithm": "brute_force"}"#).unwrap();
    assert_eq!(settings.budget, 300.0);
    assert_eq!(settings.scale, 100);
    assert_eq!(settings.algorithm, Algorithm::BruteForce);
}

#[test]
fn test_settings_rejects_zero_scale() {
    assert!(Settings::from_json(r#"{"scale": 0}"#).is_err());
    assert!(Settings::from_json(r#"{"algorithm": "greedy"}"#).is_err());
}

#[test]
fn test_algorithm_from_str() {
    assert_eq!("dynamic".parse::<Algorithm>().unwrap(), Algorithm::Dynamic);
    assert_eq!(
        "brute-force".parse::<Algorithm>().unwrap(),
        Algorithm::BruteForce
    );
    assert!("greedy".parse::<Algorithm>().is_err());
    assert_eq!(Algorithm::BruteForce.to_string(), "brute_force");
}

#[test]
fn test_output_data_json_is_sorted() {
    let output = OutputData {
        algorithm: "dynamic".to_string(),
        budget: 50.0,
        scale: 100,
        elapsed_ms: 3,
        num_actions: 1,
        num_ignored: 0,
        num_malformed: 0,
        selection: Selection::from_indices(&[Action::new("X", 50.0, 20.0)], &[0]),
    };
    assert_eq!(
        jsonify(&output).unwrap(),
        r#"{"algorithm":"dynamic","budget":50.0,"elapsed_ms":3,"num_actions":1,"num_ignored":0,"num_malformed":0,"scale":100,"selection":{"actions":[{"cost":50.0,"index":0,"name":"X","profit":10.0}],"total_cost":50.0,"total_profit":10.0}}"#
    );
}
