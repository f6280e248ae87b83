use hmax_invariance::params::ExperimentParams;

pub fn get_scenario_params() -> ExperimentParams {
    let params_yaml_str = r#"
scales:
- 1.0
- 0.71
- 0.5
- 0.35
- 0.25
stride_params:
  delta_row: 4
  delta_col: 4
sim_time: 50.0
technical_params:
  num_threads: null
"#;

    ExperimentParams::from_yaml_str(params_yaml_str).unwrap()
}
