use serde::{Deserialize, Serialize};
use simple_error::{try_with, SimpleError, SimpleResult};

use crate::pyramid::DEFAULT_SCALES;
use crate::types::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentParams {
    pub scales: Vec<f64>,
    pub stride_params: StrideParams,
    pub sim_time: f64,
    pub technical_params: TechnicalParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrideParams {
    pub delta_row: usize,
    pub delta_col: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalParams {
    pub num_threads: Option<usize>,
}

impl ExperimentParams {
    pub fn from_yaml_str(yaml: &str) -> SimpleResult<Self> {
        let params: ExperimentParams =
            try_with!(serde_yaml::from_str(yaml), "invalid experiment parameters yaml");
        try_with!(
            validate_experiment_params(&params),
            "invalid experiment parameters"
        );
        Ok(params)
    }
}

impl Default for ExperimentParams {
    fn default() -> Self {
        Self {
            scales: DEFAULT_SCALES.to_vec(),
            stride_params: StrideParams::default(),
            sim_time: 50.0,
            technical_params: TechnicalParams::default(),
        }
    }
}

impl Default for StrideParams {
    fn default() -> Self {
        Self {
            delta_row: 4,
            delta_col: 4,
        }
    }
}

impl Default for TechnicalParams {
    fn default() -> Self {
        Self {
            num_threads: Some(1),
        }
    }
}

pub fn validate_experiment_params(params: &ExperimentParams) -> Result<(), SimpleError> {
    validate_scales(&params.scales)?;
    validate_stride_params(&params.stride_params)?;

    if !(params.sim_time > 0.0) {
        return Err(SimpleError::new("sim_time must be strictly positive"));
    }

    validate_technical_params(&params.technical_params)?;

    Ok(())
}

fn validate_scales(scales: &[f64]) -> Result<(), SimpleError> {
    if scales.is_empty() {
        return Err(SimpleError::new("at least one scale is required"));
    }

    let mut seen_scales = HashSet::default();

    for scale in scales {
        if !(*scale > 0.0 && *scale <= 1.0) {
            return Err(SimpleError::new(format!(
                "scale must be in (0, 1], got {}",
                scale
            )));
        }

        if !seen_scales.insert(scale.to_bits()) {
            return Err(SimpleError::new(format!("duplicate scale {}", scale)));
        }
    }

    Ok(())
}

fn validate_stride_params(stride_params: &StrideParams) -> Result<(), SimpleError> {
    if stride_params.delta_row == 0 {
        return Err(SimpleError::new("delta_row must be strictly positive"));
    }

    if stride_params.delta_col == 0 {
        return Err(SimpleError::new("delta_col must be strictly positive"));
    }

    Ok(())
}

fn validate_technical_params(technical_params: &TechnicalParams) -> Result<(), SimpleError> {
    if let Some(num_threads) = technical_params.num_threads {
        if num_threads == 0 {
            return Err(SimpleError::new("num_threads must be strictly positive"));
        }

        if num_cpus::get() < num_threads {
            return Err(SimpleError::new(
                "num_threads must not be greater than number of available CPUs",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::util::test_util;

    #[test]
    fn valid_params() {
        let params = test_util::get_template_experiment_params();
        assert!(validate_experiment_params(&params).is_ok());
    }

    #[test]
    fn default_params_are_valid() {
        let params = ExperimentParams::default();
        assert!(validate_experiment_params(&params).is_ok());
        assert_eq!(params.scales, vec![1.0, 0.71, 0.5, 0.35, 0.25]);
    }

    #[test]
    fn no_scales() {
        let mut params = test_util::get_template_experiment_params();
        params.scales.clear();
        let result = validate_experiment_params(&params);

        assert!(result.is_err());

        assert_eq!(result.unwrap_err().as_str(), "at least one scale is required");
    }

    #[test]
    fn zero_scale() {
        let mut params = test_util::get_template_experiment_params();
        params.scales[1] = 0.0;
        let result = validate_experiment_params(&params);

        assert_eq!(result.unwrap_err().as_str(), "scale must be in (0, 1], got 0");
    }

    #[test]
    fn too_high_scale() {
        let mut params = test_util::get_template_experiment_params();
        params.scales[0] = 1.5;
        let result = validate_experiment_params(&params);

        assert_eq!(
            result.unwrap_err().as_str(),
            "scale must be in (0, 1], got 1.5"
        );
    }

    #[test]
    fn duplicate_scale() {
        let mut params = test_util::get_template_experiment_params();
        params.scales.push(0.5);
        let result = validate_experiment_params(&params);

        assert_eq!(result.unwrap_err().as_str(), "duplicate scale 0.5");
    }

    #[test]
    fn zero_delta_row() {
        let mut params = test_util::get_template_experiment_params();
        params.stride_params.delta_row = 0;
        let result = validate_experiment_params(&params);

        assert_eq!(
            result.unwrap_err().as_str(),
            "delta_row must be strictly positive"
        );
    }

    #[test]
    fn zero_delta_col() {
        let mut params = test_util::get_template_experiment_params();
        params.stride_params.delta_col = 0;
        let result = validate_experiment_params(&params);

        assert_eq!(
            result.unwrap_err().as_str(),
            "delta_col must be strictly positive"
        );
    }

    #[test]
    fn zero_sim_time() {
        let mut params = test_util::get_template_experiment_params();
        params.sim_time = 0.0;
        let result = validate_experiment_params(&params);

        assert_eq!(
            result.unwrap_err().as_str(),
            "sim_time must be strictly positive"
        );
    }

    #[test]
    fn zero_num_threads() {
        let mut params = test_util::get_template_experiment_params();
        params.technical_params.num_threads = Some(0);
        let result = validate_experiment_params(&params);

        assert_eq!(
            result.unwrap_err().as_str(),
            "num_threads must be strictly positive"
        );
    }

    #[test]
    fn too_high_num_threads() {
        let mut params = test_util::get_template_experiment_params();
        params.technical_params.num_threads = Some(num_cpus::get() + 1);
        let result = validate_experiment_params(&params);

        assert!(result.is_err());

        assert_eq!(
            result.unwrap_err().as_str(),
            "num_threads must not be greater than number of available CPUs"
        );
    }

    #[test]
    fn from_yaml() {
        let yaml = r#"
scales: [1.0, 0.5]
stride_params:
  delta_row: 3
  delta_col: 5
sim_time: 25.0
technical_params:
  num_threads: null
"#;
        let params = ExperimentParams::from_yaml_str(yaml).unwrap();
        assert_eq!(params.stride_params.delta_row, 3);
        assert_eq!(params.stride_params.delta_col, 5);
        assert_eq!(params.technical_params.num_threads, None);
    }

    #[test]
    fn from_yaml_invalid_params() {
        let yaml = r#"
scales: []
stride_params:
  delta_row: 3
  delta_col: 5
sim_time: 25.0
technical_params:
  num_threads: 1
"#;
        assert_eq!(
            ExperimentParams::from_yaml_str(yaml).unwrap_err().as_str(),
            "invalid experiment parameters, at least one scale is required"
        );
    }

    #[test]
    fn from_yaml_malformed() {
        let result = ExperimentParams::from_yaml_str("scales: [1.0");
        assert!(result
            .unwrap_err()
            .as_str()
            .starts_with("invalid experiment parameters yaml, "));
    }
}
