//! Configuration validation.
//!
//! Validates all config fields before any source is read.

use crate::domain::error::TariffscopeError;
use crate::domain::scenario::{DEFAULT_SLIDER_MAX, MAX_SLIDER_STEPS};
use crate::domain::tariff::{is_valid_rate, MAX_RATE};
use crate::domain::trade::TradeFlow;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TariffscopeError> {
    validate_data_config(config)?;
    validate_model_config(config)?;
    validate_report_config(config)?;
    validate_case_study_config(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), TariffscopeError> {
    for flow in TradeFlow::ALL {
        require_non_empty(config, "data", flow.key())?;
    }
    for key in ["state_column", "year"] {
        if let Some(value) = config.get_string("data", key) {
            if value.trim().is_empty() {
                return Err(TariffscopeError::config_invalid(
                    "data",
                    key,
                    format!("{key} must not be empty"),
                ));
            }
        }
    }
    Ok(())
}

pub fn validate_model_config(config: &dyn ConfigPort) -> Result<(), TariffscopeError> {
    if let Some(rate) = optional_number(config, "model", "tariff_rate")? {
        validate_rate(rate).map_err(|reason| {
            TariffscopeError::config_invalid("model", "tariff_rate", reason)
        })?;
    }
    if let Some(value) = optional_number(config, "model", "import_elasticity")? {
        // Imports must stay non-negative at a 100% tariff.
        if !(-1.0..=0.0).contains(&value) {
            return Err(TariffscopeError::config_invalid(
                "model",
                "import_elasticity",
                "import_elasticity must be between -1 and 0",
            ));
        }
    }
    if let Some(value) = optional_number(config, "model", "export_elasticity")? {
        if value < 0.0 {
            return Err(TariffscopeError::config_invalid(
                "model",
                "export_elasticity",
                "export_elasticity must be non-negative",
            ));
        }
    }
    Ok(())
}

pub fn validate_report_config(config: &dyn ConfigPort) -> Result<(), TariffscopeError> {
    let slider_max = optional_number(config, "report", "slider_max")?;
    if let Some(max) = slider_max {
        if !is_valid_rate(max) {
            return Err(TariffscopeError::config_invalid(
                "report",
                "slider_max",
                format!("slider_max must be between 0 and {MAX_RATE}"),
            ));
        }
    }
    if let Some(step) = optional_number(config, "report", "slider_step")? {
        if step <= 0.0 {
            return Err(TariffscopeError::config_invalid(
                "report",
                "slider_step",
                "slider_step must be positive",
            ));
        }
        let max = slider_max.unwrap_or(DEFAULT_SLIDER_MAX);
        if max / step > MAX_SLIDER_STEPS as f64 {
            return Err(TariffscopeError::config_invalid(
                "report",
                "slider_step",
                format!("slider_step {step} gives more than {MAX_SLIDER_STEPS} slider steps"),
            ));
        }
    }
    if let Some(value) = config.get_string("report", "show_ranking") {
        let lowered = value.trim().to_lowercase();
        if !matches!(lowered.as_str(), "true" | "false" | "yes" | "no" | "1" | "0") {
            return Err(TariffscopeError::config_invalid(
                "report",
                "show_ranking",
                format!("{value:?} is not a boolean"),
            ));
        }
    }
    Ok(())
}

pub fn validate_case_study_config(config: &dyn ConfigPort) -> Result<(), TariffscopeError> {
    let has_sources = TradeFlow::ALL
        .iter()
        .any(|f| config.has_key("case_study", f.key()));
    if has_sources {
        require_non_empty(config, "case_study", "state")?;
    }
    if let Some(raw) = config.get_string("case_study", "top_n") {
        let parsed = raw.trim().parse::<i64>();
        if !matches!(parsed, Ok(n) if n >= 1) {
            return Err(TariffscopeError::config_invalid(
                "case_study",
                "top_n",
                "top_n must be a positive integer",
            ));
        }
    }
    Ok(())
}

/// Rate check shared by config validation and the `--rate` flag.
pub fn validate_rate(rate: f64) -> Result<(), String> {
    if is_valid_rate(rate) {
        Ok(())
    } else {
        Err(format!("tariff rate {rate} is outside 0..={MAX_RATE}"))
    }
}

fn require_non_empty(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, TariffscopeError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(TariffscopeError::config_missing(section, key)),
    }
}

/// A present key must parse as a number; an absent key is `None`.
fn optional_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, TariffscopeError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<f64>().map(Some).map_err(|_| {
            TariffscopeError::config_invalid(section, key, format!("{raw:?} is not a number"))
        }),
    }
}
