use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Runtime configuration: thresholds and labels driving the KPI and insight
/// calculations. Every field has a default matching the reference dataset;
/// a TOML file can override any subset of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// SLA threshold in days. Resolutions at or below count as "dentro do SLA".
    pub sla_dias: f64,
    /// Value of `classificacao` that marks a critical occurrence.
    pub classificacao_critica: String,
    /// Value of `cliente_reincidente` that marks a repeat customer.
    pub valor_reincidente: String,
    /// Report / dashboard page title.
    pub titulo: String,
}

impl Default for DashConfig {
    fn default() -> Self {
        DashConfig {
            sla_dias: 5.0,
            classificacao_critica: "crítica".into(),
            valor_reincidente: "sim".into(),
            titulo: "Dashboard de Análise de Ocorrências - Seguradora".into(),
        }
    }
}

/// Load the configuration, merging `path` (TOML) over the defaults.
/// `None` returns the defaults unchanged.
pub fn load_config(path: Option<&Path>) -> Result<DashConfig, AppError> {
    match path {
        None => Ok(DashConfig::default()),
        Some(p) => {
            let raw = std::fs::read_to_string(p)?;
            Ok(toml::from_str(&raw)?)
        }
    }
}
