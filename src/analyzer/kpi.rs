use serde::Serialize;

use crate::analyzer::stats::{media, percentil};
use crate::config::DashConfig;
use crate::dataset::Dataset;

/// Scalar KPIs of a (filtered) dataset. Percentages are rounded to one
/// decimal; an empty dataset yields zeros everywhere, never NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSet {
    pub total_ocorrencias: i64,
    pub tempo_medio_dias: f64,
    pub mediana_dias: f64,
    pub p90_dias: f64,
    pub pct_criticas: f64,
    pub criticas_count: i64,
    pub pct_reincidentes: f64,
    pub reincidentes_count: i64,
    pub pct_dentro_sla: f64,
}

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub(crate) fn pct(count: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round1(count as f64 / total as f64 * 100.0)
    }
}

/// Compute every scalar KPI in one pass over the snapshot.
pub fn compute_kpis(dataset: &Dataset, config: &DashConfig) -> KpiSet {
    let total = dataset.len() as i64;
    let tempos: Vec<f64> = dataset.iter().map(|o| o.tempo_resolucao).collect();

    let criticas = dataset
        .iter()
        .filter(|o| o.classificacao == config.classificacao_critica)
        .count() as i64;
    let reincidentes = dataset
        .iter()
        .filter(|o| o.cliente_reincidente == config.valor_reincidente)
        .count() as i64;
    let dentro_sla = dataset
        .iter()
        .filter(|o| o.tempo_resolucao <= config.sla_dias)
        .count() as i64;

    KpiSet {
        total_ocorrencias: total,
        tempo_medio_dias: round1(media(&tempos)),
        mediana_dias: round1(percentil(&tempos, 50.0)),
        p90_dias: round1(percentil(&tempos, 90.0)),
        pct_criticas: pct(criticas, total),
        criticas_count: criticas,
        pct_reincidentes: pct(reincidentes, total),
        reincidentes_count: reincidentes,
        pct_dentro_sla: pct(dentro_sla, total),
    }
}
