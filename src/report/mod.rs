pub mod html;

use chrono::NaiveDate;
use serde::Serialize;

use crate::analyzer::grouping::{group_aggregate, CategoriaValor, GroupField, GroupMetric, SeriesOrder};
use crate::analyzer::insights::{top_insights, Insights};
use crate::analyzer::kpi::{compute_kpis, KpiSet};
use crate::analyzer::temporal::{temporal_bucket, Granularidade, PeriodoContagem};
use crate::config::DashConfig;
use crate::dataset::Dataset;
use crate::filter::{apply_filters, FilterSpec};

/// Everything a presentation layer needs to render one report pass:
/// KPIs, grouped series, temporal series and insights over the filtered
/// snapshot. Built once per render, no state survives it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relatorio {
    pub meta: RelatorioMeta,
    pub kpis: KpiSet,
    pub por_tipo: Vec<CategoriaValor>,
    pub tempo_por_tipo: Vec<CategoriaValor>,
    pub por_canal: Vec<CategoriaValor>,
    pub tempo_por_canal: Vec<CategoriaValor>,
    pub por_setor: Vec<CategoriaValor>,
    pub evolucao_diaria: Vec<PeriodoContagem>,
    pub heatmap_mensal: Vec<PeriodoContagem>,
    pub insights: Insights,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatorioMeta {
    pub total_filtrado: usize,
    pub total_geral: usize,
    pub intervalo_datas: Option<(NaiveDate, NaiveDate)>,
    pub gerado_em: String,
}

/// Filter the snapshot and run the whole metrics pipeline over the view.
pub fn build_relatorio(dataset: &Dataset, filtro: &FilterSpec, config: &DashConfig) -> Relatorio {
    let visao = apply_filters(dataset, filtro);

    Relatorio {
        meta: RelatorioMeta {
            total_filtrado: visao.len(),
            total_geral: dataset.len(),
            intervalo_datas: visao.intervalo_datas(),
            gerado_em: chrono::Local::now().format("%d/%m/%Y às %H:%M").to_string(),
        },
        kpis: compute_kpis(&visao, config),
        por_tipo: group_aggregate(
            &visao,
            GroupField::TipoProblema,
            GroupMetric::Contagem,
            SeriesOrder::ValorDesc,
        ),
        tempo_por_tipo: group_aggregate(
            &visao,
            GroupField::TipoProblema,
            GroupMetric::TempoMedio,
            SeriesOrder::ValorDesc,
        ),
        por_canal: group_aggregate(
            &visao,
            GroupField::CanalEntrada,
            GroupMetric::Contagem,
            SeriesOrder::ValorDesc,
        ),
        tempo_por_canal: group_aggregate(
            &visao,
            GroupField::CanalEntrada,
            GroupMetric::TempoMedio,
            SeriesOrder::ValorDesc,
        ),
        por_setor: group_aggregate(
            &visao,
            GroupField::ResponsavelSetor,
            GroupMetric::Contagem,
            SeriesOrder::ValorDesc,
        ),
        evolucao_diaria: temporal_bucket(&visao, Granularidade::Diaria),
        heatmap_mensal: temporal_bucket(&visao, Granularidade::Mensal),
        insights: top_insights(&visao),
    }
}
