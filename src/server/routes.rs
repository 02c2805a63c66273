use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::analyzer::grouping::{group_aggregate, CategoriaValor, GroupField, GroupMetric, SeriesOrder};
use crate::analyzer::insights::{top_insights, Insights};
use crate::analyzer::kpi::{compute_kpis, KpiSet};
use crate::analyzer::temporal::{temporal_bucket, Granularidade, PeriodoContagem};
use crate::export::export_csv;
use crate::filter::{apply_filters, FilterSpec};
use crate::report::{build_relatorio, html::render_html};

use super::state::AppState;

/// The HTML dashboard page for the filtered snapshot.
pub async fn pagina(
    State(state): State<AppState>,
    Query(filtro): Query<FilterSpec>,
) -> Html<String> {
    let relatorio = build_relatorio(&state.dataset, &filtro, &state.config);
    Html(render_html(&relatorio, &state.config))
}

pub async fn kpis(
    State(state): State<AppState>,
    Query(filtro): Query<FilterSpec>,
) -> Json<KpiSet> {
    let visao = apply_filters(&state.dataset, &filtro);
    Json(compute_kpis(&visao, &state.config))
}

pub async fn insights(
    State(state): State<AppState>,
    Query(filtro): Query<FilterSpec>,
) -> Json<Insights> {
    let visao = apply_filters(&state.dataset, &filtro);
    Json(top_insights(&visao))
}

#[derive(Debug, Default, Deserialize)]
pub struct SerieParams {
    pub metrica: Option<String>,
    pub ordem: Option<String>,
}

/// Grouped series for one categorical field. Unknown field, metric or order
/// names are client errors.
pub async fn serie(
    State(state): State<AppState>,
    Path(campo): Path<String>,
    Query(filtro): Query<FilterSpec>,
    Query(params): Query<SerieParams>,
) -> Result<Json<Vec<CategoriaValor>>, (StatusCode, String)> {
    let campo: GroupField = campo.parse().map_err(bad_request)?;
    let metrica: GroupMetric = match params.metrica.as_deref() {
        None => GroupMetric::default(),
        Some(m) => m.parse().map_err(bad_request)?,
    };
    let ordem: SeriesOrder = match params.ordem.as_deref() {
        None => SeriesOrder::default(),
        Some(o) => o.parse().map_err(bad_request)?,
    };

    let visao = apply_filters(&state.dataset, &filtro);
    Ok(Json(group_aggregate(&visao, campo, metrica, ordem)))
}

#[derive(Debug, Default, Deserialize)]
pub struct TemporalParams {
    pub granularidade: Option<String>,
}

pub async fn temporal(
    State(state): State<AppState>,
    Query(filtro): Query<FilterSpec>,
    Query(params): Query<TemporalParams>,
) -> Result<Json<Vec<PeriodoContagem>>, (StatusCode, String)> {
    let granularidade: Granularidade = match params.granularidade.as_deref() {
        None => Granularidade::default(),
        Some(g) => g.parse().map_err(bad_request)?,
    };
    let visao = apply_filters(&state.dataset, &filtro);
    Ok(Json(temporal_bucket(&visao, granularidade)))
}

/// Distinct filter values of the full snapshot, what the interactive
/// dashboard offers in its sidebar selects, plus the full date range.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Opcoes {
    pub tipos_problema: Vec<String>,
    pub canais_entrada: Vec<String>,
    pub classificacoes: Vec<String>,
    pub setores: Vec<String>,
    pub intervalo_datas: Option<(NaiveDate, NaiveDate)>,
    pub total_registros: usize,
}

pub async fn opcoes(State(state): State<AppState>) -> Json<Opcoes> {
    let ds = &state.dataset;
    Json(Opcoes {
        tipos_problema: ds.valores_distintos(|o| &o.tipo_problema),
        canais_entrada: ds.valores_distintos(|o| &o.canal_entrada),
        classificacoes: ds.valores_distintos(|o| &o.classificacao),
        setores: ds.valores_distintos(|o| &o.responsavel_setor),
        intervalo_datas: ds.intervalo_datas(),
        total_registros: ds.len(),
    })
}

/// Filtered dataset as a CSV download.
pub async fn exportar(
    State(state): State<AppState>,
    Query(filtro): Query<FilterSpec>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let visao = apply_filters(&state.dataset, &filtro);
    let bytes = export_csv(&visao).map_err(|e| {
        error!("Falha ao exportar CSV: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"ocorrencias_filtradas.csv\"",
            ),
        ],
        bytes,
    ))
}

fn bad_request(msg: String) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, msg)
}
