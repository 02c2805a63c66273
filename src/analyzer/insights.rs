use serde::Serialize;

use crate::analyzer::grouping::{group_aggregate, GroupField, GroupMetric, SeriesOrder};
use crate::analyzer::temporal::{temporal_bucket, Granularidade};
use crate::dataset::Dataset;

/// Automatic "top" insights of a (filtered) dataset. Each selection is None
/// when the dataset or its relevant group is empty, rendered as "N/A", never
/// an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    /// Most frequent `tipo_problema` (mode, lexicographic-first on ties).
    pub tipo_mais_comum: Option<String>,
    /// `canal_entrada` with the lowest mean resolution time.
    pub canal_mais_rapido: Option<String>,
    /// Most frequent `responsavel_setor` (mode, lexicographic-first on ties).
    pub setor_mais_demandado: Option<String>,
    /// Month key ("YYYY-MM") with the highest occurrence count; ties resolve
    /// to the earliest month.
    pub periodo_critico: Option<String>,
}

pub const NAO_DISPONIVEL: &str = "N/A";

impl Insights {
    /// Display form of a selection, degrading to "N/A".
    pub fn exibir(valor: &Option<String>) -> &str {
        valor.as_deref().unwrap_or(NAO_DISPONIVEL)
    }
}

/// Compute all four insights over the snapshot.
pub fn top_insights(dataset: &Dataset) -> Insights {
    Insights {
        tipo_mais_comum: moda(dataset, GroupField::TipoProblema),
        canal_mais_rapido: canal_mais_rapido(dataset),
        setor_mais_demandado: moda(dataset, GroupField::ResponsavelSetor),
        periodo_critico: periodo_critico(dataset),
    }
}

/// Mode of a categorical field. `ValorDesc` already breaks count ties by
/// category name ascending, so the first entry is the deterministic winner.
fn moda(dataset: &Dataset, campo: GroupField) -> Option<String> {
    group_aggregate(dataset, campo, GroupMetric::Contagem, SeriesOrder::ValorDesc)
        .into_iter()
        .next()
        .map(|cv| cv.categoria)
}

fn canal_mais_rapido(dataset: &Dataset) -> Option<String> {
    // Category-ascending order + strict less-than keeps the lexicographic
    // first on mean ties.
    let series = group_aggregate(
        dataset,
        GroupField::CanalEntrada,
        GroupMetric::TempoMedio,
        SeriesOrder::Categoria,
    );
    let mut melhor: Option<(String, f64)> = None;
    for cv in series {
        match &melhor {
            Some((_, valor)) if cv.valor >= *valor => {}
            _ => melhor = Some((cv.categoria, cv.valor)),
        }
    }
    melhor.map(|(categoria, _)| categoria)
}

fn periodo_critico(dataset: &Dataset) -> Option<String> {
    // Buckets come ascending by key; strict greater-than keeps the earliest
    // month on count ties.
    let mut melhor: Option<(String, i64)> = None;
    for bucket in temporal_bucket(dataset, Granularidade::Mensal) {
        match &melhor {
            Some((_, contagem)) if bucket.contagem <= *contagem => {}
            _ => melhor = Some((bucket.chave, bucket.contagem)),
        }
    }
    melhor.map(|(chave, _)| chave)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::types::Ocorrencia;

    fn ocorrencia(data: &str, tipo: &str, tempo: f64, canal: &str, setor: &str) -> Ocorrencia {
        Ocorrencia {
            data_ocorrencia: data.parse().unwrap(),
            tipo_problema: tipo.into(),
            tempo_resolucao: tempo,
            canal_entrada: canal.into(),
            classificacao: "moderada".into(),
            responsavel_setor: setor.into(),
            cliente_reincidente: "não".into(),
        }
    }

    fn amostra() -> Dataset {
        Dataset::new(vec![
            ocorrencia("2024-01-01", "Furto", 3.0, "App", "Sinistros"),
            ocorrencia("2024-01-02", "Furto", 7.0, "Telefone", "Atendimento"),
            ocorrencia("2024-02-01", "Colisão", 2.0, "App", "Sinistros"),
        ])
    }

    #[test]
    fn test_insights_reference_scenario() {
        let insights = top_insights(&amostra());
        assert_eq!(insights.tipo_mais_comum.as_deref(), Some("Furto"));
        // App: mean 2.5; Telefone: mean 7.0
        assert_eq!(insights.canal_mais_rapido.as_deref(), Some("App"));
        assert_eq!(insights.setor_mais_demandado.as_deref(), Some("Sinistros"));
        assert_eq!(insights.periodo_critico.as_deref(), Some("2024-01"));
    }

    #[test]
    fn test_empty_dataset_degrades_to_none() {
        let insights = top_insights(&Dataset::default());
        assert!(insights.tipo_mais_comum.is_none());
        assert!(insights.canal_mais_rapido.is_none());
        assert!(insights.setor_mais_demandado.is_none());
        assert!(insights.periodo_critico.is_none());
        assert_eq!(Insights::exibir(&insights.tipo_mais_comum), "N/A");
    }

    #[test]
    fn test_mode_tie_breaks_lexicographic() {
        let ds = Dataset::new(vec![
            ocorrencia("2024-01-01", "Roubo", 1.0, "App", "Sinistros"),
            ocorrencia("2024-01-02", "Avaria", 1.0, "App", "Sinistros"),
        ]);
        let insights = top_insights(&ds);
        assert_eq!(insights.tipo_mais_comum.as_deref(), Some("Avaria"));
    }

    #[test]
    fn test_fastest_channel_tie_breaks_lexicographic() {
        let ds = Dataset::new(vec![
            ocorrencia("2024-01-01", "Furto", 2.0, "Telefone", "Sinistros"),
            ocorrencia("2024-01-02", "Furto", 2.0, "App", "Sinistros"),
        ]);
        let insights = top_insights(&ds);
        assert_eq!(insights.canal_mais_rapido.as_deref(), Some("App"));
    }

    #[test]
    fn test_critical_period_tie_takes_earliest() {
        let ds = Dataset::new(vec![
            ocorrencia("2024-03-01", "Furto", 1.0, "App", "Sinistros"),
            ocorrencia("2024-01-01", "Furto", 1.0, "App", "Sinistros"),
        ]);
        let insights = top_insights(&ds);
        assert_eq!(insights.periodo_critico.as_deref(), Some("2024-01"));
    }
}
