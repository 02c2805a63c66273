use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

use crate::analyzer::kpi::round1;
use crate::dataset::Dataset;
use crate::parser::types::Ocorrencia;

/// Categorical field a series can group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    TipoProblema,
    CanalEntrada,
    Classificacao,
    ResponsavelSetor,
}

impl GroupField {
    pub fn valor<'a>(&self, o: &'a Ocorrencia) -> &'a str {
        match self {
            GroupField::TipoProblema => &o.tipo_problema,
            GroupField::CanalEntrada => &o.canal_entrada,
            GroupField::Classificacao => &o.classificacao,
            GroupField::ResponsavelSetor => &o.responsavel_setor,
        }
    }
}

impl FromStr for GroupField {
    type Err = String;

    /// Accepts both the column name and the short query-parameter form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tipo" | "tipo_problema" => Ok(GroupField::TipoProblema),
            "canal" | "canal_entrada" => Ok(GroupField::CanalEntrada),
            "classificacao" => Ok(GroupField::Classificacao),
            "setor" | "responsavel_setor" => Ok(GroupField::ResponsavelSetor),
            _ => Err(format!("Campo de agrupamento desconhecido: {s}")),
        }
    }
}

/// Aggregate computed per category partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupMetric {
    #[default]
    Contagem,
    TempoMedio,
}

impl FromStr for GroupMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contagem" => Ok(GroupMetric::Contagem),
            "tempo_medio" => Ok(GroupMetric::TempoMedio),
            _ => Err(format!("Métrica desconhecida: {s}")),
        }
    }
}

/// Ordering of the resulting series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesOrder {
    /// Descending value, for ranked bar views. Ties break by category name.
    #[default]
    ValorDesc,
    /// Ascending category name, for stable axes.
    Categoria,
}

impl FromStr for SeriesOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "valor" | "valor_desc" => Ok(SeriesOrder::ValorDesc),
            "categoria" => Ok(SeriesOrder::Categoria),
            _ => Err(format!("Ordenação desconhecida: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriaValor {
    pub categoria: String,
    pub valor: f64,
}

/// Partition the dataset by the distinct values of `campo` and compute
/// `metrica` per partition. The category set is exactly what the snapshot
/// contains: no assumed universe, no silently dropped category.
pub fn group_aggregate(
    dataset: &Dataset,
    campo: GroupField,
    metrica: GroupMetric,
    ordem: SeriesOrder,
) -> Vec<CategoriaValor> {
    // BTreeMap keys give the category-ascending order for free
    let mut particoes: BTreeMap<&str, (i64, f64)> = BTreeMap::new();
    for o in dataset.iter() {
        let entrada = particoes.entry(campo.valor(o)).or_insert((0, 0.0));
        entrada.0 += 1;
        entrada.1 += o.tempo_resolucao;
    }

    let mut series: Vec<CategoriaValor> = particoes
        .into_iter()
        .map(|(categoria, (contagem, soma))| {
            let valor = match metrica {
                GroupMetric::Contagem => contagem as f64,
                GroupMetric::TempoMedio => round1(soma / contagem as f64),
            };
            CategoriaValor {
                categoria: categoria.to_string(),
                valor,
            }
        })
        .collect();

    if ordem == SeriesOrder::ValorDesc {
        series.sort_by(|a, b| {
            b.valor
                .partial_cmp(&a.valor)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.categoria.cmp(&b.categoria))
        });
    }
    series
}
