use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::dataset::Dataset;

/// Temporal bucket width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularidade {
    /// One bucket per calendar day, for short-range trend views.
    #[default]
    Diaria,
    /// One bucket per (year, month), for heatmap views.
    Mensal,
}

impl FromStr for Granularidade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dia" | "diaria" => Ok(Granularidade::Diaria),
            "mes" | "mensal" => Ok(Granularidade::Mensal),
            _ => Err(format!("Granularidade desconhecida: {s}")),
        }
    }
}

/// One temporal bucket. `chave` sorts chronologically ("2024-01-15" or
/// "2024-01"); `rotulo` is the display label ("15/01" or "Janeiro 2024").
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodoContagem {
    pub chave: String,
    pub rotulo: String,
    pub contagem: i64,
}

/// Bucket the dataset by day or month, ascending by period key.
///
/// Only periods with at least one record appear; gaps are NOT filled with
/// zero-count buckets; a consumer wanting a contiguous axis post-processes
/// the series.
pub fn temporal_bucket(dataset: &Dataset, granularidade: Granularidade) -> Vec<PeriodoContagem> {
    match granularidade {
        Granularidade::Diaria => bucket_diario(dataset),
        Granularidade::Mensal => bucket_mensal(dataset),
    }
}

fn bucket_diario(dataset: &Dataset) -> Vec<PeriodoContagem> {
    let mut contagens: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for o in dataset.iter() {
        *contagens.entry(o.data_ocorrencia).or_insert(0) += 1;
    }
    contagens
        .into_iter()
        .map(|(dia, contagem)| PeriodoContagem {
            chave: dia.format("%Y-%m-%d").to_string(),
            rotulo: format!("{:02}/{:02}", dia.day(), dia.month()),
            contagem,
        })
        .collect()
}

fn bucket_mensal(dataset: &Dataset) -> Vec<PeriodoContagem> {
    let mut contagens: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for o in dataset.iter() {
        let chave = (o.data_ocorrencia.year(), o.data_ocorrencia.month());
        *contagens.entry(chave).or_insert(0) += 1;
    }
    contagens
        .into_iter()
        .map(|((ano, mes), contagem)| PeriodoContagem {
            chave: format!("{ano:04}-{mes:02}"),
            rotulo: format!("{} {ano}", nome_mes(mes)),
            contagem,
        })
        .collect()
}

pub fn nome_mes(mes: u32) -> &'static str {
    match mes {
        1 => "Janeiro",
        2 => "Fevereiro",
        3 => "Março",
        4 => "Abril",
        5 => "Maio",
        6 => "Junho",
        7 => "Julho",
        8 => "Agosto",
        9 => "Setembro",
        10 => "Outubro",
        11 => "Novembro",
        12 => "Dezembro",
        _ => "Desconhecido",
    }
}
