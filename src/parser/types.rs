use chrono::NaiveDate;
use serde::Serialize;

/// One CSV row as read, before validation. Fields mirror the source columns;
/// `None` means the column was absent from the record.
#[derive(Debug, Clone, Default)]
pub struct OcorrenciaRaw {
    pub data_ocorrencia: Option<String>,
    pub tipo_problema: Option<String>,
    pub tempo_resolucao: Option<String>,
    pub canal_entrada: Option<String>,
    pub classificacao: Option<String>,
    pub responsavel_setor: Option<String>,
    pub cliente_reincidente: Option<String>,
}

/// A validated, normalized occurrence record.
///
/// `cliente_reincidente` is lowercased at parse time so downstream comparisons
/// against "sim" are exact; the other categoricals keep their original casing
/// because they feed chart labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ocorrencia {
    pub data_ocorrencia: NaiveDate,
    pub tipo_problema: String,
    pub tempo_resolucao: f64,
    pub canal_entrada: String,
    pub classificacao: String,
    pub responsavel_setor: String,
    pub cliente_reincidente: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}
