use std::io::Read;
use std::path::Path;
use std::time::Instant;

use crate::dataset::Dataset;
use crate::error::AppError;
use crate::parser::columns::{validate_columns, ColumnMap};
use crate::parser::deserializers::{parse_data, parse_tempo};
use crate::parser::types::{Ocorrencia, OcorrenciaRaw, ParseWarning};

/// Output of `load_csv`: the dataset snapshot plus load metadata for
/// logging and the report footer.
#[derive(Debug)]
pub struct LoadOutput {
    pub dataset: Dataset,
    pub warnings: Vec<ParseWarning>,
    pub total_rows: usize,
    pub skipped_rows: usize,
    pub detected_columns: Vec<String>,
    pub parse_duration_ms: u64,
}

/// Load the occurrence CSV at `path`.
/// The file's absence is reported as a named error before any read.
pub fn load_csv(path: &Path) -> Result<LoadOutput, AppError> {
    if !path.exists() {
        return Err(AppError::SourceNotFound(path.display().to_string()));
    }
    let file = std::fs::File::open(path)?;
    parse_csv_reader(std::io::BufReader::new(file))
}

/// Core parsing logic, accepting any `Read` source (useful for tests).
///
/// Phase 1 validates the header against the required schema; phase 2
/// normalizes records one by one. A malformed row becomes a warning and is
/// skipped, it never aborts the load.
pub fn parse_csv_reader<R: Read>(reader: R) -> Result<LoadOutput, AppError> {
    let start = Instant::now();

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    // Phase 1: validate columns
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(AppError::EmptyFile);
    }
    let col_map = ColumnMap::from_headers(&headers);
    validate_columns(&col_map)?;

    // Phase 2: parse and normalise records
    let mut ocorrencias: Vec<Ocorrencia> = Vec::new();
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut skipped = 0usize;
    let mut row_idx = 0usize;

    for result in rdr.records() {
        row_idx += 1;
        match result {
            Ok(record) => {
                let raw = record_to_raw(&col_map, &record);
                match normalize_ocorrencia(&raw) {
                    Ok(ocorrencia) => ocorrencias.push(ocorrencia),
                    Err(msg) => {
                        warnings.push(ParseWarning {
                            line: row_idx + 1, // +1 for the header row
                            message: msg,
                        });
                        skipped += 1;
                    }
                }
            }
            Err(err) => {
                warnings.push(ParseWarning {
                    line: row_idx + 1,
                    message: err.to_string(),
                });
                skipped += 1;
            }
        }
    }

    if row_idx == 0 {
        return Err(AppError::EmptyFile);
    }

    Ok(LoadOutput {
        dataset: Dataset::new(ocorrencias),
        warnings,
        total_rows: row_idx,
        skipped_rows: skipped,
        detected_columns: col_map.all_headers().to_vec(),
        parse_duration_ms: start.elapsed().as_millis() as u64,
    })
}

fn record_to_raw(col_map: &ColumnMap, record: &csv::StringRecord) -> OcorrenciaRaw {
    OcorrenciaRaw {
        data_ocorrencia: col_map.get(record, "data_ocorrencia").map(str::to_string),
        tipo_problema: col_map.get(record, "tipo_problema").map(str::to_string),
        tempo_resolucao: col_map.get(record, "tempo_resolucao").map(str::to_string),
        canal_entrada: col_map.get(record, "canal_entrada").map(str::to_string),
        classificacao: col_map.get(record, "classificacao").map(str::to_string),
        responsavel_setor: col_map
            .get(record, "responsavel_setor")
            .map(str::to_string),
        cliente_reincidente: col_map
            .get(record, "cliente_reincidente")
            .map(str::to_string),
    }
}

fn required_text(value: Option<&str>, campo: &str) -> Result<String, String> {
    let v = value.unwrap_or("").trim();
    if v.is_empty() {
        return Err(format!("Campo obrigatório vazio: {campo}"));
    }
    Ok(v.to_string())
}

fn normalize_ocorrencia(raw: &OcorrenciaRaw) -> Result<Ocorrencia, String> {
    let data_str = raw.data_ocorrencia.as_deref().unwrap_or("");
    let data_ocorrencia = parse_data(data_str)
        .ok_or_else(|| format!("Data de ocorrência inválida: {:?}", data_str.trim()))?;

    let tempo_str = raw.tempo_resolucao.as_deref().unwrap_or("");
    let tempo_resolucao = parse_tempo(tempo_str)
        .ok_or_else(|| format!("Tempo de resolução inválido: {:?}", tempo_str.trim()))?;

    let tipo_problema = required_text(raw.tipo_problema.as_deref(), "tipo_problema")?;
    let canal_entrada = required_text(raw.canal_entrada.as_deref(), "canal_entrada")?;
    let classificacao = required_text(raw.classificacao.as_deref(), "classificacao")?;
    let responsavel_setor = required_text(raw.responsavel_setor.as_deref(), "responsavel_setor")?;
    let cliente_reincidente = required_text(raw.cliente_reincidente.as_deref(), "cliente_reincidente")?
        .to_lowercase();

    Ok(Ocorrencia {
        data_ocorrencia,
        tipo_problema,
        tempo_resolucao,
        canal_entrada,
        classificacao,
        responsavel_setor,
        cliente_reincidente,
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────
