use crate::dataset::Dataset;
use crate::error::AppError;

/// Column order of the exported CSV, identical to the input schema.
const COLUNAS: &[&str] = &[
    "data_ocorrencia",
    "tipo_problema",
    "tempo_resolucao",
    "canal_entrada",
    "classificacao",
    "responsavel_setor",
    "cliente_reincidente",
];

/// Serialize the (filtered) snapshot back to CSV bytes for download.
pub fn export_csv(dataset: &Dataset) -> Result<Vec<u8>, AppError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(COLUNAS)?;

    for o in dataset.iter() {
        wtr.write_record(&[
            o.data_ocorrencia.format("%Y-%m-%d").to_string(),
            o.tipo_problema.clone(),
            o.tempo_resolucao.to_string(),
            o.canal_entrada.clone(),
            o.classificacao.clone(),
            o.responsavel_setor.clone(),
            o.cliente_reincidente.clone(),
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::Custom(format!("Erro ao finalizar CSV: {e}")))
}
