use chrono::NaiveDate;

use crate::parser::types::Ocorrencia;

/// Immutable snapshot of loaded occurrences.
///
/// Every pipeline function borrows the snapshot and never mutates it;
/// filtering builds a new `Dataset`. A server run shares one snapshot behind
/// an `Arc` across sessions.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    ocorrencias: Vec<Ocorrencia>,
}

impl Dataset {
    pub fn new(ocorrencias: Vec<Ocorrencia>) -> Self {
        Dataset { ocorrencias }
    }

    pub fn len(&self) -> usize {
        self.ocorrencias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ocorrencias.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ocorrencia> {
        self.ocorrencias.iter()
    }

    /// Records in insertion order (display order; aggregation ignores it).
    pub fn registros(&self) -> &[Ocorrencia] {
        &self.ocorrencias
    }

    /// Earliest and latest occurrence dates, or None when empty.
    pub fn intervalo_datas(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.ocorrencias.iter().map(|o| o.data_ocorrencia).min()?;
        let max = self.ocorrencias.iter().map(|o| o.data_ocorrencia).max()?;
        Some((min, max))
    }

    /// Distinct values of a categorical field, sorted ascending.
    pub fn valores_distintos<F>(&self, campo: F) -> Vec<String>
    where
        F: Fn(&Ocorrencia) -> &str,
    {
        let mut valores: std::collections::BTreeSet<&str> =
            self.ocorrencias.iter().map(|o| campo(o)).collect();
        valores.into_iter().map(str::to_string).collect()
    }
}
