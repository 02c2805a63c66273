use chrono::NaiveDate;
use serde::Deserialize;

use crate::dataset::Dataset;
use crate::parser::types::Ocorrencia;

/// Conjunction of optional predicates over the dataset.
///
/// Every field is an explicit `Option`; `None` means "match all", replacing
/// the "Todos" sentinel strings of the original dashboards. The date range is
/// inclusive on both ends. Field names double as HTTP query parameters.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FilterSpec {
    /// Start of the inclusive date range.
    pub de: Option<NaiveDate>,
    /// End of the inclusive date range.
    pub ate: Option<NaiveDate>,
    #[serde(rename = "tipo")]
    pub tipo_problema: Option<String>,
    #[serde(rename = "canal")]
    pub canal_entrada: Option<String>,
    pub classificacao: Option<String>,
}

impl FilterSpec {
    /// True when no predicate is active, i.e. filtering is the identity.
    pub fn is_identity(&self) -> bool {
        self.de.is_none()
            && self.ate.is_none()
            && ativo(&self.tipo_problema).is_none()
            && ativo(&self.canal_entrada).is_none()
            && ativo(&self.classificacao).is_none()
    }

    fn matches(&self, o: &Ocorrencia) -> bool {
        if let Some(de) = self.de {
            if o.data_ocorrencia < de {
                return false;
            }
        }
        if let Some(ate) = self.ate {
            if o.data_ocorrencia > ate {
                return false;
            }
        }
        if let Some(tipo) = ativo(&self.tipo_problema) {
            if o.tipo_problema != tipo {
                return false;
            }
        }
        if let Some(canal) = ativo(&self.canal_entrada) {
            if o.canal_entrada != canal {
                return false;
            }
        }
        if let Some(classificacao) = ativo(&self.classificacao) {
            if o.classificacao != classificacao {
                return false;
            }
        }
        true
    }
}

/// An empty string (e.g. `?tipo=` in a query) counts as "no filter".
fn ativo(valor: &Option<String>) -> Option<&str> {
    valor.as_deref().filter(|v| !v.is_empty())
}

/// Apply every active predicate (logical AND), producing a new snapshot.
/// The input dataset is never mutated; an empty result is valid.
pub fn apply_filters(dataset: &Dataset, filtro: &FilterSpec) -> Dataset {
    Dataset::new(
        dataset
            .iter()
            .filter(|o| filtro.matches(o))
            .cloned()
            .collect(),
    )
}
