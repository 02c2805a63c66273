pub mod grouping;
pub mod insights;
pub mod kpi;
pub mod stats;
pub mod temporal;

pub use grouping::{group_aggregate, CategoriaValor, GroupField, GroupMetric, SeriesOrder};
pub use insights::{top_insights, Insights};
pub use kpi::{compute_kpis, KpiSet};
pub use temporal::{temporal_bucket, Granularidade, PeriodoContagem};
