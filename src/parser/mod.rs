pub mod columns;
pub mod deserializers;
pub mod pipeline;
pub mod types;

pub use pipeline::{load_csv, parse_csv_reader, LoadOutput};
pub use types::{Ocorrencia, OcorrenciaRaw, ParseWarning};
