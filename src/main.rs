use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dash_ocorrencias::config::load_config;
use dash_ocorrencias::filter::FilterSpec;
use dash_ocorrencias::parser::{load_csv, LoadOutput};
use dash_ocorrencias::report::{build_relatorio, html::render_html};
use dash_ocorrencias::server::{serve, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about = "Análise de ocorrências de seguradora: relatório estático e dashboard interativo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Gera o relatório HTML estático a partir do CSV de ocorrências
    Report(ReportArgs),
    /// Sobe o dashboard interativo (página + API JSON + download CSV)
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Caminho do CSV de ocorrências
    input: PathBuf,

    /// Arquivo HTML de saída
    #[arg(short, long, default_value = "dashboard_ocorrencias.html")]
    output: PathBuf,

    /// Arquivo TOML de configuração (opcional)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    filtros: FiltroArgs,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Caminho do CSV de ocorrências
    input: PathBuf,

    /// Porta HTTP do dashboard
    #[arg(long, default_value_t = 3000)]
    porta: u16,

    /// Arquivo TOML de configuração (opcional)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Filter flags of the static report. Absent flag = no filter, matching the
/// "Todos" behavior of the interactive dashboard.
#[derive(Args, Debug)]
struct FiltroArgs {
    /// Início do intervalo de datas (AAAA-MM-DD, inclusivo)
    #[arg(long)]
    de: Option<NaiveDate>,

    /// Fim do intervalo de datas (AAAA-MM-DD, inclusivo)
    #[arg(long)]
    ate: Option<NaiveDate>,

    /// Filtra por tipo de problema
    #[arg(long)]
    tipo: Option<String>,

    /// Filtra por canal de entrada
    #[arg(long)]
    canal: Option<String>,

    /// Filtra por classificação
    #[arg(long)]
    classificacao: Option<String>,
}

impl From<FiltroArgs> for FilterSpec {
    fn from(args: FiltroArgs) -> Self {
        FilterSpec {
            de: args.de,
            ate: args.ate,
            tipo_problema: args.tipo,
            canal_entrada: args.canal,
            classificacao: args.classificacao,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Report(args) => {
            let config = load_config(args.config.as_deref())
                .context("Falha ao carregar a configuração")?;
            let carga = carregar(&args.input)?;

            let filtro: FilterSpec = args.filtros.into();
            let relatorio = build_relatorio(&carga.dataset, &filtro, &config);
            info!(
                "Relatório calculado: {} de {} registros selecionados",
                relatorio.meta.total_filtrado, relatorio.meta.total_geral
            );

            let html = render_html(&relatorio, &config);
            std::fs::write(&args.output, html)
                .with_context(|| format!("Falha ao gravar {}", args.output.display()))?;
            info!("Relatório gerado com sucesso: {}", args.output.display());
            Ok(())
        }
        Command::Serve(args) => {
            let config = load_config(args.config.as_deref())
                .context("Falha ao carregar a configuração")?;
            let carga = carregar(&args.input)?;

            let state = AppState::new(carga.dataset, config);
            serve(state, args.porta).await?;
            Ok(())
        }
    }
}

fn carregar(input: &std::path::Path) -> Result<LoadOutput> {
    let carga = load_csv(input)
        .with_context(|| format!("Falha ao carregar {}", input.display()))?;
    info!(
        "Dados carregados com sucesso: {} registros ({} linhas ignoradas, {} ms)",
        carga.dataset.len(),
        carga.skipped_rows,
        carga.parse_duration_ms
    );
    for aviso in &carga.warnings {
        warn!("Linha {}: {}", aviso.line, aviso.message);
    }
    Ok(carga)
}
