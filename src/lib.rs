pub mod analyzer;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod parser;
pub mod report;
pub mod server;

// ─── E2E Integration Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod e2e_tests {
    use crate::analyzer::grouping::{group_aggregate, GroupField, GroupMetric, SeriesOrder};
    use crate::analyzer::kpi::compute_kpis;
    use crate::analyzer::temporal::{temporal_bucket, Granularidade};
    use crate::config::DashConfig;
    use crate::filter::{apply_filters, FilterSpec};
    use crate::parser::parse_csv_reader;
    use crate::report::{build_relatorio, html::render_html};

    const HDR: &str = "data_ocorrencia,tipo_problema,tempo_resolucao,canal_entrada,classificacao,responsavel_setor,cliente_reincidente";

    /// The reference scenario: three rows spanning two months.
    fn cenario_csv() -> String {
        format!(
            "{HDR}\n\
             2024-01-01,Furto,3,App,crítica,Sinistros,não\n\
             2024-01-02,Furto,7,Telefone,moderada,Atendimento,sim\n\
             2024-02-01,Colisão,2,App,crítica,Sinistros,não"
        )
    }

    /// E2E: load CSV → KPIs → grouped series → temporal buckets, checking the
    /// documented reference values end to end.
    #[test]
    fn test_e2e_load_and_aggregate_pipeline() {
        let out = parse_csv_reader(cenario_csv().as_bytes()).expect("CSV parsing failed");
        assert_eq!(out.dataset.len(), 3);
        assert_eq!(out.skipped_rows, 0);

        let config = DashConfig::default();
        let kpis = compute_kpis(&out.dataset, &config);
        assert_eq!(kpis.total_ocorrencias, 3);
        assert_eq!(kpis.tempo_medio_dias, 4.0);
        assert_eq!(kpis.pct_criticas, 66.7);
        assert_eq!(kpis.pct_reincidentes, 33.3);
        assert_eq!(kpis.pct_dentro_sla, 66.7);

        let por_tipo = group_aggregate(
            &out.dataset,
            GroupField::TipoProblema,
            GroupMetric::Contagem,
            SeriesOrder::ValorDesc,
        );
        assert_eq!(por_tipo.len(), 2);
        assert_eq!((por_tipo[0].categoria.as_str(), por_tipo[0].valor), ("Furto", 2.0));
        assert_eq!((por_tipo[1].categoria.as_str(), por_tipo[1].valor), ("Colisão", 1.0));

        let mensal = temporal_bucket(&out.dataset, Granularidade::Mensal);
        assert_eq!(mensal.len(), 2);
        assert_eq!((mensal[0].chave.as_str(), mensal[0].contagem), ("2024-01", 2));
        assert_eq!((mensal[1].chave.as_str(), mensal[1].contagem), ("2024-02", 1));
    }

    /// E2E: filter → report → HTML, verifying the filtered view flows into
    /// every output block.
    #[test]
    fn test_e2e_filtered_report_render() {
        let out = parse_csv_reader(cenario_csv().as_bytes()).unwrap();
        let config = DashConfig::default();

        let filtro = FilterSpec {
            canal_entrada: Some("App".into()),
            ..Default::default()
        };
        let relatorio = build_relatorio(&out.dataset, &filtro, &config);
        assert_eq!(relatorio.meta.total_filtrado, 2);
        assert_eq!(relatorio.meta.total_geral, 3);
        assert_eq!(relatorio.insights.canal_mais_rapido.as_deref(), Some("App"));

        let html = render_html(&relatorio, &config);
        assert!(html.contains("2 de 3 registros"));
        assert!(html.contains("grafico-heatmap"));
    }

    /// E2E: identity filter returns the whole dataset, and aggregation over
    /// the same snapshot twice yields identical results.
    #[test]
    fn test_e2e_identity_filter_and_idempotence() {
        let out = parse_csv_reader(cenario_csv().as_bytes()).unwrap();
        let config = DashConfig::default();

        let visao = apply_filters(&out.dataset, &FilterSpec::default());
        assert_eq!(visao.registros(), out.dataset.registros());

        let a = compute_kpis(&out.dataset, &config);
        let b = compute_kpis(&out.dataset, &config);
        assert_eq!(a, b);
    }

    /// E2E: malformed rows are skipped with warnings while the report for the
    /// surviving rows still renders (the partial-failure contract).
    #[test]
    fn test_e2e_partial_failure_still_renders() {
        let csv = format!(
            "{HDR}\n\
             2024-01-01,Furto,3,App,crítica,Sinistros,não\n\
             sem-data,Furto,x,App,crítica,Sinistros,não"
        );
        let out = parse_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(out.dataset.len(), 1);
        assert_eq!(out.skipped_rows, 1);
        assert_eq!(out.warnings.len(), 1);

        let config = DashConfig::default();
        let relatorio = build_relatorio(&out.dataset, &FilterSpec::default(), &config);
        let html = render_html(&relatorio, &config);
        assert!(html.contains("1 de 1 registros"));
    }

    /// E2E: the CSV export of a filtered view loads back into an equal
    /// dataset.
    #[test]
    fn test_e2e_export_round_trip() {
        let out = parse_csv_reader(cenario_csv().as_bytes()).unwrap();
        let filtro = FilterSpec {
            tipo_problema: Some("Furto".into()),
            ..Default::default()
        };
        let visao = apply_filters(&out.dataset, &filtro);

        let bytes = crate::export::export_csv(&visao).unwrap();
        let relido = parse_csv_reader(bytes.as_slice()).unwrap();
        assert_eq!(relido.dataset.registros(), visao.registros());
    }
}
