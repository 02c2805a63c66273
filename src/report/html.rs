use serde_json::{json, Value};
use tracing::warn;

use crate::analyzer::grouping::CategoriaValor;
use crate::analyzer::insights::Insights;
use crate::analyzer::temporal::{nome_mes, PeriodoContagem};
use crate::config::DashConfig;
use crate::error::AppError;

use super::Relatorio;

/// Render the report as a self-contained HTML document (Plotly from CDN).
///
/// Each chart payload is serialized independently: a failing chart is
/// skipped and recorded in the warnings section, the rest of the document
/// still renders.
pub fn render_html(relatorio: &Relatorio, config: &DashConfig) -> String {
    let (graficos, avisos) = render_charts(relatorio);

    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{titulo}</title>
    <script src="https://cdn.plot.ly/plotly-2.35.2.min.js" charset="utf-8"></script>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1>{titulo}</h1>
        {kpis}
        {graficos}
        {insights}
        {avisos}
        {rodape}
    </div>
</body>
</html>"#,
        titulo = escape_html(&config.titulo),
        css = inline_css(),
        kpis = render_kpi_cards(relatorio, config),
        graficos = graficos,
        insights = render_insights(relatorio, config),
        avisos = render_avisos(&avisos),
        rodape = render_rodape(relatorio),
    )
}

// ─── KPI cards ───────────────────────────────────────────────────────────────

fn render_kpi_cards(relatorio: &Relatorio, config: &DashConfig) -> String {
    let kpis = &relatorio.kpis;
    let cartoes = [
        ("Total de Ocorrências", format!("{}", kpis.total_ocorrencias), String::new()),
        (
            "Tempo Médio (dias)",
            format!("{:.1}", kpis.tempo_medio_dias),
            format!("mediana {:.1} · p90 {:.1}", kpis.mediana_dias, kpis.p90_dias),
        ),
        (
            "% Casos Críticos",
            format!("{:.1}%", kpis.pct_criticas),
            format!("{} casos", kpis.criticas_count),
        ),
        (
            "% Reincidentes",
            format!("{:.1}%", kpis.pct_reincidentes),
            format!("{} casos", kpis.reincidentes_count),
        ),
        (
            "% Dentro do SLA",
            format!("{:.1}%", kpis.pct_dentro_sla),
            format!("SLA ≤ {:.0} dias", config.sla_dias),
        ),
    ];

    let mut html = String::from("<section class=\"kpis\"><h2>Indicadores Principais</h2><div class=\"cards\">");
    for (rotulo, valor, detalhe) in cartoes {
        html.push_str(&format!(
            "<div class=\"card\"><div class=\"card-valor\">{}</div><div class=\"card-rotulo\">{}</div><div class=\"card-detalhe\">{}</div></div>",
            escape_html(&valor),
            escape_html(rotulo),
            escape_html(&detalhe),
        ));
    }
    html.push_str("</div></section>");
    html
}

// ─── Charts ──────────────────────────────────────────────────────────────────

fn render_charts(relatorio: &Relatorio) -> (String, Vec<String>) {
    let graficos: Vec<(&str, &str, Result<Value, AppError>)> = vec![
        (
            "grafico-tipos",
            "Ocorrências por Tipo de Problema",
            grafico_barras(&relatorio.por_tipo, "Quantidade"),
        ),
        (
            "grafico-tempo-tipo",
            "Tempo Médio de Resolução por Tipo",
            grafico_barras(&relatorio.tempo_por_tipo, "Dias"),
        ),
        (
            "grafico-canais",
            "Distribuição por Canal de Entrada",
            grafico_pizza(&relatorio.por_canal),
        ),
        (
            "grafico-tempo-canal",
            "Tempo Médio por Canal",
            grafico_barras(&relatorio.tempo_por_canal, "Dias"),
        ),
        (
            "grafico-setores",
            "Ocorrências por Setor Responsável",
            grafico_barras(&relatorio.por_setor, "Quantidade"),
        ),
        (
            "grafico-evolucao",
            "Evolução Diária das Ocorrências",
            grafico_linha(&relatorio.evolucao_diaria),
        ),
        (
            "grafico-heatmap",
            "Heatmap Mensal de Ocorrências",
            grafico_heatmap(&relatorio.heatmap_mensal),
        ),
    ];

    let mut html = String::new();
    let mut avisos = Vec::new();
    for (id, titulo, resultado) in graficos {
        match resultado.and_then(|v| json_for_script(&v)) {
            Ok(payload) => html.push_str(&chart_section(id, titulo, &payload)),
            Err(e) => {
                warn!("Gráfico '{titulo}' ignorado: {e}");
                avisos.push(format!("Gráfico '{titulo}' ignorado: {e}"));
            }
        }
    }
    (html, avisos)
}

fn chart_section(id: &str, titulo: &str, payload: &str) -> String {
    format!(
        "<section class=\"grafico\"><h2>{titulo}</h2><div id=\"{id}\"></div>\
         <script>var p = {payload}; Plotly.newPlot(\"{id}\", p.data, p.layout, {{responsive: true}});</script>\
         </section>",
        titulo = escape_html(titulo),
        id = id,
        payload = payload,
    )
}

fn grafico_barras(series: &[CategoriaValor], eixo_y: &str) -> Result<Value, AppError> {
    let categorias: Vec<&str> = series.iter().map(|cv| cv.categoria.as_str()).collect();
    let valores: Vec<f64> = series.iter().map(|cv| cv.valor).collect();
    Ok(json!({
        "data": [{
            "type": "bar",
            "x": categorias,
            "y": valores,
            "marker": { "color": "#2E86AB" },
        }],
        "layout": {
            "height": 400,
            "xaxis": { "tickangle": -45 },
            "yaxis": { "title": { "text": eixo_y } },
            "margin": { "t": 20 },
        },
    }))
}

fn grafico_pizza(series: &[CategoriaValor]) -> Result<Value, AppError> {
    let categorias: Vec<&str> = series.iter().map(|cv| cv.categoria.as_str()).collect();
    let valores: Vec<f64> = series.iter().map(|cv| cv.valor).collect();
    Ok(json!({
        "data": [{
            "type": "pie",
            "labels": categorias,
            "values": valores,
            "hole": 0.4,
            "textinfo": "percent+label",
        }],
        "layout": { "height": 400 },
    }))
}

fn grafico_linha(buckets: &[PeriodoContagem]) -> Result<Value, AppError> {
    let dias: Vec<&str> = buckets.iter().map(|b| b.chave.as_str()).collect();
    let contagens: Vec<i64> = buckets.iter().map(|b| b.contagem).collect();
    Ok(json!({
        "data": [{
            "type": "scatter",
            "mode": "lines",
            "fill": "tozeroy",
            "x": dias,
            "y": contagens,
            "line": { "color": "#2E86AB", "width": 3 },
        }],
        "layout": {
            "height": 400,
            "yaxis": { "title": { "text": "Número de Ocorrências" } },
            "margin": { "t": 20 },
        },
    }))
}

/// Monthly heatmap: years on x, month names on y. Months absent from the
/// data stay null: gaps are visible, not zero-filled.
fn grafico_heatmap(buckets: &[PeriodoContagem]) -> Result<Value, AppError> {
    let mut anos: Vec<i32> = Vec::new();
    let mut meses: Vec<u32> = Vec::new();
    let mut celulas: Vec<(i32, u32, i64)> = Vec::new();

    for bucket in buckets {
        let (ano, mes) = bucket
            .chave
            .split_once('-')
            .and_then(|(a, m)| Some((a.parse::<i32>().ok()?, m.parse::<u32>().ok()?)))
            .ok_or_else(|| {
                AppError::Custom(format!("Chave de período mensal inválida: {}", bucket.chave))
            })?;
        if !anos.contains(&ano) {
            anos.push(ano);
        }
        if !meses.contains(&mes) {
            meses.push(mes);
        }
        celulas.push((ano, mes, bucket.contagem));
    }
    anos.sort_unstable();
    meses.sort_unstable();

    let z: Vec<Vec<Value>> = meses
        .iter()
        .map(|&mes| {
            anos.iter()
                .map(|&ano| {
                    celulas
                        .iter()
                        .find(|(a, m, _)| *a == ano && *m == mes)
                        .map(|(_, _, contagem)| json!(contagem))
                        .unwrap_or(Value::Null)
                })
                .collect()
        })
        .collect();

    let rotulos_meses: Vec<&str> = meses.iter().map(|&m| nome_mes(m)).collect();
    Ok(json!({
        "data": [{
            "type": "heatmap",
            "x": anos,
            "y": rotulos_meses,
            "z": z,
            "colorscale": "Viridis",
        }],
        "layout": { "height": 400, "margin": { "t": 20 } },
    }))
}

// ─── Insights and footer ─────────────────────────────────────────────────────

fn render_insights(relatorio: &Relatorio, config: &DashConfig) -> String {
    let insights = &relatorio.insights;
    let kpis = &relatorio.kpis;
    format!(
        "<section class=\"insights\"><h2>Insights Automáticos</h2><ul>\
         <li><strong>Tipo mais recorrente:</strong> {tipo}</li>\
         <li><strong>Canal mais eficiente:</strong> {canal}</li>\
         <li><strong>Período crítico:</strong> {periodo}</li>\
         <li><strong>Setor mais demandado:</strong> {setor}</li>\
         <li><strong>Cumprimento SLA (≤ {sla:.0} dias):</strong> {pct_sla:.1}%</li>\
         <li><strong>Tempo médio de resolução:</strong> {tempo:.1} dias</li>\
         <li><strong>Taxa de reincidência:</strong> {pct_reinc:.1}%</li>\
         </ul></section>",
        tipo = escape_html(Insights::exibir(&insights.tipo_mais_comum)),
        canal = escape_html(Insights::exibir(&insights.canal_mais_rapido)),
        periodo = escape_html(Insights::exibir(&insights.periodo_critico)),
        setor = escape_html(Insights::exibir(&insights.setor_mais_demandado)),
        sla = config.sla_dias,
        pct_sla = kpis.pct_dentro_sla,
        tempo = kpis.tempo_medio_dias,
        pct_reinc = kpis.pct_reincidentes,
    )
}

fn render_avisos(avisos: &[String]) -> String {
    if avisos.is_empty() {
        return String::new();
    }
    let itens: String = avisos
        .iter()
        .map(|a| format!("<li>{}</li>", escape_html(a)))
        .collect();
    format!("<section class=\"avisos\"><h2>Avisos</h2><ul>{itens}</ul></section>")
}

fn render_rodape(relatorio: &Relatorio) -> String {
    format!(
        "<footer><p>Dashboard gerado automaticamente em {}</p><p>{} de {} registros selecionados</p></footer>",
        escape_html(&relatorio.meta.gerado_em),
        relatorio.meta.total_filtrado,
        relatorio.meta.total_geral,
    )
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Serialize a payload for embedding inside a `<script>` block. A literal
/// "</" inside a JSON string would end the script element early.
fn json_for_script(v: &Value) -> Result<String, AppError> {
    Ok(serde_json::to_string(v)?.replace("</", "<\\/"))
}

fn inline_css() -> &'static str {
    r#"
body {
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
    margin: 20px;
    background-color: #f8f9fa;
    color: #2c3e50;
}
.container { max-width: 1200px; margin: 0 auto; }
h1 { text-align: center; font-size: 2.2em; margin-bottom: 30px; }
h2 { color: #34495e; border-left: 4px solid #3498db; padding-left: 15px; }
section {
    background-color: #ffffff;
    padding: 20px;
    border-radius: 10px;
    box-shadow: 0 2px 10px rgba(0,0,0,0.1);
    margin-bottom: 30px;
}
.cards { display: flex; flex-wrap: wrap; gap: 15px; }
.card {
    flex: 1 1 180px;
    background-color: #f0f2f6;
    padding: 15px;
    border-radius: 10px;
    text-align: center;
}
.card-valor { font-size: 1.8em; font-weight: bold; }
.card-rotulo { color: #34495e; margin-top: 5px; }
.card-detalhe { color: #7f8c8d; font-size: 0.85em; margin-top: 5px; }
.insights ul, .avisos ul { line-height: 1.8; }
.avisos { border-left: 4px solid #e67e22; }
footer {
    margin-top: 50px;
    text-align: center;
    color: #7f8c8d;
    border-top: 1px solid #ecf0f1;
    padding-top: 20px;
}
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::filter::FilterSpec;
    use crate::parser::types::Ocorrencia;
    use crate::report::build_relatorio;

    fn ocorrencia(data: &str, tipo: &str, tempo: f64) -> Ocorrencia {
        Ocorrencia {
            data_ocorrencia: data.parse().unwrap(),
            tipo_problema: tipo.into(),
            tempo_resolucao: tempo,
            canal_entrada: "App".into(),
            classificacao: "crítica".into(),
            responsavel_setor: "Sinistros".into(),
            cliente_reincidente: "não".into(),
        }
    }

    fn relatorio_amostra() -> Relatorio {
        let ds = Dataset::new(vec![
            ocorrencia("2024-01-01", "Furto", 3.0),
            ocorrencia("2024-01-02", "Furto", 7.0),
            ocorrencia("2024-02-01", "Colisão", 2.0),
        ]);
        build_relatorio(&ds, &FilterSpec::default(), &DashConfig::default())
    }

    #[test]
    fn test_render_contains_all_sections() {
        let html = render_html(&relatorio_amostra(), &DashConfig::default());
        assert!(html.contains("grafico-tipos"));
        assert!(html.contains("grafico-tempo-tipo"));
        assert!(html.contains("grafico-canais"));
        assert!(html.contains("grafico-tempo-canal"));
        assert!(html.contains("grafico-setores"));
        assert!(html.contains("grafico-evolucao"));
        assert!(html.contains("grafico-heatmap"));
        assert!(html.contains("Insights Automáticos"));
        assert!(html.contains("Furto"));
        assert!(html.contains("cdn.plot.ly"));
    }

    #[test]
    fn test_render_kpi_values_present() {
        let html = render_html(&relatorio_amostra(), &DashConfig::default());
        assert!(html.contains("Total de Ocorrências"));
        // mean 4.0 over [3, 7, 2]
        assert!(html.contains("4.0"));
        assert!(html.contains("66.7%"));
    }

    #[test]
    fn test_render_empty_dataset_shows_na() {
        let ds = Dataset::default();
        let rel = build_relatorio(&ds, &FilterSpec::default(), &DashConfig::default());
        let html = render_html(&rel, &DashConfig::default());
        assert!(html.contains("N/A"));
        assert!(html.contains("0 de 0 registros"));
    }

    #[test]
    fn test_labels_are_escaped() {
        let ds = Dataset::new(vec![ocorrencia("2024-01-01", "<script>alert(1)</script>", 3.0)]);
        let rel = build_relatorio(&ds, &FilterSpec::default(), &DashConfig::default());
        let html = render_html(&rel, &DashConfig::default());
        // Insight text must not carry a raw script tag
        assert!(html.contains("&lt;script&gt;"));
        // JSON payloads must not contain a literal closing script sequence
        assert!(!html.contains("</script>alert"));
    }

    #[test]
    fn test_heatmap_matrix_layout() {
        let buckets = vec![
            PeriodoContagem {
                chave: "2023-12".into(),
                rotulo: "Dezembro 2023".into(),
                contagem: 4,
            },
            PeriodoContagem {
                chave: "2024-01".into(),
                rotulo: "Janeiro 2024".into(),
                contagem: 2,
            },
        ];
        let payload = grafico_heatmap(&buckets).unwrap();
        let trace = &payload["data"][0];
        assert_eq!(trace["x"], json!([2023, 2024]));
        assert_eq!(trace["y"], json!(["Janeiro", "Dezembro"]));
        // January row: null for 2023, 2 for 2024; December row: 4 then null
        assert_eq!(trace["z"], json!([[null, 2], [4, null]]));
    }

    #[test]
    fn test_heatmap_rejects_bad_key() {
        let buckets = vec![PeriodoContagem {
            chave: "ruim".into(),
            rotulo: "?".into(),
            contagem: 1,
        }];
        assert!(grafico_heatmap(&buckets).is_err());
    }
}
