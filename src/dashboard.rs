// Static sales dashboard.
//
// Two rankings over the synthesized sales: the months with the largest total
// volume and the stores with the largest total volume. Each ranking is drawn
// as a Plotly bar chart; the page loads Plotly from its CDN once.
use crate::error::Result;
use crate::types::{RankingRow, ReconstructedRecord};
use serde_json::json;
use std::collections::HashMap;

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Sum quantities per `key`, then rank by total descending and keep `top`.
/// Totals saturate at `i64::MAX` instead of overflowing.
///
/// Groups are collected in first-seen order and sorted with a stable sort, so
/// equal totals keep first-seen order.
pub fn rank_by<'a, I, K>(items: I, key: K, top: usize) -> Vec<RankingRow>
where
    I: IntoIterator<Item = &'a ReconstructedRecord>,
    K: Fn(&ReconstructedRecord) -> String,
{
    let mut order: Vec<(String, i64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for r in items {
        let k = key(r);
        match index.get(&k).copied() {
            Some(i) => order[i].1 = order[i].1.saturating_add(r.quantity),
            None => {
                index.insert(k.clone(), order.len());
                order.push((k, r.quantity));
            }
        }
    }
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(top)
        .enumerate()
        .map(|(i, (key, total))| RankingRow {
            rank: i + 1,
            key,
            total,
        })
        .collect()
}

pub fn top_months(records: &[ReconstructedRecord], top: usize) -> Vec<RankingRow> {
    rank_by(records, |r| r.period.to_string(), top)
}

pub fn top_stores(records: &[ReconstructedRecord], top: usize) -> Vec<RankingRow> {
    rank_by(records, |r| r.pet_shop.clone(), top)
}

/// Axis captions and title of one bar chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartLabels<'a> {
    pub title: &'a str,
    pub x: &'a str,
    pub y: &'a str,
}

/// A `<div>` plus the script that draws a bar chart into it.
pub fn bar_chart_fragment(div_id: &str, rows: &[RankingRow], labels: ChartLabels) -> Result<String> {
    let data = json!([{
        "type": "bar",
        "x": rows.iter().map(|r| r.key.as_str()).collect::<Vec<_>>(),
        "y": rows.iter().map(|r| r.total).collect::<Vec<_>>(),
        "marker": { "color": "#636efa" },
    }]);
    let layout = json!({
        "title": { "text": labels.title },
        "xaxis": { "title": { "text": labels.x }, "type": "category" },
        "yaxis": { "title": { "text": labels.y } },
    });
    Ok(format!(
        "<div id=\"{id}\" class=\"chart\"></div>\n<script>Plotly.newPlot(\"{id}\", {data}, {layout});</script>\n",
        id = div_id,
        data = script_safe(&serde_json::to_string(&data)?),
        layout = script_safe(&serde_json::to_string(&layout)?),
    ))
}

// JSON inside <script> must not close the tag.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

/// The full page with both rankings.
pub fn render_page(months: &[RankingRow], stores: &[RankingRow]) -> Result<String> {
    let months_chart = bar_chart_fragment(
        "top-months",
        months,
        ChartLabels {
            title: &format!("Top {} months by sales volume", months.len()),
            x: "Month",
            y: "Sales volume (kg)",
        },
    )?;
    let stores_chart = bar_chart_fragment(
        "top-stores",
        stores,
        ChartLabels {
            title: &format!("Top {} pet shops by sales volume", stores.len()),
            x: "Pet shop",
            y: "Sales volume (kg)",
        },
    )?;
    Ok(format!(
        r#"<html>
<head>
<meta charset="utf-8">
<title>Sales Dashboard</title>
<script src="{cdn}"></script>
</head>
<body>
<h1>Company Sales Dashboard</h1>
{months_chart}<br>
{stores_chart}</body>
</html>
"#,
        cdn = PLOTLY_CDN,
    ))
}
