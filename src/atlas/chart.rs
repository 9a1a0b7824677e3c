//! The chart document: the comparison records and a Vega-Lite specification drawing them.

use mbti_shares::{ComparisonTable, MbtiType};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
const CHART_WIDTH: u32 = 600;
const CHART_HEIGHT: u32 = 400;
const LINE_COLOR: &str = "orange";
const SHARE_AXIS_TITLE: &str = "Share (%)";

pub fn chart_title(ct: &ComparisonTable) -> String {
    format!("MBTI distribution: {}", ct.primary)
}

pub fn total_caption(ct: &ComparisonTable) -> String {
    format!("Sum of MBTI shares for {}: {:.4}", ct.primary, ct.primary_total)
}

/// The long-format records. `secondaryShare` is only present when comparing.
pub fn records_to_json(ct: &ComparisonTable) -> Vec<JSValue> {
    ct.records
        .iter()
        .map(|r| {
            let mut record: JSMap<String, JSValue> = JSMap::new();
            record.insert("type".to_string(), json!(r.mbti.code()));
            record.insert("primaryShare".to_string(), json!(r.primary_share));
            if let Some(share) = r.secondary_share {
                record.insert("secondaryShare".to_string(), json!(share));
            }
            JSValue::Object(record)
        })
        .collect()
}

fn type_axis() -> JSValue {
    let order: Vec<&str> = MbtiType::CANONICAL_ORDER.iter().map(|t| t.code()).collect();
    json!({"field": "type", "type": "nominal", "title": "MBTI", "sort": order})
}

fn share_layer(mark: JSValue, field: &str) -> JSValue {
    json!({
        "mark": mark,
        "encoding": {
            "x": type_axis(),
            "y": {"field": field, "type": "quantitative", "title": SHARE_AXIS_TITLE},
            "tooltip": [
                {"field": "type", "type": "nominal"},
                {"field": field, "type": "quantitative"}
            ]
        }
    })
}

/// Bars for the primary country, and an orange line on top for the compared country.
pub fn build_chart_spec(ct: &ComparisonTable) -> JSValue {
    let mut layers: Vec<JSValue> = vec![share_layer(json!({"type": "bar"}), "primaryShare")];
    if ct.secondary.is_some() {
        layers.push(share_layer(
            json!({"type": "line", "color": LINE_COLOR}),
            "secondaryShare",
        ));
    }
    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": chart_title(ct),
        "width": CHART_WIDTH,
        "height": CHART_HEIGHT,
        "data": {"values": records_to_json(ct)},
        "layer": layers
    })
}

pub fn build_dashboard_js(ct: &ComparisonTable) -> JSValue {
    json!({
        "title": chart_title(ct),
        "country": ct.primary,
        "compareCountry": ct.secondary,
        "total": ct.primary_total,
        "caption": total_caption(ct),
        "records": records_to_json(ct),
        "chart": build_chart_spec(ct)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbti_shares::{build_comparison, ShareTable};

    fn table() -> ShareTable {
        let header: Vec<&str> = std::iter::once("Country")
            .chain(MbtiType::CANONICAL_ORDER.iter().map(|t| t.code()))
            .collect();
        let mut japan = vec!["Japan"];
        japan.extend(std::iter::repeat("0.0625").take(16));
        let mut peru = vec!["Peru"];
        peru.extend(std::iter::repeat("0.0625").take(15));
        peru.push("0.0");
        ShareTable::from_records(&header, &[japan, peru]).unwrap()
    }

    #[test]
    fn single_country_has_bars_only() {
        let ct = build_comparison(&table(), "Japan", None).unwrap();
        let js = build_dashboard_js(&ct);
        assert_eq!(js["compareCountry"], JSValue::Null);
        assert_eq!(js["caption"], "Sum of MBTI shares for Japan: 1.0000");

        let layers = js["chart"]["layer"].as_array().unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0]["mark"]["type"], "bar");
        assert_eq!(layers[0]["encoding"]["y"]["field"], "primaryShare");

        let records = js["records"].as_array().unwrap();
        assert_eq!(records.len(), 16);
        assert!(records.iter().all(|r| r.get("secondaryShare").is_none()));
        assert_eq!(records[0]["type"], "INFJ");
        assert_eq!(records[0]["primaryShare"], 6.25);
    }

    #[test]
    fn comparison_adds_a_line() {
        let ct = build_comparison(&table(), "Japan", Some("Peru")).unwrap();
        let spec = build_chart_spec(&ct);
        assert_eq!(spec["title"], "MBTI distribution: Japan");
        assert_eq!(spec["width"], 600);
        assert_eq!(spec["height"], 400);

        let layers = spec["layer"].as_array().unwrap();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[1]["mark"]["type"], "line");
        assert_eq!(layers[1]["mark"]["color"], "orange");
        assert_eq!(layers[1]["encoding"]["y"]["field"], "secondaryShare");
        assert_eq!(
            layers[1]["encoding"]["tooltip"][1]["field"],
            "secondaryShare"
        );

        let values = spec["data"]["values"].as_array().unwrap();
        assert_eq!(values[15]["type"], "ESFJ");
        assert_eq!(values[15]["secondaryShare"], 0.0);
    }

    #[test]
    fn axis_uses_canonical_order() {
        let order = type_axis()["sort"].clone();
        let codes: Vec<&str> = order
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            codes,
            vec![
                "INFJ", "ISFJ", "INTP", "ISFP", "ENTP", "INFP", "ENTJ", "ISTP", "INTJ", "ESFP",
                "ESTJ", "ENFP", "ESTP", "ISTJ", "ENFJ", "ESFJ"
            ]
        );
    }
}
