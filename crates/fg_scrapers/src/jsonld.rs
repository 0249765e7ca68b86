use scraper::{Html, Selector};
use serde_json::Value;

/// Every JSON-LD object in the document, with `@graph` and top-level arrays flattened.
fn json_ld_objects(document: &Html) -> Vec<Value> {
    let mut objects = Vec::new();

    if let Ok(script_selector) = Selector::parse("script[type='application/ld+json']") {
        for script in document.select(&script_selector) {
            if let Ok(json) = serde_json::from_str::<Value>(script.text().collect::<String>().trim()) {
                collect(json, &mut objects);
            }
        }
    }

    objects
}

fn collect(json: Value, out: &mut Vec<Value>) {
    match json {
        Value::Array(items) => {
            for item in items {
                collect(item, out);
            }
        }
        Value::Object(mut obj) => {
            if let Some(graph) = obj.remove("@graph") {
                collect(graph, out);
            }
            out.push(Value::Object(obj));
        }
        _ => {}
    }
}

/// Extracts `datePublished` from JSON-LD metadata in the HTML document.
pub fn extract_date_published(document: &Html) -> Option<String> {
    json_ld_objects(document)
        .iter()
        .filter_map(|obj| obj.get("datePublished").and_then(|d| d.as_str()))
        .map(|d| d.trim().to_string())
        .find(|d| !d.is_empty())
}

/// Extracts the lead image URL from JSON-LD metadata in the HTML document.
pub fn extract_image(document: &Html) -> Option<String> {
    json_ld_objects(document)
        .iter()
        .filter_map(|obj| obj.get("image"))
        .find_map(image_url)
}

fn image_url(image: &Value) -> Option<String> {
    let url = match image {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Object(obj) => obj.get("url").and_then(|u| u.as_str()).map(|u| u.trim().to_string()),
        Value::Array(arr) => return arr.iter().find_map(image_url),
        _ => None,
    };
    url.filter(|s| !s.is_empty())
}
