//! WASM bindings for order page probes.
//!
//! Run the probes from the browser console against the current page, or
//! against any HTML string.

use wasm_bindgen::prelude::*;

use orderprobe_core::{CardQuery, Html, OrderPageProbe, ProbeConfig, ShippingRegion};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn default_probe() -> Result<OrderPageProbe, JsValue> {
    OrderPageProbe::new(&ProbeConfig::default()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Look up the shipping country code in an HTML document.
#[wasm_bindgen]
pub fn locate_country(html: &str) -> Result<JsValue, JsValue> {
    let document = OrderPageProbe::parse(html);
    to_js(&default_probe()?.country(&document))
}

/// Extract the refund form table from an HTML document.
///
/// Terminal outcomes are thrown as strings that include what to check.
#[wasm_bindgen]
pub fn extract_refund_table(html: &str) -> Result<JsValue, JsValue> {
    let document = OrderPageProbe::parse(html);
    let snapshot = default_probe()?
        .table(&document)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&snapshot)
}

/// Parse a price such as "$1.23", returned with two decimal places.
#[wasm_bindgen]
pub fn parse_price(text: &str) -> Option<String> {
    orderprobe_core::parse_price(text).map(|p| p.to_string())
}

/// Whether a country code is outside the home country.
#[wasm_bindgen]
pub fn is_international(country_code: &str) -> bool {
    ShippingRegion::from_country_code(country_code).is_international()
}

/// Spell out a condition abbreviation such as "LPF".
#[wasm_bindgen]
pub fn expand_condition(code: &str) -> String {
    orderprobe_core::expand_condition(code).into_owned()
}

/// Configurable probe for browser use.
#[wasm_bindgen]
pub struct OrderProbe {
    probe: OrderPageProbe,
}

#[wasm_bindgen]
impl OrderProbe {
    /// Create a probe, optionally from a JSON configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<OrderProbe, JsValue> {
        let config = match config_json {
            Some(json) => serde_json::from_str::<ProbeConfig>(&json)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => ProbeConfig::default(),
        };
        let probe = OrderPageProbe::new(&config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { probe })
    }

    /// Country lookup on an HTML string.
    #[wasm_bindgen]
    pub fn country(&self, html: &str) -> Result<JsValue, JsValue> {
        to_js(&self.probe.country(&OrderPageProbe::parse(html)))
    }

    /// Table extraction on an HTML string.
    #[wasm_bindgen]
    pub fn table(&self, html: &str) -> Result<JsValue, JsValue> {
        let snapshot = self
            .probe
            .table(&OrderPageProbe::parse(html))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&snapshot)
    }

    /// First row whose card name contains `name`, or `undefined`.
    #[wasm_bindgen]
    pub fn find_row(&self, html: &str, name: &str) -> Result<JsValue, JsValue> {
        let row = self
            .probe
            .find_row(&OrderPageProbe::parse(html), name)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&row)
    }

    /// Order widget for a card, matched on name, set and condition, or `undefined`.
    #[wasm_bindgen]
    pub fn find_widget(&self, html: &str, card: &str, set: &str, condition: &str) -> Result<JsValue, JsValue> {
        let query = CardQuery::new(card).with_set(set).with_condition(condition);
        to_js(&self.probe.find_widget(&OrderPageProbe::parse(html), &query))
    }

    /// Both probes on an HTML string.
    #[wasm_bindgen]
    pub fn report(&self, html: &str) -> Result<JsValue, JsValue> {
        to_js(&self.probe.report(&OrderPageProbe::parse(html)))
    }

    /// Both probes on the page this script runs in.
    #[wasm_bindgen]
    pub fn probe_live_document(&self) -> Result<JsValue, JsValue> {
        let html = live_document_html()?;
        let report = self.probe.report(&Html::parse_document(&html));

        let rows = report.table.as_ref().map(|t| t.rows.len()).unwrap_or(0);
        web_sys::console::log_1(&JsValue::from_str(&format!(
            "orderprobe: country={} rows={}",
            report.country.value.as_deref().unwrap_or("?"),
            rows
        )));

        to_js(&report)
    }
}

fn live_document_html() -> Result<String, JsValue> {
    let element = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
        .ok_or_else(|| JsValue::from_str("no document available"))?;
    Ok(element.outer_html())
}
