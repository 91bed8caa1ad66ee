//! Intent classification types shared between the pipeline and the API.

use serde::{Deserialize, Serialize};

/// Closed set of things a manager can ask the assistant to do.
///
/// The wire form is SCREAMING_SNAKE_CASE, matching what gets stored on
/// message rows and what the fallback model is asked to answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    MenuPriceUpdate,
    MenuAvailabilityToggle,
    SalesQueryToday,
    TopSellers,
    TableList,
    MenuSearch,
    Greeting,
    Help,
    #[default]
    Unknown,
}

impl Intent {
    /// Every member of the closed set, in declaration order.
    pub const ALL: [Intent; 9] = [
        Intent::MenuPriceUpdate,
        Intent::MenuAvailabilityToggle,
        Intent::SalesQueryToday,
        Intent::TopSellers,
        Intent::TableList,
        Intent::MenuSearch,
        Intent::Greeting,
        Intent::Help,
        Intent::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::MenuPriceUpdate => "MENU_PRICE_UPDATE",
            Intent::MenuAvailabilityToggle => "MENU_AVAILABILITY_TOGGLE",
            Intent::SalesQueryToday => "SALES_QUERY_TODAY",
            Intent::TopSellers => "TOP_SELLERS",
            Intent::TableList => "TABLE_LIST",
            Intent::MenuSearch => "MENU_SEARCH",
            Intent::Greeting => "GREETING",
            Intent::Help => "HELP",
            Intent::Unknown => "UNKNOWN",
        }
    }

    /// Parse an intent name coming from an untrusted source (the fallback
    /// model, a stored row). Anything outside the closed set is `None`;
    /// callers decide whether that degrades to `Unknown`.
    pub fn from_wire(s: &str) -> Option<Intent> {
        Intent::ALL.into_iter().find(|i| i.as_str() == s)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a price change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceModifier {
    #[default]
    Increment,
    Decrement,
}

/// Entities extracted for a price update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PriceUpdateEntities {
    /// Item-or-category phrase to match ("burger", "starters").
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub modifier: PriceModifier,
    /// Magnitude: rupees, or percent when `is_percentage` is set.
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub is_percentage: bool,
}

/// Entities extracted for an availability toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AvailabilityEntities {
    /// Item-name fragments, OR-combined when matching.
    #[serde(default)]
    pub items: Vec<String>,
    /// Target state: true = back on the menu, false = 86'd.
    #[serde(default)]
    pub available: bool,
}

/// Extracted entities, keyed by the intent they belong to.
///
/// The stored/wire form is the loose JSON map the handlers and the fallback
/// model exchange; `from_value` parses it defensively — unknown keys are
/// ignored and missing keys default, so a handler can notice an absent field
/// and ask a clarifying question instead of failing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Entities {
    PriceUpdate(PriceUpdateEntities),
    Availability(AvailabilityEntities),
    #[default]
    None,
}

impl Entities {
    /// JSON map form, as stored on message rows.
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Entities::PriceUpdate(e) => {
                serde_json::to_value(e).unwrap_or_else(|_| serde_json::json!({}))
            }
            Entities::Availability(e) => {
                serde_json::to_value(e).unwrap_or_else(|_| serde_json::json!({}))
            }
            Entities::None => serde_json::json!({}),
        }
    }

    /// Parse a loose JSON map for the given intent. Never fails: a value of
    /// the wrong shape yields the variant's defaults.
    pub fn from_value(intent: Intent, value: &serde_json::Value) -> Entities {
        match intent {
            Intent::MenuPriceUpdate => Entities::PriceUpdate(
                serde_json::from_value(value.clone()).unwrap_or_default(),
            ),
            Intent::MenuAvailabilityToggle => Entities::Availability(
                serde_json::from_value(value.clone()).unwrap_or_default(),
            ),
            _ => Entities::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn intent_wire_form() {
        assert_eq!(
            serde_json::to_string(&Intent::MenuPriceUpdate).unwrap(),
            r#""MENU_PRICE_UPDATE""#
        );
        assert_eq!(
            serde_json::to_string(&Intent::SalesQueryToday).unwrap(),
            r#""SALES_QUERY_TODAY""#
        );
    }

    #[test]
    fn intent_from_wire_roundtrip() {
        for intent in Intent::ALL {
            assert_eq!(Intent::from_wire(intent.as_str()), Some(intent));
        }
    }

    #[test]
    fn intent_from_wire_rejects_outsiders() {
        assert_eq!(Intent::from_wire("DROP_TABLES"), None);
        assert_eq!(Intent::from_wire(""), None);
        assert_eq!(Intent::from_wire("menu_price_update"), None); // case-sensitive
    }

    #[test]
    fn price_modifier_wire_form() {
        assert_eq!(
            serde_json::to_string(&PriceModifier::Increment).unwrap(),
            r#""INCREMENT""#
        );
        assert_eq!(
            serde_json::to_string(&PriceModifier::Decrement).unwrap(),
            r#""DECREMENT""#
        );
    }

    #[test]
    fn price_entities_from_loose_map() {
        let value = json!({
            "target": "burger",
            "modifier": "INCREMENT",
            "value": 20.0,
            "is_percentage": true,
            "reasoning": "model rambling — ignored"
        });
        let entities = Entities::from_value(Intent::MenuPriceUpdate, &value);
        assert_eq!(
            entities,
            Entities::PriceUpdate(PriceUpdateEntities {
                target: "burger".into(),
                modifier: PriceModifier::Increment,
                value: 20.0,
                is_percentage: true,
            })
        );
    }

    #[test]
    fn missing_keys_default_instead_of_failing() {
        let entities = Entities::from_value(Intent::MenuAvailabilityToggle, &json!({}));
        let Entities::Availability(e) = entities else {
            panic!("expected availability entities");
        };
        assert!(e.items.is_empty());
        assert!(!e.available);
    }

    #[test]
    fn wrong_shape_degrades_to_defaults() {
        let entities = Entities::from_value(Intent::MenuPriceUpdate, &json!("not a map"));
        assert_eq!(
            entities,
            Entities::PriceUpdate(PriceUpdateEntities::default())
        );
    }

    #[test]
    fn report_intents_carry_no_entities() {
        let value = json!({"anything": 1});
        assert_eq!(Entities::from_value(Intent::SalesQueryToday, &value), Entities::None);
        assert_eq!(Entities::from_value(Intent::Greeting, &value), Entities::None);
    }

    #[test]
    fn entities_to_value_shapes() {
        let e = Entities::Availability(AvailabilityEntities {
            items: vec!["lassi".into()],
            available: false,
        });
        assert_eq!(e.to_value(), json!({"items": ["lassi"], "available": false}));
        assert_eq!(Entities::None.to_value(), json!({}));
    }
}
