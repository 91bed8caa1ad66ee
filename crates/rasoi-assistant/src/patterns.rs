//! Pattern-table intent matcher — the fast tier for known phrasings.
//!
//! Handles the common manager commands at zero cost and sub-millisecond
//! latency. Anything it can't match falls through to the Gemini tier.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use rasoi_protocol::{
    AvailabilityEntities, Entities, Intent, PriceModifier, PriceUpdateEntities,
};

use crate::classify::Classification;

/// One (regex, intent, extractor) entry of the table.
struct QuickPattern {
    regex: Regex,
    intent: Intent,
    extract: fn(&Captures) -> Entities,
}

/// Built once at first use; tried strictly in order. Specific phrasings
/// ("86 the X", price changes) must come before the broad sales/greeting
/// catch-alls, or they get misclassified.
static QUICK_PATTERNS: LazyLock<Vec<QuickPattern>> = LazyLock::new(|| {
    vec![
        // 86 command (mark unavailable)
        QuickPattern {
            regex: Regex::new(r"86\s+(?:the\s+)?(.+)").expect("valid 86 pattern"),
            intent: Intent::MenuAvailabilityToggle,
            extract: extract_eighty_six,
        },
        // Mark available
        QuickPattern {
            regex: Regex::new(r"(?:mark|make)\s+(.+?)\s+(?:available|back)")
                .expect("valid mark-available pattern"),
            intent: Intent::MenuAvailabilityToggle,
            extract: extract_mark_available,
        },
        // Price increase
        QuickPattern {
            regex: Regex::new(
                r"(?:increase|raise|up)\s+(.+?)\s+(?:by|to)\s+(?:₹|rs\.?|inr)?\s*(\d+(?:\.\d+)?)\s*(%)?",
            )
            .expect("valid price-increase pattern"),
            intent: Intent::MenuPriceUpdate,
            extract: extract_price_increase,
        },
        // Price decrease
        QuickPattern {
            regex: Regex::new(
                r"(?:decrease|reduce|lower|drop)\s+(.+?)\s+(?:by|to)\s+(?:₹|rs\.?|inr)?\s*(\d+(?:\.\d+)?)\s*(%)?",
            )
            .expect("valid price-decrease pattern"),
            intent: Intent::MenuPriceUpdate,
            extract: extract_price_decrease,
        },
        // Sales query
        QuickPattern {
            regex: Regex::new(r"(?:how'?s?\s+)?(?:today|sales|revenue|business)")
                .expect("valid sales pattern"),
            intent: Intent::SalesQueryToday,
            extract: extract_nothing,
        },
        // Top sellers
        QuickPattern {
            regex: Regex::new(r"(?:top|best)\s*(?:seller|selling|item)")
                .expect("valid top-sellers pattern"),
            intent: Intent::TopSellers,
            extract: extract_nothing,
        },
        // Greeting
        QuickPattern {
            regex: Regex::new(r"^(?:hi|hello|hey|good\s+(?:morning|afternoon|evening))")
                .expect("valid greeting pattern"),
            intent: Intent::Greeting,
            extract: extract_nothing,
        },
        // Help
        QuickPattern {
            regex: Regex::new(r"^(?:help|what\s+can\s+you\s+do|\?)").expect("valid help pattern"),
            intent: Intent::Help,
            extract: extract_nothing,
        },
    ]
});

/// Try the pattern table before involving the model. First match wins;
/// `None` means the fallback tier is required.
pub fn match_quick(message: &str) -> Option<Classification> {
    let lower = message.to_lowercase();
    let lower = lower.trim();

    for pattern in QUICK_PATTERNS.iter() {
        if let Some(caps) = pattern.regex.captures(lower) {
            let entities = (pattern.extract)(&caps);
            return Some(Classification::pattern_hit(pattern.intent, entities));
        }
    }
    None
}

fn extract_eighty_six(caps: &Captures) -> Entities {
    Entities::Availability(AvailabilityEntities {
        items: vec![caps[1].trim().to_string()],
        available: false,
    })
}

fn extract_mark_available(caps: &Captures) -> Entities {
    Entities::Availability(AvailabilityEntities {
        items: vec![caps[1].trim().to_string()],
        available: true,
    })
}

fn extract_price_increase(caps: &Captures) -> Entities {
    extract_price(caps, PriceModifier::Increment)
}

fn extract_price_decrease(caps: &Captures) -> Entities {
    extract_price(caps, PriceModifier::Decrement)
}

fn extract_price(caps: &Captures, modifier: PriceModifier) -> Entities {
    Entities::PriceUpdate(PriceUpdateEntities {
        target: caps[1].trim().to_string(),
        modifier,
        value: caps[2].parse().unwrap_or(0.0),
        is_percentage: caps.get(3).is_some(),
    })
}

fn extract_nothing(_caps: &Captures) -> Entities {
    Entities::None
}
