//! Keyword-matched replies used when the AI service is unavailable.
//!
//! Rules are checked in a fixed order and the first match wins.

use rust_decimal::Decimal;

use petal_core::Occasion;

use crate::config::ShopContact;
use crate::models::Flower;

const TOP_PICKS: usize = 3;

/// Words that point at an occasion beyond its own name.
const OCCASION_WORDS: &[(Occasion, &[&str])] = &[
    (
        Occasion::Romance,
        &["romance", "romantic", "love", "anniversary", "valentine", "date"],
    ),
    (Occasion::Birthday, &["birthday", "bday"]),
    (
        Occasion::Wedding,
        &["wedding", "bride", "bridal", "marriage", "engagement"],
    ),
    (
        Occasion::Sympathy,
        &["sympathy", "funeral", "condolence", "memorial", "loss", "grief"],
    ),
    (
        Occasion::Congratulations,
        &["congrat", "graduation", "promotion", "baby"],
    ),
    (Occasion::Everyday, &["everyday", "thank", "cheer", "desk"]),
];

const PRICE_WORDS: &[&str] = &["price", "cost", "cheap", "expensive", "budget", "afford"];
const DELIVERY_WORDS: &[&str] = &["deliver", "shipping", "ship", "arrive", "courier"];
const PAYMENT_WORDS: &[&str] = &["pay", "cash", "paypal", "card", "checkout"];
const CONTACT_WORDS: &[&str] = &["contact", "email", "phone", "reach", "human"];
/// Matched as whole words only, so "calla" does not count as a call.
const CONTACT_EXACT: &[&str] = &["call", "ring"];
const GREETINGS: &[&str] = &["hi", "hello", "hey", "hiya", "howdy", "greetings"];

/// Flower names that would otherwise read as keywords.
const FLOWER_NAMES: &[&str] = &["baby's breath", "babys breath", "baby breath", "calla"];

/// Build a reply from keyword rules over the current catalog.
#[must_use]
pub fn local_reply(message: &str, flowers: &[Flower], contact: &ShopContact) -> String {
    let lowered = FLOWER_NAMES
        .iter()
        .fold(message.to_lowercase(), |text, name| text.replace(name, " "));
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let mentions = |stems: &[&str]| {
        words
            .iter()
            .any(|word| stems.iter().any(|stem| word.starts_with(stem)))
    };
    let says = |whole: &[&str]| words.iter().any(|word| whole.contains(word));

    if let Some(occasion) = OCCASION_WORDS
        .iter()
        .find(|(_, stems)| mentions(stems))
        .map(|(occasion, _)| *occasion)
    {
        return occasion_reply(occasion, flowers, contact);
    }
    if mentions(PRICE_WORDS) || lowered.contains("how much") {
        return price_reply(flowers);
    }
    if mentions(DELIVERY_WORDS) {
        return "We deliver bouquets locally, usually on the same day for orders placed \
                before 2pm. Add your address at checkout and we will take it from there."
            .to_string();
    }
    if mentions(PAYMENT_WORDS) {
        return "You can pay with cash on delivery or with PayPal. Pick whichever suits \
                you at checkout."
            .to_string();
    }
    if mentions(CONTACT_WORDS) || says(CONTACT_EXACT) {
        return format!(
            "You can reach the shop at {} or call us on {}.",
            contact.email, contact.phone
        );
    }
    if says(GREETINGS) {
        return "Hello! I can help you find a bouquet for any occasion, or answer questions \
                about prices, delivery and payment."
            .to_string();
    }

    top_picks_reply(flowers)
}

fn occasion_reply(occasion: Occasion, flowers: &[Flower], contact: &ShopContact) -> String {
    let picks: Vec<String> = flowers
        .iter()
        .filter(|f| f.occasion == occasion && f.in_stock())
        .take(TOP_PICKS)
        .map(describe)
        .collect();

    if picks.is_empty() {
        return format!(
            "We have nothing in stock for {} right now. Write to {} and we will put \
             something together for you.",
            occasion.as_str(),
            contact.email
        );
    }
    format!(
        "For {} we recommend {}.",
        occasion.as_str(),
        picks.join(", ")
    )
}

fn price_reply(flowers: &[Flower]) -> String {
    let range = flowers.iter().map(|f| f.price).fold(
        None,
        |acc: Option<(Decimal, Decimal)>, price| match acc {
            None => Some((price, price)),
            Some((low, high)) => Some((low.min(price), high.max(price))),
        },
    );

    match range {
        Some((low, high)) => format!(
            "Our bouquets range in price from ${low:.2} to ${high:.2}. Every order shows the \
             full price before you confirm."
        ),
        None => "Our price list is being refreshed and the catalog is empty right now. \
                 Please check back soon."
            .to_string(),
    }
}

fn top_picks_reply(flowers: &[Flower]) -> String {
    let picks: Vec<String> = flowers
        .iter()
        .filter(|f| f.in_stock())
        .take(TOP_PICKS)
        .map(describe)
        .collect();

    if picks.is_empty() {
        return "Everything is sold out at the moment. New bouquets arrive every week."
            .to_string();
    }
    format!(
        "Some of our favourites right now: {}. Ask me about an occasion and I will narrow \
         it down.",
        picks.join(", ")
    )
}

fn describe(flower: &Flower) -> String {
    format!("{} (${:.2})", flower.name, flower.price)
}
