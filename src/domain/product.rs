use serde::{Deserialize, Deserializer, Serialize};

/// Structured product record produced by the structuring step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specifications: ProductSpecifications,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSpecifications {
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub dimensions: String,
    #[serde(default)]
    pub wattage: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub material: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductValidationError {
    #[error("product name is missing")]
    MissingName,
}

/// Loosely typed product as returned by a language model.
///
/// Every field is optional, scalar fields accept strings, numbers or booleans, and a
/// nested `metadata` object is accepted as an alternative location for the fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductDraft {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default)]
    pub specifications: Option<SpecificationsDraft>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub metadata: Option<Box<ProductDraft>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpecificationsDraft {
    #[serde(default, deserialize_with = "lenient_string")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dimensions: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub wattage: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub material: Option<String>,
}

impl Product {
    /// Normalizes a draft into a product. Absent optional fields become empty strings
    /// and an absent or unusable price becomes `0.0`; `fallback_id` is used when the
    /// draft carries no identifier.
    pub fn from_draft(
        draft: ProductDraft,
        fallback_id: &str,
    ) -> Result<Self, ProductValidationError> {
        let draft = draft.flatten();

        let name = non_blank(draft.name).ok_or(ProductValidationError::MissingName)?;
        let id = non_blank(draft.id).unwrap_or_else(|| fallback_id.to_string());
        let specs = draft.specifications.unwrap_or_default();

        Ok(Self {
            id,
            name,
            description: non_blank(draft.description).unwrap_or_default(),
            specifications: ProductSpecifications {
                color: non_blank(specs.color).unwrap_or_default(),
                dimensions: non_blank(specs.dimensions).unwrap_or_default(),
                wattage: non_blank(specs.wattage).unwrap_or_default(),
                kind: non_blank(specs.kind).unwrap_or_default(),
                material: non_blank(specs.material).unwrap_or_default(),
            },
            category: non_blank(draft.category).unwrap_or_default(),
            price: draft
                .price
                .filter(|p| p.is_finite() && *p >= 0.0)
                .unwrap_or(0.0),
            sku: non_blank(draft.sku).unwrap_or_default(),
            image_url: non_blank(draft.image_url).unwrap_or_default(),
        })
    }
}

impl ProductDraft {
    fn flatten(mut self) -> Self {
        let Some(nested) = self.metadata.take() else {
            return self;
        };
        let nested = nested.flatten();

        self.id = self.id.or(nested.id);
        self.name = self.name.or(nested.name);
        self.description = self.description.or(nested.description);
        self.specifications = self.specifications.or(nested.specifications);
        self.category = self.category.or(nested.category);
        self.price = self.price.or(nested.price);
        self.sku = self.sku.or(nested.sku);
        self.image_url = self.image_url.or(nested.image_url);
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => parse_price(&s),
        _ => None,
    })
}

const CURRENCY_SYMBOLS: [char; 5] = ['$', '€', '£', '¥', '₹'];

struct PriceToken {
    value: f64,
    after_currency: bool,
}

/// Parses prices such as `"$1,299.99"`, `"19.95 EUR"` or `"Model 42 - $19.99"`.
///
/// The first amount preceded by a currency symbol wins, otherwise the first number in
/// the text. A `-` directly before the amount (or its symbol) makes it negative.
pub fn parse_price(text: &str) -> Option<f64> {
    let chars: Vec<char> = text.chars().collect();
    let tokens = price_tokens(&chars);

    tokens
        .iter()
        .find(|t| t.after_currency)
        .or(tokens.first())
        .map(|t| t.value)
}

fn price_tokens(chars: &[char]) -> Vec<PriceToken> {
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let start = i;
        let mut number = String::new();
        let mut seen_decimal = false;

        while i < chars.len() {
            let c = chars[i];
            if c.is_ascii_digit() {
                number.push(c);
                i += 1;
                continue;
            }
            if seen_decimal || !matches!(c, '.' | ',') {
                break;
            }

            let digits = chars[i + 1..]
                .iter()
                .take_while(|d| d.is_ascii_digit())
                .count();
            if digits == 0 {
                break;
            }
            if c == ',' && digits == 3 {
                // thousands separator
                i += 1;
                continue;
            }
            seen_decimal = true;
            number.push('.');
            i += 1;
        }

        let mut prefix = chars[..start].iter().rev().peekable();
        let mut negative = prefix.next_if_eq(&&'-').is_some();
        let after_currency = prefix
            .next_if(|c| CURRENCY_SYMBOLS.contains(c))
            .is_some();
        if after_currency && !negative {
            negative = prefix.next_if_eq(&&'-').is_some();
        }

        if let Ok(value) = number.parse::<f64>() {
            tokens.push(PriceToken {
                value: if negative { -value } else { value },
                after_currency,
            });
        }
    }

    tokens
}
