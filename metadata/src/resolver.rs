//! Token id to metadata mapping.
use serde::Serialize;

/// Collection name prefix used in token names.
pub const COLLECTION: &str = "srtk";

/// Description shared by every token.
pub const DESCRIPTION: &str =
    "NFT collection for people who knows Sarthk Dobriyal ";

/// Default location of the token images.
pub const IMAGE_BASE_URL: &str =
    "https://github.com/sarthkdobriyal/nft-collection_app/blob/master/public";

/// Metadata document served for a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenMetadata {
    /// `srtk #<id>`.
    pub name: String,
    /// Fixed collection description.
    pub description: String,
    /// Image url, built from `id - 1`.
    pub img: String,
}

/// Resolves token ids against an image location.
#[derive(Debug, Clone)]
pub struct Resolver {
    image_base_url: String,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(IMAGE_BASE_URL)
    }
}

impl Resolver {
    /// Create a resolver serving images from `image_base_url`.
    pub fn new(image_base_url: impl Into<String>) -> Self {
        let image_base_url = image_base_url.into();
        let image_base_url = image_base_url.trim_end_matches('/').to_owned();
        Self { image_base_url }
    }

    /// Build the metadata of `token_id`.
    ///
    /// Nothing is validated: the id is embedded verbatim in the name, and an
    /// id that is not a number yields `NaN` in the image url.
    #[must_use]
    pub fn resolve(&self, token_id: &str) -> TokenMetadata {
        let index = format_number(to_number(token_id) - 1.0);
        TokenMetadata {
            name: format!("{COLLECTION} #{token_id}"),
            description: DESCRIPTION.to_owned(),
            img: format!("{}/{index}.svg", self.image_base_url),
        }
    }
}

/// Coerce `s` to a number the way a browser's `Number(s)` does.
///
/// Surrounding whitespace is ignored, the empty string is zero, unsigned
/// `0x`, `0o` and `0b` literals are accepted, and so is a signed `Infinity`.
/// Anything else that is not a decimal literal is `NaN`.
#[must_use]
pub fn to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix(&s[2..], radix);
    }

    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    if unsigned == "Infinity" {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    // Rust also accepts `inf`, `nan` and friends, which a browser does not.
    let is_decimal = unsigned.bytes().all(|b| {
        b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')
    });
    if !is_decimal || !unsigned.bytes().any(|b| b.is_ascii_digit()) {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}

/// Print `n` the way a browser prints a number.
///
/// Integral values below `1e21` are printed without a fractional part and
/// magnitudes from `1e21` up or below `1e-6` in exponent form (`1e+22`,
/// `1.5e-7`). Non-finite values print as `NaN`, `Infinity` and `-Infinity`.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if n == 0.0 {
        // Also covers `-0`.
        return "0".to_owned();
    }
    if !(1e-6..1e21).contains(&n.abs()) {
        let formatted = format!("{n:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => {
                format!("{mantissa}e+{exp}")
            }
            _ => formatted,
        };
    }
    if n.fract() == 0.0 {
        return format!("{n:.0}");
    }
    n.to_string()
}
