//! Opaque pagination cursor.
//!
//! A cursor pins the sort position of the last item on a page: its score and
//! its food id. Both are needed; with the score alone, items that share it
//! would be skipped or repeated across a page boundary.
//!
//! # Wire format
//!
//! ```text
//! base64url( "<version>|<score as IEEE-754 bits, 16 hex digits>|<food id>" )
//! ```
//!
//! The score travels as raw bits so decoding yields exactly the `f64` that was
//! encoded. The leading version lets later formats add fields (e.g. a third
//! tie-break key) while old tokens still fail loudly instead of being misread.

use crate::domain::{FoodId, MealcastError, RankedFood, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Current cursor format version.
pub const CURSOR_VERSION: u32 = 1;

/// Decoded continuation position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    pub score: f64,
    pub food_id: FoodId,
}

impl PageCursor {
    #[must_use]
    pub const fn new(score: f64, food_id: FoodId) -> Self {
        Self { score, food_id }
    }

    /// Cursor pointing just past `item`.
    #[must_use]
    pub const fn after(item: &RankedFood) -> Self {
        Self::new(item.total_score, item.food_id)
    }

    /// Encodes the cursor into an opaque, URL-safe token.
    #[must_use]
    pub fn encode(&self) -> String {
        let raw = format!(
            "{CURSOR_VERSION}|{:016x}|{}",
            self.score.to_bits(),
            self.food_id.0
        );
        URL_SAFE_NO_PAD.encode(raw)
    }

    /// Decodes a token produced by [`PageCursor::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`MealcastError::InvalidCursor`] if the token is not valid
    /// base64, has the wrong shape or version, or carries a score that is not
    /// a finite non-negative number.
    pub fn decode(token: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|e| invalid(format!("not base64: {e}")))?;
        let raw = String::from_utf8(bytes).map_err(|_| invalid("not UTF-8".to_string()))?;

        let mut parts = raw.splitn(3, '|');
        let (Some(version), Some(bits), Some(food_id)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid("expected 3 fields".to_string()));
        };

        let version: u32 = version
            .parse()
            .map_err(|_| invalid(format!("bad version `{version}`")))?;
        if version != CURSOR_VERSION {
            return Err(invalid(format!("unsupported version {version}")));
        }

        if bits.len() != 16 {
            return Err(invalid("score must be 16 hex digits".to_string()));
        }
        let bits = u64::from_str_radix(bits, 16)
            .map_err(|_| invalid(format!("bad score bits `{bits}`")))?;
        let score = f64::from_bits(bits);
        if !score.is_finite() || score < 0.0 {
            return Err(invalid(format!("score out of range: {score}")));
        }

        let food_id: i64 = food_id
            .parse()
            .map_err(|_| invalid(format!("bad food id `{food_id}`")))?;

        Ok(Self::new(score, FoodId(food_id)))
    }
}

fn invalid(message: String) -> MealcastError {
    MealcastError::InvalidCursor(message)
}
