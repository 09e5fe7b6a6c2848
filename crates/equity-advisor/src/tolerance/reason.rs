//! Recommendation Reasoner
//!
//! Turns a tolerance-score pair into the qualitative rationale shown to the
//! investor.

/// Rationale for a (portfolio, stock) tolerance pair.
///
/// The score ranges overlap, so rule order is load-bearing: the
/// high-tolerance rule is checked first, then the low-tolerance rule, then
/// the moderate fallback.
pub fn reason_for(portfolio: u8, stock: u8) -> &'static str {
    if portfolio >= 70 && stock >= 70 {
        "The portfolio and stock tolerance are high, it's a good decision to buy."
    } else if portfolio < 50 || stock < 50 {
        "The portfolio and/or stock tolerance is too low, not a good time to buy."
    } else {
        "The tolerance levels are moderate. You may buy, but consider the risks."
    }
}
