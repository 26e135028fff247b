//! Paths of the backend endpoints consumed by the report form.

pub const VIOLATIONS: &str = "/api/violations";
pub const AUTOCOMPLETE: &str = "/api/address/autocomplete";
pub const ADDRESS_DETAILS: &str = "/api/address/details";
pub const HEALTH: &str = "/api/health";

/// Path segments of `GET /api/district/{district}/accounts`, unescaped.
pub fn district_accounts_segments(district: &str) -> [&str; 4] {
    ["api", "district", district, "accounts"]
}
