//! Non-state rows that must be removed from every source before joining.

/// Nationwide aggregate row.
pub const NATIONWIDE_LABEL: &str = "UNITED STATES";

/// Trade that could not be attributed to a state.
pub const UNALLOCATED_LABEL: &str = "Unallocated";

/// U.S. jurisdictions that are not states.
pub const NON_STATE_JURISDICTIONS: [&str; 3] =
    ["Puerto Rico", "District of Columbia", "Virgin Islands"];

/// True when `name` is a row to drop: the nationwide aggregate, the
/// unallocated bucket, or a district/territory.
pub fn is_excluded(name: &str) -> bool {
    let name = name.trim();
    name == NATIONWIDE_LABEL
        || name == UNALLOCATED_LABEL
        || NON_STATE_JURISDICTIONS.contains(&name)
}
