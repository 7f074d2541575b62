//! Static lookup of the 50 states: USPS code and tile-grid position.
//!
//! The grid is the usual equal-area tile map, 8 rows by 12 columns, with
//! Alaska top-left and Hawaii bottom-left.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateInfo {
    pub name: &'static str,
    pub code: &'static str,
    pub row: u8,
    pub col: u8,
}

const fn s(name: &'static str, code: &'static str, row: u8, col: u8) -> StateInfo {
    StateInfo {
        name,
        code,
        row,
        col,
    }
}

pub const GRID_ROWS: u8 = 8;
pub const GRID_COLS: u8 = 12;

pub const STATES: [StateInfo; 50] = [
    s("Alaska", "AK", 0, 0),
    s("Maine", "ME", 0, 11),
    s("Vermont", "VT", 1, 10),
    s("New Hampshire", "NH", 1, 11),
    s("Washington", "WA", 2, 1),
    s("Idaho", "ID", 2, 2),
    s("Montana", "MT", 2, 3),
    s("North Dakota", "ND", 2, 4),
    s("Minnesota", "MN", 2, 5),
    s("Illinois", "IL", 2, 6),
    s("Wisconsin", "WI", 2, 7),
    s("Michigan", "MI", 2, 8),
    s("New York", "NY", 2, 9),
    s("Rhode Island", "RI", 2, 10),
    s("Massachusetts", "MA", 2, 11),
    s("Oregon", "OR", 3, 1),
    s("Nevada", "NV", 3, 2),
    s("Wyoming", "WY", 3, 3),
    s("South Dakota", "SD", 3, 4),
    s("Iowa", "IA", 3, 5),
    s("Indiana", "IN", 3, 6),
    s("Ohio", "OH", 3, 7),
    s("Pennsylvania", "PA", 3, 8),
    s("New Jersey", "NJ", 3, 9),
    s("Connecticut", "CT", 3, 10),
    s("California", "CA", 4, 1),
    s("Utah", "UT", 4, 2),
    s("Colorado", "CO", 4, 3),
    s("Nebraska", "NE", 4, 4),
    s("Missouri", "MO", 4, 5),
    s("Kentucky", "KY", 4, 6),
    s("West Virginia", "WV", 4, 7),
    s("Virginia", "VA", 4, 8),
    s("Maryland", "MD", 4, 9),
    s("Delaware", "DE", 4, 10),
    s("Arizona", "AZ", 5, 2),
    s("New Mexico", "NM", 5, 3),
    s("Kansas", "KS", 5, 4),
    s("Arkansas", "AR", 5, 5),
    s("Tennessee", "TN", 5, 6),
    s("North Carolina", "NC", 5, 7),
    s("South Carolina", "SC", 5, 8),
    s("Oklahoma", "OK", 6, 4),
    s("Louisiana", "LA", 6, 5),
    s("Mississippi", "MS", 6, 6),
    s("Alabama", "AL", 6, 7),
    s("Georgia", "GA", 6, 8),
    s("Hawaii", "HI", 7, 0),
    s("Texas", "TX", 7, 4),
    s("Florida", "FL", 7, 9),
];

pub fn lookup(name: &str) -> Option<&'static StateInfo> {
    let name = name.trim();
    STATES.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

pub fn code_for(name: &str) -> Option<&'static str> {
    lookup(name).map(|s| s.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fifty_unique_states_and_tiles() {
        let names: HashSet<_> = STATES.iter().map(|s| s.name).collect();
        let codes: HashSet<_> = STATES.iter().map(|s| s.code).collect();
        let tiles: HashSet<_> = STATES.iter().map(|s| (s.row, s.col)).collect();
        assert_eq!(names.len(), 50);
        assert_eq!(codes.len(), 50);
        assert_eq!(tiles.len(), 50);
    }

    #[test]
    fn tiles_fit_grid() {
        assert!(STATES.iter().all(|s| s.row < GRID_ROWS && s.col < GRID_COLS));
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(code_for("Michigan"), Some("MI"));
        assert_eq!(code_for("new york"), Some("NY"));
        assert_eq!(code_for("District of Columbia"), None);
    }
}
