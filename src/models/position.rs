//! Work positions and their display attributes.
//!
//! Every place that needs a position code, label or color reads it from the
//! single table in this module.

use serde::{Deserialize, Serialize, Serializer};

/// A work role or station a shift is assigned to.
///
/// Unknown codes never fail: they fall back to [`Position::FALLBACK`].
///
/// # Example
///
/// ```
/// use shift_calendar::models::Position;
///
/// assert_eq!(Position::from_code("cas"), Position::Cashier);
/// assert_eq!(Position::from_code("???"), Position::Kitchen);
/// assert_eq!(Position::Runner.color(), "#9C27B0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "String")]
pub enum Position {
    /// Kitchen line.
    Kitchen,
    /// Front counter and till.
    Cashier,
    /// Floating support.
    Support,
    /// Order runner.
    Runner,
    /// Dish and sink station.
    Sink,
    /// Dining room and lobby.
    Lobby,
}

struct PositionAttributes {
    code: &'static str,
    label: &'static str,
    color: &'static str,
}

const POSITION_TABLE: [(Position, PositionAttributes); 6] = [
    (
        Position::Kitchen,
        PositionAttributes { code: "KIT", label: "Kitchen", color: "#7CB342" },
    ),
    (
        Position::Cashier,
        PositionAttributes { code: "CAS", label: "Cashier", color: "#00A3E0" },
    ),
    (
        Position::Support,
        PositionAttributes { code: "SUP", label: "Support", color: "#E74C3C" },
    ),
    (
        Position::Runner,
        PositionAttributes { code: "RUN", label: "Runner", color: "#9C27B0" },
    ),
    (
        Position::Sink,
        PositionAttributes { code: "SNK", label: "Sink", color: "#607D8B" },
    ),
    (
        Position::Lobby,
        PositionAttributes { code: "LOB", label: "Lobby", color: "#FFB300" },
    ),
];

impl Position {
    /// The position assumed when a code is missing or unrecognized.
    pub const FALLBACK: Position = Position::Kitchen;

    /// All positions in table order.
    pub const ALL: [Position; 6] = [
        Position::Kitchen,
        Position::Cashier,
        Position::Support,
        Position::Runner,
        Position::Sink,
        Position::Lobby,
    ];

    fn attributes(self) -> &'static PositionAttributes {
        // The table is indexed in declaration order.
        &POSITION_TABLE[self as usize].1
    }

    /// Short uppercase code used in calendar summaries (e.g. `KIT`).
    pub fn code(self) -> &'static str {
        self.attributes().code
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        self.attributes().label
    }

    /// Display color as a `#RRGGBB` string.
    pub fn color(self) -> &'static str {
        self.attributes().color
    }

    /// Looks up a position by exact code, ignoring case.
    pub fn try_from_code(code: &str) -> Option<Position> {
        let code = code.trim();
        Position::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(code))
    }

    /// Looks up a position by code, falling back to [`Position::FALLBACK`].
    pub fn from_code(code: &str) -> Position {
        Position::try_from_code(code).unwrap_or(Position::FALLBACK)
    }

    /// Extracts the position from the start of a calendar summary.
    ///
    /// The summary matches when it begins with a position code in any case,
    /// so `"KIT - Downtown"`, `"run shift"` and `"Kitchen"` all resolve.
    /// Anything else yields [`Position::FALLBACK`].
    pub fn from_summary(summary: &str) -> Position {
        let summary = summary.trim_start();
        Position::ALL
            .into_iter()
            .find(|p| {
                let code = p.code();
                summary
                    .get(..code.len())
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(code))
            })
            .unwrap_or(Position::FALLBACK)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl From<String> for Position {
    fn from(code: String) -> Self {
        Position::from_code(&code)
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}
