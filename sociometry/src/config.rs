// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The maximum number of nomination slots read from one response.
pub const MAX_CHOICES: usize = 18;

/// One respondent's answers, as read from the survey table.
///
/// Blank slots are kept as `None` so that the slot position of every choice is preserved.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct NominationRow {
    pub respondent_name: String,
    pub choices: Vec<Option<String>>,
}

/// A raw survey table: the first row of the sheet and all the following rows.
///
/// Cells are already converted to text by the readers. A `None` cell is an empty cell.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ResponseTable {
    pub header: Vec<Option<String>>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Names of the columns to look for in a survey table.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct TableColumns<'a> {
    /// The exact header of the column holding the name of the respondent.
    pub name_column: &'a str,
    /// Every column whose header starts with this prefix is a nomination slot.
    pub choice_prefix: &'a str,
}

impl TableColumns<'static> {
    pub const DEFAULT_COLUMNS: TableColumns<'static> = TableColumns {
        name_column: "Nama Siswa",
        choice_prefix: "Pilihan",
    };
}

// ******** Output data structures *********

/// "from nominated to". Only created for choices that match a known respondent.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct NominationEdge {
    pub from: String,
    pub to: String,
}

impl NominationEdge {
    pub fn new(from: &str, to: &str) -> NominationEdge {
        NominationEdge {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// The social standing of a student, derived from the number of nominations received.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Category {
    Isolated,
    SociallyLimited,
    AdequatelySocial,
    Popular,
    HighlyPopular,
}

/// A fill color, with a human-readable name.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct NodeColor {
    pub name: &'static str,
    pub rgb: (u8, u8, u8),
}

impl Category {
    /// All the categories, from the lowest score to the highest.
    pub const ALL: [Category; 5] = [
        Category::Isolated,
        Category::SociallyLimited,
        Category::AdequatelySocial,
        Category::Popular,
        Category::HighlyPopular,
    ];

    pub fn from_score(score: u32) -> Category {
        match score {
            0 => Category::Isolated,
            1..=2 => Category::SociallyLimited,
            3..=5 => Category::AdequatelySocial,
            6..=9 => Category::Popular,
            _ => Category::HighlyPopular,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Isolated => "Isolated",
            Category::SociallyLimited => "Socially Limited",
            Category::AdequatelySocial => "Adequately Social",
            Category::Popular => "Popular",
            Category::HighlyPopular => "Highly Popular",
        }
    }

    /// A short note for the teacher reading the results, if the category calls for one.
    pub fn advice(&self) -> Option<&'static str> {
        match self {
            Category::Isolated => Some("Needs special attention"),
            Category::SociallyLimited => Some("Needs encouragement to interact"),
            Category::AdequatelySocial => None,
            Category::Popular => Some("Liked by many peers"),
            Category::HighlyPopular => Some("Potential peer facilitator"),
        }
    }

    /// The text of the interpretation column: the label, followed by the advice if any.
    pub fn interpretation(&self) -> String {
        match self.advice() {
            Some(advice) => format!("{} - {}", self.label(), advice),
            None => self.label().to_string(),
        }
    }

    pub fn color(&self) -> NodeColor {
        match self {
            Category::Isolated => NodeColor {
                name: "red",
                rgb: (220, 40, 40),
            },
            Category::SociallyLimited => NodeColor {
                name: "orange",
                rgb: (255, 165, 0),
            },
            Category::AdequatelySocial => NodeColor {
                name: "yellow",
                rgb: (240, 220, 60),
            },
            Category::Popular => NodeColor {
                name: "green",
                rgb: (60, 180, 75),
            },
            Category::HighlyPopular => NodeColor {
                name: "darkgreen",
                rgb: (0, 100, 0),
            },
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RosterEntry {
    pub name: String,
    pub score: u32,
    pub category: Category,
}

/// A choice that did not name any respondent of the survey.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct UnmatchedNomination {
    pub respondent: String,
    /// 1-based, like the `Pilihan` columns.
    pub slot: usize,
    pub value: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Aggregation {
    /// Sorted by decreasing score. Equal scores keep the order in which the respondents first appear.
    pub roster: Vec<RosterEntry>,
    pub edges: Vec<NominationEdge>,
    pub unmatched: Vec<UnmatchedNomination>,
}

/// Errors that prevent the survey from being processed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SociometryError {
    /// The column with the names of the respondents is not in the table.
    MalformedInput { missing_column: String },
    /// A response was added without the name of the respondent.
    BlankRespondent { row: usize },
    TooManyChoices { respondent: String, count: usize },
    UnknownSchoolLevel(String),
}

impl Error for SociometryError {}

impl Display for SociometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SociometryError::MalformedInput { missing_column } => {
                write!(f, "malformed input: missing column {:?}", missing_column)
            }
            SociometryError::BlankRespondent { row } => {
                write!(f, "response {} has no respondent name", row)
            }
            SociometryError::TooManyChoices { respondent, count } => write!(
                f,
                "respondent {:?} made {} choices, at most {} are allowed",
                respondent, count, MAX_CHOICES
            ),
            SociometryError::UnknownSchoolLevel(level) => {
                write!(f, "unknown school level {:?} (expected PAUD, SD, SMP or SMA)", level)
            }
        }
    }
}

// ********* Layout **********

/// Settings of the force-directed layout.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Seed of the initial random placement. The same seed always gives the same positions.
    pub seed: u64,
    pub iterations: u32,
}

impl LayoutConfig {
    pub const DEFAULT_LAYOUT: LayoutConfig = LayoutConfig {
        seed: 42,
        iterations: 50,
    };
}

/// Coordinates after rescaling: both axes lie in [-1, 1].
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct GraphNode {
    pub name: String,
    pub position: Position,
    pub color: NodeColor,
    pub label: String,
    pub category: Category,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct PositionedGraph {
    /// In roster order: the node at index `i` has rank `i + 1`.
    pub nodes: Vec<GraphNode>,
    pub directed_edges: Vec<(String, String)>,
}

impl PositionedGraph {
    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_at_every_boundary() {
        let expected = [
            (0, Category::Isolated),
            (1, Category::SociallyLimited),
            (2, Category::SociallyLimited),
            (3, Category::AdequatelySocial),
            (5, Category::AdequatelySocial),
            (6, Category::Popular),
            (9, Category::Popular),
            (10, Category::HighlyPopular),
            (250, Category::HighlyPopular),
        ];
        for (score, category) in expected {
            assert_eq!(Category::from_score(score), category, "score {}", score);
        }
    }

    #[test]
    fn categories_are_ordered_by_score() {
        let mut previous = Category::from_score(0);
        for score in 1..30 {
            let current = Category::from_score(score);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn colors_are_distinct() {
        for (i, a) in Category::ALL.iter().enumerate() {
            for b in Category::ALL.iter().skip(i + 1) {
                assert_ne!(a.color(), b.color());
            }
        }
    }

    #[test]
    fn interpretation_text() {
        assert_eq!(
            Category::Isolated.interpretation(),
            "Isolated - Needs special attention"
        );
        assert_eq!(
            Category::AdequatelySocial.interpretation(),
            "Adequately Social"
        );
    }
}
