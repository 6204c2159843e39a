/*!
Scoring of peer-nomination ("sociometry") surveys.

Every student of a class answers a few questions by naming classmates. The
number of nominations a student receives is their popularity score, and the
score places them in one of five [`Category`] buckets. The nominations
themselves form a directed graph, the sociogram, which [`layout::build`]
positions for drawing.

```
use sociometry::{aggregate_table, layout, LayoutConfig, ResponseTable, TableColumns};

let cell = |s: &str| Some(s.to_string());
let table = ResponseTable {
    header: vec![cell("Nama Siswa"), cell("Pilihan 1")],
    rows: vec![
        vec![cell("Alice"), cell("Bob")],
        vec![cell("Bob"), cell("Carol")],
        vec![cell("Carol"), None],
    ],
};
let result = aggregate_table(&table, &TableColumns::DEFAULT_COLUMNS)?;
assert_eq!(result.roster.last().unwrap().name, "Alice");

let graph = layout::build(&result.edges, &result.roster, &LayoutConfig::DEFAULT_LAYOUT);
assert_eq!(graph.nodes.len(), 3);
# Ok::<(), sociometry::SociometryError>(())
```
*/
mod config;
mod questions;

pub mod builder;
pub mod layout;
pub mod manual;

use log::{debug, info, warn};

use std::{collections::HashMap, ops::AddAssign};

pub use crate::config::*;
pub use crate::questions::*;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct RespondentId(u32);

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct NominationCount(u32);

impl NominationCount {
    const EMPTY: NominationCount = NominationCount(0);
    const ONE: NominationCount = NominationCount(1);
}

impl std::iter::Sum for NominationCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        NominationCount(iter.map(|nc| nc.0).sum())
    }
}

impl AddAssign for NominationCount {
    fn add_assign(&mut self, rhs: NominationCount) {
        self.0 += rhs.0;
    }
}

// The respondents, in order of first appearance, with a lookup by name.
struct Registry<'a> {
    ordered: Vec<(&'a str, RespondentId)>,
    by_name: HashMap<&'a str, RespondentId>,
}

fn register_respondents(rows: &[NominationRow]) -> Registry<'_> {
    let mut ordered: Vec<(&str, RespondentId)> = Vec::new();
    let mut by_name: HashMap<&str, RespondentId> = HashMap::new();
    for (idx, row) in rows.iter().enumerate() {
        let name = row.respondent_name.trim();
        if name.is_empty() {
            warn!("register_respondents: row {}: blank respondent name, skipping", idx + 1);
            continue;
        }
        if by_name.contains_key(name) {
            warn!(
                "register_respondents: row {}: respondent {:?} appears more than once",
                idx + 1,
                name
            );
            continue;
        }
        let rid = RespondentId(ordered.len() as u32 + 1);
        by_name.insert(name, rid);
        ordered.push((name, rid));
    }
    Registry { ordered, by_name }
}

fn non_blank(cell: &Option<String>) -> Option<&str> {
    match cell.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// Tallies the nominations of a survey.
///
/// Every respondent starts with a score of zero. Each non-blank choice naming a known respondent adds
/// one to that respondent's score and creates one edge. Other choices are reported in
/// [`Aggregation::unmatched`] and otherwise ignored.
///
/// The roster is sorted by decreasing score. Respondents with the same score keep the order in which
/// they first appear in `rows`.
pub fn aggregate(rows: &[NominationRow]) -> Aggregation {
    info!("aggregate: processing {:?} responses", rows.len());
    let registry = register_respondents(rows);

    let mut tally: HashMap<RespondentId, NominationCount> = registry
        .ordered
        .iter()
        .map(|(_, rid)| (*rid, NominationCount::EMPTY))
        .collect();
    let mut edges: Vec<NominationEdge> = Vec::new();
    let mut unmatched: Vec<UnmatchedNomination> = Vec::new();

    for row in rows.iter() {
        let respondent = row.respondent_name.trim();
        if respondent.is_empty() {
            continue;
        }
        for (slot, cell) in row.choices.iter().take(MAX_CHOICES).enumerate() {
            let choice = match non_blank(cell) {
                Some(c) => c,
                None => continue,
            };
            match registry.by_name.get(choice) {
                Some(rid) => {
                    if let Some(count) = tally.get_mut(rid) {
                        *count += NominationCount::ONE;
                    }
                    edges.push(NominationEdge::new(respondent, choice));
                }
                None => {
                    warn!(
                        "aggregate: {:?} nominated {:?} (slot {}), who is not a respondent: ignoring",
                        respondent,
                        choice,
                        slot + 1
                    );
                    unmatched.push(UnmatchedNomination {
                        respondent: respondent.to_string(),
                        slot: slot + 1,
                        value: choice.to_string(),
                    });
                }
            }
        }
    }

    let total: NominationCount = tally.values().cloned().sum();
    debug!(
        "aggregate: {:?} nominations, {:?} edges, {:?} unmatched",
        total,
        edges.len(),
        unmatched.len()
    );

    let mut roster: Vec<RosterEntry> = registry
        .ordered
        .iter()
        .map(|(name, rid)| {
            let score = tally.get(rid).cloned().unwrap_or(NominationCount::EMPTY).0;
            RosterEntry {
                name: name.to_string(),
                score,
                category: Category::from_score(score),
            }
        })
        .collect();
    // Stable: equal scores stay in order of first appearance.
    roster.sort_by(|a, b| b.score.cmp(&a.score));

    for (idx, entry) in roster.iter().enumerate() {
        info!("{:>3}. {:>3} {} -> {}", idx + 1, entry.score, entry.name, entry.category);
    }

    Aggregation {
        roster,
        edges,
        unmatched,
    }
}

/// Extracts the responses out of a raw survey table.
///
/// The name column must be present, otherwise [`SociometryError::MalformedInput`] is returned.
/// Choice columns are the ones whose header starts with the choice prefix, in column order. Only the
/// first [`MAX_CHOICES`] of them are read. Rows without a respondent name are skipped.
pub fn parse_table(
    table: &ResponseTable,
    columns: &TableColumns,
) -> Result<Vec<NominationRow>, SociometryError> {
    let header_names: Vec<Option<&str>> = table
        .header
        .iter()
        .map(|h| h.as_deref().map(str::trim))
        .collect();
    debug!("parse_table: header: {:?}", header_names);

    let name_idx = header_names
        .iter()
        .position(|h| *h == Some(columns.name_column))
        .ok_or_else(|| SociometryError::MalformedInput {
            missing_column: columns.name_column.to_string(),
        })?;

    let mut choice_idxs: Vec<usize> = header_names
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| match h {
            Some(s) if idx != name_idx && s.starts_with(columns.choice_prefix) => Some(idx),
            _ => None,
        })
        .collect();
    if choice_idxs.len() > MAX_CHOICES {
        warn!(
            "parse_table: found {} choice columns, only the first {} are used",
            choice_idxs.len(),
            MAX_CHOICES
        );
        choice_idxs.truncate(MAX_CHOICES);
    }
    debug!("parse_table: name column: {}, choice columns: {:?}", name_idx, choice_idxs);

    let mut builder = builder::Builder::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let name = match row.get(name_idx).and_then(non_blank) {
            Some(n) => n,
            None => {
                if row.iter().any(|c| non_blank(c).is_some()) {
                    warn!("parse_table: row {}: no respondent name, skipping", idx + 2);
                }
                continue;
            }
        };
        let choices: Vec<Option<String>> = choice_idxs
            .iter()
            .map(|c_idx| row.get(*c_idx).and_then(non_blank).map(str::to_string))
            .collect();
        debug!("parse_table: row {}: {:?} -> {:?}", idx + 2, name, choices);
        builder.add_response(name, &choices)?;
    }
    Ok(builder.build())
}

/// Parses the table and aggregates the responses.
pub fn aggregate_table(
    table: &ResponseTable,
    columns: &TableColumns,
) -> Result<Aggregation, SociometryError> {
    let rows = parse_table(table, columns)?;
    Ok(aggregate(&rows))
}
