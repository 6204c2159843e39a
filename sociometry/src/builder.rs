pub use crate::config::*;

/// A builder for collecting survey responses.
///
/// ```
/// pub use sociometry::builder::Builder;
/// # use sociometry::SociometryError;
///
/// let mut builder = Builder::new();
///
/// builder.add_response_simple("Anna", &["Bob", "", "Clara"])?;
/// builder.add_response_simple("Bob", &["Anna"])?;
///
/// let result = builder.aggregate();
/// assert_eq!(result.roster[0].name, "Anna");
/// assert_eq!(result.edges.len(), 2);
///
/// # Ok::<(), SociometryError>(())
/// ```
#[derive(Default)]
pub struct Builder {
    pub(crate) _rows: Vec<NominationRow>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder { _rows: Vec::new() }
    }

    /// Adds a response in which empty strings are blank slots.
    pub fn add_response_simple(
        &mut self,
        respondent: &str,
        choices: &[&str],
    ) -> Result<(), SociometryError> {
        let slots: Vec<Option<String>> = choices
            .iter()
            .map(|s| {
                if s.trim().is_empty() {
                    None
                } else {
                    Some(s.to_string())
                }
            })
            .collect();
        self.add_response(respondent, &slots)
    }

    /// Adds a response.
    ///
    /// choices: the nomination slots in column order. Slots may be blank, and the names do not need
    /// to be known respondents: unknown names are reported at aggregation time.
    pub fn add_response(
        &mut self,
        respondent: &str,
        choices: &[Option<String>],
    ) -> Result<(), SociometryError> {
        let name = respondent.trim();
        if name.is_empty() {
            return Err(SociometryError::BlankRespondent {
                row: self._rows.len() + 1,
            });
        }
        if choices.len() > MAX_CHOICES {
            return Err(SociometryError::TooManyChoices {
                respondent: name.to_string(),
                count: choices.len(),
            });
        }
        self._rows.push(NominationRow {
            respondent_name: name.to_string(),
            choices: choices.to_vec(),
        });
        Ok(())
    }

    pub fn rows(&self) -> &[NominationRow] {
        &self._rows
    }

    pub fn aggregate(&self) -> Aggregation {
        crate::aggregate(&self._rows)
    }

    pub fn build(self) -> Vec<NominationRow> {
        self._rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_respondent() {
        let mut builder = Builder::new();
        builder.add_response_simple("Anna", &[]).unwrap();
        let err = builder.add_response_simple("  ", &["Anna"]).unwrap_err();
        assert_eq!(err, SociometryError::BlankRespondent { row: 2 });
        assert_eq!(builder.rows().len(), 1);
    }

    #[test]
    fn rejects_too_many_choices() {
        let mut builder = Builder::new();
        let choices: Vec<Option<String>> = (0..MAX_CHOICES + 1).map(|_| None).collect();
        let err = builder.add_response("Anna", &choices).unwrap_err();
        assert!(matches!(err, SociometryError::TooManyChoices { count, .. } if count == 19));
    }

    #[test]
    fn simple_responses_mark_blanks() {
        let mut builder = Builder::new();
        builder.add_response_simple(" Anna ", &["", "Bob"]).unwrap();
        let rows = builder.build();
        assert_eq!(
            rows,
            vec![NominationRow {
                respondent_name: "Anna".to_string(),
                choices: vec![None, Some("Bob".to_string())],
            }]
        );
    }
}
