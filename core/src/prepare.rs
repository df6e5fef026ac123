//! Statement to canonical case files: extract, parse every side, then persist.
//!
//! The pipeline is all-or-nothing: nothing reaches the store unless every
//! example extracted and parsed cleanly.

use serde::Serialize;

use crate::error::{CaseSide, PrepareError};
use crate::extract::{extract, RawExample};
use crate::parser::{parse, CanonicalText};
use crate::statement::StatementSource;
use crate::store::{CaseFiles, CaseStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalCase {
    pub index: usize,
    pub input: CanonicalText,
    pub output: CanonicalText,
}

pub fn canonicalize(examples: &[RawExample]) -> Result<Vec<CanonicalCase>, PrepareError> {
    examples
        .iter()
        .map(|ex| {
            let input = parse(&ex.raw_input).map_err(|source| PrepareError::Parse {
                index: ex.index,
                side: CaseSide::Input,
                source,
            })?;
            let output = parse(&ex.raw_output).map_err(|source| PrepareError::Parse {
                index: ex.index,
                side: CaseSide::Output,
                source,
            })?;
            Ok(CanonicalCase {
                index: ex.index,
                input,
                output,
            })
        })
        .collect()
}

/// Fetches, extracts and parses a statement without touching any store.
pub fn build_cases(source: &mut dyn StatementSource) -> Result<Vec<CanonicalCase>, PrepareError> {
    let text = source.fetch().map_err(PrepareError::Source)?;
    let examples = extract(&text)?;
    tracing::debug!(source = %source.describe(), examples = examples.len(), "examples extracted");
    canonicalize(&examples)
}

/// Full pipeline: statement in, case files written.
pub fn prepare(
    source: &mut dyn StatementSource,
    store: &dyn CaseStore,
) -> Result<Vec<CaseFiles>, PrepareError> {
    let cases = build_cases(source)?;
    Ok(store.persist(&cases)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractError, ParseError};
    use crate::statement::TextStatement;
    use crate::store::FsCaseStore;
    use pretty_assertions::assert_eq;

    const TWO_SUM: &str = "Example 1:\n\nInput: nums = [2,7,11,15], target = 9\nOutput: [0,1]\nExplanation: Because nums[0] + nums[1] == 9, we return [0, 1].\n\nExample 2:\n\nInput: nums = [3,2,4], target = 6\nOutput: [1,2]\n\nConstraints:\n2 <= nums.length <= 10^4\n";

    #[test]
    fn canonicalizes_each_side() {
        let cases = build_cases(&mut TextStatement(TWO_SUM.into())).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].index, 1);
        assert_eq!(cases[0].input.as_str(), "4\n2 7 11 15\n9");
        assert_eq!(cases[0].output.as_str(), "2\n0 1");
        assert_eq!(cases[1].input.as_str(), "3\n3 2 4\n6");
        assert_eq!(cases[1].output.as_str(), "2\n1 2");
    }

    #[test]
    fn prepare_writes_the_canonical_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsCaseStore::new(dir.path());
        let files = prepare(&mut TextStatement(TWO_SUM.into()), &store).unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("inputs/input_2.txt")).unwrap(),
            "3\n3 2 4\n6"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("outputs/output_1.txt")).unwrap(),
            "2\n0 1"
        );
    }

    #[test]
    fn mismatch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsCaseStore::new(dir.path());
        let text = "Input: a = 1\nOutput: 1\nInput: a = 2\n";
        let err = prepare(&mut TextStatement(text.into()), &store).unwrap_err();

        assert!(matches!(
            err,
            PrepareError::Extract(ExtractError::ExtractionMismatch {
                inputs: 2,
                outputs: 1
            })
        ));
        assert!(!store.inputs_dir().exists());
    }

    #[test]
    fn parse_failure_names_example_and_side_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsCaseStore::new(dir.path());
        let text = "Input: a = [1,2]\nOutput: 3\nInput: a = [4\nOutput: 4\n";
        let err = prepare(&mut TextStatement(text.into()), &store).unwrap_err();

        match err {
            PrepareError::Parse {
                index,
                side,
                source,
            } => {
                assert_eq!(index, 2);
                assert_eq!(side, CaseSide::Input);
                assert!(matches!(source, ParseError::UnbalancedBrackets { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!store.inputs_dir().exists());
    }
}
