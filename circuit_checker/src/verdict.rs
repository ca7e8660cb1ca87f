// Verdicts: the four ways a completed verification can come out.
//
// `classify` is the whole decision: count the lit output slots, and if
// exactly one is lit, check that the board still had room in that column.
// It is a pure function of the board and the decoded outputs so it can be
// exercised without running any ticks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{COLS, LogicalBoard};

/// Outcome of a completed verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// No output slot was on.
    NoOutput,
    /// More than one output slot was on.
    MultipleOutputs { count: usize },
    /// Exactly one slot was on, over a column that is already full.
    IllegalMove { column: usize },
    /// Exactly one slot was on, over a column with room.
    Pass { column: usize },
}

impl Verdict {
    pub fn passed(self) -> bool {
        matches!(self, Verdict::Pass { .. })
    }

    /// Ambiguous verdicts are the ones where the circuit did not pick a
    /// single column.
    pub fn is_ambiguous(self) -> bool {
        matches!(self, Verdict::NoOutput | Verdict::MultipleOutputs { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::NoOutput => write!(f, "No output is on!"),
            Verdict::MultipleOutputs { count } => {
                write!(f, "Multiple outputs! Expected 1, got {count}")
            }
            Verdict::IllegalMove { .. } => {
                write!(f, "Invalid output! Tried to play in a column that is already full")
            }
            Verdict::Pass { .. } => write!(f, "Test passed!"),
        }
    }
}

/// Classify decoded outputs against the board they were computed for.
pub fn classify(board: &LogicalBoard, outputs: &[bool; COLS]) -> Verdict {
    let mut on_count = 0;
    let mut last_on = None;
    for (slot, &on) in outputs.iter().enumerate() {
        if on {
            on_count += 1;
            last_on = Some(slot);
        }
    }

    match (on_count, last_on) {
        (1, Some(column)) if board.is_column_full(column) => Verdict::IllegalMove { column },
        (1, Some(column)) => Verdict::Pass { column },
        (0, _) | (_, None) => Verdict::NoOutput,
        (count, Some(_)) => Verdict::MultipleOutputs { count },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ROWS;

    fn one_hot(slot: usize) -> [bool; COLS] {
        let mut outputs = [false; COLS];
        outputs[slot] = true;
        outputs
    }

    #[test]
    fn single_output_over_open_column_passes() {
        let board = LogicalBoard::empty();
        let verdict = classify(&board, &one_hot(3));
        assert_eq!(verdict, Verdict::Pass { column: 3 });
        assert!(verdict.passed());
    }

    #[test]
    fn single_output_over_full_column_is_illegal() {
        let mut codes = [[0u8; COLS]; ROWS];
        codes[0][3] = 1;
        let board = LogicalBoard::from_codes(codes).unwrap();
        let verdict = classify(&board, &one_hot(3));
        assert_eq!(verdict, Verdict::IllegalMove { column: 3 });
        assert!(!verdict.passed());
        assert!(!verdict.is_ambiguous());
    }

    #[test]
    fn full_column_elsewhere_does_not_matter() {
        let mut codes = [[0u8; COLS]; ROWS];
        codes[0][0] = 2;
        let board = LogicalBoard::from_codes(codes).unwrap();
        assert_eq!(classify(&board, &one_hot(3)), Verdict::Pass { column: 3 });
    }

    #[test]
    fn nothing_on_is_no_output() {
        let verdict = classify(&LogicalBoard::empty(), &[false; COLS]);
        assert_eq!(verdict, Verdict::NoOutput);
        assert!(verdict.is_ambiguous());
    }

    #[test]
    fn two_on_is_multiple_outputs() {
        let mut outputs = [false; COLS];
        outputs[2] = true;
        outputs[5] = true;
        let verdict = classify(&LogicalBoard::empty(), &outputs);
        assert_eq!(verdict, Verdict::MultipleOutputs { count: 2 });
        assert!(verdict.is_ambiguous());
    }

    #[test]
    fn messages() {
        assert_eq!(Verdict::NoOutput.to_string(), "No output is on!");
        assert_eq!(
            Verdict::MultipleOutputs { count: 7 }.to_string(),
            "Multiple outputs! Expected 1, got 7"
        );
        assert_eq!(Verdict::Pass { column: 0 }.to_string(), "Test passed!");
    }
}
