use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
//                              COORDINATE
// =============================================================================

/// One component of an elliptic-curve point: an ordered pair of `uint256`s.
///
/// Serializes as a two-element array of `0x`-prefixed hex strings, which is
/// also how the contract ABI sees it (`uint256[2]`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate(pub U256, pub U256);

impl Coordinate {
    pub const fn new(x: U256, y: U256) -> Self {
        Coordinate(x, y)
    }

    pub const fn to_array(self) -> [U256; 2] {
        [self.0, self.1]
    }
}

impl From<Coordinate> for [U256; 2] {
    fn from(coordinate: Coordinate) -> Self {
        coordinate.to_array()
    }
}

impl From<[u64; 2]> for Coordinate {
    fn from([x, y]: [u64; 2]) -> Self {
        Coordinate(U256::from(x), U256::from(y))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

// =============================================================================
//                                LABELS
// =============================================================================

/// A proof element label as it appears at the start of a proof line.
///
/// Variants are declared in the positional order of the `withdraw` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    A,
    APrime,
    B,
    BPrime,
    C,
    CPrime,
    H,
    K,
}

impl Label {
    /// Every recognised label, in call-signature order.
    pub const ALL: [Label; 8] = [
        Label::A,
        Label::APrime,
        Label::B,
        Label::BPrime,
        Label::C,
        Label::CPrime,
        Label::H,
        Label::K,
    ];

    /// Match a line's leading token. Labels are case-sensitive.
    pub fn parse(token: &str) -> Option<Label> {
        Label::ALL.into_iter().find(|label| label.as_str() == token)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Label::A => "A",
            Label::APrime => "A_p",
            Label::B => "B",
            Label::BPrime => "B_p",
            Label::C => "C",
            Label::CPrime => "C_p",
            Label::H => "H",
            Label::K => "K",
        }
    }

    /// Number of integers that must follow the label. `B` is a G2 point and
    /// carries two coordinates.
    pub const fn arity(self) -> usize {
        match self {
            Label::B => 4,
            _ => 2,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
//                                ERRORS
// =============================================================================

/// The proof text could not be turned into call arguments. Every variant names
/// the offending label so the user knows which line to fix.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MalformedProof {
    #[error("proof element `{0}` is missing")]
    Missing(Label),

    #[error("proof element `{0}` appears more than once")]
    Duplicate(Label),

    #[error("proof element `{label}` expects {expected} numbers, found {found}")]
    Arity {
        label: Label,
        expected: usize,
        found: usize,
    },

    #[error("proof element `{label}` has invalid number `{token}`")]
    InvalidNumber { label: Label, token: String },
}

impl MalformedProof {
    pub fn label(&self) -> Label {
        match self {
            MalformedProof::Missing(label) | MalformedProof::Duplicate(label) => *label,
            MalformedProof::Arity { label, .. } | MalformedProof::InvalidNumber { label, .. } => {
                *label
            }
        }
    }
}

// =============================================================================
//                            PROOF ARGUMENTS
// =============================================================================

/// Decoded proof, shaped like the arguments of
/// `withdraw(a, a_p, b1, b2, b_p, c, c_p, h, k)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofArguments {
    pub a: Coordinate,
    pub a_p: Coordinate,
    /// First coordinate of the `B` line.
    pub b1: Coordinate,
    /// Second coordinate of the `B` line.
    pub b2: Coordinate,
    pub b_p: Coordinate,
    pub c: Coordinate,
    pub c_p: Coordinate,
    pub h: Coordinate,
    pub k: Coordinate,
}

impl ProofArguments {
    /// The coordinates in the positional order of the `withdraw` call.
    pub fn to_call_order(&self) -> [Coordinate; 9] {
        [
            self.a, self.a_p, self.b1, self.b2, self.b_p, self.c, self.c_p, self.h, self.k,
        ]
    }
}

impl FromStr for ProofArguments {
    type Err = MalformedProof;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

// =============================================================================
//                               DECODER
// =============================================================================

/// Decode a textual proof into call arguments.
///
/// Each line is split on runs of non-word characters (anything but ASCII
/// alphanumerics and `_`). The first token is the label; the remaining tokens
/// are decimal or `0x`-hex integers below 2^256. Lines whose label is not
/// recognised are skipped, so headers such as `Proof:` and formatted output
/// like `A = 0x1f.., 0x2e..` both decode.
///
/// Every recognised label must appear exactly once with exactly its arity.
pub fn decode(proof_text: &str) -> Result<ProofArguments, MalformedProof> {
    let mut slots: [Option<Vec<U256>>; 8] = Default::default();

    for line in proof_text.lines() {
        let mut tokens = tokenize(line);
        let Some(label) = tokens.next().and_then(Label::parse) else {
            continue;
        };

        let slot = &mut slots[label.index()];
        if slot.is_some() {
            return Err(MalformedProof::Duplicate(label));
        }

        let values = tokens
            .map(|token| parse_number(label, token))
            .collect::<Result<Vec<_>, _>>()?;
        if values.len() != label.arity() {
            return Err(MalformedProof::Arity {
                label,
                expected: label.arity(),
                found: values.len(),
            });
        }
        *slot = Some(values);
    }

    // Fields are evaluated top to bottom, so the first missing label in call
    // order is the one reported.
    Ok(ProofArguments {
        a: coordinate(&slots, Label::A, 0)?,
        a_p: coordinate(&slots, Label::APrime, 0)?,
        b1: coordinate(&slots, Label::B, 0)?,
        b2: coordinate(&slots, Label::B, 2)?,
        b_p: coordinate(&slots, Label::BPrime, 0)?,
        c: coordinate(&slots, Label::C, 0)?,
        c_p: coordinate(&slots, Label::CPrime, 0)?,
        h: coordinate(&slots, Label::H, 0)?,
        k: coordinate(&slots, Label::K, 0)?,
    })
}

fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
}

fn parse_number(label: Label, token: &str) -> Result<U256, MalformedProof> {
    let invalid = || MalformedProof::InvalidNumber {
        label,
        token: token.to_string(),
    };

    let (digits, radix) = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        Some(hex) => (hex, 16u32),
        None => (token, 10u32),
    };
    // ruint tolerates `_` separators; a proof token never legitimately has one.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }

    U256::from_str_radix(digits, u64::from(radix)).map_err(|_| invalid())
}

fn coordinate(
    slots: &[Option<Vec<U256>>; 8],
    label: Label,
    at: usize,
) -> Result<Coordinate, MalformedProof> {
    match slots[label.index()].as_deref() {
        Some(values) => Ok(Coordinate(values[at], values[at + 1])),
        None => Err(MalformedProof::Missing(label)),
    }
}
