use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bistro_core::{DomainError, DomainResult, Record, RecordId};

/// Direction of an accounting operation.
///
/// Closed enum: every `match` over it is total, so a new kind is a compile
/// error at each dispatch site rather than a silent fallback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Cash entering the till.
    Entree,
    /// Cash leaving the till.
    Sortie,
}

impl OperationKind {
    pub const ALL: [OperationKind; 2] = [OperationKind::Entree, OperationKind::Sortie];

    /// Wire/storage name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Entree => "entree",
            OperationKind::Sortie => "sortie",
        }
    }

    /// Display label for the category selector.
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::Entree => "entrée",
            OperationKind::Sortie => "sortie",
        }
    }

    /// Sign applied to the amount when summing towards a balance.
    pub fn signum(&self) -> i64 {
        match self {
            OperationKind::Entree => 1,
            OperationKind::Sortie => -1,
        }
    }
}

impl FromStr for OperationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entree" => Ok(OperationKind::Entree),
            "sortie" => Ok(OperationKind::Sortie),
            other => Err(DomainError::validation(format!(
                "unknown operation kind: {other}"
            ))),
        }
    }
}

/// A treasury movement: one cash entry or exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: RecordId,
    pub kind: OperationKind,
    /// Amount in cents, always positive; `kind` carries the direction.
    pub amount_cents: i64,
    /// Free-text reason shown in the operations list and searched by the
    /// text filter.
    pub motif: String,
    pub occurred_at: DateTime<Utc>,
    /// Name of the user who recorded the operation, when known.
    pub recorded_by: Option<String>,
}

impl Operation {
    /// Create an operation with a fresh id. Amount must be positive.
    pub fn new(
        kind: OperationKind,
        amount_cents: i64,
        motif: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if amount_cents <= 0 {
            return Err(DomainError::validation("amount_cents must be positive"));
        }
        Ok(Self {
            id: RecordId::new(),
            kind,
            amount_cents,
            motif: motif.into(),
            occurred_at,
            recorded_by: None,
        })
    }

    /// Amount with the kind's sign applied (entrées positive, sorties
    /// negative).
    pub fn signed_amount_cents(&self) -> i64 {
        self.kind.signum() * self.amount_cents
    }
}

impl Record for Operation {
    type Category = OperationKind;

    fn id(&self) -> RecordId {
        self.id
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    fn amount(&self) -> i64 {
        self.amount_cents
    }

    fn search_text(&self) -> &str {
        &self.motif
    }

    fn category(&self) -> OperationKind {
        self.kind
    }
}

/// Derived treasury figures over a set of operations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TreasuryTotals {
    pub entrees_cents: i64,
    pub sorties_cents: i64,
    pub operation_count: usize,
}

impl TreasuryTotals {
    pub fn from_operations<'a, I>(operations: I) -> Self
    where
        I: IntoIterator<Item = &'a Operation>,
    {
        let mut totals = TreasuryTotals::default();
        for op in operations {
            match op.kind {
                OperationKind::Entree => totals.entrees_cents += op.amount_cents,
                OperationKind::Sortie => totals.sorties_cents += op.amount_cents,
            }
            totals.operation_count += 1;
        }
        totals
    }

    /// Net balance: entrées minus sorties.
    pub fn balance_cents(&self) -> i64 {
        self.entrees_cents - self.sorties_cents
    }
}
