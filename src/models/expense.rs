//! Expense record model
//!
//! A single petty-cash expense with its supporting document metadata and an
//! optional in-memory attachment (the scanned receipt).

use chrono::NaiveDate;
use std::fmt;

use super::money::Money;

/// A receipt attached to an expense
///
/// The bytes live only for the session that read them; the persisted ledger
/// keeps just the file name.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Supporting document metadata for an expense (all optional)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMeta {
    /// Document type, e.g. "Boleta" or "Factura"
    pub document_type: String,
    /// Document number as printed on the receipt
    pub document_number: String,
    /// Supplier name
    pub supplier: String,
}

impl DocumentMeta {
    pub fn new(
        document_type: impl Into<String>,
        document_number: impl Into<String>,
        supplier: impl Into<String>,
    ) -> Self {
        Self {
            document_type: document_type.into(),
            document_number: document_number.into(),
            supplier: supplier.into(),
        }
    }
}

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRecord {
    /// Date of the expense
    pub date: NaiveDate,

    /// Amount spent (never negative)
    pub amount: Money,

    /// What the money was spent on (never empty)
    pub description: String,

    /// Document type, number and supplier
    pub document: DocumentMeta,

    /// Display name of the attached receipt, kept across save/load
    pub attachment_name: Option<String>,

    /// Receipt bytes, only present in the session that attached them
    pub attachment: Option<Attachment>,
}

impl ExpenseRecord {
    /// Create a new expense without document metadata
    pub fn new(date: NaiveDate, amount: Money, description: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            description: description.into(),
            document: DocumentMeta::default(),
            attachment_name: None,
            attachment: None,
        }
    }

    /// Attach document metadata
    pub fn with_document(mut self, document: DocumentMeta) -> Self {
        self.document = document;
        self
    }

    /// Attach a receipt; its name is kept as the display name
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment_name = Some(attachment.name.clone());
        self.attachment = Some(attachment);
        self
    }

    /// Validate the record's invariants
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if self.amount.is_negative() {
            return Err(ValidationError::NegativeAmount(self.amount));
        }
        Ok(())
    }

    /// Whether the receipt bytes are available in this session
    pub fn has_embedded_attachment(&self) -> bool {
        self.attachment.is_some()
    }
}

impl fmt::Display for ExpenseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}

/// Validation errors for ledger data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyDescription,
    NegativeAmount(Money),
    NegativeFund(Money),
    TotalOverflow(Money),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Expense description is required"),
            Self::NegativeAmount(amount) => {
                write!(f, "Expense amount must not be negative: {}", amount)
            }
            Self::NegativeFund(amount) => {
                write!(f, "Initial fund must not be negative: {}", amount)
            }
            Self::TotalOverflow(amount) => {
                write!(f, "Expense amount {} would overflow the ledger total", amount)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
