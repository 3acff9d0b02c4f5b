use thiserror::Error;

/// Top-level error type for Prospect.
#[derive(Debug, Error)]
pub enum ProspectError {
    /// File extension is not one of .xlsx, .xls, .csv, .txt.
    #[error("unsupported file format: use .xlsx, .xls, .csv or .txt")]
    UnsupportedFormat,

    /// File parsed but contained no usable rows or lines.
    #[error("{0}")]
    NoDataFound(String),

    /// File could not be decoded at all (corrupt workbook, bad CSV).
    #[error("parse error: {0}")]
    Parse(String),

    /// Candidates existed but none survived normalization.
    #[error("no valid phone number survived cleaning, formatting and length checks")]
    NoValidPhones,

    /// Attempted a send with a blank message template.
    #[error("the message is empty: compose a message before sending")]
    EmptyMessage,

    /// The host refused to open a link; remaining batch is halted.
    #[error("link for {number} was blocked by the host; remaining sends halted")]
    PopupBlocked { number: String },

    /// RD Station token is not configured.
    #[error("RD Station API token is not configured")]
    CrmNotConfigured,

    /// Error from the RD Station API.
    #[error("crm error: {0}")]
    Crm(String),

    /// A note or file exceeds the transfer size cap.
    #[error("transfer too large: limit is {limit} bytes")]
    TransferTooLarge { limit: u64 },

    /// Storage error.
    #[error("store error: {0}")]
    Store(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
