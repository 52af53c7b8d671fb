// nfctype4-rs/nfctype4/src/error.rs

use crate::types::FileId;
use thiserror::Error;

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Uniform under-run error returned by the bounded byte reader.
    #[error("unexpected end of data: needed {needed} more bytes, {remaining} left")]
    UnexpectedEndOfData {
        /// Bytes the caller asked for.
        needed: usize,
        /// Bytes that were actually available.
        remaining: usize,
    },

    /// The Lc field bytes have an illegal shape.
    #[error("invalid Lc field: {0}")]
    InvalidLc(&'static str),

    /// The Le field bytes have an illegal shape.
    #[error("invalid Le field: {0}")]
    InvalidLe(&'static str),

    /// The declared Lc value does not match the data field length.
    #[error("Lc value {lc} differs from the actual data length {data_len}")]
    LcDataMismatch {
        /// Declared Lc value.
        lc: u16,
        /// Actual length of the data field.
        data_len: usize,
    },

    /// The CAPDU body fits none of the ISO 7816-4 cases 1 to 4E.
    #[error("CAPDU body of {0} bytes matches no ISO 7816-4 case")]
    UnclassifiableBody(usize),

    /// A TLV L field disagreeing with its V field.
    #[error("TLV length {l} does not match the value length {value_len}")]
    TlvLengthMismatch {
        /// Declared L value.
        l: u16,
        /// Actual length of the V field.
        value_len: usize,
    },

    /// The 3-byte TLV length form used for a value below 0xFF.
    #[error("TLV 3-byte length used for a value shorter than 0xFF")]
    TlvLongFormMisuse,

    /// The 3-byte TLV length value 0xFFFF.
    #[error("TLV 3-byte length 0xFFFF is RFU")]
    TlvLengthRfu,

    /// A TLV whose T field is neither 0x04 nor 0x05 where a file control
    /// block was required.
    #[error("TLV type {t:#04x} is not a file control type")]
    NotControlTlv {
        /// The offending T value.
        t: u8,
    },

    /// A control TLV block spanning a wire size other than 8 bytes.
    #[error("control TLV spans {0} bytes instead of 8")]
    ControlTlvSize(usize),

    /// A control TLV that is not the NDEF file control TLV.
    #[error("TLV {t:#04x} is not an NDEF file control TLV")]
    NotNdefControlTlv {
        /// The offending T value.
        t: u8,
    },

    /// A control TLV that is not a proprietary file control TLV.
    #[error("TLV {t:#04x} is not a proprietary file control TLV")]
    NotProprietaryControlTlv {
        /// The offending T value.
        t: u8,
    },

    /// A file id reserved by ISO 7816-4.
    #[error("file id {0} is reserved by ISO 7816-4")]
    FileIdReserved(FileId),

    /// The RFU file id 0xFFFF.
    #[error("file id {0} is RFU")]
    FileIdRfu(FileId),

    /// A maximum file size in the RFU range 0x0000 to 0x0004.
    #[error("maximum file size {0:#06x} is RFU")]
    MaxFileSizeRfu(u16),

    /// A read access condition in the RFU range 0x01 to 0x7F.
    #[error("read access condition {0:#04x} is RFU")]
    ReadAccessRfu(u8),

    /// A write access condition in the RFU range 0x01 to 0x7F.
    #[error("write access condition {0:#04x} is RFU")]
    WriteAccessRfu(u8),

    /// A CCLEN below 0x000F or equal to 0xFFFF.
    #[error("CCLEN {0:#06x} is RFU")]
    CclenRfu(u16),

    /// An MLe below 0x000F.
    #[error("MLe {0:#06x} is RFU")]
    MleRfu(u16),

    /// An MLc of zero.
    #[error("MLc {0:#06x} is RFU")]
    MlcRfu(u16),

    /// The declared CCLEN differs from the bytes the parser consumed.
    #[error("capability container declares {expected} bytes but {parsed} were parsed")]
    CcLengthMismatch {
        /// Declared CCLEN.
        expected: u16,
        /// Bytes actually consumed.
        parsed: usize,
    },

    /// SELECT answered with SW 0x6A82.
    #[error("file {0} not found")]
    FileNotFound(FileId),

    /// SELECT by name of the NDEF application answered with SW 0x6A82.
    #[error("NDEF tag application not found")]
    NdefAppNotFound,

    /// Any status word pair other than the ones translated above.
    #[error("command failed: SW1 {sw1:#04x} SW2 {sw2:#04x}")]
    Status {
        /// First status byte.
        sw1: u8,
        /// Second status byte.
        sw2: u8,
    },

    /// The capability container marks the NDEF file as not readable.
    #[error("NDEF file is marked as not readable")]
    NotReadable,

    /// NLEN exceeds the capacity advertised by the capability container.
    #[error("tag is not in a valid state: NLEN {nlen} exceeds the {capacity} byte capacity")]
    InvalidState {
        /// NLEN read from the tag.
        nlen: u16,
        /// Maximum NDEF message length the tag advertises.
        capacity: u16,
    },

    /// The NDEF file holds no message (NLEN is zero).
    #[error("no NDEF message detected")]
    NoMessage,

    /// Update or Format attempted on a read-only tag.
    #[error("tag is read-only")]
    ReadOnly,

    /// The message does not fit in the NDEF file.
    #[error("message too large: maximum is {max} bytes")]
    MessageTooLarge {
        /// Largest message the target accepts.
        max: usize,
    },

    /// A software tag used before `initialize()`.
    #[error("tag has not been initialized")]
    TagUninitialized,

    /// No reader or no tag in field.
    #[error("no target detected")]
    NoTargetDetected,

    // PC/SC implementation is optional so the crate builds without a
    // system pcsclite.
    #[cfg(feature = "pcsc")]
    /// Error bubbled up from the PC/SC stack.
    #[error("pcsc error: {0}")]
    Pcsc(#[from] pcsc::Error),

    /// A tag answered with more bytes than the command allows.
    #[error("response of {actual} bytes exceeds the {max} byte limit")]
    ResponseTooLarge {
        /// Limit passed to `transceive`.
        max: usize,
        /// Size of the response that was produced.
        actual: usize,
    },

    /// The scripted transport ran out of queued responses.
    #[error("scripted transport has no response left for call {0}")]
    ScriptExhausted(usize),

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
