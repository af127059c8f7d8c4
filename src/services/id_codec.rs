/*
 * Responsibility
 * - Public id <-> internal BIGINT id for conversations and messages
 * - Keeps sequential database ids out of URLs and response bodies
 *
 * The error type stays local (no thiserror); only AppError's From impl looks inside it.
 */
use sqids::{Error as SqidsError, Sqids};
use std::{error::Error, fmt};

pub type Result<T> = std::result::Result<T, IdCodecError>;

#[derive(Debug)]
pub enum IdCodecError {
    InvalidMinLength { value: usize },
    Sqids(SqidsError),
    NegativeId { value: i64 },
    DecodeInvalidFormat,
    DecodeOutOfRange,
}

impl fmt::Display for IdCodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdCodecError::InvalidMinLength { value } => {
                write!(f, "SQIDS_MIN_LENGTH must be at most 255, got {}", value)
            }
            IdCodecError::Sqids(e) => write!(f, "sqids error: {}", e),
            IdCodecError::NegativeId { value } => {
                write!(f, "id must be non-negative, got {}", value)
            }
            IdCodecError::DecodeInvalidFormat => write!(f, "invalid public id format"),
            IdCodecError::DecodeOutOfRange => write!(f, "decoded id is out of range"),
        }
    }
}

impl Error for IdCodecError {}

impl From<SqidsError> for IdCodecError {
    fn from(e: SqidsError) -> Self {
        IdCodecError::Sqids(e)
    }
}

#[derive(Clone, Debug)]
pub struct IdCodec {
    sqids: Sqids,
}

impl IdCodec {
    pub fn new(min_length: usize, alphabet: &str) -> Result<Self> {
        let min_length: u8 = min_length
            .try_into()
            .map_err(|_| IdCodecError::InvalidMinLength { value: min_length })?;

        let sqids = Sqids::builder()
            .min_length(min_length)
            .alphabet(alphabet.chars().collect())
            .build()?;

        Ok(Self { sqids })
    }

    pub fn encode(&self, id: i64) -> Result<String> {
        let n = u64::try_from(id).map_err(|_| IdCodecError::NegativeId { value: id })?;
        Ok(self.sqids.encode(&[n])?)
    }

    pub fn decode(&self, public_id: &str) -> Result<i64> {
        let nums = self.sqids.decode(public_id);
        if nums.len() != 1 {
            return Err(IdCodecError::DecodeInvalidFormat);
        }
        // Several strings can decode to the same number; accept only the canonical one.
        if self.sqids.encode(&nums)? != public_id {
            return Err(IdCodecError::DecodeInvalidFormat);
        }
        i64::try_from(nums[0]).map_err(|_| IdCodecError::DecodeOutOfRange)
    }
}
