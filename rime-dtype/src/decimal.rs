use std::fmt::{Display, Formatter};

use rime_error::{RimeError, RimeResult, rime_bail};

use crate::DType;

/// Maximum precision a decimal column may declare.
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// Parameters that define the precision and scale of a decimal type.
///
/// Decimal types allow real numbers with a similar precision and scale to be represented exactly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecimalDType {
    precision: u8,
    scale: u8,
}

impl DecimalDType {
    /// Checked constructor for a `DecimalDType`.
    ///
    /// Fails when the precision is zero or exceeds [`MAX_DECIMAL_PRECISION`], or when the scale
    /// is larger than the precision.
    pub fn try_new(precision: u8, scale: u8) -> RimeResult<Self> {
        if precision == 0 || precision > MAX_DECIMAL_PRECISION {
            rime_bail!(
                "decimal precision {} must be between 1 and {}",
                precision,
                MAX_DECIMAL_PRECISION
            );
        }
        if scale > precision {
            rime_bail!("decimal scale {} exceeds precision {}", scale, precision);
        }
        Ok(Self { precision, scale })
    }

    /// The precision is the number of significant figures that the decimal tracks.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// The scale is the number of digits after the decimal point.
    pub fn scale(&self) -> u8 {
        self.scale
    }
}

impl Display for DecimalDType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "decimal({}, {})", self.precision, self.scale)
    }
}

impl TryFrom<&DType> for DecimalDType {
    type Error = RimeError;

    fn try_from(value: &DType) -> Result<Self, Self::Error> {
        match value {
            DType::Decimal(dt) => Ok(*dt),
            _ => rime_bail!("Cannot convert DType {value} into DecimalDType"),
        }
    }
}
