use std::fmt::{Display, Formatter};

use itertools::Itertools;
use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Literal;

const SECONDS_PER_DAY: i64 = 86_400;

fn utc_from_micros(micros: i64) -> Result<jiff::Zoned, std::fmt::Error> {
    Timestamp::from_microsecond(micros)
        .map(|ts| ts.to_zoned(TimeZone::UTC))
        .map_err(|_| std::fmt::Error)
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Binary(b) | Self::Fixed(b) => {
                write!(f, "{}", b.iter().map(|b| format!("{b:x}")).format(","))
            }
            Self::Date(days) => {
                let date = Timestamp::from_second(i64::from(*days) * SECONDS_PER_DAY)
                    .map_err(|_| std::fmt::Error)?
                    .to_zoned(TimeZone::UTC)
                    .date();
                write!(f, "{date}")
            }
            Self::Time(micros) => write!(f, "{}", utc_from_micros(*micros)?.time()),
            Self::Timestamp(micros) => write!(f, "{}", utc_from_micros(*micros)?.datetime()),
            Self::TimestampTz(micros) => {
                let ts = Timestamp::from_microsecond(*micros).map_err(|_| std::fmt::Error)?;
                write!(f, "{ts}")
            }
            Self::Uuid(u) => write!(f, "{}", u.hyphenated()),
        }
    }
}
