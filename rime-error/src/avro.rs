use crate::RimeError;

impl From<apache_avro::Error> for RimeError {
    fn from(value: apache_avro::Error) -> Self {
        RimeError::Avro(Box::new(value))
    }
}
