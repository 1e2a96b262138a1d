use thiserror::Error;

/// Errors reported by the bucket containers.
///
/// Every check runs before the container is touched, so a call that returns
/// an error leaves the container exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A positional operation addressed a slot outside the container.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    /// A value lookup on a [`BucketList`](crate::BucketList) found nothing.
    #[error("value not in list")]
    ValueNotFound,

    /// A sizing ratio was rejected by [`Tuning`](crate::Tuning).
    #[error("{name} must be at least 1, got {value}")]
    InvalidRatio { name: &'static str, value: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Error::IndexOutOfRange { index: -6, len: 5 }, "index -6 out of range for length 5")]
    #[case(Error::ValueNotFound, "value not in list")]
    #[case(
        Error::InvalidRatio { name: "split_ratio", value: 0 },
        "split_ratio must be at least 1, got 0"
    )]
    fn display(#[case] error: Error, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn is_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(Error::ValueNotFound);
        assert!(error.source().is_none());
    }
}
