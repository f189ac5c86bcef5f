use tangle_types::EncodingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkError {
    #[error("work search cancelled")]
    Cancelled,

    #[error("invalid {tip} tip: {source}")]
    InvalidTips {
        tip: &'static str,
        #[source]
        source: EncodingError,
    },

    #[error("minimum weight magnitude {0} exceeds the 243-trit hash")]
    InvalidMinWeight(u8),

    #[error("cannot attach an empty bundle")]
    EmptyBundle,

    #[error("failed to start work threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}
