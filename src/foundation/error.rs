pub type TintmarkResult<T> = Result<T, TintmarkError>;

#[derive(thiserror::Error, Debug)]
pub enum TintmarkError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("export error: {0}")]
    Export(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TintmarkError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            TintmarkError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            TintmarkError::decode("x")
                .to_string()
                .contains("decode error:")
        );
        assert!(
            TintmarkError::export("x")
                .to_string()
                .contains("export error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = TintmarkError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
