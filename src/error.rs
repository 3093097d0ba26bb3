pub type ModcardResult<T> = Result<T, ModcardError>;

#[derive(thiserror::Error, Debug)]
pub enum ModcardError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("asset fetch error: {0}")]
    Fetch(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("failed to export as {format}: {reason}")]
    Encode { format: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ModcardError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    pub fn encode(format: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Encode {
            format: format.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ModcardError::config("x")
                .to_string()
                .contains("configuration error:")
        );
        assert!(
            ModcardError::fetch("x")
                .to_string()
                .contains("asset fetch error:")
        );
        assert!(
            ModcardError::encode("webp", "x")
                .to_string()
                .contains("failed to export as webp")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ModcardError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
