//! Cross-module scheduling scenarios
