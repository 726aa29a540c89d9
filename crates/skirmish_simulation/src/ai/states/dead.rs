use super::AiState;

/// Терминальное состояние: input остаётся нейтральным
#[derive(Debug, Default)]
pub struct DeadState;

impl AiState for DeadState {}
