use crate::{LlmError, ModelCandidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackState {
    Pending,
    Trying(usize),
    Success(usize),
    Exhausted,
}

#[derive(Debug)]
pub struct FallbackPolicy<'a> {
    candidates: &'a [ModelCandidate],
    state: FallbackState,
    last_error: Option<LlmError>,
}

impl<'a> FallbackPolicy<'a> {
    pub fn new(candidates: &'a [ModelCandidate]) -> Self {
        Self {
            candidates,
            state: FallbackState::Pending,
            last_error: None,
        }
    }

    pub fn state(&self) -> FallbackState {
        self.state
    }

    /// Advances to the next candidate. Returns `None` once the policy is
    /// terminal, either because a candidate succeeded or none are left.
    pub fn next_candidate(&mut self) -> Option<&'a ModelCandidate> {
        let next = match self.state {
            FallbackState::Pending => 0,
            FallbackState::Trying(current) => current + 1,
            FallbackState::Success(_) | FallbackState::Exhausted => return None,
        };

        match self.candidates.get(next) {
            Some(candidate) => {
                self.state = FallbackState::Trying(next);
                Some(candidate)
            }
            None => {
                self.state = FallbackState::Exhausted;
                None
            }
        }
    }

    pub fn record_success(&mut self) {
        if let FallbackState::Trying(current) = self.state {
            self.state = FallbackState::Success(current);
        }
    }

    pub fn record_failure(&mut self, error: LlmError) {
        self.last_error = Some(error);
    }

    pub fn into_error(self) -> LlmError {
        match self.last_error {
            Some(error) => LlmError::Exhausted(Box::new(error)),
            None => LlmError::NoCandidates,
        }
    }
}
