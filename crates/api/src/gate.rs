/// PIN accepted when no override is configured.
pub const DEFAULT_PIN: &str = "260914";

/// Fixed allow-list PIN check. No lockout and no rate limiting.
#[derive(Clone)]
pub struct Gate {
    allowed: Vec<String>,
}

impl Gate {
    pub fn new(pin: impl Into<String>) -> Self {
        Self {
            allowed: vec![pin.into()],
        }
    }

    pub fn authenticate(&self, pin: &str) -> bool {
        self.allowed
            .iter()
            .any(|allowed| constant_time_eq(allowed.as_bytes(), pin.as_bytes()))
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new(DEFAULT_PIN)
    }
}

impl std::fmt::Debug for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gate")
            .field("allowed", &self.allowed.len())
            .finish()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
