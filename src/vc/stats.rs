/// counters tallying how a build call spent its effort, surfaced
/// through the protocol's `param` introspection and useful for tuning
/// `Params` against real games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub base_attempts: u64,
    pub base_successes: u64,
    pub pattern_attempts: u64,
    pub pattern_successes: u64,
    pub and_full_attempts: u64,
    pub and_full_successes: u64,
    pub and_semi_attempts: u64,
    pub and_semi_successes: u64,
    pub or_attempts: u64,
    pub or_successes: u64,
    pub do_ors: u64,
    pub good_ors: u64,
    pub shrunk_0: u64,
    pub shrunk_1: u64,
    pub upgraded: u64,
    pub killed_0: u64,
    pub killed_1: u64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_zeroes_every_counter() {
        let mut stats = Statistics::new();
        stats.base_attempts = 5;
        stats.or_successes = 3;
        stats.reset();
        assert_eq!(stats, Statistics::default());
    }
}
